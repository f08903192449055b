//! Report export: request a file rendering, wait for it, stream it to disk.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::client::MediasiteClient;
use crate::error::MediasiteError;
use crate::job::PollPolicy;
use crate::types::ExportHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// SpreadsheetML ("Excel XML").
    Excel,
    Xml,
}

impl ExportFormat {
    /// Value of the `FileFormat` field in export requests.
    #[must_use]
    pub fn api_name(self) -> &'static str {
        match self {
            ExportFormat::Excel => "Excel",
            ExportFormat::Xml => "XML",
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Excel => "excel.xml",
            ExportFormat::Xml => "xml",
        }
    }
}

/// A file produced by a completed export job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub bytes: u64,
}

impl MediasiteClient {
    /// Requests an export of an executed report result.
    ///
    /// # Errors
    ///
    /// Transport and deserialization errors.
    pub async fn export_report(
        &self,
        report_id: &str,
        result_id: &str,
        format: ExportFormat,
    ) -> Result<ExportHandle, MediasiteError> {
        let resource = format!("PresentationReports('{report_id}')/Export");
        let body = self
            .post_json(
                &resource,
                &serde_json::json!({
                    "ResultId": result_id,
                    "FileFormat": format.api_name(),
                }),
            )
            .await?;
        serde_json::from_str(&body).map_err(|e| MediasiteError::Deserialize {
            context: resource,
            source: e,
        })
    }

    /// Exports a report result in `format`, waits for the export job and
    /// streams the file to `destination`, creating parent directories.
    ///
    /// # Errors
    ///
    /// - [`MediasiteError::JobFailed`] / [`MediasiteError::PollTimeout`] from the export job.
    /// - [`MediasiteError::Download`] if the file cannot be written or the
    ///   stream ends early.
    /// - Transport and deserialization errors.
    pub async fn generate_and_fetch(
        &self,
        report_id: &str,
        result_id: &str,
        format: ExportFormat,
        destination: &Path,
        policy: &PollPolicy,
    ) -> Result<ExportArtifact, MediasiteError> {
        let handle = self.export_report(report_id, result_id, format).await?;
        self.await_job(&handle.job_link, policy).await?;

        tracing::info!(
            download_link = %handle.download_link,
            format = format.api_name(),
            "attempting to download report export"
        );
        let response = self.get_stream(&handle.download_link).await?;
        let bytes = stream_to_file(response, destination).await?;
        tracing::info!(path = %destination.display(), bytes, "downloaded report export");

        Ok(ExportArtifact {
            path: destination.to_path_buf(),
            format,
            bytes,
        })
    }
}

/// Writes a response body to `destination` chunk by chunk.
pub(crate) async fn stream_to_file(
    response: reqwest::Response,
    destination: &Path,
) -> Result<u64, MediasiteError> {
    let download_err = |reason: String| MediasiteError::Download {
        path: destination.to_path_buf(),
        reason,
    };

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            download_err(format!("cannot create directory {}: {e}", parent.display()))
        })?;
    }

    let expected = response.content_length();
    let mut file = tokio::fs::File::create(destination)
        .await
        .map_err(|e| download_err(format!("cannot open for writing: {e}")))?;

    let mut written = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk
            .map_err(|e| download_err(format!("stream interrupted after {written} bytes: {e}")))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| download_err(format!("write failed after {written} bytes: {e}")))?;
        written += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(|e| download_err(format!("flush failed: {e}")))?;

    if let Some(expected) = expected {
        if written < expected {
            return Err(download_err(format!(
                "stream ended after {written} of {expected} bytes"
            )));
        }
    }

    Ok(written)
}
