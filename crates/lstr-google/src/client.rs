//! Google Sheets, Drive and Gmail over REST.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use lstr_core::GoogleSettings;
use reqwest::{Client, RequestBuilder, Url};

use crate::collab::{DriveUploader, EmailMessage, Mailer, SheetAppender, UploadedFile};
use crate::error::GoogleError;
use crate::mime::encode_raw;

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/";
const DRIVE_UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/drive/v3/";
const GMAIL_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1/";

/// Range the spreadsheet append is anchored to; rows land after the last
/// filled row of the table found there.
const APPEND_RANGE: &str = "A:B";

const MULTIPART_BOUNDARY: &str = "lstr-drive-upload-5f0c9a";

pub struct GoogleClient {
    client: Client,
    access_token: String,
    sender: String,
    sheets_base: Url,
    drive_upload_base: Url,
    gmail_base: Url,
}

impl std::fmt::Debug for GoogleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleClient")
            .field("access_token", &"[redacted]")
            .field("sender", &self.sender)
            .field("sheets_base", &self.sheets_base.as_str())
            .field("drive_upload_base", &self.drive_upload_base.as_str())
            .field("gmail_base", &self.gmail_base.as_str())
            .finish_non_exhaustive()
    }
}

impl GoogleClient {
    /// Creates a client from configured settings, using the public Google
    /// endpoints unless a base URL override is set.
    ///
    /// # Errors
    ///
    /// Returns [`GoogleError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`GoogleError::InvalidUrl`] for a malformed override.
    pub fn new(settings: &GoogleSettings, timeout_secs: u64) -> Result<Self, GoogleError> {
        Self::with_base_urls(
            &settings.access_token,
            &settings.sender,
            settings.sheets_base_url.as_deref().unwrap_or(SHEETS_BASE_URL),
            settings
                .drive_upload_base_url
                .as_deref()
                .unwrap_or(DRIVE_UPLOAD_BASE_URL),
            settings.gmail_base_url.as_deref().unwrap_or(GMAIL_BASE_URL),
            timeout_secs,
        )
    }

    /// Creates a client against explicit endpoints (mock servers in tests).
    ///
    /// # Errors
    ///
    /// Same as [`GoogleClient::new`].
    pub fn with_base_urls(
        access_token: &str,
        sender: &str,
        sheets_base: &str,
        drive_upload_base: &str,
        gmail_base: &str,
        timeout_secs: u64,
    ) -> Result<Self, GoogleError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("lstr/0.1 (usage-reporting)")
            .build()?;

        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            sender: sender.to_owned(),
            sheets_base: parse_base(sheets_base)?,
            drive_upload_base: parse_base(drive_upload_base)?,
            gmail_base: parse_base(gmail_base)?,
        })
    }

    async fn execute(&self, request: RequestBuilder, url: &Url) -> Result<String, GoogleError> {
        let response = request.bearer_auth(&self.access_token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GoogleError::Transport {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }
        Ok(response.text().await?)
    }
}

fn parse_base(raw: &str) -> Result<Url, GoogleError> {
    Url::parse(&format!("{}/", raw.trim_end_matches('/'))).map_err(|e| GoogleError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}

fn join(base: &Url, path: &str) -> Result<Url, GoogleError> {
    base.join(path).map_err(|e| GoogleError::InvalidUrl {
        url: format!("{base}{path}"),
        reason: e.to_string(),
    })
}

/// `multipart/related` body: JSON metadata part, then the file content.
fn multipart_body(metadata: &serde_json::Value, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(content.len() + 512);
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata.to_string().as_bytes());
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

#[async_trait]
impl SheetAppender for GoogleClient {
    async fn append_row(&self, sheet_id: &str, values: &[String]) -> Result<(), GoogleError> {
        let mut url = join(
            &self.sheets_base,
            &format!("spreadsheets/{sheet_id}/values/{APPEND_RANGE}:append"),
        )?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");

        tracing::info!(sheet_id, cells = values.len(), "appending row to spreadsheet");
        let body = serde_json::json!({ "values": [values] });
        self.execute(self.client.post(url.clone()).json(&body), &url)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DriveUploader for GoogleClient {
    async fn upload(
        &self,
        local_path: &Path,
        folder_id: &str,
    ) -> Result<UploadedFile, GoogleError> {
        let content = tokio::fs::read(local_path)
            .await
            .map_err(|source| GoogleError::Io {
                path: local_path.to_path_buf(),
                source,
            })?;
        let name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut url = join(&self.drive_upload_base, "files")?;
        url.query_pairs_mut().append_pair("uploadType", "multipart");

        tracing::info!(file = %name, folder_id, bytes = content.len(), "uploading file to Drive");
        let metadata = serde_json::json!({ "name": name, "parents": [folder_id] });
        let request = self
            .client
            .post(url.clone())
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(multipart_body(&metadata, &content));

        let body = self.execute(request, &url).await?;
        serde_json::from_str(&body).map_err(|e| GoogleError::Deserialize {
            context: format!("Drive upload of {name}"),
            source: e,
        })
    }
}

#[async_trait]
impl Mailer for GoogleClient {
    async fn send(&self, message: &EmailMessage) -> Result<(), GoogleError> {
        let url = join(
            &self.gmail_base,
            &format!("users/{}/messages/send", self.sender),
        )?;
        let raw = encode_raw(message, &self.sender);

        tracing::info!(to = %message.to, "sending email message");
        self.execute(
            self.client
                .post(url.clone())
                .json(&serde_json::json!({ "raw": raw })),
            &url,
        )
        .await?;
        Ok(())
    }
}
