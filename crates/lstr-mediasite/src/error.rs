use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the Mediasite client and reporter.
#[derive(Debug, Error)]
pub enum MediasiteError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("Mediasite returned HTTP {status} for {url}: {body}")]
    Transport {
        status: u16,
        url: String,
        body: String,
    },

    #[error("invalid Mediasite URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no Mediasite report name was configured")]
    NoReportName,

    #[error("presentation report '{0}' not found")]
    ReportNotFound(String),

    /// The job reached `Failed`, `Disabled` or `Cancelled`.
    #[error("job {job_link} did not complete successfully (status: {status})")]
    JobFailed { job_link: String, status: String },

    #[error("job {job_link} still running after {attempts} status checks")]
    PollTimeout { job_link: String, attempts: u32 },

    #[error("download to {path} failed: {reason}")]
    Download { path: PathBuf, reason: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A response document is missing an expected field or holds a malformed value.
    #[error("unexpected {context}: {reason}")]
    Parse { context: String, reason: String },
}
