use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZoomError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}: {body}")]
    Transport {
        status: u16,
        url: String,
        body: String,
    },

    #[error("invalid Zoom URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("pagination limit reached: exceeded {max_pages} pages of account report")]
    PaginationLimit { max_pages: u32 },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
