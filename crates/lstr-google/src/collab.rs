//! Collaborator seams used by the reporting cycle.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::GoogleError;

/// Appends rows to a spreadsheet.
#[async_trait]
pub trait SheetAppender: Send + Sync {
    async fn append_row(&self, sheet_id: &str, values: &[String]) -> Result<(), GoogleError>;
}

/// Uploads local files into a storage folder.
#[async_trait]
pub trait DriveUploader: Send + Sync {
    async fn upload(&self, local_path: &Path, folder_id: &str)
        -> Result<UploadedFile, GoogleError>;
}

/// Sends an HTML email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), GoogleError>;
}

/// Address fields are comma-separated lists as written in the configuration;
/// empty `reply_to` / `cc` are left out of the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub reply_to: String,
    pub cc: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    #[serde(default)]
    pub name: String,
}
