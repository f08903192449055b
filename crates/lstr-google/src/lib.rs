//! Archiving and notification collaborators.
//!
//! The reporting cycle only talks to the three traits in [`collab`];
//! [`GoogleClient`] implements them over the Sheets, Drive and Gmail REST
//! APIs with an already-issued bearer token.

pub mod client;
pub mod collab;
pub mod error;
pub mod mime;

pub use client::GoogleClient;
pub use collab::{DriveUploader, EmailMessage, Mailer, SheetAppender, UploadedFile};
pub use error::GoogleError;
pub use mime::{encode_raw, render_message};
