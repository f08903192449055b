//! Mediasite lecture-capture reporting.
//!
//! Executes a pre-built presentation report through the Mediasite REST API,
//! waits for the server-side job, downloads the Excel-XML and XML exports and
//! reduces the XML export's `ResultSummary` node into a [`MediasiteSummary`].

pub mod client;
pub mod error;
pub mod export;
pub mod job;
pub mod reporter;
pub mod summary;
pub mod types;

pub use client::MediasiteClient;
pub use error::MediasiteError;
pub use export::{ExportArtifact, ExportFormat};
pub use job::{poll_until_complete, JobStatus, PollOutcome, PollPolicy};
pub use reporter::run_report;
pub use summary::{parse_result_summary, MediasiteSummary, PresentationSummary, WatchTime};
pub use types::{ExecutionHandle, ExportHandle, PresentationReportRef};
