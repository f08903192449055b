//! Zoom conferencing usage reporting.
//!
//! Two report shapes are supported. With no account allow-list the daily
//! report is read month by month and cut to the reporting window; with an
//! allow-list the paginated per-account report is read and filtered by email.
//! Either way the retained rows are written to CSV with a trailing totals row
//! and reduced into a [`ZoomSummary`].

pub mod client;
pub mod csv;
pub mod error;
pub mod reporter;
pub mod summary;
pub mod table;
pub mod types;

pub use client::{ZoomClient, ACCOUNT_PAGE_SIZE};
pub use csv::{escape_csv, render_csv, write_csv};
pub use error::ZoomError;
pub use reporter::{account_rows, daily_rows, run_report};
pub use summary::ZoomSummary;
pub use table::{ReportRow, ReportTable, Totals, TOTALS_LABEL};
pub use types::{AccountReportPage, AccountRow, DailyReport, DailyRow};
