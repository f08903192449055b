use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::period::{artifact_file_name, Recurrence, ReportWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Mediasite,
    Zoom,
}

impl Platform {
    /// Lower-case name used in file names and metric prefixes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Mediasite => "mediasite",
            Platform::Zoom => "zoom",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a platform reporter needs to produce one period's summary.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub platform: Platform,
    pub window: ReportWindow,
    pub report_prefix: String,
    pub export_destination: PathBuf,
    /// Platform-side name of a pre-built report, where the platform has one.
    pub report_identifier: Option<String>,
}

impl ReportRequest {
    #[must_use]
    pub fn new(
        platform: Platform,
        recurrence: Recurrence,
        run_date: NaiveDate,
        report_prefix: &str,
        export_destination: &Path,
    ) -> Self {
        Self {
            platform,
            window: ReportWindow::for_run(recurrence, run_date),
            report_prefix: report_prefix.to_owned(),
            export_destination: export_destination.to_path_buf(),
            report_identifier: None,
        }
    }

    #[must_use]
    pub fn with_identifier(mut self, identifier: &str) -> Self {
        self.report_identifier = Some(identifier.to_owned());
        self
    }

    #[must_use]
    pub fn recurrence(&self) -> Recurrence {
        self.window.recurrence
    }

    /// Destination path for an export stamped with `date`.
    #[must_use]
    pub fn artifact_path(&self, date: NaiveDate, extension: &str) -> PathBuf {
        self.export_destination.join(artifact_file_name(
            self.platform.as_str(),
            self.recurrence(),
            &self.report_prefix,
            date,
            extension,
        ))
    }
}
