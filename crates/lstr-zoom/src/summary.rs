use std::path::PathBuf;

use lstr_core::{Platform, SummaryRecord};

use crate::table::Totals;

/// One period's Zoom figures and the CSV they were written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoomSummary {
    pub meetings: u64,
    pub participants: u64,
    pub meeting_minutes: u64,
    /// Only the daily report counts new users.
    pub new_user: Option<u64>,
    pub csv_path: PathBuf,
    pub rows: usize,
}

impl ZoomSummary {
    #[must_use]
    pub fn from_totals(totals: &Totals, daily: bool, rows: usize, csv_path: PathBuf) -> Self {
        Self {
            meetings: totals.get("meetings"),
            participants: totals.get("participants"),
            meeting_minutes: totals.get("meeting_minutes"),
            new_user: daily.then(|| totals.get("new_user")),
            csv_path,
            rows,
        }
    }

    /// Meeting minutes rounded up to whole hours.
    #[must_use]
    pub fn meeting_hours(&self) -> u64 {
        self.meeting_minutes.div_ceil(60)
    }
}

impl SummaryRecord for ZoomSummary {
    fn platform(&self) -> Platform {
        Platform::Zoom
    }

    fn metrics(&self) -> Vec<(&'static str, String)> {
        let mut metrics = Vec::with_capacity(6);
        if let Some(new_user) = self.new_user {
            metrics.push(("zoom_results_new_user", new_user.to_string()));
        }
        metrics.extend([
            ("zoom_results_meetings", self.meetings.to_string()),
            ("zoom_results_participants", self.participants.to_string()),
            ("zoom_results_meeting_minutes", self.meeting_minutes.to_string()),
            ("zoom_results_meeting_hours", self.meeting_hours().to_string()),
            (
                "zoom_results_csv_filepath",
                self.csv_path.display().to_string(),
            ),
        ]);
        metrics
    }
}
