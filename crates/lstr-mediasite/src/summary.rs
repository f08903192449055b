//! Lecture-capture reducer: pulls the `ResultSummary` figures out of an XML
//! report export and normalises the watch-time duration.

use std::collections::HashMap;

use lstr_core::{Platform, SummaryRecord};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::MediasiteError;
use crate::export::ExportArtifact;

const SUMMARY_NODE: &str = "ResultSummary";

/// Figures from the report's `ResultSummary` node, kept as the API wrote them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationSummary {
    pub presentations_available: String,
    pub total_time_watched: String,
    pub presentations_watched: String,
    pub total_views: String,
    pub total_users: String,
    pub peak_connections: String,
}

/// Total watch time split into display components.
///
/// The XML export writes the hour field in days: `D.H:MM:SS` where `D` is
/// whole days and `H` extra hours, or plain `H:MM:SS` where the whole field is
/// a day count. Hours are therefore `D * 24 + H`, or `H * 24` without a dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTime {
    pub hours: u64,
    pub minutes: String,
    pub seconds: String,
}

impl WatchTime {
    /// Parses `H:MM:SS` or `D.H:MM:SS`.
    ///
    /// # Errors
    ///
    /// Returns [`MediasiteError::Parse`] if the value does not have three
    /// `:`-separated parts or the hour field is not numeric.
    pub fn parse(raw: &str) -> Result<Self, MediasiteError> {
        let bad = |reason: &str| MediasiteError::Parse {
            context: format!("TotalTimeWatched value '{raw}'"),
            reason: reason.to_owned(),
        };

        let parts: Vec<&str> = raw.trim().split(':').collect();
        let [hour_field, minutes, seconds] = parts.as_slice() else {
            return Err(bad("expected three ':'-separated fields"));
        };

        let number = |s: &str| s.parse::<u64>().map_err(|_| bad("hour field is not numeric"));

        let hours = match hour_field.split_once('.') {
            Some((days, extra)) => number(days)?
                .checked_mul(24)
                .and_then(|h| h.checked_add(number(extra).ok()?))
                .ok_or_else(|| bad("hour field is not numeric or too large"))?,
            None => number(hour_field)?
                .checked_mul(24)
                .ok_or_else(|| bad("hour field is too large"))?,
        };

        Ok(Self {
            hours,
            minutes: (*minutes).to_owned(),
            seconds: (*seconds).to_owned(),
        })
    }
}

/// Reads the first `ResultSummary` element directly under the document root.
///
/// # Errors
///
/// - [`MediasiteError::Xml`] if the document is not well-formed.
/// - [`MediasiteError::Parse`] if the summary node or one of its fields is
///   missing or empty.
pub fn parse_result_summary(xml: &str) -> Result<PresentationSummary, MediasiteError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut in_summary = false;
    let mut summary_found = false;
    let mut current_field: Option<String> = None;
    let mut fields: HashMap<String, String> = HashMap::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if depth == 2 && name == SUMMARY_NODE && !summary_found {
                    in_summary = true;
                } else if in_summary && depth == 3 {
                    current_field = Some(name);
                }
            }
            Event::Text(t) => {
                if let Some(field) = &current_field {
                    let text = t.unescape().map_err(|e| MediasiteError::Parse {
                        context: format!("{SUMMARY_NODE}/{field}"),
                        reason: e.to_string(),
                    })?;
                    fields.entry(field.clone()).or_default().push_str(&text);
                }
            }
            Event::CData(c) => {
                if let Some(field) = &current_field {
                    let text = String::from_utf8_lossy(c.as_ref());
                    fields.entry(field.clone()).or_default().push_str(&text);
                }
            }
            Event::End(_) => {
                if in_summary && depth == 3 {
                    current_field = None;
                } else if in_summary && depth == 2 {
                    in_summary = false;
                    summary_found = true;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Empty(e) => {
                if depth == 1 && e.local_name().as_ref() == SUMMARY_NODE.as_bytes() {
                    summary_found = true;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !summary_found {
        return Err(MediasiteError::Parse {
            context: "report XML".to_owned(),
            reason: format!("no {SUMMARY_NODE} node"),
        });
    }

    let mut take = |name: &str| -> Result<String, MediasiteError> {
        fields
            .remove(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| MediasiteError::Parse {
                context: format!("{SUMMARY_NODE} node"),
                reason: format!("missing {name}"),
            })
    };

    Ok(PresentationSummary {
        presentations_available: take("PresentationsAvailable")?,
        total_time_watched: take("TotalTimeWatched")?,
        presentations_watched: take("PresentationsWatched")?,
        total_views: take("TotalViews")?,
        total_users: take("TotalUsers")?,
        peak_connections: take("PeakConnections")?,
    })
}

/// One period's Mediasite figures plus the export files they came from.
#[derive(Debug, Clone)]
pub struct MediasiteSummary {
    pub summary: PresentationSummary,
    pub watch_time: WatchTime,
    pub excel_export: ExportArtifact,
    pub xml_export: ExportArtifact,
}

impl SummaryRecord for MediasiteSummary {
    fn platform(&self) -> Platform {
        Platform::Mediasite
    }

    fn metrics(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "mediasite_results_total_time_watched",
                self.summary.total_time_watched.clone(),
            ),
            (
                "mediasite_results_time_watched_hours",
                self.watch_time.hours.to_string(),
            ),
            (
                "mediasite_results_time_watched_minutes",
                self.watch_time.minutes.clone(),
            ),
            (
                "mediasite_results_time_watched_seconds",
                self.watch_time.seconds.clone(),
            ),
            (
                "mediasite_results_number_presentations",
                self.summary.presentations_available.clone(),
            ),
            (
                "mediasite_results_watched_presentations",
                self.summary.presentations_watched.clone(),
            ),
            (
                "mediasite_results_presentation_views",
                self.summary.total_views.clone(),
            ),
            (
                "mediasite_results_active_users",
                self.summary.total_users.clone(),
            ),
            (
                "mediasite_results_active_users_peak",
                self.summary.peak_connections.clone(),
            ),
            (
                "mediasite_results_excel_filepath",
                self.excel_export.path.display().to_string(),
            ),
            (
                "mediasite_results_xml_filepath",
                self.xml_export.path.display().to_string(),
            ),
        ]
    }
}
