//! Cross-platform result set.
//!
//! Each platform produces a typed summary; at the template/spreadsheet boundary
//! those summaries are flattened into one name → value map. Metric names carry
//! a platform prefix, and [`ResultSet::merge`] refuses to overwrite a name that
//! another source already supplied.

use std::collections::BTreeMap;

use crate::request::Platform;
use crate::CoreError;

/// Run-level metric holding the email date label.
pub const EMAIL_DATE_METRIC: &str = "email_report_date_string";

/// Every metric name a reporting cycle can produce.
pub const METRIC_CATALOGUE: &[&str] = &[
    "mediasite_results_total_time_watched",
    "mediasite_results_time_watched_hours",
    "mediasite_results_time_watched_minutes",
    "mediasite_results_time_watched_seconds",
    "mediasite_results_number_presentations",
    "mediasite_results_watched_presentations",
    "mediasite_results_presentation_views",
    "mediasite_results_active_users",
    "mediasite_results_active_users_peak",
    "mediasite_results_excel_filepath",
    "mediasite_results_xml_filepath",
    "zoom_results_new_user",
    "zoom_results_meetings",
    "zoom_results_participants",
    "zoom_results_meeting_minutes",
    "zoom_results_meeting_hours",
    "zoom_results_csv_filepath",
    EMAIL_DATE_METRIC,
];

/// Catalogued metrics that only some report branches produce. Zoom's account
/// report has no new-user count.
pub const OPTIONAL_METRICS: &[&str] = &["zoom_results_new_user"];

#[must_use]
pub fn is_known_metric(name: &str) -> bool {
    METRIC_CATALOGUE.contains(&name)
}

/// A typed per-platform summary that can be flattened into named metrics.
pub trait SummaryRecord {
    fn platform(&self) -> Platform;

    /// `(metric name, display value)` pairs. Names must start with the
    /// platform's prefix.
    fn metrics(&self) -> Vec<(&'static str, String)>;
}

#[derive(Debug, Default, Clone)]
pub struct ResultSet {
    values: BTreeMap<String, String>,
    sources: BTreeMap<String, String>,
}

impl ResultSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every metric of `record`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MetricCollision`] if a metric name is already
    /// present; the set is left unchanged in that case.
    pub fn merge(&mut self, record: &dyn SummaryRecord) -> Result<(), CoreError> {
        let source = record.platform().as_str();
        let metrics = record.metrics();
        for (name, _) in &metrics {
            self.check_free(name, source)?;
        }
        for (name, value) in metrics {
            self.values.insert(name.to_string(), value);
            self.sources.insert(name.to_string(), source.to_string());
        }
        Ok(())
    }

    /// Add a single run-level value such as the email date label.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MetricCollision`] if `name` is already present.
    pub fn insert(&mut self, name: &str, value: String, source: &str) -> Result<(), CoreError> {
        self.check_free(name, source)?;
        self.values.insert(name.to_string(), value);
        self.sources.insert(name.to_string(), source.to_string());
        Ok(())
    }

    fn check_free(&self, name: &str, incoming: &str) -> Result<(), CoreError> {
        match self.sources.get(name) {
            Some(existing) => Err(CoreError::MetricCollision {
                name: name.to_string(),
                existing: existing.clone(),
                incoming: incoming.to_string(),
            }),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Platform, Vec<(&'static str, String)>);

    impl SummaryRecord for Fixed {
        fn platform(&self) -> Platform {
            self.0
        }

        fn metrics(&self) -> Vec<(&'static str, String)> {
            self.1.clone()
        }
    }

    #[test]
    fn merges_disjoint_records() {
        let mut set = ResultSet::new();
        set.merge(&Fixed(
            Platform::Zoom,
            vec![("zoom_results_meetings", "12".to_string())],
        ))
        .unwrap();
        set.merge(&Fixed(
            Platform::Mediasite,
            vec![("mediasite_results_presentation_views", "40".to_string())],
        ))
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get("zoom_results_meetings"), Some("12"));
        assert_eq!(set.get("mediasite_results_presentation_views"), Some("40"));
    }

    #[test]
    fn colliding_metric_is_rejected_without_partial_merge() {
        let mut set = ResultSet::new();
        set.merge(&Fixed(
            Platform::Zoom,
            vec![("shared_metric", "1".to_string())],
        ))
        .unwrap();

        let err = set
            .merge(&Fixed(
                Platform::Mediasite,
                vec![
                    ("mediasite_results_active_users", "3".to_string()),
                    ("shared_metric", "2".to_string()),
                ],
            ))
            .unwrap_err();

        assert!(matches!(err, CoreError::MetricCollision { ref name, .. } if name == "shared_metric"));
        assert_eq!(set.get("shared_metric"), Some("1"));
        assert!(set.get("mediasite_results_active_users").is_none());
    }

    #[test]
    fn insert_rejects_existing_name() {
        let mut set = ResultSet::new();
        set.insert("email_report_date_string", "9/2026".to_string(), "run")
            .unwrap();
        assert!(set
            .insert("email_report_date_string", "10/2026".to_string(), "run")
            .is_err());
    }
}
