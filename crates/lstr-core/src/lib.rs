//! Shared configuration, reporting periods and result-set plumbing for the
//! periodic usage reporter.
//!
//! Platform crates (`lstr-mediasite`, `lstr-zoom`) depend on this crate for
//! [`ReportRequest`] and the [`SummaryRecord`] trait; the CLI depends on it for
//! configuration loading, labels and template rendering.

pub mod app_config;
pub mod config;
pub mod error;
pub mod period;
pub mod request;
pub mod summary;
pub mod template;

pub use app_config::{load_runtime_settings, load_runtime_settings_from_env, RuntimeSettings};
pub use config::{
    load_report_config, GoogleSettings, MediasiteSettings, ReportConfig, ZoomSettings,
};
pub use error::{ConfigError, CoreError};
pub use period::{artifact_file_name, Recurrence, ReportWindow};
pub use request::{Platform, ReportRequest};
pub use summary::{
    is_known_metric, ResultSet, SummaryRecord, EMAIL_DATE_METRIC, METRIC_CATALOGUE,
    OPTIONAL_METRICS,
};
pub use template::safe_substitute;
