//! Report configuration document.
//!
//! One document describes one reporting job: the recurrence, where exports go,
//! which Mediasite report and Zoom accounts to read, where results are archived
//! and how the notification email is addressed and templated. Credentials for
//! each platform live in their own section and are handed to the clients
//! explicitly; nothing here is read from implicit locations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::period::Recurrence;
use crate::summary::is_known_metric;
use crate::ConfigError;

#[derive(Clone, Deserialize)]
pub struct ReportConfig {
    pub recurrence: Recurrence,
    pub reporting_prefix: String,
    pub export_destination: PathBuf,
    #[serde(default)]
    pub zoom_account_list: Vec<String>,
    pub mediasite_presentation_report_name: String,
    pub google_spreadsheet_id: String,
    pub google_mediasite_archive_folder_id: String,
    pub google_zoom_archive_folder_id: String,
    #[serde(default)]
    pub google_log_folder_id: Option<String>,
    #[serde(default)]
    pub google_spreadsheet_data_elements: Vec<String>,
    pub email_subj_template: String,
    /// Either a single string or a list of fragments joined without separator.
    #[serde(deserialize_with = "string_or_fragments")]
    pub email_body_template: String,
    pub email_to: String,
    #[serde(default)]
    pub email_reply_to: String,
    #[serde(default)]
    pub email_cc: String,
    pub mediasite: MediasiteSettings,
    pub zoom: ZoomSettings,
    pub google: GoogleSettings,
}

#[derive(Clone, Deserialize)]
pub struct MediasiteSettings {
    pub base_url: String,
    pub api_key: String,
    pub username: String,
    pub password: String,
}

#[derive(Clone, Deserialize)]
pub struct ZoomSettings {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    #[serde(default = "default_data_type")]
    pub data_type: String,
}

#[derive(Clone, Deserialize)]
pub struct GoogleSettings {
    pub access_token: String,
    /// Mailbox the notification is sent from (`me` works for user tokens).
    pub sender: String,
    #[serde(default)]
    pub sheets_base_url: Option<String>,
    #[serde(default)]
    pub drive_upload_base_url: Option<String>,
    #[serde(default)]
    pub gmail_base_url: Option<String>,
}

fn default_data_type() -> String {
    "JSON".to_string()
}

fn string_or_fragments<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Template {
        Whole(String),
        Fragments(Vec<String>),
    }

    Ok(match Template::deserialize(deserializer)? {
        Template::Whole(s) => s,
        Template::Fragments(parts) => parts.concat(),
    })
}

/// Read, parse and validate a report configuration document.
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML; anything else as JSON.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read,
/// [`ConfigError::Parse`] if it is not a valid document, and
/// [`ConfigError::Missing`] / [`ConfigError::Invalid`] if validation fails.
pub fn load_report_config(path: &Path) -> Result<ReportConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let config: ReportConfig = if is_yaml {
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
    } else {
        serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
    };

    config.validate()?;
    Ok(config)
}

impl ReportConfig {
    /// Check required options are present and base URLs are well formed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming the first empty required
    /// option, or [`ConfigError::Invalid`] for a malformed URL or a
    /// spreadsheet data element that names no known metric.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("reporting_prefix", self.reporting_prefix.as_str()),
            (
                "mediasite_presentation_report_name",
                self.mediasite_presentation_report_name.as_str(),
            ),
            ("google_spreadsheet_id", self.google_spreadsheet_id.as_str()),
            (
                "google_mediasite_archive_folder_id",
                self.google_mediasite_archive_folder_id.as_str(),
            ),
            (
                "google_zoom_archive_folder_id",
                self.google_zoom_archive_folder_id.as_str(),
            ),
            ("email_to", self.email_to.as_str()),
            ("mediasite.api_key", self.mediasite.api_key.as_str()),
            ("mediasite.username", self.mediasite.username.as_str()),
            ("zoom.api_key", self.zoom.api_key.as_str()),
            ("zoom.api_secret", self.zoom.api_secret.as_str()),
            ("google.access_token", self.google.access_token.as_str()),
            ("google.sender", self.google.sender.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(field.to_string()));
            }
        }

        if self.export_destination.as_os_str().is_empty() {
            return Err(ConfigError::Missing("export_destination".to_string()));
        }

        check_url("mediasite.base_url", &self.mediasite.base_url)?;
        check_url("zoom.base_url", &self.zoom.base_url)?;
        for (field, url) in [
            ("google.sheets_base_url", &self.google.sheets_base_url),
            ("google.drive_upload_base_url", &self.google.drive_upload_base_url),
            ("google.gmail_base_url", &self.google.gmail_base_url),
        ] {
            if let Some(url) = url {
                check_url(field, url)?;
            }
        }

        if let Some(unknown) = self
            .google_spreadsheet_data_elements
            .iter()
            .find(|element| !element.is_empty() && !is_known_metric(element))
        {
            return Err(ConfigError::Invalid {
                field: "google_spreadsheet_data_elements".to_string(),
                reason: format!("unknown metric '{unknown}'"),
            });
        }

        Ok(())
    }
}

fn check_url(field: &str, raw: &str) -> Result<(), ConfigError> {
    if raw.trim().is_empty() {
        return Err(ConfigError::Missing(field.to_string()));
    }
    let url = reqwest::Url::parse(raw).map_err(|e| ConfigError::Invalid {
        field: field.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            field: field.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(())
}

impl std::fmt::Debug for ReportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportConfig")
            .field("recurrence", &self.recurrence)
            .field("reporting_prefix", &self.reporting_prefix)
            .field("export_destination", &self.export_destination)
            .field("zoom_account_list", &self.zoom_account_list)
            .field(
                "mediasite_presentation_report_name",
                &self.mediasite_presentation_report_name,
            )
            .field("google_spreadsheet_id", &self.google_spreadsheet_id)
            .field("google_log_folder_id", &self.google_log_folder_id)
            .field(
                "google_spreadsheet_data_elements",
                &self.google_spreadsheet_data_elements,
            )
            .field("email_to", &self.email_to)
            .field("mediasite", &self.mediasite)
            .field("zoom", &self.zoom)
            .field("google", &self.google)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for MediasiteSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediasiteSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl std::fmt::Debug for ZoomSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoomSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .field("api_secret", &"[redacted]")
            .field("data_type", &self.data_type)
            .finish()
    }
}

impl std::fmt::Debug for GoogleSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSettings")
            .field("access_token", &"[redacted]")
            .field("sender", &self.sender)
            .field("sheets_base_url", &self.sheets_base_url)
            .field("drive_upload_base_url", &self.drive_upload_base_url)
            .field("gmail_base_url", &self.gmail_base_url)
            .finish()
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
