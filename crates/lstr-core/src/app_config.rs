use std::path::PathBuf;
use std::time::Duration;

use crate::ConfigError;

/// Process-level knobs that are not part of a report configuration document:
/// logging, HTTP timeouts and polling limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub log_level: String,
    pub log_dir: PathBuf,
    pub http_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub poll_max_attempts: u32,
    pub zoom_max_pages: u32,
}

impl RuntimeSettings {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Load runtime settings from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot be parsed.
pub fn load_runtime_settings() -> Result<RuntimeSettings, ConfigError> {
    dotenvy::dotenv().ok();
    load_runtime_settings_from_env()
}

/// Load runtime settings from environment variables already in the process.
///
/// Unlike [`load_runtime_settings`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot be parsed.
pub fn load_runtime_settings_from_env() -> Result<RuntimeSettings, ConfigError> {
    build_runtime_settings(|key| std::env::var(key))
}

/// Build runtime settings using the provided env-var lookup function, so the
/// parsing rules can be tested with a plain `HashMap`.
fn build_runtime_settings<F>(lookup: F) -> Result<RuntimeSettings, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("LSTR_LOG_LEVEL", "info");
    let log_dir = PathBuf::from(or_default("LSTR_LOG_DIR", "./logs"));
    let http_timeout_secs = parse_u64("LSTR_HTTP_TIMEOUT_SECS", "60")?;
    let poll_interval_secs = parse_u64("LSTR_POLL_INTERVAL_SECS", "5")?;
    let poll_max_attempts = parse_u32("LSTR_POLL_MAX_ATTEMPTS", "720")?;
    let zoom_max_pages = parse_u32("LSTR_ZOOM_MAX_PAGES", "200")?;

    if http_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "LSTR_HTTP_TIMEOUT_SECS".to_string(),
            reason: "timeout must be greater than zero".to_string(),
        });
    }
    if poll_max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "LSTR_POLL_MAX_ATTEMPTS".to_string(),
            reason: "at least one status check is required".to_string(),
        });
    }

    Ok(RuntimeSettings {
        log_level,
        log_dir,
        http_timeout_secs,
        poll_interval_secs,
        poll_max_attempts,
        zoom_max_pages,
    })
}
