use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use chrono::{Datelike, NaiveDateTime, Timelike};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// `<log_dir>/periodic_reporter_<M-D-YYYY_H-M-S>.log`, no zero padding.
pub(crate) fn log_file_path(log_dir: &Path, started: NaiveDateTime) -> PathBuf {
    log_dir.join(format!(
        "periodic_reporter_{}-{}-{}_{}-{}-{}.log",
        started.month(),
        started.day(),
        started.year(),
        started.hour(),
        started.minute(),
        started.second()
    ))
}

/// Console plus plain-text file logging. `RUST_LOG` wins over `level`.
///
/// The returned guard flushes the file writer when dropped and must outlive
/// every log call.
pub(crate) fn init_logging(level: &str, file_path: &Path) -> anyhow::Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = tracing_subscriber::fmt::layer().with_target(false).boxed();

    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create log directory: {}", parent.display()))?;
    }
    let file = std::fs::File::create(file_path)
        .with_context(|| format!("create log file: {}", file_path.display()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .boxed();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}
