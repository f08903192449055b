mod cycle;
mod logging;

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use lstr_core::RuntimeSettings;
use lstr_google::GoogleClient;

#[derive(Debug, Parser)]
#[command(name = "lstr")]
#[command(about = "Periodic Mediasite and Zoom usage reporter")]
struct Cli {
    /// Report configuration document (JSON, or YAML by extension).
    #[arg(short, long)]
    file: PathBuf,

    /// Log level filter; overrides `LSTR_LOG_LEVEL`.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match lstr_core::load_runtime_settings() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let started = chrono::Local::now().naive_local();
    let log_path = logging::log_file_path(&settings.log_dir, started);
    let level = cli.log_level.as_deref().unwrap_or(&settings.log_level);
    let guard = match logging::init_logging(level, &log_path) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&cli.file, &settings, started.date(), &log_path).await {
        tracing::error!("{err:#}");
        drop(guard);
        std::process::exit(1);
    }
}

async fn run(
    config_path: &Path,
    settings: &RuntimeSettings,
    run_date: NaiveDate,
    log_path: &Path,
) -> anyhow::Result<()> {
    let config = lstr_core::load_report_config(config_path)
        .with_context(|| format!("loading report configuration {}", config_path.display()))?;
    tracing::info!(
        config = %config_path.display(),
        recurrence = %config.recurrence,
        prefix = %config.reporting_prefix,
        "starting periodic report"
    );

    let google = GoogleClient::new(&config.google, settings.http_timeout_secs)?;
    let collaborators = cycle::Collaborators {
        sheets: &google,
        drive: &google,
        mailer: &google,
    };

    let results =
        cycle::run_cycle(&config, settings, run_date, Some(log_path), &collaborators).await?;
    tracing::info!(metrics = results.len(), "periodic report complete");
    Ok(())
}

#[cfg(test)]
mod tests;
