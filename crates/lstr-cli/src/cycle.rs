//! One reporting cycle: gather both platforms, archive, notify.
//!
//! A failure in either platform's reporting step aborts the cycle before
//! anything is archived or mailed; a half-filled result set never reaches the
//! spreadsheet.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use lstr_core::{
    safe_substitute, Platform, ReportConfig, ReportRequest, ReportWindow, ResultSet,
    RuntimeSettings, EMAIL_DATE_METRIC, OPTIONAL_METRICS,
};
use lstr_google::{DriveUploader, EmailMessage, Mailer, SheetAppender};
use lstr_mediasite::{MediasiteClient, MediasiteSummary, PollPolicy};
use lstr_zoom::{ZoomClient, ZoomSummary};

pub(crate) const EMAIL_DATE_KEY: &str = EMAIL_DATE_METRIC;

/// Archiving and notification seams.
pub(crate) struct Collaborators<'a> {
    pub sheets: &'a dyn SheetAppender,
    pub drive: &'a dyn DriveUploader,
    pub mailer: &'a dyn Mailer,
}

/// Both platforms' summaries plus the merged, stringly-keyed view of them.
pub(crate) struct Gathered {
    pub zoom: ZoomSummary,
    pub mediasite: MediasiteSummary,
    pub results: ResultSet,
}

pub(crate) async fn run_cycle(
    config: &ReportConfig,
    settings: &RuntimeSettings,
    run_date: NaiveDate,
    log_file: Option<&Path>,
    collaborators: &Collaborators<'_>,
) -> anyhow::Result<ResultSet> {
    let window = ReportWindow::for_run(config.recurrence, run_date);
    let gathered = gather(config, settings, run_date).await?;

    tracing::info!("archiving results in Google");
    archive(config, &window, &gathered, collaborators).await?;

    tracing::info!("sending report email");
    collaborators
        .mailer
        .send(&compose_email(config, &gathered.results))
        .await
        .context("sending report email")?;

    tracing::info!("finished downloading data files and generating analytics email");

    if let (Some(folder_id), Some(log_file)) = (config.google_log_folder_id.as_deref(), log_file) {
        tracing::info!("uploading log file to Google Drive");
        collaborators
            .drive
            .upload(log_file, folder_id)
            .await
            .context("uploading log file")?;
    }

    Ok(gathered.results)
}

/// Runs Zoom, then Mediasite, and merges their metrics.
pub(crate) async fn gather(
    config: &ReportConfig,
    settings: &RuntimeSettings,
    run_date: NaiveDate,
) -> anyhow::Result<Gathered> {
    tracing::info!(recurrence = %config.recurrence, %run_date, "gathering Zoom analytics");
    let zoom_client = ZoomClient::new(&config.zoom, settings.http_timeout_secs)?;
    let zoom_request = ReportRequest::new(
        Platform::Zoom,
        config.recurrence,
        run_date,
        &config.reporting_prefix,
        &config.export_destination,
    );
    let zoom = lstr_zoom::run_report(
        &zoom_client,
        &zoom_request,
        &config.zoom_account_list,
        settings.zoom_max_pages,
    )
    .await
    .context("Zoom reporting step failed")?;

    tracing::info!("gathering Mediasite analytics");
    let mediasite_client = MediasiteClient::new(&config.mediasite, settings.http_timeout_secs)?;
    let mediasite_request = ReportRequest::new(
        Platform::Mediasite,
        config.recurrence,
        run_date,
        &config.reporting_prefix,
        &config.export_destination,
    )
    .with_identifier(&config.mediasite_presentation_report_name);
    let policy = PollPolicy {
        interval: settings.poll_interval(),
        max_attempts: settings.poll_max_attempts,
    };
    let mediasite = lstr_mediasite::run_report(&mediasite_client, &mediasite_request, &policy)
        .await
        .context("Mediasite reporting step failed")?;

    let mut results = ResultSet::new();
    results.merge(&zoom)?;
    results.merge(&mediasite)?;
    results.insert(
        EMAIL_DATE_KEY,
        zoom_request.window.email_date_label(),
        "cycle",
    )?;

    Ok(Gathered {
        zoom,
        mediasite,
        results,
    })
}

async fn archive(
    config: &ReportConfig,
    window: &ReportWindow,
    gathered: &Gathered,
    collaborators: &Collaborators<'_>,
) -> anyhow::Result<()> {
    let row = spreadsheet_row(
        &window.period_label(),
        &config.google_spreadsheet_data_elements,
        &gathered.results,
    )?;
    tracing::info!("sending data to analytics spreadsheet");
    collaborators
        .sheets
        .append_row(&config.google_spreadsheet_id, &row)
        .await
        .context("appending spreadsheet row")?;

    tracing::info!("uploading data export files to Google Drive");
    let uploads = [
        (
            gathered.mediasite.excel_export.path.as_path(),
            config.google_mediasite_archive_folder_id.as_str(),
        ),
        (
            gathered.mediasite.xml_export.path.as_path(),
            config.google_mediasite_archive_folder_id.as_str(),
        ),
        (
            gathered.zoom.csv_path.as_path(),
            config.google_zoom_archive_folder_id.as_str(),
        ),
    ];
    for (path, folder_id) in uploads {
        collaborators
            .drive
            .upload(path, folder_id)
            .await
            .with_context(|| format!("uploading {}", path.display()))?;
    }
    Ok(())
}

/// `[period label, value of each data element...]`. An empty element name
/// gives an empty cell, as does an optional metric the branch did not report.
///
/// # Errors
///
/// Fails if an element names a metric missing from `results`, so no partial
/// row is ever archived.
pub(crate) fn spreadsheet_row(
    period_label: &str,
    data_elements: &[String],
    results: &ResultSet,
) -> anyhow::Result<Vec<String>> {
    let mut row = Vec::with_capacity(data_elements.len() + 1);
    row.push(period_label.to_string());
    for element in data_elements {
        if element.is_empty() {
            row.push(String::new());
            continue;
        }
        match results.get(element) {
            Some(value) => row.push(value.to_string()),
            None if OPTIONAL_METRICS.contains(&element.as_str()) => {
                tracing::debug!(element = %element, "optional metric not reported, leaving cell empty");
                row.push(String::new());
            }
            None => bail!("spreadsheet data element '{element}' has no reported value"),
        }
    }
    Ok(row)
}

/// The subject sees only the date label; the body sees every metric.
pub(crate) fn compose_email(config: &ReportConfig, results: &ResultSet) -> EmailMessage {
    let mut subject_values = BTreeMap::new();
    if let Some(date) = results.get(EMAIL_DATE_KEY) {
        subject_values.insert(EMAIL_DATE_KEY.to_string(), date.to_string());
    }

    EmailMessage {
        to: config.email_to.clone(),
        reply_to: config.email_reply_to.clone(),
        cc: config.email_cc.clone(),
        subject: safe_substitute(&config.email_subj_template, &subject_values),
        html_body: safe_substitute(&config.email_body_template, results.values()),
    }
}

#[cfg(test)]
#[path = "cycle_test.rs"]
mod tests;
