//! Mediasite reporting run.

use lstr_core::ReportRequest;

use crate::client::MediasiteClient;
use crate::error::MediasiteError;
use crate::export::ExportFormat;
use crate::job::PollPolicy;
use crate::summary::{parse_result_summary, MediasiteSummary, WatchTime};

/// Runs the configured presentation report for one period.
///
/// 1. Resolve the report's ID from its name.
/// 2. Execute it and wait for the execution job.
/// 3. Export the result as Excel-XML, then as XML, each into
///    `export_destination` under the run date.
/// 4. Reduce the XML export's `ResultSummary` node.
///
/// # Errors
///
/// Any client, job, download or parse error aborts the run; nothing is
/// retried.
pub async fn run_report(
    client: &MediasiteClient,
    request: &ReportRequest,
    policy: &PollPolicy,
) -> Result<MediasiteSummary, MediasiteError> {
    let report_name = request
        .report_identifier
        .as_deref()
        .ok_or(MediasiteError::NoReportName)?;

    tracing::info!(report = report_name, "finding ID of presentation report");
    let report_id = client.find_presentation_report(report_name).await?;

    tracing::info!(report_id = %report_id, "executing presentation report");
    let execution = client.execute_report(&report_id).await?;
    client.await_job(&execution.job_link, policy).await?;

    let run_date = request.window.run_date;
    let excel_path = request.artifact_path(run_date, ExportFormat::Excel.extension());
    let xml_path = request.artifact_path(run_date, ExportFormat::Xml.extension());

    tracing::info!("beginning Excel XML file generation for report");
    let excel_export = client
        .generate_and_fetch(
            &report_id,
            &execution.result_id,
            ExportFormat::Excel,
            &excel_path,
            policy,
        )
        .await?;

    tracing::info!("beginning XML file generation for report");
    let xml_export = client
        .generate_and_fetch(
            &report_id,
            &execution.result_id,
            ExportFormat::Xml,
            &xml_path,
            policy,
        )
        .await?;

    tracing::info!(path = %xml_export.path.display(), "reading XML data from report");
    let xml = tokio::fs::read_to_string(&xml_export.path)
        .await
        .map_err(|source| MediasiteError::Io {
            path: xml_export.path.clone(),
            source,
        })?;
    let summary = parse_result_summary(&xml)?;
    let watch_time = WatchTime::parse(&summary.total_time_watched)?;

    tracing::info!(
        views = %summary.total_views,
        hours = watch_time.hours,
        "finished gathering Mediasite data"
    );

    Ok(MediasiteSummary {
        summary,
        watch_time,
        excel_export,
        xml_export,
    })
}
