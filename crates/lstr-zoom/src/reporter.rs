//! Zoom reporting run: pick the report shape, collect rows, write the CSV and
//! reduce the totals.

use chrono::Datelike;
use lstr_core::period::previous_month;
use lstr_core::{Recurrence, ReportRequest, ReportWindow};

use crate::client::ZoomClient;
use crate::csv::write_csv;
use crate::error::ZoomError;
use crate::summary::ZoomSummary;
use crate::table::ReportTable;
use crate::types::{AccountRow, DailyRow};

/// Runs one period's Zoom report.
///
/// An empty `account_list` selects the daily report (stamped with the run
/// date); otherwise the per-account report is filtered to users whose email
/// contains any allow-list entry (stamped with the window end).
///
/// # Errors
///
/// Any client, pagination or file error aborts the run.
pub async fn run_report(
    client: &ZoomClient,
    request: &ReportRequest,
    account_list: &[String],
    max_pages: u32,
) -> Result<ZoomSummary, ZoomError> {
    let window = request.window;

    if account_list.is_empty() {
        let table = ReportTable::new(daily_rows(client, &window).await?);
        let csv_path = request.artifact_path(window.run_date, "csv");
        write_csv(&csv_path, &table).await?;
        Ok(ZoomSummary::from_totals(
            &table.totals,
            true,
            table.rows.len(),
            csv_path,
        ))
    } else {
        let table = ReportTable::new(account_rows(client, &window, account_list, max_pages).await?);
        tracing::info!("storing data from report");
        let csv_path = request.artifact_path(window.end, "csv");
        write_csv(&csv_path, &table).await?;
        Ok(ZoomSummary::from_totals(
            &table.totals,
            false,
            table.rows.len(),
            csv_path,
        ))
    }
}

/// Daily rows for the window.
///
/// Weekly: the run date's month cut to the seven days ending on the run
/// date; when that yields fewer than seven rows the previous month is read
/// once more and its matching rows appended. Monthly: every row of the
/// previous month.
///
/// # Errors
///
/// Transport and deserialization errors.
pub async fn daily_rows(
    client: &ZoomClient,
    window: &ReportWindow,
) -> Result<Vec<DailyRow>, ZoomError> {
    match window.recurrence {
        Recurrence::Weekly => {
            let week: Vec<String> = window
                .trailing_week()
                .iter()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect();
            let in_week = |row: &DailyRow| week.iter().any(|d| *d == row.date);

            let (year, month) = (window.run_date.year(), window.run_date.month());
            let mut rows: Vec<DailyRow> = client
                .daily_report(year, month)
                .await?
                .into_iter()
                .filter(in_week)
                .collect();

            if rows.len() < week.len() {
                let (prev_year, prev_month) = previous_month(year, month);
                tracing::info!(
                    found = rows.len(),
                    prev_year,
                    prev_month,
                    "week spans a month boundary, reading previous month"
                );
                rows.extend(
                    client
                        .daily_report(prev_year, prev_month)
                        .await?
                        .into_iter()
                        .filter(in_week),
                );
            }
            Ok(rows)
        }
        Recurrence::Monthly => {
            client
                .daily_report(window.end.year(), window.end.month())
                .await
        }
    }
}

/// Account rows for `window.start..=window.end` whose email contains any
/// allow-list entry.
///
/// # Errors
///
/// Transport, deserialization and pagination errors.
pub async fn account_rows(
    client: &ZoomClient,
    window: &ReportWindow,
    account_list: &[String],
    max_pages: u32,
) -> Result<Vec<AccountRow>, ZoomError> {
    let users = client
        .fetch_account_report(window.start, window.end, max_pages)
        .await?;
    tracing::info!(users = users.len(), "user object rows");

    Ok(users
        .into_iter()
        .filter(|user| matches_account(&user.email, account_list))
        .collect())
}

fn matches_account(email: &str, account_list: &[String]) -> bool {
    account_list
        .iter()
        .any(|entry| email.contains(entry.as_str()))
}
