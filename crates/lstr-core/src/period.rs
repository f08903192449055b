//! Reporting periods: recurrence windows, human-readable labels and artifact
//! file naming.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Weekly,
    Monthly,
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recurrence::Weekly => write!(f, "weekly"),
            Recurrence::Monthly => write!(f, "monthly"),
        }
    }
}

/// Concrete dates covered by one reporting run.
///
/// Weekly windows run from seven days before the run date up to the run date;
/// monthly windows cover the whole calendar month preceding the run date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub recurrence: Recurrence,
    pub run_date: NaiveDate,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportWindow {
    #[must_use]
    pub fn for_run(recurrence: Recurrence, run_date: NaiveDate) -> Self {
        let (start, end) = match recurrence {
            Recurrence::Weekly => (run_date - Days::new(7), run_date),
            Recurrence::Monthly => {
                let end = last_day_of_previous_month(run_date);
                (first_of_month(end), end)
            }
        };
        Self {
            recurrence,
            run_date,
            start,
            end,
        }
    }

    /// Label written as the first spreadsheet cell, e.g. `10/12/2026-10/19/2026`
    /// or `Sep 2026`.
    #[must_use]
    pub fn period_label(&self) -> String {
        match self.recurrence {
            Recurrence::Weekly => format!("{}-{}", slash_date(self.start), slash_date(self.end)),
            Recurrence::Monthly => self.end.format("%b %Y").to_string(),
        }
    }

    /// Date shown in the email, e.g. `10/19/2026` or `9/2026`.
    #[must_use]
    pub fn email_date_label(&self) -> String {
        match self.recurrence {
            Recurrence::Weekly => slash_date(self.run_date),
            Recurrence::Monthly => format!("{}/{}", self.end.month(), self.end.year()),
        }
    }

    /// The seven calendar days ending on (and including) the run date.
    #[must_use]
    pub fn trailing_week(&self) -> Vec<NaiveDate> {
        (0..7).map(|back| self.run_date - Days::new(back)).collect()
    }
}

#[must_use]
pub fn last_day_of_previous_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date) - Days::new(1)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// `(year, month)` of the calendar month before the given one.
#[must_use]
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn slash_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Build an export file name:
/// `<platform>_report_<recurrence>_<prefix>_<MM-DD-YYYY>.<extension>`.
#[must_use]
pub fn artifact_file_name(
    platform: &str,
    recurrence: Recurrence,
    report_prefix: &str,
    date: NaiveDate,
    extension: &str,
) -> String {
    format!(
        "{platform}_report_{recurrence}_{report_prefix}_{}.{extension}",
        date.format("%m-%d-%Y")
    )
}
