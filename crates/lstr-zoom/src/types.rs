//! Zoom report response types.
//!
//! Both reports wrap their rows in an envelope with paging or period metadata
//! we do not use. Rows carry many more fields than we keep; serde drops the
//! rest. Counts have been observed both as JSON integers and as integer
//! strings, so every count field goes through [`count`].

use serde::{Deserialize, Deserializer};

use crate::table::ReportRow;

/// Response of `report/getdailyreport`.
#[derive(Debug, Deserialize)]
pub struct DailyReport {
    #[serde(default)]
    pub dates: Vec<DailyRow>,
}

/// One day of account-wide usage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DailyRow {
    /// `YYYY-MM-DD`.
    pub date: String,
    #[serde(default, deserialize_with = "count")]
    pub new_user: u64,
    #[serde(default, deserialize_with = "count")]
    pub meetings: u64,
    #[serde(default, deserialize_with = "count")]
    pub participants: u64,
    #[serde(default, deserialize_with = "count")]
    pub meeting_minutes: u64,
}

/// One page of `report/getaccountreport`.
#[derive(Debug, Deserialize)]
pub struct AccountReportPage {
    #[serde(default)]
    pub users: Vec<AccountRow>,
}

/// One user's usage over the requested period.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountRow {
    #[serde(default)]
    pub user_id: String,
    pub email: String,
    #[serde(default, deserialize_with = "count")]
    pub meetings: u64,
    #[serde(default, deserialize_with = "count")]
    pub meeting_minutes: u64,
    #[serde(default, deserialize_with = "count")]
    pub participants: u64,
}

impl ReportRow for DailyRow {
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "new_user",
        "meetings",
        "participants",
        "meeting_minutes",
    ];
    const SUM_COLUMNS: &'static [&'static str] =
        &["new_user", "meetings", "participants", "meeting_minutes"];
    const LABEL_COLUMN: &'static str = "date";

    fn text(&self, column: &str) -> String {
        match column {
            "date" => self.date.clone(),
            other => self.count(other).map(|n| n.to_string()).unwrap_or_default(),
        }
    }

    fn count(&self, column: &str) -> Option<u64> {
        match column {
            "new_user" => Some(self.new_user),
            "meetings" => Some(self.meetings),
            "participants" => Some(self.participants),
            "meeting_minutes" => Some(self.meeting_minutes),
            _ => None,
        }
    }
}

impl ReportRow for AccountRow {
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "email",
        "meetings",
        "meeting_minutes",
        "participants",
    ];
    const SUM_COLUMNS: &'static [&'static str] = &["meetings", "meeting_minutes", "participants"];
    const LABEL_COLUMN: &'static str = "email";

    fn text(&self, column: &str) -> String {
        match column {
            "user_id" => self.user_id.clone(),
            "email" => self.email.clone(),
            other => self.count(other).map(|n| n.to_string()).unwrap_or_default(),
        }
    }

    fn count(&self, column: &str) -> Option<u64> {
        match column {
            "meetings" => Some(self.meetings),
            "meeting_minutes" => Some(self.meeting_minutes),
            "participants" => Some(self.participants),
            _ => None,
        }
    }
}

/// Accepts `12` or `"12"`.
fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected an integer count, got \"{s}\""))),
    }
}
