//! HTTP client for the Zoom reporting API.
//!
//! Every call is a form POST carrying `api_key`, `api_secret` and
//! `data_type` ahead of the resource's own parameters.

mod fetch_all;

use std::time::Duration;

use chrono::NaiveDate;
use lstr_core::ZoomSettings;
use reqwest::{Client, Url};

use crate::error::ZoomError;
use crate::types::{AccountReportPage, AccountRow, DailyReport, DailyRow};

/// Users per page requested from the account report; a shorter page is the last.
pub const ACCOUNT_PAGE_SIZE: usize = 300;

pub struct ZoomClient {
    client: Client,
    base_url: Url,
    api_key: String,
    api_secret: String,
    data_type: String,
}

impl ZoomClient {
    /// Creates a client from configured settings.
    ///
    /// # Errors
    ///
    /// Returns [`ZoomError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ZoomError::InvalidUrl`] for a bad base URL.
    pub fn new(settings: &ZoomSettings, timeout_secs: u64) -> Result<Self, ZoomError> {
        Self::with_base_url(
            &settings.base_url,
            &settings.api_key,
            &settings.api_secret,
            &settings.data_type,
            timeout_secs,
        )
    }

    /// Creates a client with explicit credentials and base URL.
    ///
    /// # Errors
    ///
    /// Same as [`ZoomClient::new`].
    pub fn with_base_url(
        base_url: &str,
        api_key: &str,
        api_secret: &str,
        data_type: &str,
        timeout_secs: u64,
    ) -> Result<Self, ZoomError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("lstr/0.1 (usage-reporting)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ZoomError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_owned(),
            api_secret: api_secret.to_owned(),
            data_type: data_type.to_owned(),
        })
    }

    /// POST the credential fields plus `params` to `<base><resource>` and
    /// return the body text.
    ///
    /// # Errors
    ///
    /// [`ZoomError::Transport`] on a non-2xx status, [`ZoomError::Http`] on
    /// network failure.
    pub async fn post_form(
        &self,
        resource: &str,
        params: &[(&str, String)],
    ) -> Result<String, ZoomError> {
        let url = self
            .base_url
            .join(resource.trim_start_matches('/'))
            .map_err(|e| ZoomError::InvalidUrl {
                url: resource.to_owned(),
                reason: e.to_string(),
            })?;

        let mut form: Vec<(&str, &str)> = vec![
            ("api_key", self.api_key.as_str()),
            ("api_secret", self.api_secret.as_str()),
            ("data_type", self.data_type.as_str()),
        ];
        form.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        let response = self.client.post(url.clone()).form(&form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ZoomError::Transport {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }
        Ok(response.text().await?)
    }

    /// Daily account-wide usage for one calendar month.
    ///
    /// # Errors
    ///
    /// Transport and deserialization errors.
    pub async fn daily_report(&self, year: i32, month: u32) -> Result<Vec<DailyRow>, ZoomError> {
        tracing::info!(year, month, "requesting Zoom daily report");
        let body = self
            .post_form(
                "report/getdailyreport",
                &[("year", year.to_string()), ("month", month.to_string())],
            )
            .await?;
        let report: DailyReport =
            serde_json::from_str(&body).map_err(|e| ZoomError::Deserialize {
                context: format!("daily report {year}-{month:02}"),
                source: e,
            })?;
        Ok(report.dates)
    }

    /// One page (1-based) of per-user usage between `from` and `to`.
    ///
    /// # Errors
    ///
    /// Transport and deserialization errors.
    pub async fn account_report_page(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        page_number: u32,
    ) -> Result<Vec<AccountRow>, ZoomError> {
        let body = self
            .post_form(
                "report/getaccountreport",
                &[
                    ("from", from.format("%Y-%m-%d").to_string()),
                    ("to", to.format("%Y-%m-%d").to_string()),
                    ("page_size", ACCOUNT_PAGE_SIZE.to_string()),
                    ("page_number", page_number.to_string()),
                ],
            )
            .await?;
        let page: AccountReportPage =
            serde_json::from_str(&body).map_err(|e| ZoomError::Deserialize {
                context: format!("account report page {page_number}"),
                source: e,
            })?;
        Ok(page.users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_base_url() {
        let result = ZoomClient::with_base_url("not a url", "k", "s", "JSON", 5);
        assert!(matches!(result, Err(ZoomError::InvalidUrl { .. })));
    }

    #[test]
    fn base_url_gains_single_trailing_slash() {
        let client =
            ZoomClient::with_base_url("https://api.zoom.test/v1///", "k", "s", "JSON", 5).unwrap();
        assert_eq!(client.base_url.as_str(), "https://api.zoom.test/v1/");
    }
}
