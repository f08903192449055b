//! HTTP client for the Mediasite REST API.
//!
//! Every request carries the `sfapikey` header, `Accept: application/json` and
//! basic-auth credentials. Non-2xx responses become
//! [`MediasiteError::Transport`] with the status and body preserved.

use std::time::Duration;

use lstr_core::MediasiteSettings;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, RequestBuilder, Response, Url};

use crate::error::MediasiteError;
use crate::types::{ExecutionHandle, JobResource, ODataCollection, PresentationReportRef};

/// Characters left bare in query values; everything else is percent-encoded.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Client for the Mediasite REST API.
///
/// Use [`MediasiteClient::new`] with configured settings or
/// [`MediasiteClient::with_base_url`] to point at a mock server in tests.
pub struct MediasiteClient {
    client: Client,
    /// Bounds each read instead of the whole transfer, so long exports can
    /// stream for as long as data keeps arriving.
    download_client: Client,
    base_url: Url,
    api_key: String,
    username: String,
    password: String,
}

impl MediasiteClient {
    /// Creates a client from configured settings.
    ///
    /// # Errors
    ///
    /// Returns [`MediasiteError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`MediasiteError::InvalidUrl`] if the base
    /// URL does not parse.
    pub fn new(settings: &MediasiteSettings, timeout_secs: u64) -> Result<Self, MediasiteError> {
        Self::with_base_url(
            &settings.base_url,
            &settings.api_key,
            &settings.username,
            &settings.password,
            timeout_secs,
        )
    }

    /// Creates a client with explicit credentials and base URL.
    ///
    /// # Errors
    ///
    /// Same as [`MediasiteClient::new`].
    pub fn with_base_url(
        base_url: &str,
        api_key: &str,
        username: &str,
        password: &str,
        timeout_secs: u64,
    ) -> Result<Self, MediasiteError> {
        let timeout = Duration::from_secs(timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("lstr/0.1 (usage-reporting)")
            .build()?;
        let download_client = Client::builder()
            .read_timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("lstr/0.1 (usage-reporting)")
            .build()?;

        // Resource names are joined onto the base, so it must end in exactly one slash.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| MediasiteError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            download_client,
            base_url,
            api_key: api_key.to_owned(),
            username: username.to_owned(),
            password: password.to_owned(),
        })
    }

    /// GET `<base><resource>?<query>` and return the body text.
    ///
    /// # Errors
    ///
    /// [`MediasiteError::Transport`] on a non-2xx status,
    /// [`MediasiteError::Http`] on network failure.
    pub async fn get_text(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<String, MediasiteError> {
        let url = self.resource_url(resource, query)?;
        let response = self.send(self.client.get(url.clone()), &url).await?;
        Ok(response.text().await?)
    }

    /// POST a JSON body to `<base><resource>` and return the body text.
    ///
    /// # Errors
    ///
    /// [`MediasiteError::Transport`] on a non-2xx status,
    /// [`MediasiteError::Http`] on network failure.
    pub async fn post_json(
        &self,
        resource: &str,
        body: &serde_json::Value,
    ) -> Result<String, MediasiteError> {
        let url = self.resource_url(resource, &[])?;
        let response = self
            .send(self.client.post(url.clone()).json(body), &url)
            .await?;
        Ok(response.text().await?)
    }

    /// GET a link handed out by the API (job or download link).
    ///
    /// # Errors
    ///
    /// [`MediasiteError::Transport`] on a non-2xx status,
    /// [`MediasiteError::Http`] on network failure.
    pub async fn get_link_text(&self, link: &str) -> Result<String, MediasiteError> {
        let url = self.resolve_link(link)?;
        let response = self.send(self.client.get(url.clone()), &url).await?;
        Ok(response.text().await?)
    }

    /// GET a link and hand back the response without reading the body, for
    /// streaming large downloads. The configured timeout applies to each read
    /// rather than to the whole transfer.
    ///
    /// # Errors
    ///
    /// [`MediasiteError::Transport`] on a non-2xx status,
    /// [`MediasiteError::Http`] on network failure.
    pub async fn get_stream(&self, link: &str) -> Result<Response, MediasiteError> {
        let url = self.resolve_link(link)?;
        self.send(self.download_client.get(url.clone()), &url).await
    }

    /// Looks up a presentation report's ID by its display name.
    ///
    /// # Errors
    ///
    /// [`MediasiteError::ReportNotFound`] if no report carries that name, plus
    /// the transport and deserialization errors of any request.
    pub async fn find_presentation_report(&self, name: &str) -> Result<String, MediasiteError> {
        let filter = format!("Name eq '{}'", name.replace('\'', "''"));
        let body = self
            .get_text("PresentationReports", &[("$top", "1"), ("$filter", &filter)])
            .await?;
        let reports: ODataCollection<PresentationReportRef> = serde_json::from_str(&body)
            .map_err(|e| MediasiteError::Deserialize {
                context: format!("PresentationReports(name={name})"),
                source: e,
            })?;

        reports
            .value
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| MediasiteError::ReportNotFound(name.to_owned()))
    }

    /// Asks the server to (re)generate the report's result set.
    ///
    /// # Errors
    ///
    /// Transport and deserialization errors.
    pub async fn execute_report(&self, report_id: &str) -> Result<ExecutionHandle, MediasiteError> {
        let resource = format!("PresentationReports('{report_id}')/Execute");
        let body = self.post_json(&resource, &serde_json::json!({})).await?;
        serde_json::from_str(&body).map_err(|e| MediasiteError::Deserialize {
            context: resource,
            source: e,
        })
    }

    /// Reads the current status of a job.
    ///
    /// # Errors
    ///
    /// Transport and deserialization errors.
    pub async fn job_status(&self, job_link: &str) -> Result<crate::JobStatus, MediasiteError> {
        let body = self.get_link_text(job_link).await?;
        let job: JobResource =
            serde_json::from_str(&body).map_err(|e| MediasiteError::Deserialize {
                context: format!("job {job_link}"),
                source: e,
            })?;
        Ok(job.status)
    }

    /// Builds `<base><resource>?<query>`, keeping OData keys such as `$top`
    /// literal and percent-encoding the values.
    pub(crate) fn resource_url(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<Url, MediasiteError> {
        let mut url = self
            .base_url
            .join(resource.trim_start_matches('/'))
            .map_err(|e| MediasiteError::InvalidUrl {
                url: resource.to_owned(),
                reason: e.to_string(),
            })?;
        if !query.is_empty() {
            let encoded = query
                .iter()
                .map(|(k, v)| format!("{k}={}", utf8_percent_encode(v, QUERY_VALUE)))
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&encoded));
        }
        Ok(url)
    }

    /// Links from the API are normally absolute; relative ones resolve
    /// against the base URL.
    pub(crate) fn resolve_link(&self, link: &str) -> Result<Url, MediasiteError> {
        Url::parse(link)
            .or_else(|_| self.base_url.join(link.trim_start_matches('/')))
            .map_err(|e| MediasiteError::InvalidUrl {
                url: link.to_owned(),
                reason: e.to_string(),
            })
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("sfapikey", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .basic_auth(&self.username, Some(&self.password))
    }

    /// Sends the request and turns any non-2xx status into
    /// [`MediasiteError::Transport`].
    async fn send(&self, builder: RequestBuilder, url: &Url) -> Result<Response, MediasiteError> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), url = %url, "Mediasite request failed");
            return Err(MediasiteError::Transport {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> MediasiteClient {
        MediasiteClient::with_base_url(base_url, "key", "user", "pass", 30)
            .expect("client construction should not fail")
    }

    #[test]
    fn resource_url_keeps_odata_keys_literal() {
        let client = test_client("https://ms.example.edu/Mediasite/Api/v1");
        let url = client
            .resource_url(
                "PresentationReports",
                &[("$top", "1"), ("$filter", "Name eq 'BBA Weekly'")],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://ms.example.edu/Mediasite/Api/v1/PresentationReports?$top=1&$filter=Name%20eq%20%27BBA%20Weekly%27"
        );
    }

    #[test]
    fn resource_url_handles_quoted_keys() {
        let client = test_client("https://ms.example.edu/Mediasite/Api/v1/");
        let url = client
            .resource_url("PresentationReports('abc-123')/Execute", &[])
            .unwrap();
        assert_eq!(
            url.path(),
            "/Mediasite/Api/v1/PresentationReports('abc-123')/Execute"
        );
        assert!(url.query().is_none());
    }

    #[test]
    fn resolve_link_accepts_absolute_and_relative_links() {
        let client = test_client("https://ms.example.edu/Mediasite/Api/v1/");
        let absolute = client
            .resolve_link("https://other.example.edu/Api/v1/Jobs('j1')")
            .unwrap();
        assert_eq!(absolute.host_str(), Some("other.example.edu"));

        let relative = client.resolve_link("Jobs('j2')").unwrap();
        assert_eq!(relative.path(), "/Mediasite/Api/v1/Jobs('j2')");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = MediasiteClient::with_base_url("not a url", "k", "u", "p", 30);
        assert!(matches!(result, Err(MediasiteError::InvalidUrl { .. })));
    }
}
