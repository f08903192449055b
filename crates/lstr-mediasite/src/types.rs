//! Mediasite REST API response types.
//!
//! The API speaks OData v3 JSON: collections arrive wrapped in a `value`
//! array and property names are `PascalCase`.

use serde::Deserialize;

use crate::job::JobStatus;

#[derive(Debug, Deserialize)]
pub(crate) struct ODataCollection<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PresentationReportRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Returned by `PresentationReports('<id>')/Execute`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExecutionHandle {
    pub job_link: String,
    pub result_id: String,
}

/// Returned by `PresentationReports('<id>')/Export`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportHandle {
    pub job_link: String,
    pub download_link: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct JobResource {
    pub status: JobStatus,
}
