//! Server-side job polling.
//!
//! Report execution and export both hand back a job link. The job moves from
//! `Queued`/`Working` to exactly one terminal state; only `Successful` lets the
//! caller continue. The poll interval is constant and the number of status
//! checks is capped by [`PollPolicy::max_attempts`].

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;

use crate::client::MediasiteClient;
use crate::error::MediasiteError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum JobStatus {
    Queued,
    Working,
    Successful,
    Failed,
    Disabled,
    Cancelled,
    /// Any status the API adds later; treated as still running.
    Other(String),
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Queued" => JobStatus::Queued,
            "Working" => JobStatus::Working,
            "Successful" => JobStatus::Successful,
            "Failed" => JobStatus::Failed,
            "Disabled" => JobStatus::Disabled,
            "Cancelled" => JobStatus::Cancelled,
            _ => JobStatus::Other(raw),
        }
    }
}

impl JobStatus {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Successful)
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            JobStatus::Failed | JobStatus::Disabled | JobStatus::Cancelled
        )
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.is_success() || self.is_failure()
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "Queued"),
            JobStatus::Working => write!(f, "Working"),
            JobStatus::Successful => write!(f, "Successful"),
            JobStatus::Failed => write!(f, "Failed"),
            JobStatus::Disabled => write!(f, "Disabled"),
            JobStatus::Cancelled => write!(f, "Cancelled"),
            JobStatus::Other(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Maximum number of status checks, including the first.
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 720,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    /// Number of interval sleeps taken before the job succeeded.
    pub waits: u32,
}

/// Fetches job status until it is terminal.
///
/// Returns as soon as `fetch_status` yields `Successful`. A failure status
/// stops polling immediately; no further status requests are made.
///
/// # Errors
///
/// - [`MediasiteError::JobFailed`] for `Failed`, `Disabled` or `Cancelled`.
/// - [`MediasiteError::PollTimeout`] once `max_attempts` checks have not
///   reached a terminal state.
/// - Any error returned by `fetch_status`.
pub async fn poll_until_complete<F, Fut>(
    policy: &PollPolicy,
    job_link: &str,
    mut fetch_status: F,
) -> Result<PollOutcome, MediasiteError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<JobStatus, MediasiteError>>,
{
    let mut waits = 0u32;
    for attempt in 1..=policy.max_attempts {
        let status = fetch_status().await?;

        if status.is_success() {
            tracing::info!(job_link, waits, "job was successful");
            return Ok(PollOutcome { waits });
        }

        if status.is_failure() {
            tracing::error!(job_link, status = %status, "job did not complete successfully");
            return Err(MediasiteError::JobFailed {
                job_link: job_link.to_owned(),
                status: status.to_string(),
            });
        }

        if attempt == policy.max_attempts {
            break;
        }

        tracing::info!(job_link, status = %status, attempt, "waiting for job to complete");
        tokio::time::sleep(policy.interval).await;
        waits += 1;
    }

    Err(MediasiteError::PollTimeout {
        job_link: job_link.to_owned(),
        attempts: policy.max_attempts,
    })
}

impl MediasiteClient {
    /// Polls a job link until the job succeeds.
    ///
    /// # Errors
    ///
    /// See [`poll_until_complete`].
    pub async fn await_job(
        &self,
        job_link: &str,
        policy: &PollPolicy,
    ) -> Result<PollOutcome, MediasiteError> {
        poll_until_complete(policy, job_link, || self.job_status(job_link)).await
    }
}
