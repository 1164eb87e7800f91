//! # Print Jobs and Job Sources
//!
//! The job shape the printer consumes, and the pull interface the watchdog
//! polls. The queue server itself is not our concern; we only see its
//! "next job or none" boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MicrolineError;

/// One queued print job: a name for logging plus an ordered sequence of
/// text blocks, each printed from the top of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintJob {
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<String>,
}

/// A source of pending print jobs.
#[async_trait]
pub trait JobSource {
    /// Fetch the next pending job, or `None` when the queue is empty.
    async fn next_job(&mut self) -> Result<Option<PrintJob>, MicrolineError>;
}

/// Job source backed by the remote queue's HTTP endpoint.
///
/// `GET {base_url}/api/dotmatrix/queue/next` returns the next job as JSON,
/// or `null` / `{}` / HTTP 204 when nothing is pending.
pub struct HttpJobSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpJobSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!(
                "{}/api/dotmatrix/queue/next",
                base_url.trim_end_matches('/')
            ),
        }
    }
}

#[async_trait]
impl JobSource for HttpJobSource {
    async fn next_job(&mut self) -> Result<Option<PrintJob>, MicrolineError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| MicrolineError::Queue(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let response = response
            .error_for_status()
            .map_err(|e| MicrolineError::Queue(e.to_string()))?;
        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MicrolineError::Queue(e.to_string()))?;

        job_from_value(value)
    }
}

/// Interpret a queue response body. `null` and `{}` both mean "no job
/// pending" (the server sends either depending on version).
fn job_from_value(value: serde_json::Value) -> Result<Option<PrintJob>, MicrolineError> {
    if value.is_null() || value.as_object().is_some_and(|o| o.is_empty()) {
        return Ok(None);
    }
    let job: PrintJob =
        serde_json::from_value(value).map_err(|e| MicrolineError::Queue(e.to_string()))?;
    Ok(Some(job))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_job_deserializes() {
        let job = job_from_value(json!({
            "name": "weekly report",
            "blocks": ["page one", "page two"]
        }))
        .unwrap()
        .unwrap();
        assert_eq!(job.name, "weekly report");
        assert_eq!(job.blocks, vec!["page one", "page two"]);
    }

    #[test]
    fn test_null_and_empty_object_mean_no_job() {
        assert_eq!(job_from_value(json!(null)).unwrap(), None);
        assert_eq!(job_from_value(json!({})).unwrap(), None);
    }

    #[test]
    fn test_missing_blocks_defaults_to_empty() {
        let job = job_from_value(json!({ "name": "empty" })).unwrap().unwrap();
        assert!(job.blocks.is_empty());
    }

    #[test]
    fn test_malformed_job_is_a_queue_error() {
        let result = job_from_value(json!({ "blocks": "not a list" }));
        assert!(matches!(result, Err(MicrolineError::Queue(_))));
    }
}
