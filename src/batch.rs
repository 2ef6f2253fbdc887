use crate::classifier::Verdict;
use crate::engine::ScoringEngine;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Outcome for one URL of a batch. Failures are reported in place so the
/// output stays one-to-one with the input.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Scanned(Verdict),
    Failed { url: String, error: String },
}

impl BatchItem {
    fn from_result(url: &str, result: crate::error::Result<Verdict>) -> Self {
        match result {
            Ok(verdict) => BatchItem::Scanned(verdict),
            Err(e) => {
                log::warn!("Batch item '{}' not scanned: {}", url, e);
                BatchItem::Failed {
                    url: url.to_string(),
                    error: e.to_string(),
                }
            }
        }
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            BatchItem::Scanned(verdict) => Some(verdict),
            BatchItem::Failed { .. } => None,
        }
    }
}

impl ScoringEngine {
    /// Evaluate every URL in order on the calling thread.
    pub fn assess_batch(&self, urls: &[String]) -> Vec<BatchItem> {
        urls.iter()
            .map(|url| BatchItem::from_result(url, self.assess(url)))
            .collect()
    }
}

/// Fan a batch out over the blocking pool. Results come back in input
/// order. `timeout` is one deadline for the whole batch, applied to every
/// item including a single-URL batch; items still running when it elapses
/// are reported as failed without affecting the rest.
///
/// Blocking tasks cannot be cancelled: a timed-out evaluation keeps running
/// on the pool until it finishes and its result is discarded.
pub async fn scan_batch(
    engine: Arc<ScoringEngine>,
    urls: Vec<String>,
    timeout: Duration,
) -> Vec<BatchItem> {
    let deadline = Instant::now() + timeout;
    let handles: Vec<(String, JoinHandle<BatchItem>)> = urls
        .into_iter()
        .map(|url| {
            let engine = Arc::clone(&engine);
            let task_url = url.clone();
            let handle = tokio::task::spawn_blocking(move || {
                BatchItem::from_result(&task_url, engine.assess(&task_url))
            });
            (url, handle)
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (url, handle) in handles {
        let item = match tokio::time::timeout_at(deadline, handle).await {
            Ok(Ok(item)) => item,
            Ok(Err(e)) => {
                log::error!("Scan task for '{}' failed: {}", url, e);
                BatchItem::Failed {
                    url,
                    error: format!("scan task failed: {}", e),
                }
            }
            Err(_) => {
                log::warn!("Scan of '{}' timed out after {:?}", url, timeout);
                BatchItem::Failed {
                    url,
                    error: format!("timed out after {:?}", timeout),
                }
            }
        };
        results.push(item);
    }
    results
}
