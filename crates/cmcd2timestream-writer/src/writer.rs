//! Core writer types

use async_trait::async_trait;
use cmcd2timestream_batch::Batch;
use serde::Serialize;

use crate::error::Result;

/// A record the store refused within an otherwise successful call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// Position of the record within the submitted batch.
    pub index: usize,
    pub reason: String,
    /// Version already stored for the point, when that caused the rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_version: Option<i64>,
}

impl Rejection {
    pub fn new(index: usize, reason: impl Into<String>) -> Self {
        Self {
            index,
            reason: reason.into(),
            existing_version: None,
        }
    }
}

/// Result of a write call that reached the store.
///
/// Accepted records are durably written; rejected ones are not retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteOutcome {
    pub submitted: usize,
    pub accepted: usize,
    pub rejections: Vec<Rejection>,
}

impl WriteOutcome {
    pub fn accepted_all(submitted: usize) -> Self {
        Self {
            submitted,
            accepted: submitted,
            rejections: Vec::new(),
        }
    }

    /// Rejection indices outside the batch are kept for logging but do not
    /// count against the accepted total.
    pub fn partial(submitted: usize, rejections: Vec<Rejection>) -> Self {
        let rejected_in_batch = rejections.iter().filter(|r| r.index < submitted).count();
        Self {
            submitted,
            accepted: submitted.saturating_sub(rejected_in_batch),
            rejections,
        }
    }

    pub fn rejected(&self) -> usize {
        self.rejections.len()
    }

    pub fn is_complete(&self) -> bool {
        self.rejections.is_empty()
    }
}

/// Destination for drained batches.
///
/// One call per batch. `Err` means the whole call failed and nothing was
/// written; a partial rejection is an `Ok` outcome.
#[async_trait]
pub trait RecordWriter: Send + Sync {
    async fn write(&self, batch: &Batch) -> Result<WriteOutcome>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_outcome_counts() {
        let outcome = WriteOutcome::partial(
            100,
            vec![Rejection::new(3, "bad"), Rejection::new(7, "worse")],
        );
        assert_eq!(outcome.accepted, 98);
        assert_eq!(outcome.rejected(), 2);
        assert!(!outcome.is_complete());
    }

    #[test]
    fn test_out_of_range_rejection_does_not_reduce_accepted() {
        let outcome = WriteOutcome::partial(2, vec![Rejection::new(5, "stale")]);
        assert_eq!(outcome.accepted, 2);
        assert_eq!(outcome.rejected(), 1);
    }
}
