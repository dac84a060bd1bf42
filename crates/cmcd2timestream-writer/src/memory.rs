//! In-memory writer with scripted per-call responses.

use std::collections::VecDeque;

use async_trait::async_trait;
use cmcd2timestream_batch::Batch;
use parking_lot::Mutex;

use crate::error::{Result, TransportKind, WriterError};
use crate::writer::{RecordWriter, Rejection, WriteOutcome};

/// Response to give for one write call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedResponse {
    AcceptAll,
    /// Reject these batch-local indices with a reason each.
    Reject(Vec<(usize, String)>),
    Fail(TransportKind),
}

/// Records every batch it receives. Calls beyond the script accept everything.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    script: Mutex<VecDeque<ScriptedResponse>>,
    batches: Mutex<Vec<Batch>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(responses: impl IntoIterator<Item = ScriptedResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into_iter().collect()),
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Every batch passed to `write`, including failed calls.
    pub fn batches(&self) -> Vec<Batch> {
        self.batches.lock().clone()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().iter().map(Batch::len).collect()
    }
}

#[async_trait]
impl RecordWriter for MemoryWriter {
    async fn write(&self, batch: &Batch) -> Result<WriteOutcome> {
        self.batches.lock().push(batch.clone());
        let response = self
            .script
            .lock()
            .pop_front()
            .unwrap_or(ScriptedResponse::AcceptAll);

        match response {
            ScriptedResponse::AcceptAll => Ok(WriteOutcome::accepted_all(batch.len())),
            ScriptedResponse::Reject(rejected) => Ok(WriteOutcome::partial(
                batch.len(),
                rejected
                    .into_iter()
                    .map(|(index, reason)| Rejection::new(index, reason))
                    .collect(),
            )),
            ScriptedResponse::Fail(kind) => Err(WriterError::transport(
                kind,
                "memory",
                "memory",
                "scripted failure",
            )),
        }
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
