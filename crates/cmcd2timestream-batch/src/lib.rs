// cmcd2timestream-batch - Accumulates mapped records into write-sized batches
//
// The store accepts at most RECORD_QUOTA records per write call. A batch is
// ready exactly when it reaches the configured size; whatever remains once the
// input is exhausted is drained as a final partial batch by the caller.

use cmcd2timestream_core::MappedRecord;
use thiserror::Error;

/// Maximum number of records the store accepts in one write call.
pub const RECORD_QUOTA: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    pub max_records: usize,
}

impl BatchConfig {
    pub fn new(max_records: usize) -> Result<Self, BatchError> {
        if max_records == 0 || max_records > RECORD_QUOTA {
            return Err(BatchError::InvalidSize {
                requested: max_records,
                quota: RECORD_QUOTA,
            });
        }
        Ok(Self { max_records })
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_records: RECORD_QUOTA,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("batch size {requested} is outside 1..={quota}")]
    InvalidSize { requested: usize, quota: usize },

    /// The batch is full and must be drained before another record is added.
    #[error("batch is full ({size} records); drain it before adding more")]
    Full { size: usize },
}

/// A drained group of records submitted in one write call.
///
/// Record order is input order; rejection indices reported by the store refer
/// to positions in [`Batch::records`].
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    sequence: u64,
    records: Vec<MappedRecord>,
}

impl Batch {
    pub fn new(sequence: u64, records: Vec<MappedRecord>) -> Self {
        Self { sequence, records }
    }

    /// Zero-based position of this batch among those drained by one batcher.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn records(&self) -> &[MappedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<MappedRecord> {
        self.records
    }
}

/// Per-invocation record buffer. Not shared between invocations.
#[derive(Debug)]
pub struct Batcher {
    config: BatchConfig,
    pending: Vec<MappedRecord>,
    drained: u64,
}

impl Batcher {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            pending: Vec::with_capacity(config.max_records),
            config,
            drained: 0,
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Buffer a record. Fails once the batch is full, so the size bound can
    /// never be exceeded.
    pub fn add(&mut self, record: MappedRecord) -> Result<(), BatchError> {
        if self.pending.len() >= self.config.max_records {
            return Err(BatchError::Full {
                size: self.pending.len(),
            });
        }
        self.pending.push(record);
        Ok(())
    }

    /// True exactly when the buffered batch has reached its size.
    pub fn should_flush(&self) -> bool {
        self.pending.len() == self.config.max_records
    }

    /// Take the buffered records as a batch, leaving the buffer empty.
    pub fn drain(&mut self) -> Batch {
        let records = std::mem::replace(
            &mut self.pending,
            Vec::with_capacity(self.config.max_records),
        );
        let batch = Batch::new(self.drained, records);
        self.drained += 1;
        tracing::trace!(
            sequence = batch.sequence(),
            batch_size = batch.len(),
            "Drained batch"
        );
        batch
    }

    /// Drain whatever is buffered, or nothing if the buffer is empty.
    pub fn drain_remaining(&mut self) -> Option<Batch> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.drain())
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of batches drained so far.
    pub fn batches_drained(&self) -> u64 {
        self.drained
    }
}

impl Default for Batcher {
    fn default() -> Self {
        Self::new(BatchConfig::default())
    }
}
