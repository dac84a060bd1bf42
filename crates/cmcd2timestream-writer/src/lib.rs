//! Amazon Timestream writer for cmcd2timestream
//!
//! Batches go out as single multi-measure `WriteRecords` calls. A call either
//! fails as a whole ([`WriterError`]) or returns a [`WriteOutcome`] that may
//! list per-record rejections.

mod encoding;
mod error;
mod flush;
mod init;
mod json_lines;
mod memory;
mod timestream;
mod writer;

pub use encoding::{encode_record, encode_records, WireDimension, WireMeasure, WireRecord};
pub use error::{ErrorCode, Result, TransportKind, WriterError};
pub use flush::{flush_batch, FlushReport};
pub use init::initialize_timestream_writer;
pub use json_lines::JsonLinesWriter;
pub use memory::{MemoryWriter, ScriptedResponse};
pub use timestream::TimestreamWriter;
pub use writer::{RecordWriter, Rejection, WriteOutcome};
