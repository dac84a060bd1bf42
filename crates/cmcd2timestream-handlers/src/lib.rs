//! Shared line processing for the Lambda and CLI runtimes
//!
//! Payloads become lines, lines become records, records are batched up to the
//! store quota and each batch is written once. Nothing in here fails the
//! invocation; every problem is logged and counted in [`ProcessingResult`].

pub mod processor;

pub use processor::{
    process_lines, process_payloads, PipelineOptions, ProcessingResult, Processor,
};
