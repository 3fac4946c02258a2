//! uisync-worker: parse and print files off the interactive thread.
//!
//! Strictly request/response: a [`ParsePrintFilesRequest`] carries the
//! files to parse or print and the UIDs already used elsewhere in the
//! project; the reply carries one result per file, in request order. Message
//! IDs come from the worker that issues them. Dropping a response future
//! cancels nothing in flight, its result is simply discarded.

pub mod error;
pub mod messages;
pub mod worker;

pub use error::{WorkerError, WorkerResult};
pub use messages::{
    MessageId, ParseFile, ParseFileResult, ParseOrPrint, ParseOrPrintResult,
    ParsePrintFilesRequest, ParsePrintResultMessage, PrintCode, PrintCodeResult, decode, encode,
};
pub use worker::{ParsePrintWorker, WorkerConfig, WorkerHandle};
