use crate::messages::MessageId;
use thiserror::Error;

/// Failures at the worker boundary. Parse errors are not among them: those
/// travel inside the results as [`uisync_core::ParsedTextFile::Failure`].
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Parse/print worker is gone")]
    WorkerGone,
    #[error("Request {0} failed in the worker")]
    RequestFailed(MessageId),
    #[error("Expected a response to request {expected}, got {received}")]
    MismatchedResponse {
        expected: MessageId,
        received: MessageId,
    },
    #[error("Encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("Decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type WorkerResult<T> = Result<T, WorkerError>;
