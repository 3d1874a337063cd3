/// Error types for tab group operations
use thiserror::Error;

/// Failure of the key-value persistence backend
#[derive(Error, Debug, Clone, PartialEq)]
#[error("storage backend unavailable: {0}")]
pub struct StorageError(pub String);

/// Failure of a single call into the host's tab interface
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{operation} failed: {message}")]
pub struct HostError {
    pub operation: &'static str,
    pub message: String,
}

impl HostError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        HostError {
            operation,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum TabGroupError {
    #[error(transparent)]
    BackendUnavailable(#[from] StorageError),

    #[error("stored tab groups could not be decoded: {0}")]
    CorruptState(#[source] serde_json::Error),

    #[error("tab groups could not be encoded: {0}")]
    EncodeState(#[source] serde_json::Error),

    #[error("{kind} index {index} out of range (len {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("tab operation failed: {0}")]
    HostTabOperationFailed(#[from] HostError),

    #[error("tab record {0} has no url")]
    MalformedRecord(String),

    #[error("current window has no tabs to capture")]
    NothingToCapture,

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[source] serde_json::Error),
}
