//! Error types for the remote client.

use opaldb_document::DocumentError;
use thiserror::Error;

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Errors that can occur during a remote operation.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Network or transport error.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// Protocol error (invalid message framing or unexpected payload shape).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The service executed the call and reported a failure.
    #[error("service error: {0}")]
    Service(String),

    /// A parameter document failed validation.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The operation was abandoned before a result was produced.
    #[error("operation cancelled")]
    Cancelled,

    /// Not connected to the remote service.
    #[error("not connected to remote service")]
    NotConnected,

    /// The client's execution context could not be started.
    #[error("execution context unavailable: {0}")]
    Executor(String),
}

impl RemoteError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if this error can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteError::Transport { retryable, .. } => *retryable,
            RemoteError::Service(_) => true,
            _ => false,
        }
    }
}
