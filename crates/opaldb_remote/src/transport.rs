//! Transport layer abstraction for remote operations.

use crate::error::{RemoteError, RemoteResult};
use crate::protocol::{ServiceRequest, ServiceResponse};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// A remote transport performs one service-call round-trip.
///
/// This trait abstracts the network layer, allowing for different
/// implementations (HTTP, an embedder-supplied callback, mock for testing).
/// Implementations block the calling thread; the client dispatches calls
/// onto its own execution context.
pub trait RemoteTransport: Send + Sync {
    /// Sends a request and returns the service's response.
    fn call(&self, request: &ServiceRequest) -> RemoteResult<ServiceResponse>;
}

/// A canned reply for [`MockTransport`].
enum MockReply {
    Result(Option<serde_json::Value>),
    Failure(String),
    Error(RemoteError),
}

/// A mock transport for testing.
///
/// Records every request it receives and replays canned replies in FIFO
/// order. Calling it with no reply queued is a protocol error.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<ServiceRequest>>,
}

impl MockTransport {
    /// Creates a new mock transport with no queued replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply carrying `result`.
    pub fn enqueue_result(&self, result: Option<serde_json::Value>) {
        self.replies.lock().push_back(MockReply::Result(result));
    }

    /// Queues a service-reported failure.
    pub fn enqueue_failure(&self, message: impl Into<String>) {
        self.replies
            .lock()
            .push_back(MockReply::Failure(message.into()));
    }

    /// Queues a transport-level error.
    pub fn enqueue_error(&self, error: RemoteError) {
        self.replies.lock().push_back(MockReply::Error(error));
    }

    /// Returns the requests received so far.
    pub fn requests(&self) -> Vec<ServiceRequest> {
        self.requests.lock().clone()
    }

    /// Returns the number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl RemoteTransport for MockTransport {
    fn call(&self, request: &ServiceRequest) -> RemoteResult<ServiceResponse> {
        self.requests.lock().push(request.clone());

        let reply = self
            .replies
            .lock()
            .pop_front()
            .ok_or_else(|| RemoteError::Protocol("no mock reply queued".into()))?;

        match reply {
            MockReply::Result(Some(value)) => Ok(ServiceResponse::ok(request.request_id, value)),
            MockReply::Result(None) => Ok(ServiceResponse::empty(request.request_id)),
            MockReply::Failure(message) => Ok(ServiceResponse::failure(request.request_id, message)),
            MockReply::Error(error) => Err(error),
        }
    }
}
