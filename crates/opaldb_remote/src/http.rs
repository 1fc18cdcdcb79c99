//! HTTP transport implementation.
//!
//! This module frames service calls over HTTP POST. The actual HTTP client
//! is abstracted via a trait so the embedder can supply its own network
//! stack, which is how the managed-runtime bindings route all traffic
//! through the host platform's networking.

use crate::error::{RemoteError, RemoteResult};
use crate::protocol::{ServiceRequest, ServiceResponse};
use crate::transport::RemoteTransport;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport. This allows
/// using different HTTP libraries or an embedder-supplied callback.
pub trait HttpClient: Send + Sync {
    /// Sends a POST request and returns the response body.
    fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, String>;
}

impl<C: HttpClient + ?Sized> HttpClient for std::sync::Arc<C> {
    fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, String> {
        (**self).post(url, body)
    }
}

/// HTTP-based remote transport.
///
/// Uses CBOR encoding for request/response bodies. All service calls go
/// through a single endpoint; the request body identifies the operation.
pub struct HttpTransport<C: HttpClient> {
    /// Base URL of the remote service (e.g., "https://data.example.com").
    base_url: String,
    /// HTTP client implementation.
    client: C,
    /// Connection state.
    connected: AtomicBool,
    /// Last error message.
    last_error: RwLock<Option<String>>,
}

/// Endpoint handling service calls.
const CALL_ENDPOINT: &str = "/remote/call";

impl<C: HttpClient> HttpTransport<C> {
    /// Creates a new HTTP transport.
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        Self {
            base_url: base_url.into(),
            client,
            connected: AtomicBool::new(true),
            last_error: RwLock::new(None),
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the last transport error message.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Returns true if the transport considers itself connected.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Marks the transport as disconnected.
    pub fn close(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    fn set_error(&self, err: &str) {
        *self.last_error.write() = Some(err.to_string());
    }

    fn clear_error(&self) {
        *self.last_error.write() = None;
    }
}

impl<C: HttpClient> RemoteTransport for HttpTransport<C> {
    fn call(&self, request: &ServiceRequest) -> RemoteResult<ServiceResponse> {
        if !self.is_connected() {
            return Err(RemoteError::NotConnected);
        }

        let body = request.encode()?;
        let url = format!("{}{}", self.base_url, CALL_ENDPOINT);
        tracing::trace!(request_id = %request.request_id, name = %request.name, %url, "posting service call");

        let response_body = self.client.post(&url, body).map_err(|e| {
            self.set_error(&e);
            RemoteError::transport_retryable(e)
        })?;

        self.clear_error();

        let response = ServiceResponse::decode(&response_body)?;
        if response.request_id != request.request_id {
            return Err(RemoteError::Protocol(format!(
                "response correlation mismatch: sent {}, received {}",
                request.request_id, response.request_id
            )));
        }
        Ok(response)
    }
}
