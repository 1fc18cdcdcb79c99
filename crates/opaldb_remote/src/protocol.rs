//! Service-call wire protocol.
//!
//! Every remote operation is one request/response exchange. Requests and
//! responses are CBOR-encoded for the transport; the documents they carry
//! keep their JSON value representation.

use crate::error::{RemoteError, RemoteResult};
use opaldb_document::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A single service call against a remote collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    /// Correlation id, echoed back by the service.
    pub request_id: Uuid,
    /// Operation name ("find", "count", "insertOne", "insertMany").
    pub name: String,
    /// Target database name.
    pub database: String,
    /// Target collection name.
    pub collection: String,
    /// Operation arguments (query, project, sort, limit, ...).
    pub arguments: Document,
}

impl ServiceRequest {
    /// Creates a new service request with a fresh correlation id.
    pub fn new(
        name: impl Into<String>,
        database: impl Into<String>,
        collection: impl Into<String>,
        arguments: Document,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            name: name.into(),
            database: database.into(),
            collection: collection.into(),
            arguments,
        }
    }

    /// Encodes the request to CBOR.
    pub fn encode(&self) -> RemoteResult<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| RemoteError::Protocol(format!("failed to encode request: {e}")))?;
        Ok(buf)
    }

    /// Decodes a request from CBOR.
    pub fn decode(bytes: &[u8]) -> RemoteResult<Self> {
        ciborium::from_reader(bytes)
            .map_err(|e| RemoteError::Protocol(format!("failed to decode request: {e}")))
    }
}

/// The service's reply to a [`ServiceRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    /// Correlation id of the request this answers.
    pub request_id: Uuid,
    /// Result payload; `None` when the operation produced no value.
    pub result: Option<Value>,
    /// Failure reported by the service, if any.
    pub error: Option<String>,
}

impl ServiceResponse {
    /// Creates a successful response carrying a result value.
    pub fn ok(request_id: Uuid, result: Value) -> Self {
        Self {
            request_id,
            result: Some(result),
            error: None,
        }
    }

    /// Creates a successful response with no result value.
    pub fn empty(request_id: Uuid) -> Self {
        Self {
            request_id,
            result: None,
            error: None,
        }
    }

    /// Creates a failure response.
    pub fn failure(request_id: Uuid, message: impl Into<String>) -> Self {
        Self {
            request_id,
            result: None,
            error: Some(message.into()),
        }
    }

    /// Encodes the response to CBOR.
    pub fn encode(&self) -> RemoteResult<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| RemoteError::Protocol(format!("failed to encode response: {e}")))?;
        Ok(buf)
    }

    /// Decodes a response from CBOR.
    pub fn decode(bytes: &[u8]) -> RemoteResult<Self> {
        ciborium::from_reader(bytes)
            .map_err(|e| RemoteError::Protocol(format!("failed to decode response: {e}")))
    }

    /// Converts the response into the operation's result payload.
    ///
    /// A reported service error takes precedence over any result value.
    pub fn into_result(self) -> RemoteResult<Option<Value>> {
        match self.error {
            Some(message) => Err(RemoteError::Service(message)),
            None => Ok(self.result),
        }
    }
}
