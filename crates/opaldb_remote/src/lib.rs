//! # OpalDB Remote
//!
//! Remote collection client for OpalDB.
//!
//! This crate provides:
//! - Service-call wire protocol (CBOR-framed request/response)
//! - Transport abstraction with HTTP framing and a mock for testing
//! - A client owning its own execution context
//! - Remote collection operations (find, count, insert)
//! - Single-shot completions for asynchronous results
//!
//! ## Architecture
//!
//! Every operation is a single service call: the collection builds a
//! [`ServiceRequest`], the client dispatches it onto its runtime, the
//! transport performs one round-trip, and the decoded result fulfills a
//! [`Completion`] exactly once. Callers never block; the completion may
//! fire on any of the client's worker threads.
//!
//! ## Key Invariants
//!
//! - A completion is observed exactly once: fulfilled by the operation,
//!   or fulfilled with a cancellation error when dropped unfulfilled
//! - Operations never retry; retry policy belongs below the transport
//! - The caller's thread performs no network or scheduling work

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod collection;
mod completion;
mod descriptor;
mod error;
mod http;
mod protocol;
mod transport;

pub use client::RemoteClient;
pub use collection::{FindOptions, FindRequest, RemoteCollection};
pub use completion::Completion;
pub use descriptor::QueryDescriptor;
pub use error::{RemoteError, RemoteResult};
pub use http::{HttpClient, HttpTransport};
pub use protocol::{ServiceRequest, ServiceResponse};
pub use transport::{MockTransport, RemoteTransport};
