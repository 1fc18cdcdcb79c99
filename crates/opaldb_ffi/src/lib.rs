//! # OpalDB FFI
//!
//! Stable C ABI for the OpalDB remote bindings.
//!
//! This crate provides:
//! - C-compatible function exports for managed-runtime embedders
//! - Generation-checked handle registries
//! - Error code mapping with a thread-local last-error message
//! - Callback bridging for asynchronous results
//!
//! ## Conventions
//!
//! Every entry point returns an [`error::OpalResult`] code; details of the
//! most recent failure on the calling thread are available through
//! `opaldb_last_error`. Handles are opaque 64-bit values; 0 is never a
//! valid handle. Objects are released through finalizer entry points whose
//! addresses are stable for the lifetime of the library, so a managed
//! runtime's cleanup mechanism can invoke them directly.

#![warn(missing_docs)]

pub mod buffer;
pub mod callback;
pub mod client;
pub mod collection;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod types;
