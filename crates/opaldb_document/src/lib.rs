//! # OpalDB Document
//!
//! Text-encoded document values for the OpalDB bindings.
//!
//! Parameters cross the binding boundary as JSON text. Before any of them
//! reaches a remote operation, the text must parse and its top-level value
//! must be of the required structural kind: a filter is a document, an
//! insert-many payload is an array of documents, and so on. This crate
//! provides:
//! - The [`Document`] type (a validated JSON object)
//! - Kind-checked parsing with errors that name the offending parameter
//! - Encoding of result payloads back to JSON text
//!
//! ## Usage
//!
//! ```
//! use opaldb_document::parse_document;
//!
//! let filter = parse_document(r#"{"hello": "world"}"#, "filter").unwrap();
//! assert_eq!(filter.len(), 1);
//!
//! let err = parse_document("[1, 2, 3]", "filter").unwrap_err();
//! assert!(err.to_string().contains("filter"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod error;
mod parse;

pub use document::{Document, ValueKind};
pub use error::{DocumentError, DocumentResult};
pub use parse::{encode_documents, parse_document, parse_document_array};
