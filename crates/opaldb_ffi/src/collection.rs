//! Remote collection adapters.
//!
//! Each entry point validates its parameters, delegates once to the
//! remote collection, and returns immediately; results arrive through the
//! supplied callback, exactly once per dispatched operation. Validation
//! failures are reported synchronously through the returned code and
//! never invoke the callback.

use crate::buffer::{optional_str, required_str};
use crate::callback::bridge_callback;
use crate::error::{clear_last_error, set_last_error, OpalResult};
use crate::registry::HandleRegistry;
use crate::types::{FindDispatch, OpalCallback, OpalFinalizer, OpalHandle};
use opaldb_document::{encode_documents, parse_document, parse_document_array, Document};
use opaldb_remote::{FindOptions, FindRequest, RemoteCollection};
use serde_json::Value;
use std::sync::{Arc, LazyLock};

pub(crate) static COLLECTIONS: LazyLock<HandleRegistry<RemoteCollection>> =
    LazyLock::new(HandleRegistry::new);

extern "C" fn finalize_collection(handle: OpalHandle) {
    tracing::trace!(handle, "finalizing remote collection");
    COLLECTIONS.remove(handle);
}

/// Returns the finalizer entry point for collection handles.
///
/// The address is stable for the lifetime of the library.
#[no_mangle]
pub extern "C" fn opaldb_collection_finalizer() -> OpalFinalizer {
    finalize_collection
}

fn resolve(handle: OpalHandle) -> Result<Arc<RemoteCollection>, OpalResult> {
    COLLECTIONS.get(handle).ok_or_else(|| {
        set_last_error("unknown collection handle");
        OpalResult::InvalidHandle
    })
}

fn non_negative(limit: i64) -> Result<u64, OpalResult> {
    u64::try_from(limit).map_err(|_| {
        set_last_error("limit must not be negative");
        OpalResult::InvalidArgument
    })
}

unsafe fn parse_required(
    ptr: *const std::ffi::c_char,
    param: &str,
) -> Result<Document, OpalResult> {
    let text = required_str(ptr, param)?;
    parse_document(text, param).map_err(|e| {
        set_last_error(e.to_string());
        OpalResult::MalformedDocument
    })
}

unsafe fn parse_optional(
    ptr: *const std::ffi::c_char,
    param: &str,
) -> Result<Option<Document>, OpalResult> {
    match optional_str(ptr, param)? {
        Some(text) => match parse_document(text, param) {
            Ok(doc) => Ok(Some(doc)),
            Err(e) => {
                set_last_error(e.to_string());
                Err(OpalResult::MalformedDocument)
            }
        },
        None => Ok(None),
    }
}

/// Finds documents in a remote collection.
///
/// `find_type` selects the variant: 0 performs a filter-only find and
/// never reads `projection`, `sort`, or `limit`; 1 performs a find with
/// options, where `projection` and `sort` may be null to mean absent.
/// Any other value is rejected before anything is parsed.
///
/// # Arguments
///
/// * `collection` - The collection handle
/// * `find_type` - Find variant discriminator
/// * `filter` - Filter document (null-terminated JSON text)
/// * `projection` - Optional projection document
/// * `sort` - Optional sort document
/// * `limit` - Maximum number of results; 0 means no limit
/// * `callback` - Completion callback
/// * `user_data` - Opaque pointer passed back to `callback`
///
/// # Returns
///
/// `OpalResult::Ok` when the operation was dispatched; the callback then
/// fires exactly once. An error code when validation failed; the callback
/// is never invoked in that case.
///
/// # Safety
///
/// - String arguments must be valid null-terminated strings when non-null
/// - `user_data` must remain valid, and usable from any thread, until the
///   callback has fired
#[no_mangle]
pub unsafe extern "C" fn opaldb_collection_find(
    collection: OpalHandle,
    find_type: i32,
    filter: *const std::ffi::c_char,
    projection: *const std::ffi::c_char,
    sort: *const std::ffi::c_char,
    limit: i64,
    callback: OpalCallback,
    user_data: *mut std::ffi::c_void,
) -> OpalResult {
    clear_last_error();
    tracing::trace!(collection, find_type, "find");

    let target = match resolve(collection) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let dispatch = match FindDispatch::try_from(find_type) {
        Ok(d) => d,
        Err(other) => {
            set_last_error(format!("unrecognized find type {other}"));
            return OpalResult::InvalidArgument;
        }
    };
    let filter = match parse_required(filter, "filter") {
        Ok(d) => d,
        Err(code) => return code,
    };

    let request = match dispatch {
        FindDispatch::Find => FindRequest::Filter(filter),
        FindDispatch::FindWithOptions => {
            let limit = match non_negative(limit) {
                Ok(l) => l,
                Err(code) => return code,
            };
            let projection = match parse_optional(projection, "projection") {
                Ok(p) => p,
                Err(code) => return code,
            };
            let sort = match parse_optional(sort, "sort") {
                Ok(s) => s,
                Err(code) => return code,
            };
            FindRequest::WithOptions {
                filter,
                options: FindOptions {
                    limit,
                    projection,
                    sort,
                },
            }
        }
    };

    let completion = bridge_callback(callback, user_data, |result: Option<Vec<Document>>| {
        result.map(|documents| encode_documents(&documents))
    });
    target.find(request, completion);
    OpalResult::Ok
}

/// Counts documents matching a filter.
///
/// The callback receives the count as a decimal payload.
///
/// # Arguments
///
/// * `collection` - The collection handle
/// * `filter` - Filter document (null-terminated JSON text)
/// * `limit` - Maximum count; 0 means no limit
/// * `callback` - Completion callback
/// * `user_data` - Opaque pointer passed back to `callback`
///
/// # Returns
///
/// `OpalResult::Ok` when dispatched, error code otherwise.
///
/// # Safety
///
/// Same contract as [`opaldb_collection_find`].
#[no_mangle]
pub unsafe extern "C" fn opaldb_collection_count(
    collection: OpalHandle,
    filter: *const std::ffi::c_char,
    limit: i64,
    callback: OpalCallback,
    user_data: *mut std::ffi::c_void,
) -> OpalResult {
    clear_last_error();
    tracing::trace!(collection, "count");

    let target = match resolve(collection) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let filter = match parse_required(filter, "filter") {
        Ok(d) => d,
        Err(code) => return code,
    };
    let limit = match non_negative(limit) {
        Ok(l) => l,
        Err(code) => return code,
    };

    let completion = bridge_callback(callback, user_data, |count: i64| Some(count.to_string()));
    target.count(filter, limit, completion);
    OpalResult::Ok
}

/// Inserts one document into a remote collection.
///
/// The callback receives the inserted id as serialized JSON.
///
/// # Arguments
///
/// * `collection` - The collection handle
/// * `document` - Document to insert (null-terminated JSON text)
/// * `callback` - Completion callback
/// * `user_data` - Opaque pointer passed back to `callback`
///
/// # Returns
///
/// `OpalResult::Ok` when dispatched, error code otherwise.
///
/// # Safety
///
/// Same contract as [`opaldb_collection_find`].
#[no_mangle]
pub unsafe extern "C" fn opaldb_collection_insert_one(
    collection: OpalHandle,
    document: *const std::ffi::c_char,
    callback: OpalCallback,
    user_data: *mut std::ffi::c_void,
) -> OpalResult {
    clear_last_error();
    tracing::trace!(collection, "insert_one");

    let target = match resolve(collection) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let document = match parse_required(document, "document") {
        Ok(d) => d,
        Err(code) => return code,
    };

    let completion = bridge_callback(callback, user_data, |id: Value| Some(id.to_string()));
    target.insert_one(document, completion);
    OpalResult::Ok
}

/// Inserts many documents into a remote collection.
///
/// `documents` must be a JSON array whose elements are all documents. The
/// callback receives the inserted ids as a serialized JSON array.
///
/// # Arguments
///
/// * `collection` - The collection handle
/// * `documents` - Documents to insert (null-terminated JSON text)
/// * `callback` - Completion callback
/// * `user_data` - Opaque pointer passed back to `callback`
///
/// # Returns
///
/// `OpalResult::Ok` when dispatched, error code otherwise.
///
/// # Safety
///
/// Same contract as [`opaldb_collection_find`].
#[no_mangle]
pub unsafe extern "C" fn opaldb_collection_insert_many(
    collection: OpalHandle,
    documents: *const std::ffi::c_char,
    callback: OpalCallback,
    user_data: *mut std::ffi::c_void,
) -> OpalResult {
    clear_last_error();
    tracing::trace!(collection, "insert_many");

    let target = match resolve(collection) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let text = match required_str(documents, "documents") {
        Ok(s) => s,
        Err(code) => return code,
    };
    let documents = match parse_document_array(text, "documents") {
        Ok(d) => d,
        Err(e) => {
            set_last_error(e.to_string());
            return OpalResult::MalformedDocument;
        }
    };

    let completion = bridge_callback(callback, user_data, |ids: Vec<Value>| {
        Some(Value::Array(ids).to_string())
    });
    target.insert_many(documents, completion);
    OpalResult::Ok
}
