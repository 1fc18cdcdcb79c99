//! Type definitions for FFI.

use crate::error::OpalResult;

/// An opaque handle to a native object.
///
/// Handles pack a 32-bit registry slot index and a 32-bit generation.
/// Never interpret or modify the value; 0 is the invalid sentinel and is
/// never issued for a live object.
pub type OpalHandle = u64;

/// The invalid handle value.
pub const OPALDB_INVALID_HANDLE: OpalHandle = 0;

/// Discriminator value selecting a filter-only find.
pub const OPALDB_FIND: i32 = 0;

/// Discriminator value selecting a find with options.
pub const OPALDB_FIND_WITH_OPTIONS: i32 = 1;

/// A finalizer entry point.
///
/// The managed runtime's cleanup mechanism invokes the address with the
/// handle of the object to release, at most once per live handle.
pub type OpalFinalizer = extern "C" fn(handle: OpalHandle);

/// Completion callback for asynchronous operations.
///
/// Invoked exactly once per dispatched operation, possibly on a different
/// thread than the one that issued the call. On success `payload` carries
/// the serialized result (or null when the operation produced no value)
/// and `error_message` is null; on failure `payload` is null and
/// `error_message` describes the error. Both pointers are only valid for
/// the duration of the invocation.
pub type OpalCallback = extern "C" fn(
    user_data: *mut std::ffi::c_void,
    code: OpalResult,
    payload: *const std::ffi::c_char,
    error_message: *const std::ffi::c_char,
);

/// The find variant selected by the caller's discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindDispatch {
    /// Filter-only find; projection/sort/limit are never read.
    Find,
    /// Find with projection, sort, and limit options.
    FindWithOptions,
}

impl TryFrom<i32> for FindDispatch {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, i32> {
        match value {
            OPALDB_FIND => Ok(FindDispatch::Find),
            OPALDB_FIND_WITH_OPTIONS => Ok(FindDispatch::FindWithOptions),
            other => Err(other),
        }
    }
}

/// A pointer the embedder guarantees is valid to use from any thread.
///
/// Completion callbacks may fire on the client's worker threads, so the
/// user-data pointer captured for them must cross threads. The embedder
/// owns the pointee and its synchronization, exactly as a managed
/// runtime's global reference is usable from any attached thread.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SendPtr(pub *mut std::ffi::c_void);

// Safety: validity across threads is part of the embedder contract for
// user-data pointers; this layer never dereferences them.
unsafe impl Send for SendPtr {}
unsafe impl Sync for SendPtr {}
