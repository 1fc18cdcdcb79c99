//! Query descriptor lifecycle.

use crate::error::{clear_last_error, set_last_error, OpalResult};
use crate::registry::HandleRegistry;
use crate::types::{OpalFinalizer, OpalHandle};
use opaldb_remote::QueryDescriptor;
use std::sync::LazyLock;

static DESCRIPTORS: LazyLock<HandleRegistry<QueryDescriptor>> = LazyLock::new(HandleRegistry::new);

extern "C" fn finalize_descriptor(handle: OpalHandle) {
    tracing::trace!(handle, "finalizing query descriptor");
    DESCRIPTORS.remove(handle);
}

/// Allocates a new query descriptor and returns its handle.
///
/// Fails only when the handle registry is exhausted.
///
/// # Arguments
///
/// * `out_handle` - Output pointer for the descriptor handle
///
/// # Returns
///
/// `OpalResult::Ok` on success, error code otherwise.
///
/// # Safety
///
/// `out_handle` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn opaldb_descriptor_create(out_handle: *mut OpalHandle) -> OpalResult {
    clear_last_error();

    if out_handle.is_null() {
        set_last_error("null pointer argument");
        return OpalResult::NullPointer;
    }

    match DESCRIPTORS.insert(QueryDescriptor::new()) {
        Ok(handle) => {
            *out_handle = handle;
            OpalResult::Ok
        }
        Err(e) => {
            set_last_error(e.to_string());
            OpalResult::RegistryFull
        }
    }
}

/// Returns the finalizer entry point for query descriptors.
///
/// The address is stable for the lifetime of the library. The managed
/// runtime's cleanup mechanism invokes it with a descriptor handle to
/// release the underlying object, at most once per live handle; invoking
/// it again with the same value is a no-op.
#[no_mangle]
pub extern "C" fn opaldb_descriptor_finalizer() -> OpalFinalizer {
    finalize_descriptor
}
