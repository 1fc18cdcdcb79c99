//! Remote client construction and collection acquisition.
//!
//! The embedder supplies the HTTP stack as a callback, the same inversion
//! the managed bindings use: all network traffic is routed back through
//! the host platform's transport.

use crate::buffer::{required_str, OpalBuffer};
use crate::collection::COLLECTIONS;
use crate::error::{clear_last_error, set_last_error, OpalResult};
use crate::registry::HandleRegistry;
use crate::types::{OpalFinalizer, OpalHandle, SendPtr};
use opaldb_remote::{HttpClient, HttpTransport, RemoteClient};
use std::ffi::CString;
use std::sync::LazyLock;

/// Embedder-supplied HTTP POST.
///
/// Performs one blocking POST of `body` to `url` and stores the response
/// body in `response`, allocated with `opaldb_buffer_alloc`. Returns 0 on
/// success; any other value reports a transport failure, in which case
/// `response` may carry a UTF-8 failure message instead. May be invoked
/// from any of the client's worker threads.
pub type OpalHttpPost = extern "C" fn(
    user_data: *mut std::ffi::c_void,
    url: *const std::ffi::c_char,
    body: *const u8,
    body_len: usize,
    response: *mut OpalBuffer,
) -> i32;

static CLIENTS: LazyLock<HandleRegistry<RemoteClient>> = LazyLock::new(HandleRegistry::new);

/// An [`HttpClient`] backed by the embedder's POST callback.
struct CallbackHttpClient {
    post: OpalHttpPost,
    user_data: SendPtr,
}

impl HttpClient for CallbackHttpClient {
    fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, String> {
        let url = CString::new(url).map_err(|_| "url contained an interior NUL byte".to_string())?;

        let mut response = OpalBuffer::empty();
        let status = (self.post)(
            self.user_data.0,
            url.as_ptr(),
            body.as_ptr(),
            body.len(),
            &mut response,
        );
        // Safety: the embedder fills `response` via opaldb_buffer_alloc,
        // so the allocation round-trips through this library.
        let bytes = unsafe { response.into_vec() };

        if status == 0 {
            Ok(bytes)
        } else if bytes.is_empty() {
            Err(format!("transport callback failed with status {status}"))
        } else {
            Err(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

extern "C" fn finalize_client(handle: OpalHandle) {
    tracing::trace!(handle, "finalizing remote client");
    CLIENTS.remove(handle);
}

/// Creates a remote client over the embedder's HTTP callback.
///
/// # Arguments
///
/// * `base_url` - Base URL of the remote service (null-terminated UTF-8)
/// * `http_post` - The embedder's POST implementation
/// * `http_user_data` - Opaque pointer passed back to `http_post`
/// * `out_handle` - Output pointer for the client handle
///
/// # Returns
///
/// `OpalResult::Ok` on success, error code otherwise.
///
/// # Safety
///
/// - `base_url` must be a valid null-terminated UTF-8 string
/// - `out_handle` must be a valid pointer
/// - `http_user_data` must remain valid, and usable from any thread,
///   until the client is finalized
#[no_mangle]
pub unsafe extern "C" fn opaldb_client_create(
    base_url: *const std::ffi::c_char,
    http_post: OpalHttpPost,
    http_user_data: *mut std::ffi::c_void,
    out_handle: *mut OpalHandle,
) -> OpalResult {
    clear_last_error();

    if out_handle.is_null() {
        set_last_error("null pointer argument");
        return OpalResult::NullPointer;
    }
    let base_url = match required_str(base_url, "base_url") {
        Ok(s) => s,
        Err(code) => return code,
    };

    let http = CallbackHttpClient {
        post: http_post,
        user_data: SendPtr(http_user_data),
    };
    let transport = HttpTransport::new(base_url, http);

    match RemoteClient::new(transport) {
        Ok(client) => match CLIENTS.insert(client) {
            Ok(handle) => {
                *out_handle = handle;
                OpalResult::Ok
            }
            Err(e) => {
                set_last_error(e.to_string());
                OpalResult::RegistryFull
            }
        },
        Err(e) => {
            set_last_error(e.to_string());
            OpalResult::Error
        }
    }
}

/// Returns the finalizer entry point for client handles.
///
/// The address is stable for the lifetime of the library. Finalizing a
/// client shuts its execution context down in the background; collections
/// already obtained from it stay usable.
#[no_mangle]
pub extern "C" fn opaldb_client_finalizer() -> OpalFinalizer {
    finalize_client
}

/// Obtains a collection proxy from a client.
///
/// # Arguments
///
/// * `client` - The client handle
/// * `database` - Database name (null-terminated UTF-8)
/// * `collection` - Collection name (null-terminated UTF-8)
/// * `out_handle` - Output pointer for the collection handle
///
/// # Returns
///
/// `OpalResult::Ok` on success, error code otherwise.
///
/// # Safety
///
/// - `database` and `collection` must be valid null-terminated UTF-8 strings
/// - `out_handle` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn opaldb_client_collection(
    client: OpalHandle,
    database: *const std::ffi::c_char,
    collection: *const std::ffi::c_char,
    out_handle: *mut OpalHandle,
) -> OpalResult {
    clear_last_error();

    if out_handle.is_null() {
        set_last_error("null pointer argument");
        return OpalResult::NullPointer;
    }
    let Some(client) = CLIENTS.get(client) else {
        set_last_error("unknown client handle");
        return OpalResult::InvalidHandle;
    };
    let database = match required_str(database, "database") {
        Ok(s) => s,
        Err(code) => return code,
    };
    let collection = match required_str(collection, "collection") {
        Ok(s) => s,
        Err(code) => return code,
    };

    match COLLECTIONS.insert(client.collection(database, collection)) {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    extern "C" fn refusing_post(
        _user_data: *mut std::ffi::c_void,
        _url: *const std::ffi::c_char,
        _body: *const u8,
        _body_len: usize,
        _response: *mut OpalBuffer,
    ) -> i32 {
        1
    }

    fn create_client() -> OpalHandle {
        let url = CString::new("http://service.local").unwrap();
        let mut handle: OpalHandle = 0;
        let result = unsafe {
            opaldb_client_create(url.as_ptr(), refusing_post, std::ptr::null_mut(), &mut handle)
        };
        assert_eq!(result, OpalResult::Ok);
        assert_ne!(handle, 0);
        handle
    }

    #[test]
    fn client_lifecycle() {
        let handle = create_client();
        assert!(CLIENTS.get(handle).is_some());

        opaldb_client_finalizer()(handle);
        assert!(CLIENTS.get(handle).is_none());

        // Second invocation is a no-op.
        opaldb_client_finalizer()(handle);
    }

    #[test]
    fn collection_acquisition() {
        let client = create_client();

        let database = CString::new("test_data").unwrap();
        let name = CString::new("events").unwrap();
        let mut collection: OpalHandle = 0;
        let result = unsafe {
            opaldb_client_collection(client, database.as_ptr(), name.as_ptr(), &mut collection)
        };
        assert_eq!(result, OpalResult::Ok);

        let proxy = COLLECTIONS.get(collection).unwrap();
        assert_eq!(proxy.database(), "test_data");
        assert_eq!(proxy.name(), "events");

        crate::collection::opaldb_collection_finalizer()(collection);
        opaldb_client_finalizer()(client);
    }

    #[test]
    fn stale_client_handle_is_rejected() {
        let client = create_client();
        opaldb_client_finalizer()(client);

        let database = CString::new("test_data").unwrap();
        let name = CString::new("events").unwrap();
        let mut collection: OpalHandle = 0;
        let result = unsafe {
            opaldb_client_collection(client, database.as_ptr(), name.as_ptr(), &mut collection)
        };
        assert_eq!(result, OpalResult::InvalidHandle);
        assert_eq!(collection, 0);
    }

    #[test]
    fn create_rejects_bad_arguments() {
        let url = CString::new("http://service.local").unwrap();

        let result = unsafe {
            opaldb_client_create(
                url.as_ptr(),
                refusing_post,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
            )
        };
        assert_eq!(result, OpalResult::NullPointer);

        let mut handle: OpalHandle = 0;
        let result = unsafe {
            opaldb_client_create(std::ptr::null(), refusing_post, std::ptr::null_mut(), &mut handle)
        };
        assert_eq!(result, OpalResult::NullPointer);
    }
}
