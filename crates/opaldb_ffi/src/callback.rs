//! Bridging native completions to managed callbacks.

use crate::error::{remote_error_code, OpalResult};
use crate::types::{OpalCallback, SendPtr};
use opaldb_remote::{Completion, RemoteResult};
use std::ffi::CString;

/// Builds a single-shot completion that forwards its result to a managed
/// callback.
///
/// `encode` turns the operation's result into the serialized payload, or
/// `None` when the operation produced no value. The callback is invoked
/// exactly once (the completion's own guarantees cover the cancellation
/// path), and the payload/error pointers are valid only for the duration
/// of the invocation.
pub(crate) fn bridge_callback<T, F>(
    callback: OpalCallback,
    user_data: *mut std::ffi::c_void,
    encode: F,
) -> Completion<T>
where
    T: Send + 'static,
    F: FnOnce(T) -> Option<String> + Send + 'static,
{
    let user_data = SendPtr(user_data);
    Completion::new(move |result: RemoteResult<T>| {
        // Force the whole `SendPtr` to be captured by the closure rather than
        // the inner `*mut c_void` field (Rust 2021 disjoint closure capture),
        // so the closure stays `Send`.
        let user_data = user_data;
        match result {
        Ok(value) => match encode(value) {
            Some(text) => match CString::new(text) {
                Ok(payload) => {
                    callback(user_data.0, OpalResult::Ok, payload.as_ptr(), std::ptr::null());
                }
                Err(_) => {
                    // Serialized JSON never contains interior NULs, but a
                    // result must still be delivered if that assumption
                    // ever breaks.
                    let message = c_message("result payload contained an interior NUL byte");
                    callback(user_data.0, OpalResult::Error, std::ptr::null(), message.as_ptr());
                }
            },
            None => {
                callback(user_data.0, OpalResult::Ok, std::ptr::null(), std::ptr::null());
            }
        },
        Err(error) => {
            let message = c_message(&error.to_string());
            callback(
                user_data.0,
                remote_error_code(&error),
                std::ptr::null(),
                message.as_ptr(),
            );
        }
        }
    })
}

fn c_message(message: &str) -> CString {
    CString::new(message.replace('\0', " ")).unwrap_or_default()
}
