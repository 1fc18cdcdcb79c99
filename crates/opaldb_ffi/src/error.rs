//! Error codes and result types.

use opaldb_remote::RemoteError;
use std::cell::RefCell;
use std::ffi::CString;

/// Result code for FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpalResult {
    /// Operation succeeded.
    Ok = 0,
    /// Generic error.
    Error = 1,
    /// Invalid argument.
    InvalidArgument = 2,
    /// A parameter document failed to parse or had the wrong kind.
    MalformedDocument = 3,
    /// The handle does not refer to a live object.
    InvalidHandle = 4,
    /// The handle registry is exhausted.
    RegistryFull = 5,
    /// Null pointer.
    NullPointer = 6,
    /// Transport-level failure.
    TransportError = 7,
    /// The service reported a failure.
    ServiceError = 8,
    /// The operation was abandoned before completing.
    Cancelled = 9,
}

impl OpalResult {
    /// Returns true if the result indicates success.
    pub fn is_ok(self) -> bool {
        self == OpalResult::Ok
    }

    /// Returns true if the result indicates an error.
    pub fn is_err(self) -> bool {
        self != OpalResult::Ok
    }
}

/// Error code type for C compatibility.
pub type ErrorCode = i32;

impl From<OpalResult> for ErrorCode {
    fn from(result: OpalResult) -> Self {
        result as ErrorCode
    }
}

impl From<ErrorCode> for OpalResult {
    fn from(code: ErrorCode) -> Self {
        match code {
            0 => OpalResult::Ok,
            2 => OpalResult::InvalidArgument,
            3 => OpalResult::MalformedDocument,
            4 => OpalResult::InvalidHandle,
            5 => OpalResult::RegistryFull,
            6 => OpalResult::NullPointer,
            7 => OpalResult::TransportError,
            8 => OpalResult::ServiceError,
            9 => OpalResult::Cancelled,
            _ => OpalResult::Error,
        }
    }
}

/// Maps a remote error to the code delivered across the boundary.
pub fn remote_error_code(error: &RemoteError) -> OpalResult {
    match error {
        RemoteError::Transport { .. } | RemoteError::NotConnected => OpalResult::TransportError,
        RemoteError::Service(_) => OpalResult::ServiceError,
        RemoteError::Document(_) => OpalResult::MalformedDocument,
        RemoteError::Cancelled => OpalResult::Cancelled,
        RemoteError::Protocol(_) | RemoteError::Executor(_) => OpalResult::Error,
    }
}

// Thread-local storage for last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Sets the last error message.
pub fn set_last_error(message: impl Into<String>) {
    let msg = message.into();
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clears the last error.
pub fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Gets the last error message as a C string.
///
/// Returns null if no error is set.
///
/// # Safety
///
/// The returned pointer is valid until the next FFI call on this thread.
#[no_mangle]
pub extern "C" fn opaldb_last_error() -> *const std::ffi::c_char {
    LAST_ERROR.with(|e| match e.borrow().as_ref() {
        Some(cstr) => cstr.as_ptr(),
        None => std::ptr::null(),
    })
}

/// Clears the last error message.
#[no_mangle]
pub extern "C" fn opaldb_clear_error() {
    clear_last_error();
}
