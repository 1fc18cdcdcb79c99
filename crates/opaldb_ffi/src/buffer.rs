//! Buffer and string types for FFI.

use crate::error::{set_last_error, OpalResult};
use std::ffi::CStr;

/// A byte buffer crossing the FFI boundary.
///
/// Memory is owned by Rust. Buffers handed to the embedder must be
/// released with `opaldb_buffer_free`; buffers the embedder fills for us
/// (transport responses) must be allocated with `opaldb_buffer_alloc`.
#[repr(C)]
pub struct OpalBuffer {
    /// Pointer to data.
    pub data: *mut u8,
    /// Length in bytes.
    pub len: usize,
    /// Capacity (for internal use).
    pub capacity: usize,
}

impl OpalBuffer {
    /// Creates a new buffer from a Vec.
    pub fn from_vec(vec: Vec<u8>) -> Self {
        let mut vec = vec.into_boxed_slice();
        let data = vec.as_mut_ptr();
        let len = vec.len();
        std::mem::forget(vec);

        Self {
            data,
            len,
            capacity: len,
        }
    }

    /// Creates an empty buffer.
    pub fn empty() -> Self {
        Self {
            data: std::ptr::null_mut(),
            len: 0,
            capacity: 0,
        }
    }

    /// Returns true if the buffer is null/empty.
    pub fn is_null(&self) -> bool {
        self.data.is_null()
    }

    /// Converts back to a Vec, consuming the buffer.
    ///
    /// # Safety
    ///
    /// The buffer must have been created by this library's allocation
    /// functions (or be empty).
    pub unsafe fn into_vec(self) -> Vec<u8> {
        if self.data.is_null() {
            return Vec::new();
        }
        Vec::from_raw_parts(self.data, self.len, self.capacity)
    }
}

/// Allocates a zero-filled buffer of `len` bytes.
///
/// The embedder uses this to produce transport response bodies with an
/// ownership convention this library understands.
#[no_mangle]
pub extern "C" fn opaldb_buffer_alloc(len: usize) -> OpalBuffer {
    OpalBuffer::from_vec(vec![0; len])
}

/// Frees a buffer allocated by OpalDB.
///
/// # Safety
///
/// The buffer must have been allocated by OpalDB FFI functions.
#[no_mangle]
pub unsafe extern "C" fn opaldb_buffer_free(buffer: OpalBuffer) {
    if !buffer.data.is_null() {
        drop(Vec::from_raw_parts(buffer.data, buffer.len, buffer.capacity));
    }
}

/// Reads a required C string argument.
///
/// Sets the last error and returns the code to report when the pointer is
/// null or the bytes are not UTF-8.
///
/// # Safety
///
/// `ptr`, when non-null, must point to a null-terminated string valid for
/// the duration of the call.
pub(crate) unsafe fn required_str<'a>(
    ptr: *const std::ffi::c_char,
    param: &str,
) -> Result<&'a str, OpalResult> {
    if ptr.is_null() {
        set_last_error(format!("{param} must not be null"));
        return Err(OpalResult::NullPointer);
    }
    match CStr::from_ptr(ptr).to_str() {
        Ok(s) => Ok(s),
        Err(_) => {
            set_last_error(format!("invalid UTF-8 in {param}"));
            Err(OpalResult::InvalidArgument)
        }
    }
}

/// Reads an optional C string argument; null means absent.
///
/// # Safety
///
/// Same contract as [`required_str`] for non-null pointers.
pub(crate) unsafe fn optional_str<'a>(
    ptr: *const std::ffi::c_char,
    param: &str,
) -> Result<Option<&'a str>, OpalResult> {
    if ptr.is_null() {
        return Ok(None);
    }
    required_str(ptr, param).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn buffer_from_vec() {
        let data = vec![1u8, 2, 3, 4, 5];
        let buffer = OpalBuffer::from_vec(data.clone());

        assert!(!buffer.is_null());
        assert_eq!(buffer.len, 5);

        // Safety: we just created it
        let recovered = unsafe { buffer.into_vec() };
        assert_eq!(recovered, data);
    }

    #[test]
    fn buffer_empty() {
        let buffer = OpalBuffer::empty();
        assert!(buffer.is_null());
        assert_eq!(buffer.len, 0);
    }

    #[test]
    fn alloc_and_free() {
        let buffer = opaldb_buffer_alloc(16);
        assert!(!buffer.is_null());
        assert_eq!(buffer.len, 16);
        unsafe { opaldb_buffer_free(buffer) };
    }

    #[test]
    fn required_str_rejects_null() {
        let result = unsafe { required_str(std::ptr::null(), "filter") };
        assert_eq!(result, Err(OpalResult::NullPointer));
    }

    #[test]
    fn required_str_reads_utf8() {
        let s = CString::new("hello").unwrap();
        let result = unsafe { required_str(s.as_ptr(), "filter") };
        assert_eq!(result, Ok("hello"));
    }

    #[test]
    fn optional_str_null_is_absent() {
        let result = unsafe { optional_str(std::ptr::null(), "sort") };
        assert_eq!(result, Ok(None));
    }
}
