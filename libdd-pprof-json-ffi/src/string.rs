// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Owned, NUL-terminated strings handed across the FFI boundary.
//!
//! Every pointer produced here is a separate allocation owned by the caller
//! from the moment it is returned. It must be released exactly once with
//! [`crate::FreeString`]; it must not be passed to C's `free`, since the
//! allocation comes from Rust's allocator.

use std::ffi::{c_char, CString};

/// Transfers `s` to the caller as a C string. If `s` has an interior NUL, the
/// string is cut at that NUL rather than failing.
pub(crate) fn into_owned_native_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    let c_string = match CString::new(s) {
        Ok(c_string) => c_string,
        Err(err) => {
            let nul_position = err.nul_position();
            let mut bytes = err.into_vec();
            bytes.truncate(nul_position);
            // SAFETY: the bytes end right before the first NUL.
            unsafe { CString::from_vec_unchecked(bytes) }
        }
    };
    c_string.into_raw()
}

/// Converts an error into an owned string, or null when there is no error.
pub(crate) fn into_error_string<E: std::fmt::Display>(result: Result<(), E>) -> *mut c_char {
    match result {
        Ok(()) => std::ptr::null_mut(),
        Err(err) => into_owned_native_string(err.to_string()),
    }
}

/// # Safety
/// `ptr` must be null or come from [`into_owned_native_string`] and not have
/// been released yet.
pub(crate) unsafe fn release(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn roundtrip() {
        let ptr = into_owned_native_string("hello");
        assert!(!ptr.is_null());
        assert_eq!(unsafe { CStr::from_ptr(ptr) }.to_str().unwrap(), "hello");
        unsafe { release(ptr) };
    }

    #[test]
    fn empty_string_is_a_real_allocation() {
        let ptr = into_owned_native_string(String::new());
        assert!(!ptr.is_null());
        assert_eq!(unsafe { CStr::from_ptr(ptr) }.to_bytes(), b"");
        unsafe { release(ptr) };
    }

    #[test]
    fn interior_nul_truncates() {
        let ptr = into_owned_native_string("bad\0tail");
        assert_eq!(unsafe { CStr::from_ptr(ptr) }.to_str().unwrap(), "bad");
        unsafe { release(ptr) };
    }

    #[test]
    fn error_string() {
        assert!(into_error_string::<String>(Ok(())).is_null());
        let ptr = into_error_string(Err("boom"));
        assert_eq!(unsafe { CStr::from_ptr(ptr) }.to_str().unwrap(), "boom");
        unsafe { release(ptr) };
    }

    #[test]
    fn release_null_is_a_no_op() {
        unsafe { release(std::ptr::null_mut()) };
    }
}
