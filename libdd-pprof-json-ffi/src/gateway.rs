// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![allow(non_snake_case)]

use crate::string::{into_owned_native_string, release};
use crate::utils::handle_panic_error;
use function_name::named;
use std::ffi::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, warn};

/// What the JSON slot holds whenever the error slot is non-empty.
pub const FAILURE_JSON: &str = "{}";

/// The two strings returned by [`ParseProfile`]. Both are always non-null,
/// separately allocated, and must each be released with [`FreeString`].
#[repr(C)]
#[derive(Debug)]
pub struct ParseProfileReturn {
    /// The profile as JSON on success, `{}` on failure.
    pub r0: *mut c_char,
    /// Empty on success, otherwise a description of what went wrong.
    pub r1: *mut c_char,
}

impl ParseProfileReturn {
    fn new(json: impl Into<Vec<u8>>, error: impl Into<Vec<u8>>) -> Self {
        Self {
            r0: into_owned_native_string(json),
            r1: into_owned_native_string(error),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum ArgumentError {
    #[error("invalid buffer length: {0}")]
    NegativeLength(i32),
    #[error("buffer is null but length is {0}")]
    NullBuffer(i32),
}

/// Copies the caller's buffer so nothing refers to it once the call returns.
///
/// # Safety
/// Unless null, `buffer` must be valid for reads of `length` bytes.
unsafe fn copy_buffer(buffer: *const c_char, length: i32) -> Result<Vec<u8>, ArgumentError> {
    let len = usize::try_from(length).map_err(|_| ArgumentError::NegativeLength(length))?;
    if buffer.is_null() {
        return if len == 0 {
            Ok(Vec::new())
        } else {
            Err(ArgumentError::NullBuffer(length))
        };
    }
    Ok(std::slice::from_raw_parts(buffer.cast::<u8>(), len).to_vec())
}

unsafe fn parse_profile(buffer: *const c_char, length: i32) -> Result<String, String> {
    let input = copy_buffer(buffer, length).map_err(|err| err.to_string())?;
    debug!(bytes = input.len(), "Converting pprof profile to JSON");
    libdd_pprof_json::profile_to_json(&input).map_err(|err| err.to_string())
}

/// Decodes the pprof profile in `buffer[0..length]` and returns it as JSON.
///
/// On success, `r0` holds the JSON and `r1` is the empty string. On failure,
/// `r0` is exactly `{}` and `r1` holds the error message, so callers should
/// check `r1` first. Both strings must be released with [`FreeString`], in
/// every case.
///
/// The buffer is copied before decoding and is not referenced after the call
/// returns. The function keeps no state and can be called concurrently.
///
/// # Safety
/// `buffer` must be valid for reads of `length` bytes, or null when `length`
/// is 0. Passing a length larger than the buffer is undefined behavior.
#[no_mangle]
#[must_use]
#[named]
pub unsafe extern "C" fn ParseProfile(buffer: *const c_char, length: i32) -> ParseProfileReturn {
    let result = catch_unwind(AssertUnwindSafe(|| parse_profile(buffer, length)))
        .unwrap_or_else(|payload| Err(handle_panic_error(payload, function_name!())));

    match result {
        Ok(json) => ParseProfileReturn::new(json, ""),
        Err(message) => {
            warn!(error = %message, "Failed to convert pprof profile to JSON");
            ParseProfileReturn::new(FAILURE_JSON, message)
        }
    }
}

/// Releases a string returned by [`ParseProfile`] or by one of the logger
/// functions. Null is ignored.
///
/// # Safety
/// Each string must be released exactly once. Releasing a string twice, or
/// passing a pointer that did not come from this library, is undefined
/// behavior.
#[no_mangle]
pub unsafe extern "C" fn FreeString(str: *mut c_char) {
    release(str)
}
