// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use libdd_pprof_json_ffi::{FreeString, ParseProfile};
use std::ffi::CStr;

/// Calls `ParseProfile`, copies both strings out, and releases them.
#[allow(dead_code)]
pub fn parse(bytes: &[u8]) -> (String, String) {
    let result = unsafe { ParseProfile(bytes.as_ptr().cast(), bytes.len() as i32) };
    assert!(!result.r0.is_null());
    assert!(!result.r1.is_null());
    assert_ne!(result.r0, result.r1);

    let json = unsafe { CStr::from_ptr(result.r0) }
        .to_str()
        .unwrap()
        .to_string();
    let error = unsafe { CStr::from_ptr(result.r1) }
        .to_str()
        .unwrap()
        .to_string();

    unsafe {
        FreeString(result.r0);
        FreeString(result.r1);
    }
    (json, error)
}
