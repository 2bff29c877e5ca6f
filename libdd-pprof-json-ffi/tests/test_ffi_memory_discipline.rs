// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Tracks every allocation made on the test thread while the FFI is driven,
//! to check that each string returned by `ParseProfile` is its own allocation
//! and that releasing both leaves nothing behind. This binary holds a single
//! test so no other test shares the allocator counters.

use libdd_pprof_json::pprof::{cpu_profile, empty_profile, encode_profile, gzip};
use libdd_pprof_json_ffi::{FreeString, ParseProfile};
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::ffi::CStr;
use std::sync::atomic::{AtomicIsize, Ordering};

struct CountingAllocator;

static LIVE_BYTES: AtomicIsize = AtomicIsize::new(0);
static LIVE_ALLOCATIONS: AtomicIsize = AtomicIsize::new(0);

thread_local! {
    static TRACKING: Cell<bool> = const { Cell::new(false) };
}

fn tracking() -> bool {
    TRACKING.try_with(Cell::get).unwrap_or(false)
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() && tracking() {
            LIVE_BYTES.fetch_add(layout.size() as isize, Ordering::SeqCst);
            LIVE_ALLOCATIONS.fetch_add(1, Ordering::SeqCst);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if tracking() {
            LIVE_BYTES.fetch_sub(layout.size() as isize, Ordering::SeqCst);
            LIVE_ALLOCATIONS.fetch_sub(1, Ordering::SeqCst);
        }
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() && tracking() {
            LIVE_BYTES.fetch_add(new_size as isize - layout.size() as isize, Ordering::SeqCst);
        }
        new_ptr
    }
}

#[global_allocator]
static ALLOCATOR: CountingAllocator = CountingAllocator;

fn live() -> (isize, isize) {
    (
        LIVE_BYTES.load(Ordering::SeqCst),
        LIVE_ALLOCATIONS.load(Ordering::SeqCst),
    )
}

fn with_tracking<R>(f: impl FnOnce() -> R) -> R {
    TRACKING.with(|t| t.set(true));
    let result = f();
    TRACKING.with(|t| t.set(false));
    result
}

#[test]
fn every_returned_string_is_released_exactly_once() {
    let valid = encode_profile(&cpu_profile());
    let inputs: Vec<Vec<u8>> = vec![
        valid.clone(),
        gzip(&valid),
        encode_profile(&empty_profile()),
        valid[..valid.len() - 1].to_vec(),
        b"garbage".to_vec(),
        Vec::new(),
    ];

    // Warm up anything initialized lazily on first use.
    for input in &inputs {
        let result = unsafe { ParseProfile(input.as_ptr().cast(), input.len() as i32) };
        unsafe {
            FreeString(result.r0);
            FreeString(result.r1);
        }
    }

    for input in &inputs {
        let (before, after_parse, after_first_free, after_second_free, lengths) =
            with_tracking(|| {
                let before = live();
                let result =
                    unsafe { ParseProfile(input.as_ptr().cast(), input.len() as i32) };
                let after_parse = live();

                let json_len = unsafe { CStr::from_ptr(result.r0) }.to_bytes().len();
                let error_len = unsafe { CStr::from_ptr(result.r1) }.to_bytes().len();

                unsafe { FreeString(result.r0) };
                let after_first_free = live();
                unsafe { FreeString(result.r1) };
                let after_second_free = live();

                (
                    before,
                    after_parse,
                    after_first_free,
                    after_second_free,
                    (json_len, error_len),
                )
            });

        // Exactly two allocations outlive the call: one per returned string.
        assert_eq!(after_parse.1 - before.1, 2);
        assert!(after_parse.0 - before.0 >= (lengths.0 + lengths.1 + 2) as isize);

        // Each release frees one allocation at least as large as its string.
        assert_eq!(after_parse.1 - after_first_free.1, 1);
        assert!(after_parse.0 - after_first_free.0 > lengths.0 as isize);
        assert_eq!(after_first_free.1 - after_second_free.1, 1);
        assert!(after_first_free.0 - after_second_free.0 > lengths.1 as isize);

        // Nothing leaks on either the success or the failure path.
        assert_eq!(after_second_free, before);
    }
}
