// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

//! C ABI for converting pprof profiles to JSON.
//!
//! ```c
//! struct ParseProfileReturn { char *r0; char *r1; };
//! struct ParseProfileReturn ParseProfile(const char *buffer, int32_t length);
//! void FreeString(char *str);
//! ```
//!
//! `r1` is empty on success. On failure it holds the error message and `r0`
//! is `{}`. Both pointers are always valid and must both be released with
//! `FreeString`.

mod gateway;
pub mod logger;
mod string;
mod utils;

pub use gateway::*;
pub use logger::{
    ddog_pprof_logger_configure_std, ddog_pprof_logger_disable_std, LogEventLevel, StdTarget,
};
