// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

//! Lossless conversion of [pprof] profiles into JSON.
//!
//! The conversion has two halves which can be used on their own:
//!
//! - [decode] turns a pprof buffer (optionally gzip-compressed) into a
//!   [ProfileGraph], resolving the string table and checking that ids and
//!   cross references are consistent.
//! - [marshal] encodes a [ProfileGraph] as JSON, deterministically.
//!
//! [profile_to_json] chains the two, and is what the FFI gateway calls.
//!
//! [pprof]: https://github.com/google/pprof/blob/main/proto/profile.proto

mod config;
mod decoder;
mod error;
pub mod graph;
mod marshal;
pub mod pprof;

pub use config::*;
pub use decoder::{decode, decode_with_config};
pub use error::*;
pub use graph::ProfileGraph;
pub use marshal::{marshal, marshal_to_writer, unmarshal};

/// Decodes a pprof buffer and encodes the result as JSON. Errors from either
/// step are returned unchanged.
pub fn profile_to_json(bytes: &[u8]) -> Result<String, Error> {
    profile_to_json_with_config(bytes, &DecoderConfig::default())
}

pub fn profile_to_json_with_config(bytes: &[u8], config: &DecoderConfig) -> Result<String, Error> {
    let graph = decode_with_config(bytes, config)?;
    Ok(marshal(&graph)?)
}
