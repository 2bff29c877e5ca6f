// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

mod envelope;
mod resolve;
mod validate;

use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::graph::ProfileGraph;
use crate::pprof;
use prost::Message;
use tracing::debug;

/// Decodes a pprof buffer, optionally gzip-compressed, with the default
/// [`DecoderConfig`].
pub fn decode(bytes: &[u8]) -> Result<ProfileGraph, DecodeError> {
    decode_with_config(bytes, &DecoderConfig::default())
}

/// Decodes a pprof buffer into a fully resolved [`ProfileGraph`].
///
/// Decoding is all-or-nothing: any malformed part of the input fails the
/// whole call, and the input is never modified.
pub fn decode_with_config(
    bytes: &[u8],
    config: &DecoderConfig,
) -> Result<ProfileGraph, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }
    let payload = envelope::inflate(bytes, config.max_decompressed_size)?;
    if payload.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let profile = pprof::Profile::decode(&payload[..])?;
    if config.validate {
        validate::validate_profile(&profile)?;
    }
    let graph = resolve::resolve(&profile)?;

    debug!(
        input_bytes = bytes.len(),
        payload_bytes = payload.len(),
        samples = graph.sample.len(),
        locations = graph.location.len(),
        functions = graph.function.len(),
        mappings = graph.mapping.len(),
        empty = graph.is_empty(),
        "Decoded pprof profile"
    );
    Ok(graph)
}
