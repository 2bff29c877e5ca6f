// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::io;

/// The buffer is not a well-formed pprof profile.
///
/// Decode errors are deterministic for a given buffer; callers relay the
/// message as-is.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("parsing profile: empty input file")]
    EmptyInput,
    #[error("decompressing profile: {0}")]
    Decompress(#[source] io::Error),
    #[error("decompressed profile exceeds the limit of {limit} bytes")]
    DecompressedTooLarge { limit: usize },
    #[error("parsing profile: {0}")]
    Protobuf(#[from] prost::DecodeError),
    #[error("malformed profile: {0}")]
    Invalid(#[from] ValidationError),
}

/// A structural problem found in an otherwise decodable profile.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("string_table[0] must be ''")]
    InvalidStringTable,
    #[error("string index {index} is out of range (string table has {len} entries) in {context}")]
    StringIndexOutOfRange {
        index: i64,
        len: usize,
        context: &'static str,
    },
    #[error("found {kind} with reserved ID=0")]
    ReservedId { kind: &'static str },
    #[error("multiple {kind}s with same id: {id}")]
    DuplicateId { kind: &'static str, id: u64 },
    #[error("mismatch: sample has {values} values vs. {types} types")]
    SampleValueCount { values: usize, types: usize },
    #[error("referenced location ID {id} does not exist")]
    MissingLocation { id: u64 },
}

/// The graph could not be encoded as JSON.
#[derive(Debug, thiserror::Error)]
#[error("profile JSON: {0}")]
pub struct MarshalError(#[from] pub serde_json::Error);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Marshal(#[from] MarshalError),
}
