// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::DecodeError;
use crate::pprof::GZIP_MAGIC;
use flate2::read::MultiGzDecoder;
use std::borrow::Cow;
use std::io::Read;

/// Strips a gzip envelope if there is one, otherwise borrows the input.
pub(crate) fn inflate(bytes: &[u8], limit: usize) -> Result<Cow<'_, [u8]>, DecodeError> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(Cow::Borrowed(bytes));
    }

    let mut out = Vec::new();
    // One byte past the limit tells "exactly at the limit" apart from "over".
    MultiGzDecoder::new(bytes)
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut out)
        .map_err(DecodeError::Decompress)?;

    if out.len() > limit {
        return Err(DecodeError::DecompressedTooLarge { limit });
    }
    Ok(Cow::Owned(out))
}
