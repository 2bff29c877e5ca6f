// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Default upper bound on the size of an inflated gzip payload.
pub const DEFAULT_MAX_DECOMPRESSED_SIZE: usize = 256 * 1024 * 1024;

/// Knobs for [`crate::decode_with_config`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecoderConfig {
    /// Inflating a gzip envelope fails once the output would exceed this
    /// many bytes.
    pub max_decompressed_size: usize,
    /// Check ids, cross references, and sample value counts before building
    /// the graph. String indices are always checked, since they cannot be
    /// resolved otherwise.
    pub validate: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_decompressed_size: DEFAULT_MAX_DECOMPRESSED_SIZE,
            validate: true,
        }
    }
}

impl DecoderConfig {
    pub fn with_max_decompressed_size(mut self, max_decompressed_size: usize) -> Self {
        self.max_decompressed_size = max_decompressed_size;
        self
    }

    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}
