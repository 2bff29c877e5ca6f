// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

mod proto;
#[cfg(any(test, feature = "test-utils"))]
mod test_utils;

pub use proto::*;
#[cfg(any(test, feature = "test-utils"))]
pub use test_utils::*;

/// The first two bytes of every gzip member.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
