// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::MarshalError;
use crate::graph::ProfileGraph;
use std::io;

/// Encodes the graph as compact JSON. The output depends only on the graph,
/// so equal graphs always produce identical text.
pub fn marshal(graph: &ProfileGraph) -> Result<String, MarshalError> {
    Ok(serde_json::to_string(graph)?)
}

/// Like [`marshal`], but streams into `writer`. A buffered writer is
/// recommended, serde_json issues many small writes.
pub fn marshal_to_writer<W: io::Write>(
    writer: W,
    graph: &ProfileGraph,
) -> Result<(), MarshalError> {
    Ok(serde_json::to_writer(writer, graph)?)
}

/// Parses JSON produced by [`marshal`] back into a graph.
pub fn unmarshal(json: &str) -> Result<ProfileGraph, MarshalError> {
    Ok(serde_json::from_str(json)?)
}
