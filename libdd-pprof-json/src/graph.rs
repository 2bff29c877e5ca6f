// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The decoded form of a pprof profile. String-table indices have been
//! resolved into owned strings, and cross references are resolved into
//! copies of the referenced objects: a sample carries its locations, a
//! location its mapping, a line its function. The top-level `Mapping`,
//! `Location`, and `Function` lists still hold every object once, and each
//! inlined copy keeps its `ID`.
//!
//! The serde field names and nesting are the ones existing JSON consumers
//! walk, e.g. `Sample[i].Location[j].Line[k].Function.Name` and
//! `Location[i].Mapping.File`. Fields serialize in declaration order and maps
//! in key order, so a graph always encodes to the same bytes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[cfg_attr(test, derive(bolero::generator::TypeGenerator))]
#[serde(rename_all = "PascalCase")]
pub struct ProfileGraph {
    pub sample_type: Vec<ValueType>,
    pub default_sample_type: String,
    pub sample: Vec<Sample>,
    pub mapping: Vec<Mapping>,
    pub location: Vec<Location>,
    pub function: Vec<Function>,
    pub comments: Vec<String>,
    #[serde(rename = "DocURL")]
    pub doc_url: String,
    pub drop_frames: String,
    pub keep_frames: String,
    pub time_nanos: i64,
    pub duration_nanos: i64,
    pub period_type: Option<ValueType>,
    pub period: i64,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[cfg_attr(test, derive(bolero::generator::TypeGenerator))]
pub struct ValueType {
    #[serde(rename = "Type")]
    pub r#type: String,
    #[serde(rename = "Unit")]
    pub unit: String,
}

impl ValueType {
    pub fn new(r#type: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            r#type: r#type.into(),
            unit: unit.into(),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[cfg_attr(test, derive(bolero::generator::TypeGenerator))]
#[serde(rename_all = "PascalCase")]
pub struct Sample {
    /// Leaf first.
    pub location: Vec<Location>,
    pub value: Vec<i64>,
    pub label: BTreeMap<String, Vec<String>>,
    pub num_label: BTreeMap<String, Vec<i64>>,
    pub num_unit: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[cfg_attr(test, derive(bolero::generator::TypeGenerator))]
#[serde(rename_all = "PascalCase")]
pub struct Mapping {
    #[serde(rename = "ID")]
    pub id: u64,
    pub start: u64,
    pub limit: u64,
    pub offset: u64,
    pub file: String,
    #[serde(rename = "BuildID")]
    pub build_id: String,
    pub has_functions: bool,
    pub has_filenames: bool,
    pub has_line_numbers: bool,
    pub has_inline_frames: bool,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[cfg_attr(test, derive(bolero::generator::TypeGenerator))]
#[serde(rename_all = "PascalCase")]
pub struct Location {
    #[serde(rename = "ID")]
    pub id: u64,
    /// `None` when the location has no mapping, or names one that does not
    /// exist.
    pub mapping: Option<Mapping>,
    pub address: u64,
    pub line: Vec<Line>,
    pub is_folded: bool,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[cfg_attr(test, derive(bolero::generator::TypeGenerator))]
#[serde(rename_all = "PascalCase")]
pub struct Line {
    pub function: Option<Function>,
    pub line: i64,
    pub column: i64,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[cfg_attr(test, derive(bolero::generator::TypeGenerator))]
#[serde(rename_all = "PascalCase")]
pub struct Function {
    #[serde(rename = "ID")]
    pub id: u64,
    pub name: String,
    pub system_name: String,
    pub filename: String,
    pub start_line: i64,
}

impl ProfileGraph {
    pub fn is_empty(&self) -> bool {
        self.sample.is_empty()
            && self.location.is_empty()
            && self.function.is_empty()
            && self.mapping.is_empty()
    }
}
