// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Helpers for building pprof payloads in tests.

use super::{Function, Label, Line, Location, Mapping, Profile, Sample, ValueType};
use std::collections::HashMap;
use std::io::Write;

/// Interns strings the way a pprof writer does: index 0 is always "".
#[derive(Debug)]
pub struct StringTable {
    strings: Vec<String>,
    index: HashMap<String, i64>,
}

impl Default for StringTable {
    fn default() -> Self {
        let mut table = Self {
            strings: Vec::new(),
            index: HashMap::new(),
        };
        table.intern("");
        table
    }
}

impl StringTable {
    pub fn intern(&mut self, s: &str) -> i64 {
        if let Some(id) = self.index.get(s) {
            return *id;
        }
        let id = self.strings.len() as i64;
        self.strings.push(s.to_string());
        self.index.insert(s.to_string(), id);
        id
    }

    pub fn into_vec(self) -> Vec<String> {
        self.strings
    }
}

pub fn encode_profile(profile: &Profile) -> Vec<u8> {
    use prost::Message;
    profile.encode_to_vec()
}

#[allow(clippy::unwrap_used)]
pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// A profile with no samples, functions, locations, or mappings. Only the
/// mandatory empty string is present in the string table.
pub fn empty_profile() -> Profile {
    Profile {
        string_table: StringTable::default().into_vec(),
        ..Default::default()
    }
}

/// One sample, one location, one function, one mapping.
pub fn single_sample_profile() -> Profile {
    let mut strings = StringTable::default();
    let samples = strings.intern("samples");
    let count = strings.intern("count");
    let main = strings.intern("main.main");
    let file = strings.intern("/app/main.go");
    let binary = strings.intern("/usr/bin/app");

    Profile {
        sample_types: vec![ValueType {
            r#type: samples,
            unit: count,
        }],
        samples: vec![Sample {
            location_ids: vec![1],
            values: vec![7],
            labels: vec![],
        }],
        mappings: vec![Mapping {
            id: 1,
            memory_start: 0x400000,
            memory_limit: 0xac2000,
            filename: binary,
            has_functions: true,
            ..Default::default()
        }],
        locations: vec![Location {
            id: 1,
            mapping_id: 1,
            address: 0x4a1b2c,
            lines: vec![Line {
                function_id: 1,
                line: 42,
                column: 0,
            }],
            is_folded: false,
        }],
        functions: vec![Function {
            id: 1,
            name: main,
            system_name: main,
            filename: file,
            start_line: 40,
        }],
        string_table: strings.into_vec(),
        ..Default::default()
    }
}

/// A CPU-like profile exercising every top-level field, inline frames, and
/// both string and numeric labels.
pub fn cpu_profile() -> Profile {
    let mut strings = StringTable::default();
    let samples = strings.intern("samples");
    let count = strings.intern("count");
    let cpu = strings.intern("cpu");
    let nanoseconds = strings.intern("nanoseconds");
    let php = strings.intern("php");
    let build_id = strings.intern("3f1c2ab7");
    let main_name = strings.intern("{main}");
    let index_php = strings.intern("index.php");
    let test_name = strings.intern("test");
    let inlined = strings.intern("inlined_helper");
    let thread = strings.intern("thread name");
    let worker = strings.intern("worker-1");
    let bytes_key = strings.intern("allocation");
    let bytes = strings.intern("bytes");
    let comment = strings.intern("generated by a test");
    let runtime = strings.intern("runtime\\..*");
    let docs = strings.intern("https://example.com/profile-docs");

    let php_mapping = Mapping {
        id: 1,
        memory_start: 0x1000,
        memory_limit: u64::MAX,
        file_offset: 0x200,
        filename: php,
        build_id,
        has_functions: true,
        has_filenames: true,
        has_line_numbers: true,
        has_inline_frames: true,
    };

    let main_function = Function {
        id: 1,
        name: main_name,
        system_name: main_name,
        filename: index_php,
        start_line: 1,
    };

    let test_function = Function {
        id: 2,
        name: test_name,
        system_name: test_name,
        filename: index_php,
        start_line: 3,
    };

    let inlined_function = Function {
        id: 3,
        name: inlined,
        system_name: inlined,
        filename: index_php,
        start_line: 10,
    };

    let main_location = Location {
        id: 1,
        mapping_id: php_mapping.id,
        address: 0,
        lines: vec![Line {
            function_id: main_function.id,
            line: 0,
            column: 0,
        }],
        is_folded: false,
    };

    let test_location = Location {
        id: 2,
        mapping_id: php_mapping.id,
        address: 0xdead_beef,
        lines: vec![
            Line {
                function_id: inlined_function.id,
                line: 12,
                column: 5,
            },
            Line {
                function_id: test_function.id,
                line: 4,
                column: 9,
            },
        ],
        is_folded: true,
    };

    Profile {
        sample_types: vec![
            ValueType {
                r#type: samples,
                unit: count,
            },
            ValueType {
                r#type: cpu,
                unit: nanoseconds,
            },
        ],
        samples: vec![
            Sample {
                location_ids: vec![main_location.id],
                values: vec![1, 10_000_000],
                labels: vec![Label {
                    key: thread,
                    str: worker,
                    ..Default::default()
                }],
            },
            Sample {
                location_ids: vec![test_location.id, main_location.id],
                values: vec![3, -30_000_000],
                labels: vec![
                    Label {
                        key: bytes_key,
                        num: 64,
                        ..Default::default()
                    },
                    Label {
                        key: bytes_key,
                        num: 4096,
                        num_unit: bytes,
                        ..Default::default()
                    },
                ],
            },
        ],
        mappings: vec![php_mapping],
        locations: vec![main_location, test_location],
        functions: vec![main_function, test_function, inlined_function],
        string_table: strings.into_vec(),
        drop_frames: runtime,
        keep_frames: 0,
        time_nanos: 1_694_243_309_664_362_892,
        duration_nanos: 10_000_000_000,
        period_type: Some(ValueType {
            r#type: cpu,
            unit: nanoseconds,
        }),
        period: 10_000_000,
        comment: vec![comment],
        default_sample_type: cpu,
        doc_url: docs,
    }
}
