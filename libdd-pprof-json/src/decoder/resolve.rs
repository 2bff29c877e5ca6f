// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ValidationError;
use crate::graph;
use crate::pprof;
use std::collections::{BTreeMap, HashMap};

struct StringTable<'pprof> {
    strings: &'pprof [String],
}

impl<'pprof> StringTable<'pprof> {
    fn get(&self, index: i64, context: &'static str) -> Result<String, ValidationError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.strings.get(i))
            .cloned()
            .ok_or(ValidationError::StringIndexOutOfRange {
                index,
                len: self.strings.len(),
                context,
            })
    }

    fn value_type(
        &self,
        value_type: &pprof::ValueType,
        context: &'static str,
    ) -> Result<graph::ValueType, ValidationError> {
        Ok(graph::ValueType {
            r#type: self.get(value_type.r#type, context)?,
            unit: self.get(value_type.unit, context)?,
        })
    }
}

type FoldedLabels = (
    BTreeMap<String, Vec<String>>,
    BTreeMap<String, Vec<i64>>,
    BTreeMap<String, Vec<String>>,
);

fn pad(units: &mut Vec<String>, len: usize) {
    if units.len() < len {
        units.resize(len, String::new());
    }
}

/// Folds a sample's label list into per-key string values, numeric values,
/// and numeric units. Units line up positionally with numeric values; gaps
/// are filled with empty strings.
fn fold_labels(
    strings: &StringTable,
    labels: &[pprof::Label],
) -> Result<FoldedLabels, ValidationError> {
    let mut label: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut num_label: BTreeMap<String, Vec<i64>> = BTreeMap::new();
    let mut num_unit: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for l in labels {
        let key = strings.get(l.key, "sample label key")?;
        if l.str != 0 {
            let value = strings.get(l.str, "sample label value")?;
            label.entry(key).or_default().push(value);
        } else if l.num != 0 || l.num_unit != 0 {
            let values = num_label.entry(key.clone()).or_default();
            if l.num_unit != 0 {
                let unit = strings.get(l.num_unit, "sample label unit")?;
                let units = num_unit.entry(key).or_default();
                pad(units, values.len());
                units.push(unit);
            }
            values.push(l.num);
        }
    }

    for (key, units) in num_unit.iter_mut() {
        if !units.is_empty() {
            pad(units, num_label.get(key).map_or(0, Vec::len));
        }
    }

    Ok((label, num_label, num_unit))
}

/// Id zero is reserved, so it never resolves. With duplicate ids the first
/// object wins.
fn index_by_id<T>(items: &[T], id: impl Fn(&T) -> u64) -> HashMap<u64, &T> {
    let mut index = HashMap::with_capacity(items.len());
    for item in items {
        let id = id(item);
        if id != 0 {
            index.entry(id).or_insert(item);
        }
    }
    index
}

fn sample(
    strings: &StringTable,
    locations: &HashMap<u64, &graph::Location>,
    sample: &pprof::Sample,
) -> Result<graph::Sample, ValidationError> {
    let (label, num_label, num_unit) = fold_labels(strings, &sample.labels)?;
    let location = sample
        .location_ids
        .iter()
        .map(|&id| {
            locations
                .get(&id)
                .map(|&location| location.clone())
                .ok_or(ValidationError::MissingLocation { id })
        })
        .collect::<Result<_, _>>()?;
    Ok(graph::Sample {
        location,
        value: sample.values.clone(),
        label,
        num_label,
        num_unit,
    })
}

fn mapping(
    strings: &StringTable,
    mapping: &pprof::Mapping,
) -> Result<graph::Mapping, ValidationError> {
    Ok(graph::Mapping {
        id: mapping.id,
        start: mapping.memory_start,
        limit: mapping.memory_limit,
        offset: mapping.file_offset,
        file: strings.get(mapping.filename, "mapping filename")?,
        build_id: strings.get(mapping.build_id, "mapping build_id")?,
        has_functions: mapping.has_functions,
        has_filenames: mapping.has_filenames,
        has_line_numbers: mapping.has_line_numbers,
        has_inline_frames: mapping.has_inline_frames,
    })
}

/// A mapping or function id that matches nothing resolves to `None`.
fn location(
    mappings: &HashMap<u64, &graph::Mapping>,
    functions: &HashMap<u64, &graph::Function>,
    location: &pprof::Location,
) -> graph::Location {
    graph::Location {
        id: location.id,
        mapping: mappings
            .get(&location.mapping_id)
            .map(|&mapping| mapping.clone()),
        address: location.address,
        line: location
            .lines
            .iter()
            .map(|line| graph::Line {
                function: functions
                    .get(&line.function_id)
                    .map(|&function| function.clone()),
                line: line.line,
                column: line.column,
            })
            .collect(),
        is_folded: location.is_folded,
    }
}

fn function(
    strings: &StringTable,
    function: &pprof::Function,
) -> Result<graph::Function, ValidationError> {
    Ok(graph::Function {
        id: function.id,
        name: strings.get(function.name, "function name")?,
        system_name: strings.get(function.system_name, "function system_name")?,
        filename: strings.get(function.filename, "function filename")?,
        start_line: function.start_line,
    })
}

/// Builds the graph, resolving every string index and inlining every cross
/// reference. Fails on the first index that is out of range or the first
/// sample location that does not exist, so a graph is either complete or not
/// produced.
pub(crate) fn resolve(profile: &pprof::Profile) -> Result<graph::ProfileGraph, ValidationError> {
    let strings = StringTable {
        strings: &profile.string_table,
    };

    let mappings: Vec<graph::Mapping> = profile
        .mappings
        .iter()
        .map(|m| mapping(&strings, m))
        .collect::<Result<_, _>>()?;
    let functions: Vec<graph::Function> = profile
        .functions
        .iter()
        .map(|f| function(&strings, f))
        .collect::<Result<_, _>>()?;

    let mapping_index = index_by_id(&mappings, |m| m.id);
    let function_index = index_by_id(&functions, |f| f.id);
    let locations: Vec<graph::Location> = profile
        .locations
        .iter()
        .map(|l| location(&mapping_index, &function_index, l))
        .collect();

    let location_index = index_by_id(&locations, |l| l.id);
    let samples: Vec<graph::Sample> = profile
        .samples
        .iter()
        .map(|s| sample(&strings, &location_index, s))
        .collect::<Result<_, _>>()?;

    Ok(graph::ProfileGraph {
        sample_type: profile
            .sample_types
            .iter()
            .map(|st| strings.value_type(st, "sample type"))
            .collect::<Result<_, _>>()?,
        default_sample_type: strings.get(profile.default_sample_type, "default_sample_type")?,
        sample: samples,
        mapping: mappings,
        location: locations,
        function: functions,
        comments: profile
            .comment
            .iter()
            .map(|&c| strings.get(c, "comment"))
            .collect::<Result<_, _>>()?,
        doc_url: strings.get(profile.doc_url, "doc_url")?,
        drop_frames: strings.get(profile.drop_frames, "drop_frames")?,
        keep_frames: strings.get(profile.keep_frames, "keep_frames")?,
        time_nanos: profile.time_nanos,
        duration_nanos: profile.duration_nanos,
        period_type: profile
            .period_type
            .as_ref()
            .map(|pt| strings.value_type(pt, "period type"))
            .transpose()?,
        period: profile.period,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pprof::{cpu_profile, empty_profile, Label, StringTable as Interner};

    #[test]
    fn empty_profile_resolves_to_empty_graph() {
        let graph = resolve(&empty_profile()).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph, graph::ProfileGraph::default());
    }

    #[test]
    fn strings_are_resolved() {
        let graph = resolve(&cpu_profile()).unwrap();
        assert_eq!(
            graph.sample_type,
            vec![
                graph::ValueType::new("samples", "count"),
                graph::ValueType::new("cpu", "nanoseconds"),
            ]
        );
        assert_eq!(
            graph.period_type,
            Some(graph::ValueType::new("cpu", "nanoseconds"))
        );
        assert_eq!(graph.default_sample_type, "cpu");
        assert_eq!(graph.comments, vec!["generated by a test".to_string()]);
        assert_eq!(graph.drop_frames, "runtime\\..*");
        assert_eq!(graph.keep_frames, "");
        assert_eq!(graph.doc_url, "https://example.com/profile-docs");
        assert_eq!(graph.mapping[0].file, "php");
        assert_eq!(graph.mapping[0].build_id, "3f1c2ab7");
        assert_eq!(graph.function[2].name, "inlined_helper");
        assert_eq!(graph.function[2].filename, "index.php");
    }

    #[test]
    fn cross_references_are_inlined() {
        let graph = resolve(&cpu_profile()).unwrap();
        let ids: Vec<u64> = graph.sample[1].location.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(graph.sample[1].location[0], graph.location[1]);
        assert_eq!(graph.sample[1].location[1], graph.location[0]);

        let location = &graph.location[1];
        assert_eq!(location.mapping.as_ref(), Some(&graph.mapping[0]));
        let names: Vec<&str> = location
            .line
            .iter()
            .map(|l| l.function.as_ref().unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["inlined_helper", "test"]);
        assert_eq!(location.line[0].function.as_ref(), Some(&graph.function[2]));
        assert_eq!(location.line[0].column, 5);
        assert!(location.is_folded);
    }

    #[test]
    fn unknown_mapping_and_function_resolve_to_none() {
        let mut profile = cpu_profile();
        profile.locations[0].mapping_id = 0;
        profile.locations[1].mapping_id = 42;
        profile.locations[1].lines[0].function_id = 0;
        profile.locations[1].lines[1].function_id = 99;
        let graph = resolve(&profile).unwrap();

        assert_eq!(graph.location[0].mapping, None);
        assert_eq!(graph.location[1].mapping, None);
        assert!(graph.location[1].line.iter().all(|l| l.function.is_none()));
        assert_eq!(graph.location[1].line[1].line, 4);
        assert_eq!(graph.sample[1].location[0], graph.location[1]);
    }

    #[test]
    fn unknown_sample_location_is_an_error() {
        let mut profile = cpu_profile();
        profile.samples[0].location_ids.push(7);
        assert_eq!(
            resolve(&profile),
            Err(ValidationError::MissingLocation { id: 7 })
        );
    }

    #[test]
    fn labels_are_folded() {
        let graph = resolve(&cpu_profile()).unwrap();
        let first = &graph.sample[0];
        assert_eq!(first.label["thread name"], vec!["worker-1".to_string()]);
        assert!(first.num_label.is_empty());
        assert!(first.num_unit.is_empty());

        let second = &graph.sample[1];
        assert!(second.label.is_empty());
        assert_eq!(second.num_label["allocation"], vec![64, 4096]);
        // The unitless value gets an empty unit so positions line up.
        assert_eq!(
            second.num_unit["allocation"],
            vec![String::new(), "bytes".to_string()]
        );
    }

    #[test]
    fn trailing_units_are_padded() {
        let mut strings = Interner::default();
        let key = strings.intern("size");
        let unit = strings.intern("bytes");
        let labels = [
            Label {
                key,
                num: 1,
                num_unit: unit,
                ..Default::default()
            },
            Label {
                key,
                num: 2,
                ..Default::default()
            },
            Label {
                key,
                ..Default::default()
            },
        ];
        let table = strings.into_vec();
        let (label, num_label, num_unit) = fold_labels(
            &StringTable { strings: &table },
            &labels,
        )
        .unwrap();
        assert!(label.is_empty());
        assert_eq!(num_label["size"], vec![1, 2]);
        assert_eq!(num_unit["size"], vec!["bytes".to_string(), String::new()]);
    }

    #[test]
    fn out_of_range_string_index_is_an_error() {
        let mut profile = cpu_profile();
        profile.functions[1].filename = 10_000;
        let err = resolve(&profile).unwrap_err();
        assert_eq!(
            err,
            ValidationError::StringIndexOutOfRange {
                index: 10_000,
                len: profile.string_table.len(),
                context: "function filename",
            }
        );

        let mut profile = cpu_profile();
        profile.comment.push(-1);
        assert!(matches!(
            resolve(&profile),
            Err(ValidationError::StringIndexOutOfRange { index: -1, .. })
        ));
    }
}
