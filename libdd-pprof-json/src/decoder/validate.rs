// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ValidationError;
use crate::pprof::Profile;
use std::collections::HashSet;

fn validate_string_table(string_table: &[String]) -> Result<(), ValidationError> {
    if string_table.first().is_some_and(String::is_empty) {
        Ok(())
    } else {
        Err(ValidationError::InvalidStringTable)
    }
}

/// Collects the ids of one kind of entity, rejecting zero and duplicates.
fn collect_ids(
    ids: impl Iterator<Item = u64>,
    kind: &'static str,
) -> Result<HashSet<u64>, ValidationError> {
    let mut set = HashSet::new();
    for id in ids {
        if id == 0 {
            return Err(ValidationError::ReservedId { kind });
        }
        if !set.insert(id) {
            return Err(ValidationError::DuplicateId { kind, id });
        }
    }
    Ok(set)
}

/// A location naming an unknown mapping, or a line naming an unknown
/// function, is accepted; the reference resolves to nothing. A sample naming
/// an unknown location is not.
pub(crate) fn validate_profile(profile: &Profile) -> Result<(), ValidationError> {
    validate_string_table(&profile.string_table)?;

    collect_ids(profile.mappings.iter().map(|m| m.id), "mapping")?;
    let location_ids = collect_ids(profile.locations.iter().map(|l| l.id), "location")?;
    collect_ids(profile.functions.iter().map(|f| f.id), "function")?;

    let types = profile.sample_types.len();
    for sample in &profile.samples {
        if sample.values.len() != types {
            return Err(ValidationError::SampleValueCount {
                values: sample.values.len(),
                types,
            });
        }
        for &location_id in &sample.location_ids {
            if !location_ids.contains(&location_id) {
                return Err(ValidationError::MissingLocation { id: location_id });
            }
        }
    }

    Ok(())
}
