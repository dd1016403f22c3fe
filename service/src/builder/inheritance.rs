//! Base-class resolution and cycle detection

use cimgen_core::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Check every base reference and drop the dangling ones.
///
/// Each dangling base is reported as an unresolved reference from the
/// subclass.
pub(super) fn resolve_bases(records: &mut [ClassRecord], errors: &mut Vec<CimgenError>) {
    let known: BTreeSet<String> = records.iter().map(|r| r.name.clone()).collect();
    for record in records.iter_mut() {
        if let Some(base) = &record.base
            && !known.contains(base)
        {
            errors.push(CimgenError::unresolved(base, &record.name));
            record.base = None;
        }
    }
}

/// Find every inheritance cycle.
///
/// Each cycle is rotated to start at its smallest class name and closed by
/// repeating that name, so `B → A → B` is reported as `A → B → A`.
#[must_use]
pub fn find_cycles(bases: &BTreeMap<String, String>) -> Vec<Vec<String>> {
    let mut done: BTreeSet<&str> = BTreeSet::new();
    let mut cycles: BTreeSet<Vec<String>> = BTreeSet::new();

    for start in bases.keys() {
        let mut path: Vec<&str> = Vec::new();
        let mut on_path: HashMap<&str, usize> = HashMap::new();
        let mut current = Some(start.as_str());

        while let Some(name) = current {
            if done.contains(name) {
                break;
            }
            if let Some(&pos) = on_path.get(name) {
                cycles.insert(canonical_cycle(&path[pos..]));
                break;
            }
            on_path.insert(name, path.len());
            path.push(name);
            current = bases.get(name).map(String::as_str);
        }
        done.extend(path);
    }
    cycles.into_iter().collect()
}

fn canonical_cycle(members: &[&str]) -> Vec<String> {
    let start = members
        .iter()
        .enumerate()
        .min_by_key(|(_, name)| **name)
        .map_or(0, |(i, _)| i);
    let mut cycle: Vec<String> = members[start..]
        .iter()
        .chain(&members[..start])
        .map(|s| (*s).to_string())
        .collect();
    if let Some(first) = cycle.first().cloned() {
        cycle.push(first);
    }
    cycle
}

/// Report every cycle and cut it so later stages see a forest
pub(super) fn break_cycles(records: &mut [ClassRecord], errors: &mut Vec<CimgenError>) {
    let bases: BTreeMap<String, String> = records
        .iter()
        .filter_map(|r| Some((r.name.clone(), r.base.clone()?)))
        .collect();

    for cycle in find_cycles(&bases) {
        let members: BTreeSet<&str> = cycle.iter().map(String::as_str).collect();
        for record in records.iter_mut() {
            if members.contains(record.name.as_str()) {
                record.base = None;
            }
        }
        errors.push(CimgenError::cyclic(cycle));
    }
}
