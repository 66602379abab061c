// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Representative schedule values
//!
//! A schedule is reduced to one number: the constant value of a
//! `Schedule:Constant`, or the first value of a `Schedule:Compact` once
//! its date, day-type and time markers are skipped.

use idf_lite_core::{first_number, ObjectRecord, ParsedDocument};
use rustc_hash::FxHashMap;

pub const SCHEDULE_CONSTANT: &str = "SCHEDULE:CONSTANT";
pub const SCHEDULE_COMPACT: &str = "SCHEDULE:COMPACT";

/// First field holding values (after name and type limits)
const VALUE_START: usize = 2;

/// Markers of non-value fields in a compact schedule
const COMPACT_MARKERS: [&str; 3] = ["THROUGH", "FOR", "UNTIL"];

/// Read-only schedule index built once per document
#[derive(Debug, Default)]
pub struct ScheduleResolver<'a> {
    constant: FxHashMap<String, &'a ObjectRecord>,
    compact: FxHashMap<String, &'a ObjectRecord>,
}

impl<'a> ScheduleResolver<'a> {
    pub fn new(doc: &'a ParsedDocument) -> Self {
        let index = |object_type: &str| {
            doc.get(object_type)
                .iter()
                .map(|r| (r.name().trim().to_ascii_uppercase(), r))
                .collect::<FxHashMap<_, _>>()
        };
        Self {
            constant: index(SCHEDULE_CONSTANT),
            compact: index(SCHEDULE_COMPACT),
        }
    }

    /// Representative value of the named schedule
    ///
    /// `None` when no schedule has that name or no value could be read.
    /// Constant schedules take precedence over compact ones.
    pub fn resolve(&self, name: &str) -> Option<f64> {
        let key = name.trim().to_ascii_uppercase();
        if key.is_empty() {
            return None;
        }
        if let Some(record) = self.constant.get(&key) {
            if let Some(value) = constant_value(record) {
                return Some(value);
            }
        }
        self.compact.get(&key).and_then(|r| compact_value(r))
    }

    pub fn contains(&self, name: &str) -> bool {
        let key = name.trim().to_ascii_uppercase();
        self.constant.contains_key(&key) || self.compact.contains_key(&key)
    }
}

fn constant_value(record: &ObjectRecord) -> Option<f64> {
    record
        .fields()
        .iter()
        .skip(VALUE_START)
        .find_map(|f| first_number(f))
}

fn compact_value(record: &ObjectRecord) -> Option<f64> {
    record
        .fields()
        .iter()
        .skip(VALUE_START)
        .filter(|f| !is_compact_marker(f))
        .find_map(|f| first_number(f))
}

fn is_compact_marker(field: &str) -> bool {
    if field.contains(':') || field.contains('/') {
        return true;
    }
    let upper = field.to_ascii_uppercase();
    COMPACT_MARKERS.iter().any(|m| upper.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use idf_lite_core::parse_str;

    const IDF: &str = "
        Schedule:Constant, Always On, Fraction, 1.0;
        Schedule:Compact,
            HTGSETP_SCH,             !- Name
            Temperature,             !- Schedule Type Limits Name
            Through: 12/31,          !- Field 1
            For: AllDays,            !- Field 2
            Until: 24:00,            !- Field 3
            21.0;                    !- Field 4
        Schedule:Compact,
            Broken,
            Fraction,
            Through: 12/31,
            For: AllDays;
    ";

    #[test]
    fn test_resolve_constant_and_compact() {
        let doc = parse_str(IDF).unwrap();
        let schedules = ScheduleResolver::new(&doc);

        assert_eq!(schedules.resolve("always on"), Some(1.0));
        assert_eq!(schedules.resolve("HTGSETP_SCH"), Some(21.0));
    }

    #[test]
    fn test_unresolvable_is_none() {
        let doc = parse_str(IDF).unwrap();
        let schedules = ScheduleResolver::new(&doc);

        assert_eq!(schedules.resolve("Broken"), None);
        assert!(schedules.contains("Broken"));
        assert_eq!(schedules.resolve("Missing"), None);
        assert_eq!(schedules.resolve(""), None);
    }

    #[test]
    fn test_interpolate_marker_skipped() {
        let doc = parse_str(
            "Schedule:Compact, Occ, Fraction, Through: 12/31, For: Weekdays, Interpolate:No, Until: 07:00, 0.05;",
        )
        .unwrap();
        assert_eq!(ScheduleResolver::new(&doc).resolve("Occ"), Some(0.05));
    }
}
