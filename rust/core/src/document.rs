// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsed document model
//!
//! A [`ParsedDocument`] maps upper-cased object types to their records in
//! file order. Records hold the fields after the type name, so field 0 is
//! usually the object's own name.

use crate::numeric::parse_number;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Field storage; most IDF objects have a handful of fields
pub type Fields = SmallVec<[String; 8]>;

/// One object from the input, positional fields only
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectRecord {
    fields: Fields,
    /// Line the object started on (1-based, 0 when built in code)
    line: usize,
}

impl ObjectRecord {
    pub fn new(fields: Fields, line: usize) -> Self {
        Self { fields, line }
    }

    /// Build a record from string slices (mainly for tests)
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
            line: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Field at `index`, if the record is long enough
    #[inline]
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Field at `index`, or `None` when missing or blank
    #[inline]
    pub fn non_empty(&self, index: usize) -> Option<&str> {
        self.field(index).filter(|f| !f.is_empty())
    }

    /// Object name (field 0)
    #[inline]
    pub fn name(&self) -> &str {
        self.field(0).unwrap_or("")
    }

    /// Field at `index` parsed as a number
    #[inline]
    pub fn number(&self, index: usize) -> Option<f64> {
        self.field(index).and_then(parse_number)
    }

    /// Lower-cased field, empty when missing (for keyword dispatch)
    pub fn keyword(&self, index: usize) -> String {
        self.field(index).map(str::to_ascii_lowercase).unwrap_or_default()
    }

    /// Case-insensitive field comparison
    #[inline]
    pub fn field_eq(&self, index: usize, expected: &str) -> bool {
        self.field(index)
            .is_some_and(|f| f.eq_ignore_ascii_case(expected))
    }
}

/// All objects of a document keyed by upper-cased type
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    objects: FxHashMap<String, Vec<ObjectRecord>>,
    /// Types in order of first appearance
    type_order: Vec<String>,
}

impl ParsedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record; later duplicates are kept after earlier ones
    pub fn push(&mut self, object_type: &str, record: ObjectRecord) {
        let key = object_type.to_ascii_uppercase();
        match self.objects.get_mut(&key) {
            Some(records) => records.push(record),
            None => {
                self.type_order.push(key.clone());
                self.objects.insert(key, vec![record]);
            }
        }
    }

    /// All records of a type (case-insensitive); empty when absent
    pub fn get(&self, object_type: &str) -> &[ObjectRecord] {
        self.objects
            .get(&object_type.to_ascii_uppercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True if at least one object of this type exists
    pub fn contains(&self, object_type: &str) -> bool {
        !self.get(object_type).is_empty()
    }

    /// First record of a type whose name matches (case-insensitive)
    pub fn find(&self, object_type: &str, name: &str) -> Option<&ObjectRecord> {
        self.get(object_type)
            .iter()
            .find(|r| r.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Object types in order of first appearance
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.type_order.iter().map(String::as_str)
    }

    /// Iterate (type, records) in order of first appearance
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ObjectRecord])> {
        self.type_order
            .iter()
            .map(move |t| (t.as_str(), self.get(t)))
    }

    /// Total number of objects
    pub fn object_count(&self) -> usize {
        self.objects.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
