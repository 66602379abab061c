// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Row deduplication
//!
//! Zones of repeated floors or pods (`Office_FLR_1`, `Office_FLR_2`, ...)
//! usually carry identical loads. Rows are grouped by their base name and,
//! within a group, rows agreeing on every comparison key collapse into one
//! row with a count. Floor area never takes part in the comparison; a
//! variant whose members differ in floor area is flagged instead.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

static INDEX_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:_FLR|_Pod|_ZN|_\d)+\d*$").expect("Invalid regex"));

static ELEVATION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:_top floor|_mid floor|_bottom floor|_bottom|_top|_mid|_bot)$")
        .expect("Invalid regex")
});

fn strip_once(name: &str) -> String {
    let name = name.trim();
    let name = INDEX_SUFFIX.replace(name, "");
    let name = ELEVATION_SUFFIX.replace(&name, "");
    name.trim_end_matches(['_', ' ']).trim().to_string()
}

/// Grouping key of a zone name
///
/// Floor, pod and zone-index suffixes are removed first, then elevation
/// suffixes, repeatedly until the name stops changing. A name that would
/// strip to nothing is kept as written.
///
/// ```
/// use idf_lite_processing::collapse::base_name;
///
/// assert_eq!(base_name("Class_1_FLR_1"), "Class");
/// assert_eq!(base_name("Perimeter_top_ZN_3"), "Perimeter");
/// assert_eq!(base_name(&base_name("Core_bottom")), base_name("Core_bottom"));
/// ```
pub fn base_name(name: &str) -> String {
    let mut current = name.trim().to_string();
    loop {
        let next = strip_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    if current.is_empty() {
        name.trim().to_string()
    } else {
        current
    }
}

/// One comparable value of a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    const ZERO: Cell = Cell::Number(0.0);

    /// Numbers match within `tolerance`, text only exactly
    pub fn matches(&self, other: &Cell, tolerance: f64) -> bool {
        match (self, other) {
            (Cell::Number(a), Cell::Number(b)) => (a - b).abs() <= tolerance,
            (Cell::Text(a), Cell::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

/// An uncollapsed row: one zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub name: String,
    pub floor_area: f64,
    pub cells: BTreeMap<String, Cell>,
}

impl Row {
    pub fn new(name: impl Into<String>, floor_area: f64) -> Self {
        Self {
            name: name.into(),
            floor_area,
            cells: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, cell: impl Into<Cell>) -> Self {
        self.cells.insert(key.to_string(), cell.into());
        self
    }

    /// Cell for `key`; missing keys compare as zero
    pub fn cell(&self, key: &str) -> &Cell {
        self.cells.get(key).unwrap_or(&Cell::ZERO)
    }

    fn matches(&self, other: &Row, keys: &[&str], tolerance: f64) -> bool {
        keys.iter()
            .all(|k| self.cell(k).matches(other.cell(k), tolerance))
    }
}

/// A member zone folded into a collapsed row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub floor_area: f64,
}

/// A set of equivalent rows sharing one base name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollapsedRow {
    /// Base name when the whole group collapsed, else the first member's name
    pub name: String,
    pub base_name: String,
    pub count: usize,
    /// Floor area of the first member
    pub floor_area: f64,
    pub floor_area_varies: bool,
    /// Values of the first member
    pub cells: BTreeMap<String, Cell>,
    pub members: Vec<Member>,
}

/// Collapse `rows` into base-name groups of equivalent rows
///
/// Groups appear in order of first occurrence, as do variants within a
/// group. Each row is compared against the first row of each variant.
pub fn collapse(rows: &[Row], comparison_keys: &[&str], tolerance: f64) -> Vec<CollapsedRow> {
    let mut groups: Vec<(String, Vec<&Row>)> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    for row in rows {
        let base = base_name(&row.name);
        match index.get(&base) {
            Some(&i) => groups[i].1.push(row),
            None => {
                index.insert(base.clone(), groups.len());
                groups.push((base, vec![row]));
            }
        }
    }

    let mut collapsed = Vec::new();
    for (base, members) in groups {
        let group_size = members.len();

        let mut variants: Vec<Vec<&Row>> = Vec::new();
        for row in members {
            match variants
                .iter_mut()
                .find(|v| v[0].matches(row, comparison_keys, tolerance))
            {
                Some(variant) => variant.push(row),
                None => variants.push(vec![row]),
            }
        }

        let single_variant = variants.len() == 1;
        for variant in variants {
            let first = variant[0];
            let name = if single_variant && group_size > 1 {
                base.clone()
            } else {
                first.name.clone()
            };
            let floor_area_varies = variant
                .iter()
                .any(|r| (r.floor_area - first.floor_area).abs() > tolerance);

            collapsed.push(CollapsedRow {
                name,
                base_name: base.clone(),
                count: variant.len(),
                floor_area: first.floor_area,
                floor_area_varies,
                cells: first.cells.clone(),
                members: variant
                    .iter()
                    .map(|r| Member {
                        name: r.name.clone(),
                        floor_area: r.floor_area,
                    })
                    .collect(),
            });
        }
    }
    collapsed
}

/// One row per member, carrying the collapsed row's values
pub fn expand(rows: &[CollapsedRow]) -> Vec<Row> {
    rows.iter()
        .flat_map(|row| {
            row.members.iter().map(move |m| Row {
                name: m.name.clone(),
                floor_area: m.floor_area,
                cells: row.cells.clone(),
            })
        })
        .collect()
}
