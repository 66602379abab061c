// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Air loop controls: economizer and demand-controlled ventilation.
//!
//! A zone is traced to its air loop through the zone splitter feeding it,
//! and the loop to its controllers by name prefix.

use idf_lite_core::{ObjectRecord, ParsedDocument};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::zones::ZoneResolver;

pub const AIR_LOOP_OBJECT: &str = "AIRLOOPHVAC";
pub const SUPPLY_PATH_OBJECT: &str = "AIRLOOPHVAC:SUPPLYPATH";
pub const ZONE_SPLITTER_OBJECT: &str = "AIRLOOPHVAC:ZONESPLITTER";
pub const OUTDOOR_AIR_CONTROLLER: &str = "CONTROLLER:OUTDOORAIR";
pub const MECHANICAL_VENTILATION_CONTROLLER: &str = "CONTROLLER:MECHANICALVENTILATION";

pub const NO_ECONOMIZER: &str = "NoEconomizer";
pub const DCV_NO: &str = "No";

const AIR_LOOP_DEMAND_INLET_FIELD: usize = 8;
const SUPPLY_PATH_INLET_FIELD: usize = 1;
const SUPPLY_PATH_FIRST_COMPONENT: usize = 2;
const SPLITTER_FIRST_OUTLET: usize = 2;
const ECONOMIZER_FIELD: usize = 7;
const DCV_FIELD: usize = 2;

const SPLITTER_SUFFIX: &str = " Supply Air Splitter";
const TERMINAL_MARKER: &str = " VAV Box";

fn normalize(name: &str) -> String {
    name.trim().to_ascii_uppercase().replace(' ', "_")
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> &'a str {
    let split = name.len().saturating_sub(suffix.len());
    match (name.get(..split), name.get(split..)) {
        (Some(head), Some(tail)) if tail.eq_ignore_ascii_case(suffix) => head,
        _ => name,
    }
}

/// Zone served by a splitter outlet node
///
/// The node name starts with the zone name; the longest such zone wins.
/// Unknown prefixes fall back to the text before " VAV Box".
fn zone_for_node(zones: &ZoneResolver, node: &str) -> Option<String> {
    let upper = node.trim().to_ascii_uppercase();
    let by_prefix = zones
        .names()
        .filter(|z| upper.starts_with(&z.to_ascii_uppercase()))
        .max_by_key(|z| z.len());
    if let Some(zone) = by_prefix {
        return Some(zone.to_ascii_uppercase());
    }
    upper
        .find(&TERMINAL_MARKER.to_ascii_uppercase())
        .map(|i| upper[..i].to_string())
}

/// Air loop whose demand side starts at the supply path's inlet node
fn air_loop_for_path<'a>(doc: &'a ParsedDocument, path: &'a ObjectRecord) -> &'a str {
    let inlet = path.field(SUPPLY_PATH_INLET_FIELD).unwrap_or("").trim();
    doc.get(AIR_LOOP_OBJECT)
        .iter()
        .find(|air_loop| {
            !inlet.is_empty()
                && air_loop
                    .field(AIR_LOOP_DEMAND_INLET_FIELD)
                    .is_some_and(|n| n.trim().eq_ignore_ascii_case(inlet))
        })
        .map_or(path.name().trim(), |air_loop| air_loop.name().trim())
}

/// Controller record for each air loop, matched by longest normalized prefix
fn controllers_by_loop<'a>(
    doc: &'a ParsedDocument,
    object_type: &str,
    loops: &[String],
) -> FxHashMap<String, &'a ObjectRecord> {
    let mut matched = FxHashMap::default();
    for controller in doc.get(object_type) {
        let name = normalize(controller.name());
        let best = loops
            .iter()
            .filter(|l| name.starts_with(l.as_str()))
            .max_by_key(|l| l.len());
        if let Some(air_loop) = best {
            matched.entry(air_loop.clone()).or_insert(controller);
        }
    }
    matched
}

/// Zone to air loop to controller settings
#[derive(Debug, Clone, Default)]
pub struct ControlMap {
    /// Upper-cased zone name to normalized air loop name
    zone_loops: FxHashMap<String, String>,
    economizers: FxHashMap<String, String>,
    dcv: FxHashMap<String, String>,
}

impl ControlMap {
    pub fn build(doc: &ParsedDocument, zones: &ZoneResolver) -> Self {
        let mut splitter_loops: FxHashMap<String, &str> = FxHashMap::default();
        for path in doc.get(SUPPLY_PATH_OBJECT) {
            let components = path.fields().get(SUPPLY_PATH_FIRST_COMPONENT..).unwrap_or_default();
            for pair in components.chunks(2) {
                if let [kind, name] = pair {
                    if kind.to_ascii_uppercase().contains("ZONESPLITTER") {
                        splitter_loops.insert(name.trim().to_ascii_uppercase(), air_loop_for_path(doc, path));
                    }
                }
            }
        }

        let mut zone_loops = FxHashMap::default();
        for splitter in doc.get(ZONE_SPLITTER_OBJECT) {
            let name = splitter.name().trim();
            let air_loop = splitter_loops
                .get(&name.to_ascii_uppercase())
                .copied()
                .unwrap_or_else(|| strip_suffix_ignore_case(name, SPLITTER_SUFFIX));
            let air_loop = normalize(air_loop);

            let outlets = splitter.fields().get(SPLITTER_FIRST_OUTLET..).unwrap_or_default();
            for node in outlets {
                if let Some(zone) = zone_for_node(zones, node) {
                    zone_loops.insert(zone, air_loop.clone());
                }
            }
        }

        let mut loops: Vec<String> = zone_loops.values().cloned().collect();
        loops.sort();
        loops.dedup();

        let economizers = controllers_by_loop(doc, OUTDOOR_AIR_CONTROLLER, &loops)
            .into_iter()
            .map(|(air_loop, record)| {
                let value = positional(record, OUTDOOR_AIR_CONTROLLER, ECONOMIZER_FIELD, NO_ECONOMIZER);
                (air_loop, value)
            })
            .collect();
        let dcv = controllers_by_loop(doc, MECHANICAL_VENTILATION_CONTROLLER, &loops)
            .into_iter()
            .map(|(air_loop, record)| {
                let value = positional(record, MECHANICAL_VENTILATION_CONTROLLER, DCV_FIELD, DCV_NO);
                (air_loop, value)
            })
            .collect();

        Self {
            zone_loops,
            economizers,
            dcv,
        }
    }

    /// Normalized name of the air loop serving `zone`
    pub fn air_loop(&self, zone: &str) -> Option<&str> {
        self.zone_loops
            .get(&zone.trim().to_ascii_uppercase())
            .map(String::as_str)
    }

    /// Economizer type, `NoEconomizer` without a controller
    pub fn economizer(&self, zone: &str) -> &str {
        self.air_loop(zone)
            .and_then(|l| self.economizers.get(l))
            .map_or(NO_ECONOMIZER, String::as_str)
    }

    /// Demand-controlled ventilation flag, `No` without a controller
    pub fn dcv(&self, zone: &str) -> &str {
        self.air_loop(zone)
            .and_then(|l| self.dcv.get(l))
            .map_or(DCV_NO, String::as_str)
    }
}

fn positional(record: &ObjectRecord, object_type: &str, field: usize, default: &str) -> String {
    match record.non_empty(field) {
        Some(value) => value.to_string(),
        None => {
            debug!(
                controller = %record.name(),
                object_type,
                field,
                default,
                "Controller field missing, using default"
            );
            default.to_string()
        }
    }
}
