// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Which schedule drives which load in which zones.

use std::collections::{BTreeMap, BTreeSet};

use idf_lite_core::ParsedDocument;
use serde::{Deserialize, Serialize};

use crate::loads::{zone_setpoint_schedules, LoadKind};
use crate::zones::{zone_names, ZoneResolver};

/// Load objects with their zone and schedule field positions
const SCHEDULED_LOADS: &[(&str, LoadKind, usize, usize)] = &[
    ("PEOPLE", LoadKind::Occupancy, 1, 2),
    ("LIGHTS", LoadKind::Lighting, 1, 2),
    ("ELECTRICEQUIPMENT", LoadKind::ElectricEquipment, 1, 2),
    ("GASEQUIPMENT", LoadKind::GasEquipment, 1, 2),
    ("ZONEINFILTRATION:DESIGNFLOWRATE", LoadKind::Infiltration, 1, 2),
    ("WATERUSE:EQUIPMENT", LoadKind::ServiceHotWater, 7, 3),
];

/// Report order of load types
const LOAD_ORDER: [LoadKind; 8] = [
    LoadKind::Occupancy,
    LoadKind::Lighting,
    LoadKind::ElectricEquipment,
    LoadKind::GasEquipment,
    LoadKind::Infiltration,
    LoadKind::ServiceHotWater,
    LoadKind::HeatingSetpoint,
    LoadKind::CoolingSetpoint,
];

fn load_rank(kind: LoadKind) -> usize {
    LOAD_ORDER
        .iter()
        .position(|&k| k == kind)
        .unwrap_or(LOAD_ORDER.len())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleAssignment {
    pub load_type: LoadKind,
    pub schedule_name: String,
    /// Sorted, deduplicated zone names
    pub zones: Vec<String>,
}

#[derive(Default)]
struct Assignments {
    map: BTreeMap<(LoadKind, String), BTreeSet<String>>,
}

impl Assignments {
    fn add(&mut self, kind: LoadKind, schedule: &str, zones: impl IntoIterator<Item = String>) {
        let schedule = schedule.trim();
        if schedule.is_empty() {
            return;
        }
        self.map
            .entry((kind, schedule.to_string()))
            .or_default()
            .extend(zones);
    }
}

/// Zones named by a reference; unknown names are kept as written
fn referenced_zones(zones: &ZoneResolver, reference: &str) -> Vec<String> {
    let resolved = zones.resolve(reference);
    if resolved.is_empty() {
        vec![reference.to_string()]
    } else {
        resolved.into_iter().map(str::to_string).collect()
    }
}

/// Schedule assignments ordered by load type, then schedule name
pub fn schedule_assignments(doc: &ParsedDocument) -> Vec<ScheduleAssignment> {
    let zones = ZoneResolver::new(doc, zone_names(doc));
    let mut assignments = Assignments::default();

    for &(object_type, kind, zone_field, schedule_field) in SCHEDULED_LOADS {
        for record in doc.get(object_type) {
            let (Some(zone), Some(schedule)) =
                (record.non_empty(zone_field), record.non_empty(schedule_field))
            else {
                continue;
            };
            assignments.add(kind, schedule, referenced_zones(&zones, zone.trim()));
        }
    }

    for (zone, schedules) in zone_setpoint_schedules(doc, &zones) {
        if let Some(heating) = schedules.heating {
            assignments.add(LoadKind::HeatingSetpoint, heating, [zone.clone()]);
        }
        if let Some(cooling) = schedules.cooling {
            assignments.add(LoadKind::CoolingSetpoint, cooling, [zone]);
        }
    }

    let mut ordered: Vec<ScheduleAssignment> = assignments
        .map
        .into_iter()
        .map(|((load_type, schedule_name), zones)| ScheduleAssignment {
            load_type,
            schedule_name,
            zones: zones.into_iter().collect(),
        })
        .collect();
    // stable, so schedule names stay sorted within a load type
    ordered.sort_by_key(|a| load_rank(a.load_type));
    ordered
}
