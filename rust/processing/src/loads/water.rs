// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service hot water from `WaterUse:Equipment`.
//!
//! Residential models often leave the zone field blank. In that case an
//! `_unitN` suffix on the equipment name selects the matching living zone,
//! and a model with exactly one living zone uses that zone.

use std::sync::LazyLock;

use idf_lite_core::{Anomaly, ObjectRecord};
use idf_lite_geometry::ZoneGeometry;
use regex::Regex;

use super::{required_number, LoadContext, ZoneLoadMap, ZoneSums};

pub const WATER_USE_OBJECT: &str = "WATERUSE:EQUIPMENT";

const PEAK_FLOW_FIELD: usize = 2;
const ZONE_FIELD: usize = 7;

/// m³/s to L/h
const M3S_TO_LH: f64 = 3_600_000.0;

static UNIT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(_unit\d+)$").expect("Invalid regex"));

const LIVING: &str = "LIVING";

fn living_zone<'a>(ctx: &LoadContext<'a>, record: &ObjectRecord) -> Option<&'a ZoneGeometry> {
    if let Some(unit) = UNIT_SUFFIX.captures(record.name().trim()) {
        let suffix = unit[1].to_ascii_uppercase();
        let found = ctx.geometry.iter().find(|z| {
            let upper = z.name.to_ascii_uppercase();
            upper.ends_with(&suffix) && upper.contains(LIVING)
        });
        if found.is_some() {
            return found;
        }
    }

    let mut living = ctx
        .geometry
        .iter()
        .filter(|z| z.name.to_ascii_uppercase().contains(LIVING));
    match (living.next(), living.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

/// Service hot water in L/h·m² for every zone
pub fn service_hot_water(ctx: &LoadContext<'_>, anomalies: &mut Vec<Anomaly>) -> ZoneLoadMap {
    let mut sums = ZoneSums::zeroed(ctx.geometry);

    for record in ctx.doc.get(WATER_USE_OBJECT) {
        let reference = record.field(ZONE_FIELD).unwrap_or("").trim();
        let zone = ctx
            .geometry
            .get(reference)
            .filter(|_| !reference.is_empty())
            .or_else(|| living_zone(ctx, record));

        let Some(zone) = zone else {
            anomalies.push(Anomaly::unresolved(
                format!("{} '{}' zone", WATER_USE_OBJECT, record.name()),
                reference,
            ));
            continue;
        };
        if zone.floor_area_m2 <= 0.0 {
            continue;
        }

        let Some(peak) = required_number(WATER_USE_OBJECT, record, PEAK_FLOW_FIELD, anomalies)
        else {
            continue;
        };
        sums.add(&zone.name, peak * M3S_TO_LH / zone.floor_area_m2);
    }

    sums.into_values()
}
