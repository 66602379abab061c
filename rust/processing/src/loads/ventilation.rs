// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outdoor air requirements per person and per floor area.

use idf_lite_core::Anomaly;
use idf_lite_geometry::ZoneGeometry;
use rustc_hash::FxHashMap;

use super::{invalid_value, optional_number, required_number, LoadContext, ZoneLoadMap, ZoneSums};

pub const OUTDOOR_AIR_OBJECT: &str = "DESIGNSPECIFICATION:OUTDOORAIR";
pub const SIZING_ZONE_OBJECT: &str = "SIZING:ZONE";
pub const ZONE_VENTILATION_OBJECT: &str = "ZONEVENTILATION:DESIGNFLOWRATE";

const OA_METHOD_FIELD: usize = 1;
const OA_PER_PERSON_FIELD: usize = 2;
const OA_PER_AREA_FIELD: usize = 3;
const OA_PER_ZONE_FIELD: usize = 4;
const OA_ACH_FIELD: usize = 5;

const VENT_ZONE_FIELD: usize = 1;
const VENT_METHOD_FIELD: usize = 3;
const VENT_FLOW_FIELD: usize = 4;
const VENT_PER_AREA_FIELD: usize = 5;
const VENT_PER_PERSON_FIELD: usize = 6;
const VENT_ACH_FIELD: usize = 7;

/// Per-person and per-area ventilation for every zone
#[derive(Debug, Clone, Default)]
pub struct Ventilation {
    /// m³/s per person
    pub per_person: ZoneLoadMap,
    /// m³/s per m² floor
    pub per_area: ZoneLoadMap,
}

struct Totals {
    per_person: ZoneSums,
    per_area: ZoneSums,
}

impl Totals {
    fn add_flow(&mut self, zone: &ZoneGeometry, flow_m3s: f64) {
        if zone.floor_area_m2 > 0.0 {
            self.per_area.add(&zone.name, flow_m3s / zone.floor_area_m2);
        }
    }

    fn add_air_changes(&mut self, zone: &ZoneGeometry, ach: f64, anomalies: &mut Vec<Anomaly>) {
        if zone.volume_m3 <= 0.0 {
            anomalies.push(Anomaly::missing_geometry(
                &zone.name,
                "air change rate given but zone volume is unknown",
            ));
            return;
        }
        self.add_flow(zone, ach * zone.volume_m3 / 3600.0);
    }
}

/// Ventilation from outdoor-air design specifications and zone ventilation objects
pub fn ventilation(ctx: &LoadContext<'_>, anomalies: &mut Vec<Anomaly>) -> Ventilation {
    let mut totals = Totals {
        per_person: ZoneSums::zeroed(ctx.geometry),
        per_area: ZoneSums::zeroed(ctx.geometry),
    };
    outdoor_air_specifications(ctx, &mut totals, anomalies);
    zone_ventilation(ctx, &mut totals, anomalies);
    Ventilation {
        per_person: totals.per_person.into_values(),
        per_area: totals.per_area.into_values(),
    }
}

/// Zones whose `Sizing:Zone` object references each outdoor-air specification
fn sizing_references<'a>(ctx: &LoadContext<'a>) -> FxHashMap<String, Vec<&'a ZoneGeometry>> {
    let specs: Vec<String> = ctx
        .doc
        .get(OUTDOOR_AIR_OBJECT)
        .iter()
        .map(|r| r.name().trim().to_ascii_uppercase())
        .collect();

    let mut references: FxHashMap<String, Vec<&'a ZoneGeometry>> = FxHashMap::default();
    for sizing in ctx.doc.get(SIZING_ZONE_OBJECT) {
        let zones: Vec<&'a ZoneGeometry> = ctx
            .zones
            .resolve(sizing.name())
            .into_iter()
            .filter_map(|z| ctx.geometry.get(z))
            .collect();
        for field in sizing.fields().get(1..).unwrap_or_default() {
            let key = field.trim().to_ascii_uppercase();
            if !key.is_empty() && specs.contains(&key) {
                references.entry(key).or_default().extend(zones.iter().copied());
            }
        }
    }
    references
}

/// Zone with the longest name contained in `spec_name`
fn zone_named_in<'a>(ctx: &LoadContext<'a>, spec_name: &str) -> Option<&'a ZoneGeometry> {
    let upper = spec_name.to_ascii_uppercase();
    ctx.geometry
        .iter()
        .filter(|z| upper.contains(&z.name.to_ascii_uppercase()))
        .max_by_key(|z| z.name.len())
}

/// Whether a specification method reads `field`; combined methods read all
fn method_uses_field(method: &str, field: usize) -> bool {
    match method {
        "flow/person" => field == OA_PER_PERSON_FIELD,
        "flow/area" => field == OA_PER_AREA_FIELD,
        "flow/zone" => field == OA_PER_ZONE_FIELD,
        "airchanges/hour" => field == OA_ACH_FIELD,
        _ => true,
    }
}

fn outdoor_air_specifications(
    ctx: &LoadContext<'_>,
    totals: &mut Totals,
    anomalies: &mut Vec<Anomaly>,
) {
    let references = sizing_references(ctx);

    for record in ctx.doc.get(OUTDOOR_AIR_OBJECT) {
        let key = record.name().trim().to_ascii_uppercase();
        let zones = match references.get(&key) {
            Some(zones) => zones.clone(),
            None => zone_named_in(ctx, record.name()).into_iter().collect(),
        };
        if zones.is_empty() {
            anomalies.push(Anomaly::unresolved(
                format!("{} zone", OUTDOOR_AIR_OBJECT),
                record.name(),
            ));
            continue;
        }

        let method = record.keyword(OA_METHOD_FIELD);
        let mut read = |field: usize| {
            if method_uses_field(&method, field) {
                optional_number(OUTDOOR_AIR_OBJECT, record, field, anomalies)
            } else {
                None
            }
        };

        let per_person = read(OA_PER_PERSON_FIELD);
        let per_area = read(OA_PER_AREA_FIELD);
        let per_zone = read(OA_PER_ZONE_FIELD);
        let ach = read(OA_ACH_FIELD);

        for zone in zones {
            if let Some(v) = per_person {
                totals.per_person.add(&zone.name, v);
            }
            if let Some(v) = per_area {
                totals.per_area.add(&zone.name, v);
            }
            if let Some(v) = per_zone {
                totals.add_flow(zone, v);
            }
            if let Some(v) = ach {
                totals.add_air_changes(zone, v, anomalies);
            }
        }
    }
}

fn zone_ventilation(ctx: &LoadContext<'_>, totals: &mut Totals, anomalies: &mut Vec<Anomaly>) {
    for record in ctx.doc.get(ZONE_VENTILATION_OBJECT) {
        let zones = ctx.target_zones(ZONE_VENTILATION_OBJECT, record, VENT_ZONE_FIELD, anomalies);
        if zones.is_empty() {
            continue;
        }
        let method = record.keyword(VENT_METHOD_FIELD);
        let field = match method.as_str() {
            "flow/zone" | "level" => VENT_FLOW_FIELD,
            "flow/area" => VENT_PER_AREA_FIELD,
            "flow/person" | "perperson" => VENT_PER_PERSON_FIELD,
            "airchanges/hour" => VENT_ACH_FIELD,
            _ => {
                anomalies.push(invalid_value(ZONE_VENTILATION_OBJECT, record, VENT_METHOD_FIELD));
                continue;
            }
        };
        let Some(value) = required_number(ZONE_VENTILATION_OBJECT, record, field, anomalies) else {
            continue;
        };
        for zone in zones {
            apply_zone_ventilation(totals, zone, field, value, anomalies);
        }
    }
}

fn apply_zone_ventilation(
    totals: &mut Totals,
    zone: &ZoneGeometry,
    field: usize,
    value: f64,
    anomalies: &mut Vec<Anomaly>,
) {
    match field {
        VENT_FLOW_FIELD => totals.add_flow(zone, value),
        VENT_PER_AREA_FIELD => totals.per_area.add(&zone.name, value),
        VENT_PER_PERSON_FIELD => totals.per_person.add(&zone.name, value),
        _ => totals.add_air_changes(zone, value, anomalies),
    }
}
