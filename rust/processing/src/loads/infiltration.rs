// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Infiltration per unit of exposed area.
//!
//! Design flow rates, zone effective leakage areas and AirflowNetwork
//! surface leakage all contribute. Results are normalized by facade area,
//! or by floor area when the zone has no exterior walls.

use idf_lite_core::{Anomaly, ObjectRecord};
use idf_lite_geometry::surface::{SurfaceLayout, SURFACE_OBJECT};
use idf_lite_geometry::ZoneGeometry;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::{invalid_value, required_number, LoadContext, ZoneLoadMap, ZoneSums};

pub const DESIGN_FLOW_OBJECT: &str = "ZONEINFILTRATION:DESIGNFLOWRATE";
pub const LEAKAGE_AREA_OBJECT: &str = "ZONEINFILTRATION:EFFECTIVELEAKAGEAREA";
pub const AFN_LEAKAGE_OBJECT: &str = "AIRFLOWNETWORK:MULTIZONE:SURFACE:EFFECTIVELEAKAGEAREA";
pub const AFN_SURFACE_OBJECT: &str = "AIRFLOWNETWORK:MULTIZONE:SURFACE";

const ZONE_FIELD: usize = 1;
const METHOD_FIELD: usize = 3;
const FLOW_FIELD: usize = 4;
const PER_FLOOR_AREA_FIELD: usize = 5;
const PER_EXTERIOR_AREA_FIELD: usize = 6;
const ACH_FIELD: usize = 7;

const LEAKAGE_AREA_FIELD: usize = 3;
const AFN_LEAKAGE_AREA_FIELD: usize = 1;
const AFN_SURFACE_NAME_FIELD: usize = 0;
const AFN_COMPONENT_FIELD: usize = 1;

/// Flow through one m² of leakage area at 4 Pa, sqrt(2 * 4 / 1.2)
const LEAKAGE_FLOW_FACTOR: f64 = 2.58;

/// Leakage areas above this are taken to be in cm²
const CM2_THRESHOLD: f64 = 1.0;

fn leakage_m2(value: f64) -> f64 {
    if value > CM2_THRESHOLD {
        value / 10_000.0
    } else {
        value
    }
}

fn normalizing_area(zone: &ZoneGeometry) -> f64 {
    if zone.facade_area_m2 > 0.0 {
        zone.facade_area_m2
    } else {
        zone.floor_area_m2
    }
}

/// Infiltration in m³/s per m² of facade for every zone
pub fn infiltration(ctx: &LoadContext<'_>, anomalies: &mut Vec<Anomaly>) -> ZoneLoadMap {
    let mut sums = ZoneSums::zeroed(ctx.geometry);
    design_flow_rates(ctx, &mut sums, anomalies);
    zone_leakage_areas(ctx, &mut sums, anomalies);
    airflow_network(ctx, &mut sums, anomalies);
    sums.into_values()
}

fn design_flow_rates(ctx: &LoadContext<'_>, sums: &mut ZoneSums, anomalies: &mut Vec<Anomaly>) {
    for record in ctx.doc.get(DESIGN_FLOW_OBJECT) {
        let zones = ctx.target_zones(DESIGN_FLOW_OBJECT, record, ZONE_FIELD, anomalies);
        if zones.is_empty() {
            continue;
        }

        let method = record.keyword(METHOD_FIELD);
        let field = match method.as_str() {
            "flow/zone" | "level" => FLOW_FIELD,
            "flow/area" => PER_FLOOR_AREA_FIELD,
            "flow/exteriorarea" | "flow/exteriorwallarea" => PER_EXTERIOR_AREA_FIELD,
            "airchanges/hour" => ACH_FIELD,
            _ => {
                anomalies.push(invalid_value(DESIGN_FLOW_OBJECT, record, METHOD_FIELD));
                continue;
            }
        };
        let Some(value) = required_number(DESIGN_FLOW_OBJECT, record, field, anomalies) else {
            continue;
        };

        for zone in zones {
            let area = normalizing_area(zone);
            if area <= 0.0 {
                debug!(zone = %zone.name, "Skipping infiltration for zone without area");
                continue;
            }
            let flow = match field {
                FLOW_FIELD => value,
                PER_FLOOR_AREA_FIELD => value * zone.floor_area_m2,
                PER_EXTERIOR_AREA_FIELD => value * zone.facade_area_m2,
                _ if zone.volume_m3 > 0.0 => value * zone.volume_m3 / 3600.0,
                _ => {
                    anomalies.push(Anomaly::missing_geometry(
                        &zone.name,
                        "air change rate given but zone volume is unknown",
                    ));
                    continue;
                }
            };
            sums.add(&zone.name, flow / area);
        }
    }
}

fn zone_leakage_areas(ctx: &LoadContext<'_>, sums: &mut ZoneSums, anomalies: &mut Vec<Anomaly>) {
    for record in ctx.doc.get(LEAKAGE_AREA_OBJECT) {
        let zones = ctx.target_zones(LEAKAGE_AREA_OBJECT, record, ZONE_FIELD, anomalies);
        if zones.is_empty() {
            continue;
        }
        let Some(ela) = required_number(LEAKAGE_AREA_OBJECT, record, LEAKAGE_AREA_FIELD, anomalies)
        else {
            continue;
        };
        for zone in zones {
            let area = normalizing_area(zone);
            if area > 0.0 {
                sums.add(&zone.name, leakage_m2(ela) * LEAKAGE_FLOW_FACTOR / area);
            }
        }
    }
}

/// Zone owning an AirflowNetwork surface
///
/// Falls back to the first zone whose name appears inside the surface name.
fn surface_zone<'a>(
    ctx: &LoadContext<'a>,
    surface_zones: &FxHashMap<String, &str>,
    surface: &str,
) -> Option<&'a ZoneGeometry> {
    let key = surface.trim().to_ascii_uppercase();
    surface_zones
        .get(&key)
        .and_then(|zone| ctx.geometry.get(zone))
        .or_else(|| {
            ctx.geometry
                .iter()
                .find(|z| key.contains(&z.name.to_ascii_uppercase()))
        })
}

fn airflow_network(ctx: &LoadContext<'_>, sums: &mut ZoneSums, anomalies: &mut Vec<Anomaly>) {
    let components = ctx.doc.get(AFN_SURFACE_OBJECT);
    if components.is_empty() {
        return;
    }

    let mut leakage: FxHashMap<String, f64> = FxHashMap::default();
    for record in ctx.doc.get(AFN_LEAKAGE_OBJECT) {
        if let Some(ela) =
            required_number(AFN_LEAKAGE_OBJECT, record, AFN_LEAKAGE_AREA_FIELD, anomalies)
        {
            leakage.insert(record.name().trim().to_ascii_uppercase(), leakage_m2(ela));
        }
    }

    let surface_zones: FxHashMap<String, &str> = ctx
        .doc
        .get(SURFACE_OBJECT)
        .iter()
        .map(|r: &ObjectRecord| {
            let layout = SurfaceLayout::detect(r);
            (
                r.name().trim().to_ascii_uppercase(),
                r.field(layout.zone).unwrap_or("").trim(),
            )
        })
        .collect();

    for record in components {
        let surface = record.field(AFN_SURFACE_NAME_FIELD).unwrap_or("");
        let Some(zone) = surface_zone(ctx, &surface_zones, surface) else {
            anomalies.push(Anomaly::unresolved(
                format!("{} zone", AFN_SURFACE_OBJECT),
                surface,
            ));
            continue;
        };

        let component = record
            .field(AFN_COMPONENT_FIELD)
            .unwrap_or("")
            .trim()
            .to_ascii_uppercase();
        let Some(&ela) = leakage.get(&component).filter(|ela| **ela > 0.0) else {
            // Cracks and other component types carry no leakage area
            continue;
        };

        let area = normalizing_area(zone);
        if area > 0.0 {
            sums.add(&zone.name, ela * LEAKAGE_FLOW_FACTOR / area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use idf_lite_core::parse_str;
    use idf_lite_geometry::zone_geometry;

    /// 10 x 5 x 3 box: floor 50, one exterior wall of 30 m²
    const BOX: &str = "
        Zone, Box, 0, 0, 0, 0, 1, 1;
        BuildingSurface:Detailed, Box Floor, Floor, Slab, Box, Ground, , NoSun, NoWind, , 4,
            0, 0, 0,  0, 5, 0,  10, 5, 0,  10, 0, 0;
        BuildingSurface:Detailed, Box South, Wall, Wall, Box, Outdoors, , SunExposed, WindExposed, , 4,
            0, 0, 3,  0, 0, 0,  10, 0, 0,  10, 0, 3;
        BuildingSurface:Detailed, Box Roof, Roof, Roof, Box, Outdoors, , SunExposed, WindExposed, , 4,
            0, 0, 3,  10, 0, 3,  10, 5, 3,  0, 5, 3;
    ";

    fn run(extra: &str) -> (f64, Vec<Anomaly>) {
        let doc = parse_str(&format!("{}{}", BOX, extra)).unwrap();
        let geometry = zone_geometry(&doc).zones;
        let ctx = LoadContext::new(&doc, &geometry);
        let mut anomalies = Vec::new();
        let values = infiltration(&ctx, &mut anomalies);
        (values["Box"].as_f64().unwrap(), anomalies)
    }

    #[test]
    fn test_air_changes_formula() {
        let (value, anomalies) = run(
            "ZoneInfiltration:DesignFlowRate, Inf, Box, Sched, AirChanges/Hour, , , , 0.5;",
        );
        assert!(anomalies.is_empty());
        // 0.5 * 150 / 3600 / 30
        assert_relative_eq!(value, 0.5 * 150.0 / 3600.0 / 30.0, epsilon = 1e-12);
    }

    #[test]
    fn test_flow_methods() {
        let (value, _) = run("ZoneInfiltration:DesignFlowRate, Inf, Box, Sched, Flow/Zone, 0.06;");
        assert_relative_eq!(value, 0.002);

        let (value, _) = run(
            "ZoneInfiltration:DesignFlowRate, Inf, Box, Sched, Flow/Area, , 0.0003;",
        );
        assert_relative_eq!(value, 0.0003 * 50.0 / 30.0);

        let (value, _) = run(
            "ZoneInfiltration:DesignFlowRate, Inf, Box, Sched, Flow/ExteriorWallArea, , , 0.0002;",
        );
        assert_relative_eq!(value, 0.0002);
    }

    #[test]
    fn test_leakage_area_in_cm2() {
        let (value, _) = run("ZoneInfiltration:EffectiveLeakageArea, ELA, Box, Sched, 300;");
        assert_relative_eq!(value, 0.03 * 2.58 / 30.0);
    }

    #[test]
    fn test_airflow_network_surface() {
        let (value, anomalies) = run("
            AirflowNetwork:MultiZone:Surface:EffectiveLeakageArea, Wall Leak, 0.01, 1, 4, 0.65;
            AirflowNetwork:MultiZone:Surface, Box South, Wall Leak;
        ");
        assert!(anomalies.is_empty());
        assert_relative_eq!(value, 0.01 * 2.58 / 30.0);
    }
}
