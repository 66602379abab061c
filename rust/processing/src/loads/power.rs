// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lighting and equipment power densities.
//!
//! `Lights`, `ElectricEquipment` and `GasEquipment` share the same field
//! layout; only the keyword naming the absolute-level method differs.

use idf_lite_core::Anomaly;

use super::{invalid_value, required_number, LoadContext, ZoneLoadMap, ZoneSums};

const ZONE_FIELD: usize = 1;
const METHOD_FIELD: usize = 3;
const LEVEL_FIELD: usize = 4;
const PER_AREA_FIELD: usize = 5;
const PER_PERSON_FIELD: usize = 6;

/// One family of power-density objects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerLoad {
    pub object_type: &'static str,
    pub level_keyword: &'static str,
}

impl PowerLoad {
    pub const LIGHTS: PowerLoad = PowerLoad {
        object_type: "LIGHTS",
        level_keyword: "lightinglevel",
    };
    pub const ELECTRIC_EQUIPMENT: PowerLoad = PowerLoad {
        object_type: "ELECTRICEQUIPMENT",
        level_keyword: "equipmentlevel",
    };
    pub const GAS_EQUIPMENT: PowerLoad = PowerLoad {
        object_type: "GASEQUIPMENT",
        level_keyword: "equipmentlevel",
    };

    /// W/m² for every zone
    ///
    /// `occupancy` supplies people/m² for the per-person method.
    pub fn extract(
        self,
        ctx: &LoadContext<'_>,
        occupancy: &ZoneLoadMap,
        anomalies: &mut Vec<Anomaly>,
    ) -> ZoneLoadMap {
        let object_type = self.object_type;
        let mut sums = ZoneSums::zeroed(ctx.geometry);

        for record in ctx.doc.get(object_type) {
            let zones = ctx.target_zones(object_type, record, ZONE_FIELD, anomalies);
            if zones.is_empty() {
                continue;
            }

            let method = record.keyword(METHOD_FIELD);
            if method == self.level_keyword || method == "level" {
                let Some(watts) = required_number(object_type, record, LEVEL_FIELD, anomalies)
                else {
                    continue;
                };
                for zone in zones.iter().filter(|z| z.floor_area_m2 > 0.0) {
                    sums.add(&zone.name, watts / zone.floor_area_m2);
                }
            } else if method == "watts/area" || method == "perarea" {
                let Some(density) = required_number(object_type, record, PER_AREA_FIELD, anomalies)
                else {
                    continue;
                };
                for zone in &zones {
                    sums.add(&zone.name, density);
                }
            } else if method == "watts/person" || method == "perperson" {
                let Some(per_person) =
                    required_number(object_type, record, PER_PERSON_FIELD, anomalies)
                else {
                    continue;
                };
                for zone in &zones {
                    let people = occupancy
                        .get(&zone.name)
                        .and_then(|v| v.as_f64())
                        .unwrap_or(0.0);
                    sums.add(&zone.name, per_person * people);
                }
            } else {
                anomalies.push(invalid_value(object_type, record, METHOD_FIELD));
            }
        }

        sums.into_values()
    }
}

/// Lighting power density (W/m²)
pub fn lighting(
    ctx: &LoadContext<'_>,
    occupancy: &ZoneLoadMap,
    anomalies: &mut Vec<Anomaly>,
) -> ZoneLoadMap {
    PowerLoad::LIGHTS.extract(ctx, occupancy, anomalies)
}

/// Electric equipment power density (W/m²)
pub fn electric_equipment(
    ctx: &LoadContext<'_>,
    occupancy: &ZoneLoadMap,
    anomalies: &mut Vec<Anomaly>,
) -> ZoneLoadMap {
    PowerLoad::ELECTRIC_EQUIPMENT.extract(ctx, occupancy, anomalies)
}

/// Gas equipment power density (W/m²)
pub fn gas_equipment(
    ctx: &LoadContext<'_>,
    occupancy: &ZoneLoadMap,
    anomalies: &mut Vec<Anomaly>,
) -> ZoneLoadMap {
    PowerLoad::GAS_EQUIPMENT.extract(ctx, occupancy, anomalies)
}
