// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building-level and zone-assigned process loads
//!
//! Exterior lighting and fuel equipment belong to the building as a whole
//! and carry no zone. Elevators, refrigerated cases and compressor racks
//! are reported with their absolute power in W.

use std::fmt;

use idf_lite_core::{Anomaly, ObjectRecord, ParsedDocument};
use idf_lite_geometry::ZoneGeometryMap;
use serde::{Deserialize, Serialize};

use crate::loads::invalid_value;

pub const EXTERIOR_LIGHTS_OBJECT: &str = "EXTERIOR:LIGHTS";
pub const EXTERIOR_FUEL_OBJECT: &str = "EXTERIOR:FUELEQUIPMENT";
pub const ELECTRIC_EQUIPMENT_OBJECT: &str = "ELECTRICEQUIPMENT";
pub const REFRIGERATION_CASE_OBJECT: &str = "REFRIGERATION:CASE";
pub const COMPRESSOR_RACK_OBJECT: &str = "REFRIGERATION:COMPRESSORRACK";

const GENERAL: &str = "General";
const REFRIGERATION: &str = "Refrigeration";
const ELEVATOR: &str = "elevator";

const EQUIPMENT_SUBCATEGORY_FIELD: usize = 10;
const RACK_LOCATION_FIELD: usize = 1;
const RACK_SUBCATEGORY_FIELD: usize = 23;
const RACK_HEAT_REJECTION_ZONE_FIELD: usize = 25;

/// Zone a compressor rack rejects heat into
///
/// The location field is `Outdoors`, `Zone` (zone named later in the
/// record) or, in hand-written models, the zone name itself.
fn rack_zone(geometry: &ZoneGeometryMap, record: &ObjectRecord) -> Option<String> {
    let location = record.field(RACK_LOCATION_FIELD).unwrap_or("").trim();
    let zone = if location.eq_ignore_ascii_case("zone") {
        record.field(RACK_HEAT_REJECTION_ZONE_FIELD).unwrap_or("").trim()
    } else {
        location
    };
    geometry.canonical_name(zone).map(str::to_string)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessCategory {
    #[serde(rename = "Exterior Lighting")]
    ExteriorLighting,
    #[serde(rename = "Exterior Equipment")]
    ExteriorEquipment,
    Elevator,
    #[serde(rename = "Refrigeration Case")]
    RefrigerationCase,
    #[serde(rename = "Compressor Rack")]
    CompressorRack,
}

impl fmt::Display for ProcessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProcessCategory::ExteriorLighting => "Exterior Lighting",
            ProcessCategory::ExteriorEquipment => "Exterior Equipment",
            ProcessCategory::Elevator => "Elevator",
            ProcessCategory::RefrigerationCase => "Refrigeration Case",
            ProcessCategory::CompressorRack => "Compressor Rack",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessLoadRecord {
    pub category: ProcessCategory,
    pub name: String,
    pub power_w: f64,
    pub subcategory: String,
    /// `None` for building-level loads
    pub zone: Option<String>,
    pub details: String,
}

/// Power field: blank reads as zero, anything else must be a number
fn power(
    object_type: &str,
    record: &ObjectRecord,
    field: usize,
    anomalies: &mut Vec<Anomaly>,
) -> Option<f64> {
    match record.non_empty(field) {
        None => Some(0.0),
        Some(_) => {
            let value = record.number(field);
            if value.is_none() {
                anomalies.push(invalid_value(object_type, record, field));
            }
            value
        }
    }
}

fn text_or(record: &ObjectRecord, field: usize, default: &str) -> String {
    record.non_empty(field).unwrap_or(default).to_string()
}

/// Every process load in the document, grouped by category
pub fn process_loads(
    doc: &ParsedDocument,
    geometry: &ZoneGeometryMap,
    anomalies: &mut Vec<Anomaly>,
) -> Vec<ProcessLoadRecord> {
    let mut loads = Vec::new();

    for record in doc.get(EXTERIOR_LIGHTS_OBJECT) {
        let Some(power_w) = power(EXTERIOR_LIGHTS_OBJECT, record, 2, anomalies) else {
            continue;
        };
        loads.push(ProcessLoadRecord {
            category: ProcessCategory::ExteriorLighting,
            name: record.name().to_string(),
            power_w,
            subcategory: text_or(record, 4, GENERAL),
            zone: None,
            details: record
                .non_empty(3)
                .map(|c| format!("Control: {}", c))
                .unwrap_or_default(),
        });
    }

    for record in doc.get(EXTERIOR_FUEL_OBJECT) {
        let Some(power_w) = power(EXTERIOR_FUEL_OBJECT, record, 3, anomalies) else {
            continue;
        };
        loads.push(ProcessLoadRecord {
            category: ProcessCategory::ExteriorEquipment,
            name: record.name().to_string(),
            power_w,
            subcategory: text_or(record, 4, GENERAL),
            zone: None,
            details: format!("Fuel: {}", record.field(1).unwrap_or("")),
        });
    }

    for record in doc.get(ELECTRIC_EQUIPMENT_OBJECT) {
        let subcategory = record.field(EQUIPMENT_SUBCATEGORY_FIELD).unwrap_or("");
        if !subcategory.to_ascii_lowercase().contains(ELEVATOR) {
            continue;
        }
        let zone = record.field(1).unwrap_or("").trim();
        let power_w = match record.keyword(3).as_str() {
            "watts/area" | "perarea" => {
                let Some(density) = power(ELECTRIC_EQUIPMENT_OBJECT, record, 5, anomalies) else {
                    continue;
                };
                density * geometry.get(zone).map_or(0.0, |z| z.floor_area_m2)
            }
            _ => {
                let Some(level) = power(ELECTRIC_EQUIPMENT_OBJECT, record, 4, anomalies) else {
                    continue;
                };
                level
            }
        };
        loads.push(ProcessLoadRecord {
            category: ProcessCategory::Elevator,
            name: record.name().to_string(),
            power_w,
            subcategory: subcategory.to_string(),
            zone: Some(geometry.canonical_name(zone).unwrap_or(zone).to_string()),
            details: "Zone-assigned equipment".to_string(),
        });
    }

    for record in doc.get(REFRIGERATION_CASE_OBJECT) {
        let capacity = power(REFRIGERATION_CASE_OBJECT, record, 5, anomalies);
        let length = power(REFRIGERATION_CASE_OBJECT, record, 8, anomalies);
        let (Some(capacity), Some(length)) = (capacity, length) else {
            continue;
        };
        let zone = record.field(2).unwrap_or("").trim();
        loads.push(ProcessLoadRecord {
            category: ProcessCategory::RefrigerationCase,
            name: record.name().to_string(),
            power_w: capacity * length,
            subcategory: REFRIGERATION.to_string(),
            zone: Some(geometry.canonical_name(zone).unwrap_or(zone).to_string()),
            details: format!("Length: {}m, Capacity/m: {}W/m", length, capacity),
        });
    }

    for record in doc.get(COMPRESSOR_RACK_OBJECT) {
        let Some(power_w) = power(COMPRESSOR_RACK_OBJECT, record, 4, anomalies) else {
            continue;
        };
        loads.push(ProcessLoadRecord {
            category: ProcessCategory::CompressorRack,
            name: record.name().to_string(),
            power_w,
            subcategory: text_or(record, RACK_SUBCATEGORY_FIELD, REFRIGERATION),
            zone: rack_zone(geometry, record),
            details: format!(
                "Heat rejection: {}, Design COP: {}",
                record.field(RACK_LOCATION_FIELD).unwrap_or(""),
                record.field(2).unwrap_or("")
            ),
        });
    }

    loads
}

#[cfg(test)]
mod tests {
    use super::*;
    use idf_lite_core::parse_str;
    use idf_lite_geometry::zone_geometry;

    const IDF: &str = "
        Zone, Core_ZN, 0, 0, 0, 0, 1, 1, 3, autocalculate, 100;
        Exterior:Lights, Parking Lights, Always On, 12000, AstronomicalClock, Exterior Facade Lighting;
        Exterior:FuelEquipment, Elevator Ext, Electricity, Always On, 20000;
        ElectricEquipment, Core_ZN Elevator, CORE_ZN, Elev Sched, EquipmentLevel, 16055, , , 0, 0.5, 0, Elevators;
        ElectricEquipment, Core_ZN Plugs, Core_ZN, Eq Sched, Watts/Area, , 10;
        Refrigeration:Case, Dairy Case, Always On, Core_ZN, 23.9, 55, 1200, 0.1, 0.85, 3.0;
        Refrigeration:CompressorRack, Rack 1, Outdoors, 2.0, COP Curve, 1025.0;
    ";

    #[test]
    fn test_all_categories() {
        let doc = parse_str(IDF).unwrap();
        let geometry = zone_geometry(&doc).zones;
        let mut anomalies = Vec::new();
        let loads = process_loads(&doc, &geometry, &mut anomalies);

        assert!(anomalies.is_empty());
        assert_eq!(loads.len(), 5);

        assert_eq!(loads[0].category, ProcessCategory::ExteriorLighting);
        assert_eq!(loads[0].power_w, 12000.0);
        assert_eq!(loads[0].zone, None);
        assert_eq!(loads[0].subcategory, "Exterior Facade Lighting");

        assert_eq!(loads[1].subcategory, "General");
        assert_eq!(loads[1].details, "Fuel: Electricity");

        assert_eq!(loads[2].category, ProcessCategory::Elevator);
        assert_eq!(loads[2].zone.as_deref(), Some("Core_ZN"));
        assert_eq!(loads[2].power_w, 16055.0);

        assert_eq!(loads[3].power_w, 1200.0 * 3.0);
        assert_eq!(loads[4].subcategory, "Refrigeration");
        assert_eq!(loads[4].zone, None);
    }

    #[test]
    fn test_unparsable_power_skipped() {
        let doc = parse_str("Exterior:Lights, Bad, Always On, bright;").unwrap();
        let mut anomalies = Vec::new();
        let loads = process_loads(&doc, &ZoneGeometryMap::default(), &mut anomalies);
        assert!(loads.is_empty());
        assert_eq!(anomalies.len(), 1);
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&ProcessCategory::RefrigerationCase).unwrap();
        assert_eq!(json, "\"Refrigeration Case\"");
    }

    #[test]
    fn test_rack_zone_from_heat_rejection_location() {
        let blanks = ", ".repeat(18);
        let doc = parse_str(&format!(
            "Zone, Core_ZN, 0, 0, 0, 0, 1, 1, 3, autocalculate, 100;
             Refrigeration:CompressorRack, Rack Z, Zone, 2.0, COP Curve, 1025.0, {}Racks, Case List, core_zn;
             Refrigeration:CompressorRack, Rack N, Core_ZN, 2.0, COP Curve, 800.0;
             Refrigeration:CompressorRack, Rack O, Outdoors, 2.0, COP Curve, 600.0;",
            blanks
        ))
        .unwrap();
        let geometry = zone_geometry(&doc).zones;
        let loads = process_loads(&doc, &geometry, &mut Vec::new());

        assert_eq!(loads.len(), 3);
        assert_eq!(loads[0].subcategory, "Racks");
        assert_eq!(loads[0].zone.as_deref(), Some("Core_ZN"));
        assert_eq!(loads[1].zone.as_deref(), Some("Core_ZN"));
        assert_eq!(loads[2].zone, None);
    }
}
