// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zone load extraction
//!
//! Each extractor walks one family of load objects, converts every
//! supported calculation method to a common per-floor-area (or per-person)
//! unit, and sums the results per zone. Every zone starts at an explicit
//! zero so that downstream consumers never see a missing value.
//!
//! | Load | Unit |
//! |------|------|
//! | occupancy | people/m² |
//! | lighting, electric, gas | W/m² |
//! | service hot water | L/h·m² |
//! | infiltration | m³/s·m² of facade (floor when no facade) |
//! | ventilation | m³/s·person and m³/s·m² |
//! | setpoints | °C |

mod infiltration;
mod people;
mod power;
mod thermostat;
mod ventilation;
mod water;

pub use infiltration::infiltration;
pub use people::occupancy;
pub use power::{electric_equipment, gas_equipment, lighting, PowerLoad};
pub use thermostat::{
    setpoint_schedules, setpoints, zone_setpoint_schedules, SetpointSchedules, Setpoints,
    THERMOSTAT_OBJECT,
};
pub use ventilation::{ventilation, Ventilation};
pub use water::service_hot_water;

use std::collections::BTreeMap;
use std::fmt;

use idf_lite_core::{Anomaly, ObjectRecord, ParsedDocument};
use idf_lite_geometry::{ZoneGeometry, ZoneGeometryMap};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleResolver;
use crate::zones::ZoneResolver;

/// The load categories reported for every zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadKind {
    Occupancy,
    Lighting,
    ElectricEquipment,
    GasEquipment,
    ServiceHotWater,
    Infiltration,
    VentilationPerPerson,
    VentilationPerArea,
    HeatingSetpoint,
    CoolingSetpoint,
}

impl LoadKind {
    pub const ALL: [LoadKind; 10] = [
        LoadKind::Occupancy,
        LoadKind::Lighting,
        LoadKind::ElectricEquipment,
        LoadKind::GasEquipment,
        LoadKind::ServiceHotWater,
        LoadKind::Infiltration,
        LoadKind::VentilationPerPerson,
        LoadKind::VentilationPerArea,
        LoadKind::HeatingSetpoint,
        LoadKind::CoolingSetpoint,
    ];

    /// Column key used in reports and collapse comparisons
    pub fn key(self) -> &'static str {
        match self {
            LoadKind::Occupancy => "occupancy",
            LoadKind::Lighting => "lighting",
            LoadKind::ElectricEquipment => "electric_equipment",
            LoadKind::GasEquipment => "gas_equipment",
            LoadKind::ServiceHotWater => "service_hot_water",
            LoadKind::Infiltration => "infiltration",
            LoadKind::VentilationPerPerson => "ventilation_per_person",
            LoadKind::VentilationPerArea => "ventilation_per_area",
            LoadKind::HeatingSetpoint => "heating_setpoint",
            LoadKind::CoolingSetpoint => "cooling_setpoint",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            LoadKind::Occupancy => "people/m2",
            LoadKind::Lighting | LoadKind::ElectricEquipment | LoadKind::GasEquipment => "W/m2",
            LoadKind::ServiceHotWater => "L/h-m2",
            LoadKind::Infiltration | LoadKind::VentilationPerArea => "m3/s-m2",
            LoadKind::VentilationPerPerson => "m3/s-person",
            LoadKind::HeatingSetpoint | LoadKind::CoolingSetpoint => "C",
        }
    }
}

impl fmt::Display for LoadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A normalized load figure, or the raw name of what could not be resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoadValue {
    Value(f64),
    Unresolved(String),
}

impl LoadValue {
    pub const ZERO: LoadValue = LoadValue::Value(0.0);

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LoadValue::Value(v) => Some(*v),
            LoadValue::Unresolved(_) => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, LoadValue::Unresolved(_))
    }
}

impl Default for LoadValue {
    fn default() -> Self {
        LoadValue::ZERO
    }
}

impl From<f64> for LoadValue {
    fn from(v: f64) -> Self {
        LoadValue::Value(v)
    }
}

impl fmt::Display for LoadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadValue::Value(v) => write!(f, "{}", v),
            LoadValue::Unresolved(name) => f.write_str(name),
        }
    }
}

/// Per-zone values for one load kind, keyed by canonical zone name
pub type ZoneLoadMap = FxHashMap<String, LoadValue>;

/// Shared lookups for all extractors over one document
pub struct LoadContext<'a> {
    pub doc: &'a ParsedDocument,
    pub geometry: &'a ZoneGeometryMap,
    pub zones: ZoneResolver,
    pub schedules: ScheduleResolver<'a>,
}

impl<'a> LoadContext<'a> {
    pub fn new(doc: &'a ParsedDocument, geometry: &'a ZoneGeometryMap) -> Self {
        Self {
            doc,
            geometry,
            zones: ZoneResolver::new(doc, geometry.names()),
            schedules: ScheduleResolver::new(doc),
        }
    }

    /// Geometry of every zone named by `reference` (zone or zone list)
    ///
    /// Records an unresolved-reference anomaly when nothing matches.
    pub(crate) fn target_zones(
        &self,
        object_type: &str,
        record: &ObjectRecord,
        index: usize,
        anomalies: &mut Vec<Anomaly>,
    ) -> Vec<&'a ZoneGeometry> {
        let reference = record.field(index).unwrap_or("").trim();
        let zones: Vec<&'a ZoneGeometry> = self
            .zones
            .resolve(reference)
            .into_iter()
            .filter_map(|name| self.geometry.get(name))
            .collect();
        if zones.is_empty() {
            anomalies.push(Anomaly::unresolved(
                format!("{} '{}' zone", object_type, record.name()),
                reference,
            ));
        }
        zones
    }
}

/// Running per-zone totals, seeded with an explicit zero for every zone
#[derive(Debug, Clone)]
pub(crate) struct ZoneSums {
    totals: FxHashMap<String, f64>,
}

impl ZoneSums {
    pub(crate) fn zeroed(geometry: &ZoneGeometryMap) -> Self {
        Self {
            totals: geometry.names().map(|n| (n.to_string(), 0.0)).collect(),
        }
    }

    pub(crate) fn add(&mut self, zone: &str, value: f64) {
        *self.totals.entry(zone.to_string()).or_insert(0.0) += value;
    }

    pub(crate) fn into_values(self) -> ZoneLoadMap {
        self.totals
            .into_iter()
            .map(|(zone, v)| (zone, LoadValue::Value(v)))
            .collect()
    }
}

pub(crate) fn invalid_value(object_type: &str, record: &ObjectRecord, field: usize) -> Anomaly {
    Anomaly::InvalidValue {
        object_type: object_type.to_string(),
        name: record.name().to_string(),
        field,
        value: record.field(field).unwrap_or("").to_string(),
    }
}

/// Numeric field required by the selected calculation method
pub(crate) fn required_number(
    object_type: &str,
    record: &ObjectRecord,
    field: usize,
    anomalies: &mut Vec<Anomaly>,
) -> Option<f64> {
    let value = record.number(field);
    if value.is_none() {
        anomalies.push(invalid_value(object_type, record, field));
    }
    value
}

/// Numeric field that may legitimately be blank
pub(crate) fn optional_number(
    object_type: &str,
    record: &ObjectRecord,
    field: usize,
    anomalies: &mut Vec<Anomaly>,
) -> Option<f64> {
    record.non_empty(field)?;
    required_number(object_type, record, field, anomalies)
}

/// All load kinds for one zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRecord {
    pub zone: String,
    pub values: BTreeMap<LoadKind, LoadValue>,
}

impl LoadRecord {
    fn zeroed(zone: &str) -> Self {
        Self {
            zone: zone.to_string(),
            values: LoadKind::ALL.iter().map(|&k| (k, LoadValue::ZERO)).collect(),
        }
    }

    pub fn get(&self, kind: LoadKind) -> &LoadValue {
        self.values.get(&kind).unwrap_or(&LoadValue::ZERO)
    }

    pub fn value(&self, kind: LoadKind) -> Option<f64> {
        self.get(kind).as_f64()
    }
}

/// Load records for every zone, in zone declaration order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadTable {
    records: Vec<LoadRecord>,
}

impl LoadTable {
    pub fn get(&self, zone: &str) -> Option<&LoadRecord> {
        self.records
            .iter()
            .find(|r| r.zone.eq_ignore_ascii_case(zone.trim()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoadRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn fill(&mut self, kind: LoadKind, values: ZoneLoadMap) {
        for record in &mut self.records {
            if let Some(v) = values.get(&record.zone) {
                record.values.insert(kind, v.clone());
            }
        }
    }
}

/// Result of running every extractor over a document
#[derive(Debug, Clone, Default)]
pub struct LoadExtraction {
    pub table: LoadTable,
    pub anomalies: Vec<Anomaly>,
}

/// Run every load extractor and assemble one record per zone
pub fn extract_loads(doc: &ParsedDocument, geometry: &ZoneGeometryMap) -> LoadExtraction {
    let ctx = LoadContext::new(doc, geometry);
    let mut anomalies = Vec::new();

    let occupancy_values = occupancy(&ctx, &mut anomalies);
    let lighting_values = lighting(&ctx, &occupancy_values, &mut anomalies);
    let electric_values = electric_equipment(&ctx, &occupancy_values, &mut anomalies);
    let gas_values = gas_equipment(&ctx, &occupancy_values, &mut anomalies);
    let water_values = service_hot_water(&ctx, &mut anomalies);
    let infiltration_values = infiltration(&ctx, &mut anomalies);
    let ventilation_values = ventilation(&ctx, &mut anomalies);
    let setpoint_values = setpoints(&ctx, &mut anomalies);

    let mut table = LoadTable {
        records: geometry.names().map(LoadRecord::zeroed).collect(),
    };
    table.fill(LoadKind::Occupancy, occupancy_values);
    table.fill(LoadKind::Lighting, lighting_values);
    table.fill(LoadKind::ElectricEquipment, electric_values);
    table.fill(LoadKind::GasEquipment, gas_values);
    table.fill(LoadKind::ServiceHotWater, water_values);
    table.fill(LoadKind::Infiltration, infiltration_values);
    table.fill(LoadKind::VentilationPerPerson, ventilation_values.per_person);
    table.fill(LoadKind::VentilationPerArea, ventilation_values.per_area);
    table.fill(LoadKind::HeatingSetpoint, setpoint_values.heating);
    table.fill(LoadKind::CoolingSetpoint, setpoint_values.cooling);

    LoadExtraction { table, anomalies }
}
