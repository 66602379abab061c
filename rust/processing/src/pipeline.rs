// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end processing of one document
//!
//! Geometry and HVAC classification only read the parsed document and run
//! side by side on the rayon pool; load extraction, process loads,
//! schedule assignments and constructions follow once geometry is known.
//! Rows are merged in zone-name order and collapsed last.

use std::time::Instant;

use idf_lite_core::{parse_str, Anomaly, ParsedDocument};
use idf_lite_geometry::{zone_geometry, GeometryResult, ZoneGeometryMap};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::assignments::{schedule_assignments, ScheduleAssignment};
use crate::collapse::{collapse, Cell, CollapsedRow, Row};
use crate::config::PipelineConfig;
use crate::constructions::{construction_summary, ConstructionSummary};
use crate::error::Result;
use crate::hvac::{classify, validate, HvacClassification, ValidationReport};
use crate::loads::{extract_loads, LoadExtraction, LoadKind, LoadTable, LoadValue};
use crate::process_loads::{process_loads, ProcessLoadRecord};
use crate::summary::AreaSummary;
use crate::zones::zone_names;

/// Columns compared when collapsing HVAC rows
pub const HVAC_COMPARISON_KEYS: [&str; 3] = ["template", "dcv", "economizer"];

/// Columns compared when collapsing zone rows (every load kind)
pub fn zone_comparison_keys() -> Vec<&'static str> {
    LoadKind::ALL.iter().map(|k| k.key()).collect()
}

/// One (possibly collapsed) row of the zone table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRow {
    pub zone_name: String,
    pub count: usize,
    pub floor_area_m2: f64,
    pub floor_area_varies: bool,
    pub occupancy: LoadValue,
    pub lighting: LoadValue,
    pub electric_equipment: LoadValue,
    pub gas_equipment: LoadValue,
    pub shw: LoadValue,
    pub infiltration: LoadValue,
    pub ventilation_per_person: LoadValue,
    pub ventilation_per_area: LoadValue,
    pub heating_setpoint: LoadValue,
    pub cooling_setpoint: LoadValue,
}

fn load_value(cell: &Cell) -> LoadValue {
    match cell {
        Cell::Number(v) => LoadValue::Value(*v),
        Cell::Text(name) => LoadValue::Unresolved(name.clone()),
    }
}

fn text(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.clone(),
        Cell::Number(v) => v.to_string(),
    }
}

impl From<&CollapsedRow> for ZoneRow {
    fn from(row: &CollapsedRow) -> Self {
        let get = |kind: LoadKind| {
            row.cells
                .get(kind.key())
                .map_or(LoadValue::ZERO, load_value)
        };
        Self {
            zone_name: row.name.clone(),
            count: row.count,
            floor_area_m2: row.floor_area,
            floor_area_varies: row.floor_area_varies,
            occupancy: get(LoadKind::Occupancy),
            lighting: get(LoadKind::Lighting),
            electric_equipment: get(LoadKind::ElectricEquipment),
            gas_equipment: get(LoadKind::GasEquipment),
            shw: get(LoadKind::ServiceHotWater),
            infiltration: get(LoadKind::Infiltration),
            ventilation_per_person: get(LoadKind::VentilationPerPerson),
            ventilation_per_area: get(LoadKind::VentilationPerArea),
            heating_setpoint: get(LoadKind::HeatingSetpoint),
            cooling_setpoint: get(LoadKind::CoolingSetpoint),
        }
    }
}

/// One (possibly collapsed) row of the HVAC table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HvacRow {
    pub zone_name: String,
    pub count: usize,
    pub template: String,
    pub dcv: String,
    pub economizer: String,
}

impl From<&CollapsedRow> for HvacRow {
    fn from(row: &CollapsedRow) -> Self {
        let get = |key: &str| row.cells.get(key).map(text).unwrap_or_default();
        Self {
            zone_name: row.name.clone(),
            count: row.count,
            template: get("template"),
            dcv: get("dcv"),
            economizer: get("economizer"),
        }
    }
}

/// Uncollapsed zone rows in zone-name order
pub fn zone_rows(geometry: &ZoneGeometryMap, loads: &LoadTable) -> Vec<Row> {
    let mut rows: Vec<Row> = geometry
        .iter()
        .map(|zone| {
            let mut row = Row::new(zone.name.clone(), zone.floor_area_m2);
            for kind in LoadKind::ALL {
                let value = loads
                    .get(&zone.name)
                    .map_or(LoadValue::ZERO, |r| r.get(kind).clone());
                let cell = match value {
                    LoadValue::Value(v) => Cell::Number(v),
                    LoadValue::Unresolved(name) => Cell::Text(name),
                };
                row.cells.insert(kind.key().to_string(), cell);
            }
            row
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

/// Uncollapsed HVAC rows in zone-name order
pub fn hvac_rows(hvac: &HvacClassification) -> Vec<Row> {
    let mut rows: Vec<Row> = hvac
        .iter()
        .map(|(zone, record)| {
            Row::new(zone, 0.0)
                .with("template", record.template.as_str())
                .with("dcv", record.dcv.as_str())
                .with("economizer", record.economizer.as_str())
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

/// Everything extracted from one document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneReport {
    pub zones: Vec<ZoneRow>,
    pub hvac: Vec<HvacRow>,
    pub process_loads: Vec<ProcessLoadRecord>,
    pub schedule_assignments: Vec<ScheduleAssignment>,
    pub constructions: Vec<ConstructionSummary>,
    pub area_summary: AreaSummary,
    pub validation: Option<ValidationReport>,
    pub anomalies: Vec<Anomaly>,
}

impl ZoneReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn join<A, B, FA, FB>(parallel: bool, a: FA, b: FB) -> (A, B)
where
    FA: FnOnce() -> A + Send,
    FB: FnOnce() -> B + Send,
    A: Send,
    B: Send,
{
    if parallel {
        rayon::join(a, b)
    } else {
        (a(), b())
    }
}

/// Parse and process a whole document
pub fn process_document(content: &str, config: &PipelineConfig) -> Result<ZoneReport> {
    config.validate()?;

    let start = Instant::now();
    let doc = parse_str(content)?;
    info!(
        objects = doc.object_count(),
        types = doc.types().count(),
        parse_ms = start.elapsed().as_millis() as u64,
        "Parsed document"
    );

    Ok(process_parsed(&doc, config))
}

/// Run every stage over an already parsed document
pub fn process_parsed(doc: &ParsedDocument, config: &PipelineConfig) -> ZoneReport {
    let start = Instant::now();
    let names = zone_names(doc);

    let (geometry, hvac) = join(
        config.parallel,
        || zone_geometry(doc),
        || classify(doc, &names),
    );
    let GeometryResult {
        zones: geometry,
        anomalies: geometry_anomalies,
    } = geometry;
    debug!(
        zones = geometry.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Geometry and HVAC classification done"
    );

    let (loads, (process, (assignments, constructions))) = join(
        config.parallel,
        || extract_loads(doc, &geometry),
        || {
            join(
                config.parallel,
                || {
                    let mut anomalies = Vec::new();
                    let loads = process_loads(doc, &geometry, &mut anomalies);
                    (loads, anomalies)
                },
                || {
                    let mut anomalies = Vec::new();
                    let constructions = construction_summary(doc, &mut anomalies);
                    (schedule_assignments(doc), (constructions, anomalies))
                },
            )
        },
    );
    let LoadExtraction {
        table,
        anomalies: load_anomalies,
    } = loads;
    let (process_loads, process_anomalies) = process;
    let (constructions, construction_anomalies) = constructions;

    let area_summary = AreaSummary::compute(&geometry, &hvac);
    let validation = config.validate_hvac.then(|| validate(&hvac));

    let zones = collapse(
        &zone_rows(&geometry, &table),
        &zone_comparison_keys(),
        config.collapse_tolerance,
    );
    let hvac_table = collapse(
        &hvac_rows(&hvac),
        &HVAC_COMPARISON_KEYS,
        config.collapse_tolerance,
    );

    let anomalies: Vec<Anomaly> = geometry_anomalies
        .into_iter()
        .chain(hvac.anomalies.iter().cloned())
        .chain(load_anomalies)
        .chain(process_anomalies)
        .chain(construction_anomalies)
        .collect();
    for anomaly in &anomalies {
        warn!(zone = anomaly.zone().unwrap_or(""), "{}", anomaly);
    }

    info!(
        zones = geometry.len(),
        zone_rows = zones.len(),
        hvac_rows = hvac_table.len(),
        anomalies = anomalies.len(),
        conditioned_m2 = area_summary.total_conditioned_area_m2,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Processed document"
    );

    ZoneReport {
        zones: zones.iter().map(ZoneRow::from).collect(),
        hvac: hvac_table.iter().map(HvacRow::from).collect(),
        process_loads,
        schedule_assignments: assignments,
        constructions,
        area_summary,
        validation,
        anomalies,
    }
}
