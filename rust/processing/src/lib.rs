// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IDF-Lite Processing
//!
//! Turns a parsed EnergyPlus model into per-zone metadata:
//!
//! - **Loads**: occupancy, lighting, equipment, hot water, infiltration,
//!   ventilation and setpoints normalized to per-area figures
//! - **HVAC**: template label, DCV and economizer per zone
//! - **Process loads**: building-level exterior lights, elevators,
//!   refrigeration and similar
//! - **Collapse**: repeated zones folded into one row with a count
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use idf_lite_processing::{process_document, PipelineConfig};
//!
//! let content = std::fs::read_to_string("model.idf")?;
//! let report = process_document(&content, &PipelineConfig::default())?;
//! for row in &report.zones {
//!     println!("{} x{}: {:?} W/m2 lighting", row.zone_name, row.count, row.lighting);
//! }
//! ```

pub mod assignments;
pub mod collapse;
pub mod config;
pub mod constructions;
pub mod error;
pub mod hvac;
pub mod loads;
pub mod pipeline;
pub mod process_loads;
pub mod schedule;
pub mod summary;
pub mod zones;

pub use assignments::{schedule_assignments, ScheduleAssignment};
pub use collapse::{base_name, collapse, expand, Cell, CollapsedRow, Row};
pub use config::PipelineConfig;
pub use constructions::{construction_summary, ConstructionSummary};
pub use error::{Error, Result};
pub use hvac::{classify, validate, HvacClassification, HvacRecord, ValidationReport};
pub use loads::{extract_loads, LoadExtraction, LoadKind, LoadTable, LoadValue};
pub use pipeline::{process_document, process_parsed, HvacRow, ZoneReport, ZoneRow};
pub use process_loads::{process_loads, ProcessCategory, ProcessLoadRecord};
pub use summary::AreaSummary;
pub use zones::{zone_names, ZoneResolver};
