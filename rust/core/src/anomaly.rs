// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recoverable data anomalies
//!
//! Unlike [`crate::Error`], an anomaly never aborts a run. Extractors fall
//! back to a default (zero, a raw name, an `Unknown` marker) and record the
//! anomaly so that it can be validated after the report is produced.

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A problem recovered locally for one zone or one record
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind"))]
pub enum Anomaly {
    /// A named lookup (schedule, zone, setpoint object...) found nothing usable
    #[error("unresolved reference in {context}: {name}")]
    UnresolvedReference { context: String, name: String },

    /// A zone has no floor or exterior wall surfaces
    #[error("missing geometry for zone {zone}: {detail}")]
    MissingGeometry { zone: String, detail: String },

    /// An equipment type matched no routing-table entry
    #[error("unclassified equipment in zone {zone}: {equipment_type}")]
    UnclassifiedEquipment { zone: String, equipment_type: String },

    /// A field that should hold a number could not be read
    #[error("invalid value in {object_type} '{name}' field {field}: {value:?}")]
    InvalidValue {
        object_type: String,
        name: String,
        field: usize,
        value: String,
    },
}

impl Anomaly {
    pub fn unresolved(context: impl Into<String>, name: impl Into<String>) -> Self {
        Anomaly::UnresolvedReference {
            context: context.into(),
            name: name.into(),
        }
    }

    pub fn missing_geometry(zone: impl Into<String>, detail: impl Into<String>) -> Self {
        Anomaly::MissingGeometry {
            zone: zone.into(),
            detail: detail.into(),
        }
    }

    pub fn unclassified(zone: impl Into<String>, equipment_type: impl Into<String>) -> Self {
        Anomaly::UnclassifiedEquipment {
            zone: zone.into(),
            equipment_type: equipment_type.into(),
        }
    }

    /// Zone the anomaly is scoped to, if any
    pub fn zone(&self) -> Option<&str> {
        match self {
            Anomaly::MissingGeometry { zone, .. } | Anomaly::UnclassifiedEquipment { zone, .. } => {
                Some(zone)
            }
            _ => None,
        }
    }
}
