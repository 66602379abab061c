// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building area totals.

use idf_lite_geometry::ZoneGeometryMap;
use serde::{Deserialize, Serialize};

use crate::hvac::HvacClassification;

/// Floor area totals in m², zone multipliers applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaSummary {
    pub total_built_area_m2: f64,
    pub total_conditioned_area_m2: f64,
    pub total_unconditioned_area_m2: f64,
}

impl AreaSummary {
    /// Zones without an HVAC record count as unconditioned
    pub fn compute(geometry: &ZoneGeometryMap, hvac: &HvacClassification) -> Self {
        let mut conditioned = 0.0;
        let mut unconditioned = 0.0;
        for zone in geometry.iter() {
            let area = zone.floor_area_m2 * zone.multiplier;
            if hvac.get(&zone.name).is_some_and(|r| r.conditioned) {
                conditioned += area;
            } else {
                unconditioned += area;
            }
        }
        // built == conditioned + unconditioned, bit for bit
        Self {
            total_built_area_m2: conditioned + unconditioned,
            total_conditioned_area_m2: conditioned,
            total_unconditioned_area_m2: unconditioned,
        }
    }
}
