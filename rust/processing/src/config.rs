// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default absolute tolerance when comparing numeric row values
pub const DEFAULT_COLLAPSE_TOLERANCE: f64 = 1e-3;

/// Options for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Absolute tolerance used by the row collapser
    pub collapse_tolerance: f64,
    /// Run geometry and HVAC classification on the rayon pool
    pub parallel: bool,
    /// Check HVAC results against the known archetype names
    pub validate_hvac: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            collapse_tolerance: DEFAULT_COLLAPSE_TOLERANCE,
            parallel: true,
            validate_hvac: true,
        }
    }
}

impl PipelineConfig {
    /// Load from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.collapse_tolerance.is_finite() || self.collapse_tolerance < 0.0 {
            return Err(Error::Config(format!(
                "collapse_tolerance must be a non-negative number, got {}",
                self.collapse_tolerance
            )));
        }
        Ok(())
    }
}
