// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Consistency checks over classified HVAC records.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::templates::{known_templates, UNCONDITIONED, UNKNOWN};
use super::{HvacClassification, NOT_APPLICABLE};

pub const VALID_DCV: [&str; 3] = ["Yes", "No", NOT_APPLICABLE];

pub const VALID_ECONOMIZERS: [&str; 7] = [
    "NoEconomizer",
    "DifferentialDryBulb",
    "DifferentialEnthalpy",
    "DifferentialDryBulbAndEnthalpy",
    "FixedDryBulb",
    "FixedEnthalpy",
    "ElectronicEnthalpy",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// No equipment matched the routing table
    UnknownTemplate,
    UnrecognizedTemplate,
    InvalidEconomizer,
    InvalidDcv,
    /// Unconditioned zone with controls other than N/A
    InconsistentUnconditioned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub zone: String,
    pub kind: IssueKind,
    pub value: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {:?} ({:?})", self.zone, self.value, self.kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub zones_checked: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }
}

/// Check every record against the known archetype and control values
pub fn validate(hvac: &HvacClassification) -> ValidationReport {
    let templates = known_templates();
    let mut issues = Vec::new();
    let mut issue = |zone: &str, kind: IssueKind, value: &str| {
        issues.push(ValidationIssue {
            zone: zone.to_string(),
            kind,
            value: value.to_string(),
        })
    };

    for (zone, record) in hvac.iter() {
        let unconditioned = record.template == UNCONDITIONED;

        if record.template == UNKNOWN {
            issue(zone, IssueKind::UnknownTemplate, &record.template);
        } else if !unconditioned && !templates.iter().any(|t| *t == record.template) {
            issue(zone, IssueKind::UnrecognizedTemplate, &record.template);
        }

        if !unconditioned
            && record.economizer != NOT_APPLICABLE
            && !VALID_ECONOMIZERS.contains(&record.economizer.as_str())
        {
            issue(zone, IssueKind::InvalidEconomizer, &record.economizer);
        }

        if !VALID_DCV.contains(&record.dcv.as_str()) {
            issue(zone, IssueKind::InvalidDcv, &record.dcv);
        }

        if unconditioned && (record.dcv != NOT_APPLICABLE || record.economizer != NOT_APPLICABLE) {
            issue(
                zone,
                IssueKind::InconsistentUnconditioned,
                &format!("dcv={}, economizer={}", record.dcv, record.economizer),
            );
        }
    }

    let report = ValidationReport {
        zones_checked: hvac.records.len(),
        issues,
    };
    if report.passed() {
        info!(zones = report.zones_checked, "HVAC validation passed");
    } else {
        for issue in &report.issues {
            warn!(zone = %issue.zone, kind = ?issue.kind, value = %issue.value, "HVAC validation issue");
        }
    }
    report
}
