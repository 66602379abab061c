// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HVAC archetype classification
//!
//! Every zone gets a template label, a DCV flag and an economizer type:
//!
//! 1. zones with neither equipment connections nor a thermostat are
//!    `Unconditioned` with `N/A` controls;
//! 2. each equipment entry of the zone's equipment list is routed through
//!    [`routing::ROUTING_TABLE`], the last routed entry winning;
//! 3. air-system families are named from the [`plant::PlantSurvey`];
//! 4. controls come from the air loop serving the zone.
//!
//! Zones whose equipment matches nothing are labelled `Unknown` and
//! reported as anomalies.

pub mod controls;
pub mod plant;
pub mod routing;
pub mod templates;
pub mod validate;

pub use controls::ControlMap;
pub use plant::{PlantFeature, PlantSurvey};
pub use routing::{route, terminal_kind, Route, TerminalKind, ROUTING_TABLE};
pub use templates::{known_templates, Archetypes, UNCONDITIONED, UNKNOWN};
pub use validate::{validate, IssueKind, ValidationIssue, ValidationReport};

use idf_lite_core::{Anomaly, ParsedDocument};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::loads::THERMOSTAT_OBJECT;
use crate::zones::ZoneResolver;

pub const EQUIPMENT_CONNECTIONS_OBJECT: &str = "ZONEHVAC:EQUIPMENTCONNECTIONS";
pub const EQUIPMENT_LIST_OBJECT: &str = "ZONEHVAC:EQUIPMENTLIST";
pub const AIR_DISTRIBUTION_UNIT_OBJECT: &str = "ZONEHVAC:AIRDISTRIBUTIONUNIT";

pub const NOT_APPLICABLE: &str = "N/A";

/// Equipment list entries start with one of these type prefixes
const EQUIPMENT_PREFIXES: [&str; 3] = ["ZONEHVAC:", "AIRTERMINAL:", "FAN:"];

const ADU_TERMINAL_TYPE_FIELD: usize = 2;

/// HVAC attributes of one zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HvacRecord {
    pub template: String,
    pub dcv: String,
    pub economizer: String,
    pub conditioned: bool,
}

impl HvacRecord {
    pub fn unconditioned() -> Self {
        Self {
            template: UNCONDITIONED.to_string(),
            dcv: NOT_APPLICABLE.to_string(),
            economizer: NOT_APPLICABLE.to_string(),
            conditioned: false,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.template == UNKNOWN
    }
}

/// Classification of every zone, in the order the zones were given
#[derive(Debug, Clone, Default)]
pub struct HvacClassification {
    pub survey: PlantSurvey,
    pub records: Vec<(String, HvacRecord)>,
    pub anomalies: Vec<Anomaly>,
}

impl HvacClassification {
    pub fn get(&self, zone: &str) -> Option<&HvacRecord> {
        self.records
            .iter()
            .find(|(z, _)| z.eq_ignore_ascii_case(zone.trim()))
            .map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HvacRecord)> {
        self.records.iter().map(|(z, r)| (z.as_str(), r))
    }
}

/// `(type, name)` entries of each equipment list, keyed by upper-cased name
///
/// Scanning from field 1 covers both the old layout and the one with a
/// load distribution scheme before the first entry.
fn equipment_lists(doc: &ParsedDocument) -> FxHashMap<String, Vec<(&str, &str)>> {
    doc.get(EQUIPMENT_LIST_OBJECT)
        .iter()
        .map(|list| {
            let fields = list.fields();
            let entries = (1..fields.len().saturating_sub(1))
                .filter(|&i| {
                    let upper = fields[i].to_ascii_uppercase();
                    EQUIPMENT_PREFIXES.iter().any(|p| upper.starts_with(p))
                })
                .map(|i| (fields[i].as_str(), fields[i + 1].as_str()))
                .collect();
            (list.name().trim().to_ascii_uppercase(), entries)
        })
        .collect()
}

struct Classifier<'a> {
    doc: &'a ParsedDocument,
    survey: PlantSurvey,
    archetypes: Archetypes,
}

impl Classifier<'_> {
    /// Template for one equipment entry, `None` when it routes nowhere
    fn template_for(&self, equipment_type: &str, equipment_name: &str) -> Option<String> {
        match route(equipment_type)? {
            Route::Template(label) => Some(label.to_string()),
            Route::SingleZone => Some(self.archetypes.psz.to_string()),
            Route::AirDistributionUnit => {
                let adu = self.doc.find(AIR_DISTRIBUTION_UNIT_OBJECT, equipment_name)?;
                let terminal = adu.field(ADU_TERMINAL_TYPE_FIELD).unwrap_or("");
                match terminal_kind(terminal)? {
                    TerminalKind::VariableVolume => {
                        Some(self.archetypes.variable_volume(&self.survey).to_string())
                    }
                    TerminalKind::ConstantVolume => Some(self.archetypes.psz.to_string()),
                }
            }
        }
    }
}

/// Classify every zone in `zone_names`
pub fn classify<S: AsRef<str>>(doc: &ParsedDocument, zone_names: &[S]) -> HvacClassification {
    let zones = ZoneResolver::new(doc, zone_names.iter().map(|z| z.as_ref()));

    let mut thermostat_zones: FxHashSet<String> = FxHashSet::default();
    for thermostat in doc.get(THERMOSTAT_OBJECT) {
        for zone in zones.resolve(thermostat.field(1).unwrap_or("")) {
            thermostat_zones.insert(zone.to_ascii_uppercase());
        }
    }

    let connections: FxHashMap<String, &str> = doc
        .get(EQUIPMENT_CONNECTIONS_OBJECT)
        .iter()
        .map(|c| {
            (
                c.name().trim().to_ascii_uppercase(),
                c.field(1).unwrap_or("").trim(),
            )
        })
        .collect();
    let lists = equipment_lists(doc);

    let survey = PlantSurvey::from_document(doc);
    let classifier = Classifier {
        doc,
        survey,
        archetypes: Archetypes::from_survey(&survey),
    };
    let controls = ControlMap::build(doc, &zones);

    let mut records = Vec::with_capacity(zones.len());
    let mut anomalies = Vec::new();

    for zone in zones.names() {
        let key = zone.to_ascii_uppercase();
        let connection = connections.get(&key);
        if connection.is_none() && !thermostat_zones.contains(&key) {
            records.push((zone.to_string(), HvacRecord::unconditioned()));
            continue;
        }

        let equipment = connection
            .and_then(|list| lists.get(&list.to_ascii_uppercase()))
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut template = None;
        let mut unrouted = Vec::new();
        for &(equipment_type, equipment_name) in equipment {
            match classifier.template_for(equipment_type, equipment_name) {
                Some(t) => template = Some(t),
                None => unrouted.push(equipment_type),
            }
        }

        let template = match template {
            Some(t) => t,
            None => {
                if unrouted.is_empty() {
                    anomalies.push(Anomaly::unclassified(zone, "no zone equipment"));
                }
                for equipment_type in unrouted {
                    anomalies.push(Anomaly::unclassified(zone, equipment_type));
                }
                UNKNOWN.to_string()
            }
        };

        records.push((
            zone.to_string(),
            HvacRecord {
                template,
                dcv: controls.dcv(zone).to_string(),
                economizer: controls.economizer(zone).to_string(),
                conditioned: true,
            },
        ));
    }

    HvacClassification {
        survey,
        records,
        anomalies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idf_lite_core::parse_str;

    fn classify_idf(idf: &str) -> HvacClassification {
        let doc = parse_str(idf).unwrap();
        let names = crate::zones::zone_names(&doc);
        classify(&doc, &names)
    }

    #[test]
    fn test_unconditioned_zone() {
        let result = classify_idf("Zone, Attic;");
        let record = result.get("Attic").unwrap();
        assert_eq!(record, &HvacRecord::unconditioned());
        assert!(!record.conditioned);
        assert!(result.anomalies.is_empty());
    }

    #[test]
    fn test_direct_label() {
        let result = classify_idf("
            Zone, Core_ZN;
            ZoneHVAC:EquipmentConnections, Core_ZN, Core_ZN Equipment, Core_ZN Inlets, , Core_ZN Air Node, Core_ZN Return;
            ZoneHVAC:EquipmentList, Core_ZN Equipment, SequentialLoad,
                ZoneHVAC:PackagedTerminalHeatPump, Core_ZN PTHP, 1, 1, , ;
        ");
        let record = result.get("Core_ZN").unwrap();
        assert_eq!(record.template, "PTHP");
        assert_eq!(record.dcv, "No");
        assert_eq!(record.economizer, "NoEconomizer");
        assert!(record.conditioned);
    }

    #[test]
    fn test_vav_terminal_with_dx_cooling() {
        let result = classify_idf("
            Zone, Core_ZN;
            Coil:Cooling:DX:TwoSpeed, DX Coil;
            Coil:Heating:Fuel, Gas Coil;
            ZoneHVAC:EquipmentConnections, Core_ZN, Core_ZN Equipment, Inlets, , Node, Return;
            ZoneHVAC:EquipmentList, Core_ZN Equipment, ZoneHVAC:AirDistributionUnit, Core_ZN ADU, 1, 1;
            ZoneHVAC:AirDistributionUnit, Core_ZN ADU, Core_ZN VAV Box Outlet, AirTerminal:SingleDuct:VAV:Reheat, Core_ZN VAV Box;
        ");
        assert_eq!(result.get("Core_ZN").unwrap().template, "PVAV_BoilerElectricReheat");
    }

    #[test]
    fn test_unmatched_equipment_is_unknown() {
        let result = classify_idf("
            Zone, Core_ZN;
            ZoneHVAC:EquipmentConnections, Core_ZN, Core_ZN Equipment, Inlets, , Node, Return;
            ZoneHVAC:EquipmentList, Core_ZN Equipment, ZoneHVAC:EnergyRecoveryVentilator, ERV, 1, 1;
        ");
        let record = result.get("Core_ZN").unwrap();
        assert!(record.is_unknown());
        assert!(record.conditioned);
        assert_eq!(
            result.anomalies,
            vec![Anomaly::unclassified("Core_ZN", "ZoneHVAC:EnergyRecoveryVentilator")]
        );
    }

    #[test]
    fn test_thermostat_without_equipment() {
        let result = classify_idf("
            Zone, Core_ZN;
            ZoneControl:Thermostat, T, Core_ZN, Ctrl, ThermostatSetpoint:DualSetpoint, SP;
        ");
        let record = result.get("Core_ZN").unwrap();
        assert!(record.conditioned);
        assert_eq!(record.template, UNKNOWN);
        assert_eq!(result.anomalies.len(), 1);
    }
}
