// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Archetype suffix tables.
//!
//! Each table lists plant features in priority order; the first feature
//! present in the survey picks the suffix, otherwise the default applies.

use super::plant::{PlantFeature, PlantSurvey};

/// One priority tier: feature and the suffix it selects
type Tier = (PlantFeature, &'static str);

pub const VAV_COOLING: &[Tier] = &[
    (PlantFeature::DistrictCooling, "DCW"),
    (PlantFeature::AirCooledChiller, "ACChiller"),
];
pub const VAV_COOLING_DEFAULT: &str = "Chiller";

pub const VAV_HEATING: &[Tier] = &[
    (PlantFeature::DistrictHeating, "DHW"),
    (PlantFeature::Boiler, "Boiler"),
    (PlantFeature::HeatPumpCoil, "ASHP"),
    (PlantFeature::GasCoil, "GasCoil"),
];
pub const VAV_HEATING_DEFAULT: &str = "PFP";

pub const PVAV_HEATING: &[Tier] = &[
    (PlantFeature::DistrictHeating, "DHW"),
    (PlantFeature::Boiler, "Boiler"),
    (PlantFeature::HeatPumpCoil, "ASHP"),
    (PlantFeature::GasCoil, "BoilerElectricReheat"),
];
pub const PVAV_HEATING_DEFAULT: &str = "PFP";

/// Packaged single-zone names: feature, with baseboards, without
pub const PSZ_HEATING: &[(PlantFeature, &str, &str)] = &[
    (PlantFeature::DistrictHeating, "PSZAC_DHWBaseboard", "PSZAC_DHW"),
    (PlantFeature::Boiler, "PSZAC_BoilerBaseboard", "PSZAC_Boiler"),
    (PlantFeature::HeatPumpCoil, "PSZAC_ASHP", "PSZAC_ASHP"),
    (PlantFeature::GasCoil, "PSZAC_GasHeaters", "PSZAC_GasCoil"),
    (PlantFeature::ElectricCoil, "PSZAC_ElectricBaseboard", "PSZAC_ElectricCoil"),
];
pub const PSZ_DEFAULT: &str = "PSZAC";

/// Labels assigned directly from the terminal equipment type
pub const DIRECT_LABELS: &[&str] = &[
    "Baseboard",
    "Radiant",
    "UnitHeater",
    "Dehumidifier",
    "IdealLoads",
    "FCUwithDOASAbridged",
    "WSHP",
    "PTAC",
    "PTHP",
];

pub const UNCONDITIONED: &str = "Unconditioned";
pub const UNKNOWN: &str = "Unknown";

fn first_tier(survey: &PlantSurvey, tiers: &[Tier], default: &'static str) -> &'static str {
    tiers
        .iter()
        .find(|(feature, _)| survey.has(*feature))
        .map_or(default, |&(_, suffix)| suffix)
}

/// Archetype names for the three air-system families of one building
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archetypes {
    pub vav: String,
    pub pvav: String,
    pub psz: &'static str,
}

impl Archetypes {
    pub fn from_survey(survey: &PlantSurvey) -> Self {
        let cooling = first_tier(survey, VAV_COOLING, VAV_COOLING_DEFAULT);
        let heating = first_tier(survey, VAV_HEATING, VAV_HEATING_DEFAULT);
        let pvav_heating = first_tier(survey, PVAV_HEATING, PVAV_HEATING_DEFAULT);
        let psz = PSZ_HEATING
            .iter()
            .find(|(feature, _, _)| survey.has(*feature))
            .map_or(PSZ_DEFAULT, |&(_, with_baseboard, without)| {
                if survey.baseboard {
                    with_baseboard
                } else {
                    without
                }
            });

        Self {
            vav: format!("VAV_{}_{}", cooling, heating),
            pvav: format!("PVAV_{}", pvav_heating),
            psz,
        }
    }

    /// Archetype for a variable-volume terminal
    ///
    /// Chilled water means a central VAV system, DX cooling a packaged one.
    pub fn variable_volume(&self, survey: &PlantSurvey) -> &str {
        if survey.chilled_water_cooling() {
            &self.vav
        } else if survey.dx_cooling {
            &self.pvav
        } else {
            &self.vav
        }
    }
}

/// Every template name the classifier can produce for a conditioned zone
pub fn known_templates() -> Vec<String> {
    let mut names: Vec<String> = DIRECT_LABELS.iter().map(|s| s.to_string()).collect();

    let cooling = VAV_COOLING
        .iter()
        .map(|(_, s)| *s)
        .chain([VAV_COOLING_DEFAULT]);
    for cool in cooling {
        let heating = VAV_HEATING.iter().map(|(_, s)| *s).chain([VAV_HEATING_DEFAULT]);
        for heat in heating {
            names.push(format!("VAV_{}_{}", cool, heat));
        }
    }
    names.extend(
        PVAV_HEATING
            .iter()
            .map(|(_, s)| *s)
            .chain([PVAV_HEATING_DEFAULT])
            .map(|heat| format!("PVAV_{}", heat)),
    );
    for (_, with_baseboard, without) in PSZ_HEATING {
        names.push(with_baseboard.to_string());
        names.push(without.to_string());
    }
    names.push(PSZ_DEFAULT.to_string());

    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let names = Archetypes::from_survey(&PlantSurvey::default());
        assert_eq!(names.vav, "VAV_Chiller_PFP");
        assert_eq!(names.pvav, "PVAV_PFP");
        assert_eq!(names.psz, "PSZAC");
    }

    #[test]
    fn test_priority_order() {
        let survey = PlantSurvey {
            district_cooling: true,
            air_cooled_chiller: true,
            chiller: true,
            boiler: true,
            gas_coil: true,
            ..Default::default()
        };
        let names = Archetypes::from_survey(&survey);
        assert_eq!(names.vav, "VAV_DCW_Boiler");
        assert_eq!(names.pvav, "PVAV_Boiler");
        assert_eq!(names.psz, "PSZAC_Boiler");
    }

    #[test]
    fn test_psz_baseboard_variant() {
        let survey = PlantSurvey {
            gas_coil: true,
            baseboard: true,
            ..Default::default()
        };
        let names = Archetypes::from_survey(&survey);
        assert_eq!(names.psz, "PSZAC_GasHeaters");
        assert_eq!(names.pvav, "PVAV_BoilerElectricReheat");
    }

    #[test]
    fn test_variable_volume_tie_break() {
        let dx_only = PlantSurvey {
            dx_cooling: true,
            ..Default::default()
        };
        let names = Archetypes::from_survey(&dx_only);
        assert_eq!(names.variable_volume(&dx_only), "PVAV_PFP");

        let both = PlantSurvey {
            dx_cooling: true,
            district_cooling: true,
            ..Default::default()
        };
        let names = Archetypes::from_survey(&both);
        assert_eq!(names.variable_volume(&both), "VAV_DCW_PFP");

        let neither = PlantSurvey::default();
        assert_eq!(Archetypes::from_survey(&neither).variable_volume(&neither), "VAV_Chiller_PFP");
    }

    #[test]
    fn test_known_templates() {
        let names = known_templates();
        assert!(names.contains(&"VAV_ACChiller_GasCoil".to_string()));
        assert!(names.contains(&"PSZAC_ElectricBaseboard".to_string()));
        assert!(names.contains(&"PTAC".to_string()));
        assert!(!names.contains(&UNKNOWN.to_string()));
    }
}
