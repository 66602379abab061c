// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building-wide plant survey.
//!
//! The survey only records which kinds of plant and coil objects exist in
//! the document. It is computed once per classification and passed to the
//! archetype tables by value.

use idf_lite_core::ParsedDocument;
use serde::{Deserialize, Serialize};

/// A plant or coil capability that selects an archetype suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlantFeature {
    Boiler,
    Chiller,
    AirCooledChiller,
    DistrictHeating,
    DistrictCooling,
    GasCoil,
    ElectricCoil,
    HeatPumpCoil,
    Baseboard,
    DxCooling,
}

const BOILERS: &[&str] = &["BOILER:HOTWATER"];
const CHILLERS: &[&str] = &["CHILLER:ELECTRIC:EIR", "CHILLER:ELECTRIC"];
const DISTRICT_HEATING: &[&str] = &["DISTRICTHEATING", "DISTRICTHEATING:WATER"];
const DISTRICT_COOLING: &[&str] = &["DISTRICTCOOLING", "DISTRICTCOOLING:WATER"];
const GAS_COILS: &[&str] = &["COIL:HEATING:FUEL", "COIL:HEATING:GAS"];
const ELECTRIC_COILS: &[&str] = &["COIL:HEATING:ELECTRIC"];
const HEAT_PUMP_COILS: &[&str] = &[
    "COIL:HEATING:DX:SINGLEMIXED",
    "COIL:HEATING:DX:SINGLESPEED",
    "COIL:HEATING:DX:MULTISPEED",
];
const BASEBOARDS: &[&str] = &[
    "ZONEHVAC:BASEBOARD:CONVECTIVE:WATER",
    "ZONEHVAC:BASEBOARD:CONVECTIVE:ELECTRIC",
];
// CoilSystem:Cooling:DX wraps the coil in older files
const DX_COOLING: &[&str] = &[
    "COIL:COOLING:DX:TWOSPEED",
    "COIL:COOLING:DX:SINGLESPEED",
    "COIL:COOLING:DX:MULTISPEED",
    "COIL:COOLING:DX:VARIABLESPEED",
    "COILSYSTEM:COOLING:DX",
];

const AIR_COOLED: &str = "AIRCOOLED";

/// Presence flags for every [`PlantFeature`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantSurvey {
    pub boiler: bool,
    pub chiller: bool,
    pub air_cooled_chiller: bool,
    pub district_heating: bool,
    pub district_cooling: bool,
    pub gas_coil: bool,
    pub electric_coil: bool,
    pub heat_pump_coil: bool,
    pub baseboard: bool,
    pub dx_cooling: bool,
}

impl PlantSurvey {
    pub fn from_document(doc: &ParsedDocument) -> Self {
        let any = |types: &[&str]| types.iter().any(|t| doc.contains(t));

        // A chiller is air cooled if any field says so, spaces ignored
        let air_cooled_chiller = CHILLERS.iter().flat_map(|t| doc.get(t)).any(|record| {
            record
                .fields()
                .iter()
                .any(|f| f.to_ascii_uppercase().replace(' ', "").contains(AIR_COOLED))
        });

        Self {
            boiler: any(BOILERS),
            chiller: any(CHILLERS),
            air_cooled_chiller,
            district_heating: any(DISTRICT_HEATING),
            district_cooling: any(DISTRICT_COOLING),
            gas_coil: any(GAS_COILS),
            electric_coil: any(ELECTRIC_COILS),
            heat_pump_coil: any(HEAT_PUMP_COILS),
            baseboard: any(BASEBOARDS),
            dx_cooling: any(DX_COOLING),
        }
    }

    pub fn has(&self, feature: PlantFeature) -> bool {
        match feature {
            PlantFeature::Boiler => self.boiler,
            PlantFeature::Chiller => self.chiller,
            PlantFeature::AirCooledChiller => self.air_cooled_chiller,
            PlantFeature::DistrictHeating => self.district_heating,
            PlantFeature::DistrictCooling => self.district_cooling,
            PlantFeature::GasCoil => self.gas_coil,
            PlantFeature::ElectricCoil => self.electric_coil,
            PlantFeature::HeatPumpCoil => self.heat_pump_coil,
            PlantFeature::Baseboard => self.baseboard,
            PlantFeature::DxCooling => self.dx_cooling,
        }
    }

    /// Chilled water from a chiller or a district loop
    pub fn chilled_water_cooling(&self) -> bool {
        self.chiller || self.district_cooling
    }
}
