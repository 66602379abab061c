// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end pipeline tests on a small school-like model

use approx::assert_relative_eq;
use idf_lite_core::parse_str;
use idf_lite_geometry::zone_geometry;
use idf_lite_processing::collapse::{collapse, Cell};
use idf_lite_processing::pipeline::{zone_comparison_keys, zone_rows};
use idf_lite_processing::{
    extract_loads, process_document, Error, LoadValue, PipelineConfig, ZoneReport,
};

const SCHOOL: &str = r#"
Version, 9.6;

Zone, Class_1_FLR_1, 0, 0, 0, 0, 1, 1, 3, autocalculate, 100;
Zone, Class_1_FLR_2, 0, 0, 0, 0, 1, 1, 3, autocalculate, 100;
Zone, Class_1_FLR_3, 0, 0, 0, 0, 1, 1, 3, autocalculate, 100.0004;
Zone, Kitchen, 0, 0, 0, 0, 1, 1, 3, autocalculate, 50;
Zone, Attic, 0, 0, 0, 0, 1, 1, 2, autocalculate, 80;

ZoneList, Classrooms, Class_1_FLR_1, Class_1_FLR_2, Class_1_FLR_3;

Schedule:Constant, HTGSETP_SCH, Temperature, 21;
Schedule:Constant, CLGSETP_SCH, Temperature, 24;

People, Class People, Classrooms, Occ, People/Area, , 0.25, , 0.3;
Lights, Class Lights, Classrooms, Lts, Watts/Area, , 10;
Lights, Kitchen Lights, Kitchen, Lts, LightingLevel, 600;
ElectricEquipment, Class Plugs, Classrooms, Eq, Watts/Area, , 5;
GasEquipment, Kitchen Range, Kitchen, Eq, EquipmentLevel, 2500;

ThermostatSetpoint:DualSetpoint, Dual SP, HTGSETP_SCH, CLGSETP_SCH;
ZoneControl:Thermostat, Class 1 Tstat, Class_1_FLR_1, Ctrl, ThermostatSetpoint:DualSetpoint, Dual SP;
ZoneControl:Thermostat, Class 2 Tstat, Class_1_FLR_2, Ctrl, ThermostatSetpoint:DualSetpoint, Dual SP;
ZoneControl:Thermostat, Class 3 Tstat, Class_1_FLR_3, Ctrl, ThermostatSetpoint:DualSetpoint, Dual SP;
ZoneControl:Thermostat, Kitchen Tstat, Kitchen, Ctrl, ThermostatSetpoint:DualSetpoint, Dual SP;

ZoneHVAC:EquipmentConnections, Class_1_FLR_1, Class 1 Eq, Class 1 Inlets, , Class 1 Node, Class 1 Return;
ZoneHVAC:EquipmentList, Class 1 Eq, SequentialLoad, ZoneHVAC:PackagedTerminalHeatPump, Class 1 PTHP, 1, 1, , ;
ZoneHVAC:EquipmentConnections, Class_1_FLR_2, Class 2 Eq, Class 2 Inlets, , Class 2 Node, Class 2 Return;
ZoneHVAC:EquipmentList, Class 2 Eq, SequentialLoad, ZoneHVAC:PackagedTerminalHeatPump, Class 2 PTHP, 1, 1, , ;
ZoneHVAC:EquipmentConnections, Class_1_FLR_3, Class 3 Eq, Class 3 Inlets, , Class 3 Node, Class 3 Return;
ZoneHVAC:EquipmentList, Class 3 Eq, SequentialLoad, ZoneHVAC:PackagedTerminalHeatPump, Class 3 PTHP, 1, 1, , ;
ZoneHVAC:EquipmentConnections, Kitchen, Kitchen Eq, Kitchen Inlets, , Kitchen Node, Kitchen Return;
ZoneHVAC:EquipmentList, Kitchen Eq, SequentialLoad, ZoneHVAC:PackagedTerminalHeatPump, Kitchen PTHP, 1, 1, , ;

Exterior:Lights, Parking Lights, Always On, 12000, AstronomicalClock, Exterior Facade Lighting;
"#;

fn run(config: &PipelineConfig) -> ZoneReport {
    process_document(SCHOOL, config).unwrap()
}

#[test]
fn test_classrooms_collapse_into_one_row() {
    let report = run(&PipelineConfig::default());

    let names: Vec<&str> = report.zones.iter().map(|z| z.zone_name.as_str()).collect();
    assert_eq!(names, vec!["Attic", "Class", "Kitchen"]);

    let class = &report.zones[1];
    assert_eq!(class.count, 3);
    assert!(!class.floor_area_varies);
    assert_eq!(class.lighting, LoadValue::Value(10.0));
    assert_eq!(class.electric_equipment, LoadValue::Value(5.0));
    assert_eq!(class.gas_equipment, LoadValue::Value(0.0));
    assert_eq!(class.occupancy, LoadValue::Value(0.25));
    assert_eq!(class.heating_setpoint, LoadValue::Value(21.0));
    assert_eq!(class.cooling_setpoint, LoadValue::Value(24.0));
}

#[test]
fn test_floor_area_difference_flagged_without_tolerance() {
    let config = PipelineConfig {
        collapse_tolerance: 0.0,
        ..PipelineConfig::default()
    };
    let report = run(&config);
    let class = report.zones.iter().find(|z| z.zone_name == "Class").unwrap();
    assert_eq!(class.count, 3);
    assert!(class.floor_area_varies);
}

#[test]
fn test_zone_without_loads_reports_explicit_zeros() {
    let report = run(&PipelineConfig::default());
    let attic = &report.zones[0];
    assert_eq!(attic.count, 1);
    for value in [
        &attic.occupancy,
        &attic.lighting,
        &attic.shw,
        &attic.infiltration,
        &attic.ventilation_per_person,
        &attic.heating_setpoint,
    ] {
        assert_eq!(value, &LoadValue::Value(0.0));
    }
}

#[test]
fn test_kitchen_keeps_gas_and_level_lighting() {
    let report = run(&PipelineConfig::default());
    let kitchen = &report.zones[2];
    assert_relative_eq!(kitchen.gas_equipment.as_f64().unwrap(), 50.0);
    assert_relative_eq!(kitchen.lighting.as_f64().unwrap(), 12.0);
    assert_relative_eq!(kitchen.floor_area_m2, 50.0);
}

#[test]
fn test_hvac_rows() {
    let report = run(&PipelineConfig::default());
    assert_eq!(report.hvac.len(), 3);

    let attic = &report.hvac[0];
    assert_eq!(attic.zone_name, "Attic");
    assert_eq!(attic.template, "Unconditioned");
    assert_eq!(attic.dcv, "N/A");
    assert_eq!(attic.economizer, "N/A");

    let class = &report.hvac[1];
    assert_eq!(class.zone_name, "Class");
    assert_eq!(class.count, 3);
    assert_eq!(class.template, "PTHP");
    assert_eq!(class.dcv, "No");
    assert_eq!(class.economizer, "NoEconomizer");

    let validation = report.validation.as_ref().unwrap();
    assert_eq!(validation.zones_checked, 5);
    assert!(validation.passed());
}

#[test]
fn test_area_summary_identity() {
    let report = run(&PipelineConfig::default());
    let areas = report.area_summary;
    assert_relative_eq!(areas.total_conditioned_area_m2, 350.0004, epsilon = 1e-9);
    assert_relative_eq!(areas.total_unconditioned_area_m2, 80.0);
    assert_eq!(
        areas.total_built_area_m2,
        areas.total_conditioned_area_m2 + areas.total_unconditioned_area_m2
    );
}

#[test]
fn test_building_level_outputs() {
    let report = run(&PipelineConfig::default());
    assert_eq!(report.process_loads.len(), 1);
    assert_eq!(report.process_loads[0].power_w, 12000.0);
    assert!(report.constructions.is_empty());
}

#[test]
fn test_sequential_matches_parallel() {
    let parallel = run(&PipelineConfig::default());
    let sequential = run(&PipelineConfig {
        parallel: false,
        ..PipelineConfig::default()
    });
    assert_eq!(parallel.zones, sequential.zones);
    assert_eq!(parallel.hvac, sequential.hvac);
    assert_eq!(parallel.anomalies, sequential.anomalies);
}

#[test]
fn test_validation_can_be_disabled() {
    let report = run(&PipelineConfig {
        validate_hvac: false,
        ..PipelineConfig::default()
    });
    assert!(report.validation.is_none());
}

#[test]
fn test_report_serializes_to_json() {
    let report = run(&PipelineConfig::default());
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["zones"][1]["zone_name"], "Class");
    assert_eq!(json["zones"][1]["lighting"], 10.0);
    assert_eq!(json["hvac"][0]["template"], "Unconditioned");
    assert!(json["area_summary"]["total_built_area_m2"].is_number());
}

#[test]
fn test_unterminated_object_is_parse_error() {
    let err = process_document("Zone, Office, 0", &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, Error::CoreError(_)));
}

#[test]
fn test_invalid_config_rejected() {
    let config = PipelineConfig {
        collapse_tolerance: -1.0,
        ..PipelineConfig::default()
    };
    let err = process_document(SCHOOL, &config).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_extra_gas_equipment_keeps_zones_apart() {
    let doc = parse_str(
        "Zone, Office_1, 0, 0, 0, 0, 1, 1, 3, autocalculate, 100;
         Zone, Office_2, 0, 0, 0, 0, 1, 1, 3, autocalculate, 100;
         Lights, Lights 1, Office_1, Lts, Watts/Area, , 10;
         Lights, Lights 2, Office_2, Lts, Watts/Area, , 10;
         GasEquipment, Coffee Bar, Office_2, Eq, Watts/Area, , 2;",
    )
    .unwrap();
    let geometry = zone_geometry(&doc).zones;
    let loads = extract_loads(&doc, &geometry);

    let rows = zone_rows(&geometry, &loads.table);
    assert_eq!(rows[0].cell("gas_equipment"), &Cell::Number(0.0));

    let collapsed = collapse(&rows, &zone_comparison_keys(), 1e-3);
    assert_eq!(collapsed.len(), 2);
    assert_eq!(collapsed[0].name, "Office_1");
    assert_eq!(collapsed[0].count, 1);
    assert_eq!(collapsed[1].name, "Office_2");
    assert_eq!(collapsed[1].count, 1);
    assert_eq!(collapsed[1].cells["gas_equipment"], Cell::Number(2.0));
}
