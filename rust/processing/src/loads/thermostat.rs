// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heating and cooling setpoints.
//!
//! Each zone is followed through `ZoneControl:Thermostat` to its setpoint
//! objects and then to their schedules. A chain that breaks reports the
//! last name it did resolve instead of a number.

use idf_lite_core::{Anomaly, ObjectRecord, ParsedDocument};

use super::{LoadContext, LoadValue, ZoneLoadMap};
use crate::zones::ZoneResolver;

pub const THERMOSTAT_OBJECT: &str = "ZONECONTROL:THERMOSTAT";
pub const DUAL_SETPOINT: &str = "THERMOSTATSETPOINT:DUALSETPOINT";
pub const SINGLE_HEATING: &str = "THERMOSTATSETPOINT:SINGLEHEATING";
pub const SINGLE_COOLING: &str = "THERMOSTATSETPOINT:SINGLECOOLING";
pub const SINGLE_HEATING_OR_COOLING: &str = "THERMOSTATSETPOINT:SINGLEHEATINGORCOOLING";

const SETPOINT_TYPES: [&str; 4] = [
    DUAL_SETPOINT,
    SINGLE_HEATING,
    SINGLE_COOLING,
    SINGLE_HEATING_OR_COOLING,
];

const THERMOSTAT_ZONE_FIELD: usize = 1;
const FIRST_CONTROL_FIELD: usize = 3;

/// Which setpoints a control object drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sides {
    heating: bool,
    cooling: bool,
}

fn sides(setpoint_type: &str) -> Sides {
    match setpoint_type {
        SINGLE_HEATING => Sides {
            heating: true,
            cooling: false,
        },
        SINGLE_COOLING => Sides {
            heating: false,
            cooling: true,
        },
        _ => Sides {
            heating: true,
            cooling: true,
        },
    }
}

/// Schedule names behind one setpoint object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetpointSchedules<'a> {
    pub heating: Option<&'a str>,
    pub cooling: Option<&'a str>,
}

/// `(control type, control name)` pairs of a thermostat record
pub(crate) fn thermostat_controls(record: &ObjectRecord) -> impl Iterator<Item = (&str, &str)> {
    record
        .fields()
        .get(FIRST_CONTROL_FIELD..)
        .unwrap_or_default()
        .chunks(2)
        .filter_map(|pair| match pair {
            [kind, name] if !name.trim().is_empty() => Some((kind.trim(), name.trim())),
            _ => None,
        })
}

/// Setpoint object named by a thermostat control entry
///
/// A blank or unrecognised control type searches every setpoint type.
fn setpoint_object<'a>(
    doc: &'a ParsedDocument,
    control_type: &str,
    control_name: &str,
) -> Option<(&'static str, &'a ObjectRecord)> {
    let declared = control_type.to_ascii_uppercase();
    let candidates: &[&'static str] = match SETPOINT_TYPES.iter().position(|t| *t == declared) {
        Some(i) => &SETPOINT_TYPES[i..=i],
        None => &SETPOINT_TYPES,
    };
    candidates
        .iter()
        .find_map(|t| doc.find(t, control_name).map(|r| (*t, r)))
}

/// Schedules behind one thermostat control entry
pub fn setpoint_schedules<'a>(
    doc: &'a ParsedDocument,
    control_type: &str,
    control_name: &str,
) -> Option<SetpointSchedules<'a>> {
    let (setpoint_type, record) = setpoint_object(doc, control_type, control_name)?;
    let schedules = match setpoint_type {
        DUAL_SETPOINT => SetpointSchedules {
            heating: record.non_empty(1),
            cooling: record.non_empty(2),
        },
        SINGLE_HEATING => SetpointSchedules {
            heating: record.non_empty(1),
            cooling: None,
        },
        SINGLE_COOLING => SetpointSchedules {
            heating: None,
            cooling: record.non_empty(1),
        },
        _ => SetpointSchedules {
            heating: record.non_empty(1),
            cooling: record.non_empty(1),
        },
    };
    Some(schedules)
}

/// Setpoint schedule names for every controlled zone, in thermostat order
pub fn zone_setpoint_schedules<'a>(
    doc: &'a ParsedDocument,
    zones: &ZoneResolver,
) -> Vec<(String, SetpointSchedules<'a>)> {
    let mut out = Vec::new();
    for thermostat in doc.get(THERMOSTAT_OBJECT) {
        let targets = zones.resolve(thermostat.field(THERMOSTAT_ZONE_FIELD).unwrap_or(""));
        for (kind, name) in thermostat_controls(thermostat) {
            if let Some(schedules) = setpoint_schedules(doc, kind, name) {
                for zone in &targets {
                    out.push((zone.to_string(), schedules.clone()));
                }
            }
        }
    }
    out
}

/// Resolved heating and cooling setpoints for every zone
#[derive(Debug, Clone, Default)]
pub struct Setpoints {
    pub heating: ZoneLoadMap,
    pub cooling: ZoneLoadMap,
}

/// Numbers replace anything; a fallback name only fills an empty or
/// unresolved slot.
fn merge(slot: &mut Option<LoadValue>, value: LoadValue) {
    let replace = match (&value, &*slot) {
        (LoadValue::Value(_), _) => true,
        (LoadValue::Unresolved(_), Some(LoadValue::Value(_))) => false,
        (LoadValue::Unresolved(_), _) => true,
    };
    if replace {
        *slot = Some(value);
    }
}

#[derive(Default)]
struct ZoneSetpoints {
    heating: Option<LoadValue>,
    cooling: Option<LoadValue>,
}

/// Heating and cooling setpoints in °C
///
/// Zones without a thermostat report 0.0.
pub fn setpoints(ctx: &LoadContext<'_>, anomalies: &mut Vec<Anomaly>) -> Setpoints {
    let mut per_zone: Vec<(String, ZoneSetpoints)> = ctx
        .geometry
        .names()
        .map(|n| (n.to_string(), ZoneSetpoints::default()))
        .collect();

    for thermostat in ctx.doc.get(THERMOSTAT_OBJECT) {
        let targets = ctx.target_zones(THERMOSTAT_OBJECT, thermostat, THERMOSTAT_ZONE_FIELD, anomalies);
        if targets.is_empty() {
            continue;
        }

        for (kind, name) in thermostat_controls(thermostat) {
            let (heating, cooling) = resolve_control(ctx, kind, name, anomalies);
            for zone in &targets {
                let Some((_, slots)) = per_zone.iter_mut().find(|(n, _)| *n == zone.name) else {
                    continue;
                };
                if let Some(v) = &heating {
                    merge(&mut slots.heating, v.clone());
                }
                if let Some(v) = &cooling {
                    merge(&mut slots.cooling, v.clone());
                }
            }
        }
    }

    let mut result = Setpoints::default();
    for (zone, slots) in per_zone {
        result
            .heating
            .insert(zone.clone(), slots.heating.unwrap_or(LoadValue::ZERO));
        result
            .cooling
            .insert(zone, slots.cooling.unwrap_or(LoadValue::ZERO));
    }
    result
}

/// Follow one control entry to `(heating, cooling)` values
fn resolve_control(
    ctx: &LoadContext<'_>,
    control_type: &str,
    control_name: &str,
    anomalies: &mut Vec<Anomaly>,
) -> (Option<LoadValue>, Option<LoadValue>) {
    let Some(schedules) = setpoint_schedules(ctx.doc, control_type, control_name) else {
        anomalies.push(Anomaly::unresolved("thermostat setpoint object", control_name));
        let declared = control_type.to_ascii_uppercase();
        if !SETPOINT_TYPES.contains(&declared.as_str()) {
            return (None, None);
        }
        let fallback = LoadValue::Unresolved(control_name.to_string());
        let driven = sides(&declared);
        return (
            driven.heating.then(|| fallback.clone()),
            driven.cooling.then_some(fallback),
        );
    };

    let mut resolve = |schedule: Option<&str>, context: &str| -> Option<LoadValue> {
        let schedule = schedule?;
        Some(match ctx.schedules.resolve(schedule) {
            Some(v) => LoadValue::Value(v),
            None => {
                anomalies.push(Anomaly::unresolved(context, schedule));
                LoadValue::Unresolved(schedule.to_string())
            }
        })
    };
    let heating = resolve(schedules.heating, "heating setpoint schedule");
    let cooling = resolve(schedules.cooling, "cooling setpoint schedule");
    (heating, cooling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use idf_lite_core::parse_str;
    use idf_lite_geometry::zone_geometry;

    const IDF: &str = "
        Zone, Core_ZN, 0, 0, 0, 0, 1, 1, 3, autocalculate, 100;
        Zone, Perimeter_ZN_1, 0, 0, 0, 0, 1, 1, 3, autocalculate, 50;
        Zone, Attic, 0, 0, 0, 0, 1, 1, 3, autocalculate, 100;
        Schedule:Compact, HTGSETP_SCH, Temperature, Through: 12/31, For: AllDays, Until: 24:00, 21;
        Schedule:Constant, CLGSETP_SCH, Temperature, 24;
        ZoneControl:Thermostat, Core_ZN Thermostat, Core_ZN, Dual Zone Control Type Sched,
            ThermostatSetpoint:DualSetpoint, Core_ZN DualSPSched;
        ThermostatSetpoint:DualSetpoint, Core_ZN DualSPSched, HTGSETP_SCH, CLGSETP_SCH;
        ZoneControl:Thermostat, Perimeter Thermostat, Perimeter_ZN_1, Dual Zone Control Type Sched,
            ThermostatSetpoint:DualSetpoint, Perimeter DualSPSched;
        ThermostatSetpoint:DualSetpoint, Perimeter DualSPSched, HTGSETP_SCH, Missing_CLG_SCH;
    ";

    fn run(idf: &str) -> (Setpoints, Vec<Anomaly>) {
        let doc = parse_str(idf).unwrap();
        let geometry = zone_geometry(&doc).zones;
        let ctx = LoadContext::new(&doc, &geometry);
        let mut anomalies = Vec::new();
        (setpoints(&ctx, &mut anomalies), anomalies)
    }

    #[test]
    fn test_dual_setpoint_resolved() {
        let (sp, _) = run(IDF);
        assert_eq!(sp.heating["Core_ZN"], LoadValue::Value(21.0));
        assert_eq!(sp.cooling["Core_ZN"], LoadValue::Value(24.0));
    }

    #[test]
    fn test_unresolved_schedule_keeps_name() {
        let (sp, anomalies) = run(IDF);
        assert_eq!(sp.heating["Perimeter_ZN_1"], LoadValue::Value(21.0));
        assert_eq!(
            sp.cooling["Perimeter_ZN_1"],
            LoadValue::Unresolved("Missing_CLG_SCH".into())
        );
        assert_eq!(anomalies.len(), 1);
    }

    #[test]
    fn test_uncontrolled_zone_is_zero() {
        let (sp, _) = run(IDF);
        assert_eq!(sp.heating["Attic"], LoadValue::ZERO);
        assert_eq!(sp.cooling["Attic"], LoadValue::ZERO);
    }

    #[test]
    fn test_missing_setpoint_object_falls_back_to_control_name() {
        let (sp, anomalies) = run("
            Zone, Core_ZN, 0, 0, 0, 0, 1, 1, 3, autocalculate, 100;
            ZoneControl:Thermostat, T, Core_ZN, Ctrl, ThermostatSetpoint:SingleHeating, Heat Only SP;
        ");
        assert_eq!(sp.heating["Core_ZN"], LoadValue::Unresolved("Heat Only SP".into()));
        assert_eq!(sp.cooling["Core_ZN"], LoadValue::ZERO);
        assert!(!anomalies.is_empty());
    }

    #[test]
    fn test_single_heating_or_cooling_sets_both() {
        let (sp, _) = run("
            Zone, Core_ZN, 0, 0, 0, 0, 1, 1, 3, autocalculate, 100;
            Schedule:Constant, Deadband, Temperature, 22;
            ZoneControl:Thermostat, T, Core_ZN, Ctrl, ThermostatSetpoint:SingleHeatingOrCooling, SP;
            ThermostatSetpoint:SingleHeatingOrCooling, SP, Deadband;
        ");
        assert_eq!(sp.heating["Core_ZN"], LoadValue::Value(22.0));
        assert_eq!(sp.cooling["Core_ZN"], LoadValue::Value(22.0));
    }

    #[test]
    fn test_controls_iterates_pairs() {
        let record = ObjectRecord::from_fields(&[
            "T",
            "Z",
            "Ctrl",
            "ThermostatSetpoint:SingleHeating",
            "H",
            "ThermostatSetpoint:SingleCooling",
            "C",
        ]);
        let pairs: Vec<_> = thermostat_controls(&record).collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1], ("ThermostatSetpoint:SingleCooling", "C"));
    }
}
