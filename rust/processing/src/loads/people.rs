// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Occupant density from `People` objects.

use idf_lite_core::Anomaly;
use tracing::debug;

use super::{invalid_value, required_number, LoadContext, ZoneLoadMap, ZoneSums};

pub const PEOPLE_OBJECT: &str = "PEOPLE";

const ZONE_FIELD: usize = 1;
const METHOD_FIELD: usize = 3;
const PEOPLE_FIELD: usize = 4;
const PEOPLE_PER_AREA_FIELD: usize = 5;
const AREA_PER_PERSON_FIELD: usize = 6;

/// Occupancy in people/m² for every zone
pub fn occupancy(ctx: &LoadContext<'_>, anomalies: &mut Vec<Anomaly>) -> ZoneLoadMap {
    let mut sums = ZoneSums::zeroed(ctx.geometry);

    for record in ctx.doc.get(PEOPLE_OBJECT) {
        let zones = ctx.target_zones(PEOPLE_OBJECT, record, ZONE_FIELD, anomalies);
        if zones.is_empty() {
            continue;
        }

        let method = record.keyword(METHOD_FIELD);
        match method.as_str() {
            "people" => {
                let Some(count) = required_number(PEOPLE_OBJECT, record, PEOPLE_FIELD, anomalies)
                else {
                    continue;
                };
                for zone in zones {
                    if zone.floor_area_m2 > 0.0 {
                        sums.add(&zone.name, count / zone.floor_area_m2);
                    } else {
                        debug!(zone = %zone.name, people = %record.name(), "Skipping people count for zone without floor area");
                    }
                }
            }
            "people/area" | "perarea" => {
                let Some(density) =
                    required_number(PEOPLE_OBJECT, record, PEOPLE_PER_AREA_FIELD, anomalies)
                else {
                    continue;
                };
                for zone in zones {
                    sums.add(&zone.name, density);
                }
            }
            "area/person" | "perperson" => {
                let Some(area) =
                    required_number(PEOPLE_OBJECT, record, AREA_PER_PERSON_FIELD, anomalies)
                else {
                    continue;
                };
                if area <= 0.0 {
                    anomalies.push(invalid_value(PEOPLE_OBJECT, record, AREA_PER_PERSON_FIELD));
                    continue;
                }
                for zone in zones {
                    sums.add(&zone.name, 1.0 / area);
                }
            }
            _ => anomalies.push(invalid_value(PEOPLE_OBJECT, record, METHOD_FIELD)),
        }
    }

    sums.into_values()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::LoadValue;
    use approx::assert_relative_eq;
    use idf_lite_core::parse_str;
    use idf_lite_geometry::zone_geometry;

    fn run(idf: &str) -> (ZoneLoadMap, Vec<Anomaly>) {
        let doc = parse_str(idf).unwrap();
        let geometry = zone_geometry(&doc).zones;
        let ctx = LoadContext::new(&doc, &geometry);
        let mut anomalies = Vec::new();
        (occupancy(&ctx, &mut anomalies), anomalies)
    }

    const ZONES: &str = "
        Zone, Office, 0, 0, 0, 0, 1, 1, 3, autocalculate, 100;
        Zone, Storage, 0, 0, 0, 0, 1, 1, 3, autocalculate, 40;
    ";

    #[test]
    fn test_all_methods() {
        let idf = format!(
            "{}
            People, Office People, Office, Occ, People, 10, , , 0.3;
            People, Storage People, Storage, Occ, Area/Person, , , 20, 0.3;
            ",
            ZONES
        );
        let (values, anomalies) = run(&idf);
        assert!(anomalies.is_empty());
        assert_relative_eq!(values["Office"].as_f64().unwrap(), 0.1);
        assert_relative_eq!(values["Storage"].as_f64().unwrap(), 0.05);
    }

    #[test]
    fn test_zone_without_people_is_zero() {
        let idf = format!("{}People, P, Office, Occ, People/Area, , 0.05;", ZONES);
        let (values, _) = run(&idf);
        assert_eq!(values["Storage"], LoadValue::Value(0.0));
        assert_relative_eq!(values["Office"].as_f64().unwrap(), 0.05);
    }

    #[test]
    fn test_bad_number_is_reported() {
        let idf = format!("{}People, P, Office, Occ, People, lots;", ZONES);
        let (values, anomalies) = run(&idf);
        assert_eq!(values["Office"], LoadValue::Value(0.0));
        assert!(matches!(anomalies[0], Anomaly::InvalidValue { field: 4, .. }));
    }
}
