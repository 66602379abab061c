// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zone geometry tests against small IDF models.

use approx::assert_relative_eq;
use idf_lite_core::{parse_str, Anomaly};
use idf_lite_geometry::{facade_areas, floor_areas, zone_geometry};

/// 10 x 5 m box, 3 m high: one exterior south wall, one interior wall
const BOX_ZONE: &str = r#"
Zone, Office_ZN, 0, 0, 0, 0, 1, 2, , , autocalculate;

BuildingSurface:Detailed,
  Office_Floor, Floor, Slab, Office_ZN, , Ground, , NoSun, NoWind, autocalculate, 4,
  10, 0, 0,   0, 0, 0,   0, 5, 0,   10, 5, 0;

BuildingSurface:Detailed,
  Office_Wall_S, Wall, ExtWall, Office_ZN, , Outdoors, , SunExposed, WindExposed, autocalculate, 4,
  0, 0, 3,   0, 0, 0,   10, 0, 0,   10, 0, 3;

BuildingSurface:Detailed,
  Office_Wall_N, Wall, IntWall, Office_ZN, , Surface, Corridor_Wall_S, NoSun, NoWind, autocalculate, 4,
  10, 5, 3,   10, 5, 0,   0, 5, 0,   0, 5, 3;

Zone, Storage, 0, 0, 0, 0, 1, 1, 2.5, 40, 20;
"#;

#[test]
fn test_floor_area_from_surfaces() {
    let doc = parse_str(BOX_ZONE).unwrap();
    let floors = floor_areas(&doc);
    assert_relative_eq!(floors["Office_ZN"], 50.0, epsilon = 1e-9);
    // explicit floor area is used verbatim
    assert_relative_eq!(floors["Storage"], 20.0, epsilon = 1e-12);
}

#[test]
fn test_facade_counts_only_outdoor_walls() {
    let doc = parse_str(BOX_ZONE).unwrap();
    let facades = facade_areas(&doc);
    assert_relative_eq!(facades["Office_ZN"], 30.0, epsilon = 1e-9);
    assert_eq!(facades["Storage"], 0.0);
}

#[test]
fn test_volume_and_height() {
    let doc = parse_str(BOX_ZONE).unwrap();
    let result = zone_geometry(&doc);

    let office = result.zones.get("office_zn").expect("case-insensitive lookup");
    assert_relative_eq!(office.height_m, 3.0, epsilon = 1e-12);
    assert_relative_eq!(office.volume_m3, 150.0, epsilon = 1e-9);
    assert_eq!(office.multiplier, 2.0);

    let storage = result.zones.get("Storage").unwrap();
    assert_eq!(storage.height_m, 2.5);
    assert_eq!(storage.volume_m3, 40.0);
}

#[test]
fn test_missing_exterior_walls_is_a_warning() {
    let doc = parse_str(BOX_ZONE).unwrap();
    let result = zone_geometry(&doc);

    assert_eq!(result.zones.len(), 2);
    assert!(result.anomalies.iter().any(|a| matches!(
        a,
        Anomaly::MissingGeometry { zone, .. } if zone == "Storage"
    )));
    assert!(!result
        .anomalies
        .iter()
        .any(|a| a.zone() == Some("Office_ZN")));
}

#[test]
fn test_surface_for_unknown_zone() {
    let content = format!(
        "{}\nBuildingSurface:Detailed, Ghost_Floor, Floor, Slab, Ghost, , Ground, , NoSun, NoWind, , 3, 0,0,0, 1,0,0, 0,1,0;\n",
        BOX_ZONE
    );
    let doc = parse_str(&content).unwrap();
    let result = zone_geometry(&doc);
    assert!(!result.zones.contains("Ghost"));
    assert!(result
        .anomalies
        .contains(&Anomaly::unresolved("surface Ghost_Floor", "Ghost")));
}
