// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-zone geometry
//!
//! Zone field layout (after the type name): 0 Name, 6 Multiplier,
//! 7 Ceiling Height, 8 Volume, 9 Floor Area.

use idf_lite_core::{Anomaly, ObjectRecord, ParsedDocument};
use rustc_hash::FxHashMap;

use crate::polygon::z_range;
use crate::surface::{surfaces, Surface, SurfaceType};

pub const ZONE_OBJECT: &str = "ZONE";

const MULTIPLIER_FIELD: usize = 6;
const CEILING_HEIGHT_FIELD: usize = 7;
const VOLUME_FIELD: usize = 8;
const FLOOR_AREA_FIELD: usize = 9;

/// Explicit areas at or below this are treated as "not given"
const MIN_EXPLICIT_AREA: f64 = 0.001;

/// Geometric attributes of one zone
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneGeometry {
    pub name: String,
    pub floor_area_m2: f64,
    pub facade_area_m2: f64,
    pub volume_m3: f64,
    pub height_m: f64,
    pub multiplier: f64,
}

/// Zone geometry in document order with case-insensitive lookup
#[derive(Debug, Clone, Default)]
pub struct ZoneGeometryMap {
    zones: Vec<ZoneGeometry>,
    index: FxHashMap<String, usize>,
}

impl ZoneGeometryMap {
    fn insert(&mut self, zone: ZoneGeometry) {
        let key = zone.name.to_ascii_uppercase();
        if let Some(&i) = self.index.get(&key) {
            self.zones[i] = zone;
        } else {
            self.index.insert(key, self.zones.len());
            self.zones.push(zone);
        }
    }

    pub fn get(&self, name: &str) -> Option<&ZoneGeometry> {
        self.index
            .get(&name.trim().to_ascii_uppercase())
            .map(|&i| &self.zones[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Canonical spelling of a zone name as declared by its Zone object
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.get(name).map(|z| z.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoneGeometry> {
        self.zones.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().map(|z| z.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Geometry extraction result
#[derive(Debug, Clone, Default)]
pub struct GeometryResult {
    pub zones: ZoneGeometryMap,
    pub anomalies: Vec<Anomaly>,
}

fn positive(record: &ObjectRecord, index: usize) -> Option<f64> {
    record.number(index).filter(|v| *v > 0.0)
}

/// Running totals for one zone while surfaces are summed
#[derive(Default)]
struct SurfaceTotals {
    floor: f64,
    facade: f64,
    exterior_walls: usize,
    z_min: Option<f64>,
    z_max: Option<f64>,
}

impl SurfaceTotals {
    fn add(&mut self, surface: &Surface) {
        match surface.surface_type {
            SurfaceType::Floor => self.floor += surface.area(),
            SurfaceType::Wall if surface.is_exterior_wall() => {
                self.facade += surface.area();
                self.exterior_walls += 1;
            }
            _ => {}
        }
        if let Some((lo, hi)) = z_range(&surface.vertices) {
            self.z_min = Some(self.z_min.map_or(lo, |z| z.min(lo)));
            self.z_max = Some(self.z_max.map_or(hi, |z| z.max(hi)));
        }
    }

    fn vertical_extent(&self) -> f64 {
        match (self.z_min, self.z_max) {
            (Some(lo), Some(hi)) => hi - lo,
            _ => 0.0,
        }
    }
}

/// Compute floor area, facade area, height and volume for every zone
pub fn zone_geometry(doc: &ParsedDocument) -> GeometryResult {
    let (decoded, mut anomalies) = surfaces(doc);

    let mut totals: FxHashMap<String, SurfaceTotals> = FxHashMap::default();
    for surface in &decoded {
        totals
            .entry(surface.zone.to_ascii_uppercase())
            .or_default()
            .add(surface);
    }

    let mut zones = ZoneGeometryMap::default();
    for record in doc.get(ZONE_OBJECT) {
        let name = record.name();
        if name.is_empty() {
            continue;
        }
        let sums = totals.get(&name.to_ascii_uppercase());

        let floor_area_m2 = match record.number(FLOOR_AREA_FIELD) {
            Some(area) if area > MIN_EXPLICIT_AREA => area,
            _ => sums.map_or(0.0, |t| t.floor),
        };
        let facade_area_m2 = sums.map_or(0.0, |t| t.facade);

        let explicit_height = positive(record, CEILING_HEIGHT_FIELD);
        let explicit_volume = positive(record, VOLUME_FIELD);
        let height_m = match (explicit_height, explicit_volume) {
            (Some(h), _) => h,
            (None, Some(v)) if floor_area_m2 > 0.0 => v / floor_area_m2,
            _ => sums.map_or(0.0, SurfaceTotals::vertical_extent),
        };
        let volume_m3 = explicit_volume.unwrap_or(floor_area_m2 * height_m);

        if floor_area_m2 <= 0.0 {
            anomalies.push(Anomaly::missing_geometry(name, "no floor area or floor surfaces"));
        }
        if sums.map_or(0, |t| t.exterior_walls) == 0 {
            anomalies.push(Anomaly::missing_geometry(name, "no exterior walls, facade area is 0"));
        }

        zones.insert(ZoneGeometry {
            name: name.to_string(),
            floor_area_m2,
            facade_area_m2,
            volume_m3,
            height_m,
            multiplier: positive(record, MULTIPLIER_FIELD).unwrap_or(1.0),
        });
    }

    for surface in &decoded {
        if !surface.zone.is_empty() && !zones.contains(&surface.zone) {
            anomalies.push(Anomaly::unresolved(
                format!("surface {}", surface.name),
                surface.zone.clone(),
            ));
        }
    }

    GeometryResult { zones, anomalies }
}

/// Floor area per zone (m2)
pub fn floor_areas(doc: &ParsedDocument) -> FxHashMap<String, f64> {
    zone_geometry(doc)
        .zones
        .iter()
        .map(|z| (z.name.clone(), z.floor_area_m2))
        .collect()
}

/// Exterior wall area per zone (m2)
pub fn facade_areas(doc: &ParsedDocument) -> FxHashMap<String, f64> {
    zone_geometry(doc)
        .zones
        .iter()
        .map(|z| (z.name.clone(), z.facade_area_m2))
        .collect()
}
