// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BuildingSurface:Detailed decoding
//!
//! EnergyPlus 9 inserted a Space Name field after the zone name, which
//! shifts every later field by one. The layout is detected per record by
//! checking whether field 4 already holds a boundary condition keyword.

use idf_lite_core::{Anomaly, ObjectRecord, ParsedDocument};
use nalgebra::Point3;

use crate::polygon::polygon_area;

pub const SURFACE_OBJECT: &str = "BUILDINGSURFACE:DETAILED";

/// Outside boundary condition keywords valid at field 4 in 8.x files
const BOUNDARY_KEYWORDS: &[&str] = &[
    "outdoors",
    "ground",
    "surface",
    "zone",
    "othersidecoefficients",
    "othersideconditionsmodel",
    "adiabatic",
    "foundation",
];

/// Field positions for one BuildingSurface:Detailed layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLayout {
    pub zone: usize,
    pub boundary: usize,
    pub vertex_count: usize,
    pub first_vertex: usize,
}

impl SurfaceLayout {
    /// Layout without the Space Name field (EnergyPlus 8.x)
    pub const LEGACY: SurfaceLayout = SurfaceLayout {
        zone: 3,
        boundary: 4,
        vertex_count: 9,
        first_vertex: 10,
    };

    /// Layout with the Space Name field (EnergyPlus 9+)
    pub const WITH_SPACE: SurfaceLayout = SurfaceLayout {
        zone: 3,
        boundary: 5,
        vertex_count: 10,
        first_vertex: 11,
    };

    /// Detect the layout of a record
    pub fn detect(record: &ObjectRecord) -> Self {
        let field4 = record.keyword(4);
        if BOUNDARY_KEYWORDS.contains(&field4.trim()) {
            Self::LEGACY
        } else {
            Self::WITH_SPACE
        }
    }
}

/// Surface type (field 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceType {
    Floor,
    Wall,
    Roof,
    Ceiling,
    Other,
}

impl SurfaceType {
    pub fn from_field(field: &str) -> Self {
        match field.trim().to_ascii_lowercase().as_str() {
            "floor" => SurfaceType::Floor,
            "wall" => SurfaceType::Wall,
            "roof" => SurfaceType::Roof,
            "ceiling" => SurfaceType::Ceiling,
            _ => SurfaceType::Other,
        }
    }
}

/// Decoded surface
#[derive(Debug, Clone)]
pub struct Surface {
    pub name: String,
    pub surface_type: SurfaceType,
    pub zone: String,
    /// Outside boundary condition as written
    pub boundary: String,
    pub vertices: Vec<Point3<f64>>,
}

impl Surface {
    pub fn area(&self) -> f64 {
        polygon_area(&self.vertices)
    }

    /// True for walls facing outdoor air
    pub fn is_exterior_wall(&self) -> bool {
        self.surface_type == SurfaceType::Wall && self.boundary.eq_ignore_ascii_case("outdoors")
    }
}

/// Read the vertex list of a record
///
/// A blank or `autocalculate` vertex count consumes every remaining
/// coordinate. Returns the index of the first unreadable field on failure.
fn read_vertices(record: &ObjectRecord, layout: SurfaceLayout) -> Result<Vec<Point3<f64>>, usize> {
    let declared = record.number(layout.vertex_count).map(|n| n.max(0.0) as usize);
    let end = match declared {
        Some(n) => layout
            .first_vertex
            .saturating_add(n.min(record.len()).saturating_mul(3))
            .min(record.len()),
        None => record.len(),
    };

    let mut coords = Vec::with_capacity(end.saturating_sub(layout.first_vertex));
    for index in layout.first_vertex..end {
        let field = record.field(index).unwrap_or("");
        if field.is_empty() {
            continue;
        }
        coords.push(record.number(index).ok_or(index)?);
    }

    Ok(coords
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect())
}

/// Decode one BuildingSurface:Detailed record
pub fn decode_surface(record: &ObjectRecord) -> Result<Surface, Anomaly> {
    let layout = SurfaceLayout::detect(record);
    let vertices = read_vertices(record, layout).map_err(|field| Anomaly::InvalidValue {
        object_type: SURFACE_OBJECT.to_string(),
        name: record.name().to_string(),
        field,
        value: record.field(field).unwrap_or("").to_string(),
    })?;

    Ok(Surface {
        name: record.name().to_string(),
        surface_type: SurfaceType::from_field(record.field(1).unwrap_or("")),
        zone: record.field(layout.zone).unwrap_or("").to_string(),
        boundary: record.field(layout.boundary).unwrap_or("").to_string(),
        vertices,
    })
}

/// Decode every surface of the document, collecting unreadable ones as anomalies
pub fn surfaces(doc: &ParsedDocument) -> (Vec<Surface>, Vec<Anomaly>) {
    let mut decoded = Vec::new();
    let mut anomalies = Vec::new();
    for record in doc.get(SURFACE_OBJECT) {
        match decode_surface(record) {
            Ok(surface) => decoded.push(surface),
            Err(anomaly) => anomalies.push(anomaly),
        }
    }
    (decoded, anomalies)
}
