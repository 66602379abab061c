// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IDF-Lite Geometry Processing
//!
//! Zone floor, facade and volume figures derived from
//! `BuildingSurface:Detailed` polygons using nalgebra vector math.

pub mod polygon;
pub mod surface;
pub mod zone;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use polygon::{polygon_area, polygon_normal};
pub use surface::{decode_surface, surfaces, Surface, SurfaceLayout, SurfaceType};
pub use zone::{facade_areas, floor_areas, zone_geometry, GeometryResult, ZoneGeometry, ZoneGeometryMap};
