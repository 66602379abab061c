// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar polygon measures in 3D.

use nalgebra::{Point3, Vector3};

/// Sum of the cross products of consecutive fan edges from the first vertex
///
/// For a planar polygon the result is normal to the plane with magnitude
/// twice the enclosed area; its direction follows the winding order.
#[inline]
pub fn area_vector(vertices: &[Point3<f64>]) -> Vector3<f64> {
    if vertices.len() < 3 {
        return Vector3::zeros();
    }
    let origin = vertices[0];
    vertices
        .windows(2)
        .skip(1)
        .fold(Vector3::zeros(), |acc, pair| {
            acc + (pair[0] - origin).cross(&(pair[1] - origin))
        })
}

/// Area of a planar, simple polygon given in 3D
///
/// Works for any orientation in space; winding and starting vertex do not
/// affect the result. Fewer than 3 vertices yield 0.
#[inline]
pub fn polygon_area(vertices: &[Point3<f64>]) -> f64 {
    area_vector(vertices).norm() * 0.5
}

/// Unit normal of the polygon plane, `None` for degenerate input
pub fn polygon_normal(vertices: &[Point3<f64>]) -> Option<Vector3<f64>> {
    area_vector(vertices).try_normalize(1e-12)
}

/// (min z, max z) over a set of vertices
pub fn z_range<'a>(vertices: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<(f64, f64)> {
    vertices.into_iter().fold(None, |range, p| match range {
        None => Some((p.z, p.z)),
        Some((lo, hi)) => Some((lo.min(p.z), hi.max(p.z))),
    })
}
