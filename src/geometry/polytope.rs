//! Convex polytope meshes
//!
//! Turns a closed set of outward-facing planes into an explicit triangle
//! mesh. Light volumes use this for area queries and debug drawing.

use super::bounds::{bounds_from_points, cleared_bounds, Bounds};
use super::plane::Plane;
use super::winding::Winding;
use crate::constants::clip::ON_EPSILON;
use cgmath::Point3;

/// Triangle mesh of a convex volume plus the face windings it came from
#[derive(Debug, Clone)]
pub struct PolytopeMesh {
    pub verts: Vec<Point3<f32>>,
    pub indexes: Vec<u32>,
    pub bounds: Bounds,
    /// One face per input plane; empty when the plane contributed no face
    pub windings: Vec<Winding>,
}

impl PolytopeMesh {
    pub fn num_verts(&self) -> usize {
        self.verts.len()
    }

    pub fn num_indexes(&self) -> usize {
        self.indexes.len()
    }
}

/// Build the boundary mesh of the volume enclosed by `planes`
pub fn polytope_surface(planes: &[Plane]) -> PolytopeMesh {
    let mut windings = Vec::with_capacity(planes.len());

    for (i, plane) in planes.iter().enumerate() {
        let mut winding = Winding::base_for_plane(plane);
        for (j, other) in planes.iter().enumerate() {
            if j == i {
                continue;
            }
            if !winding.clip_in_place(&-*other, ON_EPSILON) {
                break;
            }
        }
        if winding.num_points() <= 2 {
            winding.points.clear();
        }
        windings.push(winding);
    }

    let mut verts = Vec::new();
    let mut indexes = Vec::new();
    for winding in windings.iter().filter(|w| !w.is_empty()) {
        let base = verts.len() as u32;
        for j in 1..winding.num_points() - 1 {
            indexes.push(base);
            indexes.push(base + j as u32);
            indexes.push(base + j as u32 + 1);
        }
        verts.extend_from_slice(&winding.points);
    }

    let bounds = if verts.is_empty() {
        cleared_bounds()
    } else {
        bounds_from_points(verts.iter().copied())
    };

    log::debug!(
        "[polytope::polytope_surface] Built polytope with {} verts, {} indexes",
        verts.len(),
        indexes.len()
    );

    PolytopeMesh {
        verts,
        indexes,
        bounds,
        windings,
    }
}
