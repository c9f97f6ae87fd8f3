//! Triangle surfaces and their cache slots
//!
//! A `TriSurface` is the ambient (unlit) geometry of one model surface. It is
//! shared between the model and every interaction that lights it, so the
//! vertex cache handles live here and are reused across lights.

use crate::cache::CacheHandle;
use crate::constants::cache::AMBIENT_VERTEX_BYTES;
use crate::geometry::{bounds_from_points, Bounds};
use bytemuck::{Pod, Zeroable};
use cgmath::Point3;
use parking_lot::RwLock;
use static_assertions::const_assert_eq;
use std::sync::Arc;

/// One vertex as uploaded to the ambient cache
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DrawVert {
    pub xyz: [f32; 3],
    pub st: [f32; 2],
    pub normal: [f32; 3],
}

const_assert_eq!(std::mem::size_of::<DrawVert>(), AMBIENT_VERTEX_BYTES);

impl DrawVert {
    pub fn new(xyz: [f32; 3], st: [f32; 2], normal: [f32; 3]) -> Self {
        Self { xyz, st, normal }
    }

    /// Vertex with only a position
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            xyz: [x, y, z],
            st: [0.0; 2],
            normal: [0.0, 0.0, 1.0],
        }
    }

    pub fn position(&self) -> Point3<f32> {
        Point3::from(self.xyz)
    }
}

/// Indexed triangle soup with cache slots
#[derive(Debug, Clone, Default)]
pub struct TriSurface {
    pub verts: Vec<DrawVert>,
    pub indexes: Vec<u32>,
    pub bounds: Bounds,
    pub ambient_cache: Option<CacheHandle>,
    pub lighting_cache: Option<CacheHandle>,
    pub index_cache: Option<CacheHandle>,
    /// View count of the last view that drew this surface unlit
    pub ambient_view_count: u64,
}

/// Ambient surfaces are shared by the model and every interaction on it
pub type SharedTriSurface = Arc<RwLock<TriSurface>>;

impl TriSurface {
    /// Build a surface and compute its bounds from the vertices
    pub fn new(verts: Vec<DrawVert>, indexes: Vec<u32>) -> Self {
        let bounds = bounds_from_points(verts.iter().map(DrawVert::position));
        Self {
            verts,
            indexes,
            bounds,
            ambient_cache: None,
            lighting_cache: None,
            index_cache: None,
            ambient_view_count: 0,
        }
    }

    pub fn num_verts(&self) -> usize {
        self.verts.len()
    }

    pub fn num_indexes(&self) -> usize {
        self.indexes.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.indexes.len() / 3
    }

    /// Wrap into the shared form models hand out
    pub fn into_shared(self) -> SharedTriSurface {
        Arc::new(RwLock::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_follow_vertices() {
        let tri = TriSurface::new(
            vec![
                DrawVert::at(0.0, 0.0, 0.0),
                DrawVert::at(4.0, 0.0, 0.0),
                DrawVert::at(0.0, 2.0, 1.0),
            ],
            vec![0, 1, 2],
        );
        assert_eq!(tri.bounds.max, Point3::new(4.0, 2.0, 1.0));
        assert_eq!(tri.num_triangles(), 1);
        assert!(tri.ambient_cache.is_none());
    }

    #[test]
    fn test_draw_vert_casts_to_bytes() {
        let verts = [DrawVert::at(1.0, 2.0, 3.0)];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), AMBIENT_VERTEX_BYTES);
    }
}
