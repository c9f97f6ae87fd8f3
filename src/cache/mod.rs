//! Vertex Cache Module
//!
//! Lit surfaces keep their GPU-resident vertex and index data in a cache
//! that reclaims anything not touched during the current frame. The
//! interaction code only sees the `VertexCacheManager` capability; every
//! allocation may fail under memory pressure and that failure is reported
//! through the return value, never as an error.

pub mod vertex_cache;

pub use vertex_cache::{CacheStats, FrameVertexCache};

use crate::constants::cache::LIGHTING_VERTEX_BYTES;
use crate::model::{DrawVert, TriSurface};
use bytemuck::{Pod, Zeroable};
use cgmath::{InnerSpace, Point3};
use static_assertions::const_assert_eq;

/// Handle to one cache allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheHandle(pub u64);

/// What a cache allocation holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Ambient,
    Lighting,
    Index,
}

/// Per-vertex light vector for paths without vertex programs
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightingVert {
    pub light_dir: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<LightingVert>(), LIGHTING_VERTEX_BYTES);

/// Capability interface over the frame vertex cache
pub trait VertexCacheManager {
    /// Copy `data` into the cache. `None` means out of cache memory.
    fn alloc(&mut self, data: &[u8], kind: CacheKind) -> Option<CacheHandle>;

    /// Keep an allocation alive through the current frame
    fn touch(&mut self, handle: CacheHandle);

    /// False once the allocation has been reclaimed
    fn is_resident(&self, handle: CacheHandle) -> bool;

    /// Upload the surface's ambient vertices.
    ///
    /// Surfaces that will be lit also upload their normals; unlit ones
    /// leave them zeroed.
    fn create_ambient_cache(&mut self, tri: &mut TriSurface, needs_lighting: bool) -> bool {
        let handle = if needs_lighting {
            self.alloc(bytemuck::cast_slice(&tri.verts), CacheKind::Ambient)
        } else {
            let stripped: Vec<DrawVert> = tri
                .verts
                .iter()
                .map(|v| DrawVert::new(v.xyz, v.st, [0.0; 3]))
                .collect();
            self.alloc(bytemuck::cast_slice(&stripped), CacheKind::Ambient)
        };

        tri.ambient_cache = handle;
        handle.is_some()
    }

    /// Upload per-vertex light vectors toward a light given in the
    /// surface's local space.
    fn create_lighting_cache(&mut self, tri: &mut TriSurface, local_light_origin: Point3<f32>) -> bool {
        let verts: Vec<LightingVert> = tri
            .verts
            .iter()
            .map(|v| {
                let to_light = local_light_origin - v.position();
                let dir = if to_light.magnitude2() > 0.0 {
                    to_light.normalize()
                } else {
                    to_light
                };
                LightingVert {
                    light_dir: [dir.x, dir.y, dir.z, 1.0],
                }
            })
            .collect();

        let handle = self.alloc(bytemuck::cast_slice(&verts), CacheKind::Lighting);
        tri.lighting_cache = handle;
        handle.is_some()
    }

    /// Upload a triangle index list
    fn alloc_index_cache(&mut self, indexes: &[u32]) -> Option<CacheHandle> {
        self.alloc(bytemuck::cast_slice(indexes), CacheKind::Index)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{FullCache, RecordingCache};
    use super::*;

    fn triangle() -> TriSurface {
        TriSurface::new(
            vec![
                DrawVert::at(0.0, 0.0, 0.0),
                DrawVert::at(1.0, 0.0, 0.0),
                DrawVert::at(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn test_ambient_cache_sets_handle() {
        let mut cache = RecordingCache::default();
        let mut tri = triangle();
        assert!(cache.create_ambient_cache(&mut tri, true));
        assert!(tri.ambient_cache.is_some());
        assert!(cache.create_lighting_cache(&mut tri, Point3::new(0.0, 0.0, 10.0)));
        assert!(tri.lighting_cache.is_some());
    }

    #[test]
    fn test_full_cache_reports_failure() {
        let mut cache = FullCache::default();
        let mut tri = triangle();
        assert!(!cache.create_ambient_cache(&mut tri, false));
        assert!(tri.ambient_cache.is_none());
        assert!(cache.alloc_index_cache(&tri.indexes).is_none());
        assert_eq!(cache.attempts, 2);
    }
}
