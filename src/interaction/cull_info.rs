//! Per-surface light culling
//!
//! Cull bits record, per vertex, which light planes the vertex sits behind.
//! They are sloppy on purpose: a triangle is kept as soon as any part of it
//! is clearly inside, since pre-clipped world geometry lands right on the
//! light border all the time.

use crate::constants::clip::LIGHT_CLIP_EPSILON;
use crate::geometry::{bounds_plane_distance, clip_triangle_to_light, Plane};
use crate::model::TriSurface;
use cgmath::Matrix4;

const ALL_PLANES: u8 = (1 << 6) - 1;

/// Which light planes each vertex is behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CullBits {
    /// The whole surface is inside the light
    AllFront,
    /// Bit `i` set when the vertex is behind inward plane `i`
    PerVertex(Vec<u8>),
}

/// Cached culling state of one surface against one light
#[derive(Debug, Clone, Default)]
pub struct SurfaceCullInfo {
    /// Inward light planes in the surface's model space
    pub local_clip_planes: Option<[Plane; 6]>,
    pub cull_bits: Option<CullBits>,
    /// Indexes of the triangles the light touches
    pub light_tris: Option<Vec<u32>>,
}

impl SurfaceCullInfo {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Fill in cull bits for `tri` against the light `frustum` (outward, world
/// space) seen through `model_matrix`. Already computed info is kept.
pub fn calc_interaction_cull_bits(
    tri: &TriSurface,
    model_matrix: &Matrix4<f32>,
    frustum: &[Plane; 6],
    cull_info: &mut SurfaceCullInfo,
) {
    if cull_info.cull_bits.is_some() {
        return;
    }

    let local_planes = frustum.map(|plane| (-plane).global_to_local(model_matrix));

    let mut front_bits = 0u8;
    for (i, plane) in local_planes.iter().enumerate() {
        if bounds_plane_distance(&tri.bounds, plane) >= LIGHT_CLIP_EPSILON {
            front_bits |= 1 << i;
        }
    }
    cull_info.local_clip_planes = Some(local_planes);

    if front_bits == ALL_PLANES {
        cull_info.cull_bits = Some(CullBits::AllFront);
        return;
    }

    let mut bits = vec![0u8; tri.verts.len()];
    for (i, plane) in local_planes.iter().enumerate() {
        if front_bits & (1 << i) != 0 {
            continue;
        }
        for (bit, vert) in bits.iter_mut().zip(&tri.verts) {
            if plane.distance(vert.position()) < LIGHT_CLIP_EPSILON {
                *bit |= 1 << i;
            }
        }
    }
    cull_info.cull_bits = Some(CullBits::PerVertex(bits));
}

/// Collect the indexes of the triangles the light actually reaches.
///
/// Triangles entirely behind one plane are dropped outright; triangles that
/// straddle planes are clipped and kept only if something survives.
/// Requires cull bits to be computed; returns the number of triangles kept.
pub fn create_light_tris(tri: &TriSurface, cull_info: &mut SurfaceCullInfo) -> usize {
    let (Some(bits), Some(planes)) = (&cull_info.cull_bits, &cull_info.local_clip_planes) else {
        return 0;
    };

    let indexes = match bits {
        CullBits::AllFront => tri.indexes.clone(),
        CullBits::PerVertex(bits) => {
            let mut kept = Vec::with_capacity(tri.indexes.len());
            for face in tri.indexes.chunks_exact(3) {
                let (i1, i2, i3) = (face[0] as usize, face[1] as usize, face[2] as usize);
                let (Some(&c1), Some(&c2), Some(&c3)) = (bits.get(i1), bits.get(i2), bits.get(i3))
                else {
                    continue;
                };

                // all three behind the same plane
                if c1 & c2 & c3 != 0 {
                    continue;
                }

                let straddling = c1 | c2 | c3;
                if straddling != 0
                    && !clip_triangle_to_light(
                        tri.verts[i1].position(),
                        tri.verts[i2].position(),
                        tri.verts[i3].position(),
                        straddling,
                        planes,
                    )
                {
                    continue;
                }

                kept.extend_from_slice(face);
            }
            kept
        }
    };

    let count = indexes.len() / 3;
    cull_info.light_tris = Some(indexes);
    count
}
