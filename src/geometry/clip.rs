//! Clipping and culling against light volumes
//!
//! All light frustum planes face outward, so "inside the light" means a
//! distance `<= 0` against every plane. Triangle clipping works on the
//! negated planes so the kept side is the front side.

use super::bounds::{
    bounds_contains_point, bounds_corners, bounds_expanded, Bounds,
};
use super::plane::Plane;
use super::render_matrix::local_point_to_global;
use super::winding::Winding;
use crate::constants::clip::{LIGHT_CLIP_EPSILON, MAX_CLIPPED_POINTS};
use cgmath::{Matrix4, Point3};

/// Fixed-capacity polygon used while chopping triangles.
///
/// One extra slot lets the first point be duplicated at the end so edge
/// walks never wrap.
#[derive(Debug, Clone, Copy)]
pub struct ClipTri {
    pub num_verts: usize,
    pub verts: [Point3<f32>; MAX_CLIPPED_POINTS + 1],
}

impl ClipTri {
    pub fn empty() -> Self {
        Self {
            num_verts: 0,
            verts: [Point3::new(0.0, 0.0, 0.0); MAX_CLIPPED_POINTS + 1],
        }
    }

    pub fn triangle(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let mut tri = Self::empty();
        tri.verts[0] = a;
        tri.verts[1] = b;
        tri.verts[2] = c;
        tri.num_verts = 3;
        tri
    }

    fn push(&mut self, point: Point3<f32>) {
        // six planes can add at most six points to a triangle
        if self.num_verts < MAX_CLIPPED_POINTS {
            self.verts[self.num_verts] = point;
            self.num_verts += 1;
        }
    }
}

/// Clip the polygon in `buffers[input]` by `plane`, keeping the front side.
///
/// Returns the index of the buffer holding the result, which is `input`
/// itself when nothing needed clipping. Points closer than
/// `LIGHT_CLIP_EPSILON` slop onto the back; when no point is clearly in
/// front the result has zero vertices.
pub fn chop_winding(buffers: &mut [ClipTri; 2], input: usize, plane: &Plane) -> usize {
    let output = input ^ 1;
    let mut dists = [0.0f32; MAX_CLIPPED_POINTS + 1];
    let mut front_side = [false; MAX_CLIPPED_POINTS + 1];
    let mut any_front = false;
    let mut back_count = 0;

    let count = buffers[input].num_verts;
    for i in 0..count {
        let dist = plane.distance(buffers[input].verts[i]);
        dists[i] = dist;
        if dist < LIGHT_CLIP_EPSILON {
            front_side[i] = false;
            back_count += 1;
        } else {
            front_side[i] = true;
            if dist > LIGHT_CLIP_EPSILON {
                any_front = true;
            }
        }
    }

    if !any_front {
        buffers[input].num_verts = 0;
        return input;
    }
    if back_count == 0 {
        return input;
    }

    dists[count] = dists[0];
    front_side[count] = front_side[0];
    buffers[input].verts[count] = buffers[input].verts[0];

    let source = buffers[input];
    let out = &mut buffers[output];
    out.num_verts = 0;

    for i in 0..count {
        let p1 = source.verts[i];
        if front_side[i] {
            out.push(p1);
        }
        if front_side[i + 1] == front_side[i] {
            continue;
        }

        let p2 = source.verts[i + 1];
        let frac = dists[i] / (dists[i] - dists[i + 1]);
        out.push(p1 + (p2 - p1) * frac);
    }

    output
}

/// Returns false if nothing of the triangle survives the light planes
/// selected by `plane_bits`. `frustum` holds inward-facing planes.
pub fn clip_triangle_to_light(
    a: Point3<f32>,
    b: Point3<f32>,
    c: Point3<f32>,
    plane_bits: u8,
    frustum: &[Plane; 6],
) -> bool {
    let mut ping_pong = [ClipTri::triangle(a, b, c), ClipTri::empty()];
    let mut current = 0;

    for (i, plane) in frustum.iter().enumerate() {
        if plane_bits & (1 << i) != 0 {
            current = chop_winding(&mut ping_pong, current, plane);
            if ping_pong[current].num_verts < 1 {
                return false;
            }
        }
    }

    true
}

/// True when a model-space box is completely outside any of the given
/// outward-facing world planes.
pub fn cull_local_box(bounds: &Bounds, model_matrix: &Matrix4<f32>, planes: &[Plane]) -> bool {
    let corners = bounds_corners(bounds).map(|corner| local_point_to_global(model_matrix, corner));

    planes.iter().any(|plane| {
        corners
            .iter()
            .all(|corner| plane.distance(*corner) > 0.0)
    })
}

/// True when every point of the winding is inside all six light planes
pub fn winding_completely_inside_light(winding: &Winding, frustum: &[Plane; 6]) -> bool {
    winding
        .points
        .iter()
        .all(|point| frustum.iter().all(|plane| plane.distance(*point) <= 0.0))
}

/// Whether the view might sit inside the infinite shadow volume an occluder
/// casts from a light.
///
/// Everything is in the occluder's local space. The occluder bounds are
/// grown by twice the near clip distance so a near plane chopping a volume
/// edge still counts as inside. When false, the shadow can be drawn without
/// caps.
pub fn potentially_inside_infinite_shadow(
    occluder_bounds: &Bounds,
    local_view: Point3<f32>,
    local_light: Point3<f32>,
    z_near: f32,
) -> bool {
    let stretch = z_near * 2.0;
    let expanded = bounds_expanded(occluder_bounds, stretch);

    if bounds_contains_point(&expanded, local_view) {
        return true;
    }
    if bounds_contains_point(&expanded, local_light) {
        return true;
    }

    // if the ray from the light to the view hits a face of the expanded
    // bounds, the view is inside the projection
    let ray = local_view - local_light;
    let light = [local_light.x, local_light.y, local_light.z];
    let view = [local_view.x, local_view.y, local_view.z];
    let mins = [expanded.min.x, expanded.min.y, expanded.min.z];
    let maxs = [expanded.max.x, expanded.max.y, expanded.max.z];
    let ray_axes = [ray.x, ray.y, ray.z];

    for axis in 0..3 {
        let face = if light[axis] < mins[axis] {
            if view[axis] < mins[axis] {
                continue;
            }
            mins[axis]
        } else if light[axis] > maxs[axis] {
            if view[axis] > maxs[axis] {
                continue;
            }
            maxs[axis]
        } else {
            continue;
        };

        let frac = (face - light[axis]) / ray_axes[axis];
        let mut hit = local_light + ray * frac;
        match axis {
            0 => hit.x = face,
            1 => hit.y = face,
            _ => hit.z = face,
        }

        if bounds_contains_point(&expanded, hit) {
            return true;
        }
    }

    false
}
