//! Light Operations - Pure DOP Functions
//!
//! Derivation of frustum planes, projections, bounds and the light volume
//! polytope from raw light parameters.

use super::light_data::{LightDef, LightHandle, LightKind, LightParms, LightProjectionUniform, SpotParms};
use crate::constants::light::{
    MAX_LIGHT_VERTS, PARALLEL_LIGHT_DISTANCE, SPOT_LIGHT_MIN_Z_FAR, SPOT_LIGHT_MIN_Z_NEAR,
};
use crate::constants::world::BIG_REFERENCE_SIZE;
use crate::error::{InteractionError, InteractionResult};
use crate::geometry::render_matrix::{matrix_row, transform_projected};
use crate::geometry::{
    bounds_size, create_from_origin_axis, frustums_equal, inverse_or_warn, matrix_from_rows,
    polytope_surface, projected_bounds, zero_one_cube, Plane,
};
use crate::world::PortalAreas;
use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3, Vector4};
use std::sync::Arc;

/// Normalize in place, returning the original length. Zero vectors stay zero.
fn normalize_with_length(v: Vector3<f32>) -> (Vector3<f32>, f32) {
    let length = v.magnitude();
    if length > 0.0 {
        (v / length, length)
    } else {
        (v, 0.0)
    }
}

/// Texture projection planes of a spot light.
///
/// `right` and `up` are not expected to be normalized; their lengths set the
/// spread. The target point maps to texture coordinate (0.5, 0.5) and the
/// falloff plane runs from `start` (0) to `end` (1).
pub fn set_light_project(
    origin: Point3<f32>,
    target: Vector3<f32>,
    right_vector: Vector3<f32>,
    up_vector: Vector3<f32>,
    start: Vector3<f32>,
    stop: Vector3<f32>,
) -> [Plane; 4] {
    let (right, r_len) = normalize_with_length(right_vector);
    let (up, u_len) = normalize_with_length(up_vector);
    let (mut normal, _) = normalize_with_length(up.cross(right));

    let mut dist = target.dot(normal);
    if dist < 0.0 {
        dist = -dist;
        normal = -normal;
    }

    let r_len = if r_len > 0.0 { r_len } else { 1.0 };
    let u_len = if u_len > 0.0 { u_len } else { 1.0 };
    let right = right * ((0.5 * dist) / r_len);
    let up = up * (-(0.5 * dist) / u_len);

    let origin_vec = origin.to_vec();
    let p2 = normal.extend(-origin_vec.dot(normal));
    let mut p0 = right.extend(-origin_vec.dot(right));
    let mut p1 = up.extend(-origin_vec.dot(up));

    // offset to center
    let target_global = (target + origin_vec).extend(1.0);
    let q = target_global.dot(p2);
    if q.abs() > 0.0 {
        let ofs = 0.5 - target_global.dot(p0) / q;
        p0 += p2 * ofs;
        let ofs = 0.5 - target_global.dot(p1) / q;
        p1 += p2 * ofs;
    } else {
        log::warn!("[light_operations::set_light_project] Target lies on the projection plane");
    }

    // falloff vector
    let (falloff_dir, mut falloff_dist) = normalize_with_length(stop - start);
    if falloff_dist <= 0.0 {
        log::warn!("[light_operations::set_light_project] Zero length falloff, using unit distance");
        falloff_dist = 1.0;
    }
    let falloff = falloff_dir * (1.0 / falloff_dist);
    let start_global = start + origin_vec;
    let p3 = falloff.extend(-start_global.dot(falloff));

    [
        Plane::from_vec4(p0),
        Plane::from_vec4(p1),
        Plane::from_vec4(p2),
        Plane::from_vec4(p3),
    ]
}

/// Texture projection planes of a box light with half extents `radius`
pub fn point_light_project(radius: Vector3<f32>) -> [Plane; 4] {
    [
        Plane::from_vec4(Vector4::new(0.5 / radius.x, 0.0, 0.0, 0.5)),
        Plane::from_vec4(Vector4::new(0.0, 0.5 / radius.y, 0.0, 0.5)),
        Plane::from_vec4(Vector4::new(0.0, 0.0, 0.0, 1.0)),
        Plane::from_vec4(Vector4::new(0.0, 0.0, 0.5 / radius.z, 0.5)),
    ]
}

/// Outward-facing frustum planes from projection planes.
///
/// The planes are s = 0, t = 0, s = q, t = q, falloff = 0 and falloff = 1,
/// each scaled so its distance term is in world units.
pub fn set_light_frustum(light_project: &[Plane; 4]) -> [Plane; 6] {
    let p = light_project.map(|plane| plane.to_vec4());
    let raw = [
        p[0],
        p[1],
        p[2] - p[0],
        p[2] - p[1],
        p[3],
        -(p[3] - Vector4::new(0.0, 0.0, 0.0, 1.0)),
    ];

    raw.map(|v| (-Plane::from_vec4(v)).to_unit())
}

/// Box projection into the [0, 1] texture cube
pub fn compute_point_light_projection_matrix(radius: Vector3<f32>) -> (Matrix4<f32>, f32) {
    let local_project = matrix_from_rows(
        Vector4::new(0.5 / radius.x, 0.0, 0.0, 0.5),
        Vector4::new(0.0, 0.5 / radius.y, 0.0, 0.5),
        Vector4::new(0.0, 0.0, 0.5 / radius.z, 0.5),
        Vector4::new(0.0, 0.0, 0.0, 1.0),
    );
    (local_project, 1.0)
}

/// Parallel lights project exactly like point lights; only their shadow
/// origin differs
pub fn compute_parallel_light_projection_matrix(radius: Vector3<f32>) -> (Matrix4<f32>, f32) {
    compute_point_light_projection_matrix(radius)
}

/// Perspective projection of a spot light into the [0, 1] texture cube.
///
/// Also returns the reciprocal of the near + far falloff depth.
pub fn compute_spot_light_projection_matrix(spot: &SpotParms) -> (Matrix4<f32>, f32) {
    let mut target_dist_sqr = spot.target.magnitude2();
    let mut target = spot.target;
    if target_dist_sqr <= 0.0 {
        log::warn!("[light_operations::compute_spot_light_projection_matrix] Zero length target, pointing along +z");
        target = Vector3::unit_z();
        target_dist_sqr = 1.0;
    }
    let target_dist = target_dist_sqr.sqrt();

    let right_sqr = nonzero_or_one(spot.right.magnitude2());
    let up_sqr = nonzero_or_one(spot.up.magnitude2());

    let normalized_target = target / target_dist;
    let normalized_right = spot.right * (0.5 * target_dist / right_sqr);
    let normalized_up = spot.up * (-0.5 * target_dist / up_sqr);

    // falloff behaves like a depth buffer, heavily distorted toward the near end
    let z_near = spot.start.dot(normalized_target).max(SPOT_LIGHT_MIN_Z_NEAR);
    let z_far = spot.end.dot(normalized_target).max(SPOT_LIGHT_MIN_Z_FAR);
    let z_scale = (z_near + z_far) / z_far;

    let mut row0 = normalized_right.extend(0.0);
    let mut row1 = normalized_up.extend(0.0);
    let row2 = (normalized_target * z_scale).extend(-z_near * z_scale);
    let row3 = normalized_target.extend(0.0);

    // offset into the 0..1 texture range
    let unshifted = matrix_from_rows(row0, row1, row2, row3);
    let projected_target = unshifted * target.extend(1.0);

    let ofs0 = 0.5 - projected_target.x / projected_target.w;
    row0 += row3 * ofs0;
    let ofs1 = 0.5 - projected_target.y / projected_target.w;
    row1 += row3 * ofs1;

    (matrix_from_rows(row0, row1, row2, row3), 1.0 / (z_near + z_far))
}

fn nonzero_or_one(value: f32) -> f32 {
    if value > 0.0 {
        value
    } else {
        log::warn!("[light_operations] Zero length spot vector, using unit length");
        1.0
    }
}

/// Point shadows are cast from. Parallel lights fake infinity with a point
/// very far along their center direction (straight up when unset).
pub fn compute_global_light_origin(parms: &LightParms) -> Point3<f32> {
    match parms.kind {
        LightKind::Parallel { center, .. } => {
            let (dir, length) = normalize_with_length(center);
            let dir = if length > 0.0 { dir } else { Vector3::unit_z() };
            parms.origin + dir * PARALLEL_LIGHT_DISTANCE
        }
        LightKind::Point { center, .. } => parms.origin + parms.axis * center,
        LightKind::Spot(_) => parms.origin,
    }
}

/// Fill in everything derived from `light.parms`.
///
/// The polytope is only rebuilt when it is missing or the frustum planes
/// changed, so re-deriving an unchanged light keeps the same mesh.
pub fn derive_light_data(light: &mut LightDef) {
    let parms = &light.parms;

    let local_project = match &parms.kind {
        LightKind::Spot(spot) => set_light_project(
            Point3::origin(),
            spot.target,
            spot.right,
            spot.up,
            spot.start,
            spot.end,
        ),
        LightKind::Point { radius, .. } | LightKind::Parallel { radius, .. } => {
            point_light_project(*radius)
        }
    };
    let local_frustum = set_light_frustum(&local_project);

    let model_matrix = create_from_origin_axis(parms.origin, &parms.axis);
    light.model_matrix = model_matrix;
    light.frustum = local_frustum.map(|plane| plane.local_to_global(&model_matrix));
    light.light_project = local_project.map(|plane| plane.local_to_global(&model_matrix));

    light.global_light_origin = compute_global_light_origin(&light.parms);

    let rebuild = match &light.frustum_tris {
        None => true,
        Some(_) => !frustums_equal(&light.previous_frustum, &light.frustum),
    };
    if rebuild {
        light.frustum_tris = Some(Arc::new(polytope_surface(&light.frustum)));
        light.previous_frustum = light.frustum;
        log::debug!(
            "[light_operations::derive_light_data] Rebuilt polytope for light {}",
            light.handle.0
        );
    }

    let (local_render_project, falloff_scale) = match &light.parms.kind {
        LightKind::Parallel { radius, .. } => compute_parallel_light_projection_matrix(*radius),
        LightKind::Point { radius, .. } => compute_point_light_projection_matrix(*radius),
        LightKind::Spot(spot) => compute_spot_light_projection_matrix(spot),
    };
    light.falloff_scale = falloff_scale;

    let inverse_light_matrix = inverse_or_warn(&model_matrix, "lightMatrix");

    // global space -> light local space -> light projective space
    light.base_light_project = local_render_project * inverse_light_matrix;
    light.inverse_base_light_project =
        inverse_or_warn(&light.base_light_project, "baseLightProject");

    light.global_light_bounds =
        projected_bounds(&light.inverse_base_light_project, &zero_one_cube());
}

/// Validate the light volume and place the light in the area graph.
///
/// The origin area uses the global light origin first and falls back to the
/// raw origin when that lies outside every area. Bumps `view_count`.
pub fn create_light_refs(
    light: &mut LightDef,
    areas: &dyn PortalAreas,
    show_updates: bool,
    view_count: &mut u64,
) -> InteractionResult<()> {
    let Some(tris) = light.frustum_tris.as_ref() else {
        log::error!(
            "[light_operations::create_light_refs] Light {} has no derived volume",
            light.handle.0
        );
        return Err(InteractionError::MissingLightDef(light.handle));
    };

    // six planes can never produce a stupid number of points
    if tris.num_verts() > MAX_LIGHT_VERTS {
        log::error!(
            "[light_operations::create_light_refs] {} points in light volume",
            tris.num_verts()
        );
        return Err(InteractionError::TooManyLightVerts {
            count: tris.num_verts(),
            max: MAX_LIGHT_VERTS,
        });
    }

    let size = bounds_size(&tris.bounds);
    if show_updates && (size.x > BIG_REFERENCE_SIZE || size.y > BIG_REFERENCE_SIZE) {
        log::warn!(
            "[light_operations::create_light_refs] big lightRef: {},{}",
            size.x,
            size.y
        );
    }

    light.area_num = areas
        .point_in_area(light.global_light_origin)
        .or_else(|| areas.point_in_area(light.parms.origin));
    light.areas = areas.areas_for_bounds(&tris.bounds);

    *view_count += 1;
    Ok(())
}

/// Frustum planes of a light that is not part of any world
pub fn render_light_frustum(parms: &LightParms) -> [Plane; 6] {
    let mut scratch = LightDef::new(LightHandle(u32::MAX), parms.clone());
    derive_light_data(&mut scratch);
    scratch.frustum
}

/// Pack the world space projection for the GPU
pub fn light_projection_uniform(light: &LightDef) -> LightProjectionUniform {
    let origin = light.global_light_origin;
    LightProjectionUniform {
        project: light.light_project.map(|plane| plane.to_vec4().into()),
        global_light_origin: [origin.x, origin.y, origin.z, light.falloff_scale],
    }
}

/// Texture coordinates of a world point under the render projection.
/// Inside the light volume all three lie in [0, 1].
pub fn project_to_light_texture(light: &LightDef, point: Point3<f32>) -> Point3<f32> {
    transform_projected(&light.base_light_project, point)
}

/// Row `i` of the render projection, as a plane
pub fn base_projection_row(light: &LightDef, i: usize) -> Vector4<f32> {
    matrix_row(&light.base_light_project, i)
}
