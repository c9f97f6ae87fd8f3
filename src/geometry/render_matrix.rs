//! Render matrix helpers
//!
//! Light projections are authored row by row (each row is the plane that
//! produces one homogeneous texture coordinate), so these helpers build
//! cgmath's column-major matrices from rows and back.

use super::bounds::{bounds_add_point, bounds_corners, cleared_bounds, create_bounds, Bounds};
use crate::constants::clip::PROJECTION_W_EPSILON;
use cgmath::{EuclideanSpace, Matrix, Matrix3, Matrix4, Point3, SquareMatrix, Vector4};

/// Build a matrix whose rows are the given vectors
pub fn matrix_from_rows(
    r0: Vector4<f32>,
    r1: Vector4<f32>,
    r2: Vector4<f32>,
    r3: Vector4<f32>,
) -> Matrix4<f32> {
    Matrix4::from_cols(r0, r1, r2, r3).transpose()
}

/// Model matrix from an origin and an axis whose columns are the basis vectors
pub fn create_from_origin_axis(origin: Point3<f32>, axis: &Matrix3<f32>) -> Matrix4<f32> {
    Matrix4::from_translation(origin.to_vec()) * Matrix4::from(*axis)
}

/// Invert a matrix, warning and falling back to identity when it is singular
pub fn inverse_or_warn(matrix: &Matrix4<f32>, label: &str) -> Matrix4<f32> {
    match matrix.invert() {
        Some(inverse) => inverse,
        None => {
            log::warn!("[render_matrix::inverse_or_warn] {} invert failed", label);
            Matrix4::identity()
        }
    }
}

/// The [0, 1] cube that light projections map their volume into
pub fn zero_one_cube() -> Bounds {
    create_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
}

/// Apply a full projective transform to a point, dividing by w.
///
/// A w too close to zero is clamped (keeping its sign) so the result stays
/// finite; the caller gets a far-away point instead of infinity.
pub fn transform_projected(matrix: &Matrix4<f32>, point: Point3<f32>) -> Point3<f32> {
    let p = matrix * point.to_homogeneous();
    let w = if p.w.abs() < PROJECTION_W_EPSILON {
        PROJECTION_W_EPSILON.copysign(p.w)
    } else {
        p.w
    };
    Point3::new(p.x / w, p.y / w, p.z / w)
}

/// Bounds of a box after a projective transform of its eight corners
pub fn projected_bounds(matrix: &Matrix4<f32>, bounds: &Bounds) -> Bounds {
    let mut projected = cleared_bounds();
    for corner in bounds_corners(bounds) {
        bounds_add_point(&mut projected, transform_projected(matrix, corner));
    }
    projected
}

/// Move a world-space point into the space of `model_matrix`
pub fn global_point_to_local(model_matrix: &Matrix4<f32>, point: Point3<f32>) -> Point3<f32> {
    let offset = point - Point3::from_vec(model_matrix.w.truncate());
    let axis = super::plane::rotation_part(model_matrix);
    Point3::from_vec(axis.transpose() * offset)
}

/// Move a point in the space of `model_matrix` into world space
pub fn local_point_to_global(model_matrix: &Matrix4<f32>, point: Point3<f32>) -> Point3<f32> {
    Point3::from_homogeneous(model_matrix * point.to_homogeneous())
}

/// Row `i` of a matrix as a plane-style 4-vector
pub fn matrix_row(matrix: &Matrix4<f32>, i: usize) -> Vector4<f32> {
    matrix.row(i)
}
