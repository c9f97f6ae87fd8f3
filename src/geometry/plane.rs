//! Plane equations
//!
//! A plane stores `normal` and `dist` such that the signed distance of a point
//! is `normal . p + dist`. Light frusta use the outward convention: a point is
//! inside the volume when its distance to every plane is `<= 0`.

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, Point3, Vector3, Vector4, EuclideanSpace};
use std::ops::Neg;

/// Infinite plane in Hessian form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f32>,
    pub dist: f32,
}

/// Which side of a plane something lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    Front,
    Back,
    Cross,
}

impl Plane {
    pub fn new(normal: Vector3<f32>, dist: f32) -> Self {
        Self { normal, dist }
    }

    /// Build from `(a, b, c, d)` coefficients
    pub fn from_vec4(v: Vector4<f32>) -> Self {
        Self {
            normal: v.truncate(),
            dist: v.w,
        }
    }

    pub fn to_vec4(&self) -> Vector4<f32> {
        self.normal.extend(self.dist)
    }

    /// Plane through `point` facing `normal`
    pub fn from_point_normal(point: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self {
            normal,
            dist: -normal.dot(point.to_vec()),
        }
    }

    /// Signed distance of a point
    pub fn distance(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(point.to_vec()) + self.dist
    }

    /// Scale all four coefficients so the normal has unit length.
    ///
    /// The distance term is divided by the same factor, so it ends up in true
    /// world units. A degenerate normal is left untouched.
    pub fn to_unit(self) -> Self {
        let length = self.normal.magnitude();
        if length > 0.0 {
            Self {
                normal: self.normal / length,
                dist: self.dist / length,
            }
        } else {
            log::warn!("[Plane::to_unit] Degenerate plane normal, leaving unnormalized");
            self
        }
    }

    /// Transform a plane expressed in the space of `model_matrix` into the
    /// space the matrix maps to. The matrix must be a rigid transform.
    pub fn local_to_global(&self, model_matrix: &Matrix4<f32>) -> Self {
        let rotation = rotation_part(model_matrix);
        let translation = model_matrix.w.truncate();
        let normal = rotation * self.normal;
        Self {
            normal,
            dist: self.dist - translation.dot(normal),
        }
    }

    /// Inverse of [`Plane::local_to_global`]
    pub fn global_to_local(&self, model_matrix: &Matrix4<f32>) -> Self {
        let rotation = rotation_part(model_matrix);
        let translation = model_matrix.w.truncate();
        Self {
            normal: rotation.transpose() * self.normal,
            dist: self.dist + self.normal.dot(translation),
        }
    }
}

impl Neg for Plane {
    type Output = Plane;

    fn neg(self) -> Plane {
        Plane {
            normal: -self.normal,
            dist: -self.dist,
        }
    }
}

/// Upper-left 3x3 of a column-major affine matrix
pub fn rotation_part(m: &Matrix4<f32>) -> Matrix3<f32> {
    Matrix3::from_cols(m.x.truncate(), m.y.truncate(), m.z.truncate())
}

/// Exact comparison of two six-plane sets
pub fn frustums_equal(a: &[Plane; 6], b: &[Plane; 6]) -> bool {
    a.iter().zip(b.iter()).all(|(pa, pb)| pa == pb)
}
