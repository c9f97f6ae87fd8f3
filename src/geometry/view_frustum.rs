//! View frustum planes
//!
//! Extracted from a view-projection matrix with the Gribb-Hartmann method,
//! then flipped to the outward convention shared with light volumes.

use super::bounds::{bounds_plane_distance, Bounds};
use super::plane::Plane;
use cgmath::{Matrix4, Point3, Vector4};

/// Six outward-facing planes: left, right, top, bottom, near, far
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewFrustum {
    pub planes: [Plane; 6],
}

impl ViewFrustum {
    pub fn from_view_proj(view_proj: &Matrix4<f32>) -> Self {
        let inward = extract_frustum_planes(view_proj);
        Self {
            planes: inward.map(|v| (-Plane::from_vec4(v)).to_unit()),
        }
    }

    /// True when the bounds are completely outside at least one plane
    pub fn cull_bounds(&self, bounds: &Bounds) -> bool {
        bounds_outside_planes(bounds, &self.planes)
    }

    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        self.planes.iter().all(|plane| plane.distance(point) <= 0.0)
    }
}

/// True when the bounds lie entirely in front of any outward plane
pub fn bounds_outside_planes(bounds: &Bounds, planes: &[Plane]) -> bool {
    planes
        .iter()
        .any(|plane| bounds_plane_distance(bounds, plane) > 0.0)
}

/// Extract inward-facing frustum planes from a view-projection matrix
fn extract_frustum_planes(vp: &Matrix4<f32>) -> [Vector4<f32>; 6] {
    let m = vp;

    [
        // Left plane
        Vector4::new(m.x.w + m.x.x, m.y.w + m.y.x, m.z.w + m.z.x, m.w.w + m.w.x),
        // Right plane
        Vector4::new(m.x.w - m.x.x, m.y.w - m.y.x, m.z.w - m.z.x, m.w.w - m.w.x),
        // Top plane
        Vector4::new(m.x.w - m.x.y, m.y.w - m.y.y, m.z.w - m.z.y, m.w.w - m.w.y),
        // Bottom plane
        Vector4::new(m.x.w + m.x.y, m.y.w + m.y.y, m.z.w + m.z.y, m.w.w + m.w.y),
        // Near plane
        Vector4::new(m.x.w + m.x.z, m.y.w + m.y.z, m.z.w + m.z.z, m.w.w + m.w.z),
        // Far plane
        Vector4::new(m.x.w - m.x.z, m.y.w - m.y.z, m.z.w - m.z.z, m.w.w - m.w.z),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::bounds::create_bounds;
    use cgmath::{perspective, Deg, Vector3};

    fn looking_down_x() -> ViewFrustum {
        let view = Matrix4::look_at_rh(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Vector3::unit_z(),
        );
        let proj = perspective(Deg(90.0), 1.0, 1.0, 1000.0);
        ViewFrustum::from_view_proj(&(proj * view))
    }

    #[test]
    fn test_points_in_front_are_inside() {
        let frustum = looking_down_x();
        assert!(frustum.contains_point(Point3::new(100.0, 0.0, 0.0)));
        assert!(!frustum.contains_point(Point3::new(-100.0, 0.0, 0.0)));
        assert!(!frustum.contains_point(Point3::new(5000.0, 0.0, 0.0)));
    }

    #[test]
    fn test_bounds_behind_view_are_culled() {
        let frustum = looking_down_x();
        let behind = create_bounds(Point3::new(-60.0, -5.0, -5.0), Point3::new(-50.0, 5.0, 5.0));
        let ahead = create_bounds(Point3::new(50.0, -5.0, -5.0), Point3::new(60.0, 5.0, 5.0));
        assert!(frustum.cull_bounds(&behind));
        assert!(!frustum.cull_bounds(&ahead));
    }
}
