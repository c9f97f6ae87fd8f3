/// Axis-Aligned Bounds
///
/// Pure functions over a min/max pair - no methods, just data transformations.
/// A "cleared" bounds has inverted extents and absorbs the first point added.

use super::plane::{Plane, PlaneSide};
use cgmath::{EuclideanSpace, Matrix4, Point3, Vector3};

/// Axis-aligned bounding box - pure data structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Default for Bounds {
    fn default() -> Self {
        cleared_bounds()
    }
}

/// Create bounds from min/max points
pub fn create_bounds(min: Point3<f32>, max: Point3<f32>) -> Bounds {
    Bounds { min, max }
}

/// Empty bounds that any added point will replace
pub fn cleared_bounds() -> Bounds {
    Bounds {
        min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
    }
}

/// True when nothing has been added yet (or the bounds were inverted)
pub fn bounds_is_cleared(bounds: &Bounds) -> bool {
    bounds.min.x > bounds.max.x || bounds.min.y > bounds.max.y || bounds.min.z > bounds.max.z
}

/// Grow bounds to include a point
pub fn bounds_add_point(bounds: &mut Bounds, point: Point3<f32>) {
    bounds.min.x = bounds.min.x.min(point.x);
    bounds.min.y = bounds.min.y.min(point.y);
    bounds.min.z = bounds.min.z.min(point.z);
    bounds.max.x = bounds.max.x.max(point.x);
    bounds.max.y = bounds.max.y.max(point.y);
    bounds.max.z = bounds.max.z.max(point.z);
}

/// Bounds enclosing a set of points; cleared if the set is empty
pub fn bounds_from_points<I: IntoIterator<Item = Point3<f32>>>(points: I) -> Bounds {
    let mut bounds = cleared_bounds();
    for point in points {
        bounds_add_point(&mut bounds, point);
    }
    bounds
}

/// Center point of bounds
pub fn bounds_center(bounds: &Bounds) -> Point3<f32> {
    Point3::new(
        (bounds.min.x + bounds.max.x) * 0.5,
        (bounds.min.y + bounds.max.y) * 0.5,
        (bounds.min.z + bounds.max.z) * 0.5,
    )
}

/// Half extents of bounds
pub fn bounds_half_extents(bounds: &Bounds) -> Vector3<f32> {
    (bounds.max - bounds.min) * 0.5
}

/// Full size along each axis
pub fn bounds_size(bounds: &Bounds) -> Vector3<f32> {
    bounds.max - bounds.min
}

/// Test if two bounds intersect (touching counts)
pub fn bounds_intersects(a: &Bounds, b: &Bounds) -> bool {
    a.min.x <= b.max.x && a.max.x >= b.min.x &&
    a.min.y <= b.max.y && a.max.y >= b.min.y &&
    a.min.z <= b.max.z && a.max.z >= b.min.z
}

/// Intersection of two bounds; cleared if they do not overlap
pub fn bounds_intersection(a: &Bounds, b: &Bounds) -> Bounds {
    Bounds {
        min: Point3::new(a.min.x.max(b.min.x), a.min.y.max(b.min.y), a.min.z.max(b.min.z)),
        max: Point3::new(a.max.x.min(b.max.x), a.max.y.min(b.max.y), a.max.z.min(b.max.z)),
    }
}

/// Test if bounds contain a point
pub fn bounds_contains_point(bounds: &Bounds, point: Point3<f32>) -> bool {
    point.x >= bounds.min.x && point.x <= bounds.max.x &&
    point.y >= bounds.min.y && point.y <= bounds.max.y &&
    point.z >= bounds.min.z && point.z <= bounds.max.z
}

/// Create translated copy of bounds
pub fn bounds_translated(bounds: &Bounds, offset: Vector3<f32>) -> Bounds {
    Bounds {
        min: bounds.min + offset,
        max: bounds.max + offset,
    }
}

/// Copy of bounds grown by `amount` on every side
pub fn bounds_expanded(bounds: &Bounds, amount: f32) -> Bounds {
    let grow = Vector3::new(amount, amount, amount);
    Bounds {
        min: bounds.min - grow,
        max: bounds.max + grow,
    }
}

/// The eight corners, ordered so bit 0/1/2 of the index selects max on x/y/z
pub fn bounds_corners(bounds: &Bounds) -> [Point3<f32>; 8] {
    let mut corners = [Point3::origin(); 8];
    for (i, corner) in corners.iter_mut().enumerate() {
        *corner = Point3::new(
            if i & 1 == 0 { bounds.min.x } else { bounds.max.x },
            if (i >> 1) & 1 == 0 { bounds.min.y } else { bounds.max.y },
            if (i >> 2) & 1 == 0 { bounds.min.z } else { bounds.max.z },
        );
    }
    corners
}

/// World-space axis-aligned bounds of a box transformed by a rigid matrix
pub fn bounds_transformed(bounds: &Bounds, model_matrix: &Matrix4<f32>) -> Bounds {
    bounds_from_points(
        bounds_corners(bounds)
            .iter()
            .map(|corner| Point3::from_homogeneous(model_matrix * corner.to_homogeneous())),
    )
}

/// Signed distance from bounds to a plane; zero when the plane crosses them
pub fn bounds_plane_distance(bounds: &Bounds, plane: &Plane) -> f32 {
    let center = bounds_center(bounds);
    let extents = bounds_half_extents(bounds);

    let d1 = plane.distance(center);
    let d2 = (extents.x * plane.normal.x).abs()
        + (extents.y * plane.normal.y).abs()
        + (extents.z * plane.normal.z).abs();

    if d1 - d2 > 0.0 {
        d1 - d2
    } else if d1 + d2 < 0.0 {
        d1 + d2
    } else {
        0.0
    }
}

/// Classify bounds against a plane with an epsilon band
pub fn bounds_plane_side(bounds: &Bounds, plane: &Plane, epsilon: f32) -> PlaneSide {
    let center = bounds_center(bounds);
    let extents = bounds_half_extents(bounds);

    let d1 = plane.distance(center);
    let d2 = (extents.x * plane.normal.x).abs()
        + (extents.y * plane.normal.y).abs()
        + (extents.z * plane.normal.z).abs();

    if d1 - d2 > epsilon {
        PlaneSide::Front
    } else if d1 + d2 < -epsilon {
        PlaneSide::Back
    } else {
        PlaneSide::Cross
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Matrix3, Rad};

    fn unit_box() -> Bounds {
        create_bounds(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_cleared_bounds_absorb_first_point() {
        let mut bounds = cleared_bounds();
        assert!(bounds_is_cleared(&bounds));
        bounds_add_point(&mut bounds, Point3::new(2.0, 3.0, 4.0));
        assert!(!bounds_is_cleared(&bounds));
        assert_eq!(bounds.min, bounds.max);
    }

    #[test]
    fn test_intersection_of_disjoint_bounds_is_cleared() {
        let a = unit_box();
        let b = bounds_translated(&a, Vector3::new(5.0, 0.0, 0.0));
        assert!(!bounds_intersects(&a, &b));
        assert!(bounds_is_cleared(&bounds_intersection(&a, &b)));
    }

    #[test]
    fn test_plane_distance_and_side() {
        let plane = Plane::new(Vector3::unit_x(), -3.0);
        let bounds = unit_box();
        assert!((bounds_plane_distance(&bounds, &plane) + 2.0).abs() < 1e-6);
        assert_eq!(bounds_plane_side(&bounds, &plane, 0.1), PlaneSide::Back);

        let crossing = Plane::new(Vector3::unit_x(), 0.0);
        assert_eq!(bounds_plane_distance(&bounds, &crossing), 0.0);
        assert_eq!(bounds_plane_side(&bounds, &crossing, 0.1), PlaneSide::Cross);
    }

    #[test]
    fn test_rotated_bounds_grow() {
        let axis = Matrix3::from_angle_z(Rad::from(Deg(45.0)));
        let model = Matrix4::from(axis);
        let rotated = bounds_transformed(&unit_box(), &model);
        let expected = 2.0_f32.sqrt();
        assert!((rotated.max.x - expected).abs() < 1e-4);
        assert!((rotated.max.z - 1.0).abs() < 1e-4);
    }
}
