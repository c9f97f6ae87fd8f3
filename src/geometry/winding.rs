//! Convex polygon windings
//!
//! Used to build light polytopes: each frustum plane starts as a huge quad
//! that the other planes clip down to one face of the volume.

use super::plane::Plane;
use crate::constants::world::MAX_WORLD_SIZE;
use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};

/// Convex polygon, counter-clockwise around its plane normal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Winding {
    pub points: Vec<Point3<f32>>,
}

impl Winding {
    pub fn new(points: Vec<Point3<f32>>) -> Self {
        Self { points }
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A quad lying in `plane`, large enough to cover the whole world
    pub fn base_for_plane(plane: &Plane) -> Self {
        let normal = plane.normal;

        // pick the axis least aligned with the normal as the up reference
        let ax = normal.x.abs();
        let ay = normal.y.abs();
        let az = normal.z.abs();
        let reference = if az >= ax && az >= ay {
            Vector3::unit_x()
        } else {
            Vector3::unit_z()
        };

        let up = (reference - normal * reference.dot(normal)).normalize();
        let right = up.cross(normal);

        let org = Point3::from_vec(normal * -plane.dist);
        let up = up * MAX_WORLD_SIZE;
        let right = right * MAX_WORLD_SIZE;

        Self {
            points: vec![
                org - right - up,
                org + right - up,
                org + right + up,
                org - right + up,
            ],
        }
    }

    /// Keep the part of the winding on the front side of `plane`.
    ///
    /// Points within `epsilon` of the plane count as on it and are kept.
    /// Returns false when nothing is left.
    pub fn clip_in_place(&mut self, plane: &Plane, epsilon: f32) -> bool {
        #[derive(Clone, Copy, PartialEq)]
        enum Side {
            Front,
            Back,
            On,
        }

        let count = self.points.len();
        if count == 0 {
            return false;
        }

        let mut dists = Vec::with_capacity(count);
        let mut sides = Vec::with_capacity(count);
        let mut front = 0;
        let mut back = 0;

        for point in &self.points {
            let dist = plane.distance(*point);
            let side = if dist > epsilon {
                front += 1;
                Side::Front
            } else if dist < -epsilon {
                back += 1;
                Side::Back
            } else {
                Side::On
            };
            dists.push(dist);
            sides.push(side);
        }

        if back == 0 {
            return true;
        }
        if front == 0 {
            self.points.clear();
            return false;
        }

        let mut clipped = Vec::with_capacity(count + 4);
        for i in 0..count {
            let p1 = self.points[i];
            let next = (i + 1) % count;

            if sides[i] == Side::On {
                clipped.push(p1);
                continue;
            }
            if sides[i] == Side::Front {
                clipped.push(p1);
            }
            if sides[next] == Side::On || sides[next] == sides[i] {
                continue;
            }

            let p2 = self.points[next];
            let frac = dists[i] / (dists[i] - dists[next]);
            clipped.push(p1 + (p2 - p1) * frac);
        }

        self.points = clipped;
        self.points.len() >= 3
    }
}
