//! Light Data - Pure Data Structures
//!
//! Raw light parameters as supplied by the scene layer plus everything
//! derived from them. No methods beyond constructors; see
//! `light_operations` for the transformations.

use crate::geometry::{cleared_bounds, Bounds, Plane, PolytopeMesh};
use crate::interaction::ListHead;
use bytemuck::{Pod, Zeroable};
use cgmath::{Matrix3, Matrix4, Point3, SquareMatrix, Vector3};
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;
use std::sync::Arc;

/// Index-stable handle of a light def within its world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LightHandle(pub u32);

impl LightHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Projection parameters of a spot light, all relative to the light origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotParms {
    pub target: Vector3<f32>,
    /// Not normalized; its length sets the horizontal spread
    pub right: Vector3<f32>,
    /// Not normalized; its length sets the vertical spread
    pub up: Vector3<f32>,
    pub start: Vector3<f32>,
    pub end: Vector3<f32>,
}

/// Light kinds and their projection payloads
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Box of half extents `radius` around the origin
    Point {
        radius: Vector3<f32>,
        /// Offset of the shadow-casting origin from the light origin
        center: Vector3<f32>,
    },
    /// Box light whose shadows come from a very distant point along `center`
    Parallel {
        radius: Vector3<f32>,
        center: Vector3<f32>,
    },
    /// Projected frustum light
    Spot(SpotParms),
}

/// Light parameters as supplied by the scene layer
#[derive(Debug, Clone, PartialEq)]
pub struct LightParms {
    pub kind: LightKind,
    pub origin: Point3<f32>,
    /// Columns are the light's basis vectors
    pub axis: Matrix3<f32>,
    pub no_shadows: bool,
    /// Nonzero id entities can suppress their shadows for
    pub light_id: u32,
    /// Channel index; only entities with this bit set are lit
    pub light_channel: u32,
}

impl LightParms {
    /// Axis-aligned point light
    pub fn point(origin: Point3<f32>, radius: f32) -> Self {
        Self {
            kind: LightKind::Point {
                radius: Vector3::new(radius, radius, radius),
                center: Vector3::new(0.0, 0.0, 0.0),
            },
            origin,
            axis: Matrix3::identity(),
            no_shadows: false,
            light_id: 0,
            light_channel: crate::constants::channels::LIGHT_CHANNEL_DEFAULT,
        }
    }

    /// Spot light with the given projection vectors
    pub fn spot(origin: Point3<f32>, spot: SpotParms) -> Self {
        Self {
            kind: LightKind::Spot(spot),
            ..Self::point(origin, 1.0)
        }
    }
}

/// Light def as stored in a world
#[derive(Debug, Clone)]
pub struct LightDef {
    pub handle: LightHandle,
    pub parms: LightParms,

    /// Light origin and axis as a matrix
    pub model_matrix: Matrix4<f32>,

    /// Texture coordinate planes s, t, q and falloff, in world space
    pub light_project: [Plane; 4],

    /// Outward-facing world space planes bounding the light
    pub frustum: [Plane; 6],

    /// Plane set the current polytope was built from
    pub previous_frustum: [Plane; 6],

    /// Explicit mesh of the light volume
    pub frustum_tris: Option<Arc<PolytopeMesh>>,

    /// World space -> light projective space
    pub base_light_project: Matrix4<f32>,
    pub inverse_base_light_project: Matrix4<f32>,

    /// Reciprocal of the projected falloff depth range
    pub falloff_scale: f32,

    /// Point shadows are cast from; far away for parallel lights
    pub global_light_origin: Point3<f32>,
    pub global_light_bounds: Bounds,

    /// Area holding the light origin, if any
    pub area_num: Option<usize>,
    /// Areas the light volume touches
    pub areas: Vec<usize>,

    pub interactions: ListHead,
}

impl LightDef {
    /// Fresh def with nothing derived yet
    pub fn new(handle: LightHandle, parms: LightParms) -> Self {
        let zero_plane = Plane::new(Vector3::new(0.0, 0.0, 0.0), 0.0);
        let global_light_origin = parms.origin;
        Self {
            handle,
            parms,
            model_matrix: Matrix4::identity(),
            light_project: [zero_plane; 4],
            frustum: [zero_plane; 6],
            previous_frustum: [zero_plane; 6],
            frustum_tris: None,
            base_light_project: Matrix4::identity(),
            inverse_base_light_project: Matrix4::identity(),
            falloff_scale: 1.0,
            global_light_origin,
            global_light_bounds: cleared_bounds(),
            area_num: None,
            areas: Vec::new(),
            interactions: ListHead::default(),
        }
    }
}

/// Light projection packed for upload to a uniform buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightProjectionUniform {
    /// s, t, q and falloff planes
    pub project: [[f32; 4]; 4],
    /// xyz = global light origin, w = falloff scale
    pub global_light_origin: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<LightProjectionUniform>(), 80);
