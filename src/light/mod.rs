//! Light Module
//!
//! Light definitions and the derivation of their volumes and projections.

pub mod light_data;
pub mod light_operations;

pub use light_data::{
    LightDef, LightHandle, LightKind, LightParms, LightProjectionUniform, SpotParms,
};
pub use light_operations::{
    compute_global_light_origin, compute_parallel_light_projection_matrix,
    compute_point_light_projection_matrix, compute_spot_light_projection_matrix,
    create_light_refs, derive_light_data, light_projection_uniform, point_light_project,
    project_to_light_texture, render_light_frustum, set_light_frustum, set_light_project,
};
