//! Geometry Module
//!
//! Pure geometric helpers shared by light derivation and interaction
//! culling. Nothing in here owns graph state.

pub mod bounds;
pub mod clip;
pub mod plane;
pub mod polytope;
pub mod render_matrix;
pub mod screen_rect;
pub mod view_frustum;
pub mod winding;

pub use bounds::{
    bounds_add_point, bounds_center, bounds_contains_point, bounds_corners, bounds_expanded,
    bounds_from_points, bounds_intersection, bounds_intersects, bounds_is_cleared,
    bounds_plane_distance, bounds_plane_side, bounds_size, bounds_transformed, bounds_translated,
    cleared_bounds, create_bounds, Bounds,
};
pub use clip::{
    chop_winding, clip_triangle_to_light, cull_local_box, potentially_inside_infinite_shadow,
    winding_completely_inside_light, ClipTri,
};
pub use plane::{frustums_equal, Plane, PlaneSide};
pub use polytope::{polytope_surface, PolytopeMesh};
pub use render_matrix::{
    create_from_origin_axis, global_point_to_local, inverse_or_warn, local_point_to_global,
    matrix_from_rows, projected_bounds, zero_one_cube,
};
pub use screen_rect::ScreenRect;
pub use view_frustum::ViewFrustum;
pub use winding::Winding;
