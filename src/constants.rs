//! Engine-wide constants for the interaction subsystem
//!
//! Grouped by concern the same way the rest of the engine keeps its limits in
//! one place instead of sprinkling literals through the operations modules.

/// World extents
pub mod world {
    /// Largest absolute coordinate a map may use
    pub const MAX_WORLD_COORD: f32 = 128.0 * 1024.0;

    /// Edge length of the world cube; also the extrusion length for
    /// interaction volumes and the half size of base windings.
    pub const MAX_WORLD_SIZE: f32 = 2.0 * MAX_WORLD_COORD;

    /// References wider than this are reported when `show_updates` is on
    pub const BIG_REFERENCE_SIZE: f32 = 1024.0;
}

/// Light derivation limits
pub mod light {
    /// Spot lights never get a near plane closer than this
    pub const SPOT_LIGHT_MIN_Z_NEAR: f32 = 8.0;

    /// Spot lights never get a far plane closer than this
    pub const SPOT_LIGHT_MIN_Z_FAR: f32 = 16.0;

    /// Parallel lights are faked as a point light this far away
    pub const PARALLEL_LIGHT_DISTANCE: f32 = 100_000.0;

    /// Six planes can never produce more polytope vertices than this
    pub const MAX_LIGHT_VERTS: usize = 40;
}

/// Clipping tolerances
pub mod clip {
    /// Slop used when classifying vertices against light planes.
    /// Anything closer than this to the plane is treated as behind it.
    pub const LIGHT_CLIP_EPSILON: f32 = 0.1;

    /// Plane side tolerance for polytope winding clipping
    pub const ON_EPSILON: f32 = 0.1;

    /// Capacity of each ping-pong buffer when chopping a triangle
    pub const MAX_CLIPPED_POINTS: usize = 20;

    /// Reciprocal w below which a projected corner is rejected
    pub const PROJECTION_W_EPSILON: f32 = 1e-6;
}

/// Light channel assignments
pub mod channels {
    /// Channel every entity sits on unless told otherwise
    pub const LIGHT_CHANNEL_DEFAULT: u32 = 0;

    /// World meshes are implicitly added to this channel
    pub const LIGHT_CHANNEL_WORLD: u32 = 2;

    /// Channel masks are 64 bits wide
    pub const MAX_LIGHT_CHANNELS: u32 = 64;

    /// Mask used by entities that never set one explicitly
    pub const DEFAULT_CHANNEL_MASK: u64 = 1 << LIGHT_CHANNEL_DEFAULT;
}

/// Vertex cache element sizes, in bytes
pub mod cache {
    /// Full ambient vertex: position, texcoord, normal, tangents, color
    pub const AMBIENT_VERTEX_BYTES: usize = 32;

    /// Per-light vertex data for cards without vertex programs
    pub const LIGHTING_VERTEX_BYTES: usize = 16;

    /// One triangle index
    pub const INDEX_BYTES: usize = 4;
}
