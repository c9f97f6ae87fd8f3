// lightgraph - Light/entity interaction graph (Data-Oriented Programming)
//
// Light and entity defs live in index-stable arrays per world. The
// interactions between them are records in a generational arena, indexed by
// intrusive per-light and per-entity lists and an optional dense table.
// Surfaces are built lazily, the first time a view needs them.
//
// For new code, prefer:
// - world::{add_light_def, add_entity_def, update_*, free_*} for scene changes
// - view::render_view to resolve a view into draw interactions
// - Pure functions in *_operations modules over methods

// Constants module
pub mod constants;

// Core modules
pub mod config;
pub mod error;

// Math and external interfaces
pub mod cache;
pub mod geometry;
pub mod model;

// Defs and the graph between them
pub mod entity;
pub mod interaction;
pub mod light;
pub mod world;

// Per-view resolution and system-wide control
pub mod render_system;
pub mod stats;
pub mod view;

pub use cache::{CacheHandle, FrameVertexCache, VertexCacheManager};
pub use config::InteractionConfig;
pub use entity::{EntityDef, EntityHandle, EntityParms};
pub use error::{InteractionError, InteractionResult, OptionExt};
pub use interaction::{Interaction, InteractionId, InteractionPool, InteractionState};
pub use light::{LightDef, LightHandle, LightKind, LightParms};
pub use model::{Material, RenderModel, StaticModel};
pub use render_system::RenderSystem;
pub use stats::InteractionMemoryReport;
pub use view::{DrawInteraction, ViewDef};
pub use world::{BoxAreas, PortalAreas, RenderWorld, SingleArea};
