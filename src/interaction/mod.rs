//! Interaction Module
//!
//! The light/entity interaction graph. Every interaction record is owned by
//! the `InteractionPool` arena and addressed by a generation-checked
//! `InteractionId`; the light's list, the entity's list and the optional
//! dense table are only indexes into it.

pub mod active_operations;
pub mod cull_info;
pub mod interaction_data;
pub mod interaction_operations;
pub mod interaction_pool;
pub mod interaction_table;

#[cfg(test)]
mod tests;

pub use active_operations::{add_active_interaction, ActiveFrame, ActiveOutcome};
pub use cull_info::{calc_interaction_cull_bits, create_light_tris, CullBits, SurfaceCullInfo};
pub use interaction_data::{
    FrustumState, Interaction, InteractionId, InteractionState, InteractionStats, ListHead,
    ListKind, ListLinks, SurfaceInteraction,
};
pub use interaction_operations::{
    alloc_and_link, calc_interaction_scissor_rectangle, create_interaction,
    cull_interaction_by_view_frustum, free_surfaces, has_light_channel, has_shadows,
    interaction_memory_used, list_ids, make_empty, unlink, unlink_and_free,
};
pub use interaction_pool::InteractionPool;
pub use interaction_table::InteractionTable;
