//! View Module
//!
//! A view is one rendered camera position. It collects the lights and
//! entities that survived visibility, then walks each light's interactions
//! to produce the lit surfaces the backend draws.

pub mod view_data;
pub mod view_operations;

pub use view_data::{DrawInteraction, ViewDef, ViewEntity, ViewLight};
pub use view_operations::{
    add_entity_ambient_surfaces, add_light_interactions, add_view_entity, add_view_light,
    add_visible_entities, add_visible_lights, area_is_visible, mark_area_visible, render_view,
};
