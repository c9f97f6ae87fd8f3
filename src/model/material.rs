//! Materials and skins as seen by the interaction code
//!
//! Only the handful of material properties that decide whether a surface
//! takes part in lighting are modelled here.

use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Surface material
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// Has at least one stage that reacts to lights
    pub receives_lighting: bool,
    /// False for collision hulls and other nodraw surfaces
    pub is_drawn: bool,
    /// Uses a vertex deform (autosprite and friends)
    pub has_deform: bool,
}

impl Material {
    /// Ordinary lit, drawn material
    pub fn lit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            receives_lighting: true,
            is_drawn: true,
            has_deform: false,
        }
    }

    /// Drawn material with no light interaction stages
    pub fn unlit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            receives_lighting: false,
            is_drawn: true,
            has_deform: false,
        }
    }

    pub fn receives_lighting(&self) -> bool {
        self.receives_lighting
    }
}

/// Per-entity material substitution table.
///
/// A mapping to `None` hides the surface. The key `"*"` matches any material
/// not listed explicitly.
#[derive(Debug, Clone, Default)]
pub struct Skin {
    pub name: String,
    mappings: FxHashMap<String, Option<Arc<Material>>>,
}

impl Skin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mappings: FxHashMap::default(),
        }
    }

    pub fn with_mapping(mut self, from: impl Into<String>, to: Option<Arc<Material>>) -> Self {
        self.mappings.insert(from.into(), to);
        self
    }

    /// Material to draw in place of `shader`
    pub fn remap(&self, shader: &Arc<Material>) -> Option<Arc<Material>> {
        match self
            .mappings
            .get(&shader.name)
            .or_else(|| self.mappings.get("*"))
        {
            Some(mapped) => mapped.clone(),
            None => Some(Arc::clone(shader)),
        }
    }
}

/// Resolve the material a surface is drawn with on one entity.
///
/// Nodraw surfaces are never remapped. A custom shader overrides everything
/// except deforming surfaces, which disappear instead. Otherwise the skin
/// gets a chance to swap the material.
pub fn remap_shader_by_skin(
    shader: Option<&Arc<Material>>,
    skin: Option<&Skin>,
    custom_shader: Option<&Arc<Material>>,
) -> Option<Arc<Material>> {
    let shader = shader?;

    if !shader.is_drawn {
        return Some(Arc::clone(shader));
    }

    if let Some(custom) = custom_shader {
        if shader.has_deform {
            return None;
        }
        return Some(Arc::clone(custom));
    }

    match skin {
        Some(skin) => skin.remap(shader),
        None => Some(Arc::clone(shader)),
    }
}
