use super::{ModelSurface, RenderModel, SharedTriSurface, SkinningRef};
use super::material::Material;
use crate::entity::EntityParms;
use crate::geometry::{bounds_add_point, cleared_bounds, Bounds};
use std::sync::Arc;

/// Model whose surfaces never change after loading
#[derive(Debug, Clone)]
pub struct StaticModel {
    name: String,
    surfaces: Vec<ModelSurface>,
    bounds: Bounds,
    world_mesh: bool,
    static_world: bool,
    skinning: Option<SkinningRef>,
}

impl StaticModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            surfaces: Vec::new(),
            bounds: cleared_bounds(),
            world_mesh: false,
            static_world: false,
            skinning: None,
        }
    }

    /// Add a surface and grow the model bounds around it
    pub fn add_surface(&mut self, shader: Option<Arc<Material>>, geometry: Option<SharedTriSurface>) {
        if let Some(geometry) = &geometry {
            let tri_bounds = geometry.read().bounds;
            bounds_add_point(&mut self.bounds, tri_bounds.min);
            bounds_add_point(&mut self.bounds, tri_bounds.max);
        }
        self.surfaces.push(ModelSurface { shader, geometry });
    }

    pub fn with_surface(mut self, shader: Option<Arc<Material>>, geometry: Option<SharedTriSurface>) -> Self {
        self.add_surface(shader, geometry);
        self
    }

    /// Mark as map geometry; `static_world` also skips interaction culling
    pub fn as_world_mesh(mut self, static_world: bool) -> Self {
        self.world_mesh = true;
        self.static_world = static_world;
        self
    }

    /// A posed skeletal instance drawn with the given joint buffer
    pub fn with_skinning(mut self, skinning: SkinningRef) -> Self {
        self.skinning = Some(skinning);
        self
    }

    /// Override the computed bounds
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }
}

impl RenderModel for StaticModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn bounds(&self, _entity: Option<&EntityParms>) -> Bounds {
        self.bounds
    }

    fn num_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    fn surface(&self, index: usize) -> Option<&ModelSurface> {
        self.surfaces.get(index)
    }

    fn is_skeletal_mesh(&self) -> bool {
        self.skinning.is_some()
    }

    fn skinning(&self) -> Option<SkinningRef> {
        self.skinning
    }

    fn is_world_mesh(&self) -> bool {
        self.world_mesh
    }

    fn is_static_world_model(&self) -> bool {
        self.static_world
    }
}
