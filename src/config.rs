//! Interaction subsystem configuration
//!
//! Loaded from TOML (every field optional) and validated before a
//! `RenderSystem` is built from it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Runtime switches for interaction generation and lit-surface caching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Maintain the dense (light, entity) lookup table
    pub use_interaction_table: bool,
    /// Extra rows and columns allocated whenever the table has to grow
    pub interaction_table_headroom: usize,
    /// Allocate index caches for lit surfaces
    pub use_index_buffers: bool,
    /// Ignore the per-entity suppress/allow view and light id flags
    pub skip_suppress: bool,
    /// Cull interactions whose shadow volume misses the view frustum
    pub use_interaction_culling: bool,
    /// Build lit-triangle subsets from cull bits instead of drawing whole surfaces
    pub cull_light_triangles: bool,
    /// Warn about very large entity and light references
    pub show_updates: bool,
    /// Byte budget of the bundled vertex cache
    pub vertex_cache_bytes: usize,
    /// Frames an untouched cache entry survives an idle purge
    pub cache_purge_idle_frames: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            use_interaction_table: true,
            interaction_table_headroom: 100,
            use_index_buffers: true,
            skip_suppress: false,
            use_interaction_culling: false,
            cull_light_triangles: false,
            show_updates: false,
            vertex_cache_bytes: 32 * 1024 * 1024,
            cache_purge_idle_frames: 2,
        }
    }
}

impl InteractionConfig {
    /// Parse a configuration from TOML text and validate it
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: InteractionConfig =
            toml::from_str(text).context("InteractionConfig: failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from disk and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("InteractionConfig: failed to read {}", path.display()))?;
        log::debug!("[InteractionConfig::load] Loaded {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.vertex_cache_bytes == 0 {
            return Err(anyhow::anyhow!(
                "InteractionConfig: vertex_cache_bytes cannot be 0"
            ));
        }

        if self.use_interaction_table && self.interaction_table_headroom == 0 {
            return Err(anyhow::anyhow!(
                "InteractionConfig: interaction_table_headroom cannot be 0 while the interaction table is enabled"
            ));
        }

        if self.interaction_table_headroom > 65536 {
            return Err(anyhow::anyhow!(
                "InteractionConfig: interaction_table_headroom {} exceeds maximum of 65536",
                self.interaction_table_headroom
            ));
        }

        log::info!("[InteractionConfig] Configuration validated successfully");
        Ok(())
    }
}
