//! Scene budget and sampling options with TOML preset support.
//!
//! One canonical schema covers the GSGI, PMGI, virtual-light, and
//! directional ReGIR settings, next to the [`SceneBudget`] the planner
//! sizes everything from. Options serialize to/from TOML; every section is
//! `#[serde(default)]`, so a preset only needs the fields it changes.

mod gsgi;
mod regir;

use std::path::Path;

pub use gsgi::{
    GsgiOptions, GsgiResamplingMode, PmgiOptions, VirtualLightContribution,
    VirtualLightOptions,
};
pub use regir::{DirReGirOptions, DirReGirSampling, ReGirType};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ResourceError;
use crate::layout::SceneBudget;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[serde(default)]
pub struct Options {
    /// Upper bounds the layout is planned for.
    pub budget: SceneBudget,
    /// GSGI virtual-light GI.
    pub gsgi: GsgiOptions,
    /// PMGI virtual-light GI.
    pub pmgi: PmgiOptions,
    /// Virtual lights in direct lighting.
    pub virtual_lights: VirtualLightOptions,
    /// Directional ReGIR grid.
    pub dir_regir: DirReGirOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Io`] if the file cannot be read,
    /// [`ResourceError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let content = std::fs::read_to_string(path).map_err(ResourceError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`ResourceError::OptionsParse`] if `content` is not valid options TOML.
    pub fn from_toml(content: &str) -> Result<Self, ResourceError> {
        toml::from_str(content).map_err(|e| ResourceError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`ResourceError::OptionsParse`] if serialization fails,
    /// [`ResourceError::Io`] if the file or its directory cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ResourceError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ResourceError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ResourceError::Io)?;
        }
        std::fs::write(path, content).map_err(ResourceError::Io)
    }
}
