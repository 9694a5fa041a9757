use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// ReGIR grid flavor.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ReGirType {
    /// One reservoir set per cell.
    Standard,
    /// Per-cell sets split by direction.
    #[default]
    Directional,
}

impl ReGirType {
    /// Value seen by shaders.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        match self {
            Self::Standard => 0,
            Self::Directional => 1,
        }
    }
}

/// Target function used to fill directional ReGIR cells.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DirReGirSampling {
    /// Flux only.
    Uniform,
    /// Flux times cosine.
    Diffuse,
    /// Full BRDF estimate for the cell direction.
    #[default]
    Brdf,
}

impl DirReGirSampling {
    /// Value seen by shaders.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        match self {
            Self::Uniform => 0,
            Self::Diffuse => 1,
            Self::Brdf => 2,
        }
    }
}

/// Directional ReGIR grid settings.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[schemars(title = "Directional ReGIR", inline)]
#[serde(default)]
pub struct DirReGirOptions {
    /// Grid flavor.
    #[schemars(title = "Grid")]
    pub regir_type: ReGirType,
    /// Cell fill target.
    #[schemars(title = "Sampling")]
    pub sampling: DirReGirSampling,
}
