use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where GSGI virtual-light reservoirs are resampled.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum GsgiResamplingMode {
    /// No reuse between virtual lights.
    None,
    /// Reuse through the world-space grid.
    WorldSpace,
    /// Reuse between neighboring pixels.
    #[default]
    ScreenSpace,
}

impl GsgiResamplingMode {
    /// Value seen by shaders.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        match self {
            Self::None => 0,
            Self::WorldSpace => 1,
            Self::ScreenSpace => 2,
        }
    }
}

/// Which lobes a virtual light contributes to.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum VirtualLightContribution {
    /// Diffuse and specular.
    #[default]
    DiffuseAndSpecular,
    /// Diffuse only; avoids fireflies on glossy receivers.
    DiffuseOnly,
}

impl VirtualLightContribution {
    /// Value seen by shaders.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        match self {
            Self::DiffuseAndSpecular => 0,
            Self::DiffuseOnly => 1,
        }
    }
}

/// Screen-space GI through short-lived virtual lights.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "GSGI", inline)]
#[serde(default)]
pub struct GsgiOptions {
    /// Reuse strategy for virtual-light reservoirs.
    #[schemars(title = "Resampling")]
    pub resampling_mode: GsgiResamplingMode,
    /// Distance a virtual light is pushed off its surface.
    #[schemars(title = "Origin Offset", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub sample_origin_offset: f32,
    /// Flux multiplier.
    #[schemars(title = "Scale", range(min = 0.0, max = 10.0), extend("step" = 0.1))]
    pub scaling_factor: f32,
    /// Radius of each virtual light.
    #[schemars(title = "Light Size", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub light_size: f32,
    /// Minimum shading distance.
    #[schemars(title = "Clamp Distance", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub clamping_distance: f32,
}

impl Default for GsgiOptions {
    fn default() -> Self {
        Self {
            resampling_mode: GsgiResamplingMode::default(),
            sample_origin_offset: 0.5,
            scaling_factor: 1.0,
            light_size: 0.1,
            clamping_distance: 0.1,
        }
    }
}

/// Photon-mapped GI through virtual lights.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "PMGI", inline)]
#[serde(default)]
pub struct PmgiOptions {
    /// Flux multiplier.
    #[schemars(title = "Scale", range(min = 0.0, max = 10.0), extend("step" = 0.1))]
    pub scaling_factor: f32,
    /// Radius of each virtual light.
    #[schemars(title = "Light Size", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub light_size: f32,
    /// Minimum shading distance.
    #[schemars(title = "Clamp Distance", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub clamping_distance: f32,
}

impl Default for PmgiOptions {
    fn default() -> Self {
        Self {
            scaling_factor: 1.0,
            light_size: 0.1,
            clamping_distance: 0.1,
        }
    }
}

/// How virtual lights take part in direct lighting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Virtual Lights", inline)]
#[serde(default)]
pub struct VirtualLightOptions {
    /// Lobes lit by virtual lights.
    #[schemars(title = "Contribution")]
    pub contribution: VirtualLightContribution,
    /// Stop spawning; keep the current set.
    #[schemars(title = "Lock Lights")]
    pub lock_lights: bool,
    /// Cap on a virtual light's contribution relative to its source.
    #[schemars(title = "Clamp Ratio", range(min = 0.0, max = 10.0), extend("step" = 0.1))]
    pub clamping_ratio: f32,
    /// Let BRDF rays hit virtual lights.
    #[schemars(skip)]
    pub include_in_brdf_light_sampling: bool,
}

impl Default for VirtualLightOptions {
    fn default() -> Self {
        Self {
            contribution: VirtualLightContribution::default(),
            lock_lights: false,
            clamping_ratio: 1.0,
            include_in_brdf_light_sampling: true,
        }
    }
}
