//! Scene-level input counts and externally derived totals.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PreconditionViolation;

/// Upper bounds on everything the sampling pipeline has to hold.
///
/// Fixed for the lifetime of one [`super::BufferPlanSet`]; a scene that
/// outgrows its budget needs a new plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Scene Budget", inline)]
#[serde(default)]
pub struct SceneBudget {
    /// Meshes with at least one emissive material.
    #[schemars(title = "Emissive Meshes")]
    pub max_emissive_meshes: u32,
    /// Emissive triangles across all meshes.
    #[schemars(title = "Emissive Triangles")]
    pub max_emissive_triangles: u32,
    /// Analytic (point, spot, sphere, ...) lights.
    #[schemars(title = "Primitive Lights")]
    pub max_primitive_lights: u32,
    /// Geometry instances in the acceleration structure.
    #[schemars(title = "Geometry Instances")]
    pub max_geometry_instances: u32,
    /// Environment map width in texels.
    #[schemars(title = "Environment Width", range(min = 1))]
    pub environment_map_width: u32,
    /// Environment map height in texels.
    #[schemars(title = "Environment Height", range(min = 1))]
    pub environment_map_height: u32,
    /// Virtual lights spawned per frame.
    #[schemars(title = "Virtual Lights / Frame")]
    pub virtual_light_samples_per_frame: u32,
    /// Frames a virtual light survives.
    #[schemars(title = "Virtual Light Lifespan")]
    pub virtual_light_sample_lifespan: u32,
    /// Cells in the directional ReGIR grid.
    #[schemars(title = "ReGIR Cells")]
    pub regir_cell_count: u32,
}

impl Default for SceneBudget {
    fn default() -> Self {
        Self {
            max_emissive_meshes: 0,
            max_emissive_triangles: 0,
            max_primitive_lights: 0,
            max_geometry_instances: 0,
            environment_map_width: 1,
            environment_map_height: 1,
            virtual_light_samples_per_frame: 0,
            virtual_light_sample_lifespan: 0,
            regir_cell_count: 0,
        }
    }
}

impl SceneBudget {
    /// Virtual lights alive at once: `samples_per_frame * lifespan`.
    #[must_use]
    pub fn max_virtual_lights(&self) -> u64 {
        u64::from(self.virtual_light_samples_per_frame)
            * u64::from(self.virtual_light_sample_lifespan)
    }

    /// Emissive triangles, primitive lights, and virtual lights together.
    #[must_use]
    pub fn max_local_lights(&self) -> u64 {
        u64::from(self.max_emissive_triangles)
            + u64::from(self.max_primitive_lights)
            + self.max_virtual_lights()
    }

    pub(crate) fn validate(&self) -> Result<(), PreconditionViolation> {
        if self.environment_map_width == 0 {
            return Err(PreconditionViolation::Zero {
                what: "environment map width",
            });
        }
        if self.environment_map_height == 0 {
            return Err(PreconditionViolation::Zero {
                what: "environment map height",
            });
        }
        Ok(())
    }
}

/// Reservoir copies kept by ReSTIR DI (initial, temporal, spatial).
pub const DEFAULT_DI_RESERVOIR_BUFFERS: u32 = 3;
/// Reservoir copies kept by ReSTIR GI (ping-pong).
pub const DEFAULT_GI_RESERVOIR_BUFFERS: u32 = 2;
/// Neighbor offsets generated for spatial reuse.
pub const DEFAULT_NEIGHBOR_OFFSET_COUNT: u32 = 8192;

/// Totals computed by collaborators before planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedTotals {
    /// Elements in the segmented buffer shared by all RIS features; may be 0.
    pub shared_ris_element_total: u32,
    /// Reservoir slots between two logical reservoir buffers.
    pub reservoir_array_pitch: u32,
    /// Logical DI reservoir buffers.
    pub di_reservoir_buffer_count: u32,
    /// Logical GI reservoir buffers.
    pub gi_reservoir_buffer_count: u32,
    /// Entries in the neighbor offset table.
    pub neighbor_offset_count: u32,
}

impl DerivedTotals {
    /// Totals with the default reservoir multiplicities and offset count.
    #[must_use]
    pub const fn new(shared_ris_element_total: u32, reservoir_array_pitch: u32) -> Self {
        Self {
            shared_ris_element_total,
            reservoir_array_pitch,
            di_reservoir_buffer_count: DEFAULT_DI_RESERVOIR_BUFFERS,
            gi_reservoir_buffer_count: DEFAULT_GI_RESERVOIR_BUFFERS,
            neighbor_offset_count: DEFAULT_NEIGHBOR_OFFSET_COUNT,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), PreconditionViolation> {
        let positive = [
            (self.reservoir_array_pitch, "reservoir array pitch"),
            (self.di_reservoir_buffer_count, "DI reservoir buffer count"),
            (self.gi_reservoir_buffer_count, "GI reservoir buffer count"),
            (self.neighbor_offset_count, "neighbor offset count"),
        ];
        for (value, what) in positive {
            if value == 0 {
                return Err(PreconditionViolation::Zero { what });
            }
        }
        Ok(())
    }
}
