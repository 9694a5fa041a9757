//! Constant-buffer records for the virtual-light GI techniques.
//!
//! Field order and padding match the shader-side structs; each record is
//! exactly two 16-byte rows.

use bytemuck::{Pod, Zeroable};

use crate::error::{PreconditionViolation, ResourceError};
use crate::layout::SceneBudget;
use crate::options::{GsgiOptions, PmgiOptions, VirtualLightOptions};

/// GSGI sampling constants.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GsgiParameters {
    /// Virtual lights spawned per frame.
    pub samples_per_frame: u32,
    /// Frames a virtual light survives.
    pub sample_lifespan: u32,
    /// Offset of the light origin from its surface.
    pub sample_origin_offset: f32,
    /// [`crate::options::GsgiResamplingMode::as_u32`].
    pub resampling_mode: u32,
    /// Flux multiplier.
    pub scaling_factor: f32,
    /// Virtual light radius.
    pub light_size: f32,
    /// Minimum shading distance.
    pub clamping_distance: f32,
    /// Padding, keep zeroed.
    pub _pad: i32,
}

/// PMGI sampling constants.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PmgiParameters {
    /// Virtual lights spawned per frame.
    pub samples_per_frame: u32,
    /// Frames a virtual light survives.
    pub sample_lifespan: u32,
    /// Flux multiplier.
    pub scaling_factor: f32,
    /// Virtual light radius.
    pub light_size: f32,
    /// Minimum shading distance.
    pub clamping_distance: f32,
    /// `1 / max_virtual_lights`, or 0 with no virtual lights.
    pub inv_total_virtual_lights: f32,
    /// Padding, keep zeroed.
    pub _pad: [i32; 2],
}

/// Virtual-light constants for direct lighting.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VirtualLightParameters {
    /// [`crate::options::VirtualLightContribution::as_u32`].
    pub contribution: u32,
    /// 1 when spawning is frozen.
    pub lock_lights: u32,
    /// Contribution cap.
    pub clamping_ratio: f32,
    /// 1 when BRDF rays may hit virtual lights.
    pub include_in_brdf_light_sampling: u32,
    /// Virtual lights alive at once.
    pub total_virtual_lights: u32,
    /// Padding, keep zeroed.
    pub _pad: [i32; 3],
}

const _: () = assert!(size_of::<GsgiParameters>() == 32);
const _: () = assert!(size_of::<PmgiParameters>() == 32);
const _: () = assert!(size_of::<VirtualLightParameters>() == 32);

fn total_virtual_lights(budget: &SceneBudget) -> Result<u32, PreconditionViolation> {
    u32::try_from(budget.max_virtual_lights()).map_err(|_| PreconditionViolation::Overflow {
        what: "total virtual lights",
    })
}

impl GsgiParameters {
    /// Build from the budget's virtual light counts and GSGI options.
    #[must_use]
    pub const fn new(budget: &SceneBudget, options: &GsgiOptions) -> Self {
        Self {
            samples_per_frame: budget.virtual_light_samples_per_frame,
            sample_lifespan: budget.virtual_light_sample_lifespan,
            sample_origin_offset: options.sample_origin_offset,
            resampling_mode: options.resampling_mode.as_u32(),
            scaling_factor: options.scaling_factor,
            light_size: options.light_size,
            clamping_distance: options.clamping_distance,
            _pad: 0,
        }
    }
}

impl PmgiParameters {
    /// Build from the budget's virtual light counts and PMGI options.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Precondition`] if the virtual light total does not
    /// fit in 32 bits.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(budget: &SceneBudget, options: &PmgiOptions) -> Result<Self, ResourceError> {
        let total = total_virtual_lights(budget)?;
        let inv_total_virtual_lights = if total == 0 { 0.0 } else { 1.0 / total as f32 };
        Ok(Self {
            samples_per_frame: budget.virtual_light_samples_per_frame,
            sample_lifespan: budget.virtual_light_sample_lifespan,
            scaling_factor: options.scaling_factor,
            light_size: options.light_size,
            clamping_distance: options.clamping_distance,
            inv_total_virtual_lights,
            _pad: [0; 2],
        })
    }
}

impl VirtualLightParameters {
    /// Build from the budget's virtual light total and options.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Precondition`] if the virtual light total does not
    /// fit in 32 bits.
    pub fn new(
        budget: &SceneBudget,
        options: &VirtualLightOptions,
    ) -> Result<Self, ResourceError> {
        Ok(Self {
            contribution: options.contribution.as_u32(),
            lock_lights: u32::from(options.lock_lights),
            clamping_ratio: options.clamping_ratio,
            include_in_brdf_light_sampling: u32::from(
                options.include_in_brdf_light_sampling,
            ),
            total_virtual_lights: total_virtual_lights(budget)?,
            _pad: [0; 3],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{GsgiResamplingMode, VirtualLightContribution};

    fn budget(samples_per_frame: u32, lifespan: u32) -> SceneBudget {
        SceneBudget {
            virtual_light_samples_per_frame: samples_per_frame,
            virtual_light_sample_lifespan: lifespan,
            ..SceneBudget::default()
        }
    }

    #[test]
    fn gsgi_field_offsets() {
        let options = GsgiOptions {
            resampling_mode: GsgiResamplingMode::WorldSpace,
            ..GsgiOptions::default()
        };
        let params = GsgiParameters::new(&budget(1024, 4), &options);
        let words: &[u32] = bytemuck::cast_slice(bytemuck::bytes_of(&params));
        assert_eq!(words[0], 1024);
        assert_eq!(words[1], 4);
        assert_eq!(words[3], 1);
        assert_eq!(words[7], 0);
    }

    #[test]
    fn pmgi_inverse_total() {
        let params = PmgiParameters::new(&budget(1024, 4), &PmgiOptions::default()).unwrap();
        assert_eq!(params.inv_total_virtual_lights, 1.0 / 4096.0);
        assert_eq!(params._pad, [0; 2]);

        let params = PmgiParameters::new(&budget(0, 4), &PmgiOptions::default()).unwrap();
        assert_eq!(params.inv_total_virtual_lights, 0.0);
    }

    #[test]
    fn virtual_light_flags() {
        let options = VirtualLightOptions {
            contribution: VirtualLightContribution::DiffuseOnly,
            lock_lights: true,
            clamping_ratio: 2.5,
            include_in_brdf_light_sampling: false,
        };
        let params = VirtualLightParameters::new(&budget(256, 3), &options).unwrap();
        assert_eq!(params.contribution, 1);
        assert_eq!(params.lock_lights, 1);
        assert_eq!(params.include_in_brdf_light_sampling, 0);
        assert_eq!(params.total_virtual_lights, 768);
        assert_eq!(params.clamping_ratio, 2.5);
    }

    #[test]
    fn oversized_total_is_rejected() {
        let err = VirtualLightParameters::new(
            &budget(u32::MAX, 2),
            &VirtualLightOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ResourceError::Precondition(PreconditionViolation::Overflow { .. })
        ));
    }
}
