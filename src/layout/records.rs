//! Fixed-layout GPU records whose sizes set the buffer strides.
//!
//! Every record is `#[repr(C)]` and `Pod`. The size asserts below pin the
//! shader-visible layout; explicit `_pad` fields are part of that layout and
//! must stay zeroed.

use std::mem::size_of;

/// One light-preparation work item (one emissive mesh, primitive light, or
/// virtual light).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PrepareLightsTask {
    /// Packed instance (upper bits) and geometry (lower bits) index.
    pub instance_and_geometry_index: u32,
    /// Triangles this task emits; 0 for analytic lights.
    pub triangle_count: u32,
    /// First slot written in the current half of the light-data buffer.
    pub light_buffer_offset: u32,
    /// Matching slot from the previous frame, or -1 if the light is new.
    pub previous_light_buffer_offset: i32,
}

/// Compact, type-tagged description of any local light.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PolymorphicLightInfo {
    /// World-space center.
    pub center: [f32; 3],
    /// RGB8 color, light type, and flags.
    pub color_type_and_flags: u32,
    /// Octahedral-encoded first axis.
    pub direction1: u32,
    /// Octahedral-encoded second axis.
    pub direction2: u32,
    /// Two fp16 type-specific scalars.
    pub scalars: u32,
    /// Log-encoded radiance.
    pub log_radiance: u32,
    /// IES profile index, or `u32::MAX` if none.
    pub ies_profile_index: u32,
    /// Octahedral-encoded spot axis.
    pub primary_axis: u32,
    /// Packed fp16 cone angle and softness.
    pub cos_cone_angle_and_softness: u32,
    /// Padding, keep zeroed.
    pub _pad: u32,
}

/// Direct-illumination reservoir as stored between passes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedDiReservoir {
    /// Selected light index and validity bit.
    pub light_data: u32,
    /// Unorm16x2 sample position on the light.
    pub uv_data: u32,
    /// Candidate count and visibility bits.
    pub m_visibility: u32,
    /// Spatial distance and age.
    pub distance_age: u32,
    /// Target PDF of the selected sample.
    pub target_pdf: f32,
    /// Unbiased contribution weight.
    pub weight: f32,
    /// Padding, keep zeroed.
    pub _pad: [u32; 2],
}

/// Global-illumination reservoir as stored between passes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedGiReservoir {
    /// World-space position of the secondary surface.
    pub position: [f32; 3],
    /// Packed miscellaneous data, age and M.
    pub packed_misc_age_m: u32,
    /// Packed fp16 RGB radiance.
    pub packed_radiance: [u32; 2],
    /// Unbiased contribution weight.
    pub weight: f32,
    /// Octahedral-encoded surface normal.
    pub packed_normal: u32,
}

/// Per-pixel secondary surface record written by the GI bounce pass.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SecondaryGBufferData {
    /// World-space hit position.
    pub world_pos: [f32; 3],
    /// Octahedral-encoded normal.
    pub normal: u32,
    /// Packed fp16 throughput and path flags.
    pub throughput_and_flags: [u32; 2],
    /// RGB8 diffuse albedo.
    pub diffuse_albedo: u32,
    /// RGB8 specular color and roughness.
    pub specular_and_roughness: u32,
    /// Emitted radiance at the hit.
    pub emission: [f32; 3],
    /// Sampling PDF of the bounce direction.
    pub pdf: f32,
}

/// Surface record for a virtual light spawned by the GSGI pass.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GsgiGBufferData {
    /// World-space position of the virtual light.
    pub world_pos: [f32; 3],
    /// Octahedral-encoded shading normal.
    pub normal: u32,
    /// RGB8 diffuse albedo.
    pub diffuse_albedo: u32,
    /// RGB8 specular color and roughness.
    pub specular_and_roughness: u32,
    /// Octahedral-encoded geometric normal.
    pub geometry_normal: u32,
    /// Padding, keep zeroed.
    pub _pad: u32,
    /// Incident radiance carried by the virtual light.
    pub radiance: [f32; 3],
    /// PDF of the path that created the sample.
    pub pdf: f32,
}

const _: () = assert!(size_of::<PrepareLightsTask>() == 16);
const _: () = assert!(size_of::<PolymorphicLightInfo>() == 48);
const _: () = assert!(size_of::<PackedDiReservoir>() == 32);
const _: () = assert!(size_of::<PackedGiReservoir>() == 32);
const _: () = assert!(size_of::<SecondaryGBufferData>() == 48);
const _: () = assert!(size_of::<GsgiGBufferData>() == 48);

/// Primitive-light slots reserved per geometry instance in the
/// primitive-instance-to-light map.
pub const PRIMITIVE_SLOTS_PER_GEOMETRY_INSTANCE: u32 = 16;

/// Stride of `T` as a buffer element size.
pub(crate) const fn stride_of<T>() -> u32 {
    size_of::<T>() as u32
}
