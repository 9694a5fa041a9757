//! Buffer and texture layout planning.
//!
//! [`plan`] turns a [`SceneBudget`] and the collaborator-supplied
//! [`DerivedTotals`] into a [`BufferPlanSet`]: the element count, stride,
//! typed-view format, access flags, and initial state of every buffer, plus
//! the shape of both PDF textures. Planning is pure; nothing here touches a
//! device.
//!
//! Two policies shape the sizes:
//!
//! - Buffers fed by the shared RIS allocator or the ReGIR grid may legitimately
//!   be empty and are floored to one element.
//! - Every RIS-style buffer is a pair: an index buffer of `RG32Uint` texels
//!   (2 words per element) and a light-data buffer of two `RGBA32Uint` texels
//!   (8 words per element).

/// Scene-level input counts and externally derived totals.
pub mod budget;
/// Element formats, access capabilities, and initial residency states.
pub mod format;
/// PDF texture shapes and mip chains.
pub mod pdf;
/// Fixed-layout GPU records whose sizes set the buffer strides.
pub mod records;

pub use budget::{DerivedTotals, SceneBudget};
pub use format::{BufferAccess, ElementFormat, InitialState};
pub use pdf::{mip_level_count, PdfTextureSize, PdfTextureSolver, PowerOfTwoPdfSolver};

use crate::error::{PreconditionViolation, ResourceError};
use records::{
    stride_of, GsgiGBufferData, PackedDiReservoir, PackedGiReservoir,
    PolymorphicLightInfo, PrepareLightsTask, SecondaryGBufferData,
    PRIMITIVE_SLOTS_PER_GEOMETRY_INSTANCE,
};

/// Texels per ReGIR grid cell (16x16).
pub const REGIR_TEXELS_PER_CELL: u32 = 16 * 16;

/// Words in one RIS index element (`RG32Uint`).
const RIS_INDEX_WORDS: u32 = 2;
/// Words in one RIS light-data element (two `RGBA32Uint` texels).
const RIS_LIGHT_DATA_WORDS: u32 = 8;

/// Every buffer the sampling pipeline binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferId {
    /// Light-preparation work items.
    Task,
    /// Analytic lights uploaded by the host.
    PrimitiveLight,
    /// Virtual lights spawned this frame.
    VirtualLight,
    /// Shared RIS index tiles.
    Ris,
    /// Shared RIS light data.
    RisLightData,
    /// Directional ReGIR index tiles.
    DirReGir,
    /// Directional ReGIR light data.
    DirReGirLightData,
    /// Current and previous frame light records.
    LightData,
    /// First light slot per geometry instance.
    GeometryInstanceToLight,
    /// Light slot per primitive-light slot of each instance.
    PrimitiveInstanceToLight,
    /// Previous-to-current light index remap.
    LightIndexMapping,
    /// Spatial reuse offsets.
    NeighborOffsets,
    /// ReSTIR DI reservoirs.
    LightReservoir,
    /// Secondary surfaces for ReSTIR GI.
    SecondaryGBuffer,
    /// Surfaces behind this frame's virtual lights.
    GsgiGBuffer,
    /// ReSTIR GI reservoirs.
    GiReservoir,
    /// Virtual-light reservoirs.
    GsgiReservoir,
    /// Spatial grid for virtual-light lookups.
    GsgiGrid,
}

impl BufferId {
    /// Number of buffers.
    pub const COUNT: usize = 18;

    /// All buffers, in plan order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Task,
        Self::PrimitiveLight,
        Self::VirtualLight,
        Self::Ris,
        Self::RisLightData,
        Self::DirReGir,
        Self::DirReGirLightData,
        Self::LightData,
        Self::GeometryInstanceToLight,
        Self::PrimitiveInstanceToLight,
        Self::LightIndexMapping,
        Self::NeighborOffsets,
        Self::LightReservoir,
        Self::SecondaryGBuffer,
        Self::GsgiGBuffer,
        Self::GiReservoir,
        Self::GsgiReservoir,
        Self::GsgiGrid,
    ];

    /// Debug label and binding name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Task => "TaskBuffer",
            Self::PrimitiveLight => "PrimitiveLightBuffer",
            Self::VirtualLight => "VirtualLightBuffer",
            Self::Ris => "RisBuffer",
            Self::RisLightData => "RisLightDataBuffer",
            Self::DirReGir => "DirReGIRBuffer",
            Self::DirReGirLightData => "DirReGIRLightDataBuffer",
            Self::LightData => "LightDataBuffer",
            Self::GeometryInstanceToLight => "GeometryInstanceToLightBuffer",
            Self::PrimitiveInstanceToLight => "PrimitiveInstanceToLightBuffer",
            Self::LightIndexMapping => "LightIndexMappingBuffer",
            Self::NeighborOffsets => "NeighborOffsetsBuffer",
            Self::LightReservoir => "LightReservoirBuffer",
            Self::SecondaryGBuffer => "SecondaryGBuffer",
            Self::GsgiGBuffer => "GSGIGBuffer",
            Self::GiReservoir => "GIReservoirBuffer",
            Self::GsgiReservoir => "GSGIReservoirBuffer",
            Self::GsgiGrid => "GSGIGridBuffer",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// The two PDF textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureId {
    /// Environment map luminance PDF.
    EnvironmentPdf,
    /// Local light flux PDF, one texel per light.
    LocalLightPdf,
}

impl TextureId {
    /// Number of textures.
    pub const COUNT: usize = 2;

    /// All textures, in plan order.
    pub const ALL: [Self; Self::COUNT] = [Self::EnvironmentPdf, Self::LocalLightPdf];

    /// Debug label and binding name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EnvironmentPdf => "EnvironmentPdfTexture",
            Self::LocalLightPdf => "LocalLightPdfTexture",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Shape of one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferPlan {
    /// Logical elements.
    pub element_count: u64,
    /// Bytes per element.
    pub element_size: u32,
    /// Texel format of the typed view, if the buffer has one.
    pub format: Option<ElementFormat>,
    /// Read/write capabilities.
    pub access: BufferAccess,
    /// State kept between passes.
    pub initial_state: InitialState,
}

impl BufferPlan {
    fn structured<T>(
        element_count: u64,
        access: BufferAccess,
        initial_state: InitialState,
    ) -> Self {
        Self {
            element_count,
            element_size: stride_of::<T>(),
            format: None,
            access,
            initial_state,
        }
    }

    fn typed(
        element_count: u64,
        words_per_element: u32,
        format: ElementFormat,
        access: BufferAccess,
    ) -> Self {
        Self {
            element_count,
            element_size: words_per_element * 4,
            format: Some(format),
            access,
            initial_state: InitialState::ShaderResource,
        }
    }

    /// `element_count * element_size`.
    #[must_use]
    pub fn byte_size(&self) -> u64 {
        self.element_count * u64::from(self.element_size)
    }

    /// Texels seen through the typed view; `None` for structured buffers.
    #[must_use]
    pub fn typed_view_len(&self) -> Option<u64> {
        self.texels_per_element()
            .map(|texels| self.element_count * u64::from(texels))
    }

    /// Texels per logical element; `None` for structured buffers.
    #[must_use]
    pub fn texels_per_element(&self) -> Option<u32> {
        self.format.map(|format| self.element_size / format.texel_size())
    }

    /// Storage binding matching the buffer's access flags.
    #[must_use]
    pub fn binding_type(&self) -> wgpu::BufferBindingType {
        wgpu::BufferBindingType::Storage {
            read_only: !self.access.uav,
        }
    }
}

/// Shape of one PDF texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexturePlan {
    /// Width of mip 0.
    pub width: u32,
    /// Height of mip 0.
    pub height: u32,
    /// Full mip chain length.
    pub mip_levels: u32,
    /// Texel format.
    pub format: ElementFormat,
    /// Shaders write the texture (PDF build and mip reduction).
    pub uav: bool,
}

impl TexturePlan {
    /// wgpu extent of mip 0.
    #[must_use]
    pub fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }

    /// Sampling and upload usages, plus storage when `uav` is set.
    #[must_use]
    pub fn usage(&self) -> wgpu::TextureUsages {
        let mut usage = wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_DST;
        if self.uav {
            usage |= wgpu::TextureUsages::STORAGE_BINDING;
        }
        usage
    }

    /// Descriptor for creating this texture.
    #[must_use]
    pub fn descriptor<'a>(&self, label: &'a str) -> wgpu::TextureDescriptor<'a> {
        wgpu::TextureDescriptor {
            label: Some(label),
            size: self.extent(),
            mip_level_count: self.mip_levels,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format.to_wgpu(),
            usage: self.usage(),
            view_formats: &[],
        }
    }
}

/// The complete layout for one scene budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferPlanSet {
    budget: SceneBudget,
    totals: DerivedTotals,
    max_virtual_lights: u64,
    max_local_lights: u64,
    total_buffer_bytes: u64,
    buffers: [BufferPlan; BufferId::COUNT],
    textures: [TexturePlan; TextureId::COUNT],
}

impl BufferPlanSet {
    /// Plan for one buffer.
    #[must_use]
    pub const fn buffer(&self, id: BufferId) -> &BufferPlan {
        &self.buffers[id.index()]
    }

    /// Plan for one texture.
    #[must_use]
    pub const fn texture(&self, id: TextureId) -> &TexturePlan {
        &self.textures[id.index()]
    }

    /// All buffer plans in [`BufferId::ALL`] order.
    pub fn buffers(&self) -> impl Iterator<Item = (BufferId, &BufferPlan)> {
        BufferId::ALL.into_iter().zip(self.buffers.iter())
    }

    /// All texture plans in [`TextureId::ALL`] order.
    pub fn textures(&self) -> impl Iterator<Item = (TextureId, &TexturePlan)> {
        TextureId::ALL.into_iter().zip(self.textures.iter())
    }

    /// Budget the plan was built from.
    #[must_use]
    pub const fn budget(&self) -> &SceneBudget {
        &self.budget
    }

    /// Totals the plan was built from.
    #[must_use]
    pub const fn totals(&self) -> &DerivedTotals {
        &self.totals
    }

    /// `samples_per_frame * lifespan`.
    #[must_use]
    pub const fn max_virtual_lights(&self) -> u64 {
        self.max_virtual_lights
    }

    /// Emissive triangles + primitive lights + virtual lights.
    #[must_use]
    pub const fn max_local_lights(&self) -> u64 {
        self.max_local_lights
    }

    /// Bytes across all buffers (textures excluded).
    #[must_use]
    pub const fn total_buffer_bytes(&self) -> u64 {
        self.total_buffer_bytes
    }
}

fn mul(a: u64, b: u64, what: &'static str) -> Result<u64, PreconditionViolation> {
    a.checked_mul(b).ok_or(PreconditionViolation::Overflow { what })
}

/// Plan every buffer and texture for `budget`, using `solver` to shape the
/// local-light PDF texture.
///
/// # Errors
///
/// Returns [`ResourceError::Precondition`] if an input that must be positive
/// is zero, a size overflows 64 bits, or the solver cannot produce a texture
/// holding every local light with a full mip chain.
pub fn plan(
    budget: &SceneBudget,
    totals: &DerivedTotals,
    solver: &impl PdfTextureSolver,
) -> Result<BufferPlanSet, ResourceError> {
    budget.validate()?;
    totals.validate()?;

    let buffers = plan_buffers(budget, totals)?;
    let total_buffer_bytes = checked_total(&buffers)?;
    let environment = TexturePlan {
        width: budget.environment_map_width,
        height: budget.environment_map_height,
        mip_levels: mip_level_count(
            budget.environment_map_width,
            budget.environment_map_height,
        ),
        format: ElementFormat::R16Float,
        uav: true,
    };
    let max_local_lights = budget.max_local_lights();
    let local = local_light_pdf(max_local_lights, solver)?;

    let set = BufferPlanSet {
        budget: *budget,
        totals: *totals,
        max_virtual_lights: budget.max_virtual_lights(),
        max_local_lights,
        total_buffer_bytes,
        buffers,
        textures: [environment, local],
    };
    log::info!(
        "planned {} buffers ({} bytes) for {} local lights",
        BufferId::COUNT,
        total_buffer_bytes,
        max_local_lights,
    );
    Ok(set)
}

fn plan_buffers(
    budget: &SceneBudget,
    totals: &DerivedTotals,
) -> Result<[BufferPlan; BufferId::COUNT], PreconditionViolation> {
    use BufferAccess as A;
    use InitialState::{ShaderResource as Sr, UnorderedAccess as Ua};

    let samples_per_frame = u64::from(budget.virtual_light_samples_per_frame);
    let max_virtual_lights = budget.max_virtual_lights();
    let light_slots = mul(budget.max_local_lights(), 2, "light data slots")?;

    let task_count = u64::from(budget.max_emissive_meshes)
        + u64::from(budget.max_primitive_lights)
        + max_virtual_lights;
    let ris_count = u64::from(totals.shared_ris_element_total).max(1);
    let regir_count = (u64::from(budget.regir_cell_count)
        * u64::from(REGIR_TEXELS_PER_CELL))
    .max(1);
    let pitch = u64::from(totals.reservoir_array_pitch);
    let di_reservoirs = mul(
        pitch,
        u64::from(totals.di_reservoir_buffer_count),
        "DI reservoir count",
    )?;
    let gi_reservoirs = mul(
        pitch,
        u64::from(totals.gi_reservoir_buffer_count),
        "GI reservoir count",
    )?;
    let primitive_slots = u64::from(budget.max_geometry_instances)
        * u64::from(PRIMITIVE_SLOTS_PER_GEOMETRY_INSTANCE);

    let buffers = [
        BufferPlan::structured::<PrepareLightsTask>(task_count, A::READ_WRITE, Sr),
        BufferPlan::structured::<PolymorphicLightInfo>(
            u64::from(budget.max_primitive_lights),
            A::READ_ONLY,
            Sr,
        ),
        BufferPlan::structured::<PolymorphicLightInfo>(
            samples_per_frame,
            A::READ_WRITE,
            Sr,
        ),
        BufferPlan::typed(
            ris_count,
            RIS_INDEX_WORDS,
            ElementFormat::Rg32Uint,
            A::READ_WRITE,
        ),
        BufferPlan::typed(
            ris_count,
            RIS_LIGHT_DATA_WORDS,
            ElementFormat::Rgba32Uint,
            A::READ_WRITE,
        ),
        BufferPlan::typed(
            regir_count,
            RIS_INDEX_WORDS,
            ElementFormat::Rg32Uint,
            A::READ_WRITE,
        ),
        BufferPlan::typed(
            regir_count,
            RIS_LIGHT_DATA_WORDS,
            ElementFormat::Rgba32Uint,
            A::READ_WRITE,
        ),
        BufferPlan::structured::<PolymorphicLightInfo>(light_slots, A::READ_WRITE, Sr),
        BufferPlan::structured::<u32>(
            u64::from(budget.max_geometry_instances),
            A::READ_WRITE,
            Sr,
        ),
        BufferPlan::structured::<u32>(primitive_slots, A::READ_WRITE, Sr),
        BufferPlan::typed(light_slots, 1, ElementFormat::R32Uint, A::READ_WRITE),
        BufferPlan {
            element_count: u64::from(totals.neighbor_offset_count),
            element_size: ElementFormat::Rg8Snorm.texel_size(),
            format: Some(ElementFormat::Rg8Snorm),
            access: A::READ_ONLY,
            initial_state: Sr,
        },
        BufferPlan::structured::<PackedDiReservoir>(di_reservoirs, A::READ_WRITE, Ua),
        BufferPlan::structured::<SecondaryGBufferData>(pitch, A::READ_WRITE, Ua),
        BufferPlan::structured::<GsgiGBufferData>(samples_per_frame, A::READ_WRITE, Ua),
        BufferPlan::structured::<PackedGiReservoir>(gi_reservoirs, A::READ_WRITE, Ua),
        BufferPlan::structured::<PackedDiReservoir>(samples_per_frame, A::READ_WRITE, Ua),
        BufferPlan::typed(ris_count, 1, ElementFormat::R32Sint, A::READ_WRITE),
    ];

    Ok(buffers)
}

/// Checked byte size of every buffer, then of their sum.
fn checked_total(buffers: &[BufferPlan]) -> Result<u64, PreconditionViolation> {
    let mut total = 0u64;
    for (id, buffer) in BufferId::ALL.into_iter().zip(buffers) {
        let bytes = mul(
            buffer.element_count,
            u64::from(buffer.element_size),
            id.label(),
        )?;
        total = total
            .checked_add(bytes)
            .ok_or(PreconditionViolation::Overflow {
                what: "total buffer bytes",
            })?;
    }
    Ok(total)
}

/// [`plan`] with the default [`PowerOfTwoPdfSolver`].
///
/// # Errors
///
/// See [`plan`].
pub fn plan_default(
    budget: &SceneBudget,
    totals: &DerivedTotals,
) -> Result<BufferPlanSet, ResourceError> {
    plan(budget, totals, &PowerOfTwoPdfSolver::default())
}

fn local_light_pdf(
    max_local_lights: u64,
    solver: &impl PdfTextureSolver,
) -> Result<TexturePlan, PreconditionViolation> {
    let size = solver
        .solve(max_local_lights)
        .ok_or(PreconditionViolation::PdfTextureUnsolvable {
            required: max_local_lights,
        })?;
    if size.texel_count() < max_local_lights {
        return Err(PreconditionViolation::PdfTextureTooSmall {
            width: size.width,
            height: size.height,
            required: max_local_lights,
        });
    }
    let expected = mip_level_count(size.width, size.height);
    if size.mip_levels != expected {
        return Err(PreconditionViolation::PdfMipChain {
            mip_levels: size.mip_levels,
            expected,
        });
    }
    // FP32 keeps the wide flux range intact through the mip reduction.
    Ok(TexturePlan {
        width: size.width,
        height: size.height,
        mip_levels: size.mip_levels,
        format: ElementFormat::R32Float,
        uav: true,
    })
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    fn example_budget() -> SceneBudget {
        SceneBudget {
            max_emissive_meshes: 100,
            max_emissive_triangles: 5000,
            max_primitive_lights: 50,
            max_geometry_instances: 200,
            environment_map_width: 512,
            environment_map_height: 256,
            virtual_light_samples_per_frame: 1024,
            virtual_light_sample_lifespan: 4,
            regir_cell_count: 64,
        }
    }

    fn example_totals() -> DerivedTotals {
        DerivedTotals {
            shared_ris_element_total: 8192,
            reservoir_array_pitch: 2_073_600,
            di_reservoir_buffer_count: 2,
            gi_reservoir_buffer_count: 2,
            neighbor_offset_count: 8192,
        }
    }

    #[test]
    fn end_to_end_example() {
        let set = plan_default(&example_budget(), &example_totals()).unwrap();

        assert_eq!(set.max_virtual_lights(), 4096);
        assert_eq!(set.max_local_lights(), 9146);
        assert_eq!(set.buffer(BufferId::LightData).element_count, 18_292);
        assert_eq!(set.buffer(BufferId::LightIndexMapping).element_count, 18_292);
        assert_eq!(set.texture(TextureId::EnvironmentPdf).mip_levels, 10);
        assert_eq!(set.buffer(BufferId::DirReGir).element_count, 16_384);
        assert_eq!(set.buffer(BufferId::DirReGirLightData).element_count, 16_384);
        assert_eq!(set.buffer(BufferId::Ris).element_count, 8192);
        assert_eq!(set.buffer(BufferId::Task).element_count, 100 + 50 + 4096);
        assert_eq!(
            set.buffer(BufferId::LightReservoir).element_count,
            2_073_600 * 2
        );
        assert_eq!(set.buffer(BufferId::GiReservoir).element_count, 2_073_600 * 2);
        assert_eq!(set.buffer(BufferId::SecondaryGBuffer).element_count, 2_073_600);
        assert_eq!(
            set.buffer(BufferId::PrimitiveInstanceToLight).element_count,
            200 * u64::from(PRIMITIVE_SLOTS_PER_GEOMETRY_INSTANCE)
        );
    }

    #[test]
    fn virtual_light_buffers_ignore_lifespan() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let budget = SceneBudget {
                virtual_light_samples_per_frame: rng.random_range(0..100_000),
                virtual_light_sample_lifespan: rng.random_range(0..64),
                ..example_budget()
            };
            let set = plan_default(&budget, &example_totals()).unwrap();
            let spf = u64::from(budget.virtual_light_samples_per_frame);
            assert_eq!(
                set.max_virtual_lights(),
                spf * u64::from(budget.virtual_light_sample_lifespan)
            );
            assert_eq!(set.buffer(BufferId::VirtualLight).element_count, spf);
            assert_eq!(set.buffer(BufferId::GsgiGBuffer).element_count, spf);
            assert_eq!(set.buffer(BufferId::GsgiReservoir).element_count, spf);
        }
    }

    #[test]
    fn light_data_is_double_buffered() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let budget = SceneBudget {
                max_emissive_triangles: rng.random_range(0..1_000_000),
                max_primitive_lights: rng.random_range(0..10_000),
                virtual_light_samples_per_frame: rng.random_range(0..10_000),
                virtual_light_sample_lifespan: rng.random_range(0..16),
                ..example_budget()
            };
            let set = plan_default(&budget, &example_totals()).unwrap();
            let local = u64::from(budget.max_emissive_triangles)
                + u64::from(budget.max_primitive_lights)
                + set.max_virtual_lights();
            assert_eq!(set.max_local_lights(), local);
            assert_eq!(set.buffer(BufferId::LightData).element_count, 2 * local);

            let pdf = set.texture(TextureId::LocalLightPdf);
            assert!(u64::from(pdf.width) * u64::from(pdf.height) >= local);
        }
    }

    #[test]
    fn empty_shared_ris_total_floors_to_one_element() {
        let totals = DerivedTotals {
            shared_ris_element_total: 0,
            ..example_totals()
        };
        let budget = SceneBudget {
            regir_cell_count: 0,
            ..example_budget()
        };
        let set = plan_default(&budget, &totals).unwrap();
        for id in [
            BufferId::Ris,
            BufferId::RisLightData,
            BufferId::DirReGir,
            BufferId::DirReGirLightData,
            BufferId::GsgiGrid,
        ] {
            assert_eq!(set.buffer(id).element_count, 1, "{}", id.label());
            assert!(set.buffer(id).byte_size() > 0);
        }
    }

    #[test]
    fn ris_pairs_share_counts_and_differ_in_width() {
        let set = plan_default(&example_budget(), &example_totals()).unwrap();
        for (index, data) in [
            (BufferId::Ris, BufferId::RisLightData),
            (BufferId::DirReGir, BufferId::DirReGirLightData),
        ] {
            let index = set.buffer(index);
            let data = set.buffer(data);
            assert_eq!(index.element_count, data.element_count);
            assert_eq!(index.element_size, 8);
            assert_eq!(data.element_size, 32);
            assert_eq!(index.format, Some(ElementFormat::Rg32Uint));
            assert_eq!(data.format, Some(ElementFormat::Rgba32Uint));
            assert_eq!(index.texels_per_element(), Some(1));
            assert_eq!(data.texels_per_element(), Some(2));
            assert_eq!(data.typed_view_len(), Some(2 * data.element_count));
        }
    }

    #[test]
    fn reservoir_multiplicity_per_kind() {
        let totals = DerivedTotals {
            di_reservoir_buffer_count: 3,
            gi_reservoir_buffer_count: 2,
            ..example_totals()
        };
        let set = plan_default(&example_budget(), &totals).unwrap();
        let pitch = u64::from(totals.reservoir_array_pitch);
        assert_eq!(set.buffer(BufferId::LightReservoir).element_count, pitch * 3);
        assert_eq!(set.buffer(BufferId::GiReservoir).element_count, pitch * 2);
        assert_eq!(set.buffer(BufferId::LightReservoir).element_size, 32);
    }

    #[test]
    fn byte_sizes_are_count_times_stride() {
        let set = plan_default(&example_budget(), &example_totals()).unwrap();
        for (id, buffer) in set.buffers() {
            assert_eq!(
                buffer.byte_size(),
                buffer.element_count * u64::from(buffer.element_size),
                "{}",
                id.label()
            );
            if let Some(format) = buffer.format {
                assert_eq!(buffer.element_size % format.texel_size(), 0);
            }
        }
        assert_eq!(set.buffer(BufferId::NeighborOffsets).byte_size(), 8192 * 2);
        assert_eq!(set.buffer(BufferId::GsgiGrid).byte_size(), 8192 * 4);
    }

    #[test]
    fn initial_states_follow_usage() {
        let set = plan_default(&example_budget(), &example_totals()).unwrap();
        let ua = [
            BufferId::LightReservoir,
            BufferId::SecondaryGBuffer,
            BufferId::GsgiGBuffer,
            BufferId::GiReservoir,
            BufferId::GsgiReservoir,
        ];
        for (id, buffer) in set.buffers() {
            let expected = if ua.contains(&id) {
                InitialState::UnorderedAccess
            } else {
                InitialState::ShaderResource
            };
            assert_eq!(buffer.initial_state, expected, "{}", id.label());
        }
        assert!(!set.buffer(BufferId::PrimitiveLight).access.uav);
        assert!(!set.buffer(BufferId::NeighborOffsets).access.uav);
        assert_eq!(
            set.buffer(BufferId::GiReservoir).binding_type(),
            wgpu::BufferBindingType::Storage { read_only: false }
        );
        assert_eq!(
            set.buffer(BufferId::NeighborOffsets).binding_type(),
            wgpu::BufferBindingType::Storage { read_only: true }
        );
    }

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<_> = BufferId::ALL.iter().map(|id| id.label()).collect();
        labels.extend(TextureId::ALL.iter().map(|id| id.label()));
        let total = labels.len();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), total);
    }

    #[test]
    fn texture_formats_and_descriptors() {
        let set = plan_default(&example_budget(), &example_totals()).unwrap();
        let env = set.texture(TextureId::EnvironmentPdf);
        assert_eq!((env.width, env.height), (512, 256));
        assert_eq!(env.format, ElementFormat::R16Float);

        let local = set.texture(TextureId::LocalLightPdf);
        assert_eq!(local.format, ElementFormat::R32Float);
        let desc = local.descriptor(TextureId::LocalLightPdf.label());
        assert_eq!(desc.mip_level_count, local.mip_levels);
        assert!(desc.usage.contains(wgpu::TextureUsages::STORAGE_BINDING));
    }

    struct FixedSolver(PdfTextureSize);

    impl PdfTextureSolver for FixedSolver {
        fn solve(&self, _min_texels: u64) -> Option<PdfTextureSize> {
            Some(self.0)
        }
    }

    #[test]
    fn undersized_pdf_texture_is_a_precondition_failure() {
        let solver = FixedSolver(PdfTextureSize {
            width: 64,
            height: 64,
            mip_levels: 7,
        });
        let err = plan(&example_budget(), &example_totals(), &solver).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::Precondition(PreconditionViolation::PdfTextureTooSmall {
                width: 64,
                height: 64,
                required: 9146,
            })
        ));
    }

    #[test]
    fn truncated_mip_chain_is_a_precondition_failure() {
        let solver = FixedSolver(PdfTextureSize {
            width: 128,
            height: 128,
            mip_levels: 1,
        });
        let err = plan(&example_budget(), &example_totals(), &solver).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::Precondition(PreconditionViolation::PdfMipChain {
                mip_levels: 1,
                expected: 8,
            })
        ));
    }

    #[test]
    fn unsolvable_budget_is_a_precondition_failure() {
        let solver = PowerOfTwoPdfSolver { max_dimension: 16 };
        let err = plan(&example_budget(), &example_totals(), &solver).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::Precondition(PreconditionViolation::PdfTextureUnsolvable {
                required: 9146
            })
        ));
    }

    #[test]
    fn reservoir_overflow_is_reported() {
        let totals = DerivedTotals {
            reservoir_array_pitch: u32::MAX,
            di_reservoir_buffer_count: u32::MAX,
            ..example_totals()
        };
        // u32::MAX^2 fits in u64, but not once multiplied by the 32-byte stride.
        let err = plan_default(&example_budget(), &totals).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::Precondition(PreconditionViolation::Overflow {
                what: "LightReservoirBuffer"
            })
        ));
    }

    #[test]
    fn total_bytes_overflow_is_reported() {
        // Each reservoir buffer is 2^63 bytes; only their sum overflows.
        let totals = DerivedTotals {
            reservoir_array_pitch: 1 << 31,
            di_reservoir_buffer_count: 1 << 27,
            gi_reservoir_buffer_count: 1 << 27,
            ..example_totals()
        };
        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::Info)
            .try_init();
        let err = plan_default(&example_budget(), &totals).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::Precondition(PreconditionViolation::Overflow {
                what: "total buffer bytes"
            })
        ));
    }

    #[test]
    fn total_bytes_match_buffer_sum() {
        let set = plan_default(&example_budget(), &example_totals()).unwrap();
        let sum: u64 = set.buffers().map(|(_, buffer)| buffer.byte_size()).sum();
        assert_eq!(set.total_buffer_bytes(), sum);
    }

    #[test]
    fn planning_is_deterministic() {
        let a = plan_default(&example_budget(), &example_totals()).unwrap();
        let b = plan_default(&example_budget(), &example_totals()).unwrap();
        assert_eq!(a, b);
    }
}
