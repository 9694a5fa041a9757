//! Device allocation of a [`BufferPlanSet`].
//!
//! [`RestirResources`] owns every buffer and texture of one plan. Dropping
//! it releases them; there is no resize path, a new budget means a new
//! plan and a new `RestirResources`.

use crate::error::{PreconditionViolation, ResourceError};
use crate::gpu::neighbor_offsets::{
    InitOutcome, NeighborOffsetGenerator, NeighborOffsetTable, QueueUpload,
    R2NeighborOffsets,
};
use crate::layout::{BufferId, BufferPlan, BufferPlanSet, TextureId, TexturePlan};

struct PdfTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// Every GPU resource of one [`BufferPlanSet`], plus the neighbor offset
/// table that lives in [`BufferId::NeighborOffsets`].
pub struct RestirResources {
    plan: BufferPlanSet,
    buffers: [wgpu::Buffer; BufferId::COUNT],
    textures: [PdfTexture; TextureId::COUNT],
    neighbor_offsets: NeighborOffsetTable,
}

/// Allocation size for a plan: never zero, whole words.
fn allocation_size(plan: &BufferPlan) -> u64 {
    plan.byte_size()
        .max(1)
        .next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT)
}

fn create_buffer(device: &wgpu::Device, id: BufferId, plan: &BufferPlan) -> wgpu::Buffer {
    let size = allocation_size(plan);
    log::debug!(
        "{}: {} x {} B = {} B, {:?} texels ({:?})",
        id.label(),
        plan.element_count,
        plan.element_size,
        size,
        plan.typed_view_len(),
        plan.initial_state,
    );
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(id.label()),
        size,
        usage: wgpu::BufferUsages::STORAGE
            | wgpu::BufferUsages::COPY_DST
            | wgpu::BufferUsages::COPY_SRC,
        mapped_at_creation: false,
    })
}

fn create_texture(device: &wgpu::Device, id: TextureId, plan: &TexturePlan) -> PdfTexture {
    log::debug!(
        "{}: {}x{} {:?}, {} mips",
        id.label(),
        plan.width,
        plan.height,
        plan.format,
        plan.mip_levels,
    );
    let texture = device.create_texture(&plan.descriptor(id.label()));
    let view = texture.create_view(&wgpu::TextureViewDescriptor {
        label: Some(id.label()),
        ..Default::default()
    });
    PdfTexture { texture, view }
}

impl RestirResources {
    /// Device features to request before calling [`Self::new`].
    ///
    /// The environment PDF is an `R16Float` storage texture, which core
    /// WebGPU does not allow. The adapter must also report
    /// `STORAGE_BINDING` for `R16Float` in its format features.
    #[must_use]
    pub const fn required_features() -> wgpu::Features {
        wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES
    }

    /// Create every buffer and texture in `plan` on `device`.
    ///
    /// Creation is wrapped in validation and out-of-memory error scopes. The
    /// first error the device reports is returned as-is; nothing is retried
    /// or shrunk.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Precondition`] if `device` was created
    /// without [`Self::required_features`], before anything is created.
    /// Returns [`ResourceError::ResourceCreation`] if the device refuses any
    /// resource. The partially created handles are dropped.
    pub async fn new(
        device: &wgpu::Device,
        plan: BufferPlanSet,
    ) -> Result<Self, ResourceError> {
        let required = Self::required_features();
        if !device.features().contains(required) {
            return Err(PreconditionViolation::MissingFeatures { required }.into());
        }

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let buffers = BufferId::ALL.map(|id| create_buffer(device, id, plan.buffer(id)));
        let textures =
            TextureId::ALL.map(|id| create_texture(device, id, plan.texture(id)));

        let validation = device.pop_error_scope().await;
        let out_of_memory = device.pop_error_scope().await;
        if let Some(error) = validation.or(out_of_memory) {
            log::error!("GPU resource creation failed: {error}");
            return Err(ResourceError::ResourceCreation(error));
        }

        let allocated: u64 = buffers.iter().map(wgpu::Buffer::size).sum();
        log::info!(
            "allocated {} buffers ({} bytes) and {} PDF textures",
            BufferId::COUNT,
            allocated,
            TextureId::COUNT,
        );

        Ok(Self {
            plan,
            buffers,
            textures,
            neighbor_offsets: NeighborOffsetTable::new(),
        })
    }

    /// The plan these resources were created from.
    #[must_use]
    pub const fn plan(&self) -> &BufferPlanSet {
        &self.plan
    }

    /// One buffer.
    #[must_use]
    pub const fn buffer(&self, id: BufferId) -> &wgpu::Buffer {
        &self.buffers[id.index()]
    }

    /// One PDF texture.
    #[must_use]
    pub const fn texture(&self, id: TextureId) -> &wgpu::Texture {
        &self.textures[id.index()].texture
    }

    /// Full-chain view of one PDF texture.
    #[must_use]
    pub const fn texture_view(&self, id: TextureId) -> &wgpu::TextureView {
        &self.textures[id.index()].view
    }

    /// Whole-buffer binding for bind group setup.
    #[must_use]
    pub fn binding_resource(&self, id: BufferId) -> wgpu::BindingResource<'_> {
        self.buffer(id).as_entire_binding()
    }

    /// Compute-stage layout entry for `id` at `binding`, read-only or
    /// read-write according to the plan.
    #[must_use]
    pub fn layout_entry(&self, id: BufferId, binding: u32) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: self.plan.buffer(id).binding_type(),
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }
    }

    /// The neighbor offset table (empty until initialized).
    #[must_use]
    pub const fn neighbor_offsets(&self) -> &NeighborOffsetTable {
        &self.neighbor_offsets
    }

    /// Fill the neighbor offset buffer with the R2 pattern on first call.
    /// The upload is enqueued on `queue` and lands with the next submit.
    ///
    /// # Errors
    ///
    /// See [`NeighborOffsetTable::ensure_initialized`].
    pub fn initialize_neighbor_offsets(
        &mut self,
        queue: &wgpu::Queue,
        count: u32,
    ) -> Result<InitOutcome, ResourceError> {
        self.initialize_neighbor_offsets_with(queue, count, &R2NeighborOffsets)
    }

    /// [`Self::initialize_neighbor_offsets`] with a custom generator.
    ///
    /// # Errors
    ///
    /// See [`NeighborOffsetTable::ensure_initialized`].
    pub fn initialize_neighbor_offsets_with(
        &mut self,
        queue: &wgpu::Queue,
        count: u32,
        generator: &impl NeighborOffsetGenerator,
    ) -> Result<InitOutcome, ResourceError> {
        let buffer = &self.buffers[BufferId::NeighborOffsets.index()];
        let mut sink = QueueUpload::new(queue, buffer);
        self.neighbor_offsets
            .ensure_initialized(&mut sink, count, generator)
    }
}
