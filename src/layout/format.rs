//! Element formats, access capabilities, and initial residency states.

/// Texel format of a typed buffer view or a PDF texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementFormat {
    /// Two signed-normalized 8-bit channels.
    Rg8Snorm,
    /// One 16-bit float channel.
    R16Float,
    /// One 32-bit float channel.
    R32Float,
    /// One 32-bit unsigned channel.
    R32Uint,
    /// One 32-bit signed channel.
    R32Sint,
    /// Two 32-bit unsigned channels.
    Rg32Uint,
    /// Four 32-bit unsigned channels.
    Rgba32Uint,
}

impl ElementFormat {
    /// Bytes per texel.
    #[must_use]
    pub const fn texel_size(self) -> u32 {
        match self {
            Self::Rg8Snorm | Self::R16Float => 2,
            Self::R32Float | Self::R32Uint | Self::R32Sint => 4,
            Self::Rg32Uint => 8,
            Self::Rgba32Uint => 16,
        }
    }

    /// The matching wgpu texture format.
    #[must_use]
    pub const fn to_wgpu(self) -> wgpu::TextureFormat {
        match self {
            Self::Rg8Snorm => wgpu::TextureFormat::Rg8Snorm,
            Self::R16Float => wgpu::TextureFormat::R16Float,
            Self::R32Float => wgpu::TextureFormat::R32Float,
            Self::R32Uint => wgpu::TextureFormat::R32Uint,
            Self::R32Sint => wgpu::TextureFormat::R32Sint,
            Self::Rg32Uint => wgpu::TextureFormat::Rg32Uint,
            Self::Rgba32Uint => wgpu::TextureFormat::Rgba32Uint,
        }
    }
}

/// Read/write capabilities requested for a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferAccess {
    /// Shaders may write to the buffer.
    pub uav: bool,
}

impl BufferAccess {
    /// Shaders only read the buffer.
    pub const READ_ONLY: Self = Self { uav: false };
    /// Shaders read and write the buffer.
    pub const READ_WRITE: Self = Self { uav: true };
}

/// State a resource is kept in between passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialState {
    /// Read by shaders; written only by dedicated passes.
    ShaderResource,
    /// Read and written by shaders every frame.
    UnorderedAccess,
}
