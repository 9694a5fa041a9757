//! Crate-level error types.

use std::fmt;

/// A caller-supplied budget or derived total that cannot be planned.
///
/// These are programmer errors: the planner reports them immediately and
/// never attempts to recover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreconditionViolation {
    /// A quantity that must be strictly positive was zero.
    Zero {
        /// Which input was zero.
        what: &'static str,
    },
    /// An element count or byte size does not fit in 64 bits.
    Overflow {
        /// Which quantity overflowed.
        what: &'static str,
    },
    /// The PDF texture solver returned a shape that cannot hold every light.
    PdfTextureTooSmall {
        /// Width returned by the solver.
        width: u32,
        /// Height returned by the solver.
        height: u32,
        /// Texels that had to fit.
        required: u64,
    },
    /// The PDF texture solver found no shape within its limits.
    PdfTextureUnsolvable {
        /// Texels that had to fit.
        required: u64,
    },
    /// The PDF texture solver returned a mip count that is not a full chain.
    PdfMipChain {
        /// Mip count returned by the solver.
        mip_levels: u32,
        /// Mip count of a full chain for the returned shape.
        expected: u32,
    },
    /// The device lacks features the planned resources need.
    MissingFeatures {
        /// Features the device must have been created with.
        required: wgpu::Features,
    },
    /// The neighbor offset table does not fit in its target buffer.
    NeighborOffsetCapacity {
        /// Requested number of offsets.
        count: u32,
        /// Bytes available in the target.
        capacity: u64,
    },
}

impl fmt::Display for PreconditionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero { what } => write!(f, "{what} must be non-zero"),
            Self::Overflow { what } => write!(f, "{what} overflows"),
            Self::PdfTextureTooSmall {
                width,
                height,
                required,
            } => write!(
                f,
                "PDF texture {width}x{height} cannot hold {required} texels"
            ),
            Self::PdfTextureUnsolvable { required } => {
                write!(f, "no PDF texture shape holds {required} texels")
            }
            Self::PdfMipChain {
                mip_levels,
                expected,
            } => write!(
                f,
                "PDF texture has {mip_levels} mip levels, full chain needs \
                 {expected}"
            ),
            Self::MissingFeatures { required } => {
                write!(f, "device was not created with required features {required:?}")
            }
            Self::NeighborOffsetCapacity { count, capacity } => write!(
                f,
                "{count} neighbor offsets do not fit in {capacity} bytes"
            ),
        }
    }
}

/// Errors produced by the restir-resources crate.
#[derive(Debug)]
pub enum ResourceError {
    /// Invalid budget, derived total, or offset count.
    Precondition(PreconditionViolation),
    /// The device refused to create a buffer or texture.
    ResourceCreation(wgpu::Error),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Precondition(v) => write!(f, "precondition violated: {v}"),
            Self::ResourceCreation(e) => {
                write!(f, "GPU resource creation failed: {e}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ResourceCreation(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Precondition(_) | Self::OptionsParse(_) => None,
        }
    }
}

impl From<PreconditionViolation> for ResourceError {
    fn from(v: PreconditionViolation) -> Self {
        Self::Precondition(v)
    }
}

impl From<wgpu::Error> for ResourceError {
    fn from(e: wgpu::Error) -> Self {
        Self::ResourceCreation(e)
    }
}

impl From<std::io::Error> for ResourceError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
