//! PDF texture shapes and mip chains.

/// Levels in a full mip chain for a `width x height` texture, down to 1x1.
///
/// `floor(log2(max(width, height))) + 1`; a zero dimension counts as 1.
#[must_use]
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    width.max(height).max(1).ilog2() + 1
}

/// Shape chosen for a PDF texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfTextureSize {
    /// Width of mip 0.
    pub width: u32,
    /// Height of mip 0.
    pub height: u32,
    /// Mip levels, including mip 0.
    pub mip_levels: u32,
}

impl PdfTextureSize {
    /// Texels in mip 0.
    #[must_use]
    pub fn texel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Picks a 2D texture shape holding at least `min_texels` texels, one light
/// per texel.
pub trait PdfTextureSolver {
    /// `None` if no shape within the solver's limits holds `min_texels`.
    fn solve(&self, min_texels: u64) -> Option<PdfTextureSize>;
}

/// Near-square power-of-two shapes with a full mip chain.
///
/// The width is the smallest power of two not below `ceil(sqrt(n))`; the
/// height is the smallest power of two that completes `n` texels at that
/// width. Hierarchical sampling descends the chain two texels per axis, so
/// both dimensions stay powers of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerOfTwoPdfSolver {
    /// Largest width or height the solver may return.
    pub max_dimension: u32,
}

impl Default for PowerOfTwoPdfSolver {
    fn default() -> Self {
        Self {
            max_dimension: wgpu::Limits::default().max_texture_dimension_2d,
        }
    }
}

impl PdfTextureSolver for PowerOfTwoPdfSolver {
    fn solve(&self, min_texels: u64) -> Option<PdfTextureSize> {
        let texels = min_texels.max(1);
        let mut side = texels.isqrt();
        if side * side < texels {
            side += 1;
        }
        let width = side.checked_next_power_of_two()?;
        let height = texels.div_ceil(width).checked_next_power_of_two()?;

        let width = u32::try_from(width).ok()?;
        let height = u32::try_from(height).ok()?;
        if width > self.max_dimension || height > self.max_dimension {
            return None;
        }
        Some(PdfTextureSize {
            width,
            height,
            mip_levels: mip_level_count(width, height),
        })
    }
}
