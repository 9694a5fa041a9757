//! Device-side resources.
//!
//! Allocates a planned layout on a wgpu device, uploads the neighbor offset
//! table, and builds the per-technique constant records.

/// One-shot neighbor offset table and its upload path.
pub mod neighbor_offsets;
/// Constant-buffer records for GSGI, PMGI, and virtual lights.
pub mod params;
/// Owned buffers and textures for one plan.
pub mod resources;
#[cfg(test)]
mod test_support;

pub use neighbor_offsets::{
    InitOutcome, NeighborOffsetGenerator, NeighborOffsetTable, OffsetSink,
    QueueUpload, R2NeighborOffsets,
};
pub use params::{GsgiParameters, PmgiParameters, VirtualLightParameters};
pub use resources::RestirResources;
