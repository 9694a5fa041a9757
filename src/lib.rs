// Crate-wide lint policy.
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
#![deny(unused_results)]
#![deny(unused_qualifications)]
#![deny(trivial_numeric_casts)]

//! GPU memory layout planning for a stochastic light-resampling renderer.
//!
//! Sizes, formats, and initial states of every buffer and texture used by
//! ReSTIR DI, ReSTIR GI, directional ReGIR, and the GSGI/PMGI virtual-light
//! techniques, derived from a [`layout::SceneBudget`] and the totals the
//! host's RIS allocator and reservoir context supply.
//!
//! # Key entry points
//!
//! - [`layout::plan`] - the pure planner, producing a [`layout::BufferPlanSet`]
//! - [`gpu::RestirResources`] - allocates a plan on a wgpu device
//! - [`gpu::NeighborOffsetTable`] - the one-shot spatial reuse offset table
//! - [`options::Options`] - TOML-backed budget and sampling configuration
//!
//! # Example
//!
//! ```no_run
//! use restir_resources::gpu::RestirResources;
//! use restir_resources::layout::{self, DerivedTotals, SceneBudget};
//!
//! // `device` was created with `RestirResources::required_features()`.
//! # async fn setup(device: &wgpu::Device, queue: &wgpu::Queue)
//! #     -> Result<(), restir_resources::ResourceError> {
//! let budget = SceneBudget {
//!     max_emissive_triangles: 5000,
//!     environment_map_width: 512,
//!     environment_map_height: 256,
//!     ..SceneBudget::default()
//! };
//! let totals = DerivedTotals::new(8192, 1920 * 1080);
//! let plan = layout::plan_default(&budget, &totals)?;
//! let count = totals.neighbor_offset_count;
//! let mut resources = RestirResources::new(device, plan).await?;
//! let _ = resources.initialize_neighbor_offsets(queue, count)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod gpu;
pub mod layout;
pub mod options;

pub use error::{PreconditionViolation, ResourceError};
pub use layout::{plan, plan_default, BufferId, BufferPlanSet, TextureId};
