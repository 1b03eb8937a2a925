//! Searchlight engine: partition a masked volume into blocks, hand each
//! in-mask center's neighborhood to a kernel, and reassemble the results
//! in the original voxel grid.
//!
//! Phases run in order: `distribute` (runs + mask), `broadcast` (shared
//! read-only context), `run_searchlight` (parallel over blocks). The
//! driver is the coordinator; workers only ever see `Neighborhood` views.

pub mod driver;
pub mod geometry;
pub mod neighborhood;

pub use driver::{Searchlight, SearchlightParams};
pub use geometry::{partition, shape_mask, Block};
pub use neighborhood::{Neighborhood, SearchlightKernel};
