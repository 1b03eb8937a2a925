//! reinstate-analysis: searchlight reinstatement analysis engine.
//!
//! Leaves first:
//! - `stats`: NaN-aware moments and the Pearson correlation primitive
//! - `segmentation`: continuous voxel × time series → trial × voxel patterns
//! - `bootstrap`: summed-difference bootstrap z-scores
//! - `threshold`: label filter + mean/stddev threshold on correlation matrices
//! - `scoring`: corrected and uncorrected reinstatement scoring
//! - `kernel`: per-neighborhood adapter (mask, guard, segment, score)
//! - `searchlight`: partition, broadcast, and parallel run over neighborhoods
//! - `assembly`: per-label result volumes from the searchlight output grid
//! - `volume`: NIfTI storage, resampling, and run preprocessing
//! - `inputs` / `pipeline`: per-subject input resolution and the end-to-end run

pub mod assembly;
pub mod bootstrap;
pub mod inputs;
pub mod kernel;
pub mod pipeline;
pub mod scoring;
pub mod searchlight;
pub mod segmentation;
pub mod stats;
pub mod threshold;
pub mod volume;

pub use assembly::{assemble_outcome_volumes, OutcomeTally, OutcomeVolume};
pub use bootstrap::{bootstrap_summed_difference, BootstrapEstimate};
pub use inputs::SubjectInputs;
pub use kernel::{NeighborhoodKernel, SearchlightContext};
pub use pipeline::{RunSummary, SubjectPipeline};
pub use scoring::{NeighborhoodOutcome, NeighborhoodScores, ReinstatementScorer, ScorerConfig};
pub use searchlight::{Neighborhood, Searchlight, SearchlightKernel, SearchlightParams};
pub use segmentation::TrialSegmenter;
pub use threshold::ThresholdedCorrelationSet;
pub use volume::{NearestNeighbourResampler, NiftiStore, Resampler, Volume3, Volume4, VolumeStore};
