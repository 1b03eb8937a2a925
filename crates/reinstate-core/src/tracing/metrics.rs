//! Structured span field definitions.
//!
//! Standard field names used in tracing spans and events across the
//! pipeline, so log queries can rely on them.

/// Subject identifier (`sub-141`).
pub const SUBJECT: &str = "subject";

/// Analysis type (`trialwise_recognition`).
pub const ANALYSIS: &str = "analysis";

/// Searchlight phase name (distribute, broadcast, run, collect, persist).
pub const PHASE: &str = "phase";

/// Searchlight: number of in-mask neighborhood centers.
pub const NEIGHBORHOOD_COUNT: &str = "neighborhood_count";

/// Searchlight: neighborhoods skipped for too few in-mask voxels.
pub const SKIPPED_COUNT: &str = "skipped_count";

/// Searchlight: number of partition blocks dispatched.
pub const BLOCK_COUNT: &str = "block_count";

/// Searchlight: worker pool size.
pub const POOL_SIZE: &str = "pool_size";

/// Whole subject run duration in milliseconds.
pub const RUN_DURATION_MS: &str = "run_duration_ms";

/// Persistence: output file path.
pub const OUTPUT_PATH: &str = "output_path";
