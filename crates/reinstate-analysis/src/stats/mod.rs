//! Statistical primitives shared by the scoring pipeline.

pub mod correlation;
pub mod moments;

pub use correlation::correlate_columns;
pub use moments::{finite_values, nan_mean, nan_population_std};
