//! What a kernel sees for one searchlight center.

use ndarray::{Array3, ArrayView3, ArrayView4};
use reinstate_core::errors::KernelError;

/// One neighborhood: the `(2r+1)^3` window of every distributed run
/// around `center`, and the window's membership mask (brain mask ∩
/// neighborhood shape).
#[derive(Debug)]
pub struct Neighborhood<'a> {
    center: [usize; 3],
    linear_index: usize,
    runs: Vec<ArrayView4<'a, f64>>,
    mask: Array3<bool>,
}

impl<'a> Neighborhood<'a> {
    pub fn new(
        center: [usize; 3],
        linear_index: usize,
        runs: Vec<ArrayView4<'a, f64>>,
        mask: Array3<bool>,
    ) -> Self {
        Self {
            center,
            linear_index,
            runs,
            mask,
        }
    }

    /// Center voxel in volume coordinates.
    pub fn center(&self) -> [usize; 3] {
        self.center
    }

    /// C-order index of the center within the volume. Stable across
    /// block layouts and worker counts.
    pub fn linear_index(&self) -> usize {
        self.linear_index
    }

    /// Run windows in distribution order, each `w × w × w × samples`.
    pub fn runs(&self) -> &[ArrayView4<'a, f64>] {
        &self.runs
    }

    pub fn mask(&self) -> ArrayView3<'_, bool> {
        self.mask.view()
    }

    /// Number of voxels inside the neighborhood mask.
    pub fn voxel_count(&self) -> usize {
        self.mask.iter().filter(|m| **m).count()
    }
}

/// Per-neighborhood computation plugged into the searchlight driver.
///
/// Implementations must be pure functions of the neighborhood and the
/// broadcast context. A returned error aborts the whole run.
pub trait SearchlightKernel: Sync {
    /// Read-only state shared by every invocation.
    type Context: Sync;
    type Output: Send;

    fn apply(
        &self,
        neighborhood: &Neighborhood<'_>,
        context: &Self::Context,
    ) -> Result<Self::Output, KernelError>;
}
