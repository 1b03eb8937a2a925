//! Searchlight driver: distribute, broadcast, run.

use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::{s, Array3, Array4, Axis, Zip};
use rayon::prelude::*;
use reinstate_core::config::SearchlightConfig;
use reinstate_core::errors::SearchlightError;
use reinstate_core::events::{BlockCompleteEvent, EventDispatcher};
use reinstate_core::tracing::metrics;
use reinstate_core::types::NeighborhoodShape;

use super::geometry::{padded_mask, padded_run, partition, shape_mask, Block};
use super::neighborhood::{Neighborhood, SearchlightKernel};

/// Geometry of a searchlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchlightParams {
    pub radius: usize,
    pub max_block_edge: usize,
    pub shape: NeighborhoodShape,
}

impl Default for SearchlightParams {
    fn default() -> Self {
        Self::from_config(&SearchlightConfig::default())
    }
}

impl SearchlightParams {
    pub fn from_config(config: &SearchlightConfig) -> Self {
        Self {
            radius: config.effective_radius(),
            max_block_edge: config.effective_max_block_edge(),
            shape: config.effective_shape(),
        }
    }

    fn validate(&self) -> Result<(), SearchlightError> {
        if self.radius == 0 {
            return Err(SearchlightError::InvalidParameter {
                field: "radius",
                message: "must be at least 1".to_string(),
            });
        }
        if self.max_block_edge == 0 {
            return Err(SearchlightError::InvalidParameter {
                field: "max_block_edge",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Neighborhood edge length, `2r + 1`.
    pub fn width(&self) -> usize {
        2 * self.radius + 1
    }
}

/// A searchlight over one set of co-registered runs.
///
/// Each distributed run is a `x × y × z × samples` array sharing the mask's
/// spatial shape. The broadcast context is set once and never mutated.
#[derive(Debug)]
pub struct Searchlight<C> {
    params: SearchlightParams,
    shape_mask: Array3<bool>,
    runs: Vec<Array4<f64>>,
    mask: Option<Array3<bool>>,
    context: Option<C>,
    events: EventDispatcher,
}

impl<C: Sync> Searchlight<C> {
    pub fn new(params: SearchlightParams) -> Result<Self, SearchlightError> {
        params.validate()?;
        Ok(Self {
            params,
            shape_mask: shape_mask(params.shape, params.radius),
            runs: Vec::new(),
            mask: None,
            context: None,
            events: EventDispatcher::new(),
        })
    }

    /// Attach an event dispatcher for block progress.
    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    pub fn params(&self) -> &SearchlightParams {
        &self.params
    }

    /// Hand the runs and the searchlight mask to the driver. Centers are
    /// the voxels where `mask` is true.
    pub fn distribute(
        &mut self,
        runs: Vec<Array4<f64>>,
        mask: Array3<bool>,
    ) -> Result<(), SearchlightError> {
        if runs.is_empty() {
            return Err(SearchlightError::NoRuns);
        }
        let (mx, my, mz) = mask.dim();
        let expected = [mx, my, mz];
        for (i, run) in runs.iter().enumerate() {
            let found = [
                run.len_of(Axis(0)),
                run.len_of(Axis(1)),
                run.len_of(Axis(2)),
            ];
            if found != expected {
                return Err(SearchlightError::ShapeMismatch {
                    run: i,
                    expected,
                    found,
                });
            }
        }
        tracing::debug!(
            runs = runs.len(),
            centers = mask.iter().filter(|m| **m).count(),
            "searchlight data distributed"
        );
        self.runs = runs;
        self.mask = Some(mask);
        Ok(())
    }

    /// Make `context` available to every kernel invocation. Only one
    /// broadcast is allowed.
    pub fn broadcast(&mut self, context: C) -> Result<(), SearchlightError> {
        if self.context.is_some() {
            return Err(SearchlightError::AlreadyBroadcast);
        }
        self.context = Some(context);
        Ok(())
    }

    /// Apply `kernel` at every in-mask center using `pool_size` workers.
    ///
    /// The result has the mask's shape: `Some(output)` at every center,
    /// `None` everywhere else. Any kernel error aborts the run.
    pub fn run_searchlight<K>(
        &self,
        kernel: &K,
        pool_size: usize,
    ) -> Result<Array3<Option<K::Output>>, SearchlightError>
    where
        K: SearchlightKernel<Context = C>,
    {
        let mask = self.mask.as_ref().ok_or(SearchlightError::NotDistributed)?;
        let context = self.context.as_ref().ok_or(SearchlightError::NotBroadcast)?;

        let blocks = partition(mask.view(), self.params.max_block_edge);
        let total_blocks = blocks.len();
        let completed = AtomicUsize::new(0);
        tracing::info!(
            { metrics::BLOCK_COUNT } = total_blocks,
            { metrics::POOL_SIZE } = pool_size,
            "running searchlight"
        );

        let process = |block: &Block| {
            let outputs = self.process_block(kernel, context, mask, block)?;
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            self.events.emit_block_complete(&BlockCompleteEvent {
                completed_blocks: done,
                total_blocks,
                neighborhoods: outputs.len(),
            });
            Ok::<_, SearchlightError>(outputs)
        };

        let per_block = if pool_size <= 1 {
            blocks.iter().map(process).collect::<Result<Vec<_>, _>>()?
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(pool_size)
                .build()
                .map_err(|e| SearchlightError::ThreadPool(e.to_string()))?;
            pool.install(|| blocks.par_iter().map(process).collect::<Result<Vec<_>, _>>())?
        };

        let mut results = Array3::from_shape_simple_fn(mask.dim(), || None);
        for (center, output) in per_block.into_iter().flatten() {
            results[center] = Some(output);
        }
        Ok(results)
    }

    fn process_block<K>(
        &self,
        kernel: &K,
        context: &C,
        mask: &Array3<bool>,
        block: &Block,
    ) -> Result<Vec<([usize; 3], K::Output)>, SearchlightError>
    where
        K: SearchlightKernel<Context = C>,
    {
        let radius = self.params.radius;
        let width = self.params.width();
        let (_, ny, nz) = mask.dim();

        let runs: Vec<Array4<f64>> = self
            .runs
            .iter()
            .map(|run| padded_run(run.view(), block, radius))
            .collect();
        let block_mask = padded_mask(mask.view(), block, radius);

        let mut outputs = Vec::with_capacity(block.centers.len());
        for &center in &block.centers {
            let x = center[0] - block.origin[0];
            let y = center[1] - block.origin[1];
            let z = center[2] - block.origin[2];

            let windows = runs
                .iter()
                .map(|run| run.slice(s![x..x + width, y..y + width, z..z + width, ..]))
                .collect();
            let neighborhood_mask = Zip::from(block_mask.slice(s![
                x..x + width,
                y..y + width,
                z..z + width
            ]))
            .and(&self.shape_mask)
            .map_collect(|&in_brain, &in_shape| in_brain && in_shape);

            let linear_index = (center[0] * ny + center[1]) * nz + center[2];
            let neighborhood = Neighborhood::new(center, linear_index, windows, neighborhood_mask);
            let output = kernel
                .apply(&neighborhood, context)
                .map_err(|source| SearchlightError::Kernel { center, source })?;
            outputs.push((center, output));
        }
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reinstate_core::errors::KernelError;

    /// Reports the neighborhood's voxel count plus a broadcast offset.
    struct CountingKernel;

    impl SearchlightKernel for CountingKernel {
        type Context = usize;
        type Output = usize;

        fn apply(&self, neighborhood: &Neighborhood<'_>, context: &usize) -> Result<usize, KernelError> {
            Ok(neighborhood.voxel_count() + context)
        }
    }

    fn params(radius: usize, edge: usize) -> SearchlightParams {
        SearchlightParams {
            radius,
            max_block_edge: edge,
            shape: NeighborhoodShape::Cube,
        }
    }

    #[test]
    fn test_run_requires_distribute_and_broadcast() {
        let mut sl: Searchlight<usize> = Searchlight::new(params(1, 2)).unwrap();
        assert!(matches!(
            sl.run_searchlight(&CountingKernel, 1),
            Err(SearchlightError::NotDistributed)
        ));
        sl.distribute(vec![Array4::zeros((3, 3, 3, 2))], Array3::from_elem((3, 3, 3), true))
            .unwrap();
        assert!(matches!(
            sl.run_searchlight(&CountingKernel, 1),
            Err(SearchlightError::NotBroadcast)
        ));
        sl.broadcast(0).unwrap();
        assert!(matches!(sl.broadcast(1), Err(SearchlightError::AlreadyBroadcast)));
    }

    #[test]
    fn test_distribute_rejects_mismatched_runs() {
        let mut sl: Searchlight<usize> = Searchlight::new(params(1, 2)).unwrap();
        let err = sl
            .distribute(
                vec![Array4::zeros((3, 3, 3, 2)), Array4::zeros((3, 3, 4, 2))],
                Array3::from_elem((3, 3, 3), true),
            )
            .unwrap_err();
        assert!(matches!(err, SearchlightError::ShapeMismatch { run: 1, .. }));
        assert!(matches!(
            sl.distribute(Vec::new(), Array3::from_elem((3, 3, 3), true)),
            Err(SearchlightError::NoRuns)
        ));
    }

    #[test]
    fn test_zero_radius_rejected() {
        assert!(Searchlight::<usize>::new(params(0, 2)).is_err());
    }

    #[test]
    fn test_outputs_only_at_centers() {
        let mut mask = Array3::from_elem((4, 4, 4), false);
        mask[[0, 0, 0]] = true;
        mask[[1, 1, 1]] = true;
        let mut sl = Searchlight::new(params(1, 2)).unwrap();
        sl.distribute(vec![Array4::zeros((4, 4, 4, 1))], mask).unwrap();
        sl.broadcast(100).unwrap();
        let results = sl.run_searchlight(&CountingKernel, 1).unwrap();

        // The corner neighborhood sees only the two in-mask voxels.
        assert_eq!(results[[0, 0, 0]], Some(102));
        assert_eq!(results[[1, 1, 1]], Some(102));
        assert_eq!(results.iter().filter(|r| r.is_some()).count(), 2);
    }

    #[test]
    fn test_pool_size_does_not_change_results() {
        let mask = Array3::from_shape_fn((6, 5, 4), |(i, j, k)| (i + j + k) % 3 != 0);
        let run = Array4::zeros((6, 5, 4, 1));

        let mut serial = Searchlight::new(params(1, 2)).unwrap();
        serial.distribute(vec![run.clone()], mask.clone()).unwrap();
        serial.broadcast(0).unwrap();

        let mut parallel = Searchlight::new(params(1, 2)).unwrap();
        parallel.distribute(vec![run], mask).unwrap();
        parallel.broadcast(0).unwrap();

        assert_eq!(
            serial.run_searchlight(&CountingKernel, 1).unwrap(),
            parallel.run_searchlight(&CountingKernel, 3).unwrap()
        );
    }
}
