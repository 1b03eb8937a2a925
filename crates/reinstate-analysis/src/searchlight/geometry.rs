//! Neighborhood shapes, block partitioning, and halo extraction.

use std::ops::Range;

use ndarray::{s, Array3, Array4, ArrayView3, ArrayView4, Axis};
use reinstate_core::types::NeighborhoodShape;

/// `(2r+1)^3` membership mask for a neighborhood shape, centered.
pub fn shape_mask(shape: NeighborhoodShape, radius: usize) -> Array3<bool> {
    let width = 2 * radius + 1;
    let r = radius as i64;
    Array3::from_shape_fn((width, width, width), |(i, j, k)| {
        shape.contains(i as i64 - r, j as i64 - r, k as i64 - r, radius)
    })
}

/// A sub-box of the volume processed by one worker task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub origin: [usize; 3],
    pub extent: [usize; 3],
    /// In-mask centers inside this block, in C order.
    pub centers: Vec<[usize; 3]>,
}

/// Split `mask` into blocks with edges of at most `max_edge` voxels.
/// Blocks containing no in-mask voxel are dropped.
pub fn partition(mask: ArrayView3<'_, bool>, max_edge: usize) -> Vec<Block> {
    let (nx, ny, nz) = mask.dim();
    let edge = max_edge.max(1);
    let mut blocks = Vec::new();
    for x0 in (0..nx).step_by(edge) {
        for y0 in (0..ny).step_by(edge) {
            for z0 in (0..nz).step_by(edge) {
                let extent = [edge.min(nx - x0), edge.min(ny - y0), edge.min(nz - z0)];
                let centers: Vec<[usize; 3]> = mask
                    .slice(s![
                        x0..x0 + extent[0],
                        y0..y0 + extent[1],
                        z0..z0 + extent[2]
                    ])
                    .indexed_iter()
                    .filter(|(_, &inside)| inside)
                    .map(|((i, j, k), _)| [x0 + i, y0 + j, z0 + k])
                    .collect();
                if !centers.is_empty() {
                    blocks.push(Block {
                        origin: [x0, y0, z0],
                        extent,
                        centers,
                    });
                }
            }
        }
    }
    blocks
}

/// Source and destination ranges along one axis when copying a block plus
/// a `radius` halo out of a volume of length `len`. Padded index `p` maps
/// to volume index `origin + p - radius`.
fn axis_overlap(origin: usize, extent: usize, radius: usize, len: usize) -> (Range<usize>, Range<usize>) {
    let lo = origin.saturating_sub(radius);
    let hi = (origin + extent + radius).min(len);
    let dst_lo = lo + radius - origin;
    (lo..hi, dst_lo..dst_lo + (hi - lo))
}

/// Copy a block of a 4-D run plus its halo. Voxels outside the volume are
/// zero.
pub fn padded_run(run: ArrayView4<'_, f64>, block: &Block, radius: usize) -> Array4<f64> {
    let n_samples = run.len_of(Axis(3));
    let dims = [run.len_of(Axis(0)), run.len_of(Axis(1)), run.len_of(Axis(2))];
    let mut padded = Array4::zeros((
        block.extent[0] + 2 * radius,
        block.extent[1] + 2 * radius,
        block.extent[2] + 2 * radius,
        n_samples,
    ));
    let (sx, dx) = axis_overlap(block.origin[0], block.extent[0], radius, dims[0]);
    let (sy, dy) = axis_overlap(block.origin[1], block.extent[1], radius, dims[1]);
    let (sz, dz) = axis_overlap(block.origin[2], block.extent[2], radius, dims[2]);
    padded
        .slice_mut(s![dx, dy, dz, ..])
        .assign(&run.slice(s![sx, sy, sz, ..]));
    padded
}

/// Copy a block of the mask plus its halo. Voxels outside the volume are
/// outside the mask.
pub fn padded_mask(mask: ArrayView3<'_, bool>, block: &Block, radius: usize) -> Array3<bool> {
    let (nx, ny, nz) = mask.dim();
    let mut padded = Array3::from_elem(
        (
            block.extent[0] + 2 * radius,
            block.extent[1] + 2 * radius,
            block.extent[2] + 2 * radius,
        ),
        false,
    );
    let (sx, dx) = axis_overlap(block.origin[0], block.extent[0], radius, nx);
    let (sy, dy) = axis_overlap(block.origin[1], block.extent[1], radius, ny);
    let (sz, dz) = axis_overlap(block.origin[2], block.extent[2], radius, nz);
    padded
        .slice_mut(s![dx, dy, dz])
        .assign(&mask.slice(s![sx, sy, sz]));
    padded
}
