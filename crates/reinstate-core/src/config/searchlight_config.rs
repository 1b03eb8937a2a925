//! Searchlight configuration.

use serde::{Deserialize, Serialize};

use crate::types::NeighborhoodShape;

/// Neighborhood geometry and worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchlightConfig {
    /// Neighborhood radius in voxels. Default: 3.
    pub radius: Option<usize>,
    /// Maximum partition block edge in voxels. Default: 5.
    pub max_block_edge: Option<usize>,
    /// Worker pool size. Default: 1.
    pub pool_size: Option<usize>,
    /// Neighborhood shape. Default: cube.
    pub shape: Option<NeighborhoodShape>,
    /// Minimum in-mask voxels for a neighborhood to be scored. Default: 50.
    pub min_voxels: Option<usize>,
}

impl SearchlightConfig {
    pub fn effective_radius(&self) -> usize {
        self.radius.unwrap_or(3)
    }

    pub fn effective_max_block_edge(&self) -> usize {
        self.max_block_edge.unwrap_or(5)
    }

    pub fn effective_pool_size(&self) -> usize {
        self.pool_size.unwrap_or(1)
    }

    pub fn effective_shape(&self) -> NeighborhoodShape {
        self.shape.unwrap_or_default()
    }

    pub fn effective_min_voxels(&self) -> usize {
        self.min_voxels.unwrap_or(50)
    }

    pub(crate) fn merge_from(&mut self, other: &Self) {
        if other.radius.is_some() {
            self.radius = other.radius;
        }
        if other.max_block_edge.is_some() {
            self.max_block_edge = other.max_block_edge;
        }
        if other.pool_size.is_some() {
            self.pool_size = other.pool_size;
        }
        if other.shape.is_some() {
            self.shape = other.shape;
        }
        if other.min_voxels.is_some() {
            self.min_voxels = other.min_voxels;
        }
    }
}
