//! Searchlight neighborhood shapes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which offsets within the `(2r+1)^3` cube belong to a neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighborhoodShape {
    /// Every offset in the cube.
    #[default]
    Cube,
    /// Offsets within Euclidean distance `r`.
    Ball,
    /// Offsets within Manhattan distance `r`.
    Diamond,
}

impl NeighborhoodShape {
    /// Whether offset `(dx, dy, dz)` from the center lies inside the shape.
    pub fn contains(&self, dx: i64, dy: i64, dz: i64, radius: usize) -> bool {
        let r = radius as i64;
        match self {
            Self::Cube => dx.abs() <= r && dy.abs() <= r && dz.abs() <= r,
            Self::Ball => dx * dx + dy * dy + dz * dz <= r * r,
            Self::Diamond => dx.abs() + dy.abs() + dz.abs() <= r,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cube => "cube",
            Self::Ball => "ball",
            Self::Diamond => "diamond",
        }
    }
}

impl FromStr for NeighborhoodShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cube" => Ok(Self::Cube),
            "ball" => Ok(Self::Ball),
            "diamond" => Ok(Self::Diamond),
            other => Err(format!("unknown neighborhood shape '{other}'")),
        }
    }
}
