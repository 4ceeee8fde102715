//! Corner-proximity check deciding whether the cube covers the target.

use glam::Vec3;

use crate::transform::BoxTransform;

/// Which (cube corner, target corner) pairs lie within the match threshold.
///
/// Indexed as `pairs[cube_corner][target_corner]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageGrid {
    pairs: [[bool; 8]; 8],
}

impl CoverageGrid {
    pub fn between(cube: &[Vec3; 8], target: &[Vec3; 8], threshold: f32) -> Self {
        let mut grid = Self::default();
        for (i, cube_corner) in cube.iter().enumerate() {
            for (j, target_corner) in target.iter().enumerate() {
                grid.pairs[i][j] = cube_corner.distance(*target_corner) < threshold;
            }
        }
        grid
    }

    /// A target corner is covered when any cube corner is close to it.
    pub fn is_target_covered(&self, target_corner: usize) -> bool {
        self.pairs.iter().any(|row| row[target_corner])
    }

    pub fn all_targets_covered(&self) -> bool {
        (0..8).all(|j| self.is_target_covered(j))
    }
}

#[cfg(test)]
impl CoverageGrid {
    fn is_pair_covered(&self, cube_corner: usize, target_corner: usize) -> bool {
        self.pairs[cube_corner][target_corner]
    }

    fn covered_targets(&self) -> usize {
        (0..8).filter(|&j| self.is_target_covered(j)).count()
    }
}

/// True when every target corner has a cube corner within `threshold`.
pub fn matches(cube: &BoxTransform, target: &BoxTransform, threshold: f32) -> bool {
    CoverageGrid::between(&cube.world_corners(), &target.world_corners(), threshold)
        .all_targets_covered()
}
