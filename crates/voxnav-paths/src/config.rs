//! Search tuning and per-search parameters.

use voxnav_core::{BlockPos, Vec3};

use crate::distance::{self, ORTHOGONAL_COST};

/// Default number of expansions per unit of step budget.
pub const CALCULATIONS_PER_STEP: u32 = 5;

/// Heuristic used to estimate the remaining cost.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Distance {
    /// Straight-line distance. Slower, keeps paths shortest.
    #[default]
    Euclidean,
    /// Axis sum. Cheaper to expand, may overestimate around diagonals.
    Manhattan,
}

impl Distance {
    /// Scaled estimate from `from` to `to`, in step-cost units.
    pub fn estimate(self, from: BlockPos, to: BlockPos) -> i32 {
        match self {
            Self::Euclidean => (distance::euclidean(from, to) * ORTHOGONAL_COST as f64) as i32,
            Self::Manhattan => distance::manhattan(from, to) * ORTHOGONAL_COST,
        }
    }
}

/// Knobs shared by every search.
///
/// Only `Euclidean` without `greedy` guarantees the shortest path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Expansions allowed per unit of a request's `max_steps`.
    pub calculations_per_step: u32,
    pub distance: Distance,
    /// Rank cells by `h` alone (greedy best-first) instead of `g + h`.
    pub greedy: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            calculations_per_step: CALCULATIONS_PER_STEP,
            distance: Distance::Euclidean,
            greedy: false,
        }
    }
}

impl SearchConfig {
    /// The `f` value for a cell with the given `g` and `h`.
    #[inline]
    pub fn score(&self, g: i32, h: i32) -> i32 {
        if self.greedy { h } else { g + h }
    }
}

/// What to search for and how much work it may take.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathRequest {
    pub start: Vec3,
    pub end: Vec3,
    /// Step budget; the expansion cap is this times
    /// [`SearchConfig::calculations_per_step`].
    pub max_steps: u32,
    // Reserved for a movement envelope; the search currently uses fixed
    // one-block step rules.
    pub bounding_box_width: f64,
    pub bounding_box_height: f64,
    pub max_step_up: i32,
    pub max_step_down: i32,
}

impl PathRequest {
    /// A request with a one-block-wide, two-block-tall envelope that can
    /// climb and drop one block.
    pub fn new(start: Vec3, end: Vec3, max_steps: u32) -> Self {
        Self {
            start,
            end,
            max_steps,
            bounding_box_width: 1.0,
            bounding_box_height: 2.0,
            max_step_up: 1,
            max_step_down: 1,
        }
    }

    /// Convenience constructor from block positions.
    pub fn between(start: BlockPos, end: BlockPos, max_steps: u32) -> Self {
        Self::new(start.into(), end.into(), max_steps)
    }

    /// The block the search starts from.
    #[inline]
    pub fn source(&self) -> BlockPos {
        self.start.floor()
    }

    /// The block the search heads toward.
    #[inline]
    pub fn destination(&self) -> BlockPos {
        self.end.floor()
    }

    /// Expansion cap for one budgeted run.
    #[inline]
    pub fn budget(&self, config: &SearchConfig) -> u32 {
        config.calculations_per_step.saturating_mul(self.max_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_estimate_truncates() {
        let d = Distance::Euclidean;
        assert_eq!(d.estimate(BlockPos::ZERO, BlockPos::new(3, 0, 4)), 50);
        // sqrt(2) * 10 = 14.14...
        assert_eq!(d.estimate(BlockPos::ZERO, BlockPos::new(1, 0, 1)), 14);
        assert_eq!(d.estimate(BlockPos::new(2, 2, 2), BlockPos::new(2, 2, 2)), 0);
    }

    #[test]
    fn manhattan_estimate_sums_axes() {
        let d = Distance::Manhattan;
        assert_eq!(d.estimate(BlockPos::ZERO, BlockPos::new(1, -2, 3)), 60);
    }

    #[test]
    fn greedy_score_ignores_g() {
        let astar = SearchConfig::default();
        let greedy = SearchConfig {
            greedy: true,
            ..SearchConfig::default()
        };
        assert_eq!(astar.score(30, 20), 50);
        assert_eq!(greedy.score(30, 20), 20);
    }

    #[test]
    fn request_floors_endpoints() {
        let r = PathRequest::new(Vec3::new(0.7, 1.2, -0.3), Vec3::new(5.5, 1.0, 0.0), 10);
        assert_eq!(r.source(), BlockPos::new(0, 1, -1));
        assert_eq!(r.destination(), BlockPos::new(5, 1, 0));
        assert_eq!(r.budget(&SearchConfig::default()), 50);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let cfg: SearchConfig = serde_json::from_str(r#"{"greedy": true}"#).unwrap();
        assert!(cfg.greedy);
        assert_eq!(cfg.calculations_per_step, CALCULATIONS_PER_STEP);
        assert_eq!(cfg.distance, Distance::Euclidean);
    }
}
