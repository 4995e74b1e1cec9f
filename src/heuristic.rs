use grid_util::point::Point;

use crate::tile::MovementMode;
use crate::{C, D};

/// Lower bound on the remaining cost between two tiles, on the same scale as
/// [GridTopology::get_cost](crate::topology::GridTopology::get_cost).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HeuristicEstimator {
    pub mode: MovementMode,
}

impl HeuristicEstimator {
    pub fn new(mode: MovementMode) -> HeuristicEstimator {
        HeuristicEstimator { mode }
    }

    /// Octile distance when diagonals are available, Manhattan distance otherwise.
    pub fn estimate(&self, from: &Point, to: &Point) -> i32 {
        let delta_x = (to.x - from.x).abs();
        let delta_y = (to.y - from.y).abs();
        if self.mode.allows_diagonal() {
            // Take as many diagonal steps as possible, then go straight
            C * delta_x.max(delta_y) + (D - C) * delta_x.min(delta_y)
        } else {
            C * (delta_x + delta_y)
        }
    }
}
