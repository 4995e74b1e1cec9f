use grid_util::point::Point;

use crate::{solver::GridSolver, tile::MovementMode};

/// Uninformed search; its costs are exact and serve as a reference for the heuristic solvers.
#[derive(Clone, Debug, Default)]
pub struct DijkstraSolver;

impl GridSolver for DijkstraSolver {
    fn heuristic(&self, _: MovementMode, _: &Point, _: &Point) -> i32 {
        0
    }
}
