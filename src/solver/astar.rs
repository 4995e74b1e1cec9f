use grid_util::point::Point;

use crate::heuristic::HeuristicEstimator;
use crate::solver::GridSolver;
use crate::tile::MovementMode;

/// A* guided by the [HeuristicEstimator] of the active movement mode.
#[derive(Clone, Debug, Default)]
pub struct AstarSolver;

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver
    }
}

impl GridSolver for AstarSolver {
    fn heuristic(&self, mode: MovementMode, p1: &Point, p2: &Point) -> i32 {
        HeuristicEstimator::new(mode).estimate(p1, p2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouteError;
    use crate::topology::GridTopology;

    fn grid_with(walls: &[(i32, i32)]) -> GridTopology {
        let mut grid = GridTopology::new();
        grid.initialize();
        grid.load_walls(walls).unwrap();
        grid
    }

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        let grid = grid_with(&[]);
        let solver = AstarSolver::new();
        for mode in MovementMode::ALL {
            let start = Point::new(4, 4);
            let route = solver.find_route(&grid, start, start, mode).unwrap();
            assert_eq!(route.len(), 1);
            assert_eq!(route.cost, 0);
        }
    }

    /// Asserts that the optimal solution around a single wall is found.
    #[test]
    fn solve_simple_problem() {
        //  S . .
        //  . # .
        //  . . G
        for (mode, expected_len, expected_cost) in [
            (MovementMode::Orthogonal, 5, 40),
            // every diagonal around the wall has it as a flank
            (MovementMode::Diagonal, 5, 40),
            (MovementMode::DiagonalHop, 4, 34),
        ] {
            let grid = grid_with(&[(1, 1)]);
            let route = AstarSolver::new()
                .find_route(&grid, Point::new(0, 0), Point::new(2, 2), mode)
                .unwrap();
            assert_eq!(route.len(), expected_len, "{mode:?}");
            assert_eq!(route.cost, expected_cost, "{mode:?}");
            assert!(route.follows(&grid, mode));
        }
    }

    #[test]
    fn blocked_or_outside_ends() {
        let grid = grid_with(&[(3, 3)]);
        let solver = AstarSolver::new();
        let mode = MovementMode::Diagonal;
        let err = solver
            .find_route(&grid, Point::new(3, 3), Point::new(0, 0), mode)
            .unwrap_err();
        assert_eq!(err, RouteError::InvalidTile(Point::new(3, 3)));
        let err = solver
            .find_route(&grid, Point::new(0, 0), Point::new(0, 11), mode)
            .unwrap_err();
        assert_eq!(err, RouteError::InvalidTile(Point::new(0, 11)));
        let empty = GridTopology::new();
        assert!(matches!(
            solver.find_route(&empty, Point::new(0, 0), Point::new(1, 1), mode),
            Err(RouteError::InvalidTile(_))
        ));
    }

    // The movement mode decides whether a blocked corner can be crossed at all.
    #[test]
    fn test_diagonal_switch_path() {
        //  S #
        //  # G
        let grid = grid_with(&[(0, 1), (1, 0)]);
        let solver = AstarSolver::new();
        let start = Point::new(0, 0);
        let goal = Point::new(1, 1);
        for mode in [MovementMode::Orthogonal, MovementMode::Diagonal] {
            assert_eq!(
                solver.find_route(&grid, start, goal, mode),
                Err(RouteError::NoPath { start, goal })
            );
        }
        let route = solver
            .find_route(&grid, start, goal, MovementMode::DiagonalHop)
            .unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route.cost, 14);
    }

    /// The search itself reports an exhausted frontier when components cannot be trusted.
    #[test]
    fn no_path_with_dirty_components() {
        let mut grid = grid_with(&[]);
        for y in 0..11 {
            grid.set_kind(5, y, crate::tile::TileKind::Wall).unwrap();
        }
        assert!(grid.components_dirty);
        let start = Point::new(0, 0);
        let goal = Point::new(10, 10);
        for mode in MovementMode::ALL {
            assert_eq!(
                AstarSolver::new().find_route(&grid, start, goal, mode),
                Err(RouteError::NoPath { start, goal })
            );
        }
    }

    #[test]
    fn route_cost_matches_search_cost() {
        let grid = grid_with(&[(2, 3), (3, 3), (4, 3), (4, 4), (4, 5)]);
        let solver = AstarSolver::new();
        for mode in MovementMode::ALL {
            let route = solver
                .find_route(&grid, Point::new(3, 4), Point::new(8, 1), mode)
                .unwrap();
            assert_eq!(solver.route_cost(&route.tiles), route.cost);
            assert_eq!(route.start().map(|t| (t.x, t.y)), Some((3, 4)));
            assert_eq!(route.goal().map(|t| (t.x, t.y)), Some((8, 1)));
        }
    }
}
