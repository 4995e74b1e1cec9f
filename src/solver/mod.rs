use grid_util::point::Point;
use itertools::Itertools;
use log::{debug, info};

use crate::error::{Result, RouteError};
use crate::search_context::SearchContext;
use crate::tile::{MovementMode, Tile};
use crate::topology::{step_cost, GridTopology};

pub mod astar;
pub mod dijkstra;

/// Ordered, adjacency-valid sequence of tiles from start to goal together with its total cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub tiles: Vec<Tile>,
    pub cost: i32,
}

impl Route {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
    pub fn start(&self) -> Option<&Tile> {
        self.tiles.first()
    }
    pub fn goal(&self) -> Option<&Tile> {
        self.tiles.last()
    }
    pub fn points(&self) -> Vec<Point> {
        self.tiles.iter().map(Tile::point).collect()
    }
    /// Checks that every consecutive pair is a legal neighbour relation on `grid` under `mode`.
    pub fn follows(&self, grid: &GridTopology, mode: MovementMode) -> bool {
        self.tiles.iter().tuple_windows().all(|(a, b)| {
            grid.get_neighbors(a.point(), mode)
                .is_ok_and(|neighbours| neighbours.iter().any(|n| n.x == b.x && n.y == b.y))
        })
    }
}

pub trait GridSolver {
    fn heuristic(&self, mode: MovementMode, p1: &Point, p2: &Point) -> i32;

    /// Sums the step costs along a sequence of tiles.
    fn route_cost(&self, tiles: &[Tile]) -> i32 {
        tiles
            .iter()
            .tuple_windows()
            .map(|(a, b)| step_cost(a.point(), b.point()))
            .sum()
    }

    /// Searches `grid` for a lowest-cost route from `start` to `goal`. Fails with
    /// [RouteError::InvalidTile] if either end is out of bounds or a wall, and with
    /// [RouteError::NoPath] if the goal cannot be reached under `mode`. The grid is only read.
    fn find_route(
        &self,
        grid: &GridTopology,
        start: Point,
        goal: Point,
        mode: MovementMode,
    ) -> Result<Route> {
        for p in [start, goal] {
            if !grid.is_walkable(p.x, p.y) {
                return Err(RouteError::InvalidTile(p));
            }
        }
        // Components are only trusted while they match the layout
        if !grid.components_dirty && grid.unreachable(&start, &goal, mode) {
            info!("{} is not reachable from {}", goal, start);
            return Err(RouteError::NoPath { start, goal });
        }
        let mut context = SearchContext::new();
        let result = context.astar(
            &start,
            |node| {
                let from = *node;
                grid.get_neighbors(from, mode)
                    .into_iter()
                    .flatten()
                    .map(move |t| (t.point(), step_cost(from, t.point())))
            },
            |point| self.heuristic(mode, point, &goal),
            |point| *point == goal,
        );
        debug!(
            "Search from {} to {} expanded {} nodes",
            start,
            goal,
            context.expanded()
        );
        let (points, cost) = result.ok_or(RouteError::NoPath { start, goal })?;
        let tiles = points
            .iter()
            .filter_map(|p| grid.tile(p.x, p.y))
            .collect::<Vec<_>>();
        Ok(Route { tiles, cost })
    }
}
