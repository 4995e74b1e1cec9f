//! # tile_route
//!
//! Pathfinding and route playback on a fixed `SIDE`×`SIDE` tile grid. A [GridTopology] holds the
//! wall layout and answers neighbour queries under a [MovementMode]
//! (orthogonal, corner-respecting diagonal, or diagonal hops). Routes are found with A* using
//! integer step costs ([C] straight, [D] diagonal) and the [HeuristicEstimator], which is
//! admissible under every mode. Pre-computes
//! [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! to avoid flood-filling behaviour if no path exists. A found [Route] can be turned into move
//! steps and played back by the [Choreographer].
//!
//! ```
//! use grid_util::point::Point;
//! use tile_route::{GridSolver, GridTopology, MovementMode, PathFinder};
//!
//! let mut grid = GridTopology::new();
//! grid.initialize();
//! grid.load_level(&["1,1", "2,2"]).unwrap();
//! let route = PathFinder::new()
//!     .find_route(&grid, Point::new(0, 0), Point::new(3, 3), MovementMode::Diagonal)
//!     .unwrap();
//! assert_eq!(route.tiles.first().map(|t| (t.x, t.y)), Some((0, 0)));
//! ```
pub mod choreographer;
pub mod config;
pub mod error;
pub mod heuristic;
pub mod level;
pub mod search_context;
pub mod solver;
pub mod tile;
pub mod topology;

pub use choreographer::{build_steps, Choreographer, MoveStep, PlaybackEvent, Vector};
pub use config::Config;
pub use error::{Result, RouteError};
pub use heuristic::HeuristicEstimator;
pub use solver::{astar::AstarSolver, dijkstra::DijkstraSolver, GridSolver, Route};
pub use tile::{MovementMode, Tile, TileKind};
pub use topology::{EmptyTileIndex, GridTopology};

/// The solver used for player-facing searches.
pub type PathFinder = AstarSolver;

/// Number of rows and of columns of the grid.
pub const SIDE: usize = 11;
/// Cost of a straight (cardinal) step.
pub const C: i32 = 10;
/// Cost of a diagonal step, `C` times √2 rounded down.
pub const D: i32 = 14;

const N_SMALLVEC_SIZE: usize = 8;
