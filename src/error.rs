//! Error types for tile_route

use grid_util::point::Point;
use thiserror::Error;

/// Every failure the grid, the solvers and the choreographer can report. All of them are
/// recoverable; none leave the grid partially mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("coordinate {0} lies outside the grid")]
    OutOfBounds(String),

    #[error("tile {0} is outside the grid, blocked or the grid is uninitialized")]
    InvalidTile(Point),

    #[error("no route from {start} to {goal}")]
    NoPath { start: Point, goal: Point },

    #[error("a route needs at least two tiles to be played")]
    EmptyRoute,

    #[error("a route is already being played")]
    AlreadyPlaying,

    #[error("playback worker failed: {0}")]
    Playback(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("level error: {0}")]
    Level(String),
}

impl From<serde_json::Error> for RouteError {
    fn from(e: serde_json::Error) -> Self {
        RouteError::Level(e.to_string())
    }
}

impl From<toml::de::Error> for RouteError {
    fn from(e: toml::de::Error) -> Self {
        RouteError::Config(e.to_string())
    }
}

impl From<std::io::Error> for RouteError {
    fn from(e: std::io::Error) -> Self {
        RouteError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RouteError>;
