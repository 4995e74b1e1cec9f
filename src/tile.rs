use core::fmt;
use core::str::FromStr;
use grid_util::point::Point;
use serde::{Deserialize, Deserializer};

use crate::error::RouteError;

/// Whether a tile can be walked on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TileKind {
    #[default]
    Empty,
    Wall,
}

/// One cell of the grid. `x` is the row and `y` the column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    pub kind: TileKind,
}

impl Tile {
    pub fn new(x: i32, y: i32, kind: TileKind) -> Tile {
        Tile { x, y, kind }
    }
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
    pub fn is_wall(&self) -> bool {
        self.kind == TileKind::Wall
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Governs which neighbour directions are legal during a search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MovementMode {
    /// Only the four axis-aligned neighbours.
    Orthogonal,
    /// Diagonals too, but never across a blocked corner.
    #[default]
    Diagonal,
    /// All diagonals, even when both flanking tiles are walls.
    DiagonalHop,
}

impl MovementMode {
    pub const ALL: [MovementMode; 3] = [
        MovementMode::Orthogonal,
        MovementMode::Diagonal,
        MovementMode::DiagonalHop,
    ];

    pub fn allows_diagonal(&self) -> bool {
        *self != MovementMode::Orthogonal
    }

    /// Position of the mode in [MovementMode::ALL], used to index per-mode data.
    pub(crate) fn index(&self) -> usize {
        match self {
            MovementMode::Orthogonal => 0,
            MovementMode::Diagonal => 1,
            MovementMode::DiagonalHop => 2,
        }
    }
}

impl FromStr for MovementMode {
    type Err = RouteError;

    /// Accepts `orthogonal`, `diagonal` and `diagonal_hop` in any letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "orthogonal" => Ok(MovementMode::Orthogonal),
            "diagonal" => Ok(MovementMode::Diagonal),
            "diagonal_hop" => Ok(MovementMode::DiagonalHop),
            _ => Err(RouteError::Config(format!("unknown movement mode `{}`", s))),
        }
    }
}

impl<'de> Deserialize<'de> for MovementMode {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Row/column offsets of up, right, down and left, in the order neighbours are reported.
pub const ORTHOGONAL_OFFSETS: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Row/column offsets of up-left, up-right, down-right and down-left.
pub const DIAGONAL_OFFSETS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, 1), (1, -1)];

/// Decides which diagonal corners may be considered given the passability of the four
/// orthogonal directions (up, right, down, left). Corner `i` of [DIAGONAL_OFFSETS] is flanked by
/// orthogonal directions `i` and `i + 3 (mod 4)`.
pub fn eligible_diagonals(passable: [bool; 4], mode: MovementMode) -> [bool; 4] {
    match mode {
        MovementMode::Orthogonal => [false; 4],
        MovementMode::Diagonal => core::array::from_fn(|i| passable[i] && passable[(i + 3) % 4]),
        MovementMode::DiagonalHop => [true; 4],
    }
}
