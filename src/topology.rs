use core::fmt;
use grid_util::point::Point;
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::config::GridConfig;
use crate::error::{Result, RouteError};
use crate::level::{check_bounds, format_coordinate, in_bounds, parse_coordinate};
use crate::tile::{eligible_diagonals, MovementMode, Tile, TileKind};
use crate::tile::{DIAGONAL_OFFSETS, ORTHOGONAL_OFFSETS};
use crate::{C, D, N_SMALLVEC_SIZE, SIDE};

/// Per-row view of the walkable tiles. Derived from the grid after every layout change and never
/// edited on its own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmptyTileIndex {
    rows: Vec<Vec<Tile>>,
}

impl EmptyTileIndex {
    fn from_tiles(tiles: &[Tile]) -> EmptyTileIndex {
        let rows = tiles
            .chunks(SIDE)
            .map(|row| row.iter().filter(|t| !t.is_wall()).copied().collect())
            .collect();
        EmptyTileIndex { rows }
    }
    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.rows
    }
    /// The empty tiles of row `x`, or an empty slice if the row does not exist.
    pub fn row(&self, x: usize) -> &[Tile] {
        self.rows.get(x).map(Vec::as_slice).unwrap_or(&[])
    }
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.rows.iter().flatten()
    }
    /// Total number of empty tiles.
    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.rows.len() && self.rows[x as usize].iter().any(|t| t.y == y)
    }
}

/// [GridTopology] owns the `SIDE`×`SIDE` tile matrix and answers the adjacency and cost questions
/// a search asks. Like a pathing grid it also maintains connected components per
/// [MovementMode] using a [UnionFind] so that unreachable goals can be rejected without a search.
#[derive(Clone, Debug)]
pub struct GridTopology {
    tiles: Vec<Tile>,
    backup: Option<Vec<Tile>>,
    empty_tiles: EmptyTileIndex,
    components: [UnionFind<usize>; 3],
    pub components_dirty: bool,
    pub snapshot_on_load: bool,
}

impl Default for GridTopology {
    fn default() -> GridTopology {
        GridTopology {
            tiles: Vec::new(),
            backup: None,
            empty_tiles: EmptyTileIndex::default(),
            components: MovementMode::ALL.map(|_| UnionFind::new(0)),
            components_dirty: false,
            snapshot_on_load: true,
        }
    }
}

fn ix(x: i32, y: i32) -> usize {
    x as usize * SIDE + y as usize
}

impl GridTopology {
    /// An uninitialized grid; call [initialize](Self::initialize) before use.
    pub fn new() -> GridTopology {
        GridTopology::default()
    }

    pub fn with_config(config: &GridConfig) -> GridTopology {
        GridTopology {
            snapshot_on_load: config.snapshot_on_load,
            ..GridTopology::default()
        }
    }

    /// Fills the grid with empty tiles in row-major order.
    pub fn initialize(&mut self) {
        self.tiles = (0..SIDE as i32)
            .flat_map(|x| (0..SIDE as i32).map(move |y| Tile::new(x, y, TileKind::Empty)))
            .collect();
        self.refresh();
    }

    pub fn is_initialized(&self) -> bool {
        !self.tiles.is_empty()
    }

    /// Replaces the wall layout. Every coordinate is validated before the grid is touched, so a
    /// failed load leaves the previous layout intact. On success the refreshed
    /// [EmptyTileIndex] is returned.
    pub fn load_walls(&mut self, walls: &[(i32, i32)]) -> Result<&EmptyTileIndex> {
        for &(x, y) in walls {
            check_bounds(x, y)?;
        }
        if !self.is_initialized() {
            self.initialize();
        }
        for tile in self.tiles.iter_mut() {
            tile.kind = TileKind::Empty;
        }
        for &(x, y) in walls {
            self.tiles[ix(x, y)].kind = TileKind::Wall;
        }
        self.refresh();
        if self.snapshot_on_load {
            self.backup = Some(self.tiles.clone());
        }
        info!("Loaded level with {} walls", self.walls().count());
        Ok(&self.empty_tiles)
    }

    /// Parses `"x,y"` strings and loads them as walls. Nothing is mutated if any string is
    /// malformed.
    pub fn load_level<S: AsRef<str>>(&mut self, walls: &[S]) -> Result<&EmptyTileIndex> {
        let coordinates = walls
            .iter()
            .map(|c| parse_coordinate(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.load_walls(&coordinates)
    }

    /// Restores the layout stored by the last successful load, if there is one.
    pub fn reset(&mut self) {
        if let Some(backup) = &self.backup {
            self.tiles = backup.clone();
            self.refresh();
            info!("Grid reset to stored snapshot");
        }
    }

    /// Turns every tile into an empty one. The stored snapshot is kept.
    pub fn clear(&mut self) {
        if !self.is_initialized() {
            return;
        }
        for tile in self.tiles.iter_mut() {
            tile.kind = TileKind::Empty;
        }
        self.refresh();
        info!("Grid cleared");
    }

    pub fn has_snapshot(&self) -> bool {
        self.backup.is_some()
    }

    /// Wall coordinates as `"x,y"` strings in row-major order.
    pub fn serialize_walls(&self) -> Vec<String> {
        self.walls().map(|t| format_coordinate(t.x, t.y)).collect()
    }

    pub fn walls(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_wall())
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn empty_tiles(&self) -> &EmptyTileIndex {
        &self.empty_tiles
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        if in_bounds(x, y) {
            self.tiles.get(ix(x, y)).copied()
        } else {
            None
        }
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_some_and(|t| !t.is_wall())
    }

    /// Changes a single tile. Opening a tile joins it to the components of its neighbours;
    /// placing a wall may split components, so they are only flagged as dirty and regenerated by
    /// [update](Self::update).
    pub fn set_kind(&mut self, x: i32, y: i32, kind: TileKind) -> Result<()> {
        check_bounds(x, y)?;
        if !self.is_initialized() {
            return Err(RouteError::InvalidTile(Point::new(x, y)));
        }
        let previous = self.tiles[ix(x, y)].kind;
        self.tiles[ix(x, y)].kind = kind;
        if previous != kind {
            match kind {
                TileKind::Wall => self.components_dirty = true,
                TileKind::Empty => {
                    for mode in MovementMode::ALL {
                        for n in self.neighbours_of(x, y, mode) {
                            self.components[mode.index()].union(ix(x, y), ix(n.x, n.y));
                        }
                    }
                }
            }
            self.empty_tiles = EmptyTileIndex::from_tiles(&self.tiles);
        }
        Ok(())
    }

    /// The legal neighbours of `point` under `mode`: up, right, down, left, then up-left,
    /// up-right, down-right, down-left, skipping any that are out of bounds or walls.
    pub fn get_neighbors(
        &self,
        point: Point,
        mode: MovementMode,
    ) -> Result<SmallVec<[Tile; N_SMALLVEC_SIZE]>> {
        if !self.is_initialized() || !in_bounds(point.x, point.y) {
            return Err(RouteError::InvalidTile(point));
        }
        Ok(self.neighbours_of(point.x, point.y, mode))
    }

    fn neighbours_of(
        &self,
        x: i32,
        y: i32,
        mode: MovementMode,
    ) -> SmallVec<[Tile; N_SMALLVEC_SIZE]> {
        let passable = ORTHOGONAL_OFFSETS.map(|(dx, dy)| self.is_walkable(x + dx, y + dy));
        let eligible = eligible_diagonals(passable, mode);
        let orthogonal = ORTHOGONAL_OFFSETS.iter().zip(passable);
        let diagonal = DIAGONAL_OFFSETS
            .iter()
            .zip(eligible)
            .map(|(&(dx, dy), e)| ((dx, dy), e && self.is_walkable(x + dx, y + dy)));
        orthogonal
            .map(|(&offset, p)| (offset, p))
            .chain(diagonal)
            .filter(|(_, included)| *included)
            .map(|((dx, dy), _)| self.tiles[ix(x + dx, y + dy)])
            .collect()
    }

    /// Cost of a single step: [C] along a row or column, [D] otherwise. Only meaningful for
    /// adjacent tiles.
    pub fn get_cost(&self, from: Point, to: Point) -> i32 {
        step_cost(from, to)
    }

    /// Checks if start and goal are on the same component under `mode`. Always false for
    /// out-of-bounds points.
    pub fn reachable(&self, start: &Point, goal: &Point, mode: MovementMode) -> bool {
        self.is_initialized()
            && in_bounds(start.x, start.y)
            && in_bounds(goal.x, goal.y)
            && self.components[mode.index()].equiv(ix(start.x, start.y), ix(goal.x, goal.y))
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Point, goal: &Point, mode: MovementMode) -> bool {
        !self.reachable(start, goal, mode)
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates new [UnionFind] structures, one per movement mode, and links up walkable
    /// neighbours.
    pub fn generate_components(&mut self) {
        debug!("Generating connected components");
        self.components = MovementMode::ALL.map(|mode| {
            let mut components = UnionFind::new(self.tiles.len());
            for tile in self.tiles.iter().filter(|t| !t.is_wall()) {
                for n in self.neighbours_of(tile.x, tile.y, mode) {
                    components.union(ix(tile.x, tile.y), ix(n.x, n.y));
                }
            }
            components
        });
        self.components_dirty = false;
    }

    fn refresh(&mut self) {
        self.empty_tiles = EmptyTileIndex::from_tiles(&self.tiles);
        self.generate_components();
    }
}

/// See [GridTopology::get_cost].
pub fn step_cost(from: Point, to: Point) -> i32 {
    if from.x == to.x || from.y == to.y {
        C
    } else {
        D
    }
}

impl fmt::Display for GridTopology {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.tiles.chunks(SIDE) {
            let line = row
                .iter()
                .map(|t| if t.is_wall() { '#' } else { '.' })
                .collect::<String>();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
