use std::fmt;

use serde::{Deserialize, Serialize};

use crate::source::{IdSource, RandomSource};

/// Side length of the (square) board.
pub const SIZE: usize = 4;

/// Probability that a spawned tile is a 4 rather than a 2.
pub const DEFAULT_FOUR_PROBABILITY: f64 = 0.1;

/// Largest tile reachable on a 4x4 board. Tiles at this value do not merge.
pub const MAX_TILE_VALUE: u32 = 1 << 17;

/// Opaque tile identity. Stable across moves until the tile is consumed by a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u64);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A numbered tile. `value` is a power of two, at least 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
}

impl Tile {
    pub fn new(id: TileId, value: u32) -> Self {
        Tile { id, value }
    }
}

/// A cell coordinate. Row 0 is the top, column 0 the left edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Pos { row, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// 4x4 grid of optional tiles.
///
/// `Clone` is a deep copy: tiles are plain values, so a clone shares nothing with
/// its source. Snapshots for undo are taken this way.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Option<Tile>; SIZE]; SIZE],
}

impl Board {
    /// All cells empty.
    pub fn empty() -> Self {
        Board::default()
    }

    /// Build a board from a grid of values (0 = empty), drawing ids row-major from `ids`.
    ///
    /// Panics if a non-zero value is not a power of two of at least 2.
    pub fn from_values<I: IdSource + ?Sized>(values: [[u32; SIZE]; SIZE], ids: &mut I) -> Self {
        let mut board = Board::empty();
        for (r, row) in values.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                if v == 0 {
                    continue;
                }
                assert!(is_tile_value(v), "{v} is not a valid tile value");
                board.cells[r][c] = Some(Tile::new(ids.next_id(), v));
            }
        }
        board
    }

    #[inline]
    pub fn get(&self, pos: Pos) -> Option<Tile> {
        self.cells[pos.row][pos.col]
    }

    #[inline]
    pub fn set(&mut self, pos: Pos, tile: Option<Tile>) {
        self.cells[pos.row][pos.col] = tile;
    }

    /// Raw row-major view of the grid.
    pub fn rows(&self) -> &[[Option<Tile>; SIZE]; SIZE] {
        &self.cells
    }

    /// Occupied cells in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (Pos, Tile)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(c, cell)| cell.map(|t| (Pos::new(r, c), t)))
        })
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Pos> {
        let mut out = Vec::with_capacity(SIZE * SIZE);
        for r in 0..SIZE {
            for c in 0..SIZE {
                if self.cells[r][c].is_none() {
                    out.push(Pos::new(r, c));
                }
            }
        }
        out
    }

    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    pub fn count_empty(&self) -> usize {
        SIZE * SIZE - self.tile_count()
    }

    pub fn is_full(&self) -> bool {
        self.count_empty() == 0
    }

    /// Highest tile value present, 0 for an empty board.
    pub fn highest_tile(&self) -> u32 {
        self.tiles().map(|(_, t)| t.value).max().unwrap_or(0)
    }

    /// Largest tile id on the board, if any.
    pub fn max_id(&self) -> Option<TileId> {
        self.tiles().map(|(_, t)| t.id).max()
    }

    /// Values grid, 0 for empty cells.
    pub fn values(&self) -> [[u32; SIZE]; SIZE] {
        let mut out = [[0; SIZE]; SIZE];
        for (pos, t) in self.tiles() {
            out[pos.row][pos.col] = t.value;
        }
        out
    }

    /// True when every tile has a valid value and no id appears twice.
    pub fn is_well_formed(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(SIZE * SIZE);
        self.tiles().all(|(_, t)| is_tile_value(t.value) && seen.insert(t.id))
    }

    /// Spawn with the default 2/4 odds. Returns whether a tile was placed.
    pub fn spawn_tile<R, I>(&mut self, rng: &mut R, ids: &mut I) -> bool
    where
        R: RandomSource + ?Sized,
        I: IdSource + ?Sized,
    {
        spawn_tile(self, rng, ids, DEFAULT_FOUR_PROBABILITY).is_some()
    }
}

#[inline]
pub(crate) fn is_tile_value(v: u32) -> bool {
    (2..=MAX_TILE_VALUE).contains(&v) && v.is_power_of_two()
}

/// Pick one empty cell uniformly among all empty cells; `None` if the board is full.
pub fn random_empty_cell<R: RandomSource + ?Sized>(board: &Board, rng: &mut R) -> Option<Pos> {
    let empty = board.empty_cells();
    if empty.is_empty() {
        return None;
    }
    Some(empty[rng.next_index(empty.len())])
}

/// Place a 2 (or a 4 with probability `four_probability`) on a random empty cell.
///
/// The first draw picks the cell, the second the value. Returns the placed tile,
/// or `None` (without consuming any draw) when the board is full.
pub fn spawn_tile<R, I>(
    board: &mut Board,
    rng: &mut R,
    ids: &mut I,
    four_probability: f64,
) -> Option<(Pos, Tile)>
where
    R: RandomSource + ?Sized,
    I: IdSource + ?Sized,
{
    let pos = random_empty_cell(board, rng)?;
    let value = if rng.next_unit() < 1.0 - four_probability { 2 } else { 4 };
    let tile = Tile::new(ids.next_id(), value);
    board.set(pos, Some(tile));
    tracing::trace!(%pos, value, id = %tile.id, "spawned tile");
    Some((pos, tile))
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values().iter()).finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.values();
        writeln!(f)?;
        for (r, row) in values.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(format_val).collect();
            writeln!(f, "{}", cells.join("|"))?;
            if r + 1 < SIZE {
                writeln!(f, "{}", "-".repeat(SIZE * 8 - 1))?;
            }
        }
        Ok(())
    }
}

fn format_val(val: &u32) -> String {
    match val {
        0 => " ".repeat(7),
        x => format!("{:^7}", x),
    }
}
