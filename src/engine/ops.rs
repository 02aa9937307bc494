//! Move resolution and terminal detection.
//!
//! [`resolve_move`] mutates the board in place. Callers that may need to roll
//! back (the session's undo) must snapshot the board before calling it.

use serde::{Deserialize, Serialize};

use super::state::{Board, Pos, Tile, TileId, MAX_TILE_VALUE, SIZE};
use super::Move;
use crate::source::IdSource;

/// One tile's part in a move, for the presentation layer to animate.
///
/// Two `removed` transitions sharing a `to` cell are a merge pair: both source
/// tiles disappear and a new tile (see [`MoveResult::merged`]) takes their place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileTransition {
    pub id: TileId,
    pub from: Pos,
    pub to: Pos,
    pub removed: bool,
}

impl TileTransition {
    #[inline]
    pub fn is_stationary(&self) -> bool {
        !self.removed && self.from == self.to
    }
}

/// A tile created by a merge during this move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedTile {
    pub pos: Pos,
    pub tile: Tile,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    /// True iff any tile slid or merged.
    pub moved: bool,
    /// Sum of the values of all tiles created by merges.
    pub gained: u64,
    /// Per-line, in scan order, lines in increasing index order.
    pub plan: Vec<TileTransition>,
    /// Merge products, in the order they were created.
    pub merged: Vec<MergedTile>,
}

impl MoveResult {
    pub fn merge_count(&self) -> usize {
        self.merged.len()
    }
}

/// Coordinates of line `i` in compaction order for `dir`: slot 0 is the cell tiles slide towards.
#[inline]
fn line_coords(dir: Move, i: usize) -> [Pos; SIZE] {
    std::array::from_fn(|j| match dir {
        Move::Left => Pos::new(i, j),
        Move::Right => Pos::new(i, SIZE - 1 - j),
        Move::Up => Pos::new(j, i),
        Move::Down => Pos::new(SIZE - 1 - j, i),
    })
}

/// Value of the tile made by merging `a` and `b`, if they merge at all.
///
/// Tiles already at [`MAX_TILE_VALUE`] never merge, so a move cannot push a
/// value out of range (or overflow `u32` on a hand-built board).
#[inline]
fn merge_value(a: u32, b: u32) -> Option<u32> {
    if a != b {
        return None;
    }
    a.checked_mul(2).filter(|&v| v <= MAX_TILE_VALUE)
}

/// Slide and merge every line of `board` towards `dir`, in place.
///
/// Each tile merges at most once: after a merge the scan skips both sources, so
/// `[2, 2, 2, _]` moved left becomes `[4, 2, _, _]`. Merged tiles get fresh ids
/// from `ids`; surviving tiles keep theirs.
pub fn resolve_move<I: IdSource + ?Sized>(board: &mut Board, dir: Move, ids: &mut I) -> MoveResult {
    let mut res = MoveResult::default();

    for i in 0..SIZE {
        let coords = line_coords(dir, i);
        let tiles: Vec<(Pos, Tile)> = coords
            .iter()
            .filter_map(|&p| board.get(p).map(|t| (p, t)))
            .collect();

        let mut out: [Option<Tile>; SIZE] = [None; SIZE];
        let mut w = 0;
        let mut k = 0;
        while k < tiles.len() {
            let (from, a) = tiles[k];
            let to = coords[w];
            let pair = tiles
                .get(k + 1)
                .and_then(|&(from_b, b)| merge_value(a.value, b.value).map(|v| (from_b, b, v)));
            match pair {
                Some((from_b, b, value)) => {
                    let tile = Tile::new(ids.next_id(), value);
                    out[w] = Some(tile);
                    res.gained += u64::from(tile.value);
                    res.plan.push(TileTransition { id: a.id, from, to, removed: true });
                    res.plan.push(TileTransition { id: b.id, from: from_b, to, removed: true });
                    res.merged.push(MergedTile { pos: to, tile });
                    k += 2;
                }
                None => {
                    out[w] = Some(a);
                    res.plan.push(TileTransition { id: a.id, from, to, removed: false });
                    k += 1;
                }
            }
            w += 1;
        }

        for (p, t) in coords.iter().zip(out) {
            board.set(*p, t);
        }
    }

    res.moved = res.plan.iter().any(|t| !t.is_stationary());
    res
}

/// True if some direction would change the board: an empty cell exists, or two
/// orthogonally adjacent tiles hold the same value.
pub fn can_move(board: &Board) -> bool {
    let cells = board.rows();
    for r in 0..SIZE {
        for c in 0..SIZE {
            let Some(t) = cells[r][c] else { return true };
            if r + 1 < SIZE && cells[r + 1][c].is_some_and(|n| merge_value(t.value, n.value).is_some()) {
                return true;
            }
            if c + 1 < SIZE && cells[r][c + 1].is_some_and(|n| merge_value(t.value, n.value).is_some()) {
                return true;
            }
        }
    }
    false
}
