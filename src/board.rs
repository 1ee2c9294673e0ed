//! Board and dragon (group) engine.
//!
//! The board is partitioned into *dragons*: 4-connected sets of cells that
//! share one owner. Empty regions are dragons too, owned by
//! [`Owner::Unoccupied`]. Dragons live in an arena indexed by [`DragonId`],
//! and every cell records the id of the dragon it belongs to, so merges and
//! captures only relink cells and never chase references.
//!
//! Captured dragons keep their cells and simply become unoccupied. They are
//! not coalesced with neighbouring empty dragons, which affects territory
//! counting: a captured region is scored on its own.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use log::debug;

use crate::constants::{DELTA, OWN_STONE, UNOCCUPIED};

/// A cell on the board as `(row, col)`.
pub type Point = (usize, usize);

/// Who a dragon belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Owner {
    Unoccupied,
    Player(usize),
}

impl Owner {
    /// The owning player, or `None` for empty regions.
    pub fn player(self) -> Option<usize> {
        match self {
            Owner::Unoccupied => None,
            Owner::Player(p) => Some(p),
        }
    }

    pub fn is_unoccupied(self) -> bool {
        self == Owner::Unoccupied
    }
}

/// Index of a dragon in the board's arena.
///
/// Ids are recycled after a dragon is destroyed, so an id is only meaningful
/// until the next mutation of the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DragonId(usize);

impl DragonId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A connected group of same-owner cells.
#[derive(Clone, Debug)]
pub struct Dragon {
    owner: Owner,
    cells: Vec<Point>,
}

impl Dragon {
    pub fn owner(&self) -> Owner {
        self.owner
    }

    pub fn cells(&self) -> &[Point] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Final score of one player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlayerScore {
    pub score: i64,
    pub player: usize,
}

/// Integer view of the board handed to players.
///
/// Cells hold [`UNOCCUPIED`] or a player number. Snapshots produced by
/// [`Board::relative_snapshot`] number players relative to the viewer, so the
/// viewer's own stones are always `0`, the next player `1`, and so on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    size: usize,
    cells: Vec<i32>,
}

impl Snapshot {
    /// Build a snapshot from row-major cell values.
    pub fn new(size: usize, cells: Vec<i32>) -> Self {
        assert_eq!(cells.len(), size * size, "snapshot must be square");
        Self { size, cells }
    }

    /// Build a snapshot from a square matrix of rows.
    pub fn from_rows(rows: &[Vec<i32>]) -> Self {
        let size = rows.len();
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), size, "snapshot row {r} has the wrong length");
        }
        let cells: Vec<i32> = rows.iter().flatten().copied().collect();
        Self::new(size, cells)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, (r, c): Point) -> i32 {
        self.cells[r * self.size + c]
    }

    pub fn is_unoccupied(&self, loc: Point) -> bool {
        self.get(loc) == UNOCCUPIED
    }

    pub fn cells(&self) -> &[i32] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[i32]> + '_ {
        self.cells.chunks(self.size)
    }
}

/// The board: a dragon arena plus the cell-to-dragon map.
#[derive(Clone, Debug)]
pub struct Board {
    size: usize,
    n_players: usize,
    /// Dragon owning each cell, row-major.
    cell_dragon: Vec<DragonId>,
    dragons: Vec<Option<Dragon>>,
    /// Arena slots available for reuse.
    free: Vec<usize>,
    /// Stones lost to capture, per player.
    prisoners: Vec<u32>,
}

impl Board {
    /// An empty board: a single unoccupied dragon spanning every cell.
    pub fn new(size: usize, n_players: usize) -> Self {
        assert!(size > 0, "board size must be non-zero");
        let cells: Vec<Point> = (0..size)
            .flat_map(|r| (0..size).map(move |c| (r, c)))
            .collect();
        Self {
            size,
            n_players,
            cell_dragon: vec![DragonId(0); size * size],
            dragons: vec![Some(Dragon {
                owner: Owner::Unoccupied,
                cells,
            })],
            free: Vec::new(),
            prisoners: vec![0; n_players],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn n_players(&self) -> usize {
        self.n_players
    }

    #[inline]
    fn idx(&self, (r, c): Point) -> usize {
        r * self.size + c
    }

    pub fn in_bounds(&self, (r, c): Point) -> bool {
        r < self.size && c < self.size
    }

    /// On-board orthogonal neighbors in the order up, right, down, left.
    pub fn neighbors(&self, (r, c): Point) -> impl Iterator<Item = Point> + '_ {
        DELTA.iter().filter_map(move |&(dr, dc)| {
            let nr = r.checked_add_signed(dr)?;
            let nc = c.checked_add_signed(dc)?;
            self.in_bounds((nr, nc)).then_some((nr, nc))
        })
    }

    pub fn dragon_at(&self, loc: Point) -> DragonId {
        self.cell_dragon[self.idx(loc)]
    }

    pub fn owner(&self, loc: Point) -> Owner {
        self.dragon(self.dragon_at(loc)).owner
    }

    pub fn dragon(&self, id: DragonId) -> &Dragon {
        self.dragons[id.0]
            .as_ref()
            .unwrap_or_else(|| panic!("stale dragon id {id:?}"))
    }

    fn dragon_mut(&mut self, id: DragonId) -> &mut Dragon {
        self.dragons[id.0]
            .as_mut()
            .unwrap_or_else(|| panic!("stale dragon id {id:?}"))
    }

    /// All live dragons in arena order.
    pub fn dragons(&self) -> impl Iterator<Item = (DragonId, &Dragon)> + '_ {
        self.dragons
            .iter()
            .enumerate()
            .filter_map(|(i, d)| d.as_ref().map(|d| (DragonId(i), d)))
    }

    pub fn prisoners(&self, player: usize) -> u32 {
        self.prisoners[player]
    }

    /// Number of stones currently on the board for `player`.
    pub fn stones(&self, player: usize) -> usize {
        self.dragons()
            .filter(|(_, d)| d.owner == Owner::Player(player))
            .map(|(_, d)| d.len())
            .sum()
    }

    fn alloc(&mut self, dragon: Dragon) -> DragonId {
        match self.free.pop() {
            Some(i) => {
                self.dragons[i] = Some(dragon);
                DragonId(i)
            }
            None => {
                self.dragons.push(Some(dragon));
                DragonId(self.dragons.len() - 1)
            }
        }
    }

    fn release(&mut self, id: DragonId) {
        self.dragons[id.0] = None;
        self.free.push(id.0);
    }

    /// Place a stone for `player` at `loc`.
    ///
    /// Returns false without touching the board if `loc` is off the board or
    /// occupied. Captures are not resolved here, see [`Board::resolve_captures`].
    pub fn place_stone(&mut self, loc: Point, player: usize) -> bool {
        assert!(
            player < self.n_players,
            "player {player} out of range for {} players",
            self.n_players
        );
        if !self.in_bounds(loc) || !self.owner(loc).is_unoccupied() {
            return false;
        }

        let idx = self.idx(loc);
        let empty_id = self.cell_dragon[idx];
        {
            let cells = &mut self.dragon_mut(empty_id).cells;
            let pos = cells
                .iter()
                .position(|&c| c == loc)
                .unwrap_or_else(|| panic!("cell {loc:?} missing from its dragon"));
            cells.swap_remove(pos);
        }

        let neighbors: Vec<Point> = self.neighbors(loc).collect();
        let mut friends: Vec<DragonId> = Vec::with_capacity(4);
        for &n in &neighbors {
            let id = self.dragon_at(n);
            if self.dragon(id).owner == Owner::Player(player) && !friends.contains(&id) {
                friends.push(id);
            }
        }

        match friends.split_first() {
            Some((&first, rest)) => {
                self.dragon_mut(first).cells.push(loc);
                self.cell_dragon[idx] = first;
                let mut keep = first;
                for &other in rest {
                    keep = self.merge(keep, other);
                }
            }
            None => {
                let id = self.alloc(Dragon {
                    owner: Owner::Player(player),
                    cells: vec![loc],
                });
                self.cell_dragon[idx] = id;
            }
        }

        // Only a cell with two or more neighbors in the old region can cut it.
        let touching = neighbors
            .iter()
            .filter(|&&n| self.dragon_at(n) == empty_id)
            .count();
        if self.dragon(empty_id).is_empty() {
            self.release(empty_id);
        } else if touching > 1 {
            self.split_disconnected(empty_id);
        }

        true
    }

    /// Merge two dragons with the same owner and return the surviving id.
    ///
    /// The smaller dragon's cells are relinked into the larger one.
    ///
    /// # Panics
    /// If the owners differ. That can only happen through broken bookkeeping.
    pub fn merge(&mut self, d1: DragonId, d2: DragonId) -> DragonId {
        if d1 == d2 {
            return d1;
        }
        let (o1, o2) = (self.dragon(d1).owner, self.dragon(d2).owner);
        assert_eq!(o1, o2, "cannot merge dragons owned by {o1:?} and {o2:?}");

        let (keep, gone) = if self.dragon(d1).len() >= self.dragon(d2).len() {
            (d1, d2)
        } else {
            (d2, d1)
        };
        let moved = std::mem::take(&mut self.dragon_mut(gone).cells);
        self.release(gone);
        for &cell in &moved {
            let i = self.idx(cell);
            self.cell_dragon[i] = keep;
        }
        self.dragon_mut(keep).cells.extend(moved);
        keep
    }

    /// Split a dragon that may have been cut into several pieces.
    ///
    /// The first component keeps the id; every other component gets a fresh
    /// dragon with the same owner.
    fn split_disconnected(&mut self, id: DragonId) {
        let owner = self.dragon(id).owner;
        let cells = std::mem::take(&mut self.dragon_mut(id).cells);
        let mut seen = vec![false; self.size * self.size];
        let mut components: Vec<Vec<Point>> = Vec::new();

        for &start in &cells {
            if seen[self.idx(start)] {
                continue;
            }
            seen[self.idx(start)] = true;
            let mut component = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(pt) = queue.pop_front() {
                for n in self.neighbors(pt) {
                    let ni = self.idx(n);
                    if !seen[ni] && self.cell_dragon[ni] == id {
                        seen[ni] = true;
                        component.push(n);
                        queue.push_back(n);
                    }
                }
            }
            components.push(component);
        }

        let mut components = components.into_iter();
        if let Some(first) = components.next() {
            self.dragon_mut(id).cells = first;
        }
        for component in components {
            let cells_to_link = component.clone();
            let new_id = self.alloc(Dragon {
                owner,
                cells: component,
            });
            for cell in cells_to_link {
                let i = self.idx(cell);
                self.cell_dragon[i] = new_id;
            }
        }
    }

    /// Empty cells adjacent to any cell of the dragon.
    pub fn liberties(&self, id: DragonId) -> BTreeSet<Point> {
        self.dragon(id)
            .cells
            .iter()
            .flat_map(|&cell| self.neighbors(cell))
            .filter(|&n| self.owner(n).is_unoccupied())
            .collect()
    }

    pub fn is_alive(&self, id: DragonId) -> bool {
        !self.liberties(id).is_empty()
    }

    /// Remove every dragon of `player` without liberties.
    ///
    /// The cells become unoccupied and their count is added to the player's
    /// prisoners. Returns the number of stones removed.
    pub fn clear_dead(&mut self, player: usize) -> u32 {
        let dead: Vec<DragonId> = self
            .dragons()
            .filter(|(_, d)| d.owner == Owner::Player(player))
            .map(|(id, d)| {
                assert!(!d.is_empty(), "dragon {id:?} has no cells");
                id
            })
            .filter(|&id| !self.is_alive(id))
            .collect();

        let mut captured = 0;
        for id in dead {
            let dragon = self.dragon_mut(id);
            dragon.owner = Owner::Unoccupied;
            let n = dragon.len() as u32;
            debug!("Captured {n} stone(s) of player {player}: {:?}", dragon.cells);
            captured += n;
        }
        self.prisoners[player] += captured;
        captured
    }

    /// Resolve captures after `mover` has played.
    ///
    /// Every other player's dragons are checked first, in turn order, and the
    /// mover's own dragons last. A move that kills an opponent group therefore
    /// survives even when it filled its own last liberty.
    pub fn resolve_captures(&mut self, mover: usize) -> u32 {
        let mut captured = 0;
        for k in 1..self.n_players {
            captured += self.clear_dead((mover + k) % self.n_players);
        }
        captured + self.clear_dead(mover)
    }

    /// Distinct players with a stone next to any cell of the dragon.
    pub fn bordering_players(&self, id: DragonId) -> BTreeSet<usize> {
        self.dragon(id)
            .cells
            .iter()
            .flat_map(|&cell| self.neighbors(cell))
            .filter_map(|n| self.owner(n).player())
            .collect()
    }

    /// Score every player: stones + territory - prisoners lost.
    ///
    /// An empty dragon is territory of a player when that player is the only
    /// one bordering it. The result is sorted by score, highest first, with
    /// ties in ascending player order.
    pub fn score(&self) -> Vec<PlayerScore> {
        let mut totals: Vec<i64> = self.prisoners.iter().map(|&p| -i64::from(p)).collect();
        for (id, dragon) in self.dragons() {
            match dragon.owner {
                Owner::Player(p) => totals[p] += dragon.len() as i64,
                Owner::Unoccupied => {
                    let bordering = self.bordering_players(id);
                    if bordering.len() == 1 {
                        if let Some(&p) = bordering.first() {
                            totals[p] += dragon.len() as i64;
                        }
                    }
                }
            }
        }

        let mut scores: Vec<PlayerScore> = totals
            .into_iter()
            .enumerate()
            .map(|(player, score)| PlayerScore { score, player })
            .collect();
        scores.sort_by(|a, b| b.score.cmp(&a.score).then(a.player.cmp(&b.player)));
        scores
    }

    /// Absolute view of the board: player numbers as-is.
    pub fn snapshot(&self) -> Snapshot {
        self.relative_snapshot(0)
    }

    /// View of the board from `viewer`'s side.
    ///
    /// Player `p` is written as `(p - viewer) mod n_players`, so the viewer's
    /// stones are always `0`.
    pub fn relative_snapshot(&self, viewer: usize) -> Snapshot {
        let n = self.n_players;
        let cells = self
            .cell_dragon
            .iter()
            .map(|&id| match self.dragon(id).owner {
                Owner::Unoccupied => UNOCCUPIED,
                Owner::Player(p) if p == viewer => OWN_STONE,
                Owner::Player(p) => ((p + n - viewer % n) % n) as i32,
            })
            .collect();
        Snapshot::new(self.size, cells)
    }

    /// Check the partition and connectivity invariants.
    ///
    /// # Panics
    /// On the first violation found.
    pub fn check_invariants(&self) {
        let mut covered = vec![false; self.size * self.size];
        for (id, dragon) in self.dragons() {
            assert!(!dragon.is_empty(), "dragon {id:?} has no cells");
            for &cell in &dragon.cells {
                let i = self.idx(cell);
                assert!(!covered[i], "cell {cell:?} belongs to two dragons");
                covered[i] = true;
                assert_eq!(
                    self.cell_dragon[i], id,
                    "cell {cell:?} is listed in {id:?} but linked elsewhere"
                );
            }

            let mut reached = BTreeSet::from([dragon.cells[0]]);
            let mut stack = vec![dragon.cells[0]];
            while let Some(pt) = stack.pop() {
                for n in self.neighbors(pt) {
                    if self.dragon_at(n) == id && reached.insert(n) {
                        stack.push(n);
                    }
                }
            }
            assert_eq!(reached.len(), dragon.len(), "dragon {id:?} is not connected");

            if let Owner::Player(p) = dragon.owner {
                for &cell in &dragon.cells {
                    for n in self.neighbors(cell) {
                        let other = self.dragon_at(n);
                        assert!(
                            other == id || self.dragon(other).owner != Owner::Player(p),
                            "adjacent dragons {id:?} and {other:?} of player {p} were not merged"
                        );
                    }
                }
            }
        }
        assert!(covered.iter().all(|&c| c), "some cells belong to no dragon");
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.size {
            for c in 0..self.size {
                let ch = match self.owner((r, c)) {
                    Owner::Unoccupied => '.',
                    Owner::Player(0) => 'X',
                    Owner::Player(1) => 'O',
                    Owner::Player(p) => char::from_digit((p % 36) as u32, 36).unwrap_or('?'),
                };
                if c > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(size: usize, stones: &[(Point, usize)]) -> Board {
        let mut board = Board::new(size, 2);
        for &(loc, player) in stones {
            assert!(board.place_stone(loc, player), "could not place {loc:?}");
        }
        board
    }

    #[test]
    fn test_new_board_is_one_empty_dragon() {
        let board = Board::new(5, 2);
        let dragons: Vec<_> = board.dragons().collect();
        assert_eq!(dragons.len(), 1);
        assert_eq!(dragons[0].1.len(), 25);
        assert!(dragons[0].1.owner().is_unoccupied());
        board.check_invariants();
    }

    #[test]
    fn test_place_on_occupied_is_rejected() {
        let mut board = setup(3, &[((1, 1), 0)]);
        let before = board.snapshot();
        assert!(!board.place_stone((1, 1), 1));
        assert!(!board.place_stone((3, 0), 1));
        assert_eq!(board.snapshot(), before);
    }

    #[test]
    fn test_neighbors_order() {
        let board = Board::new(3, 2);
        let n: Vec<Point> = board.neighbors((1, 1)).collect();
        assert_eq!(n, vec![(0, 1), (1, 2), (2, 1), (1, 0)]);
        let corner: Vec<Point> = board.neighbors((0, 0)).collect();
        assert_eq!(corner, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_stones_merge_into_one_dragon() {
        let board = setup(5, &[((2, 1), 0), ((2, 3), 0), ((2, 2), 0)]);
        let id = board.dragon_at((2, 2));
        assert_eq!(board.dragon_at((2, 1)), id);
        assert_eq!(board.dragon_at((2, 3)), id);
        assert_eq!(board.dragon(id).len(), 3);
        board.check_invariants();
    }

    #[test]
    fn test_liberties() {
        let board = setup(5, &[((2, 2), 0), ((0, 0), 1), ((1, 2), 1)]);
        assert_eq!(board.liberties(board.dragon_at((0, 0))).len(), 2);
        assert_eq!(board.liberties(board.dragon_at((2, 2))).len(), 3);
        let id = board.dragon_at((2, 2));
        assert_eq!(board.liberties(id), board.liberties(id));
    }

    #[test]
    #[should_panic(expected = "cannot merge")]
    fn test_merge_different_owners_panics() {
        let mut board = setup(3, &[((0, 0), 0), ((2, 2), 1)]);
        let a = board.dragon_at((0, 0));
        let b = board.dragon_at((2, 2));
        board.merge(a, b);
    }

    #[test]
    fn test_wall_splits_empty_region() {
        let board = setup(3, &[((0, 1), 0), ((1, 1), 0), ((2, 1), 0)]);
        assert_ne!(board.dragon_at((0, 0)), board.dragon_at((0, 2)));
        assert_eq!(board.dragon(board.dragon_at((0, 0))).len(), 3);
        assert_eq!(board.dragon(board.dragon_at((2, 2))).len(), 3);
        board.check_invariants();
    }

    #[test]
    fn test_capture_order_favours_mover() {
        // . X O
        // X O .
        // . . .
        let mut board = setup(3, &[((0, 1), 0), ((1, 0), 0), ((0, 2), 1), ((1, 1), 1)]);
        assert!(board.place_stone((0, 0), 1));

        let mut mover_first = board.clone();
        mover_first.clear_dead(1);
        assert!(mover_first.owner((0, 0)).is_unoccupied());

        assert_eq!(board.resolve_captures(1), 1);
        assert_eq!(board.owner((0, 0)), Owner::Player(1));
        assert!(board.owner((0, 1)).is_unoccupied());
        assert_eq!(board.owner((1, 0)), Owner::Player(0));
        assert_eq!(board.prisoners(0), 1);
        assert_eq!(board.prisoners(1), 0);
        board.check_invariants();
    }

    #[test]
    fn test_captured_region_is_not_coalesced() {
        // Player 1 stone at the corner, captured by two player 0 stones.
        let mut board = setup(3, &[((0, 0), 1), ((0, 1), 0)]);
        assert!(board.place_stone((1, 0), 0));
        assert_eq!(board.resolve_captures(0), 1);
        let captured = board.dragon_at((0, 0));
        assert!(board.dragon(captured).owner().is_unoccupied());
        assert_eq!(board.dragon(captured).len(), 1);
        assert_ne!(captured, board.dragon_at((2, 2)));
        board.check_invariants();
    }

    #[test]
    fn test_playing_into_captured_cell_destroys_its_dragon() {
        let mut board = setup(3, &[((0, 0), 1), ((0, 1), 0), ((1, 0), 0)]);
        board.resolve_captures(0);
        let before = board.dragons().count();
        assert!(board.place_stone((0, 0), 0));
        // The captured region is gone and the stone joined both neighbors.
        assert_eq!(board.dragons().count(), before - 2);
        assert_eq!(board.dragon(board.dragon_at((0, 0))).len(), 3);
        board.check_invariants();
    }

    #[test]
    fn test_score_center_stone() {
        let board = setup(3, &[((1, 1), 0)]);
        let scores = board.score();
        assert_eq!(
            scores,
            vec![
                PlayerScore { score: 9, player: 0 },
                PlayerScore { score: 0, player: 1 },
            ]
        );
    }

    #[test]
    fn test_score_tie_orders_by_player() {
        let mut stones = Vec::new();
        for r in 0..4 {
            stones.push(((r, 1), 0));
            stones.push(((r, 2), 1));
        }
        let board = setup(4, &stones);
        let scores = board.score();
        assert_eq!(scores[0], PlayerScore { score: 8, player: 0 });
        assert_eq!(scores[1], PlayerScore { score: 8, player: 1 });
    }

    #[test]
    fn test_score_shared_region_is_neutral() {
        let board = setup(3, &[((0, 0), 0), ((2, 2), 1)]);
        let scores = board.score();
        assert_eq!(scores[0], PlayerScore { score: 1, player: 0 });
        assert_eq!(scores[1], PlayerScore { score: 1, player: 1 });
    }

    #[test]
    fn test_relative_snapshot() {
        let board = setup(2, &[((0, 0), 0), ((1, 1), 1)]);
        let abs = board.snapshot();
        assert_eq!(abs.cells(), &[0, UNOCCUPIED, UNOCCUPIED, 1]);
        let rel = board.relative_snapshot(1);
        assert_eq!(rel.cells(), &[1, UNOCCUPIED, UNOCCUPIED, 0]);
    }

    #[test]
    fn test_snapshot_from_rows() {
        let snap = Snapshot::from_rows(&[vec![0, UNOCCUPIED], vec![UNOCCUPIED, 1]]);
        assert_eq!(snap.size(), 2);
        assert_eq!(snap.get((1, 1)), 1);
        assert_eq!(snap.rows().count(), 2);
    }

    #[test]
    #[should_panic(expected = "wrong length")]
    fn test_snapshot_rejects_ragged_rows() {
        // Nine cells in total, but not three rows of three.
        Snapshot::from_rows(&[vec![0, 0, 0, 0], vec![0, 0, 0, 0], vec![0]]);
    }

    #[test]
    fn test_display() {
        let board = setup(2, &[((0, 0), 0), ((1, 1), 1)]);
        assert_eq!(board.to_string(), "X .\n. O\n");
    }
}
