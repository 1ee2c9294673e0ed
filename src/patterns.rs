//! Pattern matching for move generation.
//!
//! Every gene of a strategy is slid over every placement where it fits on
//! the board, in each of its distinct rotations. A placement matches when
//! the template's edge constraints agree with where it sits on the board and
//! every template cell accepts the board cell under it. A matching placement
//! gives one vote to each empty cell under a [`CellConstraint::Move`] cell.
//!
//! The move played is drawn uniformly from the cells with the most votes,
//! provided that count reaches the minimum threshold. Otherwise the player
//! passes.
//!
//! The board must already be renormalized so that the querying player's
//! stones are `0` (see [`Board::relative_snapshot`](crate::board::Board::relative_snapshot)).

use log::trace;

use crate::board::{Point, Snapshot};
use crate::gene::{CellConstraint, Gene};

/// Votes collected per board cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tally {
    size: usize,
    votes: Vec<u32>,
}

impl Tally {
    fn new(size: usize) -> Self {
        Self {
            size,
            votes: vec![0; size * size],
        }
    }

    pub fn get(&self, (r, c): Point) -> u32 {
        self.votes[r * self.size + c]
    }

    /// Row-major vote counts.
    pub fn votes(&self) -> &[u32] {
        &self.votes
    }

    pub fn max(&self) -> u32 {
        self.votes.iter().copied().max().unwrap_or(0)
    }
}

/// Count the votes of all genes on the board.
pub fn tally(board: &Snapshot, genes: &[Gene]) -> Tally {
    let n = board.size();
    let mut tally = Tally::new(n);

    for gene in genes {
        let g = gene.size();
        if g > n {
            continue;
        }
        let rotations = gene.distinct_rotations();
        for r in 0..=n - g {
            for c in 0..=n - g {
                // top, right, bottom, left
                let on_edge = [r == 0, c + g == n, r + g == n, c == 0];
                for template in &rotations {
                    if edges_allow(template, on_edge) && cells_match(board, template, (r, c)) {
                        vote(&mut tally, board, template, (r, c));
                    }
                }
            }
        }
    }

    tally
}

fn edges_allow(template: &Gene, on_edge: [bool; 4]) -> bool {
    template
        .edges()
        .iter()
        .zip(on_edge)
        .all(|(edge, on)| edge.allows(on))
}

fn cells_match(board: &Snapshot, template: &Gene, (r0, c0): Point) -> bool {
    let g = template.size();
    (0..g).all(|i| (0..g).all(|j| template.cell(i, j).matches(board.get((r0 + i, c0 + j)))))
}

fn vote(tally: &mut Tally, board: &Snapshot, template: &Gene, (r0, c0): Point) {
    let g = template.size();
    for i in 0..g {
        for j in 0..g {
            let loc = (r0 + i, c0 + j);
            if template.cell(i, j) == CellConstraint::Move && board.is_unoccupied(loc) {
                tally.votes[loc.0 * tally.size + loc.1] += 1;
            }
        }
    }
}

/// Pick a move for the player whose stones are `0` on `board`.
///
/// Returns `None` (a pass) when no empty cell reaches `min_votes`.
pub fn choose_move(
    board: &Snapshot,
    genes: &[Gene],
    min_votes: u32,
    rng: &mut fastrand::Rng,
) -> Option<Point> {
    let tally = tally(board, genes);
    let best = tally.max();
    let n = board.size();

    let candidates: Vec<Point> = (0..n)
        .flat_map(|r| (0..n).map(move |c| (r, c)))
        .filter(|&loc| board.is_unoccupied(loc))
        .filter(|&loc| {
            let v = tally.get(loc);
            v >= min_votes && v == best
        })
        .collect();
    trace!(
        "{} candidate move(s) with {best} vote(s), threshold {min_votes}",
        candidates.len()
    );

    if candidates.is_empty() {
        None
    } else {
        Some(candidates[rng.usize(..candidates.len())])
    }
}
