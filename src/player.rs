//! The player capability used by the match controller.

use crate::board::{Point, Snapshot};
use crate::gene::Individual;
use crate::patterns::choose_move;

pub trait Player {
    /// Decide where to play on `board`, or return `None` to pass.
    ///
    /// The board is seen from this player's side: own stones are `0`. A move
    /// onto an occupied or off-board cell is treated as a pass.
    fn get_move(&mut self, board: &Snapshot, min_votes: u32) -> Option<Point>;
}

impl<F: FnMut(&Snapshot, u32) -> Option<Point>> Player for F {
    fn get_move(&mut self, board: &Snapshot, min_votes: u32) -> Option<Point> {
        self(board, min_votes)
    }
}

/// Plays the moves proposed by an individual's genes.
pub struct GenePlayer<'a> {
    individual: &'a Individual,
    rng: fastrand::Rng,
}

impl<'a> GenePlayer<'a> {
    pub fn new(individual: &'a Individual, rng: fastrand::Rng) -> Self {
        Self { individual, rng }
    }

    pub fn with_seed(individual: &'a Individual, seed: u64) -> Self {
        Self::new(individual, fastrand::Rng::with_seed(seed))
    }

    pub fn individual(&self) -> &Individual {
        self.individual
    }
}

impl Player for GenePlayer<'_> {
    fn get_move(&mut self, board: &Snapshot, min_votes: u32) -> Option<Point> {
        choose_move(board, self.individual.genes(), min_votes, &mut self.rng)
    }
}

/// Always passes.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passer;

impl Player for Passer {
    fn get_move(&mut self, _board: &Snapshot, _min_votes: u32) -> Option<Point> {
        None
    }
}
