//! Match controller: alternating turns until everyone passes.
//!
//! Each turn the active player (turn index mod player count) is shown the
//! board from its own side and asked for a move. A pass, an occupied cell or
//! an off-board cell all count as passing. After the move, captures are
//! resolved opponents first and the mover last.
//!
//! The match ends when every player's most recent turn was a pass, or after
//! `TURN_CAP_FACTOR * size * size` turns. Repeated positions are not
//! detected; the turn cap is what guarantees termination.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::board::{Board, PlayerScore};
use crate::constants::{DEFAULT_BOARD_SIZE, DEFAULT_MIN_VOTES, TURN_CAP_FACTOR};
use crate::error::ConfigError;
use crate::gene::Individual;
use crate::player::{GenePlayer, Player};

/// Runtime parameters of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub board_size: usize,
    /// Minimum number of pattern votes a cell needs to be played.
    pub min_votes: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            min_votes: DEFAULT_MIN_VOTES,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 {
            return Err(ConfigError::EmptyBoard);
        }
        Ok(())
    }

    /// Maximum number of turns before the match is cut off.
    pub fn turn_cap(&self) -> usize {
        TURN_CAP_FACTOR * self.board_size * self.board_size
    }
}

/// Final result of a match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// Scores sorted best first, ties by ascending player.
    pub scores: Vec<PlayerScore>,
    /// Number of turns played.
    pub turns: usize,
}

impl Outcome {
    /// The winning player, or `None` if the top score is shared.
    pub fn winner(&self) -> Option<usize> {
        match self.scores.as_slice() {
            [first, second, ..] if first.score == second.score => None,
            [first, ..] => Some(first.player),
            [] => None,
        }
    }

    /// Difference between the best and second-best score.
    pub fn margin(&self) -> i64 {
        match self.scores.as_slice() {
            [first, second, ..] => first.score - second.score,
            _ => 0,
        }
    }

    pub fn score_of(&self, player: usize) -> Option<i64> {
        self.scores
            .iter()
            .find(|s| s.player == player)
            .map(|s| s.score)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchState {
    InProgress,
    Finished(Outcome),
}

/// A match between two or more players on one board.
pub struct Match<'a> {
    config: MatchConfig,
    players: Vec<Box<dyn Player + 'a>>,
    board: Board,
    turn: usize,
    /// Whether each player placed a stone on its most recent turn.
    moved: Vec<bool>,
    state: MatchState,
}

impl<'a> Match<'a> {
    /// Start a match on an empty board.
    pub fn new(
        config: MatchConfig,
        players: Vec<Box<dyn Player + 'a>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.board_size, players.len());
        Self::with_board(config, players, board)
    }

    /// Start a match from a prepared board.
    pub fn with_board(
        config: MatchConfig,
        players: Vec<Box<dyn Player + 'a>>,
        board: Board,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if players.len() < 2 {
            return Err(ConfigError::TooFewPlayers(players.len()));
        }
        if board.n_players() != players.len() {
            return Err(ConfigError::PlayerMismatch {
                board: board.n_players(),
                given: players.len(),
            });
        }
        if board.size() != config.board_size {
            return Err(ConfigError::SizeMismatch {
                board: board.size(),
                config: config.board_size,
            });
        }
        let moved = vec![true; players.len()];
        Ok(Self {
            config,
            players,
            board,
            turn: 0,
            moved,
            state: MatchState::InProgress,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Number of turns played so far.
    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.state {
            MatchState::Finished(outcome) => Some(outcome),
            MatchState::InProgress => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, MatchState::Finished(_))
    }

    /// Active player for the next turn.
    pub fn current_player(&self) -> usize {
        self.turn % self.players.len()
    }

    /// Play a single turn. Does nothing once the match is finished.
    pub fn step(&mut self) -> &MatchState {
        if self.is_finished() {
            return &self.state;
        }
        if self.should_end() {
            self.finish();
            return &self.state;
        }

        let player = self.current_player();
        let snapshot = self.board.relative_snapshot(player);
        let mv = self.players[player].get_move(&snapshot, self.config.min_votes);
        let placed = mv.is_some_and(|loc| self.board.place_stone(loc, player));
        self.moved[player] = placed;

        match mv {
            Some(loc) if placed => debug!("Turn {}: player {player} plays {loc:?}", self.turn),
            Some(loc) => debug!(
                "Turn {}: player {player} tried {loc:?}, counted as a pass",
                self.turn
            ),
            None => debug!("Turn {}: player {player} passes", self.turn),
        }

        let captured = self.board.resolve_captures(player);
        if captured > 0 {
            debug!("Turn {}: {captured} stone(s) captured", self.turn);
        }
        trace!("\n{}", self.board);

        self.turn += 1;
        if self.should_end() {
            self.finish();
        }
        &self.state
    }

    /// Play until the match ends and return the outcome.
    pub fn play(&mut self) -> Outcome {
        loop {
            if let MatchState::Finished(outcome) = self.step() {
                return outcome.clone();
            }
        }
    }

    fn should_end(&self) -> bool {
        self.moved.iter().all(|&m| !m) || self.turn >= self.config.turn_cap()
    }

    fn finish(&mut self) {
        let outcome = Outcome {
            scores: self.board.score(),
            turns: self.turn,
        };
        debug!(
            "Match finished after {} turns: {:?}",
            outcome.turns, outcome.scores
        );
        self.state = MatchState::Finished(outcome);
    }
}

/// Seat two individuals, `a` first.
///
/// Each side gets its own random stream seeded from `rng`, `a`'s drawn first.
pub fn gene_players<'a>(
    a: &'a Individual,
    b: &'a Individual,
    rng: &mut fastrand::Rng,
) -> Vec<Box<dyn Player + 'a>> {
    vec![
        Box::new(GenePlayer::with_seed(a, rng.u64(..))),
        Box::new(GenePlayer::with_seed(b, rng.u64(..))),
    ]
}

/// Play one match between two individuals; `a` moves first.
pub fn play_match(
    a: &Individual,
    b: &Individual,
    config: &MatchConfig,
    rng: &mut fastrand::Rng,
) -> Result<Outcome, ConfigError> {
    let mut game = Match::new(config.clone(), gene_players(a, b, rng))?;
    Ok(game.play())
}
