//! Default parameters and board encoding constants.
//!
//! Board size, vote threshold and player count are runtime values carried by
//! [`MatchConfig`](crate::game::MatchConfig); the values here are only the
//! defaults used when nothing else is specified.

// =============================================================================
// Match Parameters
// =============================================================================

/// Default board size (NxN).
pub const DEFAULT_BOARD_SIZE: usize = 9;

/// Default minimum number of pattern votes a cell needs before it is played.
pub const DEFAULT_MIN_VOTES: u32 = 2;

/// Number of players in the reference configuration.
pub const DEFAULT_PLAYERS: usize = 2;

/// A match is cut off after `TURN_CAP_FACTOR * size * size` turns.
///
/// There is no repetition detection, so this is the only guarantee that a
/// match ends.
pub const TURN_CAP_FACTOR: usize = 4;

// =============================================================================
// Snapshot Encoding
// =============================================================================

/// Snapshot value of an empty cell.
pub const UNOCCUPIED: i32 = -1;

/// Snapshot value of the querying player's own stones after renormalization.
pub const OWN_STONE: i32 = 0;

// =============================================================================
// Neighbor Offsets
// =============================================================================

/// Orthogonal neighbor offsets as (row, col) deltas.
/// Order: up, right, down, left. Edge constraints use the same order.
pub const DELTA: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

// =============================================================================
// Gene Generation
// =============================================================================

/// Smallest legal gene side length.
pub const MIN_GENE_SIZE: usize = 2;

/// Default largest gene side length for random individuals.
pub const DEFAULT_MAX_GENE_SIZE: usize = 9;

/// Default number of genes in a random individual.
pub const DEFAULT_GENES: usize = 10;

/// Default probability that a random gene edge carries a constraint.
pub const DEFAULT_EDGE_CHANCE: f64 = 0.05;

/// Relative players a stone constraint can name (`Stone(u8)`).
pub const MAX_STONE_PLAYERS: usize = 256;
