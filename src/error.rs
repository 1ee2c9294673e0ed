//! Error types for gene construction and match configuration.
//!
//! Illegal moves are not errors: a move onto an occupied cell is a pass.
//! Broken board bookkeeping is not an error either: it panics.

/// A gene that cannot be built or loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneError {
    #[error("Gene size must be at least {min}, got {size}")]
    TooSmall { size: usize, min: usize },
    #[error("Gene of size {size} needs {expected} cells, got {found}")]
    CellCount {
        size: usize,
        expected: usize,
        found: usize,
    },
    #[error("Gene size {0} is too large")]
    TooLarge(usize),
    #[error("Stone constraints cover at most {max} players, got {n_players}")]
    TooManyPlayers { n_players: usize, max: usize },
    #[error("Invalid cell code {0}")]
    InvalidCellCode(i32),
    #[error("Invalid edge code {0}")]
    InvalidEdgeCode(i8),
}

/// A match that cannot be set up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Board size must be non-zero")]
    EmptyBoard,
    #[error("A match needs at least 2 players, got {0}")]
    TooFewPlayers(usize),
    #[error("Board has {board} players but {given} were supplied")]
    PlayerMismatch { board: usize, given: usize },
    #[error("Board is {board}x{board} but the configuration asks for {config}x{config}")]
    SizeMismatch { board: usize, config: usize },
}
