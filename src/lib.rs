//! Gene-Go: pattern-gene strategies playing a Go-like territory game.
//!
//! Strategies ("individuals") are lists of small square pattern templates.
//! Each turn every template votes for empty cells where it matches the board,
//! and the most-voted cell is played. A rules engine tracks connected groups
//! ("dragons"), captures and scoring.
//!
//! ## Modules
//!
//! - [`constants`] - Defaults and board encoding
//! - [`board`] - Dragon engine: placement, merging, captures, scoring
//! - [`gene`] - Genes, individuals and their serialized form
//! - [`patterns`] - Pattern matching move evaluator
//! - [`player`] - The player capability used by matches
//! - [`game`] - Match controller
//! - [`tournament`] - Round robin over a population, population files
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use gene_go::game::{MatchConfig, play_match};
//! use gene_go::gene::{Gene, Individual};
//!
//! // Vote for every cell of any empty 2x2 window.
//! let gene = Gene::from_codes(2, &[0, 0, 0, 0], [0, 0, 0, 0]).unwrap();
//! let greedy = Individual::new(vec![gene]);
//! let idle = Individual::default();
//!
//! let config = MatchConfig { board_size: 3, min_votes: 1 };
//! let mut rng = fastrand::Rng::with_seed(1);
//! let outcome = play_match(&greedy, &idle, &config, &mut rng).unwrap();
//! assert_eq!(outcome.winner(), Some(0));
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod game;
pub mod gene;
pub mod patterns;
pub mod player;
pub mod tournament;
