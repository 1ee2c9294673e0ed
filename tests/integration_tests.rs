//! Integration tests for gene-go
//!
//! These drive the engine through the public API: full matches between
//! random individuals, board invariants after every turn, and population
//! files on disk.

use gene_go::board::{Board, Owner, PlayerScore, Point, Snapshot};
use gene_go::game::{Match, MatchConfig, play_match};
use gene_go::gene::{GeneParams, Individual};
use gene_go::player::{GenePlayer, Passer, Player};
use gene_go::tournament::{load_population, round_robin, save_population};

// =============================================================================
// Helper functions
// =============================================================================

/// Random individuals with small genes, so they actually find moves.
fn random_population(count: usize, seed: u64) -> Vec<Individual> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let params = GeneParams {
        n_genes: 12,
        max_gene_size: 3,
        ..GeneParams::default()
    };
    (0..count)
        .map(|_| Individual::random(&params, &mut rng).unwrap())
        .collect()
}

fn config(board_size: usize, min_votes: u32) -> MatchConfig {
    MatchConfig {
        board_size,
        min_votes,
    }
}

// =============================================================================
// Board invariants across whole matches
// =============================================================================

#[test]
fn test_invariants_hold_after_every_turn() {
    for seed in 0..8 {
        let population = random_population(2, seed);
        let players: Vec<Box<dyn Player + '_>> = vec![
            Box::new(GenePlayer::with_seed(&population[0], seed)),
            Box::new(GenePlayer::with_seed(&population[1], seed + 100)),
        ];
        let mut game = Match::new(config(6, 1), players).unwrap();
        game.board().check_invariants();
        while !game.is_finished() {
            game.step();
            game.board().check_invariants();
        }
    }
}

#[test]
fn test_partition_covers_board() {
    let population = random_population(2, 42);
    let players: Vec<Box<dyn Player + '_>> = vec![
        Box::new(GenePlayer::with_seed(&population[0], 1)),
        Box::new(GenePlayer::with_seed(&population[1], 2)),
    ];
    let mut game = Match::new(config(7, 1), players).unwrap();
    for _ in 0..40 {
        game.step();
        let board = game.board();
        let covered: usize = board.dragons().map(|(_, d)| d.len()).sum();
        assert_eq!(covered, 49);
        for r in 0..7 {
            for c in 0..7 {
                let id = board.dragon_at((r, c));
                assert!(board.dragon(id).cells().contains(&(r, c)));
            }
        }
    }
}

#[test]
fn test_liberties_are_stable() {
    let population = random_population(2, 9);
    let players: Vec<Box<dyn Player + '_>> = vec![
        Box::new(GenePlayer::with_seed(&population[0], 3)),
        Box::new(GenePlayer::with_seed(&population[1], 4)),
    ];
    let mut game = Match::new(config(6, 1), players).unwrap();
    for _ in 0..20 {
        game.step();
    }
    let board = game.board();
    for (id, _) in board.dragons() {
        assert_eq!(board.liberties(id), board.liberties(id));
    }
}

// =============================================================================
// Scoring
// =============================================================================

#[test]
fn test_score_matches_stone_and_territory_count() {
    let mut board = Board::new(3, 2);
    board.place_stone((1, 1), 0);
    assert_eq!(
        board.score(),
        vec![
            PlayerScore { score: 9, player: 0 },
            PlayerScore { score: 0, player: 1 },
        ]
    );
}

#[test]
fn test_mirrored_board_ties_in_player_order() {
    // X X . . O O   split down the middle, mirrored
    let mut board = Board::new(6, 2);
    for r in 0..6 {
        board.place_stone((r, 2), 0);
        board.place_stone((r, 3), 1);
    }
    let scores = board.score();
    assert_eq!(scores[0].score, scores[1].score);
    assert_eq!(scores[0].player, 0);
    assert_eq!(scores[1].player, 1);
    assert_eq!(scores[0].score, 18);
}

#[test]
fn test_prisoners_reduce_score() {
    // Player 1 stone in the corner, captured by player 0.
    let mut board = Board::new(3, 2);
    board.place_stone((0, 0), 1);
    board.place_stone((0, 1), 0);
    board.place_stone((1, 0), 0);
    board.resolve_captures(0);
    assert!(board.owner((0, 0)).is_unoccupied());
    assert_eq!(board.prisoners(1), 1);
    let scores = board.score();
    let p1 = scores.iter().find(|s| s.player == 1).unwrap();
    assert_eq!(p1.score, -1);
}

// =============================================================================
// Match flow
// =============================================================================

#[test]
fn test_passing_players_end_in_two_turns() {
    let mut board = Board::new(4, 2);
    board.place_stone((0, 0), 1);
    let players: Vec<Box<dyn Player>> = vec![Box::new(Passer), Box::new(Passer)];
    let mut game = Match::with_board(config(4, 2), players, board).unwrap();
    let outcome = game.play();
    assert_eq!(outcome.turns, 2);
    assert_eq!(outcome.winner(), Some(1));
    assert_eq!(outcome.score_of(1), Some(16));
}

#[test]
fn test_capture_beats_suicide_in_a_match() {
    // . X O
    // X O .
    // . . .
    let mut board = Board::new(3, 2);
    board.place_stone((0, 1), 0);
    board.place_stone((1, 0), 0);
    board.place_stone((0, 2), 1);
    board.place_stone((1, 1), 1);

    let mut played = false;
    let capturer = move |_: &Snapshot, _: u32| -> Option<Point> {
        if played {
            None
        } else {
            played = true;
            Some((0, 0))
        }
    };
    let players: Vec<Box<dyn Player>> = vec![Box::new(Passer), Box::new(capturer)];
    let mut game = Match::with_board(config(3, 1), players, board).unwrap();
    game.step();
    game.step();
    assert_eq!(game.board().owner((0, 0)), Owner::Player(1));
    assert!(game.board().owner((0, 1)).is_unoccupied());
    assert_eq!(game.board().prisoners(0), 1);
    assert_eq!(game.board().prisoners(1), 0);
}

#[test]
fn test_matches_respect_turn_cap() {
    let population = random_population(6, 77);
    let cfg = config(5, 1);
    let mut rng = fastrand::Rng::with_seed(77);
    for pair in population.chunks(2) {
        let outcome = play_match(&pair[0], &pair[1], &cfg, &mut rng).unwrap();
        assert!(outcome.turns <= cfg.turn_cap());
        assert_eq!(outcome.scores.len(), 2);
    }
}

// =============================================================================
// Tournament and population files
// =============================================================================

#[test]
fn test_population_file_roundtrip() {
    let population = random_population(5, 3);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("generation_0.json");
    save_population(&path, &population).unwrap();
    let loaded = load_population(&path).unwrap();
    assert_eq!(loaded, population);
}

#[test]
fn test_load_missing_population_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_population(&dir.path().join("missing.json")).is_err());
}

#[test]
fn test_round_robin_reproducible() {
    let population = random_population(4, 12);
    let cfg = config(5, 1);
    let first = round_robin(&population, &cfg, &mut fastrand::Rng::with_seed(8)).unwrap();
    let second = round_robin(&population, &cfg, &mut fastrand::Rng::with_seed(8)).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.iter().sum::<i64>(), 0);
}
