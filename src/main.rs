//! Gene-Go command line.
//!
//! ## Usage
//!
//! - `gene-go` - Play a demo match between two random individuals
//! - `gene-go generate --out pop.json` - Write a random population
//! - `gene-go play pop.json 0 1` - Play two members of a population
//! - `gene-go tournament pop.json` - Round robin over a population
//!
//! Set `RUST_LOG=debug` to follow matches turn by turn.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use gene_go::constants::{
    DEFAULT_BOARD_SIZE, DEFAULT_EDGE_CHANCE, DEFAULT_GENES, DEFAULT_MAX_GENE_SIZE,
    DEFAULT_MIN_VOTES, DEFAULT_PLAYERS,
};
use gene_go::game::{Match, MatchConfig, gene_players};
use gene_go::gene::{GeneParams, Individual};
use gene_go::tournament::{load_population, round_robin, save_population};

/// Gene-Go: evolved pattern strategies for a Go-like game
#[derive(Parser)]
#[command(name = "gene-go")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Board size (NxN)
    #[arg(long, global = true, default_value_t = DEFAULT_BOARD_SIZE)]
    size: usize,

    /// Minimum pattern votes needed to play a cell
    #[arg(long, global = true, default_value_t = DEFAULT_MIN_VOTES)]
    min_votes: u32,

    /// Random seed (random if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match between two random individuals
    Demo,
    /// Write a population of random individuals
    Generate {
        /// Number of individuals
        #[arg(long, default_value_t = 50)]
        count: usize,
        /// Genes per individual
        #[arg(long, default_value_t = DEFAULT_GENES)]
        genes: usize,
        /// Largest gene side length
        #[arg(long, default_value_t = DEFAULT_MAX_GENE_SIZE)]
        max_gene_size: usize,
        /// Probability that a gene edge is constrained
        #[arg(long, default_value_t = DEFAULT_EDGE_CHANCE)]
        edge_chance: f64,
        /// Output file
        #[arg(long)]
        out: PathBuf,
    },
    /// Play two members of a population against each other
    Play {
        population: PathBuf,
        #[arg(default_value_t = 0)]
        a: usize,
        #[arg(default_value_t = 1)]
        b: usize,
    },
    /// Play every member of a population against every other
    Tournament { population: PathBuf },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = MatchConfig {
        board_size: cli.size,
        min_votes: cli.min_votes,
    };
    config.validate()?;
    let mut rng = match cli.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    match cli.command {
        Some(Commands::Generate {
            count,
            genes,
            max_gene_size,
            edge_chance,
            out,
        }) => {
            let params = GeneParams {
                n_genes: genes,
                max_gene_size,
                n_players: DEFAULT_PLAYERS,
                edge_chance,
            };
            let population = (0..count)
                .map(|_| Individual::random(&params, &mut rng))
                .collect::<Result<Vec<_>, _>>()?;
            save_population(&out, &population)?;
            println!("Wrote {count} individuals to {}", out.display());
        }
        Some(Commands::Play { population, a, b }) => {
            let population = load_population(&population)?;
            let first = population
                .get(a)
                .with_context(|| format!("no individual {a} in a population of {}", population.len()))?;
            let second = population
                .get(b)
                .with_context(|| format!("no individual {b} in a population of {}", population.len()))?;
            run_match(first, second, &config, &mut rng)?;
        }
        Some(Commands::Tournament { population }) => {
            let population = load_population(&population)?;
            if population.len() < 2 {
                bail!("a tournament needs at least 2 individuals");
            }
            let fitness = round_robin(&population, &config, &mut rng)?;
            for (i, f) in fitness.iter().enumerate() {
                println!("{i}: {f}");
            }
        }
        Some(Commands::Demo) | None => {
            let params = GeneParams::default();
            let a = Individual::random(&params, &mut rng)?;
            let b = Individual::random(&params, &mut rng)?;
            println!("Player 1 (X):\n{a}");
            println!("Player 2 (O):\n{b}");
            run_match(&a, &b, &config, &mut rng)?;
        }
    }

    Ok(())
}

fn run_match(
    a: &Individual,
    b: &Individual,
    config: &MatchConfig,
    rng: &mut fastrand::Rng,
) -> anyhow::Result<()> {
    let mut game = Match::new(config.clone(), gene_players(a, b, rng))?;
    let outcome = game.play();

    println!("{}", game.board());
    match outcome.winner() {
        Some(w) => println!("Player {} won by {}.", w + 1, outcome.margin()),
        None => println!("Tie."),
    }
    for s in &outcome.scores {
        println!("Player {}: {}", s.player + 1, s.score);
    }
    println!("Turns: {}", outcome.turns);
    Ok(())
}
