//! Round-robin evaluation of a population, and population files.
//!
//! The population is plain data owned by the caller. Selection, crossover
//! and mutation happen elsewhere; this module only measures individuals
//! against each other and stores them.

use std::fs;
use std::path::Path;

use anyhow::Context;
use log::{debug, info};

use crate::error::ConfigError;
use crate::game::{MatchConfig, play_match};
use crate::gene::Individual;

/// Play every ordered pair `(i, j)`, `i != j`, once with `i` moving first.
///
/// The winner of each match gains the score margin and the loser loses it;
/// ties change nothing. Returns one fitness value per individual.
pub fn round_robin(
    population: &[Individual],
    config: &MatchConfig,
    rng: &mut fastrand::Rng,
) -> Result<Vec<i64>, ConfigError> {
    config.validate()?;
    let mut fitness = vec![0i64; population.len()];

    for i in 0..population.len() {
        for j in 0..population.len() {
            if i == j {
                continue;
            }
            let outcome = play_match(&population[i], &population[j], config, rng)?;
            let gap = outcome.margin();
            match outcome.winner() {
                None => debug!("Game {i}, {j} finished. Tie."),
                Some(w) => {
                    let (winner, loser) = if w == 0 { (i, j) } else { (j, i) };
                    fitness[winner] += gap;
                    fitness[loser] -= gap;
                    debug!("Game {i}, {j} finished. Individual {winner} won by {gap}.");
                }
            }
        }
        info!("Individual {i} has finished its games.");
    }

    Ok(fitness)
}

/// Write a population as JSON.
pub fn save_population(path: &Path, population: &[Individual]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(population)?;
    fs::write(path, json).with_context(|| format!("writing population to {}", path.display()))?;
    info!("Saved {} individuals to {}", population.len(), path.display());
    Ok(())
}

/// Read a population written by [`save_population`].
pub fn load_population(path: &Path) -> anyhow::Result<Vec<Individual>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading population from {}", path.display()))?;
    let population: Vec<Individual> = serde_json::from_str(&json)
        .with_context(|| format!("parsing population in {}", path.display()))?;
    Ok(population)
}
