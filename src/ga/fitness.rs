//! Fitness evaluation, ranking, and score queries.
//!
//! Fitness is maximized: higher scores are better. Evaluation is the only
//! parallel part of the engine; everything here that reads scores is
//! sequential.

use super::types::{EngineState, FitnessMap, Gene, Individual, Score};
use crate::error::{GaError, Result};
use rayon::prelude::*;
use std::cmp::Ordering;

/// Caller-supplied fitness function.
pub type FitnessFn<G> = dyn Fn(&Individual<G>) -> f64 + Send + Sync;

/// Evaluates `fitness_fn` once per individual and collects raw scores.
///
/// With `parallel`, individuals are scored on the rayon pool. Results are
/// merged in population order, so when two individuals are equal the later
/// one's score wins and the map keeps a single entry for both.
pub fn evaluate<G, F>(fitness_fn: &F, population: &[Individual<G>], parallel: bool) -> FitnessMap<G>
where
    G: Gene,
    F: Fn(&Individual<G>) -> f64 + Sync + ?Sized,
{
    let scores: Vec<f64> = if parallel {
        population.par_iter().map(|ind| fitness_fn(ind)).collect()
    } else {
        population.iter().map(|ind| fitness_fn(ind)).collect()
    };

    let mut fitness = FitnessMap::with_capacity(population.len());
    for (ind, score) in population.iter().zip(scores) {
        fitness.insert(ind.clone(), Score::Raw(score));
    }
    fitness
}

/// Replaces scores by their rank: 0 for the worst, `k - 1` for the best.
///
/// Equal scores are ordered by map insertion order (stable sort), not by
/// any property of the individuals. NaN scores rank below everything.
/// Entries keep their original order in the returned map.
pub fn rank<G: Gene>(fitness: &FitnessMap<G>) -> FitnessMap<G> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| fitness[a].total_cmp(&fitness[b]));

    let mut ranks = vec![0usize; fitness.len()];
    for (rank, &idx) in order.iter().enumerate() {
        ranks[idx] = rank;
    }

    fitness
        .keys()
        .zip(ranks)
        .map(|(ind, r)| (ind.clone(), Score::Rank(r)))
        .collect()
}

/// Fitness entries sorted by score, best first.
///
/// Ties keep map insertion order.
pub fn sorted<G: Gene>(state: &EngineState<G>) -> Vec<(Individual<G>, Score)> {
    sorted_entries(&state.fitness)
}

pub(crate) fn sorted_entries<G: Gene>(fitness: &FitnessMap<G>) -> Vec<(Individual<G>, Score)> {
    let mut entries: Vec<(Individual<G>, Score)> = fitness
        .iter()
        .map(|(ind, score)| (ind.clone(), *score))
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries
}

/// The highest-scoring entry; the first one in insertion order on ties.
///
/// Returns the rank when the state is ranked.
pub fn best<G: Gene>(state: &EngineState<G>) -> Result<(Individual<G>, Score)> {
    let mut iter = state.fitness.iter();
    let (first_ind, first_score) = iter.next().ok_or(GaError::EmptyPopulation)?;

    let mut best = (first_ind, *first_score);
    for (ind, score) in iter {
        if score.total_cmp(&best.1) == Ordering::Greater {
            best = (ind, *score);
        }
    }
    Ok((best.0.clone(), best.1))
}

/// Summary of one generation's scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Generation the statistics describe.
    pub generation: u64,
    /// Highest score.
    pub best: f64,
    /// Mean score over distinct individuals.
    pub mean: f64,
    /// Lowest score.
    pub worst: f64,
    /// Number of distinct individuals (fitness map size).
    pub distinct: usize,
}

impl GenerationStats {
    /// Computes statistics over the state's fitness map.
    pub fn from_state<G: Gene>(state: &EngineState<G>) -> Result<Self> {
        if state.fitness.is_empty() {
            return Err(GaError::EmptyPopulation);
        }

        let values = state.fitness.values().map(|s| s.value());
        let (mut best, mut worst, mut sum) = (f64::NEG_INFINITY, f64::INFINITY, 0.0);
        for v in values {
            best = best.max(v);
            worst = worst.min(v);
            sum += v;
        }

        Ok(Self {
            generation: state.generation,
            best,
            mean: sum / state.fitness.len() as f64,
            worst,
            distinct: state.fitness.len(),
        })
    }
}
