//! Generation transitions and the convergence loop.
//!
//! [`Engine`] composes the operators into one generation step
//! (elitism → selection → crossover → mutation → evaluation) and repeats
//! it until a stopping predicate holds or the iteration budget runs out.

use super::config::EngineConfig;
use super::fitness::{best, evaluate, rank, sorted, GenerationStats};
use super::mutation::mutate_with_rate;
use super::types::{EngineState, FitnessMap, Gene, Individual};
use crate::error::Result;
use rand::{Rng, RngCore};
use tracing::{debug, info, instrument, warn};

/// Executes the evolutionary engine.
///
/// # Usage
///
/// ```ignore
/// let config = EngineConfig::new(50, fitness, gene_mutator).with_keep_n(2);
/// let mut rng = config.rng();
/// let state = Engine::init(generator, &config, &mut rng)?;
/// let state = Engine::run(state, &config, 200, |best| best >= 20.0, &mut rng)?;
/// ```
pub struct Engine;

impl Engine {
    /// Creates the initial state: `N` generated individuals, evaluated once,
    /// at generation 0.
    pub fn init<G, F, R>(
        mut generator: F,
        config: &EngineConfig<G>,
        rng: &mut R,
    ) -> Result<EngineState<G>>
    where
        G: Gene,
        F: FnMut(&mut dyn RngCore) -> Individual<G>,
        R: Rng,
    {
        config.validate()?;

        let rng: &mut dyn RngCore = rng;
        let mut population = Vec::with_capacity(config.population_size);
        for _ in 0..config.population_size {
            population.push(generator(&mut *rng));
        }

        let fitness = score_population(config, &population);
        Ok(EngineState::new(population, fitness, 0))
    }

    /// Produces the next generation.
    ///
    /// The new population is the `keep_n` best individuals followed by the
    /// (possibly mutated) offspring of every selected pair, cut to `N`.
    /// Every offspring is mutated before the cut, so each one consumes its
    /// mutation draws even when it is dropped.
    /// A selection strategy yielding fewer than `(N - keep_n) / 2` pairs
    /// shrinks the population; this is logged, not rejected.
    pub fn step<G, R>(
        state: &EngineState<G>,
        config: &EngineConfig<G>,
        rng: &mut R,
    ) -> Result<EngineState<G>>
    where
        G: Gene,
        R: Rng,
    {
        let rng: &mut dyn RngCore = rng;
        let n = config.population_size;

        // 1. Elites
        let mut population: Vec<Individual<G>> = sorted(state)
            .into_iter()
            .take(config.keep_n)
            .map(|(ind, _)| ind)
            .collect();

        // 2. Offspring
        let pairs = config.selection.select(state, &mut *rng)?;
        let mut offspring = Vec::with_capacity(pairs.len() * 2);
        for (p1, p2) in &pairs {
            let (c1, c2) = config.crossover.crossover(p1, p2, &mut *rng)?;
            offspring.push(c1);
            offspring.push(c2);
        }

        // 3. Mutate every offspring, then truncate to N
        let mutated: Vec<Individual<G>> = offspring
            .iter()
            .map(|child| mutate_with_rate(config.mutation_rate, config.mutation.as_ref(), child, &mut *rng))
            .collect();
        let room = n.saturating_sub(population.len());
        population.extend(mutated.into_iter().take(room));

        if population.len() < n {
            warn!(
                generation = state.generation + 1,
                expected = n,
                actual = population.len(),
                "population shrank: elites plus offspring fewer than population size"
            );
        }

        // 4. Evaluate
        let fitness = score_population(config, &population);
        let next = EngineState::new(population, fitness, state.generation + 1);

        if let Ok(stats) = GenerationStats::from_state(&next) {
            debug!(
                generation = stats.generation,
                best = stats.best,
                mean = stats.mean,
                worst = stats.worst,
                distinct = stats.distinct,
                "generation complete"
            );
        }

        Ok(next)
    }

    /// Steps up to `iteration_limit` times, stopping at the first state
    /// whose best score satisfies `predicate`.
    ///
    /// The predicate receives whatever [`best`] reports: the rank when the
    /// configuration is ranked, the raw fitness otherwise. With
    /// `iteration_limit == 0` the input state is returned untouched.
    #[instrument(level = "debug", skip(state, config, predicate, rng), fields(start = state.generation))]
    pub fn run<G, P, R>(
        state: EngineState<G>,
        config: &EngineConfig<G>,
        iteration_limit: usize,
        mut predicate: P,
        rng: &mut R,
    ) -> Result<EngineState<G>>
    where
        G: Gene,
        P: FnMut(f64) -> bool,
        R: Rng,
    {
        let mut state = state;
        for _ in 0..iteration_limit {
            state = Self::step(&state, config, &mut *rng)?;
            let (_, score) = best(&state)?;
            if predicate(score.value()) {
                info!(
                    generation = state.generation,
                    best = score.value(),
                    "stopping predicate satisfied"
                );
                return Ok(state);
            }
        }
        Ok(state)
    }

    /// Initializes with the configuration's own generator and runs to
    /// completion.
    pub fn evolve<G, F, P>(
        generator: F,
        config: &EngineConfig<G>,
        iteration_limit: usize,
        predicate: P,
    ) -> Result<EngineState<G>>
    where
        G: Gene,
        F: FnMut(&mut dyn RngCore) -> Individual<G>,
        P: FnMut(f64) -> bool,
    {
        let mut rng = config.rng();
        let state = Self::init(generator, config, &mut rng)?;
        Self::run(state, config, iteration_limit, predicate, &mut rng)
    }
}

/// Evaluates a population, ranking the scores when configured.
fn score_population<G: Gene>(config: &EngineConfig<G>, population: &[Individual<G>]) -> FitnessMap<G> {
    let raw = evaluate(config.fitness.as_ref(), population, config.parallel);
    if config.ranked {
        rank(&raw)
    } else {
        raw
    }
}

// ============================================================================
// Tests
// ============================================================================
