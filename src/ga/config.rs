//! Engine configuration.
//!
//! [`EngineConfig`] holds everything that stays fixed for the life of an
//! engine: population size, operator rates, and the operators themselves.
//! It carries no evolving data, which is why checkpoints never store it.

use super::crossover::{Crossover, CrossoverOperator};
use super::fitness::FitnessFn;
use super::mutation::{GeneMutation, MutationOperator};
use super::selection::{Selection, SelectionMethod};
use super::types::{Gene, Individual};
use crate::error::{GaError, Result};
use crate::random::rng_from_seed;
use rand::rngs::StdRng;
use rand::RngCore;
use std::fmt;
use std::sync::Arc;

/// Configuration for the evolutionary engine.
///
/// # Defaults
///
/// ```
/// use u_evolve::ga::{EngineConfig, Individual};
///
/// let config = EngineConfig::new(
///     50,
///     |ind: &Individual<bool>| ind.genes().iter().filter(|&&b| b).count() as f64,
///     |bit: &bool, _rng: &mut dyn rand::RngCore| !bit,
/// );
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.keep_n, 0);
/// assert!(!config.ranked);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_evolve::ga::{Crossover, EngineConfig, Individual, Selection};
///
/// let config = EngineConfig::new(
///     100,
///     |ind: &Individual<u8>| ind.genes().iter().map(|&g| g as f64).sum(),
///     |g: &u8, _rng: &mut dyn rand::RngCore| g.wrapping_add(1),
/// )
/// .with_keep_n(4)
/// .with_mutation_rate(0.2)
/// .with_selection(Selection::RandomPairing)
/// .with_crossover(Crossover::Uniform)
/// .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct EngineConfig<G: Gene> {
    /// Number of individuals `N` in every generation.
    pub population_size: usize,

    /// Probability of mutating each offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Number of best individuals copied unchanged into the next
    /// generation (elitism). Must not exceed `population_size`.
    pub keep_n: usize,

    /// Replace raw fitness by rank after every evaluation.
    pub ranked: bool,

    /// Whether to evaluate fitness in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Chooses mating pairs.
    pub selection: Arc<dyn SelectionMethod<G>>,

    /// Recombines each pair.
    pub crossover: Arc<dyn CrossoverOperator<G>>,

    /// Perturbs offspring at `mutation_rate`.
    pub mutation: Arc<dyn MutationOperator<G>>,

    /// Scores individuals; higher is better.
    pub fitness: Arc<FitnessFn<G>>,
}

impl<G: Gene> EngineConfig<G> {
    /// Creates a configuration with default operators.
    ///
    /// Defaults: mutation rate 0.1, no elitism, raw fitness,
    /// [`Selection::ElitistPairing`], [`Crossover::SinglePoint`],
    /// single-gene mutation through `gene_mutator`, parallel evaluation.
    pub fn new<F, M>(population_size: usize, fitness: F, gene_mutator: M) -> Self
    where
        F: Fn(&Individual<G>) -> f64 + Send + Sync + 'static,
        M: Fn(&G, &mut dyn RngCore) -> G + Send + Sync + 'static,
    {
        Self {
            population_size,
            mutation_rate: 0.1,
            keep_n: 0,
            ranked: false,
            parallel: true,
            seed: None,
            selection: Arc::new(Selection::default()),
            crossover: Arc::new(Crossover::default()),
            mutation: Arc::new(GeneMutation::new(gene_mutator)),
            fitness: Arc::new(fitness),
        }
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the elite count.
    pub fn with_keep_n(mut self, keep_n: usize) -> Self {
        self.keep_n = keep_n;
        self
    }

    /// Enables or disables rank-based fitness.
    pub fn with_ranked(mut self, ranked: bool) -> Self {
        self.ranked = ranked;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection<S: SelectionMethod<G> + 'static>(mut self, selection: S) -> Self {
        self.selection = Arc::new(selection);
        self
    }

    /// Sets the crossover operator.
    pub fn with_crossover<C: CrossoverOperator<G> + 'static>(mut self, crossover: C) -> Self {
        self.crossover = Arc::new(crossover);
        self
    }

    /// Sets the mutation operator.
    pub fn with_mutation<M: MutationOperator<G> + 'static>(mut self, mutation: M) -> Self {
        self.mutation = Arc::new(mutation);
        self
    }

    /// Creates the generator for a run: seeded from [`seed`](Self::seed)
    /// when set.
    pub fn rng(&self) -> StdRng {
        rng_from_seed(self.seed)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(GaError::Configuration(
                "population_size must be at least 1".into(),
            ));
        }
        if self.keep_n > self.population_size {
            return Err(GaError::Configuration(format!(
                "keep_n ({}) exceeds population_size ({})",
                self.keep_n, self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(GaError::Configuration(format!(
                "mutation_rate ({}) must be within [0, 1]",
                self.mutation_rate
            )));
        }
        Ok(())
    }
}

impl<G: Gene> fmt::Debug for EngineConfig<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("population_size", &self.population_size)
            .field("mutation_rate", &self.mutation_rate)
            .field("keep_n", &self.keep_n)
            .field("ranked", &self.ranked)
            .field("parallel", &self.parallel)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn config(n: usize) -> EngineConfig<bool> {
        EngineConfig::new(
            n,
            |ind: &Individual<bool>| ind.genes().iter().filter(|&&b| b).count() as f64,
            |b: &bool, _rng: &mut dyn RngCore| !b,
        )
    }

    #[test]
    fn test_default_config() {
        let config = config(20);
        assert_eq!(config.population_size, 20);
        assert!((config.mutation_rate - 0.1).abs() < 1e-10);
        assert_eq!(config.keep_n, 0);
        assert!(!config.ranked);
        assert!(config.parallel);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = config(20)
            .with_population_size(30)
            .with_mutation_rate(0.3)
            .with_keep_n(2)
            .with_ranked(true)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.population_size, 30);
        assert!((config.mutation_rate - 0.3).abs() < 1e-10);
        assert_eq!(config.keep_n, 2);
        assert!(config.ranked);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_validate_ok() {
        assert!(config(10).validate().is_ok());
        assert!(config(10).with_keep_n(10).validate().is_ok());
    }

    #[test]
    fn test_validate_zero_population() {
        assert!(matches!(
            config(0).validate(),
            Err(GaError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_keep_n_too_high() {
        assert!(matches!(
            config(10).with_keep_n(11).validate(),
            Err(GaError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rate_out_of_range() {
        let mut config = config(10);
        config.mutation_rate = 1.5;
        assert!(config.validate().is_err());
        config.mutation_rate = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_rate() {
        assert!((config(10).with_mutation_rate(2.0).mutation_rate - 1.0).abs() < 1e-10);
        assert!((config(10).with_mutation_rate(-1.0).mutation_rate).abs() < 1e-10);
    }

    #[test]
    fn test_seeded_rng_reproducible() {
        let config = config(10).with_seed(7);
        let a: u64 = config.rng().random();
        let b: u64 = config.rng().random();
        assert_eq!(a, b);
    }

    #[test]
    fn test_debug_omits_operators() {
        let text = format!("{:?}", config(10));
        assert!(text.contains("population_size: 10"));
        assert!(text.contains(".."));
    }
}
