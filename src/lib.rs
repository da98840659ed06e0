//! Generic evolutionary search engine.
//!
//! Evolves a population of fixed-length gene sequences toward higher
//! fitness using pluggable operators:
//!
//! - **Selection**: random pairing, elitist pairing, fitness-proportional
//!   (roulette wheel) draws.
//! - **Crossover**: single-point, multi-point, and uniform recombination.
//! - **Mutation**: single-gene perturbation through a caller-supplied gene
//!   mutator, applied at a configurable rate.
//!
//! Each generation keeps the best `keep_n` individuals (elitism), fills the
//! rest with offspring, and re-evaluates fitness in parallel with rayon.
//! Runs stop on a caller predicate or an iteration budget, and can write
//! periodic checkpoints to disk for later restore.
//!
//! # Example
//!
//! ```
//! use rand::{Rng, RngCore};
//! use u_evolve::ga::{best, Engine, EngineConfig, Individual, Selection};
//!
//! let config = EngineConfig::new(
//!     40,
//!     |ind: &Individual<bool>| ind.genes().iter().filter(|&&b| b).count() as f64,
//!     |bit: &bool, _rng: &mut dyn RngCore| !bit,
//! )
//! .with_keep_n(2)
//! .with_mutation_rate(0.3)
//! .with_selection(Selection::Proportional)
//! .with_seed(42);
//!
//! let generator = |rng: &mut dyn RngCore| -> Individual<bool> {
//!     (0..16).map(|_| rng.random_bool(0.5)).collect()
//! };
//!
//! let state = Engine::evolve(generator, &config, 100, |score| score >= 16.0).unwrap();
//! let (_, score) = best(&state).unwrap();
//! assert!(score.value() >= 8.0);
//! ```
//!
//! # Randomness
//!
//! No operator touches a global generator. Every call takes its generator
//! explicitly, so a seeded [`random::create_rng`] reproduces a run.

pub mod error;
pub mod ga;
pub mod random;

pub use error::{GaError, Result};
