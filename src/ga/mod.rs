//! Genetic Algorithm engine.
//!
//! A generic, gene-agnostic evolutionary engine. Callers supply an
//! individual generator, a fitness function (maximized), and a gene
//! mutator; the engine handles selection, crossover, mutation, elitism,
//! the convergence loop, and checkpointing.
//!
//! # Key Types
//!
//! - [`Individual`]: an immutable, fixed-length gene sequence
//! - [`EngineState`]: population, fitness map, and generation counter
//! - [`EngineConfig`]: population size, operator rates, and operators
//! - [`Engine`]: initialization, one-generation [`step`](Engine::step), and
//!   the convergence loop [`run`](Engine::run)
//!
//! # Operators
//!
//! - [`Selection`]: random pairing, elitist pairing, roulette wheel
//! - [`Crossover`]: single-point, multi-point, uniform
//! - [`GeneMutation`]: single-gene mutation via a caller-supplied mutator
//!
//! Each family has a trait ([`SelectionMethod`], [`CrossoverOperator`],
//! [`MutationOperator`]) for custom operators.
//!
//! # Submodules
//!
//! - [`fitness`]: evaluation, ranking, best/sorted queries
//! - [`checkpoint`]: chunked runs with periodic snapshots, and restore
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

pub mod checkpoint;
mod config;
mod crossover;
mod engine;
pub mod fitness;
mod mutation;
mod selection;
mod types;

pub use checkpoint::{restore, run_with_checkpoints, CheckpointRecord};
pub use config::EngineConfig;
pub use crossover::{single_point_at, Crossover, CrossoverOperator};
pub use engine::Engine;
pub use fitness::{best, evaluate, rank, sorted, FitnessFn, GenerationStats};
pub use mutation::{gene_mutate, mutate_with_rate, GeneMutation, GeneMutator, MutationOperator};
pub use selection::{Pair, Selection, SelectionMethod};
pub use types::{EngineState, FitnessMap, Gene, Individual, Score};
