//! Durable snapshots of engine state.
//!
//! A checkpoint stores only data: population, fitness map, and generation.
//! Operators and functions live in [`EngineConfig`] and are supplied again
//! on restore.
//!
//! The file is JSON. Because individuals are not strings, the fitness map
//! is written as a list of `[individual, score]` entries:
//!
//! ```text
//! {"population":[[true,false]],"fitness":[[[true,false],{"Raw":1.0}]],"generation":4}
//! ```

use super::config::EngineConfig;
use super::engine::Engine;
use super::types::{EngineState, FitnessMap, Gene, Individual};
use crate::error::{GaError, Result};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{info, instrument};

/// Data-only subset of [`EngineState`] as persisted on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(bound(
    serialize = "G: Serialize",
    deserialize = "G: serde::de::DeserializeOwned"
))]
pub struct CheckpointRecord<G: Gene> {
    pub population: Vec<Individual<G>>,
    #[serde(with = "fitness_entries")]
    pub fitness: FitnessMap<G>,
    pub generation: u64,
}

impl<G: Gene> From<&EngineState<G>> for CheckpointRecord<G> {
    fn from(state: &EngineState<G>) -> Self {
        Self {
            population: state.population.clone(),
            fitness: state.fitness.clone(),
            generation: state.generation,
        }
    }
}

impl<G: Gene> From<CheckpointRecord<G>> for EngineState<G> {
    fn from(record: CheckpointRecord<G>) -> Self {
        EngineState::new(record.population, record.fitness, record.generation)
    }
}

/// Writes `state` to `location`, replacing any previous content.
///
/// The file is flushed before returning and closed on every path.
pub fn save<G>(state: &EngineState<G>, location: impl AsRef<Path>) -> Result<()>
where
    G: Gene + Serialize,
{
    let path = location.as_ref();
    let io_err = |source: std::io::Error| GaError::Persistence {
        path: path.to_path_buf(),
        source,
    };

    let record = CheckpointRecord::from(state);
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    serde_json::to_writer(&mut writer, &record).map_err(|e| io_err(e.into()))?;
    writer.flush().map_err(io_err)?;
    Ok(())
}

/// Reads a state back from `location`.
pub fn load<G>(location: impl AsRef<Path>) -> Result<EngineState<G>>
where
    G: Gene + DeserializeOwned,
{
    let path = location.as_ref();
    let file = File::open(path).map_err(|source| GaError::Persistence {
        path: path.to_path_buf(),
        source,
    })?;

    let record: CheckpointRecord<G> =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            if e.is_io() {
                GaError::Persistence {
                    path: path.to_path_buf(),
                    source: e.into(),
                }
            } else {
                GaError::MalformedCheckpoint {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

    Ok(record.into())
}

/// Restores engine state from `location` for use with `config`.
///
/// Nothing from `config` is read from storage; it is only validated.
pub fn restore<G>(config: &EngineConfig<G>, location: impl AsRef<Path>) -> Result<EngineState<G>>
where
    G: Gene + DeserializeOwned,
{
    config.validate()?;
    let state = load(location.as_ref())?;
    info!(
        location = %location.as_ref().display(),
        generation = state.generation,
        population = state.population.len(),
        "checkpoint restored"
    );
    Ok(state)
}

/// Runs the engine in chunks of `interval` generations, writing a
/// checkpoint to `location` after every chunk.
///
/// Every chunk runs the full `interval`; the remaining budget drops by
/// `interval` after each write and the loop stops once the budget is
/// negative or `predicate` holds (see [`Engine::run`]). The budget can
/// therefore be overshot by up to `interval` generations: a limit of 10
/// with an interval of 3 runs four chunks, and a limit of 0 still runs
/// one. After a successful return `location` holds exactly the returned
/// state. A failed write aborts the run.
#[instrument(level = "info", skip(state, config, predicate, location, rng), fields(location = %location.as_ref().display()))]
pub fn run_with_checkpoints<G, P, R>(
    state: EngineState<G>,
    config: &EngineConfig<G>,
    iteration_limit: usize,
    mut predicate: P,
    location: impl AsRef<Path>,
    interval: usize,
    rng: &mut R,
) -> Result<EngineState<G>>
where
    G: Gene + Serialize,
    P: FnMut(f64) -> bool,
    R: Rng,
{
    if interval == 0 {
        return Err(GaError::Configuration(
            "checkpoint interval must be at least 1".into(),
        ));
    }

    let location = location.as_ref();
    let mut state = state;
    let step = i64::try_from(interval).unwrap_or(i64::MAX);
    let mut remaining = i64::try_from(iteration_limit).unwrap_or(i64::MAX);
    loop {
        let mut satisfied = false;
        state = Engine::run(
            state,
            config,
            interval,
            |score| {
                satisfied = predicate(score);
                satisfied
            },
            &mut *rng,
        )?;

        save(&state, location)?;
        info!(generation = state.generation, "checkpoint written");

        remaining = remaining.saturating_sub(step);
        if satisfied || remaining < 0 {
            return Ok(state);
        }
    }
}

/// Serializes a [`FitnessMap`] as a sequence of `(individual, score)`
/// pairs, preserving entry order.
mod fitness_entries {
    use crate::ga::types::{FitnessMap, Gene, Individual, Score};
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<G, S>(fitness: &FitnessMap<G>, serializer: S) -> Result<S::Ok, S::Error>
    where
        G: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(fitness.iter())
    }

    pub fn deserialize<'de, G, D>(deserializer: D) -> Result<FitnessMap<G>, D::Error>
    where
        G: Gene + DeserializeOwned,
        D: Deserializer<'de>,
    {
        let entries = Vec::<(Individual<G>, Score)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
