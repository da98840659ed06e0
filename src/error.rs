//! Error type shared by every engine operation.

use std::path::PathBuf;

/// Errors raised by the evolutionary engine.
///
/// All errors are returned at the point of violation; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum GaError {
    /// `best`/`sorted` queried on a state with no fitness entries.
    #[error("population is empty")]
    EmptyPopulation,

    /// Proportional selection needs non-negative scores with a positive sum.
    #[error("invalid fitness for proportional selection: {reason}")]
    InvalidFitness { reason: String },

    /// Crossover cannot be applied to the given parents.
    #[error("invalid crossover configuration: {0}")]
    InvalidCrossoverConfig(String),

    /// Engine configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Checkpoint location could not be read or written.
    #[error("checkpoint I/O failed at {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Checkpoint contents do not parse as a checkpoint record.
    #[error("malformed checkpoint at {}: {source}", .path.display())]
    MalformedCheckpoint {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl GaError {
    /// Returns `true` for checkpoint read/write/parse failures.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            GaError::Persistence { .. } | GaError::MalformedCheckpoint { .. }
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GaError>;
