use crate::core::io::config::ConfigError;
use crate::core::io::state_record::StateLoadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MotionError {
    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("State record error: {source}")]
    State {
        #[from]
        source: StateLoadError,
    },

    #[error("Invalid time step '{name}': must be positive and finite, got {value}")]
    InvalidTimeStep { name: &'static str, value: f64 },

    #[error("Numeric degeneracy in {quantity}: {detail}")]
    Degenerate {
        quantity: &'static str,
        detail: String,
    },

    #[error("Field size mismatch: {points} points but {scales} scale factors")]
    FieldSizeMismatch { points: usize, scales: usize },

    #[error("Failed to open state log '{path}': {source}")]
    LogFile { path: String, source: csv::Error },

    #[error("State log error: {source}")]
    Log {
        #[from]
        source: csv::Error,
    },
}
