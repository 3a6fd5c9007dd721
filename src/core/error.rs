//! Error types for field construction and configuration loading

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Patch placement gave up after {attempts} draws ({placed}/{requested} placed)")]
    PlacementExhausted {
        placed: usize,
        requested: usize,
        attempts: u32,
    },

    #[error("Instance sink holds {capacity} slots but {required} weeds were placed")]
    CapacityExceeded { capacity: usize, required: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
