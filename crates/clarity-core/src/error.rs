//! Error types for Clarity

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing transaction fields, or an empty analysis batch.
    /// Always surfaced to the caller.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Model artifacts missing, corrupt or inconsistent. Fatal at startup.
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// Runtime failure inside the statistical classifier
    #[error("Inference error: {0}")]
    Inference(String),

    /// Time-series fit or projection failure
    #[error("Forecast error: {0}")]
    Forecast(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Whether this error is the caller's fault (bad input) rather than ours
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
