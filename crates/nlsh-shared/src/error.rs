//! Error types for nlsh.
//!
//! Only conditions that abort a request live here. Low confidence, missing
//! slots, unresolved references, unsupported platforms and safety verdicts are
//! ordinary translation outcomes (see `translator::Outcome`).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NlshError {
    #[error("Model not fitted. Run `nlshctl retrain` to build one.")]
    UnfittedModel,

    #[error("Corrupt model artifact: {0}")]
    CorruptModel(String),

    #[error("Invalid training data: {0}")]
    InvalidTrainingData(String),

    #[error("Unknown intent label: {0}")]
    UnknownIntent(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl NlshError {
    pub fn code(&self) -> i32 {
        match self {
            NlshError::UnfittedModel => -32000,
            NlshError::CorruptModel(_) => -32001,
            NlshError::InvalidTrainingData(_) => -32002,
            NlshError::UnknownIntent(_) => -32003,
            NlshError::Config(_) => -32004,
            NlshError::Template(_) => -32005,
            NlshError::Io(_) => -32006,
            NlshError::Json(_) => -32700,
            NlshError::Toml(_) => -32701,
        }
    }

    /// Fatal errors abort the pipeline before any output is produced.
    pub fn is_model_error(&self) -> bool {
        matches!(self, NlshError::UnfittedModel | NlshError::CorruptModel(_))
    }
}

pub type Result<T> = std::result::Result<T, NlshError>;
