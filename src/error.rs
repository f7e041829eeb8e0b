// src/error.rs
//! Error kinds raised by the evaluation engine.
//!
//! Gate conditions (too few entities, too short content) are never errors: they produce a
//! valid, non-worthy evaluation. Everything here aborts the whole evaluation.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Empty or missing content. Maps to a client error.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A model-backed extractor failed to load or run. Never replaced by a default score.
    #[error("model `{model}` unavailable: {reason}")]
    ModelUnavailable { model: String, reason: String },

    /// Weights or thresholds out of range. Raised at startup only.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl EvalError {
    pub fn model(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            model: model.into(),
            reason: reason.into(),
        }
    }

    /// Short, stable label used for metrics and JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::ModelUnavailable { .. } => "model_unavailable",
            Self::Configuration(_) => "configuration",
        }
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;
