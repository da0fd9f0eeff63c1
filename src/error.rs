//! Error taxonomy for the projection engine
//!
//! Every variant is fail-fast: it signals a caller or configuration bug,
//! never a transient condition, so nothing here is retried.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProjectionError>;

#[derive(Debug, Error)]
pub enum ProjectionError {
    /// Malformed or out-of-range profile, rate model or life event
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Scenario catalog or narrative rule table references something unknown
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A comparison horizon lies beyond the end of a projection
    #[error("horizon year {horizon} not found in a projection of {available} years")]
    HorizonNotFound { horizon: u32, available: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProjectionError {
    /// Prefix the message of input/configuration errors with some context
    pub fn context(self, context: &str) -> Self {
        match self {
            ProjectionError::InvalidInput(msg) => {
                ProjectionError::InvalidInput(format!("{}: {}", context, msg))
            }
            ProjectionError::Configuration(msg) => {
                ProjectionError::Configuration(format!("{}: {}", context, msg))
            }
            other => other,
        }
    }
}
