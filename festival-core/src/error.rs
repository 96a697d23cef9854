//! Error types for the festival calendar.

use thiserror::Error;

/// Errors that can occur outside the pure filtering and bucketing paths.
#[derive(Error, Debug)]
pub enum FestivalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load {dataset}: {reason}")]
    DataUnavailable { dataset: String, reason: String },

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Invalid data source '{0}'")]
    InvalidDataSource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FestivalError {
    pub(crate) fn unavailable(dataset: &str, reason: impl ToString) -> Self {
        FestivalError::DataUnavailable {
            dataset: dataset.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for festival operations.
pub type FestivalResult<T> = Result<T, FestivalError>;
