//! Error types for data operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while retrieving or parsing a constituent file.
#[derive(Debug, Error)]
pub enum DataError {
    /// Network error, including request timeouts
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status} fetching {reference}")]
    Http {
        /// Reference that was requested
        reference: String,
        /// HTTP status code returned
        status: u16,
    },

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Required column absent from the header row
    #[error("Missing column '{column}' in constituent file")]
    MissingColumn {
        /// Column that was looked for
        column: String,
    },

    /// Reference that cannot be requested
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
}

impl DataError {
    /// Whether the data could not be retrieved or could not be parsed.
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Network(_) | Self::Http { .. } | Self::InvalidReference(_) => {
                FailureKind::Retrieval
            }
            Self::Csv(_) | Self::MissingColumn { .. } => FailureKind::Parse,
        }
    }
}

/// Coarse classification of a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network, timeout or HTTP status failure
    Retrieval,
    /// Malformed tabular payload
    Parse,
}
