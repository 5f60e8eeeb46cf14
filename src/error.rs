//! Error types for ner-features.

use thiserror::Error;

/// Result type for ner-features operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ner-features operations.
///
/// The first four variants are validation failures. They are always reported
/// before any model call is made, and nothing is produced when one occurs.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Input is not a recognized tabular structure.
    #[error("Not a table: {0}")]
    NotATable(String),

    /// The named text column does not exist.
    #[error("Column `{column}` doesn't exist in table (available: {})", .available.join(", "))]
    MissingColumn {
        /// Requested column name.
        column: String,
        /// Columns the table actually has.
        available: Vec<String>,
    },

    /// The requested NER model is not available or failed to load.
    #[error("Unknown model `{name}`: {reason}")]
    UnknownModel {
        /// Requested model name.
        name: String,
        /// Why the model could not be resolved.
        reason: String,
    },

    /// A cutoff is not an integer.
    #[error("Cutoff at position {index} is not an integer: {value}")]
    InvalidCutoffType {
        /// Position in the cutoff list.
        index: usize,
        /// Rendering of the offending value.
        value: String,
    },

    /// The model failed on a specific document.
    #[error("Model failed on row {row}: {source}")]
    ModelInvocation {
        /// Row index of the failing document.
        row: usize,
        /// Underlying model error.
        #[source]
        source: Box<Error>,
    },

    /// A derived feature column name is already taken.
    #[error("Feature column `{column}` already exists in table")]
    ColumnCollision {
        /// The colliding column name.
        column: String,
    },

    /// Model inference failed.
    #[error("Inference failed: {0}")]
    Inference(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a not-a-table error.
    pub fn not_a_table(msg: impl Into<String>) -> Self {
        Error::NotATable(msg.into())
    }

    /// Create an unknown model error.
    pub fn unknown_model(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::UnknownModel {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an inference error.
    pub fn inference(msg: impl Into<String>) -> Self {
        Error::Inference(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Whether this error came from input validation.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::NotATable(_)
                | Error::MissingColumn { .. }
                | Error::UnknownModel { .. }
                | Error::InvalidCutoffType { .. }
        )
    }
}
