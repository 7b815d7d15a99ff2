//! Error types for dataset preparation.
//!
//! Every fallible operation in this crate returns [`Result`], whose error
//! side is [`DatasetError`]. Shape and structure problems abort the whole
//! batch build; records with a missing landmark payload are not errors and
//! never reach this type (they are skipped by the normalizer).

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, DatasetError>;

/// Errors raised while loading, normalizing or exporting landmark data.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// No record survived filtering, so there is nothing to stack.
    #[error("no valid training data provided ({records} records inspected, all skipped)")]
    EmptyDataset {
        /// Number of input records that were inspected
        records: usize,
    },

    /// A landmark payload cannot be reshaped into whole frames.
    #[error("malformed record at index {index}: {reason}")]
    MalformedRecord {
        /// Position of the record in the input collection
        index: usize,
        /// Human-readable description of the defect
        reason: String,
    },

    /// The label field holds a value that cannot be used as a token.
    #[error("record at index {index} has an unsupported label value ({kind})")]
    UnsupportedLabel {
        /// Position of the record in the input collection
        index: usize,
        /// JSON type of the offending value
        kind: &'static str,
    },

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A dataset file does not have a recognised layout.
    #[error("invalid dataset file {path}: {reason}")]
    InvalidDataset {
        /// File that was being read
        path: String,
        /// What was wrong with it
        reason: String,
    },

    /// Stacking normalized sequences into a tensor failed.
    #[error("tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("failed to write .npy file: {0}")]
    Npy(#[from] ndarray_npy::WriteNpyError),
}

impl DatasetError {
    /// Build a [`DatasetError::MalformedRecord`].
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            index,
            reason: reason.into(),
        }
    }

    /// Returns true for errors caused by the content of a single record.
    ///
    /// These are the errors [`crate::batch::ErrorMode::SkipMalformed`] is
    /// allowed to recover from.
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedRecord { .. } | Self::UnsupportedLabel { .. }
        )
    }
}
