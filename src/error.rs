//! Error handling for the demand estimation pipeline.

use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Errors that can occur while estimating imaging demand
#[derive(Debug, thiserror::Error)]
pub enum DemandError {
    /// A required column is absent from an input table
    #[error("required column '{column}' is missing from the input table")]
    MissingColumn {
        /// Name of the missing column
        column: String,
    },

    /// A column is present but cannot be read with the expected type
    #[error("column '{column}' has type {actual:?}, expected {expected:?}")]
    ColumnType {
        /// Name of the offending column
        column: String,
        /// Type the pipeline needs
        expected: DataType,
        /// Type found in the table
        actual: DataType,
    },

    /// The band-to-column lookup has no mapping for an age band
    #[error("no small-area population column is mapped for age band '{band}'")]
    UnknownAgeBandColumn {
        /// Canonical label of the unmapped band
        band: String,
    },

    /// An age value outside the valid range
    #[error("invalid age {age}: ages must be non-negative")]
    InvalidAge {
        /// The rejected value
        age: i64,
    },

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias for Result with `DemandError`
pub type Result<T> = std::result::Result<T, DemandError>;
