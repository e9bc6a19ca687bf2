//! Error types for the data-loader crate.
//!
//! Ingestion failures are reported through `DataLoadError`. The recommender
//! turns them into a "not loaded" state with a readable message instead of
//! propagating them to request handlers.

use thiserror::Error;

/// Errors that can occur while reading and loading a movie catalog
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// None of the candidate catalog files exist
    #[error("No movie dataset found (tried: {tried})")]
    NoSource { tried: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader rejected the file
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Required columns are absent from the header row
    #[error("CSV must contain columns: {missing}")]
    MissingColumns { missing: String },

    /// A row in the data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// Every row was dropped during cleaning, so there is nothing to index
    #[error("Catalog contains no usable movies")]
    EmptyCatalog,
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
