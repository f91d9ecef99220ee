//! Error types for bookdashlib

use thiserror::Error;

/// Errors that can abort a render cycle.
///
/// An empty result is not an error: filters and searches that match nothing
/// produce an empty [`BookTable`](crate::BookTable).
#[derive(Error, Debug)]
pub enum BookdashError {
    /// The file is missing or the collaborator could not supply rows
    #[error("source unavailable '{source_name}': {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    /// A required column is absent after header normalization
    #[error("schema mismatch: required column '{column}' is missing")]
    SchemaMismatch { column: String },

    /// Sort field outside of title/author/year_published/book_age
    #[error("invalid sort field: {0}")]
    InvalidSortField(String),

    /// Delimiters must be a single ASCII character
    #[error("invalid delimiter: {0:?}")]
    InvalidDelimiter(char),

    /// Malformed delimited input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
