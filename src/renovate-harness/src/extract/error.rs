//! Extraction error types.

use thiserror::Error;

/// A pull request body that does not have the expected update table.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The body has no markdown table at all.
    #[error("Pull request '{title}' has no update table in its body")]
    MissingTable { title: String },

    /// A table row has fewer than the three required cells.
    #[error("Pull request '{title}' has a malformed update row {row}: expected at least 3 cells, found {cells}")]
    MalformedRow {
        title: String,
        row: usize,
        cells: usize,
    },
}
