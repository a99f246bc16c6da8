//! Error types for the record source.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `SheetError`.
pub type SheetResult<T> = Result<T, SheetError>;

/// Errors raised while loading or reshaping sheet data.
#[derive(Debug, Error)]
pub enum SheetError {
    /// The document path does not exist.
    #[error("The file at path '{}' was not found", .0.display())]
    FileNotFound(PathBuf),

    /// The document exists but has no sheet with this name.
    #[error("Sheet '{sheet}' not found in '{}'", path.display())]
    SheetNotFound { path: PathBuf, sheet: String },

    /// The sheet is empty or otherwise unusable.
    #[error("Invalid sheet data: {0}")]
    Validation(String),

    /// One or more requested columns are not in the table schema.
    #[error("The following fields are missing: {}", .0.join(", "))]
    KeyMissing(Vec<String>),

    /// The spreadsheet file could not be opened or parsed.
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// A CSV sheet could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SheetError {
    /// Build a `KeyMissing` error for a single column.
    pub fn key_missing(column: impl Into<String>) -> Self {
        Self::KeyMissing(vec![column.into()])
    }
}

impl From<calamine::Error> for SheetError {
    fn from(e: calamine::Error) -> Self {
        SheetError::Workbook(e.to_string())
    }
}
