#![forbid(unsafe_code)]

//! Error types for puzzle documents and puzzle providers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PuzzleError>;

/// A puzzle document that cannot be turned into a playable grid.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("puzzle JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("puzzle must have exactly 4 categories, found {found}")]
    CategoryCount { found: usize },

    #[error("category `{category}` must have exactly 4 words, found {found}")]
    WordCount { category: String, found: usize },

    #[error("category id `{category}` appears more than once")]
    DuplicateCategory { category: String },

    #[error("category id must not be empty")]
    EmptyCategoryId,

    #[error("word `{word}` appears more than once")]
    DuplicateWord { word: String },

    #[error("category `{category}` contains an empty word")]
    EmptyWord { category: String },

    #[error("starting grid names `{word}`, which is not a puzzle word")]
    UnknownStartWord { word: String },

    #[error("starting grid names `{word}` more than once")]
    DuplicateStartWord { word: String },

    #[error("mistake allowance must be at least 1")]
    ZeroMistakeAllowance,
}

/// Failure to produce a puzzle document for a date.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid date key `{key}` (expected YYYY-MM-DD)")]
    InvalidDateKey { key: String },

    #[error("no puzzle available for {key}")]
    NotFound { key: String },

    #[error("puzzle catalog is empty")]
    EmptyCatalog,

    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
}

impl ProviderError {
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }
}
