//! Error types for the UI engine.

use std::path::PathBuf;

use overlay_font::FontError;
use thiserror::Error;

/// Errors reported by element construction and layout.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("grid cell ({row}, {col}) outside a {rows}x{cols} grid")]
    GridOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid span {rowspan}x{colspan} at ({row}, {col})")]
    InvalidSpan {
        row: usize,
        col: usize,
        rowspan: usize,
        colspan: usize,
    },

    #[error("font error: {0}")]
    Font(#[from] FontError),

    #[error("settings error: {0}")]
    Settings(String),

    #[error("failed to read icon codepoints {path:?}: {source}")]
    IconCodepoints {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no icon named {0:?}")]
    UnknownIcon(String),

    #[error("icon {name:?} has an invalid codepoint {value:?}")]
    InvalidCodepoint { name: String, value: String },
}

pub type Result<T> = std::result::Result<T, UiError>;
