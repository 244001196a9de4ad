//! Library error type

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SketchError {
    #[error("Invalid axis: {0}")]
    InvalidAxis(String),

    #[error("Grid shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SketchResult<T> = Result<T, SketchError>;
