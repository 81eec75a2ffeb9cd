//! Error types for element validation and layout import.

use thiserror::Error;

/// Why an element failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElementError {
    #[error("size must be positive, got {width}x{height}")]
    NonPositiveSize { width: f32, height: f32 },
    #[error("position must be non-negative, got ({x}, {y})")]
    NegativePosition { x: f32, y: f32 },
    #[error("{kind} element requires content")]
    MissingContent { kind: &'static str },
    #[error("font size must be positive, got {0}")]
    InvalidFontSize(f32),
}

/// A layout or template could not be adopted. The scene is left untouched.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid layout data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid element at index {index}: {source}")]
    InvalidElement {
        index: usize,
        #[source]
        source: ElementError,
    },
}
