//! Error types for the stormlight library.

use stormlight_shader::SchemaError;
use thiserror::Error;

/// Reasons a point list cannot become a glow path.
///
/// Raised at construction; no partial path is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidPathError {
    /// Fewer than two points cannot form a segment
    #[error("need at least 2 points, got {0}")]
    TooFewPoints(usize),

    /// Every point coincides, so the path has no length to parameterize
    #[error("total length is zero ({points} coincident points)")]
    ZeroLength { points: usize },

    /// NaN or infinite coordinate
    #[error("point {0} has a non-finite coordinate")]
    NonFinitePoint(usize),

    /// Points are finite but too far apart for an f32 length
    #[error("path length overflows f32")]
    LengthOverflow,
}

/// Main error type for stormlight operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Point list rejected at construction
    #[error("Invalid path: {0}")]
    InvalidPath(#[from] InvalidPathError),

    /// Uniform lookup or write rejected by the shader schema
    #[error("Uniform error: {0}")]
    Uniform(#[from] SchemaError),

    /// Settings failed validation
    #[error("Invalid settings: {0}")]
    Settings(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Preview image encoding error
    #[cfg(feature = "preview")]
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a settings validation error.
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }

    /// The path error, if this is one.
    pub fn as_invalid_path(&self) -> Option<&InvalidPathError> {
        match self {
            Self::InvalidPath(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type alias for stormlight operations.
pub type Result<T> = std::result::Result<T, Error>;
