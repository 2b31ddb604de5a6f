//! Error types for geohash-cover

use cover_types::ShapeError;
use thiserror::Error;

/// Result type alias using [`CoverError`]
pub type Result<T> = std::result::Result<T, CoverError>;

/// Errors surfaced by shape extraction, configuration and the cover engine.
#[derive(Error, Debug)]
pub enum CoverError {
    /// Structurally valid input with invalid values (coordinates, ring sizes)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// GeoJSON object without a `type` member
    #[error("GeoJSON Error: GeoJSON object is missing type property")]
    MissingType,

    /// GeoJSON object of a known type without a required member
    #[error("GeoJSON Error: {kind} is missing \"{field}\" property")]
    MissingField { kind: String, field: &'static str },

    /// `Multi*` object whose coordinates are not nested one level deeper
    #[error("GeoJSON Error: {kind} is actually not a {kind}")]
    NotMulti { kind: String },

    /// GeoJSON `type` that names no supported geometry
    #[error("GeoJSON Error: unsupported type \"{0}\"")]
    UnsupportedType(String),

    /// Options outside their allowed range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Geohash codec failure
    #[error("Geohash error: {0}")]
    Geohash(#[from] geohash::GeohashError),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A caller-supplied sink refused a row batch
    #[error("Sink error: {0}")]
    Sink(String),

    /// A worker thread covering a collection member panicked
    #[error("Worker thread panicked while covering a shape")]
    WorkerPanicked,
}

impl CoverError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        CoverError::InvalidInput(msg.into())
    }

    /// Create a missing field error
    pub fn missing_field(kind: impl Into<String>, field: &'static str) -> Self {
        CoverError::MissingField {
            kind: kind.into(),
            field,
        }
    }

    /// Create a sink error
    pub fn sink(msg: impl Into<String>) -> Self {
        CoverError::Sink(msg.into())
    }
}

impl From<ShapeError> for CoverError {
    fn from(err: ShapeError) -> Self {
        CoverError::InvalidInput(err.to_string())
    }
}
