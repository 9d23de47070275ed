//! Error types for world generation and queries

use thiserror::Error;

/// Errors that can surface from world generation or world queries
///
/// Geometry problems never show up here: they are recovered inside the
/// generation pipeline. Only bad configuration and failed lookups escape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Segmentation found no landmass large enough to hold a country
    #[error("no landmasses generated (land percent {land_percent})")]
    NoLandmasses {
        /// Land percentage the segmenter ran with
        land_percent: f64,
    },
    /// Requested country name does not exist
    #[error("country not found: {0}")]
    CountryNotFound(String),
}

/// Result type alias for world operations
pub type Result<T> = std::result::Result<T, WorldError>;
