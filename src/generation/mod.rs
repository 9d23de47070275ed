//! Landmass and country generation
//!
//! Segments the height field into landmasses, then subdivides each landmass
//! into country polygons with seeded point sampling and approximate Voronoi
//! cells clipped to the coastline.

mod boundary;
mod continents;
mod partition;
mod seeds;
mod voronoi;

pub use boundary::{simplify_boundary, trace_boundary, SIMPLIFY_TOLERANCE};
pub use continents::{segment_continents, segment_grid, ElevationGrid, SegmentOptions};
pub use partition::partition_landmass;
pub use seeds::sample_seeds;
pub use voronoi::{approximate_cells, clip_to_landmass};

use thiserror::Error;

use crate::geometry::Polygon;

/// Why a geometric step produced no usable polygon
///
/// Returned internally in place of a polygon so the caller can pick the next
/// fallback. Never surfaces from [`WorldGenerator::generate`](crate::WorldGenerator::generate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Degenerate {
    /// Clipping removed every vertex
    #[error("empty clip")]
    EmptyClip,
    /// Fewer than three vertices remain
    #[error("too few points")]
    TooFewPoints,
    /// The polygon encloses no area, or less than the minimum
    #[error("zero area")]
    ZeroArea,
    /// No seed point could be placed inside the landmass
    #[error("no seeds")]
    NoSeeds,
    /// A fallback polygon would cross the coastline
    #[error("leaves the landmass")]
    LeavesLandmass,
}

/// Outcome of a geometric step that may degenerate
pub type GeometryResult = std::result::Result<Polygon, Degenerate>;

/// Tuning for the country partitioner
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartitionConfig {
    /// Slack for the nearest-seed test when tracing cell boundaries
    pub tolerance: f64,

    /// Margin added around the landmass bounding box to bound ray searches
    pub search_padding: f64,

    /// Number of rays cast around each seed
    pub directions: usize,

    /// Bisection steps per ray
    pub search_iterations: usize,

    /// Candidates tried around an active seed before it is retired
    pub candidate_attempts: usize,

    /// Consecutive cell vertices closer than this are merged
    pub min_spacing: f64,

    /// Cells with an area at or below this are rejected
    pub min_area: f64,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.001,
            search_padding: 100.0,
            directions: 24,
            search_iterations: 10,
            candidate_attempts: 30,
            min_spacing: 2.0,
            min_area: 100.0,
        }
    }
}

impl PartitionConfig {
    /// Defaults with the nearest-seed slack taken from the world configuration
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }
}
