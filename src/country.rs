//! Country and Landmass Structures
//!
//! Countries live in the world's arena and are referenced everywhere else by
//! [`CountryId`]. Landmasses keep the list of ids carved out of them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{self, Point, Polygon};
use crate::terrain::{Rgb, TerrainKind, TerrainStats};

/// Stable handle of a country inside its [`World`](crate::World)
///
/// Ids are dense indices in generation order, so the same configuration
/// yields the same id for the same country.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryId(pub usize);

impl CountryId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One political region carved out of a landmass
///
/// # Design Notes
///
/// `neighbors` is symmetric: if A lists B then B lists A. The list is sorted
/// by id and never contains the country itself.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    /// Arena handle
    pub id: CountryId,

    /// Unique display name, also the lookup key
    pub name: String,

    /// Terrain inherited from the parent landmass
    pub terrain: TerrainKind,

    pub population: u64,

    /// Polygon area in world units
    pub area: f64,

    /// Adjacent countries
    pub neighbors: Vec<CountryId>,

    /// Fill color for rendering
    pub color: Rgb,

    /// Centroid of `vertices`, used for label placement
    pub position: Point,

    /// Boundary polygon (at least three vertices, positive area)
    pub vertices: Polygon,

    /// Index of the landmass this country was cut from
    pub landmass: usize,
}

impl Country {
    /// Get the number of neighbouring countries
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if this country borders another
    #[inline]
    pub fn is_neighbor_of(&self, other: CountryId) -> bool {
        self.neighbors.binary_search(&other).is_ok()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Point-in-polygon test against the country border
    pub fn contains(&self, point: Point) -> bool {
        geometry::point_in_polygon(point, &self.vertices)
    }

    /// People per unit of area
    pub fn density(&self) -> f64 {
        if self.area > 0.0 {
            self.population as f64 / self.area
        } else {
            0.0
        }
    }
}

/// One connected land region found by the continent segmenter
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Landmass {
    /// Simplified coastline, full-resolution coordinates
    pub vertices: Polygon,

    /// Mean of the land cells, full-resolution coordinates
    pub center: Point,

    pub terrain: TerrainKind,

    /// Countries carved from this landmass, filled in by the assembler
    pub countries: Vec<CountryId>,

    /// Land cell count times the cell footprint
    pub area: f64,

    /// Elevation statistics the terrain was classified from
    pub stats: TerrainStats,
}

impl Landmass {
    /// Shoelace area of the coastline polygon
    pub fn polygon_area(&self) -> f64 {
        geometry::polygon_area(&self.vertices)
    }
}
