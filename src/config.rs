//! World Configuration and Builder
//!
//! This module provides configuration types for deterministic world map generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldError};

/// Map size presets
///
/// Each size maps to a width and height in world units. Generation samples the
/// height field at a reduced resolution and scales results back to this space.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapSize {
    /// 400×300, quick previews
    Small,
    /// 800×600, the classic map canvas
    Standard,
    /// 1600×1200
    Large,
    /// Custom dimensions
    Custom {
        /// Map width in world units
        width: u32,
        /// Map height in world units
        height: u32,
    },
}

impl MapSize {
    /// Map width in world units
    pub fn width(self) -> u32 {
        match self {
            MapSize::Small => 400,
            MapSize::Standard => 800,
            MapSize::Large => 1600,
            MapSize::Custom { width, .. } => width,
        }
    }

    /// Map height in world units
    pub fn height(self) -> u32 {
        match self {
            MapSize::Small => 300,
            MapSize::Standard => 600,
            MapSize::Large => 1200,
            MapSize::Custom { height, .. } => height,
        }
    }

    /// Get a human-readable name for this map size
    pub fn name(self) -> &'static str {
        match self {
            MapSize::Small => "Small",
            MapSize::Standard => "Standard",
            MapSize::Large => "Large",
            MapSize::Custom { .. } => "Custom",
        }
    }
}

impl Default for MapSize {
    fn default() -> Self {
        MapSize::Standard
    }
}

/// How close two country borders must come to count as neighbours
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborRule {
    /// Some vertex of one lies within the neighbour distance of a vertex of the other
    #[default]
    Vertices,
    /// As `Vertices`, or some pair of edges passes within the neighbour distance
    ///
    /// Also links countries whose vertices are sparse along a long shared border.
    Edges,
}

/// Configuration for deterministic world generation
///
/// The same configuration and country count always produce the identical
/// world: same landmasses, same country polygons, names and neighbours.
///
/// # Example
///
/// ```rust
/// use fantasy_world_map::*;
///
/// let config = WorldConfigBuilder::new()
///     .seed(42)
///     .map_size(MapSize::Small)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: WorldConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config.seed, restored.seed);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConfig {
    /// Seed for seed-point placement, country names and populations
    pub seed: u64,

    /// Seed for the height field permutation table
    ///
    /// Keeping it separate allows the same coastline with different political
    /// layouts.
    pub terrain_seed: u64,

    /// Map dimensions preset
    pub map_size: MapSize,

    /// Percentage of sampled cells that end up above the land threshold (0, 100]
    pub land_percent: f64,

    /// Landmasses with a smaller cell area (full-resolution units) are discarded
    pub min_island_size: f64,

    /// Countries whose borders come closer than this are neighbours
    pub neighbor_distance: f64,

    /// Which border features `neighbor_distance` is measured between
    pub neighbor_rule: NeighborRule,

    /// Slack used by the nearest-seed test while tracing approximate Voronoi cells
    ///
    /// A sample point still belongs to a seed's cell while no other seed is
    /// closer by more than this amount.
    pub voronoi_tolerance: f64,

    /// Height field sampling stride; the elevation grid is `width / downscale` wide
    pub downscale: u32,
}

impl WorldConfig {
    /// Map width in world units
    #[inline]
    pub fn width(&self) -> u32 {
        self.map_size.width()
    }

    /// Map height in world units
    #[inline]
    pub fn height(&self) -> u32 {
        self.map_size.height()
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfigBuilder::new().build().unwrap()
    }
}

/// Builder for creating WorldConfig with validation
///
/// # Example
///
/// ```rust
/// use fantasy_world_map::*;
///
/// let config = WorldConfigBuilder::new()
///     .seed(12345)
///     .land_percent(60.0)
///     .unwrap()
///     .neighbor_distance(12.0)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.terrain_seed, 12345);
/// ```
#[derive(Debug, Clone)]
pub struct WorldConfigBuilder {
    seed: Option<u64>,
    terrain_seed: Option<u64>,
    map_size: MapSize,
    land_percent: f64,
    min_island_size: f64,
    neighbor_distance: f64,
    neighbor_rule: NeighborRule,
    voronoi_tolerance: f64,
    downscale: u32,
}

impl WorldConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (process randomness)
    /// - terrain_seed: Same as seed
    /// - map_size: Standard (800×600)
    /// - land_percent: 70
    /// - min_island_size: 10
    /// - neighbor_distance: 10
    /// - neighbor_rule: Vertices
    /// - voronoi_tolerance: 0.001
    /// - downscale: 2
    pub fn new() -> Self {
        Self {
            seed: None,
            terrain_seed: None,
            map_size: MapSize::default(),
            land_percent: 70.0,
            min_island_size: 10.0,
            neighbor_distance: 10.0,
            neighbor_rule: NeighborRule::Vertices,
            voronoi_tolerance: 0.001,
            downscale: 2,
        }
    }

    /// Set the random seed for world generation
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set a separate terrain seed
    ///
    /// If not set, the terrain seed matches the world seed.
    pub fn terrain_seed(mut self, seed: u64) -> Self {
        self.terrain_seed = Some(seed);
        self
    }

    /// Set the map size preset
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a custom size with a zero dimension
    pub fn map_size(mut self, size: MapSize) -> Result<Self> {
        if size.width() == 0 || size.height() == 0 {
            return Err(WorldError::InvalidConfig(format!(
                "map dimensions must be positive (got {}x{})",
                size.width(),
                size.height()
            )));
        }
        self.map_size = size;
        Ok(self)
    }

    /// Set the land percentage
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless `0 < percent <= 100`
    pub fn land_percent(mut self, percent: f64) -> Result<Self> {
        if !(percent > 0.0 && percent <= 100.0) {
            return Err(WorldError::InvalidConfig(format!(
                "land percent must be in (0, 100] (got {})",
                percent
            )));
        }
        self.land_percent = percent;
        Ok(self)
    }

    /// Set the minimum island area
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the size is negative or not finite
    pub fn min_island_size(mut self, size: f64) -> Result<Self> {
        if !size.is_finite() || size < 0.0 {
            return Err(WorldError::InvalidConfig(format!(
                "minimum island size must be >= 0 (got {})",
                size
            )));
        }
        self.min_island_size = size;
        Ok(self)
    }

    /// Set the vertex distance under which two countries count as neighbours
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if distance <= 0.0
    pub fn neighbor_distance(mut self, distance: f64) -> Result<Self> {
        if !(distance > 0.0 && distance.is_finite()) {
            return Err(WorldError::InvalidConfig(format!(
                "neighbor distance must be positive (got {})",
                distance
            )));
        }
        self.neighbor_distance = distance;
        Ok(self)
    }

    /// Choose whether edges, not just vertices, can make countries neighbours
    pub fn neighbor_rule(mut self, rule: NeighborRule) -> Self {
        self.neighbor_rule = rule;
        self
    }

    /// Set the nearest-seed tolerance used by the cell tracer
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the tolerance is negative or not finite
    pub fn voronoi_tolerance(mut self, tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(WorldError::InvalidConfig(format!(
                "voronoi tolerance must be >= 0 (got {})",
                tolerance
            )));
        }
        self.voronoi_tolerance = tolerance;
        Ok(self)
    }

    /// Set the height field sampling stride
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if downscale is 0 or larger than 8
    pub fn downscale(mut self, downscale: u32) -> Result<Self> {
        if downscale == 0 || downscale > 8 {
            return Err(WorldError::InvalidConfig(format!(
                "downscale must be in 1..=8 (got {})",
                downscale
            )));
        }
        self.downscale = downscale;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed from process randomness.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the map is smaller than one sample in either
    /// direction at the chosen downscale
    pub fn build(self) -> Result<WorldConfig> {
        let downscale = self.downscale;
        if self.map_size.width() < downscale || self.map_size.height() < downscale {
            return Err(WorldError::InvalidConfig(format!(
                "map {}x{} is too small for downscale {}",
                self.map_size.width(),
                self.map_size.height(),
                downscale
            )));
        }

        let seed = self.seed.unwrap_or_else(rand::random);
        let terrain_seed = self.terrain_seed.unwrap_or(seed);

        Ok(WorldConfig {
            seed,
            terrain_seed,
            map_size: self.map_size,
            land_percent: self.land_percent,
            min_island_size: self.min_island_size,
            neighbor_distance: self.neighbor_distance,
            neighbor_rule: self.neighbor_rule,
            voronoi_tolerance: self.voronoi_tolerance,
            downscale,
        })
    }
}

impl Default for WorldConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_size_dimensions() {
        assert_eq!(MapSize::Small.width(), 400);
        assert_eq!(MapSize::Small.height(), 300);
        assert_eq!(MapSize::Standard.width(), 800);
        assert_eq!(MapSize::Standard.height(), 600);
        assert_eq!(MapSize::Large.width(), 1600);
        assert_eq!(MapSize::Large.height(), 1200);
    }

    #[test]
    fn test_map_size_custom() {
        let custom = MapSize::Custom {
            width: 320,
            height: 200,
        };
        assert_eq!(custom.width(), 320);
        assert_eq!(custom.height(), 200);
        assert_eq!(custom.name(), "Custom");
    }

    #[test]
    fn test_builder_defaults() {
        let config = WorldConfigBuilder::new().build().unwrap();
        assert_eq!(config.map_size, MapSize::Standard);
        assert_eq!(config.land_percent, 70.0);
        assert_eq!(config.min_island_size, 10.0);
        assert_eq!(config.neighbor_distance, 10.0);
        assert_eq!(config.neighbor_rule, NeighborRule::Vertices);
        assert_eq!(config.downscale, 2);
        assert_eq!(config.terrain_seed, config.seed);
    }

    #[test]
    fn test_builder_custom() {
        let config = WorldConfigBuilder::new()
            .seed(42)
            .terrain_seed(99)
            .map_size(MapSize::Small)
            .unwrap()
            .land_percent(55.0)
            .unwrap()
            .neighbor_rule(NeighborRule::Edges)
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.neighbor_rule, NeighborRule::Edges);
        assert_eq!(config.terrain_seed, 99);
        assert_eq!(config.width(), 400);
        assert_eq!(config.height(), 300);
        assert_eq!(config.land_percent, 55.0);
    }

    #[test]
    fn test_builder_invalid_land_percent() {
        assert!(WorldConfigBuilder::new().land_percent(0.0).is_err());
        assert!(WorldConfigBuilder::new().land_percent(100.5).is_err());
        assert!(WorldConfigBuilder::new().land_percent(f64::NAN).is_err());
        assert!(WorldConfigBuilder::new().land_percent(100.0).is_ok());
    }

    #[test]
    fn test_builder_invalid_neighbor_distance() {
        assert!(WorldConfigBuilder::new().neighbor_distance(0.0).is_err());
        assert!(WorldConfigBuilder::new().neighbor_distance(-3.0).is_err());
    }

    #[test]
    fn test_builder_invalid_map_size() {
        let result = WorldConfigBuilder::new().map_size(MapSize::Custom {
            width: 0,
            height: 100,
        });
        assert!(matches!(result, Err(WorldError::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_map_too_small_for_downscale() {
        let result = WorldConfigBuilder::new()
            .map_size(MapSize::Custom {
                width: 3,
                height: 3,
            })
            .unwrap()
            .downscale(4)
            .unwrap()
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_invalid_downscale() {
        assert!(WorldConfigBuilder::new().downscale(0).is_err());
        assert!(WorldConfigBuilder::new().downscale(9).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = WorldConfigBuilder::new()
            .seed(12345)
            .map_size(MapSize::Large)
            .unwrap()
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: WorldConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
