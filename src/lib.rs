//! Procedural fantasy world maps
//!
//! Generates a layered-noise height field, segments it into landmasses with
//! classified terrain, and carves each landmass into named countries with a
//! symmetric neighbour graph. Output is plain 2D polygons, ready for any
//! canvas or engine to draw.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fantasy_world_map::*;
//!
//! let config = WorldConfigBuilder::new()
//!     .seed(42)
//!     .map_size(MapSize::Standard)
//!     .unwrap()
//!     .land_percent(70.0)
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let world = WorldGenerator::new(config).generate(25).unwrap();
//! for country in world.countries() {
//!     println!("{}: {} with {} neighbours", country.name, country.terrain, country.neighbor_count());
//! }
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): KD-tree nearest-seed queries while tracing country cells
//! - `serde`: Serialization support for configuration and the generated world

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod terrain;
pub mod country;
pub mod generation;
pub mod naming;
pub mod spatial;
pub mod world;
pub mod generator;

// Re-export core types for convenience
pub use error::{WorldError, Result};
pub use config::{MapSize, NeighborRule, WorldConfig, WorldConfigBuilder};
pub use geometry::{Bounds, Point, Polygon};
pub use terrain::{
    classify_terrain, Biome, ColorMapper, CustomPalette, HeightConfig, HeightField, Rgb, TerrainKind,
    TerrainPalette, TerrainStats,
};
pub use country::{Country, CountryId, Landmass};
pub use generation::{Degenerate, PartitionConfig};
pub use world::{World, WorldStatistics};
pub use generator::{allocate_countries, assign_neighbors, WorldGenerator};

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
