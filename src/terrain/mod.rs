//! Terrain sampling and classification
//!
//! Provides the height field and the rules that turn a landmass's elevation
//! statistics into a terrain kind.

mod colors;
mod perlin;

pub use colors::{ColorMapper, CustomPalette, Rgb, TerrainPalette};
pub use perlin::{apply_terrain_curve, coastal_smoothing, HeightConfig, HeightField, NoiseLayer};

/// Terrain kinds a landmass (and every country on it) can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    Mountainous,
    Forest,
    Desert,
    #[default]
    Plains,
    Coastal,
    Island,
    Jungle,
    Tundra,
    Swamp,
    Volcanic,
    Grassland,
    Archipelago,
    Highland,
    RiverValley,
    Plateau,
    CanyonLands,
}

impl TerrainKind {
    /// Every terrain kind, in declaration order
    pub const ALL: [TerrainKind; 16] = [
        TerrainKind::Mountainous,
        TerrainKind::Forest,
        TerrainKind::Desert,
        TerrainKind::Plains,
        TerrainKind::Coastal,
        TerrainKind::Island,
        TerrainKind::Jungle,
        TerrainKind::Tundra,
        TerrainKind::Swamp,
        TerrainKind::Volcanic,
        TerrainKind::Grassland,
        TerrainKind::Archipelago,
        TerrainKind::Highland,
        TerrainKind::RiverValley,
        TerrainKind::Plateau,
        TerrainKind::CanyonLands,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            TerrainKind::Mountainous => "Mountainous",
            TerrainKind::Forest => "Forest",
            TerrainKind::Desert => "Desert",
            TerrainKind::Plains => "Plains",
            TerrainKind::Coastal => "Coastal",
            TerrainKind::Island => "Island",
            TerrainKind::Jungle => "Jungle",
            TerrainKind::Tundra => "Tundra",
            TerrainKind::Swamp => "Swamp",
            TerrainKind::Volcanic => "Volcanic",
            TerrainKind::Grassland => "Grassland",
            TerrainKind::Archipelago => "Archipelago",
            TerrainKind::Highland => "Highland",
            TerrainKind::RiverValley => "River Valley",
            TerrainKind::Plateau => "Plateau",
            TerrainKind::CanyonLands => "Canyon Lands",
        }
    }

    /// Terrain that sits close to sea level and is dominated by its coast
    pub fn is_low_lying(self) -> bool {
        matches!(
            self,
            TerrainKind::Coastal | TerrainKind::Island | TerrainKind::Archipelago | TerrainKind::Swamp
        )
    }
}

impl std::fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Elevation summary of one connected land region
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainStats {
    /// Mean cell elevation
    pub avg_elevation: f64,
    /// Standard deviation of cell elevations
    pub std_dev: f64,
    /// Fraction of cells touching sea or the grid edge
    pub coastline_ratio: f64,
    /// Number of grid cells
    pub size: usize,
}

/// Pick a terrain kind from elevation statistics relative to the land threshold
///
/// Rows are tested from the highest elevation band down; the first match wins.
pub fn classify_terrain(stats: &TerrainStats, threshold: f64) -> TerrainKind {
    let rel = stats.avg_elevation - threshold;
    let spread = stats.std_dev;
    let coast = stats.coastline_ratio;
    let size = stats.size;

    if rel > 2500.0 {
        return TerrainKind::Mountainous;
    }

    if rel > 1500.0 {
        return if spread > 600.0 {
            TerrainKind::Mountainous
        } else {
            TerrainKind::Highland
        };
    }

    if rel > 800.0 {
        return if spread > 400.0 {
            TerrainKind::Plateau
        } else {
            TerrainKind::Highland
        };
    }

    if rel > 400.0 {
        return if spread > 250.0 {
            TerrainKind::CanyonLands
        } else if spread > 150.0 {
            TerrainKind::Grassland
        } else {
            TerrainKind::Plains
        };
    }

    if rel > 150.0 {
        return if coast > 0.4 {
            TerrainKind::Coastal
        } else if spread > 180.0 {
            TerrainKind::RiverValley
        } else if size > 2000 {
            TerrainKind::Forest
        } else {
            TerrainKind::Grassland
        };
    }

    if rel > 50.0 {
        return if coast > 0.6 {
            TerrainKind::Archipelago
        } else if coast > 0.3 {
            TerrainKind::Coastal
        } else if spread < 40.0 && coast > 0.1 {
            TerrainKind::Swamp
        } else if size < 800 {
            TerrainKind::Island
        } else {
            TerrainKind::Plains
        };
    }

    // Near sea level
    if coast > 0.7 {
        TerrainKind::Archipelago
    } else if coast > 0.4 {
        if size < 400 {
            TerrainKind::Island
        } else {
            TerrainKind::Coastal
        }
    } else if spread < 25.0 {
        TerrainKind::Swamp
    } else {
        TerrainKind::Plains
    }
}

/// Point biome of the raw height field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Biome {
    DeepOcean,
    Ocean,
    Beach,
    Plains,
    Forest,
    Mountains,
    HighMountains,
}

impl Biome {
    /// Check if this biome is water
    pub fn is_water(&self) -> bool {
        matches!(self, Biome::DeepOcean | Biome::Ocean)
    }
}

impl HeightField {
    /// Biome at a world coordinate, banded by offset from sea level
    pub fn biome_at(&self, x: f64, y: f64) -> Biome {
        let elevation = self.height_at(x, y);
        let sea = self.config().sea_level;

        if elevation < sea - 2000.0 {
            Biome::DeepOcean
        } else if elevation < sea {
            Biome::Ocean
        } else if elevation < sea + 100.0 {
            Biome::Beach
        } else if elevation < sea + 500.0 {
            Biome::Plains
        } else if elevation < sea + 2000.0 {
            Biome::Forest
        } else if elevation < sea + 5000.0 {
            Biome::Mountains
        } else {
            Biome::HighMountains
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(rel: f64, std_dev: f64, coastline_ratio: f64, size: usize) -> TerrainStats {
        TerrainStats {
            avg_elevation: 1000.0 + rel,
            std_dev,
            coastline_ratio,
            size,
        }
    }

    fn classify(rel: f64, std_dev: f64, coast: f64, size: usize) -> TerrainKind {
        classify_terrain(&stats(rel, std_dev, coast, size), 1000.0)
    }

    #[test]
    fn test_high_bands() {
        assert_eq!(classify(3000.0, 0.0, 0.0, 10), TerrainKind::Mountainous);
        assert_eq!(classify(2000.0, 700.0, 0.0, 10), TerrainKind::Mountainous);
        assert_eq!(classify(2000.0, 500.0, 0.0, 10), TerrainKind::Highland);
        assert_eq!(classify(1000.0, 450.0, 0.0, 10), TerrainKind::Plateau);
        assert_eq!(classify(1000.0, 100.0, 0.0, 10), TerrainKind::Highland);
    }

    #[test]
    fn test_middle_bands() {
        assert_eq!(classify(500.0, 300.0, 0.0, 10), TerrainKind::CanyonLands);
        assert_eq!(classify(500.0, 200.0, 0.0, 10), TerrainKind::Grassland);
        assert_eq!(classify(500.0, 100.0, 0.0, 10), TerrainKind::Plains);

        assert_eq!(classify(200.0, 500.0, 0.5, 10), TerrainKind::Coastal);
        assert_eq!(classify(200.0, 200.0, 0.1, 10), TerrainKind::RiverValley);
        assert_eq!(classify(200.0, 100.0, 0.1, 2500), TerrainKind::Forest);
        assert_eq!(classify(200.0, 100.0, 0.1, 1500), TerrainKind::Grassland);
    }

    #[test]
    fn test_low_bands() {
        assert_eq!(classify(100.0, 100.0, 0.65, 10), TerrainKind::Archipelago);
        assert_eq!(classify(100.0, 100.0, 0.35, 10), TerrainKind::Coastal);
        assert_eq!(classify(100.0, 30.0, 0.2, 10), TerrainKind::Swamp);
        assert_eq!(classify(100.0, 100.0, 0.2, 500), TerrainKind::Island);
        assert_eq!(classify(100.0, 100.0, 0.2, 900), TerrainKind::Plains);

        assert_eq!(classify(10.0, 100.0, 0.8, 10), TerrainKind::Archipelago);
        assert_eq!(classify(10.0, 100.0, 0.5, 300), TerrainKind::Island);
        assert_eq!(classify(10.0, 100.0, 0.5, 600), TerrainKind::Coastal);
        assert_eq!(classify(10.0, 10.0, 0.1, 600), TerrainKind::Swamp);
        assert_eq!(classify(10.0, 100.0, 0.1, 600), TerrainKind::Plains);
    }

    #[test]
    fn test_band_edges_are_exclusive() {
        // Exactly +2500 falls through to the next band
        assert_eq!(classify(2500.0, 0.0, 0.0, 10), TerrainKind::Highland);
        assert_eq!(classify(50.0, 100.0, 0.1, 600), TerrainKind::Plains);
    }

    #[test]
    fn test_classification_is_relative_to_threshold() {
        let s = TerrainStats {
            avg_elevation: 3200.0,
            std_dev: 10.0,
            coastline_ratio: 0.0,
            size: 50,
        };
        assert_eq!(classify_terrain(&s, 0.0), TerrainKind::Mountainous);
        assert_eq!(classify_terrain(&s, 3000.0), TerrainKind::Grassland);
        // Same inputs, same answer
        assert_eq!(classify_terrain(&s, 3000.0), classify_terrain(&s, 3000.0));
    }

    #[test]
    fn test_terrain_names() {
        assert_eq!(TerrainKind::RiverValley.name(), "River Valley");
        assert_eq!(TerrainKind::CanyonLands.to_string(), "Canyon Lands");
        let unique: std::collections::HashSet<_> = TerrainKind::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(unique.len(), 16);
    }

    #[test]
    fn test_biome_matches_height() {
        let field = HeightField::new(42);
        let sea = field.config().sea_level;
        for i in 0..40 {
            let (x, y) = (i as f64 * 9.0, i as f64 * 4.0);
            let biome = field.biome_at(x, y);
            assert_eq!(biome.is_water(), field.height_at(x, y) < sea);
        }
    }
}
