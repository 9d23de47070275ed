//! Color mapping for terrain kinds

use std::collections::HashMap;

use super::TerrainKind;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// `#rrggbb` string for web canvases
    pub fn to_hex_string(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Normalized RGBA for GPU-style consumers
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }
}

/// Trait for mapping terrain kinds to fill and outline colors
pub trait ColorMapper<T> {
    /// Polygon fill color
    fn fill(&self, terrain: &T) -> Rgb;

    /// Polygon outline color
    fn outline(&self, terrain: &T) -> Rgb;
}

/// Default palette for TerrainKind
#[derive(Debug, Clone, Copy, Default)]
pub struct TerrainPalette;

impl ColorMapper<TerrainKind> for TerrainPalette {
    fn fill(&self, terrain: &TerrainKind) -> Rgb {
        match terrain {
            TerrainKind::Mountainous => Rgb::from_hex(0x8DA090),
            TerrainKind::Forest => Rgb::from_hex(0x2D5A27),
            TerrainKind::Desert => Rgb::from_hex(0xE3C599),
            TerrainKind::Plains => Rgb::from_hex(0x7CB368),
            TerrainKind::Coastal => Rgb::from_hex(0x4A7C9C),
            TerrainKind::Island => Rgb::from_hex(0x87CEEB),
            TerrainKind::Jungle => Rgb::from_hex(0x1B4D27),
            TerrainKind::Tundra => Rgb::from_hex(0xE6F2F2),
            TerrainKind::Swamp => Rgb::from_hex(0x6B8E5C),
            TerrainKind::Volcanic => Rgb::from_hex(0x8B4513),
            TerrainKind::Grassland => Rgb::from_hex(0x5A8D5A),
            TerrainKind::Archipelago => Rgb::from_hex(0x4682B4),
            TerrainKind::Highland => Rgb::from_hex(0xA9A9A9),
            TerrainKind::RiverValley => Rgb::from_hex(0x6B8C9C),
            TerrainKind::Plateau => Rgb::from_hex(0xCD853F),
            TerrainKind::CanyonLands => Rgb::from_hex(0xB8860B),
        }
    }

    fn outline(&self, terrain: &TerrainKind) -> Rgb {
        match terrain {
            TerrainKind::Mountainous => Rgb::from_hex(0x5A6A65),
            TerrainKind::Forest => Rgb::from_hex(0x1A3D1A),
            TerrainKind::Desert => Rgb::from_hex(0xC9A87A),
            TerrainKind::Plains => Rgb::from_hex(0x5A8D5A),
            TerrainKind::Coastal => Rgb::from_hex(0x2F4F6B),
            TerrainKind::Island => Rgb::from_hex(0x6495ED),
            TerrainKind::Jungle => Rgb::from_hex(0x0F2D1A),
            TerrainKind::Tundra => Rgb::from_hex(0xC8D8D8),
            TerrainKind::Swamp => Rgb::from_hex(0x4A6A4A),
            TerrainKind::Volcanic => Rgb::from_hex(0x654321),
            TerrainKind::Grassland => Rgb::from_hex(0x3A6D3A),
            TerrainKind::Archipelago => Rgb::from_hex(0x36648B),
            TerrainKind::Highland => Rgb::from_hex(0x696969),
            TerrainKind::RiverValley => Rgb::from_hex(0x4A6C7B),
            TerrainKind::Plateau => Rgb::from_hex(0x8B6914),
            TerrainKind::CanyonLands => Rgb::from_hex(0x8B6508),
        }
    }
}

/// Palette that overrides individual fill colors and defers the rest to [`TerrainPalette`]
#[derive(Debug, Clone, Default)]
pub struct CustomPalette {
    fills: HashMap<TerrainKind, Rgb>,
    outlines: HashMap<TerrainKind, Rgb>,
}

impl CustomPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the fill color for one terrain kind
    pub fn with_fill(mut self, terrain: TerrainKind, color: Rgb) -> Self {
        self.fills.insert(terrain, color);
        self
    }

    /// Override the outline color for one terrain kind
    pub fn with_outline(mut self, terrain: TerrainKind, color: Rgb) -> Self {
        self.outlines.insert(terrain, color);
        self
    }
}

impl ColorMapper<TerrainKind> for CustomPalette {
    fn fill(&self, terrain: &TerrainKind) -> Rgb {
        self.fills
            .get(terrain)
            .copied()
            .unwrap_or_else(|| TerrainPalette.fill(terrain))
    }

    fn outline(&self, terrain: &TerrainKind) -> Rgb {
        self.outlines
            .get(terrain)
            .copied()
            .unwrap_or_else(|| TerrainPalette.outline(terrain))
    }
}
