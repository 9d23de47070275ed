//! Layered gradient-noise height field
//!
//! Elevation is built from three octave stacks of classic 3D Perlin noise
//! sampled on the z = 0 plane, blended, bent by a terrain curve and mapped
//! into a signed elevation range. Shallow water gets an extra smoothing pass
//! so coastlines do not come out jagged.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// One fractal noise layer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoiseLayer {
    /// Coordinate scale applied before sampling (lower = larger features)
    pub frequency: f64,
    /// Number of octaves
    pub octaves: usize,
    /// Amplitude decay per octave
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
    /// Multiplier on the normalized layer output
    pub amplitude: f64,
}

impl NoiseLayer {
    /// Continental shapes
    pub const BASE: NoiseLayer = NoiseLayer {
        frequency: 0.01,
        octaves: 4,
        persistence: 0.5,
        lacunarity: 2.0,
        amplitude: 1.0,
    };

    /// Small-scale roughness
    pub const DETAIL: NoiseLayer = NoiseLayer {
        frequency: 0.05,
        octaves: 2,
        persistence: 0.3,
        lacunarity: 2.0,
        amplitude: 0.3,
    };

    /// Very large scale uplift
    pub const MOUNTAIN: NoiseLayer = NoiseLayer {
        frequency: 0.002,
        octaves: 3,
        persistence: 0.6,
        lacunarity: 2.0,
        amplitude: 1.5,
    };
}

/// Elevation range and layer blend for a [`HeightField`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeightConfig {
    /// Lowest representable elevation
    pub min_depth: f64,
    /// Highest representable elevation
    pub max_height: f64,
    /// Sea level used for coastal smoothing and biome lookup
    pub sea_level: f64,
    /// Depth of the band below sea level that gets smoothed
    pub coastal_band: f64,
    /// Base, detail and mountain layers
    pub layers: [NoiseLayer; 3],
    /// Blend weights for the three layers
    pub weights: [f64; 3],
}

impl Default for HeightConfig {
    fn default() -> Self {
        Self {
            min_depth: -10_000.0,
            max_height: 10_000.0,
            sea_level: 100.0,
            coastal_band: 500.0,
            layers: [NoiseLayer::BASE, NoiseLayer::DETAIL, NoiseLayer::MOUNTAIN],
            weights: [0.6, 0.2, 0.2],
        }
    }
}

/// Seeded elevation function over the plane
///
/// The permutation table is shuffled once at construction; afterwards every
/// query is a pure function of the coordinates.
#[derive(Clone)]
pub struct HeightField {
    perm: [u8; 512],
    seed: u64,
    config: HeightConfig,
}

impl std::fmt::Debug for HeightField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeightField")
            .field("seed", &self.seed)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HeightField {
    /// Create a height field with the default elevation profile
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, HeightConfig::default())
    }

    /// Create a height field with a custom elevation profile
    pub fn with_config(seed: u64, config: HeightConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(&mut rng);

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }

        Self { perm, seed, config }
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn config(&self) -> &HeightConfig {
        &self.config
    }

    /// Elevation at a world coordinate
    pub fn height_at(&self, x: f64, y: f64) -> f64 {
        let cfg = &self.config;

        let mut combined = 0.0;
        for (layer, weight) in cfg.layers.iter().zip(cfg.weights) {
            let value = self.octave_noise(
                x * layer.frequency,
                y * layer.frequency,
                layer.octaves,
                layer.persistence,
                layer.lacunarity,
            );
            combined += value * layer.amplitude * weight;
        }

        let curved = apply_terrain_curve(combined);
        let height = cfg.min_depth + curved * (cfg.max_height - cfg.min_depth);
        let height = height.clamp(cfg.min_depth, cfg.max_height);

        if height < cfg.sea_level {
            coastal_smoothing(height, cfg.sea_level, cfg.coastal_band)
        } else {
            height
        }
    }

    /// Sample a `width`×`height` block on the integer grid starting at `(x0, y0)`
    ///
    /// Rows are indexed by y, columns by x.
    pub fn chunk(&self, x0: i64, y0: i64, width: usize, height: usize) -> Vec<Vec<f64>> {
        (0..height)
            .map(|dy| {
                (0..width)
                    .map(|dx| self.height_at((x0 + dx as i64) as f64, (y0 + dy as i64) as f64))
                    .collect()
            })
            .collect()
    }

    /// Summed octaves normalized to [0, 1]
    fn octave_noise(&self, x: f64, y: f64, octaves: usize, persistence: f64, lacunarity: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves {
            let sample = (self.perlin(x * frequency, y * frequency, 0.0) + 1.0) / 2.0;
            total += sample * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        if max_value > 0.0 {
            total / max_value
        } else {
            0.0
        }
    }

    /// Classic improved Perlin noise, roughly in [-1, 1]
    fn perlin(&self, x: f64, y: f64, z: f64) -> f64 {
        let p = &self.perm;

        let xi = (x.floor() as i64 & 255) as usize;
        let yi = (y.floor() as i64 & 255) as usize;
        let zi = (z.floor() as i64 & 255) as usize;

        let xf = x - x.floor();
        let yf = y - y.floor();
        let zf = z - z.floor();

        let u = fade(xf);
        let v = fade(yf);
        let w = fade(zf);

        let a = p[xi] as usize + yi;
        let aa = p[a] as usize + zi;
        let ab = p[a + 1] as usize + zi;
        let b = p[xi + 1] as usize + yi;
        let ba = p[b] as usize + zi;
        let bb = p[b + 1] as usize + zi;

        lerp(
            lerp(
                lerp(gradient(p[aa], xf, yf, zf), gradient(p[ba], xf - 1.0, yf, zf), u),
                lerp(
                    gradient(p[ab], xf, yf - 1.0, zf),
                    gradient(p[bb], xf - 1.0, yf - 1.0, zf),
                    u,
                ),
                v,
            ),
            lerp(
                lerp(
                    gradient(p[aa + 1], xf, yf, zf - 1.0),
                    gradient(p[ba + 1], xf - 1.0, yf, zf - 1.0),
                    u,
                ),
                lerp(
                    gradient(p[ab + 1], xf, yf - 1.0, zf - 1.0),
                    gradient(p[bb + 1], xf - 1.0, yf - 1.0, zf - 1.0),
                    u,
                ),
                v,
            ),
            w,
        )
    }
}

/// Quintic fade, 6t⁵ - 15t⁴ + 10t³
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product with one of the 12 cube-edge gradients
#[inline]
fn gradient(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

/// Flatten lowlands and steepen highlands
pub fn apply_terrain_curve(value: f64) -> f64 {
    if value < 0.3 {
        value * 0.7
    } else if value < 0.7 {
        value
    } else {
        0.7 + (value - 0.7) * 1.5
    }
}

/// Ease elevations within `band` below sea level towards the shoreline
pub fn coastal_smoothing(height: f64, sea_level: f64, band: f64) -> f64 {
    if band <= 0.0 || height >= sea_level || height < sea_level - band {
        return height;
    }
    let depth_ratio = (sea_level - height) / band;
    sea_level - band * (1.0 - (1.0 - depth_ratio).powi(2))
}
