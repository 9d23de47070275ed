//! World assembly
//!
//! Runs the pipeline end to end: height field, continent segmentation,
//! per-landmass country budgets, partitioning, naming, and the neighbour graph.

use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::{NeighborRule, WorldConfig};
use crate::country::{Country, CountryId};
use crate::error::{Result, WorldError};
use crate::generation::{partition_landmass, segment_continents, PartitionConfig, SegmentOptions};
use crate::geometry::{self, Bounds, Point};
use crate::naming::{random_population, NameGenerator};
use crate::terrain::{ColorMapper, HeightConfig, HeightField, TerrainKind, TerrainPalette};
use crate::world::World;

/// Builds [`World`]s from a [`WorldConfig`]
///
/// # Examples
///
/// ```no_run
/// use fantasy_world_map::*;
///
/// let config = WorldConfigBuilder::new()
///     .seed(7)
///     .map_size(MapSize::Small)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let world = WorldGenerator::new(config).generate(12).unwrap();
/// println!("{} countries", world.country_count());
/// ```
#[derive(Debug, Clone)]
pub struct WorldGenerator {
    config: WorldConfig,
    height_config: HeightConfig,
    partition: PartitionConfig,
}

impl WorldGenerator {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            height_config: HeightConfig::default(),
            partition: PartitionConfig::with_tolerance(config.voronoi_tolerance),
        }
    }

    /// Replace the elevation profile of the height field
    pub fn with_height_config(mut self, height_config: HeightConfig) -> Self {
        self.height_config = height_config;
        self
    }

    /// Replace the partitioner tuning
    pub fn with_partition_config(mut self, partition: PartitionConfig) -> Self {
        self.partition = partition;
        self
    }

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The height field this generator segments
    pub fn height_field(&self) -> HeightField {
        HeightField::with_config(self.config.terrain_seed, self.height_config)
    }

    /// Generate a world with roughly `country_count` countries
    ///
    /// Every landmass gets at least one country, so the result can exceed the
    /// request when there are more landmasses than countries asked for.
    ///
    /// # Errors
    ///
    /// - [`WorldError::InvalidConfig`] when `country_count` is zero
    /// - [`WorldError::NoLandmasses`] when segmentation leaves no land
    pub fn generate(&self, country_count: usize) -> Result<World> {
        self.generate_with_palette(country_count, &TerrainPalette)
    }

    /// Generate a world, coloring countries with a custom palette
    pub fn generate_with_palette<P>(&self, country_count: usize, palette: &P) -> Result<World>
    where
        P: ColorMapper<TerrainKind>,
    {
        if country_count == 0 {
            return Err(WorldError::InvalidConfig(
                "country count must be at least 1".to_string(),
            ));
        }

        let started = Instant::now();
        let config = &self.config;
        info!(
            seed = config.seed,
            terrain_seed = config.terrain_seed,
            map = config.map_size.name(),
            width = config.width(),
            height = config.height(),
            countries = country_count,
            "generating world"
        );

        let field = self.height_field();
        let mut landmasses = segment_continents(
            &field,
            config.width(),
            config.height(),
            &SegmentOptions::from(config),
        );
        if landmasses.is_empty() {
            return Err(WorldError::NoLandmasses {
                land_percent: config.land_percent,
            });
        }

        let areas: Vec<f64> = landmasses.iter().map(|l| l.polygon_area()).collect();
        let allocation = allocate_countries(&areas, country_count);

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut names = NameGenerator::new();
        let mut countries: Vec<Country> = Vec::new();

        for (index, (landmass, &budget)) in landmasses.iter_mut().zip(&allocation).enumerate() {
            let polygons = partition_landmass(landmass, budget, &self.partition, &mut rng);
            debug!(
                landmass = index,
                terrain = %landmass.terrain,
                area = areas[index],
                allocated = budget,
                produced = polygons.len(),
                "partitioned landmass"
            );

            for vertices in polygons {
                let id = CountryId(countries.len());
                let position = geometry::polygon_centroid(&vertices)
                    .or_else(|| geometry::vertex_average(&vertices))
                    .unwrap_or(landmass.center);

                countries.push(Country {
                    id,
                    name: names.next_name(&mut rng),
                    terrain: landmass.terrain,
                    population: random_population(&mut rng),
                    area: geometry::polygon_area(&vertices),
                    neighbors: Vec::new(),
                    color: palette.fill(&landmass.terrain),
                    position,
                    vertices,
                    landmass: index,
                });
                landmass.countries.push(id);
            }
        }

        assign_neighbors(&mut countries, config.neighbor_distance, config.neighbor_rule);

        let world = World::new(config.width(), config.height(), countries, landmasses);
        info!(
            landmasses = world.landmasses().len(),
            countries = world.country_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "world generated"
        );
        Ok(world)
    }
}

/// Split `total` countries across landmasses in proportion to `areas`
///
/// Starts from `max(1, floor(total * share))`, then hands out the shortfall
/// by largest remainder (ties to the lower index) or takes back the excess
/// from entries above one, smallest remainder first. The result sums to
/// `total` whenever `total >= areas.len()`; otherwise every entry is 1.
pub fn allocate_countries(areas: &[f64], total: usize) -> Vec<usize> {
    let n = areas.len();
    if n == 0 {
        return Vec::new();
    }

    let area_sum: f64 = areas.iter().sum();
    let quotas: Vec<f64> = areas
        .iter()
        .map(|&a| {
            let share = if area_sum > 0.0 { a / area_sum } else { 1.0 / n as f64 };
            share * total as f64
        })
        .collect();

    let mut counts: Vec<usize> = quotas.iter().map(|q| (q.floor() as usize).max(1)).collect();
    let remainders: Vec<f64> = quotas.iter().map(|q| q - q.floor()).collect();
    let assigned: usize = counts.iter().sum();

    if assigned < total {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| remainders[b].total_cmp(&remainders[a]).then(a.cmp(&b)));
        for &i in order.iter().cycle().take(total - assigned) {
            counts[i] += 1;
        }
    } else if assigned > total {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| remainders[a].total_cmp(&remainders[b]).then(b.cmp(&a)));

        let mut excess = assigned - total;
        while excess > 0 {
            let mut changed = false;
            for &i in &order {
                if excess == 0 {
                    break;
                }
                if counts[i] > 1 {
                    counts[i] -= 1;
                    excess -= 1;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }

    counts
}

/// Link every pair of countries whose borders come within `distance`
///
/// Pairs are prefiltered by bounding boxes grown by `distance`. A pair
/// qualifies when some vertex of one is closer than `distance` to a vertex of
/// the other. With [`NeighborRule::Edges`] it also qualifies when their edges
/// pass closer than `distance`. Both sides are updated together; lists end up
/// sorted and free of duplicates.
pub fn assign_neighbors(countries: &mut [Country], distance: f64, rule: NeighborRule) {
    let bounds: Vec<Option<Bounds>> = countries.iter().map(|c| Bounds::of(&c.vertices)).collect();

    let mut pairs = Vec::new();
    for i in 0..countries.len() {
        let Some(grown) = bounds[i].map(|b| b.expand(distance)) else {
            continue;
        };
        for j in i + 1..countries.len() {
            let Some(other) = bounds[j] else {
                continue;
            };
            if !grown.intersects(&other) {
                continue;
            }
            if borders_within(&countries[i].vertices, &countries[j].vertices, distance, rule) {
                pairs.push((i, j));
            }
        }
    }

    for (i, j) in pairs {
        countries[i].neighbors.push(CountryId(j));
        countries[j].neighbors.push(CountryId(i));
    }
    for country in countries.iter_mut() {
        country.neighbors.sort_unstable();
        country.neighbors.dedup();
    }
}

fn borders_within(a: &[Point], b: &[Point], distance: f64, rule: NeighborRule) -> bool {
    let limit = distance * distance;
    let vertices_close = a.iter().any(|p| b.iter().any(|q| p.distance_squared(*q) < limit));
    match rule {
        NeighborRule::Vertices => vertices_close,
        NeighborRule::Edges => vertices_close || geometry::min_polygon_distance(a, b) < distance,
    }
}
