//! The generated world and its read-only queries

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::country::{Country, CountryId, Landmass};
use crate::error::{Result, WorldError};
use crate::geometry::Point;
use crate::terrain::TerrainKind;

/// A finished map: countries, the landmasses they were cut from, and the map size
///
/// Countries are stored in an arena indexed by [`CountryId`]; a name index
/// sits alongside for lookups by name. A world is built once per
/// generation call and never mutated afterwards.
///
/// # Examples
///
/// ```no_run
/// use fantasy_world_map::*;
///
/// let config = WorldConfigBuilder::new().seed(42).build().unwrap();
/// let world = WorldGenerator::new(config).generate(25).unwrap();
///
/// for country in world.countries() {
///     println!("{} ({}) borders {:?}", country.name, country.terrain, world.neighbor_names(country.id));
/// }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    width: u32,
    height: u32,
    countries: Vec<Country>,
    by_name: HashMap<String, CountryId>,
    landmasses: Vec<Landmass>,
}

impl World {
    /// Assemble a world, indexing countries by name
    ///
    /// Country ids must equal their position in `countries`.
    pub(crate) fn new(width: u32, height: u32, countries: Vec<Country>, landmasses: Vec<Landmass>) -> Self {
        let by_name = countries.iter().map(|c| (c.name.clone(), c.id)).collect();
        Self {
            width,
            height,
            countries,
            by_name,
            landmasses,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// All countries in id order
    #[inline]
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    #[inline]
    pub fn country_count(&self) -> usize {
        self.countries.len()
    }

    /// Landmasses in segmentation order, each listing its countries
    #[inline]
    pub fn landmasses(&self) -> &[Landmass] {
        &self.landmasses
    }

    /// Look up a country by name
    pub fn country(&self, name: &str) -> Option<&Country> {
        self.by_name.get(name).and_then(|&id| self.country_by_id(id))
    }

    /// Look up a country by name, failing with [`WorldError::CountryNotFound`]
    pub fn get(&self, name: &str) -> Result<&Country> {
        self.country(name)
            .ok_or_else(|| WorldError::CountryNotFound(name.to_string()))
    }

    #[inline]
    pub fn country_by_id(&self, id: CountryId) -> Option<&Country> {
        self.countries.get(id.index())
    }

    /// Neighbour ids of a country, empty for an unknown id
    pub fn neighbors(&self, id: CountryId) -> &[CountryId] {
        self.country_by_id(id)
            .map(|c| c.neighbors.as_slice())
            .unwrap_or(&[])
    }

    /// Neighbour names of a country, in id order
    pub fn neighbor_names(&self, id: CountryId) -> Vec<&str> {
        self.neighbors(id)
            .iter()
            .filter_map(|&n| self.country_by_id(n))
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Country whose border contains `point`
    pub fn find_country_at(&self, point: Point) -> Option<CountryId> {
        self.countries
            .iter()
            .find(|c| c.contains(point))
            .map(|c| c.id)
    }

    /// Countries reachable within `hops` border crossings, including the start
    ///
    /// Returned in id order; empty when `center` is unknown.
    pub fn countries_within_hops(&self, center: CountryId, hops: usize) -> Vec<CountryId> {
        if self.country_by_id(center).is_none() {
            return vec![];
        }

        let mut visited = HashSet::new();
        let mut frontier = vec![center];
        visited.insert(center);

        for _ in 0..hops {
            let mut next = Vec::new();
            for &id in &frontier {
                for &neighbor in self.neighbors(id) {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        let mut reached: Vec<CountryId> = visited.into_iter().collect();
        reached.sort_unstable();
        reached
    }

    /// Aggregate figures over every country
    pub fn statistics(&self) -> WorldStatistics {
        let total_population: u64 = self.countries.iter().map(|c| c.population).sum();
        let total_area: f64 = self.countries.iter().map(|c| c.area).sum();

        let mut terrain_counts: HashMap<TerrainKind, usize> = HashMap::new();
        for country in &self.countries {
            *terrain_counts.entry(country.terrain).or_default() += 1;
        }
        // Ties go to the kind declared first
        let most_common_terrain = terrain_counts
            .into_iter()
            .max_by_key(|&(kind, count)| (count, Reverse(kind)))
            .map(|(kind, _)| kind);

        WorldStatistics {
            total_countries: self.countries.len(),
            total_population,
            total_area,
            average_density: if total_area > 0.0 {
                total_population as f64 / total_area
            } else {
                0.0
            },
            most_common_terrain,
        }
    }
}

/// Summary figures for display
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldStatistics {
    pub total_countries: usize,
    pub total_population: u64,
    pub total_area: f64,
    /// People per unit of area over the whole map
    pub average_density: f64,
    /// `None` for a world without countries
    pub most_common_terrain: Option<TerrainKind>,
}
