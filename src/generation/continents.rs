//! Land/sea segmentation of the height field
//!
//! The field is sampled on a downscaled grid, thresholded at the elevation
//! percentile that leaves the requested share of cells above it, and split
//! into 4-connected components with a breadth-first flood fill. Each
//! component becomes a [`Landmass`] with classified terrain and a traced
//! coastline in full-resolution coordinates.

use std::collections::VecDeque;

use glam::DVec2;

use super::boundary::{simplify_boundary, trace_boundary, SIMPLIFY_TOLERANCE};
use crate::config::WorldConfig;
use crate::country::Landmass;
use crate::geometry::{self, EPSILON};
use crate::terrain::{classify_terrain, HeightField, TerrainStats};

const NEIGHBORS_4: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Row-major elevation samples on the downscaled grid
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationGrid {
    width: usize,
    height: usize,
    cells: Vec<f64>,
}

impl ElevationGrid {
    /// Sample `width`×`height` integer points of the field starting at the origin
    pub fn sample(field: &HeightField, width: usize, height: usize) -> Self {
        let cells = field.chunk(0, 0, width, height).into_iter().flatten().collect();
        Self {
            width,
            height,
            cells,
        }
    }

    /// Wrap existing samples; `cells.len()` must equal `width * height`
    pub fn from_cells(width: usize, height: usize, cells: Vec<f64>) -> Option<Self> {
        (cells.len() == width * height).then_some(Self {
            width,
            height,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.cells[y * self.width + x]
    }

    /// Elevation at a signed coordinate, `None` outside the grid
    #[inline]
    fn get_signed(&self, x: i64, y: i64) -> Option<f64> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            None
        } else {
            Some(self.get(x as usize, y as usize))
        }
    }

    /// Elevation that roughly `land_percent`% of the cells lie above
    ///
    /// Picks index `floor(n * (1 - p / 100))` of the ascending sort, clamped
    /// to the last cell.
    pub fn elevation_threshold(&self, land_percent: f64) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        let mut sorted = self.cells.clone();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let fraction = (1.0 - land_percent / 100.0).clamp(0.0, 1.0);
        let index = ((n as f64 * fraction).floor() as usize).min(n - 1);
        sorted[index]
    }

    /// Breadth-first 4-connected components of cells above `threshold`
    ///
    /// Components are discovered in row-major order of their first cell.
    pub fn land_components(&self, threshold: f64) -> Vec<Vec<(usize, usize)>> {
        let mut visited = vec![false; self.cells.len()];
        let mut components = Vec::new();
        let mut queue = VecDeque::new();

        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                if visited[idx] || self.cells[idx] <= threshold {
                    continue;
                }

                let mut component = Vec::new();
                visited[idx] = true;
                queue.push_back((x, y));

                while let Some((cx, cy)) = queue.pop_front() {
                    component.push((cx, cy));
                    for (dx, dy) in NEIGHBORS_4 {
                        let nx = cx as i64 + dx;
                        let ny = cy as i64 + dy;
                        let Some(elevation) = self.get_signed(nx, ny) else {
                            continue;
                        };
                        let nidx = ny as usize * self.width + nx as usize;
                        if !visited[nidx] && elevation > threshold {
                            visited[nidx] = true;
                            queue.push_back((nx as usize, ny as usize));
                        }
                    }
                }

                components.push(component);
            }
        }

        components
    }

    /// Elevation statistics of one component
    ///
    /// A cell counts towards the coastline when any 4-neighbour is sea or lies
    /// outside the grid.
    pub fn component_stats(&self, cells: &[(usize, usize)], threshold: f64) -> TerrainStats {
        let size = cells.len();
        if size == 0 {
            return TerrainStats {
                avg_elevation: 0.0,
                std_dev: 0.0,
                coastline_ratio: 0.0,
                size: 0,
            };
        }

        let elevations: Vec<f64> = cells.iter().map(|&(x, y)| self.get(x, y)).collect();
        let mean = elevations.iter().sum::<f64>() / size as f64;
        let variance = elevations.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / size as f64;

        let coastal = cells
            .iter()
            .filter(|&&(x, y)| {
                NEIGHBORS_4.iter().any(|&(dx, dy)| {
                    match self.get_signed(x as i64 + dx, y as i64 + dy) {
                        Some(e) => e <= threshold,
                        None => true,
                    }
                })
            })
            .count();

        TerrainStats {
            avg_elevation: mean,
            std_dev: variance.sqrt(),
            coastline_ratio: coastal as f64 / size as f64,
            size,
        }
    }
}

/// Parameters of the segmentation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentOptions {
    /// Share of sampled cells that should be land, in percent
    pub land_percent: f64,
    /// Minimum landmass area in full-resolution units
    pub min_island_size: f64,
    /// Grid stride; grid coordinates are multiplied by this on output
    pub downscale: u32,
}

impl From<&WorldConfig> for SegmentOptions {
    fn from(config: &WorldConfig) -> Self {
        Self {
            land_percent: config.land_percent,
            min_island_size: config.min_island_size,
            downscale: config.downscale,
        }
    }
}

/// Split the height field into classified landmasses
///
/// `width` and `height` are the full-resolution map size. Components whose
/// area is below the island minimum, or whose coastline collapses to fewer
/// than three vertices or zero area, are dropped.
pub fn segment_continents(
    field: &HeightField,
    width: u32,
    height: u32,
    options: &SegmentOptions,
) -> Vec<Landmass> {
    let scale = options.downscale.max(1);
    let grid_w = (width / scale).max(1) as usize;
    let grid_h = (height / scale).max(1) as usize;

    let grid = ElevationGrid::sample(field, grid_w, grid_h);
    segment_grid(&grid, scale, options)
}

/// Segmentation over an already sampled grid
pub fn segment_grid(grid: &ElevationGrid, scale: u32, options: &SegmentOptions) -> Vec<Landmass> {
    let threshold = grid.elevation_threshold(options.land_percent);
    let scale_f = scale.max(1) as f64;
    let unit_area = scale_f * scale_f;

    let components = grid.land_components(threshold);
    let found = components.len();

    let mut landmasses = Vec::new();
    let mut too_small = 0usize;
    let mut degenerate = 0usize;

    for cells in components {
        let area = cells.len() as f64 * unit_area;
        if area < options.min_island_size {
            too_small += 1;
            continue;
        }

        let stats = grid.component_stats(&cells, threshold);
        let terrain = classify_terrain(&stats, threshold);

        let outline = simplify_boundary(&trace_boundary(&cells), SIMPLIFY_TOLERANCE);
        if outline.len() < 3 || geometry::polygon_area(&outline) < EPSILON {
            degenerate += 1;
            continue;
        }

        let sum = cells
            .iter()
            .fold(DVec2::ZERO, |acc, &(x, y)| acc + DVec2::new(x as f64, y as f64));
        let center = (sum / cells.len() as f64).round() * scale_f;

        landmasses.push(Landmass {
            vertices: outline.into_iter().map(|v| v * scale_f).collect(),
            center,
            terrain,
            countries: Vec::new(),
            area,
            stats,
        });
    }

    tracing::debug!(
        threshold,
        found,
        kept = landmasses.len(),
        too_small,
        degenerate,
        "segmented continents"
    );

    landmasses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TerrainKind;

    /// 20x12 sea with a 6x4 block and a 2x1 islet raised above it
    fn test_grid() -> ElevationGrid {
        let (w, h) = (20, 12);
        let mut cells = vec![-500.0; w * h];
        for y in 2..6 {
            for x in 3..9 {
                cells[y * w + x] = 800.0 + (x * 10) as f64;
            }
        }
        cells[9 * w + 15] = 300.0;
        cells[9 * w + 16] = 300.0;
        ElevationGrid::from_cells(w, h, cells).unwrap()
    }

    #[test]
    fn test_from_cells_checks_length() {
        assert!(ElevationGrid::from_cells(3, 3, vec![0.0; 8]).is_none());
        assert!(ElevationGrid::from_cells(3, 3, vec![0.0; 9]).is_some());
    }

    #[test]
    fn test_threshold_percentile() {
        let cells: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let grid = ElevationGrid::from_cells(10, 10, cells).unwrap();

        assert_eq!(grid.elevation_threshold(70.0), 30.0);
        assert_eq!(grid.elevation_threshold(100.0), 0.0);
        // Clamped to the highest sample
        assert_eq!(grid.elevation_threshold(0.0), 99.0);

        let above = (0..100).filter(|&i| i as f64 > grid.elevation_threshold(70.0)).count();
        assert_eq!(above, 69);
    }

    #[test]
    fn test_components_are_disjoint() {
        let grid = test_grid();
        let components = grid.land_components(0.0);
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].len(), 24);
        assert_eq!(components[1].len(), 2);

        let mut all: Vec<(usize, usize)> = components.concat();
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);
    }

    #[test]
    fn test_diagonal_cells_are_separate() {
        let mut cells = vec![0.0; 16];
        cells[0] = 10.0;
        cells[5] = 10.0;
        let grid = ElevationGrid::from_cells(4, 4, cells).unwrap();
        assert_eq!(grid.land_components(5.0).len(), 2);
    }

    #[test]
    fn test_component_stats() {
        let grid = test_grid();
        let components = grid.land_components(0.0);

        let block = grid.component_stats(&components[0], 0.0);
        assert_eq!(block.size, 24);
        // Interior is 4x2 of 6x4
        assert!((block.coastline_ratio - 16.0 / 24.0).abs() < 1e-12);
        assert!((block.avg_elevation - 855.0).abs() < 1e-9);
        assert!(block.std_dev > 0.0);

        let islet = grid.component_stats(&components[1], 0.0);
        assert_eq!(islet.coastline_ratio, 1.0);
        assert_eq!(islet.std_dev, 0.0);
    }

    #[test]
    fn test_grid_edge_counts_as_coast() {
        let grid = ElevationGrid::from_cells(3, 3, vec![10.0; 9]).unwrap();
        let components = grid.land_components(0.0);
        let stats = grid.component_stats(&components[0], 0.0);
        assert!((stats.coastline_ratio - 8.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_min_island_filter() {
        let grid = test_grid();
        let options = SegmentOptions {
            land_percent: 100.0,
            min_island_size: 10.0,
            downscale: 2,
        };
        // Threshold equals the sea floor, so only the raised cells are land
        let landmasses = segment_grid(&grid, 2, &options);

        // The 2-cell islet has area 8 < 10
        assert_eq!(landmasses.len(), 1);
        let land = &landmasses[0];
        assert_eq!(land.area, 96.0);
        assert_eq!(land.stats.size, 24);
        assert!(land.vertices.len() >= 3);
        assert!(land.polygon_area() > 0.0);
        assert!(land.countries.is_empty());
    }

    #[test]
    fn test_coordinates_are_rescaled() {
        let grid = test_grid();
        let options = SegmentOptions {
            land_percent: 100.0,
            min_island_size: 10.0,
            downscale: 2,
        };
        let land = &segment_grid(&grid, 2, &options)[0];

        // Grid block spans x 3..=8, y 2..=5
        assert_eq!(land.center, DVec2::new(12.0, 8.0));
        for v in &land.vertices {
            assert!(v.x >= 6.0 && v.x <= 16.0, "x out of range: {}", v.x);
            assert!(v.y >= 4.0 && v.y <= 10.0, "y out of range: {}", v.y);
        }
    }

    #[test]
    fn test_single_cell_island_is_dropped() {
        let mut cells = vec![-100.0; 25];
        cells[12] = 500.0;
        let grid = ElevationGrid::from_cells(5, 5, cells).unwrap();
        let options = SegmentOptions {
            land_percent: 100.0,
            min_island_size: 0.0,
            downscale: 1,
        };
        assert!(segment_grid(&grid, 1, &options).is_empty());
    }

    #[test]
    fn test_segment_height_field() {
        let field = HeightField::new(7);
        let options = SegmentOptions {
            land_percent: 70.0,
            min_island_size: 10.0,
            downscale: 2,
        };
        let landmasses = segment_continents(&field, 200, 150, &options);
        assert!(!landmasses.is_empty());

        for land in &landmasses {
            assert!(land.area >= 10.0);
            assert!(land.vertices.len() >= 3);
            assert!(land.polygon_area() > 0.0);
            assert!(TerrainKind::ALL.contains(&land.terrain));
            for v in &land.vertices {
                assert!(v.x >= 0.0 && v.x < 200.0);
                assert!(v.y >= 0.0 && v.y < 150.0);
            }
        }

        let again = segment_continents(&field, 200, 150, &options);
        assert_eq!(landmasses, again);
    }
}
