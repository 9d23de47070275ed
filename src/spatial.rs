//! Nearest-seed lookups for Voronoi cell approximation
//!
//! With the `spatial-index` feature, seed sets large enough to benefit are
//! stored in a KD-tree. Small sets, and builds without the feature, fall back
//! to a linear scan which gives identical answers.

#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

use crate::geometry::Point;

/// Seed count below which a linear scan beats building a tree
#[cfg(feature = "spatial-index")]
const TREE_THRESHOLD: usize = 32;

/// Nearest-neighbour index over a fixed set of seed points
///
/// # Performance
///
/// - Construction: O(n log n) with the tree, O(n) otherwise
/// - Query: O(log n) with the tree, O(n) otherwise
#[derive(Clone)]
pub struct SeedIndex {
    seeds: Vec<Point>,
    #[cfg(feature = "spatial-index")]
    tree: Option<ImmutableKdTree<f64, usize, 2, 32>>,
}

impl std::fmt::Debug for SeedIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedIndex")
            .field("seeds", &self.seeds.len())
            .field("tree", &self.uses_tree())
            .finish()
    }
}

impl SeedIndex {
    /// Build an index over `seeds`; indices returned by queries refer to this slice
    pub fn new(seeds: &[Point]) -> Self {
        #[cfg(feature = "spatial-index")]
        let tree = (seeds.len() >= TREE_THRESHOLD).then(|| {
            let points: Vec<[f64; 2]> = seeds.iter().map(|s| [s.x, s.y]).collect();
            ImmutableKdTree::new_from_slice(&points)
        });

        Self {
            seeds: seeds.to_vec(),
            #[cfg(feature = "spatial-index")]
            tree,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    #[inline]
    pub fn seed(&self, index: usize) -> Option<Point> {
        self.seeds.get(index).copied()
    }

    /// Whether queries go through the KD-tree
    pub fn uses_tree(&self) -> bool {
        #[cfg(feature = "spatial-index")]
        {
            self.tree.is_some()
        }
        #[cfg(not(feature = "spatial-index"))]
        {
            false
        }
    }

    /// Index of and distance to the seed closest to `point`
    ///
    /// Ties go to the lowest index on the linear path.
    pub fn nearest(&self, point: Point) -> Option<(usize, f64)> {
        #[cfg(feature = "spatial-index")]
        {
            if let Some(tree) = &self.tree {
                let result = tree.nearest_one::<SquaredEuclidean>(&[point.x, point.y]);
                return Some((result.item as usize, result.distance.sqrt()));
            }
        }

        self.seeds
            .iter()
            .enumerate()
            .map(|(i, s)| (i, s.distance_squared(point)))
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((i, d)),
            })
            .map(|(i, d)| (i, d.sqrt()))
    }

    /// Distance from `point` to the closest seed
    pub fn nearest_distance(&self, point: Point) -> Option<f64> {
        self.nearest(point).map(|(_, d)| d)
    }

    /// Check if `point` lies in the Voronoi cell of seed `index`
    ///
    /// The point belongs to the cell when no other seed is closer by more than
    /// `tolerance`, so points on a bisector count for both sides.
    pub fn in_cell(&self, point: Point, index: usize, tolerance: f64) -> bool {
        let Some(seed) = self.seed(index) else {
            return false;
        };
        let own = seed.distance(point);
        match self.nearest_distance(point) {
            Some(nearest) => nearest >= own - tolerance,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[test]
    fn test_nearest_basic() {
        let seeds = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(0.0, 10.0),
            DVec2::new(10.0, 10.0),
        ];
        let index = SeedIndex::new(&seeds);
        assert!(!index.uses_tree());

        assert_eq!(index.nearest(DVec2::new(1.0, 1.0)).map(|r| r.0), Some(0));
        assert_eq!(index.nearest(DVec2::new(9.0, 2.0)).map(|r| r.0), Some(1));
        assert_eq!(index.nearest(DVec2::new(2.0, 8.0)).map(|r| r.0), Some(2));
        assert_eq!(index.nearest(DVec2::new(7.0, 7.0)).map(|r| r.0), Some(3));
        assert_eq!(index.nearest_distance(DVec2::new(3.0, 4.0)), Some(5.0));
    }

    #[test]
    fn test_empty_index() {
        let index = SeedIndex::new(&[]);
        assert!(index.is_empty());
        assert_eq!(index.nearest(DVec2::ZERO), None);
        assert!(!index.in_cell(DVec2::ZERO, 0, 0.001));
    }

    #[test]
    fn test_in_cell_with_tolerance() {
        let seeds = vec![DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)];
        let index = SeedIndex::new(&seeds);

        assert!(index.in_cell(DVec2::new(2.0, 3.0), 0, 0.001));
        assert!(!index.in_cell(DVec2::new(2.0, 3.0), 1, 0.001));
        // The bisector belongs to both cells
        assert!(index.in_cell(DVec2::new(5.0, 4.0), 0, 0.001));
        assert!(index.in_cell(DVec2::new(5.0, 4.0), 1, 0.001));
    }

    #[test]
    fn test_tree_matches_linear_scan() {
        let mut seeds = Vec::new();
        for i in 0..20 {
            for j in 0..5 {
                seeds.push(DVec2::new(i as f64 * 13.7 + j as f64 * 0.9, j as f64 * 21.3 + (i % 3) as f64));
            }
        }
        let index = SeedIndex::new(&seeds);
        #[cfg(feature = "spatial-index")]
        assert!(index.uses_tree());

        for k in 0..50 {
            let q = DVec2::new(k as f64 * 5.3, (k * 7 % 100) as f64);
            let expected = seeds
                .iter()
                .map(|s| s.distance(q))
                .fold(f64::INFINITY, f64::min);
            let found = index.nearest_distance(q).unwrap();
            assert!((found - expected).abs() < 1e-9);
        }
    }
}
