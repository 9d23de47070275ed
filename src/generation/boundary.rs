//! Coastline extraction for a flood-filled cell region
//!
//! The outline is traced over the region's own cells with a left-hand wall
//! follower, then thinned by dropping nearly collinear points.

use std::collections::HashSet;

use glam::DVec2;

use crate::geometry::{Point, Polygon};

/// Up, right, down, left: clockwise on a y-down grid
const DIRECTIONS: [(i64, i64); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Triangle area under which a boundary point is considered redundant
pub const SIMPLIFY_TOLERANCE: f64 = 1.0;

/// Occupancy mask with a one-cell empty border around the region
struct RegionMask {
    min_x: i64,
    min_y: i64,
    width: i64,
    height: i64,
    cells: Vec<bool>,
}

impl RegionMask {
    fn new(cells: &[(usize, usize)]) -> Option<Self> {
        let min_x = cells.iter().map(|c| c.0).min()? as i64;
        let max_x = cells.iter().map(|c| c.0).max()? as i64;
        let min_y = cells.iter().map(|c| c.1).min()? as i64;
        let max_y = cells.iter().map(|c| c.1).max()? as i64;

        let width = max_x - min_x + 3;
        let height = max_y - min_y + 3;
        let mut mask = vec![false; (width * height) as usize];
        for &(x, y) in cells {
            let gx = x as i64 - min_x + 1;
            let gy = y as i64 - min_y + 1;
            mask[(gy * width + gx) as usize] = true;
        }

        Some(Self {
            min_x,
            min_y,
            width,
            height,
            cells: mask,
        })
    }

    fn is_land(&self, (x, y): (i64, i64)) -> bool {
        let gx = x - self.min_x + 1;
        let gy = y - self.min_y + 1;
        gx >= 0
            && gy >= 0
            && gx < self.width
            && gy < self.height
            && self.cells[(gy * self.width + gx) as usize]
    }

    /// Topmost, then leftmost, region cell
    fn start_cell(&self) -> Option<(i64, i64)> {
        (0..self.height).find_map(|gy| {
            (0..self.width)
                .find(|&gx| self.cells[(gy * self.width + gx) as usize])
                .map(|gx| (gx + self.min_x - 1, gy + self.min_y - 1))
        })
    }
}

#[inline]
fn step((x, y): (i64, i64), dir: usize) -> (i64, i64) {
    (x + DIRECTIONS[dir].0, y + DIRECTIONS[dir].1)
}

/// Trace the outer boundary of a 4-connected cell region, in grid coordinates
///
/// The walk starts at the topmost-leftmost cell and tries a left turn first,
/// then straight, right and back. A directed edge is never walked twice: when
/// the preferred edge has already been used the walk closes if it is back at
/// the start, otherwise it takes the next unused edge. If nothing is left, or
/// the step budget runs out, the points collected so far are returned.
pub fn trace_boundary(cells: &[(usize, usize)]) -> Vec<Point> {
    let Some(mask) = RegionMask::new(cells) else {
        return Vec::new();
    };
    let Some(start) = mask.start_cell() else {
        return Vec::new();
    };

    let limit = 4 * cells.len() + 4;
    let mut boundary = Vec::new();
    let mut visited_edges: HashSet<((i64, i64), (i64, i64))> = HashSet::new();
    let mut current = start;
    let mut heading = 0usize;

    loop {
        boundary.push(current);
        if boundary.len() > limit {
            tracing::debug!(cells = cells.len(), "boundary walk hit its step budget, truncating");
            break;
        }

        let mut candidates = (0..4)
            .map(|i| (heading + 3 + i) % 4)
            .filter(|&dir| mask.is_land(step(current, dir)));

        let Some(preferred) = candidates.next() else {
            // Single isolated cell
            break;
        };

        let chosen = if !visited_edges.contains(&(current, step(current, preferred))) {
            Some(preferred)
        } else if current == start {
            None
        } else {
            candidates.find(|&dir| !visited_edges.contains(&(current, step(current, dir))))
        };

        let Some(dir) = chosen else {
            break;
        };

        let next = step(current, dir);
        visited_edges.insert((current, next));
        current = next;
        heading = dir;
    }

    if boundary.len() > 1 && boundary.first() == boundary.last() {
        boundary.pop();
    }

    boundary
        .into_iter()
        .map(|(x, y)| DVec2::new(x as f64, y as f64))
        .collect()
}

/// Drop points whose triangle with the last kept point and the next point is
/// at most `tolerance` in area
///
/// The first and last points are always kept.
pub fn simplify_boundary(boundary: &[Point], tolerance: f64) -> Polygon {
    if boundary.len() < 4 {
        return boundary.to_vec();
    }

    let mut simplified = vec![boundary[0]];
    for i in 1..boundary.len() - 1 {
        let prev = simplified[simplified.len() - 1];
        let current = boundary[i];
        let next = boundary[i + 1];

        let area = ((current - prev).perp_dot(next - prev) / 2.0).abs();
        if area > tolerance {
            simplified.push(current);
        }
    }
    simplified.push(boundary[boundary.len() - 1]);
    simplified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polygon_area;

    fn rect(x0: usize, y0: usize, w: usize, h: usize) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                cells.push((x, y));
            }
        }
        cells
    }

    #[test]
    fn test_rectangle_boundary() {
        let boundary = trace_boundary(&rect(2, 3, 4, 3));
        // Perimeter cells of a 4x3 block
        assert_eq!(boundary.len(), 10);
        assert_eq!(boundary[0], DVec2::new(2.0, 3.0));
        assert_eq!(boundary[1], DVec2::new(3.0, 3.0));
        let unique: HashSet<(i64, i64)> = boundary.iter().map(|p| (p.x as i64, p.y as i64)).collect();
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn test_boundary_winding_is_positive() {
        let boundary = trace_boundary(&rect(0, 0, 5, 5));
        assert!(crate::geometry::signed_area(&boundary) > 0.0);
    }

    #[test]
    fn test_single_cell() {
        let boundary = trace_boundary(&[(4, 4)]);
        assert_eq!(boundary, vec![DVec2::new(4.0, 4.0)]);
    }

    #[test]
    fn test_empty_region() {
        assert!(trace_boundary(&[]).is_empty());
    }

    #[test]
    fn test_pinched_region_traces_both_lobes() {
        // Two 3x3 blocks joined only through the start cell's corner neighbours
        //   S R R R
        //   D . R R
        //   D D . .
        let cells = vec![
            (0, 0), (1, 0), (2, 0), (3, 0),
            (0, 1), (2, 1), (3, 1),
            (0, 2), (1, 2),
        ];
        let boundary = trace_boundary(&cells);
        let visited: HashSet<(i64, i64)> = boundary.iter().map(|p| (p.x as i64, p.y as i64)).collect();
        for (x, y) in cells {
            assert!(visited.contains(&(x as i64, y as i64)), "cell ({}, {}) missing", x, y);
        }
    }

    #[test]
    fn test_simplify_keeps_corners() {
        let boundary = trace_boundary(&rect(0, 0, 10, 10));
        let simplified = simplify_boundary(&boundary, SIMPLIFY_TOLERANCE);
        assert!(simplified.len() < boundary.len());
        assert!(simplified.len() >= 4);
        assert!((polygon_area(&simplified) - 81.0).abs() < 1e-9);
    }

    #[test]
    fn test_simplify_short_input_unchanged() {
        let tri = vec![DVec2::ZERO, DVec2::new(1.0, 0.0), DVec2::new(0.0, 1.0)];
        assert_eq!(simplify_boundary(&tri, 1.0), tri);
    }
}
