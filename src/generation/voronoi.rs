//! Approximate Voronoi cells and coastline clipping
//!
//! Cells are traced by casting evenly spaced rays from each seed and
//! bisecting along each ray for the farthest point still nearest to that
//! seed. The resulting star-shaped ring is then clipped to the landmass.

use std::f64::consts::TAU;

use glam::DVec2;

use super::{Degenerate, GeometryResult, PartitionConfig};
use crate::geometry::{self, Bounds, Point, Polygon, EPSILON};
use crate::spatial::SeedIndex;

/// Trace one approximate cell per seed
///
/// `bounds` is the landmass bounding box; rays never leave it once padded by
/// `config.search_padding`. The search radius is the diagonal of the padded
/// box, so every ray can reach the far corner. A seed whose rays land fewer
/// than three boundary points yields [`Degenerate::TooFewPoints`].
pub fn approximate_cells(seeds: &[Point], bounds: Bounds, config: &PartitionConfig) -> Vec<GeometryResult> {
    let index = SeedIndex::new(seeds);
    let region = bounds.expand(config.search_padding);
    let radius = region.diagonal();

    (0..seeds.len())
        .map(|i| trace_cell(&index, i, region, radius, config))
        .collect()
}

fn trace_cell(index: &SeedIndex, i: usize, region: Bounds, radius: f64, config: &PartitionConfig) -> GeometryResult {
    let Some(seed) = index.seed(i) else {
        return Err(Degenerate::NoSeeds);
    };

    let mut cell: Polygon = Vec::with_capacity(config.directions);
    for k in 0..config.directions {
        let dir = DVec2::from_angle(TAU * k as f64 / config.directions as f64);

        let (mut lo, mut hi) = (0.0, radius);
        let mut hit = None;
        for _ in 0..config.search_iterations {
            let mid = 0.5 * (lo + hi);
            let sample = seed + dir * mid;
            if region.contains(sample) && index.in_cell(sample, i, config.tolerance) {
                lo = mid;
                hit = Some(sample);
            } else {
                hi = mid;
            }
        }

        if let Some(p) = hit {
            cell.push(p);
        }
    }

    if cell.len() < 3 {
        return Err(Degenerate::TooFewPoints);
    }
    geometry::sort_by_angle(&mut cell, seed);
    Ok(cell)
}

/// Clip a cell to the landmass outline
///
/// A cell already inside the landmass comes back unchanged. A convex landmass
/// clips the cell directly with Sutherland–Hodgman. A concave landmass may cut
/// the cell into several pieces, so the outlines are intersected by walking
/// their crossings and the largest piece is kept.
pub fn clip_to_landmass(cell: &[Point], landmass: &[Point]) -> GeometryResult {
    if cell.len() < 3 || landmass.len() < 3 {
        return Err(Degenerate::TooFewPoints);
    }

    if geometry::polygon_contains(landmass, cell) && !edges_cross(cell, landmass) {
        return Ok(cell.to_vec());
    }

    let clipped = if geometry::is_convex(landmass) {
        sutherland_hodgman(cell, landmass)
    } else {
        intersect_polygons(landmass, cell)
            .into_iter()
            .max_by(|a, b| geometry::polygon_area(a).total_cmp(&geometry::polygon_area(b)))
            .unwrap_or_default()
    };

    if clipped.is_empty() {
        Err(Degenerate::EmptyClip)
    } else if clipped.len() < 3 {
        Err(Degenerate::TooFewPoints)
    } else if geometry::polygon_area(&clipped) < EPSILON {
        Err(Degenerate::ZeroArea)
    } else {
        Ok(clipped)
    }
}

/// Cell vertices that fall inside the landmass, in their original order
///
/// Rejected with [`Degenerate::LeavesLandmass`] when the ring they form cuts
/// across the coastline.
pub(crate) fn points_inside(cell: &[Point], landmass: &[Point]) -> GeometryResult {
    let inside: Polygon = cell
        .iter()
        .copied()
        .filter(|&p| geometry::point_in_polygon(p, landmass))
        .collect();

    if inside.is_empty() {
        Err(Degenerate::EmptyClip)
    } else if inside.len() < 3 {
        Err(Degenerate::TooFewPoints)
    } else if edges_cross(&inside, landmass) {
        Err(Degenerate::LeavesLandmass)
    } else {
        Ok(inside)
    }
}

/// The first ear of the landmass outline; the last resort for a cell that clips away
///
/// An ear is a convex corner whose triangle holds no other outline vertex,
/// so it always lies within the landmass. Every simple polygon has one.
pub(crate) fn landmass_sliver(landmass: &[Point]) -> GeometryResult {
    let n = landmass.len();
    if n < 3 {
        return Err(Degenerate::TooFewPoints);
    }
    let winding = geometry::signed_area(landmass).signum();

    (1..=n)
        .map(|i| [landmass[i - 1], landmass[i % n], landmass[(i + 1) % n]])
        .find(|&[a, b, c]| {
            let convex = winding * (b - a).perp_dot(c - b) > EPSILON;
            convex
                && !landmass
                    .iter()
                    .any(|&p| p != a && p != b && p != c && geometry::point_in_polygon(p, &[a, b, c]))
        })
        .map(|ear| ear.to_vec())
        .ok_or(Degenerate::ZeroArea)
}

fn edges_cross(a: &[Point], b: &[Point]) -> bool {
    let (n, m) = (a.len(), b.len());
    (0..n).any(|i| {
        let (p1, p2) = (a[i], a[(i + 1) % n]);
        (0..m).any(|j| geometry::segments_intersect(p1, p2, b[j], b[(j + 1) % m]))
    })
}

/// A point where a subject edge crosses a window edge
#[derive(Debug, Clone, Copy)]
struct Crossing {
    point: Point,
    subject_edge: usize,
    subject_t: f64,
    window_edge: usize,
    window_t: f64,
    /// Filled in once every crossing is known
    entering: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Vertex(Point),
    Crossing(usize),
}

/// Intersection of two simple polygons, as separate pieces
///
/// Both outlines are walked counter-clockwise: along the subject while it is
/// inside the window, along the window while it is inside the subject,
/// switching at every crossing. Crossings where the outlines merely touch
/// are skipped. Edges that overlap collinearly are not split.
fn intersect_polygons(subject: &[Point], window: &[Point]) -> Vec<Polygon> {
    let subject = counter_clockwise(subject);
    let window = counter_clockwise(window);
    let (n, m) = (subject.len(), window.len());

    let mut crossings = Vec::new();
    for i in 0..n {
        for j in 0..m {
            let found = segment_crossing(subject[i], subject[(i + 1) % n], window[j], window[(j + 1) % m]);
            if let Some((t, u, point)) = found {
                crossings.push(Crossing {
                    point,
                    subject_edge: i,
                    subject_t: t,
                    window_edge: j,
                    window_t: u,
                    entering: None,
                });
            }
        }
    }

    let subject_nodes = ring_nodes(&subject, &crossings, |c| (c.subject_edge, c.subject_t));
    let window_nodes = ring_nodes(&window, &crossings, |c| (c.window_edge, c.window_t));
    let kinds = classify_crossings(&subject_nodes, &crossings, &window);
    for (crossing, entering) in crossings.iter_mut().zip(kinds) {
        crossing.entering = entering;
    }

    if !crossings.iter().any(|c| c.entering.is_some()) {
        return if edge_midpoints(&subject).any(|p| geometry::point_in_polygon(p, &window)) {
            vec![subject]
        } else if edge_midpoints(&window).any(|p| geometry::point_in_polygon(p, &subject)) {
            vec![window]
        } else {
            Vec::new()
        };
    }

    let limit = 2 * crossings.len() + 2;
    let mut visited = vec![false; crossings.len()];
    let mut pieces = Vec::new();

    for start in 0..crossings.len() {
        if visited[start] || crossings[start].entering != Some(true) {
            continue;
        }

        let mut piece: Polygon = Vec::new();
        let mut current = start;
        let mut on_subject = true;
        let mut closed = false;

        for _ in 0..limit {
            visited[current] = true;
            piece.push(crossings[current].point);

            let nodes: &[Node] = if on_subject { &subject_nodes } else { &window_nodes };
            let Some(from) = nodes.iter().position(|&node| node == Node::Crossing(current)) else {
                break;
            };
            // Leave the subject where it exits the window, and the window where the subject re-enters
            let Some(next) = advance(nodes, from, &crossings, !on_subject, &mut piece) else {
                break;
            };
            if next == start {
                closed = true;
                break;
            }
            current = next;
            on_subject = !on_subject;
        }

        if closed {
            dedup_ring(&mut piece);
            if piece.len() >= 3 && geometry::polygon_area(&piece) > EPSILON {
                pieces.push(piece);
            }
        }
    }
    pieces
}

fn counter_clockwise(polygon: &[Point]) -> Polygon {
    let mut ring = polygon.to_vec();
    if geometry::signed_area(&ring) < 0.0 {
        ring.reverse();
    }
    ring
}

/// Parameters along both segments and the point where `p1p2` crosses `q1q2`
///
/// Both parameters are half-open in `[0, 1)` so a crossing through a shared
/// vertex is reported once. Parallel segments never cross.
fn segment_crossing(p1: Point, p2: Point, q1: Point, q2: Point) -> Option<(f64, f64, Point)> {
    let r = p2 - p1;
    let s = q2 - q1;
    let denom = r.perp_dot(s);
    if denom.abs() < EPSILON {
        return None;
    }
    let qp = q1 - p1;
    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;
    ((0.0..1.0).contains(&t) && (0.0..1.0).contains(&u)).then(|| (t, u, p1 + r * t))
}

/// Ring vertices with each crossing spliced into its edge, ordered along the edge
fn ring_nodes(ring: &[Point], crossings: &[Crossing], key: impl Fn(&Crossing) -> (usize, f64)) -> Vec<Node> {
    let mut by_edge: Vec<Vec<(f64, usize)>> = vec![Vec::new(); ring.len()];
    for (id, crossing) in crossings.iter().enumerate() {
        let (edge, t) = key(crossing);
        by_edge[edge].push((t, id));
    }

    let mut nodes = Vec::with_capacity(ring.len() + crossings.len());
    for (i, &vertex) in ring.iter().enumerate() {
        nodes.push(Node::Vertex(vertex));
        let edge = &mut by_edge[i];
        edge.sort_by(|a, b| a.0.total_cmp(&b.0));
        nodes.extend(edge.iter().map(|&(_, id)| Node::Crossing(id)));
    }
    nodes
}

/// Whether the subject enters (`Some(true)`) or leaves (`Some(false)`) the
/// window at each crossing, judged from the subject pieces on either side;
/// `None` where the outlines only touch
fn classify_crossings(subject_nodes: &[Node], crossings: &[Crossing], window: &[Point]) -> Vec<Option<bool>> {
    let len = subject_nodes.len();
    let mut kinds = vec![None; crossings.len()];

    for (k, &node) in subject_nodes.iter().enumerate() {
        let Node::Crossing(id) = node else {
            continue;
        };
        let here = crossings[id].point;

        // Nearest distinct points on either side along the subject
        let before = (1..len)
            .map(|d| node_point(subject_nodes[(k + len - d) % len], crossings))
            .find(|p| p.distance(here) > EPSILON);
        let after = (1..len)
            .map(|d| node_point(subject_nodes[(k + d) % len], crossings))
            .find(|p| p.distance(here) > EPSILON);

        if let (Some(before), Some(after)) = (before, after) {
            let was_inside = geometry::point_in_polygon(here.lerp(before, 0.5), window);
            let now_inside = geometry::point_in_polygon(here.lerp(after, 0.5), window);
            kinds[id] = (was_inside != now_inside).then_some(now_inside);
        }
    }
    kinds
}

fn node_point(node: Node, crossings: &[Crossing]) -> Point {
    match node {
        Node::Vertex(p) => p,
        Node::Crossing(id) => crossings[id].point,
    }
}

/// Walk forward from `from`, collecting vertices, up to the next crossing of the wanted kind
fn advance(nodes: &[Node], from: usize, crossings: &[Crossing], entering: bool, piece: &mut Polygon) -> Option<usize> {
    let len = nodes.len();
    for step in 1..=len {
        match nodes[(from + step) % len] {
            Node::Vertex(p) => piece.push(p),
            Node::Crossing(id) if crossings[id].entering == Some(entering) => return Some(id),
            Node::Crossing(_) => {}
        }
    }
    None
}

fn edge_midpoints(ring: &[Point]) -> impl Iterator<Item = Point> + '_ {
    let n = ring.len();
    (0..n).map(move |i| ring[i].lerp(ring[(i + 1) % n], 0.5))
}

/// Drop consecutive vertices that coincide, including across the wrap
fn dedup_ring(ring: &mut Polygon) {
    ring.dedup_by(|a, b| a.distance(*b) <= EPSILON);
    while ring.len() > 1 && ring[0].distance(ring[ring.len() - 1]) <= EPSILON {
        ring.pop();
    }
}

/// Clip `subject` by the inside half-plane of every edge of the convex `window`
fn sutherland_hodgman(subject: &[Point], window: &[Point]) -> Polygon {
    let mut window = window.to_vec();
    if geometry::signed_area(&window) < 0.0 {
        window.reverse();
    }

    let mut output = subject.to_vec();
    let n = window.len();
    for i in 0..n {
        if output.is_empty() {
            break;
        }
        let a = window[i];
        let b = window[(i + 1) % n];
        let inside = |p: Point| (b - a).perp_dot(p - a) >= 0.0;

        let input = std::mem::take(&mut output);
        let m = input.len();
        for j in 0..m {
            let p1 = input[j];
            let p2 = input[(j + 1) % m];
            match (inside(p1), inside(p2)) {
                (true, true) => output.push(p2),
                (true, false) => {
                    if let Some(x) = geometry::line_segment_intersection(a, b, p1, p2) {
                        output.push(x);
                    }
                }
                (false, true) => {
                    if let Some(x) = geometry::line_segment_intersection(a, b, p1, p2) {
                        output.push(x);
                    }
                    output.push(p2);
                }
                (false, false) => {}
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        vec![
            DVec2::new(x0, y0),
            DVec2::new(x1, y0),
            DVec2::new(x1, y1),
            DVec2::new(x0, y1),
        ]
    }

    fn l_shape() -> Polygon {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(120.0, 0.0),
            DVec2::new(120.0, 40.0),
            DVec2::new(40.0, 40.0),
            DVec2::new(40.0, 120.0),
            DVec2::new(0.0, 120.0),
        ]
    }

    /// Open at the top, with a bay between x = 100 and x = 200
    fn u_shape() -> Polygon {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(300.0, 0.0),
            DVec2::new(300.0, 300.0),
            DVec2::new(200.0, 300.0),
            DVec2::new(200.0, 100.0),
            DVec2::new(100.0, 100.0),
            DVec2::new(100.0, 300.0),
            DVec2::new(0.0, 300.0),
        ]
    }

    fn diamond(center: DVec2, radius: f64) -> Polygon {
        vec![
            center + DVec2::new(radius, 0.0),
            center + DVec2::new(0.0, radius),
            center + DVec2::new(-radius, 0.0),
            center + DVec2::new(0.0, -radius),
        ]
    }

    fn assert_on_land(polygon: &[Point], landmass: &[Point]) {
        for &v in polygon {
            assert!(
                geometry::point_in_polygon(v, landmass) || geometry::distance_to_boundary(v, landmass) < 1e-9,
                "vertex {:?} lies in the sea",
                v
            );
        }
    }

    #[test]
    fn test_two_seed_cells_split_at_bisector() {
        let seeds = vec![DVec2::new(25.0, 50.0), DVec2::new(75.0, 50.0)];
        let bounds = Bounds::of(&rect(0.0, 0.0, 100.0, 100.0)).unwrap();
        let cells = approximate_cells(&seeds, bounds, &PartitionConfig::default());
        assert_eq!(cells.len(), 2);

        let left = cells[0].as_ref().unwrap();
        let right = cells[1].as_ref().unwrap();
        assert_eq!(left.len(), 24);
        for p in left {
            assert!(p.x <= 50.0 + 0.01, "left cell crosses bisector at {}", p.x);
        }
        for p in right {
            assert!(p.x >= 50.0 - 0.01, "right cell crosses bisector at {}", p.x);
        }
    }

    #[test]
    fn test_single_seed_cell_stays_in_padded_region() {
        let seeds = vec![DVec2::new(50.0, 50.0)];
        let bounds = Bounds::of(&rect(0.0, 0.0, 100.0, 100.0)).unwrap();
        let config = PartitionConfig::default();
        let cell = approximate_cells(&seeds, bounds, &config).remove(0).unwrap();

        let region = bounds.expand(config.search_padding);
        for p in &cell {
            assert!(region.contains(*p));
        }
        // Reaches well beyond the landmass itself
        assert!(cell.iter().any(|p| p.x > 100.0));
    }

    #[test]
    fn test_cells_sorted_by_angle() {
        let seeds = vec![DVec2::new(30.0, 30.0), DVec2::new(70.0, 60.0), DVec2::new(20.0, 80.0)];
        let bounds = Bounds::of(&rect(0.0, 0.0, 100.0, 100.0)).unwrap();
        for (seed, cell) in seeds.iter().zip(approximate_cells(&seeds, bounds, &PartitionConfig::default())) {
            let cell = cell.unwrap();
            let angles: Vec<f64> = cell.iter().map(|p| (p.y - seed.y).atan2(p.x - seed.x)).collect();
            assert!(angles.windows(2).all(|w| w[0] <= w[1]));
            assert!(geometry::polygon_area(&cell) > 0.0);
        }
    }

    #[test]
    fn test_clip_inside_is_unchanged() {
        let landmass = rect(0.0, 0.0, 100.0, 100.0);
        let cell = rect(10.0, 10.0, 30.0, 40.0);
        assert_eq!(clip_to_landmass(&cell, &landmass), Ok(cell.clone()));

        // Also for a concave landmass
        let cell = rect(5.0, 5.0, 30.0, 30.0);
        assert_eq!(clip_to_landmass(&cell, &l_shape()), Ok(cell.clone()));
    }

    #[test]
    fn test_clip_convex_landmass() {
        let landmass = rect(0.0, 0.0, 100.0, 100.0);
        let cell = rect(50.0, 50.0, 150.0, 150.0);
        let clipped = clip_to_landmass(&cell, &landmass).unwrap();
        assert!((geometry::polygon_area(&clipped) - 2500.0).abs() < 1e-6);
        for p in &clipped {
            assert!(p.x <= 100.0 + 1e-9 && p.y <= 100.0 + 1e-9);
        }
    }

    #[test]
    fn test_clip_orientation_independent() {
        let mut landmass = rect(0.0, 0.0, 100.0, 100.0);
        landmass.reverse();
        let mut cell = rect(50.0, -20.0, 150.0, 60.0);
        cell.reverse();
        let clipped = clip_to_landmass(&cell, &landmass).unwrap();
        assert!((geometry::polygon_area(&clipped) - 50.0 * 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_clip_concave_landmass() {
        let cell = rect(20.0, 20.0, 60.0, 60.0);
        let clipped = clip_to_landmass(&cell, &l_shape()).unwrap();
        // The notch at x, y >= 40 is removed
        assert!((geometry::polygon_area(&clipped) - 1200.0).abs() < 1e-6);
    }

    #[test]
    fn test_clip_across_bay_keeps_largest_piece() {
        // The cell covers both arms and the bay between them, not the base
        let cell = diamond(DVec2::new(140.0, 250.0), 120.0);
        let landmass = u_shape();
        let clipped = clip_to_landmass(&cell, &landmass).unwrap();

        // Left arm piece: 5950; the right arm piece (3550) is dropped
        assert!((geometry::polygon_area(&clipped) - 5950.0).abs() < 1e-6);
        assert_eq!(clipped.len(), 4);
        assert!(clipped.iter().all(|p| p.x <= 100.0 + 1e-9));
        assert_on_land(&clipped, &landmass);
        assert!(geometry::is_simple(&clipped));
    }

    #[test]
    fn test_intersect_pieces_are_separate() {
        let cell = diamond(DVec2::new(140.0, 250.0), 120.0);
        let mut pieces = intersect_polygons(&u_shape(), &cell);
        pieces.sort_by(|a, b| geometry::polygon_area(a).total_cmp(&geometry::polygon_area(b)));

        assert_eq!(pieces.len(), 2);
        assert!((geometry::polygon_area(&pieces[0]) - 3550.0).abs() < 1e-6);
        assert!((geometry::polygon_area(&pieces[1]) - 5950.0).abs() < 1e-6);
        for piece in &pieces {
            assert!(geometry::is_simple(piece));
            assert!(geometry::signed_area(piece) > 0.0);
            assert_on_land(piece, &u_shape());
        }
    }

    #[test]
    fn test_clip_around_bay_keeps_notch() {
        // Reaches around the bay through the base: one piece with a notch
        let cell = diamond(DVec2::new(150.0, 190.0), 150.0);
        let landmass = u_shape();
        let clipped = clip_to_landmass(&cell, &landmass).unwrap();

        assert!(geometry::is_simple(&clipped));
        assert_on_land(&clipped, &landmass);
        let bay = DVec2::new(150.0, 200.0);
        assert!(!geometry::point_in_polygon(bay, &clipped));
        assert!(geometry::polygon_area(&clipped) < geometry::polygon_area(&cell));
    }

    #[test]
    fn test_intersect_without_crossings() {
        let outer = rect(0.0, 0.0, 100.0, 100.0);
        let inner = rect(10.0, 10.0, 20.0, 20.0);
        assert_eq!(intersect_polygons(&inner, &outer), vec![inner.clone()]);
        assert_eq!(intersect_polygons(&outer, &inner), vec![inner.clone()]);
        assert!(intersect_polygons(&inner, &rect(50.0, 50.0, 60.0, 60.0)).is_empty());
    }

    #[test]
    fn test_clip_disjoint_is_empty() {
        let landmass = rect(0.0, 0.0, 100.0, 100.0);
        let cell = rect(200.0, 200.0, 250.0, 250.0);
        assert_eq!(clip_to_landmass(&cell, &landmass), Err(Degenerate::EmptyClip));
        assert_eq!(clip_to_landmass(&cell[..2], &landmass), Err(Degenerate::TooFewPoints));
    }

    #[test]
    fn test_fallback_helpers() {
        let landmass = rect(0.0, 0.0, 100.0, 100.0);
        let cell = vec![
            DVec2::new(10.0, 10.0),
            DVec2::new(150.0, 10.0),
            DVec2::new(90.0, 20.0),
            DVec2::new(80.0, 90.0),
        ];
        assert_eq!(
            points_inside(&cell, &landmass),
            Ok(vec![cell[0], cell[2], cell[3]])
        );
        assert_eq!(
            points_inside(&rect(200.0, 200.0, 210.0, 210.0), &landmass),
            Err(Degenerate::EmptyClip)
        );
        assert_eq!(landmass_sliver(&landmass).unwrap().len(), 3);
    }

    #[test]
    fn test_points_inside_rejects_ring_across_notch() {
        // Every vertex is on land but the first edge cuts through the notch
        let cell = vec![DVec2::new(10.0, 100.0), DVec2::new(100.0, 10.0), DVec2::new(20.0, 20.0)];
        assert_eq!(points_inside(&cell, &l_shape()), Err(Degenerate::LeavesLandmass));
    }

    #[test]
    fn test_sliver_skips_reflex_corner() {
        // Starts at the notch corner; its first three vertices enclose sea
        let landmass = vec![
            DVec2::new(120.0, 40.0),
            DVec2::new(40.0, 40.0),
            DVec2::new(40.0, 120.0),
            DVec2::new(0.0, 120.0),
            DVec2::new(0.0, 0.0),
            DVec2::new(120.0, 0.0),
        ];
        let sliver = landmass_sliver(&landmass).unwrap();
        assert_eq!(sliver, vec![landmass[1], landmass[2], landmass[3]]);

        let centroid = geometry::polygon_centroid(&sliver).unwrap();
        assert!(geometry::point_in_polygon(centroid, &landmass));
    }
}
