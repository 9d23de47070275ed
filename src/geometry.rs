//! Planar polygon utilities
//!
//! Stateless helpers shared by the continent segmenter and the country
//! partitioner. Polygons are implicitly closed vertex lists with no guaranteed
//! orientation; anything that depends on winding computes the signed area.

use glam::DVec2;

/// A 2D map coordinate
pub type Point = DVec2;

/// An implicitly closed ring of points
pub type Polygon = Vec<Point>;

/// Tolerance for orientation and degeneracy tests
pub const EPSILON: f64 = 1e-9;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    /// Minimum corner
    pub min: Point,
    /// Maximum corner
    pub max: Point,
}

impl Bounds {
    /// Bounding box of a point set, `None` when empty
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Point {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.min.distance(self.max)
    }

    /// Grow the box by `padding` on every side
    pub fn expand(&self, padding: f64) -> Self {
        Self {
            min: self.min - DVec2::splat(padding),
            max: self.max + DVec2::splat(padding),
        }
    }

    /// Inclusive containment test
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Inclusive overlap test
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }
}

/// Bounding box of a polygon
pub fn bounding_box(polygon: &[Point]) -> Option<Bounds> {
    Bounds::of(polygon)
}

/// Shoelace signed area
///
/// Positive when the ring turns counter-clockwise in a y-up frame (clockwise
/// on a y-down screen).
pub fn signed_area(polygon: &[Point]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        twice += a.perp_dot(b);
    }
    twice * 0.5
}

/// Unsigned polygon area
#[inline]
pub fn polygon_area(polygon: &[Point]) -> f64 {
    signed_area(polygon).abs()
}

/// Area-weighted centroid
///
/// Returns `None` for rings whose area vanishes, where the formula divides by zero.
pub fn polygon_centroid(polygon: &[Point]) -> Option<Point> {
    let n = polygon.len();
    if n < 3 {
        return None;
    }

    let mut twice_area = 0.0;
    let mut acc = DVec2::ZERO;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let cross = a.perp_dot(b);
        twice_area += cross;
        acc += (a + b) * cross;
    }

    if twice_area.abs() < EPSILON {
        return None;
    }
    Some(acc / (3.0 * twice_area))
}

/// Mean of the vertices; used where the area centroid is undefined
pub fn vertex_average(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    Some(points.iter().copied().sum::<DVec2>() / points.len() as f64)
}

/// Ray-casting point-in-polygon test
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Separating-axis overlap test
///
/// Exact for convex polygons; for concave input it answers for the convex hulls.
pub fn polygons_intersect(a: &[Point], b: &[Point]) -> bool {
    let (Some(ba), Some(bb)) = (Bounds::of(a), Bounds::of(b)) else {
        return false;
    };
    if !ba.intersects(&bb) {
        return false;
    }
    !has_separating_axis(a, b) && !has_separating_axis(b, a)
}

fn has_separating_axis(a: &[Point], b: &[Point]) -> bool {
    let n = a.len();
    for i in 0..n {
        let edge = a[(i + 1) % n] - a[i];
        let normal = DVec2::new(edge.y, -edge.x);
        let (min_a, max_a) = project(a, normal);
        let (min_b, max_b) = project(b, normal);
        if max_a < min_b || max_b < min_a {
            return true;
        }
    }
    false
}

fn project(points: &[Point], axis: DVec2) -> (f64, f64) {
    points.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| {
        let d = axis.dot(*p);
        (lo.min(d), hi.max(d))
    })
}

/// True when every vertex of `target` lies inside `container`
pub fn polygon_contains(container: &[Point], target: &[Point]) -> bool {
    !target.is_empty() && target.iter().all(|&v| point_in_polygon(v, container))
}

/// Component-wise point equality within `tolerance`
#[inline]
pub fn points_equal(a: Point, b: Point, tolerance: f64) -> bool {
    (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
}

/// True when the polygons share an edge, in either direction, within `tolerance`
pub fn polygons_adjacent(a: &[Point], b: &[Point], tolerance: f64) -> bool {
    let (n, m) = (a.len(), b.len());
    for i in 0..n {
        let (p1, p2) = (a[i], a[(i + 1) % n]);
        for j in 0..m {
            let (q1, q2) = (b[j], b[(j + 1) % m]);
            let same = points_equal(p1, q1, tolerance) && points_equal(p2, q2, tolerance);
            let reversed = points_equal(p1, q2, tolerance) && points_equal(p2, q1, tolerance);
            if same || reversed {
                return true;
            }
        }
    }
    false
}

/// Turn direction of the triple `(p, q, r)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

/// Classify the turn `p -> q -> r` with an explicit collinearity tolerance
pub fn orientation(p: Point, q: Point, r: Point) -> Orientation {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if val.abs() <= EPSILON {
        Orientation::Collinear
    } else if val > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// `r` lies within the bounding box of segment `pq` (assumes collinearity)
fn on_segment(p: Point, r: Point, q: Point) -> bool {
    r.x <= p.x.max(q.x) + EPSILON
        && r.x >= p.x.min(q.x) - EPSILON
        && r.y <= p.y.max(q.y) + EPSILON
        && r.y >= p.y.min(q.y) - EPSILON
}

/// Closed segment intersection test, including collinear overlaps
pub fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let o1 = orientation(p1, p2, q1);
    let o2 = orientation(p1, p2, q2);
    let o3 = orientation(q1, q2, p1);
    let o4 = orientation(q1, q2, p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && on_segment(p1, q1, p2))
        || (o2 == Orientation::Collinear && on_segment(p1, q2, p2))
        || (o3 == Orientation::Collinear && on_segment(q1, p1, q2))
        || (o4 == Orientation::Collinear && on_segment(q1, p2, q2))
}

/// Distance from `point` to the closed segment `ab`
pub fn point_segment_distance(point: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Minimum distance between two closed segments
pub fn segment_distance(p1: Point, p2: Point, q1: Point, q2: Point) -> f64 {
    if segments_intersect(p1, p2, q1, q2) {
        return 0.0;
    }
    point_segment_distance(p1, q1, q2)
        .min(point_segment_distance(p2, q1, q2))
        .min(point_segment_distance(q1, p1, p2))
        .min(point_segment_distance(q2, p1, p2))
}

/// Minimum boundary distance between two polygons, zero once any edges cross
pub fn min_polygon_distance(a: &[Point], b: &[Point]) -> f64 {
    let (n, m) = (a.len(), b.len());
    if n == 0 || m == 0 {
        return f64::INFINITY;
    }

    let mut best = f64::INFINITY;
    for i in 0..n {
        let (p1, p2) = (a[i], a[(i + 1) % n]);
        for j in 0..m {
            let d = segment_distance(p1, p2, b[j], b[(j + 1) % m]);
            if d <= EPSILON {
                return 0.0;
            }
            best = best.min(d);
        }
    }
    best
}

/// Distance from `point` to the nearest edge of `polygon`
pub fn distance_to_boundary(point: Point, polygon: &[Point]) -> f64 {
    let n = polygon.len();
    (0..n)
        .map(|i| point_segment_distance(point, polygon[i], polygon[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min)
}

/// True when no two edges of the ring cross or touch, apart from shared
/// corners of consecutive edges, and no edge doubles back on the previous one
pub fn is_simple(polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        let (a, b, c) = (polygon[i], polygon[(i + 1) % n], polygon[(i + 2) % n]);
        if (b - a).perp_dot(c - b).abs() <= EPSILON && (b - a).dot(c - b) < 0.0 {
            return false;
        }
        for j in i + 2..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_intersect(a, b, polygon[j], polygon[(j + 1) % n]) {
                return false;
            }
        }
    }
    true
}

/// Convexity test tolerant of collinear runs
pub fn is_convex(polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0f64;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let c = polygon[(i + 2) % n];
        let cross = (b - a).perp_dot(c - b);
        if cross.abs() <= EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    sign != 0.0
}

/// Order points by polar angle around `center`
pub fn sort_by_angle(points: &mut [Point], center: Point) {
    points.sort_by(|a, b| {
        let angle_a = (a.y - center.y).atan2(a.x - center.x);
        let angle_b = (b.y - center.y).atan2(b.x - center.x);
        angle_a
            .partial_cmp(&angle_b)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Intersection of the infinite line through `a, b` with segment `c, d`
pub fn line_segment_intersection(a: Point, b: Point, c: Point, d: Point) -> Option<Point> {
    let r = b - a;
    let s = d - c;
    let denom = r.perp_dot(s);
    if denom.abs() < EPSILON {
        return None;
    }
    let u = (c - a).perp_dot(r) / denom;
    Some(c + s * u.clamp(0.0, 1.0))
}

/// Drop consecutive points closer than `min_distance`
///
/// Returns the input unchanged when simplification would leave fewer than three points.
pub fn simplify_min_spacing(polygon: &[Point], min_distance: f64) -> Polygon {
    let Some(&first) = polygon.first() else {
        return Vec::new();
    };

    let mut simplified = vec![first];
    for &p in &polygon[1..] {
        if let Some(&last) = simplified.last() {
            if last.distance(p) >= min_distance {
                simplified.push(p);
            }
        }
    }

    if simplified.len() > 1 && simplified[0].distance(simplified[simplified.len() - 1]) < min_distance {
        simplified.pop();
    }

    if simplified.len() >= 3 {
        simplified
    } else {
        polygon.to_vec()
    }
}
