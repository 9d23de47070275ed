//! Seed point placement inside a landmass
//!
//! Seeds are spread with Poisson-disc style dart throwing: grow outward from
//! one point near the middle, accepting candidates in an annulus around an
//! active seed when they are inside the coastline and far enough from every
//! seed so far. When the active list runs dry before the target is reached,
//! uniform rejection sampling over the bounding box tops it up.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;

use super::{Degenerate, PartitionConfig};
use crate::geometry::{self, Bounds, Point};

/// Tries for the first seed around the bounding-box centre
const FIRST_POINT_ATTEMPTS: usize = 20;

/// Rejection sampling draws per missing seed, per spacing level
const FALLBACK_ATTEMPTS_PER_SEED: usize = 30;

/// Upper bound on draws per spacing level
const FALLBACK_ATTEMPT_CAP: usize = 10_000;

/// How many times the fallback spacing is halved before giving up
const FALLBACK_HALVINGS: usize = 6;

/// Place up to `count` seeds inside `landmass`
///
/// The nominal spacing is `max(1, 0.8 * sqrt(area / count))`. Fewer seeds
/// than requested may come back when the polygon cannot hold them; none at
/// all is reported as [`Degenerate::NoSeeds`].
pub fn sample_seeds<R: Rng + ?Sized>(
    landmass: &[Point],
    count: usize,
    config: &PartitionConfig,
    rng: &mut R,
) -> Result<Vec<Point>, Degenerate> {
    if count == 0 || landmass.len() < 3 {
        return Err(Degenerate::NoSeeds);
    }
    let Some(bounds) = Bounds::of(landmass) else {
        return Err(Degenerate::NoSeeds);
    };

    let area = geometry::polygon_area(landmass);
    let cell_size = (0.8 * (area / count as f64).sqrt()).max(1.0);

    let mut seeds: Vec<Point> = Vec::with_capacity(count);

    match first_seed(landmass, bounds.center(), cell_size, rng) {
        Some(first) => {
            seeds.push(first);
            grow_poisson(landmass, &mut seeds, count, cell_size, config, rng);
        }
        None => {
            tracing::debug!(cell_size, "no first seed near the landmass centre");
        }
    }

    if seeds.len() < count {
        let before = seeds.len();
        fill_by_rejection(landmass, bounds, &mut seeds, count, 0.5 * cell_size, rng);
        tracing::debug!(
            requested = count,
            poisson = before,
            total = seeds.len(),
            "topped up seeds by rejection sampling"
        );
    }

    if seeds.is_empty() {
        Err(Degenerate::NoSeeds)
    } else {
        Ok(seeds)
    }
}

fn first_seed<R: Rng + ?Sized>(
    landmass: &[Point],
    center: Point,
    radius: f64,
    rng: &mut R,
) -> Option<Point> {
    (0..FIRST_POINT_ATTEMPTS).find_map(|_| {
        let angle = rng.gen_range(0.0..TAU);
        let distance = rng.gen_range(0.0..radius);
        let candidate = center + DVec2::from_angle(angle) * distance;
        geometry::point_in_polygon(candidate, landmass).then_some(candidate)
    })
}

fn grow_poisson<R: Rng + ?Sized>(
    landmass: &[Point],
    seeds: &mut Vec<Point>,
    count: usize,
    cell_size: f64,
    config: &PartitionConfig,
    rng: &mut R,
) {
    let min_distance = 0.8 * cell_size;
    let mut active = seeds.clone();

    while !active.is_empty() && seeds.len() < count {
        let index = rng.gen_range(0..active.len());
        let origin = active[index];

        let accepted = (0..config.candidate_attempts).find_map(|_| {
            let angle = rng.gen_range(0.0..TAU);
            let distance = cell_size + rng.gen_range(0.0..cell_size);
            let candidate = origin + DVec2::from_angle(angle) * distance;

            (geometry::point_in_polygon(candidate, landmass) && far_enough(candidate, seeds, min_distance))
                .then_some(candidate)
        });

        match accepted {
            Some(candidate) => {
                seeds.push(candidate);
                active.push(candidate);
            }
            None => {
                active.swap_remove(index);
            }
        }
    }
}

fn fill_by_rejection<R: Rng + ?Sized>(
    landmass: &[Point],
    bounds: Bounds,
    seeds: &mut Vec<Point>,
    count: usize,
    min_distance: f64,
    rng: &mut R,
) {
    let mut spacing = min_distance;

    for _ in 0..=FALLBACK_HALVINGS {
        let budget = (FALLBACK_ATTEMPTS_PER_SEED * (count - seeds.len())).min(FALLBACK_ATTEMPT_CAP);
        for _ in 0..budget {
            let candidate = DVec2::new(
                rng.gen_range(bounds.min.x..=bounds.max.x),
                rng.gen_range(bounds.min.y..=bounds.max.y),
            );
            if geometry::point_in_polygon(candidate, landmass) && far_enough(candidate, seeds, spacing) {
                seeds.push(candidate);
                if seeds.len() >= count {
                    return;
                }
            }
        }
        spacing *= 0.5;
    }
}

#[inline]
fn far_enough(candidate: Point, seeds: &[Point], min_distance: f64) -> bool {
    seeds.iter().all(|s| s.distance(candidate) >= min_distance)
}
