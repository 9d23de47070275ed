//! Landmass subdivision into country polygons

use rand::Rng;

use super::seeds::sample_seeds;
use super::voronoi::{approximate_cells, clip_to_landmass, landmass_sliver, points_inside};
use super::{Degenerate, GeometryResult, PartitionConfig};
use crate::country::Landmass;
use crate::geometry::{self, Bounds, Point, Polygon};

/// Cut a landmass into at most `count` country polygons
///
/// Every returned polygon has at least three vertices and positive area.
/// The partition degrades instead of failing: a cell that clips away falls
/// back to its vertices inside the coastline, then to a sliver of the
/// landmass; if cleanup rejects every cell the whole landmass becomes one
/// country.
pub fn partition_landmass<R: Rng + ?Sized>(
    landmass: &Landmass,
    count: usize,
    config: &PartitionConfig,
    rng: &mut R,
) -> Vec<Polygon> {
    let outline = &landmass.vertices;
    let Some(bounds) = Bounds::of(outline) else {
        return Vec::new();
    };

    let seeds = match sample_seeds(outline, count, config, rng) {
        Ok(seeds) => seeds,
        Err(reason) => {
            tracing::debug!(%reason, "seed sampling failed, keeping the landmass whole");
            return whole_landmass(outline);
        }
    };

    let mut rejected = 0usize;
    let polygons: Vec<Polygon> = approximate_cells(&seeds, bounds, config)
        .into_iter()
        .filter_map(|cell| {
            let result = cell
                .map(|cell| clip_with_fallback(&cell, outline))
                .and_then(|clipped| cleanup(&clipped, config));
            match result {
                Ok(polygon) => Some(polygon),
                Err(reason) => {
                    tracing::trace!(%reason, "dropped cell");
                    rejected += 1;
                    None
                }
            }
        })
        .collect();

    tracing::debug!(
        requested = count,
        seeds = seeds.len(),
        kept = polygons.len(),
        rejected,
        "partitioned landmass"
    );

    if polygons.is_empty() {
        tracing::debug!("every cell was rejected, keeping the landmass whole");
        return whole_landmass(outline);
    }
    polygons
}

/// Clip, then walk the fallback chain until something usable comes back
fn clip_with_fallback(cell: &[Point], landmass: &[Point]) -> Polygon {
    clip_to_landmass(cell, landmass)
        .or_else(|reason| {
            tracing::debug!(%reason, "clip degenerate, using cell vertices inside the coastline");
            points_inside(cell, landmass)
        })
        .or_else(|reason| {
            tracing::debug!(%reason, "no cell vertices inside, using a landmass sliver");
            landmass_sliver(landmass)
        })
        .unwrap_or_default()
}

/// Merge near-duplicate vertices and enforce the minimum area
fn cleanup(polygon: &[Point], config: &PartitionConfig) -> GeometryResult {
    if polygon.is_empty() {
        return Err(Degenerate::EmptyClip);
    }
    let simplified = geometry::simplify_min_spacing(polygon, config.min_spacing);
    if simplified.len() < 3 {
        return Err(Degenerate::TooFewPoints);
    }
    if geometry::polygon_area(&simplified) <= config.min_area {
        return Err(Degenerate::ZeroArea);
    }
    Ok(simplified)
}

fn whole_landmass(outline: &[Point]) -> Vec<Polygon> {
    if outline.len() >= 3 && geometry::polygon_area(outline) > 0.0 {
        vec![outline.to_vec()]
    } else {
        Vec::new()
    }
}
