//! Final cell construction
//!
//! Runs a region-local Voronoi diagram over each region's final sites, clips
//! every cell to its region and labels the result. Every site yields exactly
//! one polygon: anything degenerate becomes a small triangle around the site.

use glam::DVec2;
use log::{debug, warn};
use std::f64::consts::TAU;

use crate::cell::Cell;
use crate::geometry::{
    clip_polygon, dedup_vertices, polygon_area, polygon_centroid, Rect, AREA_EPSILON,
};
use crate::random::SeededRandom;

use super::regions::{Region, RegionKind};
use super::voronoi::VoronoiProvider;

/// Fallback triangle radius relative to the region spacing
pub const FALLBACK_TRIANGLE_FACTOR: f64 = 0.05;

/// Build one unlabelled cell per site, region by region
pub fn build_cells<P: VoronoiProvider>(regions: &[Region], bounds: Rect, provider: &P) -> Vec<Cell> {
    let mut cells = Vec::new();
    for region in regions {
        if region.sites.is_empty() {
            continue;
        }
        let positions = region.positions();
        let polygons = provider.cell_polygons(&positions, bounds);
        let mut fallbacks = 0;
        for (site, polygon) in positions.iter().zip(polygons) {
            let clipped = polygon
                .map(|p| dedup_vertices(&p))
                .filter(|p| p.len() >= 3)
                .and_then(|p| clip_polygon(&p, &region.half_planes))
                .filter(|p| polygon_area(p) > AREA_EPSILON);
            let outline = match clipped {
                Some(outline) => outline,
                None => {
                    fallbacks += 1;
                    fallback_triangle(region, *site)
                }
            };
            cells.push(finish_cell(outline, bounds, region.kind));
        }
        debug!(
            "[Cells] {:?}: {} cells, {} fallbacks",
            region.kind,
            positions.len(),
            fallbacks
        );
    }
    cells
}

/// Force the cell count to `expected`, padding in the middle region
pub fn reconcile_count(cells: &mut Vec<Cell>, expected: usize, regions: &[Region], bounds: Rect) {
    if cells.len() == expected {
        return;
    }
    warn!(
        "[Cells] built {} cells for {} pieces; reconciling",
        cells.len(),
        expected
    );
    cells.truncate(expected);
    let host = regions
        .iter()
        .find(|r| r.kind == RegionKind::Mid)
        .or_else(|| regions.first());
    while cells.len() < expected {
        let Some(region) = host else { break };
        let outline = fallback_triangle(region, region.anchor);
        cells.push(finish_cell(outline, bounds, region.kind));
    }
}

/// Assign a shuffled permutation of `1..=N` in region-then-index order
pub fn assign_labels(cells: &mut [Cell], rng: &mut SeededRandom) {
    let mut labels: Vec<usize> = (1..=cells.len()).collect();
    rng.shuffle(&mut labels);
    for (cell, label) in cells.iter_mut().zip(labels) {
        cell.label = label;
    }
}

/// Tiny triangle around `site`, kept inside the region
fn fallback_triangle(region: &Region, site: DVec2) -> Vec<DVec2> {
    let radius = region.spacing() * FALLBACK_TRIANGLE_FACTOR;
    let center = region.clamp(site);
    (0..3)
        .map(|k| {
            let angle = TAU / 4.0 + k as f64 * TAU / 3.0;
            region.clamp(center + DVec2::from_angle(angle) * radius)
        })
        .collect()
}

fn finish_cell(outline: Vec<DVec2>, bounds: Rect, region: RegionKind) -> Cell {
    let polygon: Vec<DVec2> = outline
        .into_iter()
        .map(|p| p.clamp(bounds.min, bounds.max))
        .collect();
    let centroid = polygon_centroid(&polygon).unwrap_or((bounds.min + bounds.max) * 0.5);
    Cell::new(polygon, centroid, 0, region)
}
