//! Constrained Lloyd relaxation
//!
//! Each iteration moves every free site to the centroid of its Voronoi cell,
//! with the cell first clipped to the site's own region so no site is ever
//! drawn across a cut line. Motif sites stay where they are.

use log::{debug, warn};
use std::time::Instant;

use crate::geometry::{clip_polygon, dedup_vertices, polygon_area, polygon_centroid, Rect, AREA_EPSILON};

use super::motifs::{push_out_of_zones, ExclusionZone};
use super::regions::Region;
use super::separation::nudge_duplicates;
use super::voronoi::VoronoiProvider;

/// Options for constrained Lloyd relaxation
#[derive(Debug, Clone, Copy)]
pub struct LloydOptions {
    /// Number of iterations to run (a hard count, no early exit)
    pub iterations: usize,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            iterations: crate::config::DEFAULT_RELAX_ITERATIONS,
        }
    }
}

/// Relax the free sites of all regions in place
///
/// The Voronoi diagram is computed over the sites of every region at once,
/// then each free site's cell is clipped to its own region before
/// recentering. Recentered sites are pushed out of exclusion zones and
/// clamped back inside the region; coincident sites are nudged apart after
/// every iteration.
pub fn relax_regions<P: VoronoiProvider>(
    regions: &mut [Region],
    zones: &[ExclusionZone],
    bounds: Rect,
    provider: &P,
    options: LloydOptions,
) {
    let total_start = Instant::now();

    for iteration in 0..options.iterations {
        let iter_start = Instant::now();

        let positions: Vec<_> = regions.iter().flat_map(|r| r.positions()).collect();
        let polygons = provider.cell_polygons(&positions, bounds);

        let mut offset = 0;
        let mut max_displacement: f64 = 0.0;
        for region in regions.iter_mut() {
            let count = region.sites.len();
            let Some(cells) = polygons.get(offset..offset + count) else {
                warn!(
                    "[Lloyd] Provider returned {} cells for {} sites; {:?} left in place",
                    polygons.len(),
                    positions.len(),
                    region.kind
                );
                offset += count;
                continue;
            };
            offset += count;

            let mut moved = Vec::with_capacity(count);
            for (site, cell) in region.sites.iter().zip(cells) {
                if site.anchored {
                    moved.push(site.position);
                    continue;
                }
                let target = cell
                    .as_deref()
                    .and_then(|polygon| clip_polygon(&dedup_vertices(polygon), &region.half_planes))
                    .filter(|clipped| polygon_area(clipped) > AREA_EPSILON)
                    .and_then(|clipped| polygon_centroid(&clipped))
                    .map(|centroid| region.clamp(push_out_of_zones(centroid, zones)))
                    .unwrap_or(site.position);
                max_displacement = max_displacement.max(target.distance(site.position));
                moved.push(target);
            }

            for (site, position) in region.sites.iter_mut().zip(moved) {
                site.position = position;
            }
            nudge_duplicates(region);
        }

        debug!(
            "[Lloyd] Iter {}: {} sites, max_disp={:.4}, took {:?}",
            iteration + 1,
            positions.len(),
            max_displacement,
            iter_start.elapsed()
        );
    }

    debug!(
        "[Lloyd] Finished: {} iterations, total={:?}",
        options.iterations,
        total_start.elapsed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::points::fill_region;
    use crate::generation::regions::{partition, Site};
    use crate::generation::voronoi::DelaunayVoronoi;
    use crate::geometry::{is_inside_all, INSIDE_EPSILON};
    use crate::random::SeededRandom;
    use glam::DVec2;

    fn filled_regions(seed: &str, quota: usize) -> Vec<Region> {
        let mut rng = SeededRandom::from_seed_str(seed);
        let mut regions = partition(1000.0, &mut rng);
        for region in regions.iter_mut() {
            region.quota = quota;
            fill_region(region, &[], &mut rng);
        }
        regions
    }

    #[test]
    fn test_zero_iterations_is_a_no_op() {
        let mut regions = filled_regions("noop", 10);
        let before: Vec<_> = regions.iter().flat_map(|r| r.positions()).collect();
        relax_regions(
            &mut regions,
            &[],
            Rect::square(1000.0),
            &DelaunayVoronoi,
            LloydOptions { iterations: 0 },
        );
        let after: Vec<_> = regions.iter().flat_map(|r| r.positions()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_relaxed_sites_stay_in_region() {
        let mut regions = filled_regions("stay", 15);
        relax_regions(
            &mut regions,
            &[],
            Rect::square(1000.0),
            &DelaunayVoronoi,
            LloydOptions { iterations: 3 },
        );
        for region in &regions {
            assert_eq!(region.sites.len(), 15);
            for site in &region.sites {
                assert!(is_inside_all(site.position, &region.half_planes, INSIDE_EPSILON));
            }
        }
    }

    #[test]
    fn test_anchored_sites_do_not_move() {
        let mut regions = filled_regions("anchor", 12);
        let pinned = regions[1].anchor;
        regions[1].sites[0] = Site {
            position: pinned,
            anchored: true,
            region: regions[1].kind,
        };
        relax_regions(
            &mut regions,
            &[],
            Rect::square(1000.0),
            &DelaunayVoronoi,
            LloydOptions::default(),
        );
        assert_eq!(regions[1].sites[0].position, pinned);
    }

    #[test]
    fn test_relaxation_evens_out_spacing() {
        let mut regions = filled_regions("even", 20);
        let before = closest_pair(&regions[0]);
        relax_regions(
            &mut regions,
            &[],
            Rect::square(1000.0),
            &DelaunayVoronoi,
            LloydOptions { iterations: 5 },
        );
        assert!(closest_pair(&regions[0]) > before);
    }

    /// Loses the last cell of every diagram
    struct ShortProvider;

    impl VoronoiProvider for ShortProvider {
        fn cell_polygons(&self, sites: &[DVec2], bounds: Rect) -> Vec<Option<Vec<DVec2>>> {
            let mut cells = DelaunayVoronoi.cell_polygons(sites, bounds);
            cells.pop();
            cells
        }
    }

    #[test]
    fn test_short_provider_output_leaves_region_in_place() {
        let mut regions = filled_regions("short", 10);
        let before: Vec<Vec<DVec2>> = regions.iter().map(|r| r.positions()).collect();
        relax_regions(
            &mut regions,
            &[],
            Rect::square(1000.0),
            &ShortProvider,
            LloydOptions { iterations: 2 },
        );
        let last = regions.len() - 1;
        assert_eq!(regions[last].positions(), before[last]);
        assert_ne!(regions[0].positions(), before[0]);
    }

    fn closest_pair(region: &Region) -> f64 {
        let mut best = f64::INFINITY;
        for (i, a) in region.sites.iter().enumerate() {
            for b in &region.sites[i + 1..] {
                best = best.min(a.position.distance(b.position));
            }
        }
        best
    }
}
