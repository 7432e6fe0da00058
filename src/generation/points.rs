//! Free point placement
//!
//! Fills each region's remaining quota after motifs. A small share of macro
//! points spreads uniformly to anchor large open cells; the rest are micro
//! points pulled toward a few well-separated cluster centers, which gives the
//! board its mix of tiny crowded cells and big sparse ones.

use glam::DVec2;

use crate::config::{MACRO_FRACTION, MICRO_SKEW_EXPONENT};
use crate::random::SeededRandom;

use super::motifs::{push_out_of_zones, ExclusionZone};
use super::regions::{Region, Site};

/// Roughly how many micro points share one cluster
pub const MICRO_POINTS_PER_CLUSTER: usize = 6;

/// Upper bound on clusters per region
pub const MAX_CLUSTERS: usize = 6;

/// Candidate pool size per cluster for maximin center selection
pub const CLUSTER_CANDIDATES_PER_CENTER: usize = 8;

/// Split free points into (macro, micro) counts
pub fn split_free_points(free: usize) -> (usize, usize) {
    let macro_count = ((free as f64 * MACRO_FRACTION).round() as usize).min(free);
    (macro_count, free - macro_count)
}

/// Place free sites until the region holds `quota` sites
///
/// No draw is ever retried: points landing in an exclusion zone are projected
/// out radially and clamped back into the region.
pub fn fill_region(region: &mut Region, zones: &[ExclusionZone], rng: &mut SeededRandom) {
    let free = region.quota.saturating_sub(region.sites.len());
    let (macro_count, micro_count) = split_free_points(free);

    for _ in 0..macro_count {
        let point = place_outside_zones(region, region.sample(rng), zones);
        region.sites.push(free_site(region, point));
    }

    if micro_count == 0 {
        return;
    }

    let cluster_count = micro_count
        .div_ceil(MICRO_POINTS_PER_CLUSTER)
        .clamp(1, MAX_CLUSTERS);
    let centers = pick_cluster_centers(region, zones, cluster_count, rng);

    for _ in 0..micro_count {
        let uniform = region.sample(rng);
        let center = centers[rng.index(centers.len())];
        let pull = rng.next_f64().powf(MICRO_SKEW_EXPONENT);
        let point = place_outside_zones(region, center + (uniform - center) * pull, zones);
        region.sites.push(free_site(region, point));
    }
}

fn free_site(region: &Region, position: DVec2) -> Site {
    Site {
        position,
        anchored: false,
        region: region.kind,
    }
}

fn place_outside_zones(region: &Region, point: DVec2, zones: &[ExclusionZone]) -> DVec2 {
    region.clamp(push_out_of_zones(point, zones))
}

/// Maximin selection of cluster centers from a uniform candidate pool
///
/// The first center is a random candidate; each next one is the candidate
/// farthest from all centers chosen so far (ties keep the earlier candidate).
pub fn pick_cluster_centers(
    region: &Region,
    zones: &[ExclusionZone],
    count: usize,
    rng: &mut SeededRandom,
) -> Vec<DVec2> {
    let pool_size = (count * CLUSTER_CANDIDATES_PER_CENTER).max(1);
    let candidates: Vec<DVec2> = (0..pool_size)
        .map(|_| place_outside_zones(region, region.sample(rng), zones))
        .collect();

    let mut centers = vec![candidates[rng.index(candidates.len())]];
    while centers.len() < count.min(candidates.len()) {
        let mut best = candidates[0];
        let mut best_dist = f64::NEG_INFINITY;
        for &candidate in &candidates {
            let nearest = centers
                .iter()
                .map(|c| c.distance_squared(candidate))
                .fold(f64::INFINITY, f64::min);
            if nearest > best_dist {
                best = candidate;
                best_dist = nearest;
            }
        }
        centers.push(best);
    }
    centers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::regions::partition;
    use crate::geometry::{is_inside_all, INSIDE_EPSILON};

    fn region_with_quota(seed: &str, quota: usize) -> (Region, SeededRandom) {
        let mut rng = SeededRandom::from_seed_str(seed);
        let mut region = partition(1000.0, &mut rng).swap_remove(1);
        region.quota = quota;
        (region, rng)
    }

    #[test]
    fn test_split_free_points() {
        assert_eq!(split_free_points(0), (0, 0));
        assert_eq!(split_free_points(4), (0, 4));
        assert_eq!(split_free_points(25), (3, 22));
        assert_eq!(split_free_points(100), (12, 88));
    }

    #[test]
    fn test_fill_reaches_quota() {
        let (mut region, mut rng) = region_with_quota("fill", 30);
        fill_region(&mut region, &[], &mut rng);
        assert_eq!(region.sites.len(), 30);
        for site in &region.sites {
            assert!(!site.anchored);
            assert_eq!(site.region, region.kind);
            assert!(is_inside_all(site.position, &region.half_planes, INSIDE_EPSILON));
        }
    }

    #[test]
    fn test_fill_respects_existing_sites() {
        let (mut region, mut rng) = region_with_quota("existing", 12);
        region.sites.push(Site {
            position: region.anchor,
            anchored: true,
            region: region.kind,
        });
        fill_region(&mut region, &[], &mut rng);
        assert_eq!(region.sites.len(), 12);
        assert_eq!(region.anchored_count(), 1);
    }

    #[test]
    fn test_free_points_avoid_zone() {
        let (mut region, mut rng) = region_with_quota("zone", 40);
        let zone = ExclusionZone {
            center: region.anchor,
            radius: region.spacing(),
        };
        fill_region(&mut region, &[zone], &mut rng);
        let inside = region
            .sites
            .iter()
            .filter(|s| zone.contains(s.position))
            .count();
        // Clamping may pull a point back in only where the zone meets the border.
        assert!(inside <= 2, "{} points inside the zone", inside);
    }

    #[test]
    fn test_cluster_centers_are_spread() {
        let (region, mut rng) = region_with_quota("centers", 60);
        let centers = pick_cluster_centers(&region, &[], 4, &mut rng);
        assert_eq!(centers.len(), 4);
        for (i, a) in centers.iter().enumerate() {
            for b in &centers[i + 1..] {
                assert!(a.distance(*b) > 0.0);
            }
        }
    }

    #[test]
    fn test_fill_is_deterministic() {
        let (mut a, mut rng_a) = region_with_quota("det", 25);
        let (mut b, mut rng_b) = region_with_quota("det", 25);
        fill_region(&mut a, &[], &mut rng_a);
        fill_region(&mut b, &[], &mut rng_b);
        assert_eq!(a.sites, b.sites);
    }
}
