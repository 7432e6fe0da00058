//! Hard minimum-distance enforcement
//!
//! Pairs of sites closer than a region's minimum distance are pushed apart
//! symmetrically for a fixed number of passes. Early passes also undo
//! coincidences and zone intrusions; the final passes are pure separation
//! sweeps so nothing disturbs their result.

use glam::DVec2;
use log::debug;
use std::f64::consts::TAU;

use crate::config::{SEPARATION_FACTOR, SEPARATION_PASSES};
use crate::random::SeededRandom;

use super::motifs::{push_out_of_zones, ExclusionZone};
use super::regions::Region;

/// Trailing passes that only separate
pub const PURE_SEPARATION_PASSES: usize = 2;

/// Coincidence threshold for nudging duplicate sites
pub const DUPLICATE_EPSILON: f64 = 1e-9;

/// Nudge length relative to the region spacing
pub const DUPLICATE_NUDGE_FACTOR: f64 = 1e-3;

/// Minimum pairwise distance targeted within a region
pub fn min_distance(area: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    SEPARATION_FACTOR * (area / count as f64).sqrt()
}

/// Enforce the minimum distance in every region
pub fn enforce_separation(regions: &mut [Region], zones: &[ExclusionZone], rng: &mut SeededRandom) {
    for region in regions.iter_mut() {
        region.min_separation = min_distance(region.area, region.sites.len());
        for pass in 0..SEPARATION_PASSES {
            separation_sweep(region, rng);
            if pass + PURE_SEPARATION_PASSES < SEPARATION_PASSES {
                nudge_duplicates(region);
                avoid_zones(region, zones);
            }
        }

        let violations = count_violations(region, region.min_separation * (1.0 - 1e-6));
        debug!(
            "[Separation] {:?}: {} sites, min_dist={:.3}, residual violations={}",
            region.kind,
            region.sites.len(),
            region.min_separation,
            violations
        );
    }
}

/// One sweep over all site pairs of a region
///
/// Anchored sites take part too; each endpoint is clamped back inside the
/// region after its push. Exactly coincident pairs separate along a random
/// direction.
fn separation_sweep(region: &mut Region, rng: &mut SeededRandom) {
    let min_dist = region.min_separation;
    let count = region.sites.len();
    for i in 0..count {
        for j in (i + 1)..count {
            let a = region.sites[i].position;
            let b = region.sites[j].position;
            let delta = b - a;
            let dist = delta.length();
            if dist >= min_dist {
                continue;
            }
            let direction = if dist > 0.0 {
                delta / dist
            } else {
                DVec2::from_angle(rng.next_f64() * TAU)
            };
            let push = direction * ((min_dist - dist) * 0.5);
            region.sites[i].position = region.clamp(a - push);
            region.sites[j].position = region.clamp(b + push);
        }
    }
}

/// Push free sites out of exclusion zones and back into the region
fn avoid_zones(region: &mut Region, zones: &[ExclusionZone]) {
    for idx in 0..region.sites.len() {
        if region.sites[idx].anchored {
            continue;
        }
        let position = region.sites[idx].position;
        region.sites[idx].position = region.clamp(push_out_of_zones(position, zones));
    }
}

/// Separate coincident sites with small fixed nudges
///
/// A free site equal to an earlier site moves by a fixed fraction of the
/// region spacing along a golden-angle direction, then is clamped. Nothing
/// is discarded and no randomness is consumed.
pub fn nudge_duplicates(region: &mut Region) {
    let step = region.spacing() * DUPLICATE_NUDGE_FACTOR;
    let golden_angle = std::f64::consts::PI * (3.0 - 5f64.sqrt());
    let mut nudges = 0usize;
    for j in 1..region.sites.len() {
        if region.sites[j].anchored {
            continue;
        }
        let position = region.sites[j].position;
        let collides = region.sites[..j]
            .iter()
            .any(|other| other.position.distance(position) <= DUPLICATE_EPSILON);
        if collides {
            nudges += 1;
            let direction = DVec2::from_angle(nudges as f64 * golden_angle);
            region.sites[j].position = region.clamp(position + direction * step);
        }
    }
}

/// Number of site pairs closer than `min_dist`
pub fn count_violations(region: &Region, min_dist: f64) -> usize {
    let mut violations = 0;
    for (i, a) in region.sites.iter().enumerate() {
        for b in &region.sites[i + 1..] {
            if a.position.distance(b.position) < min_dist {
                violations += 1;
            }
        }
    }
    violations
}
