//! Region partitioning
//!
//! Splits the board square into three convex strips with two parallel cut
//! lines tilted at most [`MAX_CUT_ANGLE_DEGREES`] from vertical. Every strip is
//! guaranteed a minimum share of the board's projected width, so no region
//! can degenerate and no retry is ever needed.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{MAX_CUT_ANGLE_DEGREES, REGION_MIN_WIDTH_FRACTION};
use crate::geometry::{
    clamp_to_region, clip_polygon, polygon_area, polygon_centroid, HalfPlane, Rect, TriangleFan,
};
use crate::random::SeededRandom;

/// Which of the three strips a region is
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionKind {
    Left,
    Mid,
    Right,
}

impl RegionKind {
    pub const ALL: [RegionKind; 3] = [RegionKind::Left, RegionKind::Mid, RegionKind::Right];

    /// Position in [`RegionKind::ALL`]
    pub fn index(self) -> usize {
        match self {
            RegionKind::Left => 0,
            RegionKind::Mid => 1,
            RegionKind::Right => 2,
        }
    }
}

/// A Voronoi generator point placed during generation
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    pub position: DVec2,
    /// Motif points: never moved by relaxation or zone avoidance
    pub anchored: bool,
    pub region: RegionKind,
}

/// One convex strip of the board and the sites placed inside it
#[derive(Debug, Clone)]
pub struct Region {
    pub kind: RegionKind,
    /// Square edges plus one or two cut-line half-planes
    pub half_planes: Vec<HalfPlane>,
    pub polygon: Vec<DVec2>,
    pub area: f64,
    /// Interior point used as the clamping anchor
    pub anchor: DVec2,
    pub fan: TriangleFan,
    /// Number of cells this region must produce
    pub quota: usize,
    pub sites: Vec<Site>,
    /// Minimum site distance targeted by the separation stage
    pub min_separation: f64,
}

impl Region {
    fn new(kind: RegionKind, square: &Rect, cuts: &[HalfPlane]) -> Self {
        let mut half_planes = square.half_planes().to_vec();
        half_planes.extend_from_slice(cuts);

        // Minimum widths make an empty clip impossible; the square is a
        // harmless stand-in should floating point ever disagree.
        let polygon = clip_polygon(&square.polygon(), &half_planes).unwrap_or_else(|| square.polygon());
        let area = polygon_area(&polygon);
        let anchor = polygon_centroid(&polygon).unwrap_or((square.min + square.max) * 0.5);
        let fan = TriangleFan::new(&polygon);

        Self {
            kind,
            half_planes,
            polygon,
            area,
            anchor,
            fan,
            quota: 0,
            sites: Vec::new(),
            min_separation: 0.0,
        }
    }

    /// Uniform sample inside the region
    pub fn sample(&self, rng: &mut SeededRandom) -> DVec2 {
        self.fan.sample(rng)
    }

    /// Pull a point back inside the region
    pub fn clamp(&self, point: DVec2) -> DVec2 {
        clamp_to_region(point, self.anchor, &self.half_planes)
    }

    /// Typical distance between neighbouring sites at the region's quota
    pub fn spacing(&self) -> f64 {
        (self.area / self.quota.max(1) as f64).sqrt()
    }

    pub fn anchored_count(&self) -> usize {
        self.sites.iter().filter(|site| site.anchored).count()
    }

    pub fn positions(&self) -> Vec<DVec2> {
        self.sites.iter().map(|site| site.position).collect()
    }
}

/// The shared cut geometry: unit normal and the two offsets along it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutLines {
    pub normal: DVec2,
    pub first: f64,
    pub second: f64,
}

/// Draw the two cut lines; consumes four draws (angle, three weights)
pub fn draw_cut_lines(square: &Rect, rng: &mut SeededRandom) -> CutLines {
    let max_angle = MAX_CUT_ANGLE_DEGREES.to_radians();
    let angle = (rng.next_f64() * 2.0 - 1.0) * max_angle;
    let normal = DVec2::from_angle(angle);

    let (lo, hi) = square
        .polygon()
        .iter()
        .map(|corner| normal.dot(*corner))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
            (lo.min(t), hi.max(t))
        });
    let span = hi - lo;

    let weights = [rng.next_f64(), rng.next_f64(), rng.next_f64()];
    let weight_sum: f64 = weights.iter().sum();
    let free_share = 1.0 - 3.0 * REGION_MIN_WIDTH_FRACTION;
    let share = |w: f64| {
        let normalized = if weight_sum > 0.0 { w / weight_sum } else { 1.0 / 3.0 };
        REGION_MIN_WIDTH_FRACTION + free_share * normalized
    };

    let first = lo + span * share(weights[0]);
    let second = first + span * share(weights[1]);
    CutLines {
        normal,
        first,
        second,
    }
}

/// Split the board square into left, mid and right regions
pub fn partition(board_size: f64, rng: &mut SeededRandom) -> Vec<Region> {
    let square = Rect::square(board_size);
    let cuts = draw_cut_lines(&square, rng);

    let first = HalfPlane::new(cuts.normal, cuts.first);
    let second = HalfPlane::new(cuts.normal, cuts.second);

    vec![
        Region::new(RegionKind::Left, &square, &[first]),
        Region::new(RegionKind::Mid, &square, &[first.complement(), second]),
        Region::new(RegionKind::Right, &square, &[second.complement()]),
    ]
}
