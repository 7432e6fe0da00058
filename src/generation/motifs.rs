//! Structured motifs: rings, centred rings and small grids
//!
//! Planning decides how many motifs a board gets, of which kind and in which
//! region, and fixes each motif's parameter under a global point budget.
//! Building turns a planned motif into concrete, non-jittered points plus an
//! exclusion zone that keeps free points out of the pattern.

use glam::DVec2;
use log::debug;
use std::f64::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::MOTIF_BUDGET_FRACTION;
use crate::geometry::min_clearance;
use crate::random::SeededRandom;

use super::regions::{Region, RegionKind};
use super::separation::min_distance;

/// Piece counts up to this get a single motif
pub const SINGLE_MOTIF_MAX_PIECES: usize = 30;

/// Piece counts up to this get two motifs; above it, three
pub const DOUBLE_MOTIF_MAX_PIECES: usize = 70;

/// Free (non-motif) sites every motif region keeps back
pub const MOTIF_REGION_RESERVE: usize = 2;

/// Allowed polygon side counts for rings
pub const RING_SIDES: std::ops::RangeInclusive<usize> = 3..=8;

/// Allowed grid rows and columns
pub const GRID_ROWS: std::ops::RangeInclusive<usize> = 1..=3;
pub const GRID_COLS: std::ops::RangeInclusive<usize> = 3..=5;

/// Clearance kept around a motif, relative to the region's minimum site distance
pub const MOTIF_CLEARANCE_FACTOR: f64 = 1.25;

/// Steps of the deterministic walk from a sampled center toward the anchor
pub const CENTER_WALK_STEPS: usize = 16;

/// Smallest neighbour step inside a motif, relative to the region's minimum site distance
pub const MOTIF_MIN_STEP_FACTOR: f64 = 1.1;

/// Combinatorial motif type
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotifKind {
    Ring,
    RingCenter,
    Grid,
}

impl MotifKind {
    pub const ALL: [MotifKind; 3] = [MotifKind::Ring, MotifKind::RingCenter, MotifKind::Grid];

    /// Fewest points any parameter choice of this kind needs
    pub fn min_points(self) -> usize {
        match self {
            MotifKind::Ring => *RING_SIDES.start(),
            MotifKind::RingCenter => *RING_SIDES.start() + 1,
            MotifKind::Grid => GRID_ROWS.start() * GRID_COLS.start(),
        }
    }
}

/// Concrete motif shape with its parameter fixed
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotifShape {
    Ring { sides: usize },
    RingCenter { sides: usize },
    Grid { rows: usize, cols: usize },
}

impl MotifShape {
    pub fn kind(self) -> MotifKind {
        match self {
            MotifShape::Ring { .. } => MotifKind::Ring,
            MotifShape::RingCenter { .. } => MotifKind::RingCenter,
            MotifShape::Grid { .. } => MotifKind::Grid,
        }
    }

    pub fn point_count(self) -> usize {
        match self {
            MotifShape::Ring { sides } => sides,
            MotifShape::RingCenter { sides } => sides + 1,
            MotifShape::Grid { rows, cols } => rows * cols,
        }
    }

    /// Next smaller shape of the same kind, if any
    ///
    /// Rings lose a side; grids lose a column down to the minimum, then a row.
    pub fn smaller(self) -> Option<MotifShape> {
        match self {
            MotifShape::Ring { sides } if sides > *RING_SIDES.start() => {
                Some(MotifShape::Ring { sides: sides - 1 })
            }
            MotifShape::RingCenter { sides } if sides > *RING_SIDES.start() => {
                Some(MotifShape::RingCenter { sides: sides - 1 })
            }
            MotifShape::Grid { rows, cols } if cols > *GRID_COLS.start() => {
                Some(MotifShape::Grid { rows, cols: cols - 1 })
            }
            MotifShape::Grid { rows, cols } if rows > *GRID_ROWS.start() => {
                Some(MotifShape::Grid { rows: rows - 1, cols })
            }
            _ => None,
        }
    }

    /// Radius of the motif for a given neighbour spacing
    ///
    /// Rings are sized so adjacent points (and the center, when present)
    /// sit one spacing apart; grids use the spacing as lattice step.
    fn extent(self, spacing: f64) -> f64 {
        match self {
            MotifShape::Ring { sides } => ring_radius(sides, spacing),
            MotifShape::RingCenter { sides } => ring_radius(sides, spacing).max(spacing),
            MotifShape::Grid { rows, cols } => {
                let half_w = (cols as f64 - 1.0) * 0.5;
                let half_h = (rows as f64 - 1.0) * 0.5;
                spacing * (half_w * half_w + half_h * half_h).sqrt()
            }
        }
    }
}

fn ring_radius(sides: usize, spacing: f64) -> f64 {
    spacing / (2.0 * (std::f64::consts::PI / sides as f64).sin())
}

/// A planned motif bound to one region
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotifSpec {
    pub shape: MotifShape,
    pub region: RegionKind,
}

impl MotifSpec {
    pub fn kind(&self) -> MotifKind {
        self.shape.kind()
    }

    pub fn point_count(&self) -> usize {
        self.shape.point_count()
    }
}

/// Circle that free sites must stay outside of
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExclusionZone {
    pub center: DVec2,
    pub radius: f64,
}

impl ExclusionZone {
    pub fn contains(&self, point: DVec2) -> bool {
        point.distance_squared(self.center) < self.radius * self.radius
    }

    /// Radially project a point onto the zone boundary if it lies inside
    pub fn push_out(&self, point: DVec2) -> DVec2 {
        if !self.contains(point) {
            return point;
        }
        let direction = (point - self.center).try_normalize().unwrap_or(DVec2::X);
        self.center + direction * self.radius * (1.0 + 1e-9)
    }
}

/// Push a point out of every zone in turn
pub fn push_out_of_zones(point: DVec2, zones: &[ExclusionZone]) -> DVec2 {
    zones.iter().fold(point, |p, zone| zone.push_out(p))
}

/// A motif instantiated inside its region
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Motif {
    pub spec: MotifSpec,
    pub center: DVec2,
    /// Rotation applied to the pattern, radians
    pub rotation: f64,
    /// Distance from the center to the outermost point, as built
    pub extent: f64,
    /// Positions of the motif's anchored sites
    ///
    /// Set when the motif is built and refreshed once generation finishes, so
    /// they match the sites the cells were cut from.
    pub points: Vec<DVec2>,
    pub zone: ExclusionZone,
}

/// Decide motif kinds, host regions and parameters for a board
///
/// `regions` supplies areas and quotas. Parameters are fixed sequentially so
/// each motif leaves room for the minimum size of those still to come.
pub fn plan_motifs(piece_count: usize, regions: &[Region], rng: &mut SeededRandom) -> Vec<MotifSpec> {
    let mut by_area: Vec<&Region> = regions.iter().filter(|r| r.quota > 0).collect();
    by_area.sort_by(|a, b| b.area.total_cmp(&a.area));

    let wanted: Vec<(MotifKind, RegionKind)> = if piece_count <= SINGLE_MOTIF_MAX_PIECES {
        let kind = MotifKind::ALL[rng.index(MotifKind::ALL.len())];
        by_area.iter().take(1).map(|r| (kind, r.kind)).collect()
    } else if piece_count <= DOUBLE_MOTIF_MAX_PIECES {
        let ring_like = [MotifKind::Ring, MotifKind::RingCenter][rng.index(2)];
        [MotifKind::Grid, ring_like]
            .into_iter()
            .zip(by_area.iter().map(|r| r.kind))
            .collect()
    } else {
        let mut kinds = MotifKind::ALL;
        rng.shuffle(&mut kinds);
        kinds
            .into_iter()
            .zip(RegionKind::ALL)
            .filter(|(_, kind)| regions.iter().any(|r| r.kind == *kind && r.quota > 0))
            .collect()
    };

    let mut budget = (MOTIF_BUDGET_FRACTION * piece_count as f64).floor() as usize;
    let mut plan = Vec::with_capacity(wanted.len());
    for (i, &(kind, region_kind)) in wanted.iter().enumerate() {
        let owed: usize = wanted[i + 1..]
            .iter()
            .map(|(k, _)| fallback_kind(*k).min_points())
            .sum();
        let region_quota = regions
            .iter()
            .find(|r| r.kind == region_kind)
            .map_or(0, |r| r.quota);
        let region_cap = region_quota.saturating_sub(MOTIF_REGION_RESERVE);
        let cap = region_cap.min(budget.saturating_sub(owed));

        match choose_shape(kind, cap, rng) {
            Some(shape) => {
                budget -= shape.point_count();
                plan.push(MotifSpec {
                    shape,
                    region: region_kind,
                });
            }
            None => debug!(
                "[Motifs] {:?} skipped in {:?}: cap {} below minimum",
                kind, region_kind, cap
            ),
        }
    }

    debug!("[Motifs] planned {:?}", plan);
    plan
}

/// Smaller kind to try when a kind does not fit
fn fallback_kind(kind: MotifKind) -> MotifKind {
    match kind {
        MotifKind::RingCenter => MotifKind::Ring,
        other => other,
    }
}

/// Pick a parameter for `kind` that fits in `cap` points
///
/// Rings draw a preferred side count and shrink it to the cap. Grids pick
/// uniformly among the (rows, cols) pairs that fit, enumerated rows-major.
/// A centred ring that cannot fit degrades to a plain ring.
fn choose_shape(kind: MotifKind, cap: usize, rng: &mut SeededRandom) -> Option<MotifShape> {
    if cap < kind.min_points() {
        let fallback = fallback_kind(kind);
        if fallback == kind {
            return None;
        }
        return choose_shape(fallback, cap, rng);
    }

    let sides_span = RING_SIDES.end() - RING_SIDES.start() + 1;
    match kind {
        MotifKind::Ring => {
            let preferred = RING_SIDES.start() + rng.index(sides_span);
            Some(MotifShape::Ring {
                sides: preferred.min(cap),
            })
        }
        MotifKind::RingCenter => {
            let preferred = RING_SIDES.start() + rng.index(sides_span);
            Some(MotifShape::RingCenter {
                sides: preferred.min(cap - 1),
            })
        }
        MotifKind::Grid => {
            let feasible: Vec<(usize, usize)> = GRID_ROWS
                .flat_map(|rows| GRID_COLS.map(move |cols| (rows, cols)))
                .filter(|(rows, cols)| rows * cols <= cap)
                .collect();
            let (rows, cols) = feasible[rng.index(feasible.len())];
            Some(MotifShape::Grid { rows, cols })
        }
    }
}

/// Instantiate a planned motif inside its region
///
/// Consumes the draws of one region sample plus one rotation angle. Neighbour
/// points sit one region spacing apart when there is room. Otherwise the step
/// shrinks to the available clearance, but never below
/// [`MOTIF_MIN_STEP_FACTOR`] times the region's minimum site distance; past
/// that the shape steps down to a smaller one of the same kind. The returned
/// motif's spec carries the shape actually built.
pub fn build_motif(spec: MotifSpec, region: &Region, rng: &mut SeededRandom) -> Motif {
    let spacing = region.spacing();
    let min_dist = min_distance(region.area, region.quota);
    let clearance = min_dist * MOTIF_CLEARANCE_FACTOR;
    let min_step = (min_dist * MOTIF_MIN_STEP_FACTOR).min(spacing);

    let sampled = region.sample(rng);
    let (center, available) = walk_to_fit(sampled, region, spec.shape.extent(spacing) + clearance);
    let (shape, step) = fit_shape(spec.shape, available - clearance, spacing, min_step);
    if shape != spec.shape || step < spacing {
        debug!(
            "[Motifs] {:?} in {:?} fitted as {:?} with step {:.3} (spacing {:.3})",
            spec.shape, spec.region, shape, step, spacing
        );
    }

    let extent = shape.extent(step);
    let rotation = rng.next_f64() * TAU;
    let points: Vec<DVec2> = pattern_offsets(shape, extent)
        .into_iter()
        .map(|offset| region.clamp(center + DVec2::from_angle(rotation).rotate(offset)))
        .collect();

    Motif {
        spec: MotifSpec { shape, ..spec },
        center,
        rotation,
        extent,
        points,
        zone: ExclusionZone {
            center,
            radius: extent + clearance,
        },
    }
}

/// Largest shape and neighbour step whose extent fits in `room`
///
/// Walks down [`MotifShape::smaller`] until the step reaches `min_step`. When
/// even the smallest shape does not fit it is used at `min_step` anyway.
fn fit_shape(shape: MotifShape, room: f64, spacing: f64, min_step: f64) -> (MotifShape, f64) {
    let mut candidate = shape;
    loop {
        let step = (room / candidate.extent(1.0)).min(spacing);
        if step >= min_step {
            return (candidate, step);
        }
        match candidate.smaller() {
            Some(next) => candidate = next,
            None => return (candidate, min_step),
        }
    }
}

/// Walk from `start` toward the region anchor until `needed` clearance fits
///
/// Returns the first position that fits, or the best one seen.
fn walk_to_fit(start: DVec2, region: &Region, needed: f64) -> (DVec2, f64) {
    let mut best = (start, min_clearance(start, &region.half_planes));
    for step in 0..=CENTER_WALK_STEPS {
        let t = step as f64 / CENTER_WALK_STEPS as f64;
        let candidate = start.lerp(region.anchor, t);
        let available = min_clearance(candidate, &region.half_planes);
        if available >= needed {
            return (candidate, available);
        }
        if available > best.1 {
            best = (candidate, available);
        }
    }
    best
}

/// Unrotated point offsets of a shape scaled to `extent`
fn pattern_offsets(shape: MotifShape, extent: f64) -> Vec<DVec2> {
    match shape {
        MotifShape::Ring { sides } => ring_offsets(sides, extent),
        MotifShape::RingCenter { sides } => {
            let mut offsets = ring_offsets(sides, extent);
            offsets.push(DVec2::ZERO);
            offsets
        }
        MotifShape::Grid { rows, cols } => {
            let half_w = (cols as f64 - 1.0) * 0.5;
            let half_h = (rows as f64 - 1.0) * 0.5;
            let diagonal = (half_w * half_w + half_h * half_h).sqrt();
            let step = if diagonal > 0.0 { extent / diagonal } else { extent };
            let mut offsets = Vec::with_capacity(rows * cols);
            for row in 0..rows {
                for col in 0..cols {
                    offsets.push(DVec2::new(
                        (col as f64 - half_w) * step,
                        (row as f64 - half_h) * step,
                    ));
                }
            }
            offsets
        }
    }
}

fn ring_offsets(sides: usize, radius: f64) -> Vec<DVec2> {
    (0..sides)
        .map(|i| DVec2::from_angle(i as f64 * TAU / sides as f64) * radius)
        .collect()
}
