//! Core board generation algorithm
//!
//! Partitions the board into three regions, places motifs and free sites,
//! relaxes and separates them, and finally cuts the board into labelled
//! Voronoi cells. One seeded stream drives every step in a fixed order; that
//! order is part of the reproducibility contract.

mod allocation;
mod cells;
mod lloyd;
mod motifs;
mod points;
mod regions;
mod separation;
mod voronoi;

pub use allocation::allocate_quotas;
pub use cells::{assign_labels, build_cells, reconcile_count};
pub use lloyd::{relax_regions, LloydOptions};
pub use motifs::{
    build_motif, plan_motifs, push_out_of_zones, ExclusionZone, Motif, MotifKind, MotifShape,
    MotifSpec,
};
pub use points::{fill_region, pick_cluster_centers, split_free_points};
pub use regions::{draw_cut_lines, partition, CutLines, Region, RegionKind, Site};
pub use separation::{count_violations, enforce_separation, min_distance, nudge_duplicates};
pub use voronoi::{DelaunayVoronoi, VoronoiProvider};

use log::debug;
use std::time::Instant;

use crate::cell::Cell;
use crate::config::BoardConfig;
use crate::error::Result;
use crate::geometry::Rect;
use crate::random::SeededRandom;

/// Everything one generation run produced
#[derive(Debug, Clone)]
pub struct Layout {
    /// Seed string actually used (the time fallback when the input was empty)
    pub seed: String,
    pub cells: Vec<Cell>,
    pub regions: Vec<Region>,
    pub motifs: Vec<Motif>,
}

/// State threaded through the pipeline
///
/// There is no global state: the stream, regions and zones all live here.
struct GenerationContext {
    rng: SeededRandom,
    bounds: Rect,
    regions: Vec<Region>,
    motifs: Vec<Motif>,
    zones: Vec<ExclusionZone>,
}

/// Generate a complete board layout from configuration
///
/// # Errors
///
/// Returns `InvalidConfig` before doing any work if the configuration is
/// invalid. Degenerate geometry never fails a run.
pub fn generate_layout<P: VoronoiProvider>(config: &BoardConfig, provider: &P) -> Result<Layout> {
    config.validate()?;
    let start = Instant::now();
    let piece_count = config.piece_count();
    let seed = SeededRandom::resolve_seed(&config.seed);

    // Step 1: Seed the stream and split the board into regions
    let mut rng = SeededRandom::from_seed_str(&seed);
    let regions = partition(config.board_size, &mut rng);
    let mut ctx = GenerationContext {
        rng,
        bounds: Rect::square(config.board_size),
        regions,
        motifs: Vec::new(),
        zones: Vec::new(),
    };

    // Step 2: Area-proportional quotas
    let areas: Vec<f64> = ctx.regions.iter().map(|r| r.area).collect();
    for (region, quota) in ctx.regions.iter_mut().zip(allocate_quotas(piece_count, &areas)) {
        region.quota = quota;
    }
    debug!(
        "[Generate] seed={:?}, quotas={:?}",
        seed,
        ctx.regions.iter().map(|r| r.quota).collect::<Vec<_>>()
    );

    // Step 3: Motifs become anchored sites
    place_motifs(&mut ctx, piece_count);

    // Step 4: Free sites fill the remaining quota
    for idx in 0..ctx.regions.len() {
        fill_region(&mut ctx.regions[idx], &ctx.zones, &mut ctx.rng);
    }

    // Step 5: Optional constrained relaxation
    relax_regions(
        &mut ctx.regions,
        &ctx.zones,
        ctx.bounds,
        provider,
        LloydOptions {
            iterations: config.relax_iterations,
        },
    );

    // Step 6: Fixed-pass minimum distance enforcement
    enforce_separation(&mut ctx.regions, &ctx.zones, &mut ctx.rng);

    // Separation may still nudge anchored sites
    sync_motif_points(&mut ctx.motifs, &ctx.regions);

    // Step 7: Region-local cells, count check, labels
    let mut cells = build_cells(&ctx.regions, ctx.bounds, provider);
    reconcile_count(&mut cells, piece_count, &ctx.regions, ctx.bounds);
    assign_labels(&mut cells, &mut ctx.rng);

    debug!(
        "[Generate] {} cells, {} motifs in {:?}",
        cells.len(),
        ctx.motifs.len(),
        start.elapsed()
    );

    Ok(Layout {
        seed,
        cells,
        regions: ctx.regions,
        motifs: ctx.motifs,
    })
}

fn place_motifs(ctx: &mut GenerationContext, piece_count: usize) {
    let plan = plan_motifs(piece_count, &ctx.regions, &mut ctx.rng);
    for spec in plan {
        let Some(region) = ctx.regions.iter_mut().find(|r| r.kind == spec.region) else {
            continue;
        };
        let motif = build_motif(spec, region, &mut ctx.rng);
        region.sites.extend(motif.points.iter().map(|&position| Site {
            position,
            anchored: true,
            region: region.kind,
        }));
        ctx.zones.push(motif.zone);
        ctx.motifs.push(motif);
    }
}

/// Copy final anchored positions back into the motifs, in placement order
fn sync_motif_points(motifs: &mut [Motif], regions: &[Region]) {
    let mut consumed = [0usize; RegionKind::ALL.len()];
    for motif in motifs.iter_mut() {
        let slot = motif.spec.region.index();
        let Some(region) = regions.iter().find(|r| r.kind == motif.spec.region) else {
            continue;
        };
        let anchored = region
            .sites
            .iter()
            .filter(|site| site.anchored)
            .skip(consumed[slot])
            .take(motif.points.len());
        for (point, site) in motif.points.iter_mut().zip(anchored) {
            *point = site.position;
        }
        consumed[slot] += motif.points.len();
    }
}
