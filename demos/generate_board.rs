//! Example: Generate a numbered board
//!
//! Run with `RUST_LOG=debug` to see the pipeline's timing output.
//! An optional first argument sets the seed, a second one the piece count.

use numbered_tiles::*;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().unwrap_or_default();
    let pieces = match args.next() {
        Some(raw) => raw
            .parse()
            .map_err(|_| BoardError::InvalidConfig(format!("not a piece count: {}", raw)))?,
        None => BoardPreset::Medium.piece_count(),
    };

    println!("Numbered Board Generation Example");
    println!("=================================\n");

    let config = BoardConfigBuilder::new()
        .seed(seed)
        .piece_count(pieces)
        .relax_iterations(DEFAULT_RELAX_ITERATIONS)?
        .build()?;

    println!("Configuration:");
    println!("  Preset: {}", config.preset.name());
    println!("  Pieces: {}", config.piece_count());
    println!("  Board Size: {}", config.board_size);
    println!("  Relax Iterations: {}", config.relax_iterations);
    println!();

    let board = Board::generate(config)?;
    println!("Generated {} cells from seed {:?}\n", board.cell_count(), board.seed());

    println!("Regions:");
    for region in board.regions() {
        println!(
            "  {:?}: area={:.0}, quota={}, anchored={}",
            region.kind,
            region.area,
            region.quota,
            region.anchored_count()
        );
    }
    println!();

    println!("Motifs:");
    for motif in board.motifs() {
        println!(
            "  {:?} in {:?}: {} points, center=({:.1}, {:.1})",
            motif.spec.shape,
            motif.spec.region,
            motif.points.len(),
            motif.center.x,
            motif.center.y
        );
    }
    println!();

    let total_vertices: usize = board.cells().iter().map(|c| c.vertex_count()).sum();
    println!("Statistics:");
    println!(
        "  Average vertices per cell: {:.2}",
        total_vertices as f64 / board.cell_count().max(1) as f64
    );
    println!();

    println!("Click order:");
    for cell in board.cells_in_label_order().take(5) {
        println!(
            "  {:3}: centroid=({:.1}, {:.1}), region={:?}",
            cell.label, cell.centroid.x, cell.centroid.y, cell.region
        );
    }

    #[cfg(feature = "spatial-index")]
    {
        let center = DVec2::splat(board.board_size() * 0.5);
        if let Some(idx) = board.find_cell_at(center) {
            println!("\nBoard center lies in cell {}", board.cells()[idx].label);
        }
    }

    Ok(())
}
