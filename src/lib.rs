//! Deterministic Voronoi boards for "click the numbers in order" puzzles
//!
//! A seed string and a piece count fully determine a board: the square is cut
//! into three slanted regions, seeded with geometric motifs and clustered free
//! sites, and finally split into `N` convex cells labelled with a shuffled
//! permutation of `1..=N`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use numbered_tiles::*;
//!
//! let config = BoardConfigBuilder::new()
//!     .seed("abc")
//!     .preset(BoardPreset::Medium)
//!     .relax_iterations(2).unwrap()
//!     .build().unwrap();
//!
//! let board = Board::generate(config).unwrap();
//!
//! for cell in board.cells_in_label_order().take(3) {
//!     println!("{} at {:?}", cell.label, cell.centroid);
//! }
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-cell lookups using KD-tree
//! - `serde`: Enables serialization support for configuration and cells

// Modules
pub mod error;
pub mod config;
pub mod random;
pub mod geometry;
pub mod cell;
pub mod generation;
pub mod board;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{BoardError, Result};
pub use config::{BoardConfig, BoardConfigBuilder, BoardPreset, DEFAULT_BOARD_SIZE, DEFAULT_RELAX_ITERATIONS, MAX_RELAX_ITERATIONS};
pub use random::SeededRandom;
pub use geometry::{HalfPlane, Rect};
pub use cell::Cell;
pub use board::Board;
pub use generation::{
    generate_layout, DelaunayVoronoi, ExclusionZone, Layout, LloydOptions, Motif, MotifKind,
    MotifShape, MotifSpec, Region, RegionKind, Site, VoronoiProvider,
};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
