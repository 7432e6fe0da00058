//! Board Configuration and Builder
//!
//! This module provides configuration types for deterministic board generation,
//! together with the named tuning constants the generator is calibrated with.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};

/// Default number of constrained Lloyd iterations (0 disables relaxation)
pub const DEFAULT_RELAX_ITERATIONS: usize = 1;

/// Upper bound accepted by the builder for relaxation iterations
pub const MAX_RELAX_ITERATIONS: usize = 20;

/// Default side length of the square board
pub const DEFAULT_BOARD_SIZE: f64 = 1000.0;

/// Minimum share of the projected board width reserved for each region
pub const REGION_MIN_WIDTH_FRACTION: f64 = 0.18;

/// Maximum deviation of the cut lines from vertical, in degrees
pub const MAX_CUT_ANGLE_DEGREES: f64 = 18.0;

/// Share of the piece count that motifs may consume in total
pub const MOTIF_BUDGET_FRACTION: f64 = 0.4;

/// Scale applied to `sqrt(area / count)` to get a region's minimum site distance
pub const SEPARATION_FACTOR: f64 = 0.6;

/// Number of separation passes (a hard cap, not a convergence check)
pub const SEPARATION_PASSES: usize = 5;

/// Bisection steps used when clamping a point back into a region
pub const CLAMP_ITERATIONS: usize = 32;

/// Share of a region's free points placed as sparse uniform "macro" points
pub const MACRO_FRACTION: f64 = 0.12;

/// Exponent biasing micro points toward their cluster center
pub const MICRO_SKEW_EXPONENT: f64 = 3.0;

/// Piece count presets matching the sizes offered to players
///
/// The motif planner's thresholds are tuned around these three sizes, but any
/// positive piece count is accepted through [`BoardPreset::Custom`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardPreset {
    /// 20 pieces, one motif
    #[default]
    Small,
    /// 50 pieces, two motifs
    Medium,
    /// 100 pieces, three motifs
    Large,
    /// Any other piece count
    Custom {
        /// Number of cells on the board
        piece_count: usize,
    },
}

impl BoardPreset {
    /// Get the number of cells for this preset
    pub fn piece_count(self) -> usize {
        match self {
            BoardPreset::Small => 20,
            BoardPreset::Medium => 50,
            BoardPreset::Large => 100,
            BoardPreset::Custom { piece_count } => piece_count,
        }
    }

    /// Get a human-readable name for this preset
    pub fn name(self) -> &'static str {
        match self {
            BoardPreset::Small => "Small",
            BoardPreset::Medium => "Medium",
            BoardPreset::Large => "Large",
            BoardPreset::Custom { .. } => "Custom",
        }
    }
}

/// Configuration for deterministic board generation
///
/// The same configuration (with a non-empty seed) always produces the
/// identical board: same polygons, same centroids, same labels.
///
/// # Example
///
/// ```rust
/// use numbered_tiles::*;
///
/// let config = BoardConfigBuilder::new()
///     .seed("abc")
///     .preset(BoardPreset::Medium)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.piece_count(), 50);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    /// Seed string; empty means "derive a seed from the current time"
    pub seed: String,

    /// Piece count preset
    pub preset: BoardPreset,

    /// Number of constrained Lloyd iterations
    ///
    /// - 0: no relaxation, cells keep their raw clustered look
    /// - 1: default, evens out the worst slivers
    /// - more: progressively more uniform cells
    pub relax_iterations: usize,

    /// Side length of the square board
    pub board_size: f64,
}

impl BoardConfig {
    /// Get the piece count for this configuration
    #[inline]
    pub fn piece_count(&self) -> usize {
        self.preset.piece_count()
    }

    /// Check the configuration before any generation work starts
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a zero piece count, a non-finite or
    /// non-positive board size, or more than [`MAX_RELAX_ITERATIONS`] iterations.
    pub fn validate(&self) -> Result<()> {
        if self.piece_count() == 0 {
            return Err(BoardError::InvalidConfig(
                "piece count must be positive (got 0)".to_string(),
            ));
        }
        validate_board_size(self.board_size)?;
        validate_relax_iterations(self.relax_iterations)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            seed: String::new(),
            preset: BoardPreset::default(),
            relax_iterations: DEFAULT_RELAX_ITERATIONS,
            board_size: DEFAULT_BOARD_SIZE,
        }
    }
}

fn validate_board_size(size: f64) -> Result<()> {
    if !size.is_finite() || size <= 0.0 {
        return Err(BoardError::InvalidConfig(format!(
            "board size must be finite and positive (got {})",
            size
        )));
    }
    Ok(())
}

fn validate_relax_iterations(iterations: usize) -> Result<()> {
    if iterations > MAX_RELAX_ITERATIONS {
        return Err(BoardError::InvalidConfig(format!(
            "relax iterations must be <= {} (got {})",
            MAX_RELAX_ITERATIONS, iterations
        )));
    }
    Ok(())
}

/// Builder for creating BoardConfig with validation
///
/// # Example
///
/// ```rust
/// use numbered_tiles::*;
///
/// let config = BoardConfigBuilder::new()
///     .seed("weekly-challenge")
///     .piece_count(36)
///     .relax_iterations(2)
///     .unwrap()
///     .board_size(800.0)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.preset.name(), "Custom");
/// ```
#[derive(Debug, Clone)]
pub struct BoardConfigBuilder {
    seed: String,
    preset: BoardPreset,
    relax_iterations: usize,
    board_size: f64,
}

impl BoardConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: empty (time-based fallback at generation time)
    /// - preset: Small (20 pieces)
    /// - relax_iterations: 1
    /// - board_size: 1000.0
    pub fn new() -> Self {
        Self {
            seed: String::new(),
            preset: BoardPreset::default(),
            relax_iterations: DEFAULT_RELAX_ITERATIONS,
            board_size: DEFAULT_BOARD_SIZE,
        }
    }

    /// Set the seed string
    pub fn seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = seed.into();
        self
    }

    /// Set the piece count preset
    pub fn preset(mut self, preset: BoardPreset) -> Self {
        self.preset = preset;
        self
    }

    /// Set an explicit piece count, mapping the standard sizes to their presets
    pub fn piece_count(mut self, count: usize) -> Self {
        self.preset = match count {
            20 => BoardPreset::Small,
            50 => BoardPreset::Medium,
            100 => BoardPreset::Large,
            piece_count => BoardPreset::Custom { piece_count },
        };
        self
    }

    /// Set the number of relaxation iterations
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > [`MAX_RELAX_ITERATIONS`]
    pub fn relax_iterations(mut self, iterations: usize) -> Result<Self> {
        validate_relax_iterations(iterations)?;
        self.relax_iterations = iterations;
        Ok(self)
    }

    /// Set the board side length
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the size is not finite or not positive
    pub fn board_size(mut self, size: f64) -> Result<Self> {
        validate_board_size(size)?;
        self.board_size = size;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the piece count is zero.
    pub fn build(self) -> Result<BoardConfig> {
        let config = BoardConfig {
            seed: self.seed,
            preset: self.preset,
            relax_iterations: self.relax_iterations,
            board_size: self.board_size,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for BoardConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_piece_counts() {
        assert_eq!(BoardPreset::Small.piece_count(), 20);
        assert_eq!(BoardPreset::Medium.piece_count(), 50);
        assert_eq!(BoardPreset::Large.piece_count(), 100);
        assert_eq!(BoardPreset::Custom { piece_count: 7 }.piece_count(), 7);
        assert_eq!(BoardPreset::Custom { piece_count: 7 }.name(), "Custom");
    }

    #[test]
    fn test_builder_defaults() {
        let config = BoardConfigBuilder::new().build().unwrap();
        assert_eq!(config.preset, BoardPreset::Small);
        assert_eq!(config.relax_iterations, DEFAULT_RELAX_ITERATIONS);
        assert_eq!(config.board_size, DEFAULT_BOARD_SIZE);
        assert!(config.seed.is_empty());
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    fn test_builder_custom() {
        let config = BoardConfigBuilder::new()
            .seed("abc")
            .preset(BoardPreset::Large)
            .relax_iterations(0)
            .unwrap()
            .board_size(500.0)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.seed, "abc");
        assert_eq!(config.piece_count(), 100);
        assert_eq!(config.relax_iterations, 0);
        assert_eq!(config.board_size, 500.0);
    }

    #[test]
    fn test_piece_count_maps_to_presets() {
        let config = BoardConfigBuilder::new().piece_count(50).build().unwrap();
        assert_eq!(config.preset, BoardPreset::Medium);

        let config = BoardConfigBuilder::new().piece_count(33).build().unwrap();
        assert_eq!(config.preset, BoardPreset::Custom { piece_count: 33 });
    }

    #[test]
    fn test_zero_pieces_rejected() {
        let result = BoardConfigBuilder::new().piece_count(0).build();
        assert!(matches!(result, Err(BoardError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_board_size() {
        assert!(BoardConfigBuilder::new().board_size(0.0).is_err());
        assert!(BoardConfigBuilder::new().board_size(-5.0).is_err());
        assert!(BoardConfigBuilder::new().board_size(f64::NAN).is_err());
        assert!(BoardConfigBuilder::new().board_size(f64::INFINITY).is_err());
    }

    #[test]
    fn test_too_many_iterations() {
        assert!(BoardConfigBuilder::new().relax_iterations(21).is_err());
        assert!(BoardConfigBuilder::new().relax_iterations(20).is_ok());
    }

    #[test]
    fn test_validate_catches_hand_built_config() {
        let config = BoardConfig {
            board_size: f64::NAN,
            ..BoardConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = BoardConfigBuilder::new()
            .seed("abc")
            .preset(BoardPreset::Medium)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: BoardConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
