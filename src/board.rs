//! Board main structure

#[cfg(feature = "spatial-index")]
use glam::DVec2;

use crate::cell::Cell;
use crate::config::BoardConfig;
use crate::error::{BoardError, Result};
use crate::generation::{generate_layout, DelaunayVoronoi, Motif, Region, VoronoiProvider};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A complete, labelled puzzle board
///
/// Holds the `N` cells the player clicks through, plus the regions and motifs
/// they were generated from for inspection and debugging.
///
/// # Examples
///
/// ```
/// use numbered_tiles::*;
///
/// let config = BoardConfigBuilder::new()
///     .seed("abc")
///     .preset(BoardPreset::Small)
///     .build()
///     .unwrap();
///
/// let board = Board::generate(config).unwrap();
/// assert_eq!(board.cell_count(), 20);
///
/// // The first piece to click
/// let first = board.cell_by_label(1).unwrap();
/// println!("Start at {:?}", first.centroid);
/// ```
#[derive(Clone)]
pub struct Board {
    /// Configuration used to generate this board
    config: BoardConfig,

    /// Seed string actually used (differs from the config only when it was empty)
    seed: String,

    /// Cells in region-then-site order
    cells: Vec<Cell>,

    /// Cell index for each label, `label_index[label - 1]`
    label_index: Vec<usize>,

    regions: Vec<Region>,
    motifs: Vec<Motif>,

    /// Centroid index for hit-testing (requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl Board {
    /// Generate a board with the default Delaunay-backed Voronoi provider
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration does not validate.
    pub fn generate(config: BoardConfig) -> Result<Self> {
        Self::generate_with_provider(config, &DelaunayVoronoi)
    }

    /// Generate a board with a custom Voronoi provider
    ///
    /// # Example
    ///
    /// ```
    /// use numbered_tiles::*;
    ///
    /// let config = BoardConfigBuilder::new().seed("xyz").build().unwrap();
    /// let board = Board::generate_with_provider(config, &DelaunayVoronoi).unwrap();
    /// assert_eq!(board.seed(), "xyz");
    /// ```
    pub fn generate_with_provider<P: VoronoiProvider>(config: BoardConfig, provider: &P) -> Result<Self> {
        let layout = generate_layout(&config, provider)?;

        let mut label_index = vec![0; layout.cells.len()];
        for (idx, cell) in layout.cells.iter().enumerate() {
            label_index[cell.label - 1] = idx;
        }

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let centers: Vec<DVec2> = layout.cells.iter().map(|c| c.centroid).collect();
            SpatialIndex::new(&centers)
        };

        Ok(Self {
            config,
            seed: layout.seed,
            cells: layout.cells,
            label_index,
            regions: layout.regions,
            motifs: layout.motifs,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Get the configuration used to generate this board
    #[inline]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Get the seed string the board was generated from
    ///
    /// Feeding this back as the config seed reproduces the board, even when
    /// the original seed was empty.
    #[inline]
    pub fn seed(&self) -> &str {
        &self.seed
    }

    #[inline]
    pub fn board_size(&self) -> f64 {
        self.config.board_size
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// All cells in generation order (region by region)
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get a cell by position in [`Board::cells`]
    #[inline]
    pub fn get_cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Get the cell carrying `label`
    ///
    /// # Errors
    ///
    /// Returns `LabelNotFound` for labels outside `1..=N`.
    pub fn cell_by_label(&self, label: usize) -> Result<&Cell> {
        label
            .checked_sub(1)
            .and_then(|slot| self.label_index.get(slot))
            .map(|&idx| &self.cells[idx])
            .ok_or(BoardError::LabelNotFound(label))
    }

    /// Cells in click order, label 1 first
    pub fn cells_in_label_order(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.label_index.iter().map(move |&idx| &self.cells[idx])
    }

    /// The three regions with their final sites
    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Motifs placed on this board
    #[inline]
    pub fn motifs(&self) -> &[Motif] {
        &self.motifs
    }

    /// Find the cell under a board position (requires spatial-index feature)
    ///
    /// The nearest centroid is checked first; if its polygon does not contain
    /// the point, all cells are scanned. Returns `None` off the board.
    ///
    /// # Example
    ///
    /// ```
    /// # use numbered_tiles::*;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let board = Board::generate(BoardConfigBuilder::new().seed("hit").build().unwrap()).unwrap();
    /// let target = board.cell_by_label(5).unwrap();
    /// let idx = board.find_cell_at(target.centroid).unwrap();
    /// assert_eq!(board.cells()[idx].label, 5);
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_cell_at(&self, position: DVec2) -> Option<usize> {
        if self.cells.is_empty() {
            return None;
        }
        let candidate = self.spatial_index.find_nearest(position);
        if self.cells[candidate].contains(position) {
            return Some(candidate);
        }
        self.cells.iter().position(|cell| cell.contains(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoardConfigBuilder, BoardPreset};

    fn board(seed: &str, preset: BoardPreset) -> Board {
        let config = BoardConfigBuilder::new()
            .seed(seed)
            .preset(preset)
            .build()
            .unwrap();
        Board::generate(config).unwrap()
    }

    #[test]
    fn test_board_generation() {
        let board = board("abc", BoardPreset::Small);
        assert_eq!(board.cell_count(), 20);
        assert_eq!(board.seed(), "abc");
        assert_eq!(board.board_size(), 1000.0);
        assert_eq!(board.regions().len(), 3);
    }

    #[test]
    fn test_cell_by_label() {
        let board = board("labels", BoardPreset::Medium);
        for label in 1..=50 {
            assert_eq!(board.cell_by_label(label).unwrap().label, label);
        }
        assert_eq!(board.cell_by_label(0), Err(BoardError::LabelNotFound(0)));
        assert_eq!(board.cell_by_label(51), Err(BoardError::LabelNotFound(51)));
    }

    #[test]
    fn test_cells_in_label_order() {
        let board = board("order", BoardPreset::Small);
        let labels: Vec<usize> = board.cells_in_label_order().map(|c| c.label).collect();
        assert_eq!(labels, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_get_cell() {
        let board = board("get", BoardPreset::Small);
        assert!(board.get_cell(0).is_some());
        assert!(board.get_cell(board.cell_count()).is_none());
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_find_cell_at() {
        let board = board("hit", BoardPreset::Large);
        for (idx, cell) in board.cells().iter().enumerate() {
            assert_eq!(board.find_cell_at(cell.centroid), Some(idx));
        }
        assert_eq!(board.find_cell_at(DVec2::new(-10.0, -10.0)), None);
    }
}
