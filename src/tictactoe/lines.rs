//! Winning line analysis for N-in-a-row boards

use super::board::Cell;
use crate::types::{PlayerId, line_indices};

/// Utility for analyzing winning lines
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Check if a player owns every cell of some row, column or main diagonal
    pub fn has_won(cells: &[Cell], size: usize, player: PlayerId) -> bool {
        let target = Cell::of(player);
        line_indices(size)
            .iter()
            .any(|line| line.iter().all(|&idx| cells[idx] == target))
    }
}
