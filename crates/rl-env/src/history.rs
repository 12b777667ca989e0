//! Rolling window of past board-occupancy planes.

use crate::types::HISTORY_PLANES;

/// One occupancy plane: `N * N` booleans, row-major.
pub type Plane = Vec<bool>;

/// Fixed-depth history of occupancy-plane pairs, one pair per half-move
/// (mover's stones, opponent's stones). Always exactly 16 planes deep:
/// new pairs are prepended and the oldest pair is shifted out.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardHistoryBuffer {
    cells: usize,
    planes: Vec<Plane>,
}

impl BoardHistoryBuffer {
    /// Zeroed buffer for an `N x N` board.
    pub fn new(board_size: usize) -> Self {
        let cells = board_size * board_size;
        Self {
            cells,
            planes: vec![vec![false; cells]; HISTORY_PLANES],
        }
    }

    /// Prepend a (mover, opponent) pair and drop the oldest pair.
    pub fn push(&mut self, mover: Plane, opponent: Plane) {
        debug_assert_eq!(mover.len(), self.cells);
        debug_assert_eq!(opponent.len(), self.cells);
        self.planes.truncate(HISTORY_PLANES - 2);
        self.planes.insert(0, opponent);
        self.planes.insert(0, mover);
    }

    /// Zero every plane (fresh episode).
    pub fn reset(&mut self) {
        for plane in &mut self.planes {
            plane.fill(false);
        }
    }

    /// Owned copy of the planes, newest pair first. Copy-on-read so callers
    /// cannot alias the buffer's storage.
    pub fn snapshot(&self) -> Vec<Plane> {
        self.planes.clone()
    }

    pub fn num_planes(&self) -> usize {
        self.planes.len()
    }
}
