//! Turn alternation between the two canonical players.

use go_engine::{Cell, BLACK, WHITE};

/// One of the two canonical players. Player One always plays black stones,
/// Player Two white; which of them moves first is set per episode.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// Canonical index: 0 for One, 1 for Two.
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    pub fn other(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Stone color this player places.
    pub fn stone(self) -> Cell {
        match self {
            PlayerId::One => BLACK,
            PlayerId::Two => WHITE,
        }
    }

    /// Inverse of `index`. Panics on anything but 0 or 1.
    pub fn from_index(idx: usize) -> PlayerId {
        match idx {
            0 => PlayerId::One,
            1 => PlayerId::Two,
            _ => panic!("player index must be 0 or 1, got {idx}"),
        }
    }
}

/// Tracks whose turn it is. Exactly one player is current at any time; the
/// current player flips exactly once per accepted move and never on a
/// rejected attempt. Episode termination is tracked by the environment, not
/// here.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TurnCoordinator {
    current: PlayerId,
}

impl TurnCoordinator {
    /// `start_player_index` 0 starts Player One, 1 starts Player Two.
    pub fn start(start_player_index: usize) -> Self {
        Self {
            current: PlayerId::from_index(start_player_index),
        }
    }

    pub fn current(self) -> PlayerId {
        self.current
    }

    pub fn opponent(self) -> PlayerId {
        self.current.other()
    }

    /// Flip after an accepted move.
    pub fn advance(&mut self) {
        self.current = self.current.other();
    }
}
