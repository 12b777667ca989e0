//! Board-state to network-facing tensor encoding.

use go_engine::{Cell, Position};

use crate::history::Plane;
use crate::turn::PlayerId;
use crate::types::{ActionId, ChannelOrder, Observation, OBS_CHANNELS};

/// Builds the `(N, N, 17)` observation tensor and the legal-action mask.
/// Pure: every call rebuilds the tensor from its inputs.
#[derive(Copy, Clone, Debug)]
pub struct ObservationEncoder {
    board_size: usize,
    channel_order: ChannelOrder,
}

impl ObservationEncoder {
    pub fn new(board_size: usize, channel_order: ChannelOrder) -> Self {
        Self {
            board_size,
            channel_order,
        }
    }

    /// Tensor shape under the configured channel order.
    pub fn obs_shape(&self) -> Vec<usize> {
        let n = self.board_size;
        match self.channel_order {
            ChannelOrder::ChannelsLast => vec![n, n, OBS_CHANNELS],
            ChannelOrder::ChannelsFirst => vec![OBS_CHANNELS, n, n],
        }
    }

    /// Size of the discrete action space (`N*N` placements + pass sentinel).
    pub fn num_actions(&self) -> usize {
        self.board_size * self.board_size + 1
    }

    /// Perspective-relative occupancy planes: the mover's stones and the
    /// opponent's stones. Relative to whoever holds `mover_stone`, not to a
    /// fixed color, so the same network weights generalize across colors.
    pub fn occupancy_planes(&self, position: &Position, mover_stone: Cell) -> (Plane, Plane) {
        let board = position.board();
        let mover = board.iter().map(|&c| c == mover_stone).collect();
        let opponent = board.iter().map(|&c| c == -mover_stone).collect();
        (mover, opponent)
    }

    /// Assemble the observation: 16 history planes (newest pair first) plus
    /// a constant plane carrying the side-to-move player index (0 or 1).
    pub fn encode(&self, history: &[Plane], side_to_move: PlayerId) -> Observation {
        debug_assert_eq!(history.len(), OBS_CHANNELS - 1);
        let n = self.board_size;
        let cells = n * n;
        let indicator = side_to_move.index() as f32;
        let mut data = vec![0.0f32; cells * OBS_CHANNELS];

        match self.channel_order {
            ChannelOrder::ChannelsLast => {
                for (ch, plane) in history.iter().enumerate() {
                    for (cell, &set) in plane.iter().enumerate() {
                        if set {
                            data[cell * OBS_CHANNELS + ch] = 1.0;
                        }
                    }
                }
                for cell in 0..cells {
                    data[cell * OBS_CHANNELS + (OBS_CHANNELS - 1)] = indicator;
                }
            }
            ChannelOrder::ChannelsFirst => {
                for (ch, plane) in history.iter().enumerate() {
                    for (cell, &set) in plane.iter().enumerate() {
                        if set {
                            data[ch * cells + cell] = 1.0;
                        }
                    }
                }
                data[(OBS_CHANNELS - 1) * cells..].fill(indicator);
            }
        }

        Observation::new(data, self.obs_shape())
    }

    /// Mask over the full action space from the current legal set. The
    /// environment passes the sentinel-only set once the position is
    /// terminal; pre-terminal the pass slot is never present, so an
    /// all-false mask is a valid stalemate signal.
    pub fn action_mask(&self, legal: &[ActionId]) -> Vec<bool> {
        let mut mask = vec![false; self.num_actions()];
        for &action in legal {
            mask[action] = true;
        }
        mask
    }
}
