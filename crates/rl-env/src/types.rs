//! Core RL types for the Go environment

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::turn::PlayerId;

/// Discrete action identifier. Actions `0..N*N` are stone placements
/// (`row * N + col`); index `N*N` is the reserved pass / terminal sentinel.
pub type ActionId = usize;

/// Reward value (float)
pub type Reward = f32;

/// Number of history planes kept by the environment (8 pairs).
pub const HISTORY_PLANES: usize = 16;

/// Total observation channels: history planes plus the side-to-move plane.
pub const OBS_CHANNELS: usize = HISTORY_PLANES + 1;

/// Dense observation tensor of {0,1} values.
///
/// Shape is `[N, N, 17]` (channels-last) or `[17, N, N]` (channels-first)
/// depending on the encoder's `ChannelOrder`. Rebuilt from scratch on every
/// reset/step/observe; never mutated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    data: Vec<f32>,
    shape: Vec<usize>,
}

impl Observation {
    pub fn new(data: Vec<f32>, shape: Vec<usize>) -> Self {
        let expected: usize = shape.iter().product();
        assert_eq!(
            data.len(),
            expected,
            "data length {} doesn't match shape {:?}",
            data.len(),
            shape
        );
        Self { data, shape }
    }

    pub fn zeros(shape: &[usize]) -> Self {
        let len = shape.iter().product();
        Self {
            data: vec![0.0; len],
            shape: shape.to_vec(),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }
}

/// Interaction mode between the agent(s) and the environment, fixed for the
/// lifetime of an episode.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum BattleMode {
    /// One action per step; the caller supplies moves for both sides.
    #[default]
    SelfPlay,
    /// The caller plays the primary agent; a scripted opponent answers
    /// within the same step.
    PlayWithBot,
    /// Two-ply structure like `PlayWithBot`, but the opponent move may come
    /// from a human source.
    Eval,
}

/// Memory layout of the observation tensor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// `[N, N, 17]`
    #[default]
    ChannelsLast,
    /// `[17, N, N]`
    ChannelsFirst,
}

/// What to do when `step` receives an action outside the legal set.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum IllegalActionPolicy {
    /// Log a warning and substitute a uniformly random legal move.
    #[default]
    SubstituteRandom,
    /// Fail the step with `EnvError::IllegalAction`.
    Reject,
}

/// Whose perspective step rewards are stated from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum RewardPerspective {
    /// Always from player 1, regardless of who moved last (two-ply modes).
    FixedPlayerOne,
    /// From the player who made the move (self-play).
    ActingAgent,
}

/// Environment configuration parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Board side length N (N x N intersections).
    pub board_size: usize,

    /// Fractional compensation score for the second player.
    pub komi: f32,

    /// Interaction mode for the episode.
    pub battle_mode: BattleMode,

    /// In self-play, probability of replacing the supplied action with a
    /// uniformly random legal move (exploration noise).
    pub prob_random_agent: f64,

    /// Memory layout of the observation tensor.
    pub channel_order: ChannelOrder,

    /// In eval mode, draw the opponent's move from the installed human
    /// source instead of the scripted policy.
    pub agent_vs_human: bool,

    /// Handling of illegal actions supplied to `step`.
    pub illegal_action_policy: IllegalActionPolicy,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            board_size: 6,
            komi: 7.5,
            battle_mode: BattleMode::default(),
            prob_random_agent: 0.0,
            channel_order: ChannelOrder::default(),
            agent_vs_human: false,
            illegal_action_policy: IllegalActionPolicy::default(),
        }
    }
}

/// Errors from the environment state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// `step` or `simulate` before the first `reset`.
    #[error("environment must be reset before use")]
    NotStarted,

    /// `step` after the episode reached a terminal position.
    #[error("step() called on a finished episode")]
    EpisodeOver,

    /// Action outside the legal set, under the `Reject` policy or in
    /// `simulate` (which always rejects).
    #[error("action {0} is not legal in the current position")]
    IllegalAction(ActionId),
}

/// Side to move reported in a timestep. The two-ply modes return `None` as a
/// sentinel: no further alternation semantics apply to what they return, and
/// downstream search must not read a player out of it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ToPlay {
    Player(PlayerId),
    None,
}

/// Auxiliary episode information.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimestepInfo {
    /// Cumulative episode return stated from player 1's fixed perspective.
    /// Populated only on the terminal step.
    pub eval_episode_return: Option<Reward>,
}

/// The result of `reset`, `step`, or `observe`.
#[derive(Clone, Debug, PartialEq)]
pub struct Timestep {
    /// Observation tensor for the current state.
    pub obs: Observation,

    /// Mask over the `N*N + 1` action ids; the pass slot is set only when
    /// the position is terminal (and is then the sole entry).
    pub action_mask: Vec<bool>,

    /// Raw board occupancy (0 empty, 1 black, -1 white), row-major.
    pub board: Vec<i8>,

    /// Side to move after this step, or the two-ply sentinel.
    pub to_play: ToPlay,

    /// Scalar reward; perspective depends on the battle mode.
    pub reward: Reward,

    /// True once the episode reached a terminal position.
    pub done: bool,

    pub info: TimestepInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_shape_is_checked() {
        let obs = Observation::new(vec![0.0; 12], vec![2, 2, 3]);
        assert_eq!(obs.shape(), &[2, 2, 3]);
        assert_eq!(obs.ndim(), 3);
        assert_eq!(obs.as_slice().len(), 12);
    }

    #[test]
    #[should_panic]
    fn observation_rejects_mismatched_shape() {
        let _ = Observation::new(vec![0.0; 5], vec![2, 3]);
    }

    #[test]
    fn default_config_values() {
        let config = EnvConfig::default();
        assert_eq!(config.battle_mode, BattleMode::SelfPlay);
        assert_eq!(config.channel_order, ChannelOrder::ChannelsLast);
        assert_eq!(
            config.illegal_action_policy,
            IllegalActionPolicy::SubstituteRandom
        );
        assert_eq!(config.prob_random_agent, 0.0);
        assert!(!config.agent_vs_human);
    }
}
