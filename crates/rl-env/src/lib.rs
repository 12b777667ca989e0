//! Reinforcement-learning environment for the game of Go.
//!
//! Wraps the `go-engine` rules crate behind a reset/step interface with
//! AlphaZero-style stacked-history observations, legal-action masks, and
//! three battle modes (self-play, play-with-bot, eval). Lookahead search is
//! served by `GoEnv::simulate`, which forks an independent deep clone of the
//! environment.

pub mod agent;
pub mod encoder;
pub mod env;
pub mod history;
pub mod outcome;
pub mod turn;
pub mod types;

pub use agent::{Agent, AgentInput, OpponentPolicy, RandomAgent, RandomPolicy};
pub use encoder::ObservationEncoder;
pub use env::{GoEnv, GoRules, RuleEngine};
pub use history::{BoardHistoryBuffer, Plane};
pub use outcome::{OutcomeResolver, TerminalStatus};
pub use turn::{PlayerId, TurnCoordinator};
pub use types::{
    ActionId, BattleMode, ChannelOrder, EnvConfig, EnvError, IllegalActionPolicy, Observation,
    Reward, RewardPerspective, Timestep, TimestepInfo, ToPlay, HISTORY_PLANES, OBS_CHANNELS,
};
