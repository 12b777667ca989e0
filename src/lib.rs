//! Go Rules Engine and RL Environment
//!
//! A two-player Markov game environment for the game of Go, designed for RL
//! training with AlphaZero-style stacked-history observations.
//!
//! This crate re-exports the engine and rl-env crates for convenience.

pub mod display;

pub use go_engine::*;
pub use go_rl_env as rl_env;
