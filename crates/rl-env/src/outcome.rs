//! Terminal detection and reward-sign conventions.

use go_engine::Position;

use crate::env::RuleEngine;
use crate::turn::PlayerId;
use crate::types::{Reward, RewardPerspective};

/// Result of a terminal check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TerminalStatus {
    pub is_over: bool,
    /// Raw engine result: +1 black (player 1) wins, -1 white (player 2)
    /// wins, 0 draw. `None` while the game is in progress.
    pub raw_result: Option<i8>,
}

/// Maps raw game results to per-player signed rewards, applying the
/// configured perspective for step rewards. Computed once per episode end;
/// the underlying outcome never changes afterwards.
#[derive(Copy, Clone, Debug)]
pub struct OutcomeResolver {
    perspective: RewardPerspective,
}

impl OutcomeResolver {
    pub fn new(perspective: RewardPerspective) -> Self {
        Self { perspective }
    }

    pub fn perspective(&self) -> RewardPerspective {
        self.perspective
    }

    /// Delegate terminality and the raw signed result to the rule engine.
    pub fn check_terminal<R: RuleEngine>(&self, rules: &R, position: &Position) -> TerminalStatus {
        if rules.is_terminal(position) {
            TerminalStatus {
                is_over: true,
                raw_result: Some(rules.result(position)),
            }
        } else {
            TerminalStatus {
                is_over: false,
                raw_result: None,
            }
        }
    }

    /// Per-player rewards for a raw result: +1 -> (+1, -1), -1 -> (-1, +1),
    /// draw -> (0, 0).
    pub fn per_player_rewards(raw_result: i8) -> (Reward, Reward) {
        match raw_result {
            1 => (1.0, -1.0),
            -1 => (-1.0, 1.0),
            _ => (0.0, 0.0),
        }
    }

    /// Step reward under this resolver's perspective, given the reward from
    /// the mover's point of view.
    pub fn step_reward(&self, reward_of_mover: Reward, mover: PlayerId) -> Reward {
        match self.perspective {
            RewardPerspective::ActingAgent => reward_of_mover,
            RewardPerspective::FixedPlayerOne => Self::episode_return(reward_of_mover, mover),
        }
    }

    /// The `eval_episode_return` reporting convention: always stated from
    /// player 1's fixed perspective regardless of who moved last.
    pub fn episode_return(reward_of_mover: Reward, mover: PlayerId) -> Reward {
        match mover {
            PlayerId::One => reward_of_mover,
            PlayerId::Two => -reward_of_mover,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::GoRules;
    use crate::types::RewardPerspective;
    use go_engine::{play_move, Move, Position};

    #[test]
    fn rewards_are_zero_sum_and_draw_is_zero() {
        for raw in [-1i8, 0, 1] {
            let (p1, p2) = OutcomeResolver::per_player_rewards(raw);
            assert_eq!(p1, -p2);
        }
        assert_eq!(OutcomeResolver::per_player_rewards(0), (0.0, 0.0));
        assert_eq!(OutcomeResolver::per_player_rewards(1), (1.0, -1.0));
        assert_eq!(OutcomeResolver::per_player_rewards(-1), (-1.0, 1.0));
    }

    #[test]
    fn episode_return_is_fixed_player_one() {
        assert_eq!(OutcomeResolver::episode_return(1.0, PlayerId::One), 1.0);
        assert_eq!(OutcomeResolver::episode_return(1.0, PlayerId::Two), -1.0);
        assert_eq!(OutcomeResolver::episode_return(-1.0, PlayerId::Two), 1.0);
    }

    #[test]
    fn step_reward_follows_perspective() {
        let acting = OutcomeResolver::new(RewardPerspective::ActingAgent);
        let fixed = OutcomeResolver::new(RewardPerspective::FixedPlayerOne);
        assert_eq!(acting.step_reward(1.0, PlayerId::Two), 1.0);
        assert_eq!(fixed.step_reward(1.0, PlayerId::Two), -1.0);
        assert_eq!(fixed.step_reward(1.0, PlayerId::One), 1.0);
    }

    #[test]
    fn terminal_check_delegates_to_engine() {
        let resolver = OutcomeResolver::new(RewardPerspective::ActingAgent);
        let rules = GoRules;

        let pos = Position::empty(5, 7.5);
        let status = resolver.check_terminal(&rules, &pos);
        assert!(!status.is_over);
        assert_eq!(status.raw_result, None);

        // Two passes end the game; empty board loses to komi for black.
        let pos = play_move(&pos, Move::Pass).unwrap();
        let pos = play_move(&pos, Move::Pass).unwrap();
        let status = resolver.check_terminal(&rules, &pos);
        assert!(status.is_over);
        assert_eq!(status.raw_result, Some(-1));
    }
}
