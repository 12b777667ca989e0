//! Action-selection APIs: scripted opponents and episode-driving agents.

use go_engine::Position;
use rand::rngs::StdRng;
use rand::Rng;

use crate::types::{ActionId, Observation, ToPlay};

/// A move source for the non-primary side in the two-ply battle modes:
/// a scripted bot policy or a blocking human input collaborator.
///
/// Implementations must return an id from `legal`.
pub trait OpponentPolicy {
    fn select_action(&mut self, position: &Position, legal: &[ActionId], rng: &mut StdRng) -> ActionId;

    /// Clone through the trait object (the environment itself is clonable
    /// for lookahead branching).
    fn boxed_clone(&self) -> Box<dyn OpponentPolicy>;
}

impl Clone for Box<dyn OpponentPolicy> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// Default scripted opponent: uniformly random legal move.
#[derive(Clone, Debug, Default)]
pub struct RandomPolicy;

impl RandomPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl OpponentPolicy for RandomPolicy {
    fn select_action(&mut self, _position: &Position, legal: &[ActionId], rng: &mut StdRng) -> ActionId {
        assert!(!legal.is_empty(), "no legal actions available for the opponent");
        legal[rng.random_range(0..legal.len())]
    }

    fn boxed_clone(&self) -> Box<dyn OpponentPolicy> {
        Box::new(self.clone())
    }
}

/// Inputs provided to an agent when selecting an action
pub struct AgentInput<'a> {
    /// Observation tensor for the state the agent acts in
    pub observation: &'a Observation,

    /// Mask over action ids: `action_mask[id] == true` if the action is legal
    pub action_mask: &'a [bool],

    /// Side to move (or the two-ply sentinel)
    pub to_play: ToPlay,
}

/// Trait for anything that drives the primary side of an episode.
pub trait Agent {
    /// Choose a legal action given an observation and legal-action mask.
    /// Must only return ids for which `action_mask[id] == true`.
    fn select_action(&mut self, input: &AgentInput, rng: &mut impl Rng) -> ActionId;
}

/// Agent that uniformly samples from the legal-action mask.
#[derive(Clone, Debug, Default)]
pub struct RandomAgent;

impl RandomAgent {
    pub fn new() -> Self {
        Self
    }
}

impl Agent for RandomAgent {
    fn select_action(&mut self, input: &AgentInput, rng: &mut impl Rng) -> ActionId {
        let legal_ids: Vec<ActionId> = input
            .action_mask
            .iter()
            .enumerate()
            .filter(|(_, &legal)| legal)
            .map(|(id, _)| id)
            .collect();

        assert!(!legal_ids.is_empty(), "no legal actions available for agent");

        legal_ids[rng.random_range(0..legal_ids.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::GoEnv;
    use crate::types::EnvConfig;
    use rand::SeedableRng;

    #[test]
    fn random_agent_selects_legal_actions() {
        let config = EnvConfig {
            board_size: 5,
            ..Default::default()
        };
        let mut env = GoEnv::new(config);
        let step = env.reset(0, None);

        let mut agent = RandomAgent::new();
        let mut rng = StdRng::seed_from_u64(42);
        let input = AgentInput {
            observation: &step.obs,
            action_mask: &step.action_mask,
            to_play: step.to_play,
        };

        for _ in 0..100 {
            let action = agent.select_action(&input, &mut rng);
            assert!(step.action_mask[action]);
        }
    }

    #[test]
    fn random_policy_stays_in_legal_set() {
        let pos = Position::empty(5, 7.5);
        let legal = vec![3, 7, 11];
        let mut policy = RandomPolicy::new();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let action = policy.select_action(&pos, &legal, &mut rng);
            assert!(legal.contains(&action));
        }
    }

    #[test]
    fn boxed_policy_is_clonable() {
        let boxed: Box<dyn OpponentPolicy> = Box::new(RandomPolicy::new());
        let mut copy = boxed.clone();
        let pos = Position::empty(5, 7.5);
        let mut rng = StdRng::seed_from_u64(1);
        let action = copy.select_action(&pos, &[2], &mut rng);
        assert_eq!(action, 2);
    }
}
