//! Environment core: the reset/step/observe/simulate state machine.

use go_engine::{self, Cell, Move, MoveError, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::agent::{OpponentPolicy, RandomPolicy};
use crate::encoder::ObservationEncoder;
use crate::history::BoardHistoryBuffer;
use crate::outcome::OutcomeResolver;
use crate::turn::{PlayerId, TurnCoordinator};
use crate::types::{
    ActionId, BattleMode, EnvConfig, EnvError, IllegalActionPolicy, RewardPerspective, Timestep,
    TimestepInfo, ToPlay,
};

/// The rule-engine capability the environment is built against: legal
/// placements, move application, terminal detection, and the raw signed
/// result of a finished game.
pub trait RuleEngine {
    /// Legal stone placements for the side to move, as flat indices.
    fn legal_moves(&self, position: &Position) -> Vec<ActionId>;

    /// Apply an action id (the pass sentinel `N*N` maps to a pass) and
    /// return the resulting position.
    fn apply_move(&self, position: &Position, action: ActionId) -> Result<Position, MoveError>;

    fn is_terminal(&self, position: &Position) -> bool;

    /// Raw result of a finished game: +1 black wins, -1 white wins, 0 draw.
    fn result(&self, position: &Position) -> i8;
}

/// The default adapter over the `go-engine` crate.
#[derive(Copy, Clone, Debug, Default)]
pub struct GoRules;

impl RuleEngine for GoRules {
    fn legal_moves(&self, position: &Position) -> Vec<ActionId> {
        go_engine::legal_moves(position)
    }

    fn apply_move(&self, position: &Position, action: ActionId) -> Result<Position, MoveError> {
        let mv = if action == position.size() * position.size() {
            Move::Pass
        } else {
            Move::Play(action)
        };
        go_engine::play_move(position, mv)
    }

    fn is_terminal(&self, position: &Position) -> bool {
        go_engine::is_game_over(position)
    }

    fn result(&self, position: &Position) -> i8 {
        go_engine::game_result(position)
    }
}

/// Episode lifecycle of the environment state machine.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum EpisodeState {
    Uninitialized,
    InProgress,
    Terminal,
}

/// Go RL environment.
///
/// Owns the position, history buffer, and turn state of one episode.
/// `simulate` deep-clones the whole environment, so independent lookahead
/// branches never alias live state.
#[derive(Clone)]
pub struct GoEnv<R: RuleEngine> {
    rules: R,
    config: EnvConfig,
    encoder: ObservationEncoder,
    resolver: OutcomeResolver,

    position: Position,
    history: BoardHistoryBuffer,
    turn: TurnCoordinator,
    state: EpisodeState,
    next_legal: Vec<ActionId>,
    cumulative: [f32; 2],
    start_player_index: usize,

    rng: StdRng,
    opponent: Box<dyn OpponentPolicy>,
    human: Option<Box<dyn OpponentPolicy>>,
}

impl GoEnv<GoRules> {
    /// Environment over the default Go rules adapter.
    pub fn new(config: EnvConfig) -> Self {
        Self::with_rules(config, GoRules)
    }
}

impl<R: RuleEngine> GoEnv<R> {
    /// Environment over a caller-supplied rule engine.
    ///
    /// Not initialized until `reset` is called.
    pub fn with_rules(config: EnvConfig, rules: R) -> Self {
        let n = config.board_size;
        // Self-play rewards are stated from the mover; the two-ply modes
        // report from player 1's fixed perspective.
        let perspective = match config.battle_mode {
            BattleMode::SelfPlay => RewardPerspective::ActingAgent,
            BattleMode::PlayWithBot | BattleMode::Eval => RewardPerspective::FixedPlayerOne,
        };
        Self {
            rules,
            encoder: ObservationEncoder::new(n, config.channel_order),
            resolver: OutcomeResolver::new(perspective),
            position: Position::empty(n, config.komi),
            history: BoardHistoryBuffer::new(n),
            turn: TurnCoordinator::start(0),
            state: EpisodeState::Uninitialized,
            next_legal: Vec::new(),
            cumulative: [0.0; 2],
            start_player_index: 0,
            rng: StdRng::seed_from_u64(0),
            opponent: Box::new(RandomPolicy::new()),
            human: None,
            config,
        }
    }

    /// Replace the scripted opponent policy (two-ply modes).
    pub fn set_opponent(&mut self, policy: Box<dyn OpponentPolicy>) {
        self.opponent = policy;
    }

    /// Install the blocking human move source used in eval mode when
    /// `agent_vs_human` is set.
    pub fn set_human_source(&mut self, source: Box<dyn OpponentPolicy>) {
        self.human = Some(source);
    }

    /// Reset the per-instance random generator to a known state.
    pub fn seed(&mut self, value: u64) {
        self.rng = StdRng::seed_from_u64(value);
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn board(&self) -> &[Cell] {
        self.position.board()
    }

    /// Player whose turn it is.
    pub fn current_player(&self) -> PlayerId {
        self.turn.current()
    }

    pub fn is_done(&self) -> bool {
        self.state == EpisodeState::Terminal
    }

    /// Current legal action ids. Once the episode is terminal this is the
    /// pass sentinel alone.
    pub fn legal_actions(&self) -> &[ActionId] {
        &self.next_legal
    }

    /// Per-player rewards accrued this episode, indexed by `PlayerId::index`.
    pub fn cumulative_rewards(&self) -> [f32; 2] {
        self.cumulative
    }

    /// Starting player index of the current episode.
    pub fn start_player_index(&self) -> usize {
        self.start_player_index
    }

    /// The reserved pass / terminal-sentinel action id (`N*N`).
    pub fn pass_action(&self) -> ActionId {
        self.config.board_size * self.config.board_size
    }

    pub fn coord_to_action(&self, row: usize, col: usize) -> ActionId {
        row * self.config.board_size + col
    }

    pub fn action_to_coord(&self, action: ActionId) -> (usize, usize) {
        (action / self.config.board_size, action % self.config.board_size)
    }

    pub fn action_to_string(&self, action: ActionId) -> String {
        if action == self.pass_action() {
            "Pass".to_string()
        } else {
            let (row, col) = self.action_to_coord(action);
            format!("Play row {}, column {}", row + 1, col + 1)
        }
    }

    /// Uniformly random action from the current legal set.
    pub fn random_action(&mut self) -> ActionId {
        self.next_legal[self.rng.random_range(0..self.next_legal.len())]
    }

    /// The scripted opponent policy's choice for the current position.
    pub fn bot_action(&mut self) -> ActionId {
        self.opponent
            .select_action(&self.position, &self.next_legal, &mut self.rng)
    }

    /// Start a fresh episode. `start_player_index` 0 gives player 1 the
    /// first move, 1 gives it to player 2. A supplied board array becomes
    /// the initial position; the history buffer starts zeroed either way.
    ///
    /// Panics if `start_player_index` is not 0 or 1, or if a supplied board
    /// does not have exactly `board_size * board_size` cells.
    pub fn reset(&mut self, start_player_index: usize, initial_board: Option<Vec<Cell>>) -> Timestep {
        let n = self.config.board_size;
        self.start_player_index = start_player_index;
        self.turn = TurnCoordinator::start(start_player_index);

        let board = initial_board.unwrap_or_else(|| vec![go_engine::EMPTY; n * n]);
        assert_eq!(
            board.len(),
            n * n,
            "initial board must have {} cells for a {n}x{n} board",
            n * n
        );
        self.position = Position::from_board(board, self.config.komi, self.turn.current().stone());
        self.history.reset();
        self.cumulative = [0.0; 2];

        let status = self.refresh_legal_actions();
        self.state = if status.is_some() {
            EpisodeState::Terminal
        } else {
            EpisodeState::InProgress
        };

        self.timestep(
            0.0,
            self.is_done(),
            TimestepInfo::default(),
            ToPlay::Player(self.turn.current()),
        )
    }

    /// Rebuild the observation for the current state without mutating it.
    ///
    /// Usable in any state, unlike `step`/`simulate`: before the first
    /// `reset` it reflects the empty pre-episode position with an all-false
    /// action mask.
    pub fn observe(&self) -> Timestep {
        self.timestep(
            0.0,
            self.is_done(),
            TimestepInfo::default(),
            ToPlay::Player(self.turn.current()),
        )
    }

    /// Advance the environment by one step.
    ///
    /// Self-play applies the single supplied action (possibly replaced by
    /// exploration noise). The two-ply modes apply the primary agent's
    /// action and, if the game continues, immediately answer with the
    /// opponent's move; their returned `to_play` is the `ToPlay::None`
    /// sentinel because no alternation semantics apply to what they return.
    pub fn step(&mut self, action: ActionId) -> Result<Timestep, EnvError> {
        match self.state {
            EpisodeState::Uninitialized => return Err(EnvError::NotStarted),
            EpisodeState::Terminal => return Err(EnvError::EpisodeOver),
            EpisodeState::InProgress => {}
        }

        match self.config.battle_mode {
            BattleMode::SelfPlay => {
                let action = if self.config.prob_random_agent > 0.0
                    && self.rng.random::<f64>() < self.config.prob_random_agent
                {
                    self.random_action()
                } else {
                    action
                };
                self.player_step(action)
            }
            BattleMode::PlayWithBot | BattleMode::Eval => {
                let mut timestep = self.player_step(action)?;
                if !timestep.done {
                    let bot_action = self.opponent_action();
                    timestep = self.player_step(bot_action)?;
                }
                timestep.to_play = ToPlay::None;
                Ok(timestep)
            }
        }
    }

    /// Fork an independent lookahead branch: deep-clone the environment and
    /// apply `action` to the clone. The calling instance is never mutated.
    ///
    /// Unlike `step`, an action outside the legal set is an error here; the
    /// sentinel pass action is likewise rejected.
    pub fn simulate(&self, action: ActionId) -> Result<Self, EnvError>
    where
        R: Clone,
    {
        match self.state {
            EpisodeState::Uninitialized => return Err(EnvError::NotStarted),
            EpisodeState::Terminal => return Err(EnvError::EpisodeOver),
            EpisodeState::InProgress => {}
        }
        if action == self.pass_action() || !self.next_legal.contains(&action) {
            return Err(EnvError::IllegalAction(action));
        }

        let mut branch = self.clone();
        branch.player_step(action)?;
        Ok(branch)
    }

    /// Apply one accepted ply: validate (or substitute), play the move, push
    /// history planes, advance the turn, refresh the legal set, and resolve
    /// the outcome if the position is terminal.
    fn player_step(&mut self, action: ActionId) -> Result<Timestep, EnvError> {
        let action = if self.next_legal.contains(&action) {
            action
        } else {
            match self.config.illegal_action_policy {
                IllegalActionPolicy::Reject => return Err(EnvError::IllegalAction(action)),
                IllegalActionPolicy::SubstituteRandom => {
                    let substitute = self.random_action();
                    log::warn!(
                        "illegal action {action}; legal actions are {:?}; substituting random action {substitute}",
                        self.next_legal
                    );
                    substitute
                }
            }
        };

        let mover = self.turn.current();
        self.position = self
            .rules
            .apply_move(&self.position, action)
            .expect("legal actions must be applicable by the rule engine");

        let (mover_plane, opponent_plane) = self
            .encoder
            .occupancy_planes(&self.position, mover.stone());
        self.history.push(mover_plane, opponent_plane);
        self.turn.advance();

        let status = self.refresh_legal_actions();
        let mut reward_of_mover = 0.0;
        let mut info = TimestepInfo::default();
        if let Some(raw_result) = status {
            self.state = EpisodeState::Terminal;
            let (p1, p2) = OutcomeResolver::per_player_rewards(raw_result);
            self.cumulative[0] += p1;
            self.cumulative[1] += p2;
            reward_of_mover = match mover {
                PlayerId::One => p1,
                PlayerId::Two => p2,
            };
            info.eval_episode_return = Some(OutcomeResolver::episode_return(reward_of_mover, mover));
        }

        let reward = self.resolver.step_reward(reward_of_mover, mover);
        Ok(self.timestep(
            reward,
            self.is_done(),
            info,
            ToPlay::Player(self.turn.current()),
        ))
    }

    /// Recompute the legal-action set; returns `Some(raw_result)` when the
    /// position is terminal (the legal set then collapses to the sentinel).
    fn refresh_legal_actions(&mut self) -> Option<i8> {
        let status = self.resolver.check_terminal(&self.rules, &self.position);
        if status.is_over {
            self.next_legal = vec![self.pass_action()];
        } else {
            self.next_legal = self.rules.legal_moves(&self.position);
        }
        status.raw_result
    }

    /// Opponent move for the two-ply modes: the human source in eval mode
    /// when configured, otherwise the scripted policy.
    fn opponent_action(&mut self) -> ActionId {
        if self.config.battle_mode == BattleMode::Eval && self.config.agent_vs_human {
            if let Some(human) = self.human.as_mut() {
                return human.select_action(&self.position, &self.next_legal, &mut self.rng);
            }
            log::warn!("agent_vs_human is set but no human move source is installed; using the scripted policy");
        }
        self.opponent
            .select_action(&self.position, &self.next_legal, &mut self.rng)
    }

    fn timestep(&self, reward: f32, done: bool, info: TimestepInfo, to_play: ToPlay) -> Timestep {
        Timestep {
            obs: self
                .encoder
                .encode(&self.history.snapshot(), self.turn.current()),
            action_mask: self.encoder.action_mask(&self.next_legal),
            board: self.position.board().to_vec(),
            to_play,
            reward,
            done,
            info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChannelOrder, Observation};
    use go_engine::{BLACK, EMPTY, WHITE};

    fn config(n: usize) -> EnvConfig {
        EnvConfig {
            board_size: n,
            ..Default::default()
        }
    }

    fn stone_count(board: &[i8]) -> usize {
        board.iter().filter(|&&c| c != EMPTY).count()
    }

    fn mask_count(mask: &[bool]) -> usize {
        mask.iter().filter(|&&b| b).count()
    }

    #[test]
    fn test_reset_initial_observation() {
        let mut env = GoEnv::new(config(5));
        let step = env.reset(0, None);

        assert!(!step.done);
        assert_eq!(step.obs.shape(), &[5, 5, 17]);
        assert_eq!(step.to_play, ToPlay::Player(PlayerId::One));
        assert_eq!(step.action_mask.len(), 26);
        assert_eq!(mask_count(&step.action_mask), 25);
        assert!(!step.action_mask[25], "pass slot is illegal pre-terminal");
        // Zeroed history and player-one indicator: the tensor is all zeros.
        assert!(step.obs.as_slice().iter().all(|&v| v == 0.0));
        assert_eq!(step.reward, 0.0);
        assert_eq!(step.info.eval_episode_return, None);
    }

    #[test]
    fn test_reset_start_player_two_sets_indicator() {
        let mut env = GoEnv::new(config(5));
        let step = env.reset(1, None);
        assert_eq!(step.to_play, ToPlay::Player(PlayerId::Two));
        // Only the indicator plane is set: one 1.0 per cell.
        let sum: f32 = step.obs.as_slice().iter().sum();
        assert_eq!(sum, 25.0);
    }

    #[test]
    fn test_center_move_on_empty_5x5() {
        let mut env = GoEnv::new(config(5));
        let before = env.reset(0, None);
        let legal_before = mask_count(&before.action_mask);

        let step = env.step(12).expect("center move is legal");

        assert_eq!(step.board[12], BLACK);
        assert_eq!(stone_count(&step.board), 1);
        assert_eq!(step.to_play, ToPlay::Player(PlayerId::Two));
        // No capture possible on an empty board: exactly one placement gone.
        assert_eq!(mask_count(&step.action_mask), legal_before - 1);
        assert!(!step.action_mask[12]);
        assert!(!step.done);
    }

    #[test]
    fn test_observation_contains_pushed_history_pair() {
        let mut env = GoEnv::new(config(5));
        env.reset(0, None);
        let step = env.step(12).unwrap();

        // Channels-last: plane 0 is the mover's stones from the ply just
        // played, plane 16 the side-to-move indicator (player 2 -> 1.0).
        let data = step.obs.as_slice();
        assert_eq!(data[12 * 17], 1.0);
        assert_eq!(data[12 * 17 + 1], 0.0);
        assert_eq!(data[0 * 17 + 16], 1.0);
    }

    #[test]
    fn test_channels_first_layout() {
        let cfg = EnvConfig {
            board_size: 5,
            channel_order: ChannelOrder::ChannelsFirst,
            ..Default::default()
        };
        let mut env = GoEnv::new(cfg);
        env.reset(0, None);
        let step = env.step(12).unwrap();

        assert_eq!(step.obs.shape(), &[17, 5, 5]);
        let data = step.obs.as_slice();
        assert_eq!(data[12], 1.0); // plane 0, cell 12
        assert!(data[16 * 25..].iter().all(|&v| v == 1.0)); // indicator plane
    }

    #[test]
    fn test_turn_alternation_parity() {
        let mut env = GoEnv::new(config(5));
        env.reset(0, None);
        for ply in 1..=6 {
            let action = env.random_action();
            let step = env.step(action).unwrap();
            if step.done {
                break;
            }
            let expected = if ply % 2 == 1 { PlayerId::Two } else { PlayerId::One };
            assert_eq!(step.to_play, ToPlay::Player(expected), "after {ply} plies");
        }
    }

    #[test]
    fn test_illegal_action_substituted_with_warning() {
        let mut env = GoEnv::new(config(5));
        env.reset(0, None);
        env.seed(3);
        env.step(12).unwrap();

        // 12 is now occupied; the environment substitutes a random legal
        // move instead of failing.
        let step = env.step(12).expect("substitution policy never errors");
        assert_eq!(step.board[12], BLACK, "occupied stone is untouched");
        assert_eq!(stone_count(&step.board), 2);
        assert_eq!(step.board.iter().filter(|&&c| c == WHITE).count(), 1);
    }

    #[test]
    fn test_illegal_action_rejected_under_strict_policy() {
        let cfg = EnvConfig {
            board_size: 5,
            illegal_action_policy: IllegalActionPolicy::Reject,
            ..Default::default()
        };
        let mut env = GoEnv::new(cfg);
        env.reset(0, None);
        env.step(12).unwrap();

        assert_eq!(env.step(12), Err(EnvError::IllegalAction(12)));
        // A rejected attempt must not flip the turn.
        assert_eq!(env.current_player(), PlayerId::Two);
    }

    #[test]
    fn test_step_before_reset_fails() {
        let mut env = GoEnv::new(config(5));
        assert_eq!(env.step(0), Err(EnvError::NotStarted));
        assert_eq!(env.simulate(0).err(), Some(EnvError::NotStarted));
    }

    #[test]
    fn test_step_after_terminal_fails() {
        let mut env = GoEnv::new(config(5));
        env.reset(0, None);
        env.seed(11);

        let mut done = false;
        for _ in 0..60 {
            let action = env.random_action();
            let step = env.step(action).unwrap();
            if step.done {
                done = true;
                break;
            }
        }
        assert!(done, "random self-play must hit the ply cap or run out of moves");
        assert_eq!(env.step(0), Err(EnvError::EpisodeOver));
    }

    #[test]
    fn test_terminal_mask_is_sentinel_only() {
        let mut env = GoEnv::new(config(5));
        env.reset(0, None);
        env.seed(5);

        loop {
            let action = env.random_action();
            let step = env.step(action).unwrap();
            assert!(
                mask_count(&step.action_mask) >= 1,
                "mask must never be empty in a reachable state"
            );
            if step.done {
                assert_eq!(mask_count(&step.action_mask), 1);
                assert!(step.action_mask[env.pass_action()]);
                assert!(step.info.eval_episode_return.is_some());
                let ret = step.info.eval_episode_return.unwrap();
                assert!([-1.0, 0.0, 1.0].contains(&ret));
                break;
            }
        }
    }

    #[test]
    fn test_history_depth_is_constant_all_episode() {
        let mut env = GoEnv::new(config(5));
        let mut step = env.reset(0, None);
        env.seed(9);
        let expected_len: usize = step.obs.shape().iter().product();
        while !step.done {
            assert_eq!(step.obs.as_slice().len(), expected_len);
            let action = env.random_action();
            step = env.step(action).unwrap();
        }
        assert_eq!(step.obs.as_slice().len(), expected_len);
    }

    #[test]
    fn test_reward_is_zero_sum_at_terminal() {
        let mut env = GoEnv::new(config(5));
        env.reset(0, None);
        env.seed(21);

        loop {
            let action = env.random_action();
            let step = env.step(action).unwrap();
            if !step.done {
                assert_eq!(step.reward, 0.0);
                continue;
            }
            let [p1, p2] = env.cumulative_rewards();
            assert_eq!(p1, -p2);
            break;
        }
    }

    #[test]
    fn test_simulate_leaves_source_unchanged() {
        let mut env = GoEnv::new(config(5));
        env.reset(0, None);

        let branch = env.simulate(12).expect("legal lookahead");

        assert_eq!(env.board()[12], EMPTY);
        assert_eq!(env.current_player(), PlayerId::One);
        assert!(!env.is_done());

        assert_eq!(branch.board()[12], BLACK);
        assert_eq!(branch.current_player(), PlayerId::Two);
        assert_eq!(branch.legal_actions().len(), env.legal_actions().len() - 1);
    }

    #[test]
    fn test_simulate_matches_step() {
        let mut env_a = GoEnv::new(config(5));
        env_a.reset(0, None);
        env_a.seed(17);
        let mut env_b = GoEnv::new(config(5));
        env_b.reset(0, None);
        env_b.seed(17);

        let branch = env_a.simulate(12).unwrap();
        let step = env_b.step(12).unwrap();

        assert_eq!(branch.board(), step.board.as_slice());
        assert_eq!(branch.observe().obs, step.obs);
        assert_eq!(branch.legal_actions(), env_b.legal_actions());

        // Simulating twice from the same source gives identical branches.
        let again = env_a.simulate(12).unwrap();
        assert_eq!(again.board(), branch.board());
    }

    #[test]
    fn test_simulate_rejects_illegal_and_pass() {
        let mut env = GoEnv::new(config(5));
        env.reset(0, None);
        env.step(12).unwrap();

        assert_eq!(env.simulate(12).err(), Some(EnvError::IllegalAction(12)));
        let pass = env.pass_action();
        assert_eq!(env.simulate(pass).err(), Some(EnvError::IllegalAction(pass)));
    }

    #[test]
    fn test_play_with_bot_returns_sentinel_and_two_plies() {
        let cfg = EnvConfig {
            board_size: 5,
            battle_mode: BattleMode::PlayWithBot,
            ..Default::default()
        };
        let mut env = GoEnv::new(cfg);
        env.reset(0, None);
        env.seed(2);

        let step = env.step(12).unwrap();

        assert_eq!(step.to_play, ToPlay::None);
        assert_eq!(stone_count(&step.board), 2);
        assert_eq!(step.board[12], BLACK);
        // Control is back with the primary agent.
        assert_eq!(env.current_player(), PlayerId::One);
    }

    #[test]
    fn test_play_with_bot_reward_is_player_one_perspective() {
        let cfg = EnvConfig {
            board_size: 5,
            battle_mode: BattleMode::PlayWithBot,
            ..Default::default()
        };
        let mut env = GoEnv::new(cfg);
        env.reset(0, None);
        env.seed(13);

        loop {
            let action = if env.legal_actions().is_empty() {
                break;
            } else {
                env.legal_actions()[0]
            };
            let step = env.step(action).unwrap();
            if step.done {
                let ret = step.info.eval_episode_return.unwrap();
                assert_eq!(step.reward, ret, "two-ply reward is stated from player 1");
                break;
            }
            assert_eq!(step.reward, 0.0);
        }
    }

    // Deterministic stand-ins for the eval-mode move sources: one always
    // picks the lowest legal id, the other the highest, so a single reply
    // reveals which source was consulted.
    #[derive(Clone)]
    struct LowestLegal;

    impl OpponentPolicy for LowestLegal {
        fn select_action(&mut self, _position: &Position, legal: &[ActionId], _rng: &mut StdRng) -> ActionId {
            legal[0]
        }
        fn boxed_clone(&self) -> Box<dyn OpponentPolicy> {
            Box::new(self.clone())
        }
    }

    #[derive(Clone)]
    struct HighestLegal;

    impl OpponentPolicy for HighestLegal {
        fn select_action(&mut self, _position: &Position, legal: &[ActionId], _rng: &mut StdRng) -> ActionId {
            legal[legal.len() - 1]
        }
        fn boxed_clone(&self) -> Box<dyn OpponentPolicy> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn test_eval_consults_installed_human_source() {
        let cfg = EnvConfig {
            board_size: 5,
            battle_mode: BattleMode::Eval,
            agent_vs_human: true,
            ..Default::default()
        };
        let mut env = GoEnv::new(cfg);
        env.set_opponent(Box::new(LowestLegal));
        env.set_human_source(Box::new(HighestLegal));
        env.reset(0, None);

        let step = env.step(12).unwrap();

        // The reply came from the human source (highest legal id, the far
        // corner), not the scripted opponent (lowest, index 0).
        assert_eq!(step.board[24], WHITE);
        assert_eq!(step.board[0], EMPTY);
        assert_eq!(step.to_play, ToPlay::None);
    }

    #[test]
    fn test_eval_falls_back_to_scripted_policy_without_human_source() {
        let cfg = EnvConfig {
            board_size: 5,
            battle_mode: BattleMode::Eval,
            agent_vs_human: true,
            ..Default::default()
        };
        let mut env = GoEnv::new(cfg);
        env.set_opponent(Box::new(LowestLegal));
        env.reset(0, None);

        let step = env.step(12).unwrap();

        // No human source installed: the scripted policy answers instead.
        assert_eq!(step.board[0], WHITE);
    }

    #[test]
    fn test_self_play_exploration_noise_keeps_moves_legal() {
        let cfg = EnvConfig {
            board_size: 5,
            prob_random_agent: 1.0,
            ..Default::default()
        };
        let mut env = GoEnv::new(cfg);
        env.reset(0, None);
        env.seed(4);

        // Supplying the same (eventually occupied) action every step works
        // because exploration noise replaces it before validation.
        for _ in 0..10 {
            let step = env.step(0).unwrap();
            if step.done {
                break;
            }
        }
    }

    #[test]
    fn test_seeded_episodes_are_reproducible() {
        let run = |seed: u64| -> (Vec<i8>, Vec<f32>) {
            let mut env = GoEnv::new(config(5));
            let mut step = env.reset(0, None);
            env.seed(seed);
            let mut rewards = Vec::new();
            while !step.done {
                let action = env.random_action();
                step = env.step(action).unwrap();
                rewards.push(step.reward);
            }
            (step.board, rewards)
        };

        let (board_a, rewards_a) = run(99);
        let (board_b, rewards_b) = run(99);
        assert_eq!(board_a, board_b);
        assert_eq!(rewards_a, rewards_b);

        let (board_c, _) = run(100);
        // Different seeds almost surely diverge on a 5x5 board.
        assert_ne!(board_a, board_c);
    }

    #[test]
    fn test_reset_with_initial_board() {
        let mut env = GoEnv::new(config(5));
        let mut board = vec![EMPTY; 25];
        board[12] = BLACK;
        board[13] = WHITE;
        let step = env.reset(0, Some(board));

        assert!(!step.done);
        assert_eq!(step.board[12], BLACK);
        assert_eq!(step.board[13], WHITE);
        // Occupied points are not legal; history restarts zeroed.
        assert!(!step.action_mask[12]);
        assert!(!step.action_mask[13]);
        assert_eq!(mask_count(&step.action_mask), 23);
    }

    #[test]
    fn test_observe_is_pure() {
        let mut env = GoEnv::new(config(5));
        env.reset(0, None);
        env.step(12).unwrap();

        let a = env.observe();
        let b = env.observe();
        assert_eq!(a, b);
        assert_eq!(env.board()[12], BLACK);
    }

    #[test]
    fn test_observe_before_reset_reflects_empty_state() {
        let env = GoEnv::new(config(5));
        let ts = env.observe();
        assert!(!ts.done);
        assert!(ts.action_mask.iter().all(|&b| !b));
        assert!(ts.board.iter().all(|&c| c == EMPTY));
        // step/simulate still require a reset first.
        let mut env = env;
        assert_eq!(env.step(0), Err(EnvError::NotStarted));
    }

    #[test]
    #[should_panic(expected = "initial board")]
    fn test_reset_rejects_mis_sized_board() {
        let mut env = GoEnv::new(config(5));
        env.reset(0, Some(vec![EMPTY; 16]));
    }

    #[test]
    #[should_panic(expected = "player index")]
    fn test_reset_rejects_bad_start_index() {
        let mut env = GoEnv::new(config(5));
        env.reset(2, None);
    }

    #[test]
    fn test_custom_rule_engine_is_pluggable() {
        // A stub engine that ends the game after a fixed number of plies,
        // always declaring a draw.
        #[derive(Clone)]
        struct ShortGame;

        impl RuleEngine for ShortGame {
            fn legal_moves(&self, position: &Position) -> Vec<ActionId> {
                go_engine::legal_moves(position)
            }
            fn apply_move(&self, position: &Position, action: ActionId) -> Result<Position, MoveError> {
                go_engine::play_move(position, Move::Play(action))
            }
            fn is_terminal(&self, position: &Position) -> bool {
                position.move_count() >= 2
            }
            fn result(&self, _position: &Position) -> i8 {
                0
            }
        }

        let mut env = GoEnv::with_rules(config(5), ShortGame);
        env.reset(0, None);
        env.step(0).unwrap();
        let step = env.step(1).unwrap();

        assert!(step.done);
        assert_eq!(step.reward, 0.0);
        assert_eq!(step.info.eval_episode_return, Some(0.0));
    }

    #[test]
    fn test_zero_observation_helper_shape() {
        let obs = Observation::zeros(&[5, 5, 17]);
        assert_eq!(obs.as_slice().len(), 425);
    }
}
