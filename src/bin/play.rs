//! Interactive CLI to play Go against the environment's agent
//!
//! Usage: cargo run --bin play [--board-size 9] [--komi 7.5]

use std::io::{self, Write};

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use gozero::display::{display_board, format_result, BOLD, DIM, RESET};
use gozero::rl_env::{
    ActionId, Agent, AgentInput, BattleMode, EnvConfig, GoEnv, OpponentPolicy, RandomAgent,
};
use gozero::Position;

/// Play Go against the built-in agent
#[derive(Parser, Debug)]
#[command(name = "play")]
#[command(about = "Play Go against the environment's agent", long_about = None)]
struct Args {
    /// Board side length
    #[arg(long, default_value_t = 9)]
    board_size: usize,

    /// Komi (compensation points for white)
    #[arg(long, default_value_t = 7.5)]
    komi: f32,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Blocking human move source: renders the position and prompts until a
/// legal coordinate comes in. Quits the process on 'q' or EOF.
#[derive(Clone)]
struct HumanPolicy {
    board_size: usize,
}

impl HumanPolicy {
    fn read_action(&self, position: &Position, legal: &[ActionId]) -> ActionId {
        display_board(position.board(), self.board_size);
        println!("{BOLD}Your move (White).{RESET} Enter 'row col', e.g. '3 4'.");

        loop {
            print!("\n{BOLD}>{RESET} ");
            io::stdout().flush().ok();

            let mut input = String::new();
            match io::stdin().read_line(&mut input) {
                Ok(0) => {
                    // EOF
                    println!("\nGoodbye!");
                    std::process::exit(0);
                }
                Err(_) => {
                    println!("Error reading input, try again.");
                    continue;
                }
                Ok(_) => {}
            }

            let input = input.trim();
            if input == "q" || input == "quit" {
                println!("Goodbye!");
                std::process::exit(0);
            }

            let mut parts = input.split_whitespace();
            let coords = (
                parts.next().and_then(|s| s.parse::<usize>().ok()),
                parts.next().and_then(|s| s.parse::<usize>().ok()),
            );
            match coords {
                (Some(row), Some(col))
                    if (1..=self.board_size).contains(&row)
                        && (1..=self.board_size).contains(&col) =>
                {
                    let action = (row - 1) * self.board_size + (col - 1);
                    if legal.contains(&action) {
                        return action;
                    }
                    println!("That point is not a legal move (occupied, suicide, or ko).");
                }
                _ => println!(
                    "Please enter two numbers 1-{} (or 'q' to quit)",
                    self.board_size
                ),
            }
        }
    }
}

impl OpponentPolicy for HumanPolicy {
    fn select_action(&mut self, position: &Position, legal: &[ActionId], _rng: &mut StdRng) -> ActionId {
        self.read_action(position, legal)
    }

    fn boxed_clone(&self) -> Box<dyn OpponentPolicy> {
        Box::new(self.clone())
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = EnvConfig {
        board_size: args.board_size,
        komi: args.komi,
        battle_mode: BattleMode::Eval,
        agent_vs_human: true,
        ..Default::default()
    };

    let mut env = GoEnv::new(config);
    env.set_human_source(Box::new(HumanPolicy {
        board_size: args.board_size,
    }));
    env.seed(args.seed);

    let mut agent = RandomAgent::new();
    let mut rng = StdRng::seed_from_u64(args.seed);

    println!("\n{BOLD}Welcome to Go!{RESET}");
    println!(
        "Board {0}x{0}, komi {1}. The computer plays Black (X), you play White (O).",
        args.board_size, args.komi
    );
    println!("Type 'q' to quit at any time.");

    let mut step = env.reset(0, None);
    while !step.done {
        let input = AgentInput {
            observation: &step.obs,
            action_mask: &step.action_mask,
            to_play: step.to_play,
        };
        let action = agent.select_action(&input, &mut rng);
        println!("\n{DIM}Computer plays:{RESET} {}", env.action_to_string(action));

        step = env.step(action).expect("agent actions come from the mask");
    }

    display_board(&step.board, args.board_size);
    println!("{BOLD}═══════════════════════════════════════{RESET}");
    println!("{BOLD}                GAME OVER{RESET}");
    println!("{BOLD}═══════════════════════════════════════{RESET}");

    // eval_episode_return is stated from Black's (the computer's) side.
    let outcome = step.info.eval_episode_return.unwrap_or(0.0);
    println!("Result: {}", format_result(outcome as i8));
    if outcome < 0.0 {
        println!("\n{BOLD}YOU WIN!{RESET}");
    } else if outcome > 0.0 {
        println!("\n{DIM}The computer wins. Better luck next time!{RESET}");
    } else {
        println!("\n{BOLD}It's a draw!{RESET}");
    }
}
