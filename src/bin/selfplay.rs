//! Batch self-play driver: runs seeded random episodes and prints outcome
//! statistics. Useful as a smoke test of the environment loop and as a
//! baseline for win-rate comparisons.

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use gozero::display::{format_result, BOLD, RESET};
use gozero::rl_env::{Agent, AgentInput, EnvConfig, GoEnv, RandomAgent};

/// Run random self-play episodes
#[derive(Parser, Debug)]
#[command(name = "selfplay")]
#[command(about = "Run seeded random self-play episodes", long_about = None)]
struct Args {
    /// Board side length
    #[arg(long, default_value_t = 6)]
    board_size: usize,

    /// Komi (compensation points for white)
    #[arg(long, default_value_t = 7.5)]
    komi: f32,

    /// Number of episodes to run
    #[arg(long, default_value_t = 20)]
    episodes: usize,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print every episode result instead of just the summary
    #[arg(long)]
    verbose: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = EnvConfig {
        board_size: args.board_size,
        komi: args.komi,
        ..Default::default()
    };
    let mut env = GoEnv::new(config);
    let mut agent = RandomAgent::new();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut black_wins = 0usize;
    let mut white_wins = 0usize;
    let mut draws = 0usize;
    let mut total_plies = 0usize;

    for episode in 0..args.episodes {
        // Alternate who moves first between episodes.
        let mut step = env.reset(episode % 2, None);
        env.seed(args.seed.wrapping_add(episode as u64));

        let mut plies = 0usize;
        while !step.done {
            let input = AgentInput {
                observation: &step.obs,
                action_mask: &step.action_mask,
                to_play: step.to_play,
            };
            let action = agent.select_action(&input, &mut rng);
            step = env.step(action).expect("agent actions come from the mask");
            plies += 1;
        }

        let outcome = step.info.eval_episode_return.unwrap_or(0.0) as i8;
        match outcome {
            1 => black_wins += 1,
            -1 => white_wins += 1,
            _ => draws += 1,
        }
        total_plies += plies;

        if args.verbose {
            eprintln!(
                "episode {:>3}: {:>3} plies, {}",
                episode + 1,
                plies,
                format_result(outcome)
            );
        }
    }

    println!("\n{BOLD}=== SELF-PLAY SUMMARY ==={RESET}");
    println!(
        "Episodes: {}   Board: {1}x{1}   Komi: {2}",
        args.episodes, args.board_size, args.komi
    );
    println!(
        "Black wins: {} ({:.1}%)",
        black_wins,
        100.0 * black_wins as f64 / args.episodes as f64
    );
    println!(
        "White wins: {} ({:.1}%)",
        white_wins,
        100.0 * white_wins as f64 / args.episodes as f64
    );
    println!("Draws:      {}", draws);
    println!(
        "Average episode length: {:.1} plies",
        total_plies as f64 / args.episodes as f64
    );
}
