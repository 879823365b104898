use anyhow::Context;
use clap::Parser;
use lookahead_2048::driver::{DriverConfig, DriverState, TurnLoop};
use lookahead_2048::logging::setup_logging;
use lookahead_2048::lookahead::{Lookahead, LookaheadConfig, DEFAULT_DEPTH};
use lookahead_2048::simulated::{SimulatedGame, DEFAULT_TARGET};

#[derive(Debug, Parser)]
#[command(name = "lookahead-2048", about = "Play one 2048 game with the fixed-depth lookahead policy")]
struct Args {
    /// Plies to search per move
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth: u32,

    /// RNG seed for tile spawns (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many moves
    #[arg(long)]
    max_turns: Option<u64>,

    /// Tile value that wins the game
    #[arg(long, default_value_t = DEFAULT_TARGET)]
    target: u32,

    /// Only print the final board and summary
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _logger = setup_logging("info")?;

    let policy = Lookahead::with_config(LookaheadConfig { depth: args.depth })?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("seed {seed}, depth {}", args.depth);
    let game = SimulatedGame::<4>::with_target(seed, args.target);
    let mut driver = TurnLoop::with_config(game, policy, DriverConfig { max_turns: args.max_turns });

    if !args.quiet {
        println!("{}", driver.session().board());
    }
    let mut total_simulated: u64 = 0;
    let termination = loop {
        let turns_before = driver.turns();
        let state = driver.step().context("turn loop aborted")?;
        if driver.turns() > turns_before {
            total_simulated = total_simulated.saturating_add(driver.policy().last_stats().simulated);
        }
        if !args.quiet && driver.turns() > turns_before {
            println!("{}", driver.session().board());
        }
        if let DriverState::Terminated(termination) = state {
            break termination;
        }
    };

    let game = driver.session();
    if args.quiet {
        println!("{}", game.board());
    }
    println!(
        "Result: {:?} | Moves made: {} | Score: {} | Highest tile: {} | Boards simulated: {}, peak per move: {}",
        termination,
        driver.turns(),
        game.score(),
        game.board().highest_tile(),
        total_simulated,
        driver.policy().last_stats().peak_simulated
    );
    Ok(())
}
