use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use lookahead_2048::driver::{DriverConfig, GameSummary, Termination, TurnLoop};
use lookahead_2048::engine::{Score, Tile};
use lookahead_2048::logging::setup_logging;
use lookahead_2048::lookahead::{Lookahead, LookaheadConfig};
use lookahead_2048::simulated::{SimulatedGame, DEFAULT_TARGET};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "depth_sweep", about = "Compare lookahead depths over many seeded 2048 games")]
struct Args {
    /// Depths to compare
    #[arg(long, value_delimiter = ',', default_values_t = vec![1, 2, 3])]
    depths: Vec<u32>,

    /// Games per depth
    #[arg(long, default_value_t = 32)]
    games: u64,

    /// Seed of the first game; game i uses seed + i at every depth
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Per-game: stop after this many moves
    #[arg(long)]
    max_turns: Option<u64>,

    /// Tile value that wins a game
    #[arg(long, default_value_t = DEFAULT_TARGET)]
    target: Tile,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug)]
struct GameReport {
    seed: u64,
    score: Score,
    highest_tile: Tile,
    summary: GameSummary,
}

#[derive(Debug, Serialize)]
struct DepthReport {
    depth: u32,
    games: usize,
    wins: usize,
    mean_score: f64,
    max_score: Score,
    mean_turns: f64,
    /// Highest tile reached -> number of games
    highest_tiles: BTreeMap<Tile, usize>,
    elapsed_s: f64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _logger = setup_logging("warn")?;

    let configs = args
        .depths
        .iter()
        .map(|&depth| LookaheadConfig { depth })
        .collect::<Vec<_>>();
    for cfg in &configs {
        cfg.validate()?;
    }

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(args.games * configs.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:40}] {pos}/{len} games | {msg}")?
                .progress_chars("=> "),
        );
        pb
    };

    let mut reports = Vec::with_capacity(configs.len());
    for cfg in configs {
        pb.set_message(format!("depth {}", cfg.depth));
        let start = Instant::now();
        let games = (0..args.games)
            .into_par_iter()
            .map(|i| {
                let report = play_one(cfg, args.seed.wrapping_add(i), args.target, args.max_turns);
                pb.inc(1);
                report
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        reports.push(summarize(cfg.depth, &games, start.elapsed().as_secs_f64()));
    }
    pb.finish_and_clear();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for r in &reports {
            println!(
                "depth {} | games: {} | wins: {} | mean score: {:.1} | max score: {} | mean moves: {:.1} | {:.2}s",
                r.depth, r.games, r.wins, r.mean_score, r.max_score, r.mean_turns, r.elapsed_s
            );
            let tiles: Vec<String> = r.highest_tiles.iter().map(|(t, n)| format!("{t}: {n}")).collect();
            println!("    highest tiles: {}", tiles.join(", "));
        }
    }
    Ok(())
}

fn play_one(cfg: LookaheadConfig, seed: u64, target: Tile, max_turns: Option<u64>) -> anyhow::Result<GameReport> {
    let policy = Lookahead::with_config(cfg)?;
    let game = SimulatedGame::<4>::with_target(seed, target);
    let mut driver = TurnLoop::with_config(game, policy, DriverConfig { max_turns });
    let summary = driver.run()?;
    let game = driver.session();
    Ok(GameReport { seed, score: game.score(), highest_tile: game.board().highest_tile(), summary })
}

fn summarize(depth: u32, games: &[GameReport], elapsed_s: f64) -> DepthReport {
    let n = games.len().max(1) as f64;
    let mut highest_tiles = BTreeMap::new();
    for g in games {
        *highest_tiles.entry(g.highest_tile).or_insert(0) += 1;
    }
    DepthReport {
        depth,
        games: games.len(),
        wins: games.iter().filter(|g| g.summary.termination == Termination::Won).count(),
        mean_score: games.iter().map(|g| g.score as f64).sum::<f64>() / n,
        max_score: games.iter().map(|g| g.score).max().unwrap_or(0),
        mean_turns: games.iter().map(|g| g.summary.turns as f64).sum::<f64>() / n,
        highest_tiles,
        elapsed_s,
    }
}
