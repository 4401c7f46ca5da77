//! Replay a recorded delta log through the client state and print the
//! derived leaderboards. Lets the sync layer be exercised offline against
//! captured sessions.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use linematch_client::{GameConfig, LiveState, ScoreArchive, StateDelta};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Replay a JSONL state-delta log and print the leaderboards")]
struct Args {
    /// Path to the delta log, one JSON-encoded StateDelta per line.
    #[arg(long)]
    deltas: PathBuf,

    /// Optional historical score archive (JSON object, username -> score).
    #[arg(long)]
    archive: Option<PathBuf>,

    /// Override the configured top-K high-score retention.
    #[arg(long)]
    top_k: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = GameConfig::default();
    if let Some(top_k) = args.top_k {
        config.high_score_top_k = top_k;
    }

    let archive = match &args.archive {
        Some(path) => ScoreArchive::from_path(path)?,
        None => ScoreArchive::empty(),
    };

    let mut live = LiveState::new(config, archive);

    let log = fs::read_to_string(&args.deltas)
        .with_context(|| format!("failed to read delta log {}", args.deltas.display()))?;
    let mut applied = 0usize;
    for (number, line) in log.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let delta: StateDelta = serde_json::from_str(trimmed)
            .with_context(|| format!("malformed delta on line {}", number + 1))?;
        live.apply(delta);
        applied += 1;
    }

    println!("applied {applied} deltas");
    println!();
    println!("overall leaderboard:");
    for entry in live.overall_leaderboard_ranked() {
        println!("  {:<24} {}", entry.name, entry.total.floor_units());
    }
    println!();
    println!("active players:");
    for player in live.active_players_ranked() {
        println!("  {:<24} {}", player.username, player.mass.floor_units());
    }

    Ok(())
}
