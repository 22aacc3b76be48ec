//! THORNWOOD CLI: runs one autopilot session and prints a JSON summary.
//!
//! Usage:
//!   cargo run -p thornwood-app -- --seed 7 --ticks 3600
//!   RUST_LOG=thornwood_sim=debug cargo run -p thornwood-app -- --realtime --data-dir saves

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use thornwood_app::runner;
use thornwood_app::store::FileStore;
use thornwood_sim::persistence::KeyValueStore;
use thornwood_sim::{MemoryStore, SimConfig};

#[derive(Parser, Debug)]
#[command(name = "thornwood")]
#[command(about = "Run a THORNWOOD session driven by the autopilot")]
struct Args {
    /// RNG seed for the run
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Stop after this many simulated ticks (60 per second)
    #[arg(long, default_value_t = 3600)]
    ticks: u64,
    /// Directory for saved upgrades; in-memory when omitted
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Pace the run at 60Hz on the game loop thread
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let store: Box<dyn KeyValueStore + Send> = match &args.data_dir {
        Some(dir) => Box::new(FileStore::new(dir)),
        None => Box::new(MemoryStore::new()),
    };
    let config = SimConfig {
        seed: args.seed,
        ..Default::default()
    };

    let summary = if args.realtime {
        runner::run_realtime(config, store, args.ticks)?
    } else {
        runner::run_headless(config, store, args.ticks)
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
