use anyhow::Result;
use clap::Parser;
use evolarium_lib::app::{self, RunOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of generations to run
    #[arg(short, long)]
    generations: Option<u32>,

    /// RNG seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print each generation summary as JSON
    #[arg(long)]
    json: bool,

    /// Append summaries to a JSON-lines history file
    #[arg(long)]
    history: Option<PathBuf>,
}

fn main() -> Result<()> {
    evolarium_core::init_logging();
    let args = Args::parse();

    let options = RunOptions {
        config: args.config,
        generations: args.generations,
        seed: args.seed,
        json: args.json,
        history: args.history,
    };
    app::run(&options)?;
    Ok(())
}
