use crate::history::HistoryLog;
use anyhow::{Context, Result};
use evolarium_core::{AppConfig, Simulation};
use evolarium_data::GenerationSummary;
use std::path::{Path, PathBuf};

/// Options collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub generations: Option<u32>,
    pub seed: Option<u64>,
    /// Print every summary as one JSON line on stdout.
    pub json: bool,
    /// Append summaries to this JSON-lines file.
    pub history: Option<PathBuf>,
}

/// Reads and validates a TOML config. A missing file is an error; use
/// `AppConfig::default()` when no path is given.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    AppConfig::from_toml(&content)
        .with_context(|| format!("Invalid config {}", path.display()))
}

/// Applies CLI overrides on top of the loaded config.
pub fn resolve_config(options: &RunOptions) -> Result<AppConfig> {
    let mut config = match &options.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(seed) = options.seed {
        config.world.seed = Some(seed);
    }
    if let Some(generations) = options.generations {
        config.evolution.max_generations = generations;
    }
    Ok(config)
}

/// Runs a full evolution and returns one summary per finished generation.
pub fn run(options: &RunOptions) -> Result<Vec<GenerationSummary>> {
    let config = resolve_config(options)?;
    let max_generations = config.evolution.max_generations;
    let mut sim = Simulation::new(config).context("Failed to start simulation")?;
    let mut history = match &options.history {
        Some(path) => Some(HistoryLog::create(path)?),
        None => None,
    };

    let mut summaries = Vec::with_capacity(max_generations as usize);
    for _ in 0..max_generations {
        let report = sim
            .run_generation()
            .with_context(|| format!("Generation {} failed", sim.generation()))?;
        let summary = report.summary;
        tracing::info!(
            generation = summary.generation,
            avg_fitness = summary.avg_fitness,
            max_fitness = summary.max_fitness,
            alive = summary.alive,
            doors = summary.puzzle.doors_opened,
            "Generation summary"
        );
        if options.json {
            println!("{}", serde_json::to_string(&summary)?);
        }
        if let Some(log) = history.as_mut() {
            log.append(&summary)?;
        }
        summaries.push(summary);
        if report.run_ended {
            tracing::info!(generation = sim.generation(), "Chest opened, stopping");
            break;
        }
        // Events are only consumed by interactive front ends.
        sim.drain_events();
    }

    tracing::info!(
        generations = summaries.len(),
        ticks = sim.metrics().tick_count(),
        tps = sim.metrics().ticks_per_second(),
        "Run finished"
    );
    Ok(summaries)
}
