//! Per-generation summary statistics.

use crate::fitness;
use crate::world::World;
use evolarium_data::{Agent, BehaviorProfile, GenerationSummary, SkillAverages};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Mean per-gene variance across controllers sharing the first
/// controller's gene count. Zero for fewer than two controllers.
#[must_use]
pub fn diversity(agents: &[Agent]) -> f64 {
    let Some(first) = agents.first() else {
        return 0.0;
    };
    let genes = first.controller.gene_count();
    let genomes: Vec<Vec<f32>> = agents
        .iter()
        .filter(|a| a.controller.gene_count() == genes)
        .map(|a| a.controller.genes().collect())
        .collect();
    if genomes.len() < 2 || genes == 0 {
        return 0.0;
    }
    let n = genomes.len() as f64;
    let variance_at = |g: usize| {
        let mean = genomes.iter().map(|v| f64::from(v[g])).sum::<f64>() / n;
        genomes
            .iter()
            .map(|v| (f64::from(v[g]) - mean).powi(2))
            .sum::<f64>()
            / n
    };

    #[cfg(feature = "parallel")]
    let total: f64 = (0..genes).into_par_iter().map(variance_at).sum();
    #[cfg(not(feature = "parallel"))]
    let total: f64 = (0..genes).map(variance_at).sum();

    total / genes as f64
}

/// Percentage of `agents` matching `pred`.
fn share(agents: &[Agent], pred: impl Fn(&Agent) -> bool) -> f64 {
    if agents.is_empty() {
        return 0.0;
    }
    agents.iter().filter(|a| pred(a)).count() as f64 / agents.len() as f64 * 100.0
}

/// Share of the population showing each notable behaviour, in percent.
#[must_use]
pub fn behavior_profile(agents: &[Agent]) -> BehaviorProfile {
    BehaviorProfile {
        food_seekers: share(agents, |a| a.stats.food_eaten > 2),
        explorers: share(agents, |a| a.stats.distance_traveled > 1000.0),
        survivors: share(agents, |a| a.stats.age > 2000),
        efficient_movers: share(agents, |a| a.stats.move_efficiency() > 0.8 * a.base_speed),
        obstacle_avoiders: share(agents, |a| a.stats.obstacles_avoided > 3),
    }
}

/// Population means of the per-agent skill percentages.
#[must_use]
pub fn skill_averages(agents: &[Agent]) -> SkillAverages {
    if agents.is_empty() {
        return SkillAverages::default();
    }
    let n = agents.len() as f64;
    let sum = agents
        .iter()
        .map(fitness::skills)
        .fold(SkillAverages::default(), |acc, s| SkillAverages {
            movement: acc.movement + s.movement,
            food: acc.food + s.food,
            obstacle: acc.obstacle + s.obstacle,
            energy: acc.energy + s.energy,
        });
    SkillAverages {
        movement: sum.movement / n,
        food: sum.food / n,
        obstacle: sum.obstacle / n,
        energy: sum.energy / n,
    }
}

/// Builds the summary of a finished generation. Evolution fields
/// (mutation rate, immigrants, restart) are filled in by the caller once
/// the next population exists.
#[must_use]
pub fn summarize(
    generation: u32,
    ticks: u64,
    agents: &[Agent],
    scores: &[f64],
    world: &World,
) -> GenerationSummary {
    let n = agents.len();
    let mut summary = GenerationSummary {
        generation,
        ticks,
        population: n,
        puzzle: world.puzzle_status(),
        ..GenerationSummary::default()
    };
    if n == 0 {
        return summary;
    }
    let nf = n as f64;

    if !scores.is_empty() {
        let count = scores.len() as f64;
        let mean = scores.iter().sum::<f64>() / count;
        summary.avg_fitness = mean;
        summary.max_fitness = scores.iter().copied().fold(f64::MIN, f64::max);
        summary.min_fitness = scores.iter().copied().fold(f64::MAX, f64::min);
        summary.std_fitness =
            (scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / count).sqrt();
    }

    summary.avg_food = agents.iter().map(|a| f64::from(a.stats.food_eaten)).sum::<f64>() / nf;
    summary.max_food = agents.iter().map(|a| a.stats.food_eaten).max().unwrap_or(0);
    summary.avg_age = agents.iter().map(|a| a.stats.age as f64).sum::<f64>() / nf;
    summary.max_age = agents.iter().map(|a| a.stats.age).max().unwrap_or(0);
    summary.avg_distance = agents.iter().map(|a| a.stats.distance_traveled).sum::<f64>() / nf;
    summary.diversity = diversity(agents);
    summary.alive = agents.iter().filter(|a| a.alive).count();
    summary.survival_rate = summary.alive as f64 / nf;
    summary.skills = skill_averages(agents);
    summary.behavior = behavior_profile(agents);
    summary.structures_destroyed = agents.iter().map(|a| a.stats.structures_destroyed).sum();
    summary
}
