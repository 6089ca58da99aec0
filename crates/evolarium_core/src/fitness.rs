//! Multi-objective fitness in `[0, 100]`.
//!
//! Each component saturates on its own cap, so no single behaviour can
//! dominate. A progressive ceiling keeps short-lived agents from scoring
//! like agents that used the whole tick budget.

use crate::config::FitnessConfig;
use evolarium_data::{Agent, AgentStats, SkillAverages};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-component view of a score, before the ceiling is applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FitnessBreakdown {
    pub survival: f64,
    pub food: f64,
    pub exploration: f64,
    pub obstacle: f64,
    pub movement: f64,
    pub puzzle: f64,
    pub penalty: f64,
    /// Progressive ceiling derived from age and tick budget.
    pub cap: f64,
    pub total: f64,
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Computes every component of the score.
#[must_use]
pub fn breakdown(stats: &AgentStats, config: &FitnessConfig, tick_budget: u64) -> FitnessBreakdown {
    let age = stats.age as f64;
    let distance = finite_or_zero(stats.distance_traveled).max(0.0);

    let survival = (config.survival_rate * age.sqrt()).min(config.survival_cap);
    let food = (config.food_scale * f64::from(stats.food_eaten).sqrt()).min(config.food_cap);
    let exploration =
        (config.exploration_scale * (1.0 + distance / 100.0).ln()).min(config.exploration_cap);

    let obstacle = if survival + food + exploration > config.obstacle_gate {
        (config.obstacle_scale * f64::from(stats.obstacles_avoided)).min(config.obstacle_cap)
    } else {
        0.0
    };

    let movement = if distance >= config.movement_min_distance {
        let m = &stats.movement;
        config.movement_weight
            * (config.straightness_weight * m.straightness
                + config.smoothness_weight * m.turn_smoothness
                + config.novelty_weight * m.novelty)
    } else {
        0.0
    };

    let puzzle = finite_or_zero(stats.puzzle_rewards).max(0.0);
    let penalty = (config.penalty_scale * finite_or_zero(stats.environment_penalty).max(0.0))
        .min(config.penalty_cap);

    let progress = if tick_budget == 0 {
        1.0
    } else {
        (age / tick_budget as f64).min(1.0)
    };
    let cap = 100.0 * (config.cap_floor + (1.0 - config.cap_floor) * progress);

    let raw = survival + food + exploration + obstacle + movement + puzzle - penalty;
    let total = finite_or_zero(raw.min(cap)).clamp(0.0, 100.0);

    FitnessBreakdown {
        survival,
        food,
        exploration,
        obstacle,
        movement,
        puzzle,
        penalty,
        cap,
        total,
    }
}

/// Final score in `[0, 100]`. NaN anywhere in the inputs yields 0.
#[must_use]
pub fn score(stats: &AgentStats, config: &FitnessConfig, tick_budget: u64) -> f64 {
    breakdown(stats, config, tick_budget).total
}

/// Scores a whole population in order.
#[must_use]
pub fn score_population(agents: &[Agent], config: &FitnessConfig, tick_budget: u64) -> Vec<f64> {
    #[cfg(feature = "parallel")]
    {
        agents
            .par_iter()
            .map(|a| score(&a.stats, config, tick_budget))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        agents
            .iter()
            .map(|a| score(&a.stats, config, tick_budget))
            .collect()
    }
}

/// Movement, food, obstacle and energy skill percentages of one agent.
#[must_use]
pub fn skills(agent: &Agent) -> SkillAverages {
    let s = &agent.stats;
    let movement = (s.move_efficiency() * 20.0).min(100.0);
    let food = if s.food_attempts == 0 {
        0.0
    } else {
        f64::from(s.food_found) / f64::from(s.food_attempts) * 100.0
    };
    let obstacle = if s.obstacle_encounters == 0 {
        0.0
    } else {
        (f64::from(s.obstacles_avoided) / f64::from(s.obstacle_encounters) * 100.0).min(100.0)
    };
    let energy = if s.age == 0 {
        0.0
    } else {
        (agent.energy / (s.age as f64 * 0.1 + 1.0)).min(100.0)
    };
    SkillAverages {
        movement,
        food,
        obstacle,
        energy,
    }
}
