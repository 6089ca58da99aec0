//! Configuration management for simulation parameters.
//!
//! Every parameter bundle is a serde struct with defaults, so a
//! `config.toml` only needs to list the values it overrides. The bundle is
//! treated as immutable for the lifetime of a [`Simulation`](crate::simulation::Simulation).
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 1200.0
//! height = 800.0
//! food_count = 40
//! seed = 7
//!
//! [evolution]
//! population_size = 30
//! mutation_rate = 0.25
//! selection = { method = "meeting_pool", fraction = 0.5 }
//!
//! [time]
//! base_ticks = 1500
//! increment = 500
//! frequency = 5
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive `(min, max)` count sampled during procedural generation.
pub type CountRange = (usize, usize);

/// Samples a count from an inclusive range, tolerating `min > max`.
pub fn sample_count<R: Rng>(range: CountRange, rng: &mut R) -> usize {
    let (lo, hi) = if range.0 <= range.1 {
        range
    } else {
        (range.1, range.0)
    };
    rng.gen_range(lo..=hi)
}

/// World dimensions, resources and procedural layout.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub seed: Option<u64>,
    pub food_count: usize,
    /// Distance kept between food items and the world edge.
    pub food_margin: f64,
    /// Minimum distance between two food items.
    pub food_spacing: f64,
    /// Clearance radius checked against obstacles when placing food.
    pub food_clearance: f64,
    pub placement_attempts: usize,
    /// Offset of the eight compass probes used to reject dead-end spawns.
    pub spawn_probe_distance: f64,
    pub spawn_min_free_probes: usize,
    /// Known-safe fallback position; generation keeps it clear.
    pub fallback: (f64, f64),
    pub safe_zone_radius: f64,
    pub grid_cell_size: f64,

    pub wall_cell: f64,
    pub wall_lines: CountRange,
    pub wall_line_length: CountRange,
    pub wall_l_shapes: CountRange,
    pub wall_squares: CountRange,
    pub loose_trees: CountRange,
    pub tree_clusters: CountRange,
    pub trees_per_cluster: CountRange,
    pub tree_spread: f64,
    pub water_clusters: CountRange,
    pub water_per_cluster: CountRange,
    pub water_spread: f64,
    pub huts: CountRange,
    pub potions: CountRange,
    pub tree_size: f64,
    pub hut_size: f64,
    pub water_size: f64,
    pub potion_size: f64,
    pub obstacle_margin: f64,
    pub obstacle_clearance: f64,
    pub obstacle_attempts: usize,
    pub cluster_attempts: usize,

    pub tool_enabled: bool,
    pub tool_attempts: usize,
    pub tool_probe_distance: f64,
    pub tool_min_free_probes: usize,

    pub water_energy_loss: f64,
    pub water_speed_factor: f64,
    pub water_min_speed: f64,

    pub eat_range: f64,
    pub potion_range: f64,
    pub pickup_range: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            seed: None,
            food_count: 40,
            food_margin: 20.0,
            food_spacing: 40.0,
            food_clearance: 20.0,
            placement_attempts: 100,
            spawn_probe_distance: 20.0,
            spawn_min_free_probes: 1,
            fallback: (100.0, 100.0),
            safe_zone_radius: 40.0,
            grid_cell_size: 40.0,

            wall_cell: 20.0,
            wall_lines: (2, 3),
            wall_line_length: (3, 6),
            wall_l_shapes: (1, 2),
            wall_squares: (1, 2),
            loose_trees: (25, 35),
            tree_clusters: (3, 4),
            trees_per_cluster: (3, 5),
            tree_spread: 60.0,
            water_clusters: (2, 3),
            water_per_cluster: (4, 6),
            water_spread: 80.0,
            huts: (6, 7),
            potions: (3, 5),
            tree_size: 20.0,
            hut_size: 20.0,
            water_size: 20.0,
            potion_size: 16.0,
            obstacle_margin: 50.0,
            obstacle_clearance: 25.0,
            obstacle_attempts: 50,
            cluster_attempts: 30,

            tool_enabled: true,
            tool_attempts: 1000,
            tool_probe_distance: 30.0,
            tool_min_free_probes: 4,

            water_energy_loss: 2.0,
            water_speed_factor: 0.7,
            water_min_speed: 1.0,

            eat_range: 40.0,
            potion_range: 20.0,
            pickup_range: 30.0,
        }
    }
}

/// Body, energy and movement parameters of every agent.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AgentConfig {
    pub speed: f64,
    pub radius: f64,
    pub max_energy: f64,
    pub living_cost: f64,
    pub move_cost: f64,
    pub food_energy: f64,
    pub vision_range: f64,
    pub turn_rate: f64,
    /// Turns above this magnitude are damped and jittered.
    pub sharp_turn: f64,
    pub sharp_turn_damping: f64,
    pub turn_noise: f64,
    /// Damping applied when the whole turn window spins one way.
    pub circling_damping: f64,
    pub turn_window: usize,
    pub movement_window: usize,
    pub novelty_cell_size: f64,
    pub avoidance_radius: f64,
    pub strike_cooldown: u64,
    pub forward_threshold: f32,
    pub eat_threshold: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            radius: 8.0,
            max_energy: 100.0,
            living_cost: 0.05,
            move_cost: 0.01,
            food_energy: 30.0,
            vision_range: 150.0,
            turn_rate: 0.12,
            sharp_turn: 0.08,
            sharp_turn_damping: 0.6,
            turn_noise: 0.02,
            circling_damping: 0.3,
            turn_window: 12,
            movement_window: 30,
            novelty_cell_size: 40.0,
            avoidance_radius: 20.0,
            strike_cooldown: 120,
            forward_threshold: 0.5,
            eat_threshold: 0.5,
        }
    }
}

/// Stochastic exploration and the fitness-tiered steering overlay.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BehaviorConfig {
    pub exploration_noise: f32,
    pub random_heading_chance: f64,
    pub random_heading_boost: f32,
    pub exploration_interval: u32,
    pub exploration_jitter: f64,
    /// Probability that the overlay is applied on a given tick.
    pub nudge_probability: f64,
    pub food_tier: f64,
    pub door_tier: f64,
    pub puzzle_tier: f64,
    pub scarce_food_ratio: f32,
    pub align_tolerance: f64,
    pub steer_strength: f32,
    pub puzzle_steer_strength: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            exploration_noise: 0.08,
            random_heading_chance: 0.1,
            random_heading_boost: 0.3,
            exploration_interval: 100,
            exploration_jitter: 0.3,
            nudge_probability: 0.7,
            food_tier: 30.0,
            door_tier: 70.0,
            puzzle_tier: 80.0,
            scarce_food_ratio: 0.4,
            align_tolerance: 0.3,
            steer_strength: 0.5,
            puzzle_steer_strength: 0.6,
        }
    }
}

/// Hidden topology and initial weight scale. Input and output widths are
/// fixed by the sensor and action sets.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ControllerConfig {
    pub hidden_layers: Vec<usize>,
    pub init_weight_std: f32,
    pub init_bias_std: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            hidden_layers: vec![20],
            init_weight_std: 0.5,
            init_bias_std: 0.1,
        }
    }
}

/// Parent selection strategy.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SelectionMethod {
    /// Keep the top `elite_count` verbatim, fill the rest by tournament.
    ElitismTournament {
        elite_count: usize,
        tournament_size: usize,
    },
    Tournament {
        tournament_size: usize,
    },
    /// Sample parents uniformly from the top `fraction` of the ranking.
    MeetingPool {
        fraction: f64,
    },
}

impl Default for SelectionMethod {
    fn default() -> Self {
        Self::ElitismTournament {
            elite_count: 1,
            tournament_size: 7,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AdaptiveMutationConfig {
    pub enabled: bool,
    /// Coefficient of variation below which the rate is boosted.
    pub cv_threshold: f64,
    pub factor: f64,
    pub ceiling: f64,
}

impl Default for AdaptiveMutationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cv_threshold: 0.15,
            factor: 2.0,
            ceiling: 0.5,
        }
    }
}

/// Periodic injection of random controllers. `interval = 0` disables it.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ImmigrationConfig {
    pub interval: u32,
    pub count: usize,
}

impl Default for ImmigrationConfig {
    fn default() -> Self {
        Self {
            interval: 5,
            count: 3,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub max_generations: u32,
    pub selection: SelectionMethod,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub mutation_sigma: f64,
    pub adaptive: AdaptiveMutationConfig,
    pub immigration: ImmigrationConfig,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            max_generations: 50,
            selection: SelectionMethod::default(),
            crossover_rate: 0.8,
            mutation_rate: 0.25,
            mutation_sigma: 0.1,
            adaptive: AdaptiveMutationConfig::default(),
            immigration: ImmigrationConfig::default(),
        }
    }
}

/// Trees and huts: strike thresholds, cooldowns and rewards.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct StructureConfig {
    pub strike_range: f64,
    pub strike_threshold: u32,
    pub structure_cooldown: u64,
    pub global_cooldown: u64,
    /// Trees can only be cut while remaining food is at or below this.
    pub tree_cutting_food_threshold: usize,
    pub tree_food_reward: usize,
    pub hut_food_reward: usize,
    pub tree_reward: f64,
    pub hut_reward: f64,
    pub food_attempts_per_item: usize,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            strike_range: 25.0,
            strike_threshold: 3,
            structure_cooldown: 120,
            global_cooldown: 30,
            tree_cutting_food_threshold: 10,
            tree_food_reward: 5,
            hut_food_reward: 3,
            tree_reward: 10.0,
            hut_reward: 15.0,
            food_attempts_per_item: 50,
        }
    }
}

/// Fortress geometry and the key, door and chest chain.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PuzzleConfig {
    pub fortresses_enabled: bool,
    pub red_key_spawn_generation: u32,
    pub door_strike_threshold: u32,
    pub door_strike_cooldown: u64,
    pub door_range: f64,
    pub chest_range: f64,
    pub fortress_width: f64,
    pub fortress_height: f64,
    pub wall_thickness: f64,
    pub door_width: f64,
    pub red_key_reward: f64,
    pub gold_key_reward: f64,
    pub wood_door_reward: f64,
    pub iron_door_reward: f64,
    pub chest_reward: f64,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            fortresses_enabled: true,
            red_key_spawn_generation: 11,
            door_strike_threshold: 3,
            door_strike_cooldown: 60,
            door_range: 35.0,
            chest_range: 35.0,
            fortress_width: 200.0,
            fortress_height: 160.0,
            wall_thickness: 12.0,
            door_width: 40.0,
            red_key_reward: 20.0,
            gold_key_reward: 25.0,
            wood_door_reward: 15.0,
            iron_door_reward: 20.0,
            chest_reward: 50.0,
        }
    }
}

/// Weights and caps of the fitness components.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct FitnessConfig {
    pub survival_rate: f64,
    pub survival_cap: f64,
    pub food_scale: f64,
    pub food_cap: f64,
    pub exploration_scale: f64,
    pub exploration_cap: f64,
    pub obstacle_scale: f64,
    pub obstacle_cap: f64,
    /// Baseline (survival + food + exploration) required before the
    /// obstacle term counts.
    pub obstacle_gate: f64,
    pub movement_weight: f64,
    pub movement_min_distance: f64,
    pub straightness_weight: f64,
    pub smoothness_weight: f64,
    pub novelty_weight: f64,
    pub penalty_scale: f64,
    pub penalty_cap: f64,
    /// Share of the maximum reachable by an agent that has barely lived.
    pub cap_floor: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            survival_rate: 0.25,
            survival_cap: 15.0,
            food_scale: 6.0,
            food_cap: 30.0,
            exploration_scale: 2.0,
            exploration_cap: 10.0,
            obstacle_scale: 0.05,
            obstacle_cap: 5.0,
            obstacle_gate: 15.0,
            movement_weight: 10.0,
            movement_min_distance: 200.0,
            straightness_weight: 0.4,
            smoothness_weight: 0.3,
            novelty_weight: 0.3,
            penalty_scale: 0.05,
            penalty_cap: 10.0,
            cap_floor: 0.2,
        }
    }
}

/// Per-generation tick budget.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TimeConfig {
    pub adaptive: bool,
    pub base_ticks: u64,
    pub increment: u64,
    pub frequency: u32,
    pub max_ticks: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            adaptive: true,
            base_ticks: 1500,
            increment: 500,
            frequency: 5,
            max_ticks: 10_000,
        }
    }
}

impl TimeConfig {
    /// Tick budget for a 1-based generation number.
    ///
    /// Grows by `increment` every `frequency` generations and never exceeds
    /// `max_ticks`.
    #[must_use]
    pub fn tick_budget(&self, generation: u32) -> u64 {
        if !self.adaptive {
            return self.max_ticks;
        }
        let steps = u64::from(generation.saturating_sub(1) / self.frequency.max(1));
        self.base_ticks
            .saturating_add(self.increment.saturating_mul(steps))
            .min(self.max_ticks)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub agent: AgentConfig,
    pub behavior: BehaviorConfig,
    pub controller: ControllerConfig,
    pub evolution: EvolutionConfig,
    pub structures: StructureConfig,
    pub puzzle: PuzzleConfig,
    pub fitness: FitnessConfig,
    pub time: TimeConfig,
}

fn valid_range(range: CountRange) -> bool {
    range.0 <= range.1
}

fn unit(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a
    /// description of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        // World validation
        let w = &self.world;
        anyhow::ensure!(
            w.width >= 200.0 && w.height >= 200.0,
            "World must be at least 200x200"
        );
        anyhow::ensure!(
            w.width <= 10_000.0 && w.height <= 10_000.0,
            "World too large (max 10000)"
        );
        anyhow::ensure!(w.food_count <= 10_000, "Food count too large (max 10000)");
        anyhow::ensure!(w.placement_attempts > 0, "Placement attempts must be positive");
        anyhow::ensure!(
            w.spawn_min_free_probes <= 8 && w.tool_min_free_probes <= 8,
            "At most 8 probe directions exist"
        );
        anyhow::ensure!(w.grid_cell_size > 0.0, "Grid cell size must be positive");
        anyhow::ensure!(w.wall_cell > 0.0, "Wall cell size must be positive");
        anyhow::ensure!(
            w.fallback.0 > 0.0
                && w.fallback.0 < w.width
                && w.fallback.1 > 0.0
                && w.fallback.1 < w.height,
            "Fallback position must lie inside the world"
        );
        anyhow::ensure!(
            w.safe_zone_radius >= self.agent.radius,
            "Safe zone must fit an agent"
        );
        for (name, range) in [
            ("wall_lines", w.wall_lines),
            ("wall_line_length", w.wall_line_length),
            ("wall_l_shapes", w.wall_l_shapes),
            ("wall_squares", w.wall_squares),
            ("loose_trees", w.loose_trees),
            ("tree_clusters", w.tree_clusters),
            ("trees_per_cluster", w.trees_per_cluster),
            ("water_clusters", w.water_clusters),
            ("water_per_cluster", w.water_per_cluster),
            ("huts", w.huts),
            ("potions", w.potions),
        ] {
            anyhow::ensure!(valid_range(range), "Range {name} has min > max");
        }
        anyhow::ensure!(
            w.water_speed_factor > 0.0 && w.water_speed_factor <= 1.0,
            "Water speed factor must be in (0.0, 1.0]"
        );
        anyhow::ensure!(w.water_energy_loss >= 0.0, "Water energy loss must be non-negative");

        // Agent validation
        let a = &self.agent;
        anyhow::ensure!(a.speed > 0.0, "Agent speed must be positive");
        anyhow::ensure!(a.radius > 0.0, "Agent radius must be positive");
        anyhow::ensure!(a.max_energy > 0.0, "Max energy must be positive");
        anyhow::ensure!(
            a.living_cost >= 0.0 && a.move_cost >= 0.0,
            "Energy costs must be non-negative"
        );
        anyhow::ensure!(a.vision_range > 0.0, "Vision range must be positive");
        anyhow::ensure!(a.turn_rate > 0.0, "Turn rate must be positive");
        anyhow::ensure!(
            a.turn_window > 0 && a.movement_window > 1,
            "Movement windows too small"
        );
        anyhow::ensure!(a.novelty_cell_size > 0.0, "Novelty cell size must be positive");

        // Behaviour validation
        let b = &self.behavior;
        anyhow::ensure!(
            unit(b.random_heading_chance) && unit(b.nudge_probability),
            "Behaviour probabilities must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            b.exploration_noise >= 0.0,
            "Exploration noise must be non-negative"
        );

        // Controller validation
        anyhow::ensure!(
            self.controller.hidden_layers.iter().all(|&n| n > 0),
            "Hidden layers must be non-empty"
        );

        // Evolution validation
        let e = &self.evolution;
        anyhow::ensure!(e.population_size > 0, "Population size must be positive");
        anyhow::ensure!(
            e.population_size <= 10_000,
            "Population too large (max 10000)"
        );
        anyhow::ensure!(unit(e.crossover_rate), "Crossover rate must be in [0.0, 1.0]");
        anyhow::ensure!(unit(e.mutation_rate), "Mutation rate must be in [0.0, 1.0]");
        anyhow::ensure!(e.mutation_sigma >= 0.0, "Mutation sigma must be non-negative");
        anyhow::ensure!(
            unit(e.adaptive.ceiling) && e.adaptive.factor >= 1.0,
            "Adaptive mutation needs factor >= 1 and ceiling in [0.0, 1.0]"
        );
        match e.selection {
            SelectionMethod::ElitismTournament {
                elite_count,
                tournament_size,
            } => {
                anyhow::ensure!(tournament_size > 0, "Tournament size must be positive");
                anyhow::ensure!(
                    elite_count <= e.population_size,
                    "Elite count exceeds population size"
                );
            }
            SelectionMethod::Tournament { tournament_size } => {
                anyhow::ensure!(tournament_size > 0, "Tournament size must be positive");
            }
            SelectionMethod::MeetingPool { fraction } => {
                anyhow::ensure!(
                    fraction > 0.0 && fraction <= 1.0,
                    "Meeting pool fraction must be in (0.0, 1.0]"
                );
            }
        }
        anyhow::ensure!(
            e.immigration.count <= e.population_size,
            "Immigrant count exceeds population size"
        );

        // Structures and puzzle validation
        anyhow::ensure!(
            self.structures.strike_threshold > 0 && self.puzzle.door_strike_threshold > 0,
            "Strike thresholds must be positive"
        );
        let p = &self.puzzle;
        anyhow::ensure!(
            p.door_width < p.fortress_height && p.wall_thickness * 2.0 < p.fortress_width,
            "Fortress is too small for its walls and door"
        );
        anyhow::ensure!(
            !p.fortresses_enabled || p.fortress_height * 2.0 + 80.0 < w.height,
            "World too short for two fortresses"
        );

        // Fitness validation
        let f = &self.fitness;
        anyhow::ensure!(unit(f.cap_floor), "Fitness cap floor must be in [0.0, 1.0]");
        anyhow::ensure!(
            f.survival_cap >= 0.0 && f.food_cap >= 0.0 && f.exploration_cap >= 0.0,
            "Fitness caps must be non-negative"
        );

        // Time validation
        anyhow::ensure!(self.time.max_ticks > 0, "Max ticks must be positive");
        anyhow::ensure!(self.time.frequency > 0, "Tick increment frequency must be positive");

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Stable digest of the evolution-relevant parameters, logged with
    /// every run so results can be matched to their configuration.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.agent).as_bytes());
        hasher.update(format!("{:?}", self.behavior).as_bytes());
        hasher.update(format!("{:?}", self.controller).as_bytes());
        hasher.update(format!("{:?}", self.evolution).as_bytes());
        hasher.update(format!("{:?}", self.structures).as_bytes());
        hasher.update(format!("{:?}", self.puzzle).as_bytes());
        hasher.update(format!("{:?}", self.fitness).as_bytes());
        hasher.update(format!("{:?}", self.time).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_mutation_rate() {
        let mut config = AppConfig::default();
        config.evolution.mutation_rate = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_meeting_pool_fraction() {
        let mut config = AppConfig::default();
        config.evolution.selection = SelectionMethod::MeetingPool { fraction: 0.0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
            [world]
            food_count = 12

            [evolution]
            population_size = 10
            selection = { method = "meeting_pool", fraction = 0.5 }
        "#;
        let config = AppConfig::from_toml(toml).unwrap();
        assert_eq!(config.world.food_count, 12);
        assert_eq!(config.world.width, 1200.0);
        assert_eq!(
            config.evolution.selection,
            SelectionMethod::MeetingPool { fraction: 0.5 }
        );
        assert_eq!(config.controller.hidden_layers, vec![20]);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AppConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back = AppConfig::from_toml(&text).unwrap();
        assert_eq!(back.fingerprint(), config.fingerprint());
    }

    #[test]
    fn test_fingerprint_changes_with_parameters() {
        let base = AppConfig::default();
        let mut changed = AppConfig::default();
        changed.evolution.crossover_rate = 0.5;
        assert_eq!(base.fingerprint().len(), 64);
        assert_ne!(base.fingerprint(), changed.fingerprint());
    }

    #[test]
    fn test_tick_budget_growth() {
        let time = TimeConfig {
            adaptive: true,
            base_ticks: 1000,
            increment: 250,
            frequency: 3,
            max_ticks: 1600,
        };
        assert_eq!(time.tick_budget(1), 1000);
        assert_eq!(time.tick_budget(3), 1000);
        assert_eq!(time.tick_budget(4), 1250);
        assert_eq!(time.tick_budget(7), 1500);
        assert_eq!(time.tick_budget(10), 1600);

        let fixed = TimeConfig {
            adaptive: false,
            ..time
        };
        assert_eq!(fixed.tick_budget(42), 1600);
    }
}
