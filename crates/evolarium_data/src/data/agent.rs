use super::controller::Controller;
use super::geometry::Vec2;
use super::ring::RingBuffer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an agent entered the current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentOrigin {
    /// Freshly randomised controller (first generation or restart).
    Random,
    /// Top-ranked controller carried over verbatim.
    Elite,
    /// Produced by crossover and/or mutation.
    Offspring,
    /// Random controller injected by immigration.
    Immigrant,
}

/// Rolling movement-quality metrics, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MovementQuality {
    /// Net displacement over path length across the position window.
    pub straightness: f64,
    /// One minus the mean turn magnitude relative to the maximum turn.
    pub turn_smoothness: f64,
    /// Share of distinct grid cells in the visited-cell window.
    pub novelty: f64,
}

/// Statistics accumulated by an agent during one generation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentStats {
    pub age: u64,
    pub food_eaten: u32,
    pub distance_traveled: f64,
    pub obstacles_avoided: u32,
    pub obstacle_encounters: u32,
    /// Rewards from structures and puzzle transitions. Never decreases.
    pub puzzle_rewards: f64,
    pub environment_penalty: f64,
    pub total_moves: u64,
    pub food_attempts: u32,
    pub food_found: u32,
    pub structures_destroyed: u32,
    pub keys_collected: u32,
    pub doors_opened: u32,
    pub chest_opened: bool,
    pub movement: MovementQuality,
}

impl AgentStats {
    /// Adds a non-negative reward; negative or non-finite input is ignored.
    pub fn add_reward(&mut self, reward: f64) {
        if reward.is_finite() && reward > 0.0 {
            self.puzzle_rewards += reward;
        }
    }

    /// Mean distance per committed move.
    #[must_use]
    pub fn move_efficiency(&self) -> f64 {
        if self.total_moves == 0 {
            0.0
        } else {
            self.distance_traveled / self.total_moves as f64
        }
    }
}

/// Sliding windows used for anti-circling and movement quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementWindows {
    pub positions: RingBuffer<Vec2>,
    pub headings: RingBuffer<f64>,
    pub cells: RingBuffer<u32>,
    /// Signed turn applied on each tick.
    pub turns: RingBuffer<f64>,
}

impl MovementWindows {
    #[must_use]
    pub fn new(movement_window: usize, turn_window: usize) -> Self {
        Self {
            positions: RingBuffer::with_capacity(movement_window),
            headings: RingBuffer::with_capacity(movement_window),
            cells: RingBuffer::with_capacity(movement_window),
            turns: RingBuffer::with_capacity(turn_window),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: Uuid,
    pub origin: AgentOrigin,
    pub position: Vec2,
    /// Radians in `[0, 2π)`.
    pub heading: f64,
    pub base_speed: f64,
    pub speed: f64,
    pub radius: f64,
    pub energy: f64,
    pub max_energy: f64,
    pub alive: bool,
    /// Running score used by the behaviour overlay; the authoritative score
    /// is computed at the generation boundary.
    pub fitness: f64,
    pub controller: Controller,
    pub stats: AgentStats,
    pub windows: MovementWindows,
    pub exploration_timer: u32,
    pub last_strike_tick: Option<u64>,
    pub death_tick: Option<u64>,
}

impl Agent {
    #[must_use]
    pub fn energy_ratio(&self) -> f64 {
        if self.max_energy > 0.0 {
            (self.energy / self.max_energy).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
