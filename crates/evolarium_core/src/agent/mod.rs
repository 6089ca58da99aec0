//! Agent lifecycle and the perceive, decide, act cycle.

pub mod action;
pub mod decision;
pub mod perception;

pub use action::{act, ActContext, ActOutcome};
pub use decision::{decide, Decision};
pub use perception::{perceive, Perception};

use crate::config::AppConfig;
use evolarium_data::{Agent, AgentOrigin, AgentStats, Controller, MovementWindows, Vec2};
use rand::Rng;
use std::f64::consts::TAU;
use uuid::Uuid;

/// Creates a living agent at `position` with a random heading.
pub fn create_agent_with_rng<R: Rng>(
    config: &AppConfig,
    controller: Controller,
    origin: AgentOrigin,
    position: Vec2,
    rng: &mut R,
) -> Agent {
    let a = &config.agent;
    Agent {
        id: Uuid::from_u128(rng.gen::<u128>()),
        origin,
        position,
        heading: rng.gen_range(0.0..TAU),
        base_speed: a.speed,
        speed: a.speed,
        radius: a.radius,
        energy: a.max_energy,
        max_energy: a.max_energy,
        alive: true,
        fitness: 0.0,
        controller,
        stats: AgentStats::default(),
        windows: MovementWindows::new(a.movement_window, a.turn_window),
        exploration_timer: 0,
        last_strike_tick: None,
        death_tick: None,
    }
}

/// Id of the coarse grid cell containing `position`, used for novelty.
#[must_use]
pub fn novelty_cell(position: Vec2, cell_size: f64, world_width: f64) -> u32 {
    let cols = (world_width / cell_size).ceil().max(1.0) as u32;
    let col = (position.x / cell_size).floor().max(0.0) as u32;
    let row = (position.y / cell_size).floor().max(0.0) as u32;
    row.saturating_mul(cols).saturating_add(col.min(cols - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ControllerLogic;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_new_agent_is_fresh() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let controller = Controller::new_random_with_rng(&config.controller, &mut rng);
        let agent = create_agent_with_rng(
            &config,
            controller,
            AgentOrigin::Random,
            Vec2::new(200.0, 200.0),
            &mut rng,
        );
        assert!(agent.alive);
        assert_eq!(agent.energy, config.agent.max_energy);
        assert_eq!(agent.stats, AgentStats::default());
        assert!((0.0..TAU).contains(&agent.heading));
        assert_eq!(agent.windows.turns.capacity(), config.agent.turn_window);
    }

    #[test]
    fn test_novelty_cells() {
        assert_eq!(novelty_cell(Vec2::new(10.0, 10.0), 40.0, 1200.0), 0);
        assert_eq!(novelty_cell(Vec2::new(50.0, 10.0), 40.0, 1200.0), 1);
        assert_eq!(novelty_cell(Vec2::new(10.0, 50.0), 40.0, 1200.0), 30);
    }
}
