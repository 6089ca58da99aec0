use crate::config::AgentConfig;
use crate::controller::SENSOR_COUNT;
use crate::world::World;
use evolarium_data::{angle_delta, Agent, DoorKind, KeyKind, Vec2};
use std::f64::consts::{PI, TAU};

/// Normalised sensor vector fed to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception(pub [f32; SENSOR_COUNT]);

impl Perception {
    pub const ENERGY: usize = 0;
    pub const FOOD_DISTANCE: usize = 1;
    pub const FOOD_BEARING: usize = 2;
    pub const AGENT_DISTANCE: usize = 3;
    pub const OBSTACLE_DISTANCE: usize = 4;
    pub const TARGET_DISTANCE: usize = 8;
    pub const TARGET_BEARING: usize = 9;
    pub const TOOL: usize = 13;
    pub const FOOD_RATIO: usize = 14;
    pub const TREE_DISTANCE: usize = 15;

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[must_use]
    pub fn get(&self, index: usize) -> f32 {
        self.0.get(index).copied().unwrap_or(0.0)
    }
}

fn scaled(distance: Option<f64>, vision: f64) -> f64 {
    distance.map_or(1.0, |d| (d / vision).min(1.0))
}

fn bearing(agent: &Agent, target: Vec2) -> f64 {
    angle_delta(agent.heading, agent.position.angle_to(target)) / PI
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Builds the sensor vector for `agent`.
///
/// `others` may include the agent itself; it is skipped by id, as are dead
/// agents. Absent targets read as distance 1 and bearing 0.
#[must_use]
pub fn perceive(
    agent: &Agent,
    world: &World,
    others: &[Agent],
    generation: u32,
    config: &AgentConfig,
) -> Perception {
    let vision = config.vision_range;
    let pos = agent.position;

    let food = world.nearest_food(pos);
    let nearest_agent = others
        .iter()
        .filter(|o| o.alive && o.id != agent.id)
        .map(|o| o.position.distance_sq(pos))
        .min_by(f64::total_cmp)
        .map(f64::sqrt);
    let target = world.active_puzzle_target(generation);
    let tree = world.nearest_cuttable_tree(pos);

    let values = [
        agent.energy_ratio(),
        scaled(food.map(|f| f.1), vision),
        food.map_or(0.0, |f| bearing(agent, f.0)),
        scaled(nearest_agent, vision),
        scaled(world.nearest_blocking_distance(pos, vision), vision),
        pos.x / world.width,
        pos.y / world.height,
        agent.heading / TAU,
        scaled(target.map(|t| t.1.distance(pos)), vision),
        target.map_or(0.0, |t| bearing(agent, t.1)),
        flag(world.key_collected(KeyKind::Red)),
        flag(world.key_collected(KeyKind::Gold)),
        flag(world.door_open(DoorKind::Wood) || world.door_open(DoorKind::Iron)),
        flag(world.tool_held()),
        world.food_ratio(),
        scaled(tree.map(|t| t.1), vision),
    ];

    let mut inputs = [0.0f32; SENSOR_COUNT];
    for (slot, value) in inputs.iter_mut().zip(values) {
        *slot = if value.is_finite() {
            value.clamp(-1.0, 1.0) as f32
        } else {
            0.0
        };
    }
    Perception(inputs)
}
