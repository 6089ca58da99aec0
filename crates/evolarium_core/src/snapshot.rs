//! Read-only views of the simulation for renderers and exporters.

use crate::world::World;
use evolarium_data::{
    Agent, AgentOrigin, Chest, Door, Fortress, Key, Obstacle, PuzzleStatus, Tool, Vec2,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AgentSnapshot {
    pub id: Uuid,
    pub origin: AgentOrigin,
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub radius: f64,
    pub energy: f64,
    pub max_energy: f64,
    pub alive: bool,
    pub fitness: f64,
    pub age: u64,
    pub food_eaten: u32,
    /// Short digest of the controller genes, for colouring by lineage.
    pub genome_hex: String,
}

impl AgentSnapshot {
    #[must_use]
    pub fn from_agent(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            origin: agent.origin,
            x: agent.position.x,
            y: agent.position.y,
            heading: agent.heading,
            radius: agent.radius,
            energy: agent.energy,
            max_energy: agent.max_energy,
            alive: agent.alive,
            fitness: agent.fitness,
            age: agent.stats.age,
            food_eaten: agent.stats.food_eaten,
            genome_hex: genome_digest(agent),
        }
    }
}

fn genome_digest(agent: &Agent) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    for gene in agent.controller.genes() {
        hasher.update(gene.to_le_bytes());
    }
    hex::encode(&hasher.finalize()[..4])
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WorldSnapshot {
    pub generation: u32,
    pub tick: u64,
    pub width: f64,
    pub height: f64,
    /// Active obstacles only; destroyed structures are omitted.
    pub obstacles: Vec<Obstacle>,
    /// Uneaten food positions.
    pub food: Vec<Vec2>,
    pub tool: Option<Tool>,
    pub keys: Vec<Key>,
    pub doors: Vec<Door>,
    pub chest: Option<Chest>,
    pub fortresses: Vec<Fortress>,
    pub puzzle: PuzzleStatus,
    pub agents: Vec<AgentSnapshot>,
}

impl WorldSnapshot {
    #[must_use]
    pub fn capture(world: &World, agents: &[Agent], generation: u32, tick: u64) -> Self {
        use evolarium_data::{DoorKind, KeyKind};
        Self {
            generation,
            tick,
            width: world.width,
            height: world.height,
            obstacles: world
                .obstacles()
                .iter()
                .filter(|o| o.is_active())
                .cloned()
                .collect(),
            food: world
                .food()
                .iter()
                .filter(|f| !f.eaten)
                .map(|f| f.position)
                .collect(),
            tool: world.tool().copied(),
            keys: [KeyKind::Red, KeyKind::Gold]
                .into_iter()
                .filter_map(|k| world.key(k).copied())
                .collect(),
            doors: [DoorKind::Wood, DoorKind::Iron]
                .into_iter()
                .filter_map(|d| world.door(d).copied())
                .collect(),
            chest: world.chest().copied(),
            fortresses: world.fortresses().to_vec(),
            puzzle: world.puzzle_status(),
            agents: agents.iter().map(AgentSnapshot::from_agent).collect(),
        }
    }
}
