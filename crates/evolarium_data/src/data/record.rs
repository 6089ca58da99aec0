use super::obstacle::ObstacleKind;
use super::puzzle::{DoorKind, KeyKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notable state transitions emitted by the simulation for external
/// consumers (renderers, loggers). Purely informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    GenerationStarted {
        generation: u32,
        population: usize,
        tick_budget: u64,
    },
    AgentDied {
        tick: u64,
        agent: Uuid,
        age: u64,
    },
    FoodEaten {
        tick: u64,
        agent: Uuid,
    },
    PotionConsumed {
        tick: u64,
        agent: Uuid,
    },
    ToolPickedUp {
        tick: u64,
        agent: Uuid,
    },
    StructureDamaged {
        tick: u64,
        agent: Uuid,
        obstacle: u32,
        kind: ObstacleKind,
    },
    StructureDestroyed {
        tick: u64,
        agent: Uuid,
        obstacle: u32,
        kind: ObstacleKind,
    },
    KeyCollected {
        tick: u64,
        agent: Uuid,
        key: KeyKind,
    },
    DoorStruck {
        tick: u64,
        agent: Uuid,
        door: DoorKind,
    },
    DoorOpened {
        tick: u64,
        agent: Uuid,
        door: DoorKind,
    },
    ChestOpened {
        generation: u32,
        tick: u64,
        agent: Uuid,
    },
    GenerationEnded {
        generation: u32,
        ticks: u64,
        alive: usize,
        max_fitness: f64,
    },
    RandomRestart {
        generation: u32,
    },
    ImmigrantsInjected {
        generation: u32,
        count: usize,
    },
}

/// Population means of the four skill percentages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SkillAverages {
    pub movement: f64,
    pub food: f64,
    pub obstacle: f64,
    pub energy: f64,
}

/// Share of the population (percent) showing each behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BehaviorProfile {
    pub food_seekers: f64,
    pub explorers: f64,
    pub survivors: f64,
    pub efficient_movers: f64,
    pub obstacle_avoiders: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PuzzleStatus {
    pub tool_picked_up: bool,
    pub red_key_collected: bool,
    pub gold_key_collected: bool,
    pub doors_opened: u32,
    pub chest_opened: bool,
}

/// One record per completed generation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: u32,
    pub ticks: u64,
    pub population: usize,
    pub avg_fitness: f64,
    pub max_fitness: f64,
    pub min_fitness: f64,
    pub std_fitness: f64,
    pub avg_food: f64,
    pub max_food: u32,
    pub avg_age: f64,
    pub max_age: u64,
    pub avg_distance: f64,
    pub diversity: f64,
    pub alive: usize,
    pub survival_rate: f64,
    pub skills: SkillAverages,
    pub behavior: BehaviorProfile,
    pub structures_destroyed: u32,
    pub puzzle: PuzzleStatus,
    pub mutation_rate: f64,
    pub immigrants: usize,
    pub random_restart: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_is_tagged() {
        let event = SimEvent::RandomRestart { generation: 4 };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"RandomRestart\""));
    }
}
