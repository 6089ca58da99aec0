//! Plain serialisable data shared by the simulation and its consumers.

pub mod data;

pub use data::agent::{Agent, AgentOrigin, AgentStats, MovementQuality, MovementWindows};
pub use data::controller::{Controller, Layer};
pub use data::geometry::{angle_delta, normalize_angle, Rect, Vec2};
pub use data::obstacle::{
    Food, HitCounter, Obstacle, ObstacleFilter, ObstacleKind, Provenance, Tool, ZoneEffect,
};
pub use data::puzzle::{Chest, Door, DoorKind, Fortress, Key, KeyKind};
pub use data::record::{BehaviorProfile, GenerationSummary, PuzzleStatus, SimEvent, SkillAverages};
pub use data::ring::RingBuffer;
