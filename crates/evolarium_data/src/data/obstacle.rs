use super::geometry::{Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Closed set of obstacle variants. Each variant carries its own collision
/// and zone policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Wall,
    Tree,
    Water,
    Hut,
    Potion,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 5] = [
        ObstacleKind::Wall,
        ObstacleKind::Tree,
        ObstacleKind::Water,
        ObstacleKind::Hut,
        ObstacleKind::Potion,
    ];

    /// Walls, trees and huts stop movement. Water and potions never do.
    #[must_use]
    pub const fn blocks_movement(self) -> bool {
        matches!(self, Self::Wall | Self::Tree | Self::Hut)
    }

    /// Whether agents with a tool can strike and destroy this obstacle.
    #[must_use]
    pub const fn is_structure(self) -> bool {
        matches!(self, Self::Tree | Self::Hut)
    }

    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::Wall => 1,
            Self::Tree => 1 << 1,
            Self::Water => 1 << 2,
            Self::Hut => 1 << 3,
            Self::Potion => 1 << 4,
        }
    }
}

/// Set of obstacle kinds a query should consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObstacleFilter(u8);

impl ObstacleFilter {
    pub const NONE: ObstacleFilter = ObstacleFilter(0);
    pub const ALL: ObstacleFilter = ObstacleFilter(0b1_1111);
    pub const BLOCKING: ObstacleFilter = ObstacleFilter(
        ObstacleKind::Wall.bit() | ObstacleKind::Tree.bit() | ObstacleKind::Hut.bit(),
    );

    #[must_use]
    pub const fn only(kind: ObstacleKind) -> Self {
        Self(kind.bit())
    }

    #[must_use]
    pub const fn with(self, kind: ObstacleKind) -> Self {
        Self(self.0 | kind.bit())
    }

    #[must_use]
    pub const fn matches(self, kind: ObstacleKind) -> bool {
        self.0 & kind.bit() != 0
    }
}

/// Effect applied while an agent overlaps a zone obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneEffect {
    pub energy_loss: f64,
    pub speed_factor: f64,
    pub min_speed: f64,
}

/// Who put an obstacle in the world. Only `Generated` obstacles are
/// discarded on generation reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    Generated,
    Manual,
    Fortress,
}

/// Strike bookkeeping for destructible structures and doors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HitCounter {
    pub hits: u32,
    pub last_hit_tick: Option<u64>,
    pub destroyed: bool,
}

impl HitCounter {
    /// True when a strike at `tick` respects `cooldown` since the last one.
    #[must_use]
    pub fn ready(&self, tick: u64, cooldown: u64) -> bool {
        match self.last_hit_tick {
            Some(last) => tick.saturating_sub(last) >= cooldown,
            None => true,
        }
    }

    /// Registers a strike and returns `true` if it reached `threshold`.
    pub fn strike(&mut self, tick: u64, threshold: u32) -> bool {
        if self.destroyed {
            return false;
        }
        self.hits += 1;
        self.last_hit_tick = Some(tick);
        if self.hits >= threshold {
            self.destroyed = true;
        }
        self.destroyed
    }

    /// Forgets the last strike tick but keeps the hit count. Used when the
    /// tick clock restarts at a generation boundary.
    pub fn clear_cooldown(&mut self) {
        self.last_hit_tick = None;
    }

    pub fn reset(&mut self) {
        if !self.destroyed {
            self.hits = 0;
            self.last_hit_tick = None;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub rect: Rect,
    pub provenance: Provenance,
    pub hits: HitCounter,
}

impl Obstacle {
    #[must_use]
    pub fn new(id: u32, kind: ObstacleKind, rect: Rect, provenance: Provenance) -> Self {
        Self {
            id,
            kind,
            rect,
            provenance,
            hits: HitCounter::default(),
        }
    }

    /// Destroyed structures take no further part in collision or queries.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.hits.destroyed
    }

    #[must_use]
    pub fn collides_with(&self, center: Vec2, radius: f64) -> bool {
        self.is_active() && self.rect.intersects_circle(center, radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub position: Vec2,
    pub eaten: bool,
}

impl Food {
    #[must_use]
    pub const fn new(position: Vec2) -> Self {
        Self {
            position,
            eaten: false,
        }
    }
}

/// The single axe-style tool. Once picked up it stays held for the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub position: Vec2,
    pub picked_up: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocking_filter() {
        assert!(ObstacleFilter::BLOCKING.matches(ObstacleKind::Wall));
        assert!(ObstacleFilter::BLOCKING.matches(ObstacleKind::Hut));
        assert!(!ObstacleFilter::BLOCKING.matches(ObstacleKind::Water));
        assert!(!ObstacleFilter::BLOCKING.matches(ObstacleKind::Potion));
        for kind in ObstacleKind::ALL {
            assert_eq!(ObstacleFilter::BLOCKING.matches(kind), kind.blocks_movement());
            assert!(ObstacleFilter::ALL.matches(kind));
        }
    }

    #[test]
    fn test_hit_counter_threshold() {
        let mut counter = HitCounter::default();
        assert!(!counter.strike(0, 3));
        assert!(!counter.strike(10, 3));
        assert!(counter.strike(20, 3));
        assert_eq!(counter.hits, 3);
        // Terminal: further strikes are ignored and reset is a no-op
        assert!(!counter.strike(30, 3));
        counter.reset();
        assert!(counter.destroyed);
        assert_eq!(counter.hits, 3);
    }

    #[test]
    fn test_hit_counter_cooldown() {
        let mut counter = HitCounter::default();
        assert!(counter.ready(0, 120));
        counter.strike(5, 3);
        assert!(!counter.ready(100, 120));
        assert!(counter.ready(125, 120));
    }

    #[test]
    fn test_clear_cooldown_keeps_hits() {
        let mut counter = HitCounter::default();
        counter.strike(1400, 3);
        counter.clear_cooldown();
        assert_eq!(counter.hits, 1);
        assert!(!counter.destroyed);
        assert!(counter.ready(0, 60));
    }
}
