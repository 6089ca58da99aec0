//! Tool pickup and structure destruction.
//!
//! Trees and huts are solid until struck `strike_threshold` times with the
//! tool. Each destroyed structure drops a handful of food around the map.

use super::placement::PlacementRequest;
use super::World;
use evolarium_data::{ObstacleKind, Vec2};
use rand::Rng;

/// Result of a strike attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureHitOutcome {
    /// Nothing in range, prerequisites missing, or a cooldown blocked it.
    None,
    Damaged {
        obstacle: u32,
        kind: ObstacleKind,
        hits: u32,
    },
    Destroyed {
        obstacle: u32,
        kind: ObstacleKind,
        food_spawned: usize,
    },
}

impl World {
    /// Picks up the tool when within reach. Irreversible.
    pub fn try_pickup_tool(&mut self, point: Vec2) -> bool {
        let reach_sq = self.settings.pickup_range * self.settings.pickup_range;
        match self.tool.as_mut() {
            Some(tool) if !tool.picked_up && tool.position.distance_sq(point) <= reach_sq => {
                tool.picked_up = true;
                true
            }
            _ => false,
        }
    }

    /// Nearest standing tree, only while cutting is allowed. Returns its
    /// centre and distance.
    pub fn nearest_cuttable_tree(&self, point: Vec2) -> Option<(Vec2, f64)> {
        if !self.can_cut_trees {
            return None;
        }
        self.obstacles
            .iter()
            .filter(|o| o.kind == ObstacleKind::Tree && o.is_active())
            .map(|o| (o.rect.center(), o.rect.center().distance_sq(point)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(c, d)| (c, d.sqrt()))
    }

    fn global_strike_ready(&self, tick: u64) -> bool {
        self.last_global_strike
            .map_or(true, |last| tick.saturating_sub(last) >= self.structure_rules.global_cooldown)
    }

    /// Strikes the nearest tree or hut within `strike_range`.
    ///
    /// Requires the tool. Trees additionally require the cutting gate. A
    /// strike blocked by the per-structure or global cooldown is not
    /// counted.
    pub fn try_strike_structure<R: Rng>(
        &mut self,
        point: Vec2,
        tick: u64,
        rng: &mut R,
    ) -> StructureHitOutcome {
        if !self.tool_held() || !self.global_strike_ready(tick) {
            return StructureHitOutcome::None;
        }
        let range_sq = self.structure_rules.strike_range * self.structure_rules.strike_range;
        let can_cut = self.can_cut_trees;
        let target = self
            .obstacles
            .iter()
            .enumerate()
            .filter(|(_, o)| {
                o.is_active()
                    && match o.kind {
                        ObstacleKind::Hut => true,
                        ObstacleKind::Tree => can_cut,
                        _ => false,
                    }
            })
            .map(|(i, o)| (i, o.rect.distance_sq_to(point)))
            .filter(|(_, d)| *d <= range_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i);
        let Some(idx) = target else {
            return StructureHitOutcome::None;
        };

        let rules = &self.structure_rules;
        let obstacle = &mut self.obstacles[idx];
        if !obstacle.hits.ready(tick, rules.structure_cooldown) {
            return StructureHitOutcome::None;
        }
        let destroyed = obstacle.hits.strike(tick, rules.strike_threshold);
        let (id, kind, hits, center) = (
            obstacle.id,
            obstacle.kind,
            obstacle.hits.hits,
            obstacle.rect.center(),
        );
        self.last_global_strike = Some(tick);

        if !destroyed {
            return StructureHitOutcome::Damaged {
                obstacle: id,
                kind,
                hits,
            };
        }

        let reward = if kind == ObstacleKind::Tree {
            self.structure_rules.tree_food_reward
        } else {
            self.structure_rules.hut_food_reward
        };
        let food_spawned = self.spawn_reward_food(reward, center, rng);
        tracing::debug!(obstacle = id, ?kind, food = food_spawned, "Structure destroyed");
        StructureHitOutcome::Destroyed {
            obstacle: id,
            kind,
            food_spawned,
        }
    }

    /// Drops `count` food items anywhere on the map. Each item first tries
    /// normal food placement, then without spacing, and finally lands on
    /// the destroyed structure's footprint.
    fn spawn_reward_food<R: Rng>(&mut self, count: usize, origin: Vec2, rng: &mut R) -> usize {
        let mut strict = PlacementRequest::food(self);
        strict.attempts = self.structure_rules.food_attempts_per_item;
        let relaxed = PlacementRequest {
            food_spacing: None,
            ..strict
        };
        for _ in 0..count {
            let first = self.find_placement(&strict, origin, rng);
            let position = if first.used_fallback {
                self.find_placement(&relaxed, origin, rng).position
            } else {
                first.position
            };
            self.place_food(position);
        }
        count
    }
}
