//! The key and door chain: red key, wood door, gold key, iron door, chest.
//!
//! Every transition is gated on the previous one and is terminal. Progress
//! survives generation resets.

use super::World;
use evolarium_data::{DoorKind, KeyKind, Vec2};

/// Next unsolved step of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleTarget {
    RedKey,
    WoodDoor,
    GoldKey,
    IronDoor,
    Chest,
}

impl World {
    /// The next reachable puzzle objective and its position, if any.
    ///
    /// Nothing is active before the red key spawns or once the chest is
    /// open.
    pub fn active_puzzle_target(&self, generation: u32) -> Option<(PuzzleTarget, Vec2)> {
        let red = self.red_key.as_ref()?;
        if !red.collected {
            return (generation >= self.puzzle_rules.red_key_spawn_generation)
                .then_some((PuzzleTarget::RedKey, red.position));
        }
        if let Some(door) = self.wood_door.as_ref().filter(|d| !d.is_open()) {
            return Some((PuzzleTarget::WoodDoor, door.rect.center()));
        }
        if let Some(key) = self.gold_key.as_ref().filter(|k| !k.collected) {
            return Some((PuzzleTarget::GoldKey, key.position));
        }
        if let Some(door) = self.iron_door.as_ref().filter(|d| !d.is_open()) {
            return Some((PuzzleTarget::IronDoor, door.rect.center()));
        }
        self.chest
            .as_ref()
            .filter(|c| !c.open)
            .map(|c| (PuzzleTarget::Chest, c.rect.center()))
    }

    fn key_available(&self, kind: KeyKind, generation: u32) -> bool {
        match kind {
            KeyKind::Red => generation >= self.puzzle_rules.red_key_spawn_generation,
            KeyKind::Gold => self.door_open(DoorKind::Wood),
        }
    }

    /// Collects a key within `pickup_range`. Returns `None` when nothing was
    /// collected, including for keys already held.
    pub fn try_pickup_key(&mut self, point: Vec2, generation: u32) -> Option<KeyKind> {
        let reach_sq = self.settings.pickup_range * self.settings.pickup_range;
        for kind in [KeyKind::Red, KeyKind::Gold] {
            if !self.key_available(kind, generation) {
                continue;
            }
            let slot = match kind {
                KeyKind::Red => &mut self.red_key,
                KeyKind::Gold => &mut self.gold_key,
            };
            if let Some(key) = slot {
                if !key.collected && key.position.distance_sq(point) <= reach_sq {
                    key.collected = true;
                    tracing::debug!(?kind, "Key collected");
                    return Some(kind);
                }
            }
        }
        None
    }

    /// Strikes a closed door. Needs the matching key, `door_range`
    /// proximity and the door cooldown. Returns `true` if the strike
    /// registered; the door opens on the threshold-th strike.
    pub fn try_strike_door(&mut self, point: Vec2, kind: DoorKind, tick: u64) -> bool {
        if !self.key_collected(kind.required_key()) {
            return false;
        }
        let rules = &self.puzzle_rules;
        let range_sq = rules.door_range * rules.door_range;
        let slot = match kind {
            DoorKind::Wood => &mut self.wood_door,
            DoorKind::Iron => &mut self.iron_door,
        };
        let Some(door) = slot else {
            return false;
        };
        if door.is_open()
            || door.rect.distance_sq_to(point) > range_sq
            || !door.hits.ready(tick, rules.door_strike_cooldown)
        {
            return false;
        }
        if door.hits.strike(tick, rules.door_strike_threshold) {
            tracing::debug!(?kind, "Door opened");
        }
        true
    }

    /// Opens the chest when within `chest_range`. Terminal.
    pub fn try_open_chest(&mut self, point: Vec2) -> bool {
        let range_sq = self.puzzle_rules.chest_range * self.puzzle_rules.chest_range;
        match self.chest.as_mut() {
            Some(chest) if !chest.open && chest.rect.distance_sq_to(point) <= range_sq => {
                chest.open = true;
                true
            }
            _ => false,
        }
    }
}
