//! World model: obstacles, food, the tool and the puzzle chain.
//!
//! The [`World`] is the single shared mutable value of a simulation. Agents
//! receive it by reference during their act phase and every mutation goes
//! through a method here, which enforces gating and cooldowns.

pub mod generation;
pub mod grid;
pub mod placement;
pub mod puzzle;
pub mod structures;

use crate::config::{AppConfig, PuzzleConfig, StructureConfig, WorldConfig};
use evolarium_data::{
    Chest, Door, DoorKind, Food, Fortress, Key, KeyKind, Obstacle, ObstacleFilter, ObstacleKind,
    Provenance, PuzzleStatus, Rect, Tool, Vec2, ZoneEffect,
};
use grid::ObstacleGrid;
use rand::Rng;

pub use placement::{Placement, PlacementRequest};
pub use puzzle::PuzzleTarget;
pub use structures::StructureHitOutcome;

#[derive(Debug, Clone)]
pub struct World {
    pub width: f64,
    pub height: f64,
    pub(crate) settings: WorldConfig,
    pub(crate) structure_rules: StructureConfig,
    pub(crate) puzzle_rules: PuzzleConfig,
    pub(crate) agent_radius: f64,
    pub(crate) obstacles: Vec<Obstacle>,
    pub(crate) grid: ObstacleGrid,
    pub(crate) food: Vec<Food>,
    pub(crate) tool: Option<Tool>,
    pub(crate) fortresses: Vec<Fortress>,
    pub(crate) red_key: Option<Key>,
    pub(crate) gold_key: Option<Key>,
    pub(crate) wood_door: Option<Door>,
    pub(crate) iron_door: Option<Door>,
    pub(crate) chest: Option<Chest>,
    pub(crate) can_cut_trees: bool,
    pub(crate) last_global_strike: Option<u64>,
    next_obstacle_id: u32,
}

impl World {
    /// An empty world: no obstacles, food, tool or puzzle objects.
    pub fn empty(config: &AppConfig) -> Self {
        let w = &config.world;
        Self {
            width: w.width,
            height: w.height,
            settings: w.clone(),
            structure_rules: config.structures.clone(),
            puzzle_rules: config.puzzle.clone(),
            agent_radius: config.agent.radius,
            obstacles: Vec::new(),
            grid: ObstacleGrid::new(w.grid_cell_size, w.width, w.height),
            food: Vec::new(),
            tool: None,
            fortresses: Vec::new(),
            red_key: None,
            gold_key: None,
            wood_door: None,
            iron_door: None,
            chest: None,
            can_cut_trees: false,
            last_global_strike: None,
            next_obstacle_id: 0,
        }
    }

    /// Generates a complete world: fortresses and puzzle objects (when
    /// enabled), the tool, the procedural obstacle layout and food.
    pub fn generate<R: Rng>(config: &AppConfig, rng: &mut R) -> Self {
        let mut world = Self::empty(config);
        if config.puzzle.fortresses_enabled {
            world.install_fortresses(rng);
        }
        if config.world.tool_enabled {
            world.spawn_tool(rng);
        }
        world.generate_layout(rng);
        world.rebuild_grid();
        world.spawn_food(config.world.food_count, rng);
        world.update_passive_state();
        tracing::debug!(
            obstacles = world.obstacles.len(),
            food = world.food.len(),
            fortresses = world.fortresses.len(),
            "World generated"
        );
        world
    }

    pub(crate) fn next_id(&mut self) -> u32 {
        let id = self.next_obstacle_id;
        self.next_obstacle_id += 1;
        id
    }

    pub(crate) fn push_obstacle(&mut self, kind: ObstacleKind, rect: Rect, provenance: Provenance) -> u32 {
        let id = self.next_id();
        self.obstacles.push(Obstacle::new(id, kind, rect, provenance));
        id
    }

    pub(crate) fn rebuild_grid(&mut self) {
        self.grid.build(&self.obstacles);
    }

    /// User-placed obstacle. Survives generation resets.
    pub fn place_obstacle(&mut self, kind: ObstacleKind, rect: Rect) -> u32 {
        let id = self.push_obstacle(kind, rect, Provenance::Manual);
        self.rebuild_grid();
        id
    }

    /// User-placed food item.
    pub fn place_food(&mut self, position: Vec2) {
        self.food.push(Food::new(position));
    }

    /// Puts the tool at `position`, replacing any existing unheld tool.
    pub fn place_tool(&mut self, position: Vec2) {
        if self.tool_held() {
            return;
        }
        self.tool = Some(Tool {
            position,
            picked_up: false,
        });
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn food(&self) -> &[Food] {
        &self.food
    }

    pub fn tool(&self) -> Option<&Tool> {
        self.tool.as_ref()
    }

    pub fn fortresses(&self) -> &[Fortress] {
        &self.fortresses
    }

    pub fn key(&self, kind: KeyKind) -> Option<&Key> {
        match kind {
            KeyKind::Red => self.red_key.as_ref(),
            KeyKind::Gold => self.gold_key.as_ref(),
        }
    }

    pub fn door(&self, kind: DoorKind) -> Option<&Door> {
        match kind {
            DoorKind::Wood => self.wood_door.as_ref(),
            DoorKind::Iron => self.iron_door.as_ref(),
        }
    }

    pub fn chest(&self) -> Option<&Chest> {
        self.chest.as_ref()
    }

    pub fn tool_held(&self) -> bool {
        self.tool.is_some_and(|t| t.picked_up)
    }

    pub fn can_cut_trees(&self) -> bool {
        self.can_cut_trees
    }

    pub fn key_collected(&self, kind: KeyKind) -> bool {
        self.key(kind).is_some_and(|k| k.collected)
    }

    pub fn door_open(&self, kind: DoorKind) -> bool {
        self.door(kind).is_some_and(Door::is_open)
    }

    pub fn any_door_open(&self) -> bool {
        self.door_open(DoorKind::Wood) || self.door_open(DoorKind::Iron)
    }

    pub fn chest_open(&self) -> bool {
        self.chest.is_some_and(|c| c.open)
    }

    pub fn remaining_food(&self) -> usize {
        self.food.iter().filter(|f| !f.eaten).count()
    }

    /// Remaining food relative to the configured food count, in `[0, 1]`.
    pub fn food_ratio(&self) -> f64 {
        let target = self.settings.food_count.max(1) as f64;
        (self.remaining_food() as f64 / target).min(1.0)
    }

    pub fn fallback_position(&self) -> Vec2 {
        Vec2::new(self.settings.fallback.0, self.settings.fallback.1)
    }

    pub fn puzzle_status(&self) -> PuzzleStatus {
        PuzzleStatus {
            tool_picked_up: self.tool_held(),
            red_key_collected: self.key_collected(KeyKind::Red),
            gold_key_collected: self.key_collected(KeyKind::Gold),
            doors_opened: u32::from(self.door_open(DoorKind::Wood))
                + u32::from(self.door_open(DoorKind::Iron)),
            chest_opened: self.chest_open(),
        }
    }

    // ------------------------------------------------------------------
    // Collision and proximity queries
    // ------------------------------------------------------------------

    /// Circle-vs-rectangle test against active obstacles matching `filter`.
    /// Water and potions only collide when the filter asks for them.
    pub fn collides(&self, point: Vec2, radius: f64, filter: ObstacleFilter) -> bool {
        let area = Rect::new(point.x - radius, point.y - radius, radius * 2.0, radius * 2.0);
        self.grid.any_in(&area, |i| {
            let obstacle = &self.obstacles[i];
            filter.matches(obstacle.kind) && obstacle.collides_with(point, radius)
        })
    }

    /// True if a body at `point` would overlap a closed door.
    pub fn hits_closed_door(&self, point: Vec2, radius: f64) -> bool {
        [&self.wood_door, &self.iron_door]
            .into_iter()
            .flatten()
            .any(|door| !door.is_open() && door.rect.intersects_circle(point, radius))
    }

    pub fn inside_bounds(&self, point: Vec2, radius: f64) -> bool {
        point.is_finite()
            && point.x - radius >= 0.0
            && point.y - radius >= 0.0
            && point.x + radius <= self.width
            && point.y + radius <= self.height
    }

    /// Full movement test: perimeter, blocking obstacles and closed doors.
    pub fn collides_blocking(&self, point: Vec2, radius: f64) -> bool {
        !self.inside_bounds(point, radius)
            || self.collides(point, radius, ObstacleFilter::BLOCKING)
            || self.hits_closed_door(point, radius)
    }

    /// Distance to the closest blocking obstacle or closed door within
    /// `max_range`.
    pub fn nearest_blocking_distance(&self, point: Vec2, max_range: f64) -> Option<f64> {
        let max_sq = max_range * max_range;
        let area = Rect::new(
            point.x - max_range,
            point.y - max_range,
            max_range * 2.0,
            max_range * 2.0,
        );
        let mut best: Option<f64> = None;
        let mut consider = |d: f64| {
            if d <= max_sq && best.map_or(true, |b| d < b) {
                best = Some(d);
            }
        };
        self.grid.for_each_in(&area, |i| {
            let o = &self.obstacles[i];
            if o.is_active() && o.kind.blocks_movement() {
                consider(o.rect.distance_sq_to(point));
            }
        });
        for door in [&self.wood_door, &self.iron_door].into_iter().flatten() {
            if !door.is_open() {
                consider(door.rect.distance_sq_to(point));
            }
        }
        best.map(f64::sqrt)
    }

    /// Closest uneaten food and its distance.
    pub fn nearest_food(&self, point: Vec2) -> Option<(Vec2, f64)> {
        self.food
            .iter()
            .filter(|f| !f.eaten)
            .map(|f| (f.position, f.position.distance_sq(point)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(p, d)| (p, d.sqrt()))
    }

    /// Overlapping zone effect, if the body touches water.
    pub fn zone_effect(&self, point: Vec2, radius: f64) -> Option<ZoneEffect> {
        if self.collides(point, radius, ObstacleFilter::only(ObstacleKind::Water)) {
            Some(ZoneEffect {
                energy_loss: self.settings.water_energy_loss,
                speed_factor: self.settings.water_speed_factor,
                min_speed: self.settings.water_min_speed,
            })
        } else {
            None
        }
    }

    // ------------------------------------------------------------------
    // Resource interactions
    // ------------------------------------------------------------------

    /// Eats the closest uneaten food within reach.
    pub fn try_eat(&mut self, point: Vec2) -> bool {
        let reach_sq = self.settings.eat_range * self.settings.eat_range;
        let nearest = self
            .food
            .iter_mut()
            .filter(|f| !f.eaten)
            .map(|f| {
                let d = f.position.distance_sq(point);
                (f, d)
            })
            .filter(|(_, d)| *d < reach_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        match nearest {
            Some((food, _)) => {
                food.eaten = true;
                true
            }
            None => false,
        }
    }

    /// Consumes a potion within reach. The caller heals the agent.
    pub fn try_consume_potion(&mut self, point: Vec2) -> bool {
        let reach_sq = self.settings.potion_range * self.settings.potion_range;
        let found = self.obstacles.iter().position(|o| {
            o.kind == ObstacleKind::Potion && o.is_active() && o.rect.distance_sq_to(point) <= reach_sq
        });
        match found {
            Some(idx) => {
                self.obstacles.remove(idx);
                self.rebuild_grid();
                true
            }
            None => false,
        }
    }

    /// Advances passive per-tick state. Trees may only be cut while the tool
    /// is held and food is scarce; otherwise partial cuts heal.
    pub fn update_passive_state(&mut self) {
        let allowed = self.tool_held()
            && self.remaining_food() <= self.structure_rules.tree_cutting_food_threshold;
        if !allowed {
            for obstacle in &mut self.obstacles {
                if obstacle.kind == ObstacleKind::Tree {
                    obstacle.hits.reset();
                }
            }
        }
        self.can_cut_trees = allowed;
    }

    /// Resets transient state between generations.
    ///
    /// Food and generated obstacles are discarded and regenerated. Tool,
    /// keys, doors, chest and user-placed objects keep their state.
    pub fn reset_for_new_generation<R: Rng>(&mut self, rng: &mut R) {
        self.food.clear();
        self.obstacles
            .retain(|o| o.provenance != Provenance::Generated);
        for obstacle in &mut self.obstacles {
            if obstacle.kind.is_structure() {
                obstacle.hits.reset();
            }
        }
        // Door hits carry over; their cooldown restarts with the tick clock.
        for door in [&mut self.wood_door, &mut self.iron_door].into_iter().flatten() {
            door.hits.clear_cooldown();
        }
        self.last_global_strike = None;

        self.generate_layout(rng);
        self.rebuild_grid();
        self.spawn_food(self.settings.food_count, rng);
        self.update_passive_state();

        tracing::debug!(
            obstacles = self.obstacles.len(),
            food = self.food.len(),
            "World reset for new generation"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config() -> AppConfig {
        AppConfig::default()
    }

    #[test]
    fn test_water_never_blocks() {
        let mut world = World::empty(&config());
        world.place_obstacle(ObstacleKind::Water, Rect::new(100.0, 100.0, 20.0, 20.0));
        let inside = Vec2::new(110.0, 110.0);
        assert!(!world.collides_blocking(inside, 8.0));
        assert!(world.collides(inside, 8.0, ObstacleFilter::only(ObstacleKind::Water)));
        assert!(world.zone_effect(inside, 8.0).is_some());
    }

    #[test]
    fn test_walls_block_and_perimeter_blocks() {
        let mut world = World::empty(&config());
        world.place_obstacle(ObstacleKind::Wall, Rect::new(100.0, 100.0, 20.0, 20.0));
        assert!(world.collides_blocking(Vec2::new(95.0, 110.0), 8.0));
        assert!(!world.collides_blocking(Vec2::new(80.0, 110.0), 8.0));
        assert!(world.collides_blocking(Vec2::new(4.0, 300.0), 8.0));
        assert!(world.collides_blocking(Vec2::new(f64::NAN, 300.0), 8.0));
    }

    #[test]
    fn test_eat_marks_nearest_food() {
        let mut world = World::empty(&config());
        world.place_food(Vec2::new(130.0, 100.0));
        world.place_food(Vec2::new(110.0, 100.0));
        assert!(world.try_eat(Vec2::new(100.0, 100.0)));
        assert!(world.food()[1].eaten);
        assert!(!world.food()[0].eaten);
        assert_eq!(world.remaining_food(), 1);
        assert!(!world.try_eat(Vec2::new(400.0, 400.0)));
    }

    #[test]
    fn test_potion_is_consumed_once() {
        let mut world = World::empty(&config());
        world.place_obstacle(ObstacleKind::Potion, Rect::centered(Vec2::new(200.0, 200.0), 16.0, 16.0));
        assert!(world.try_consume_potion(Vec2::new(210.0, 200.0)));
        assert!(!world.try_consume_potion(Vec2::new(210.0, 200.0)));
    }

    #[test]
    fn test_nearest_blocking_distance() {
        let mut world = World::empty(&config());
        world.place_obstacle(ObstacleKind::Tree, Rect::new(200.0, 100.0, 20.0, 20.0));
        world.place_obstacle(ObstacleKind::Water, Rect::new(150.0, 100.0, 20.0, 20.0));
        let d = world
            .nearest_blocking_distance(Vec2::new(150.0, 110.0), 150.0)
            .unwrap();
        assert!((d - 50.0).abs() < 1e-9);
        assert!(world
            .nearest_blocking_distance(Vec2::new(600.0, 600.0), 50.0)
            .is_none());
    }

    #[test]
    fn test_reset_keeps_manual_and_regenerates_food() {
        let cfg = config();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut world = World::generate(&cfg, &mut rng);
        let manual = world.place_obstacle(ObstacleKind::Hut, Rect::new(300.0, 300.0, 20.0, 20.0));
        for food in &mut world.food {
            food.eaten = true;
        }
        world.reset_for_new_generation(&mut rng);
        assert!(world.obstacles().iter().any(|o| o.id == manual));
        assert!(world.remaining_food() > 0);
        assert!(world
            .obstacles()
            .iter()
            .filter(|o| o.kind == ObstacleKind::Tree)
            .all(|o| o.hits.hits == 0));
    }
}
