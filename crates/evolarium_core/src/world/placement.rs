//! Retry-until-valid placement shared by obstacles, food, the tool, keys
//! and agent spawns.
//!
//! A candidate is sampled uniformly inside the playable area and rejected
//! when it overlaps an excluded region (fortress interior, safe zone), an
//! existing object plus clearance, or (for food) another food item. When
//! probing is requested, at least `min_free` of eight compass offsets
//! around the candidate must also be clear, which rules out dead-end
//! pockets. After `attempts` failures the fallback is returned.

use super::World;
use evolarium_data::{ObstacleFilter, Vec2};
use rand::Rng;

const PROBE_DIRECTIONS: [(f64, f64); 8] = [
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (1.0, 1.0),
    (1.0, -1.0),
    (-1.0, 1.0),
    (-1.0, -1.0),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    pub distance: f64,
    pub min_free: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    /// Clearance kept from obstacles matching `filter`.
    pub radius: f64,
    /// Inset from the world edge.
    pub margin: f64,
    pub filter: ObstacleFilter,
    /// Minimum distance to uneaten food, when set.
    pub food_spacing: Option<f64>,
    pub probe: Option<Probe>,
    pub attempts: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec2,
    pub used_fallback: bool,
}

impl PlacementRequest {
    /// Agent spawn: clear of every obstacle kind, with at least one open
    /// direction.
    pub fn spawn(world: &World) -> Self {
        Self {
            radius: world.agent_radius,
            margin: world.agent_radius,
            filter: ObstacleFilter::ALL,
            food_spacing: None,
            probe: Some(Probe {
                distance: world.settings.spawn_probe_distance,
                min_free: world.settings.spawn_min_free_probes,
            }),
            attempts: world.settings.placement_attempts,
        }
    }

    pub fn food(world: &World) -> Self {
        Self {
            radius: world.settings.food_clearance,
            margin: world.settings.food_margin,
            filter: ObstacleFilter::ALL,
            food_spacing: Some(world.settings.food_spacing),
            probe: None,
            attempts: world.settings.placement_attempts,
        }
    }

    /// Tool and key placement: well connected to the open field.
    pub fn pickup(world: &World) -> Self {
        Self {
            radius: world.agent_radius * 2.0,
            margin: world.settings.obstacle_margin,
            filter: ObstacleFilter::ALL,
            food_spacing: None,
            probe: Some(Probe {
                distance: world.settings.tool_probe_distance,
                min_free: world.settings.tool_min_free_probes,
            }),
            attempts: world.settings.tool_attempts,
        }
    }
}

impl World {
    /// True inside a fortress (grown by `radius`) or the reserved safe zone.
    pub fn is_excluded(&self, point: Vec2, radius: f64) -> bool {
        let in_fortress = self
            .fortresses
            .iter()
            .any(|f| f.bounds.inflate(radius).contains(point));
        let safe = self.fallback_position();
        let in_safe_zone =
            point.distance_sq(safe) < (self.settings.safe_zone_radius + radius).powi(2);
        in_fortress || in_safe_zone
    }

    fn probe_free(&self, point: Vec2, req: &PlacementRequest) -> bool {
        self.inside_bounds(point, req.radius)
            && !self.fortresses.iter().any(|f| f.bounds.contains(point))
            && !self.collides(point, req.radius, req.filter)
            && !self.hits_closed_door(point, req.radius)
    }

    pub fn is_valid_placement(&self, point: Vec2, req: &PlacementRequest) -> bool {
        if !self.inside_bounds(point, req.margin.max(req.radius)) {
            return false;
        }
        if self.is_excluded(point, req.radius) {
            return false;
        }
        if self.collides(point, req.radius, req.filter) || self.hits_closed_door(point, req.radius)
        {
            return false;
        }
        if let Some(spacing) = req.food_spacing {
            let spacing_sq = spacing * spacing;
            if self
                .food
                .iter()
                .any(|f| !f.eaten && f.position.distance_sq(point) < spacing_sq)
            {
                return false;
            }
        }
        if let Some(probe) = req.probe {
            let free = PROBE_DIRECTIONS
                .iter()
                .filter(|(dx, dy)| {
                    self.probe_free(
                        point.offset(dx * probe.distance, dy * probe.distance),
                        req,
                    )
                })
                .count();
            if free < probe.min_free {
                return false;
            }
        }
        true
    }

    /// Samples until a valid position is found or the budget runs out.
    pub fn find_placement<R: Rng>(
        &self,
        req: &PlacementRequest,
        fallback: Vec2,
        rng: &mut R,
    ) -> Placement {
        let inset = req.margin.max(req.radius);
        let (x0, x1) = (inset, self.width - inset);
        let (y0, y1) = (inset, self.height - inset);
        if x0 < x1 && y0 < y1 {
            for _ in 0..req.attempts {
                let candidate = Vec2::new(rng.gen_range(x0..x1), rng.gen_range(y0..y1));
                if self.is_valid_placement(candidate, req) {
                    return Placement {
                        position: candidate,
                        used_fallback: false,
                    };
                }
            }
        }
        tracing::debug!(
            attempts = req.attempts,
            x = fallback.x,
            y = fallback.y,
            "Placement budget exhausted, using fallback"
        );
        Placement {
            position: fallback,
            used_fallback: true,
        }
    }

    /// Spawn position for a new agent. Falls back to the safe-zone centre,
    /// which generation keeps clear.
    pub fn spawn_position<R: Rng>(&self, rng: &mut R) -> Placement {
        let req = PlacementRequest::spawn(self);
        self.find_placement(&req, self.fallback_position(), rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use evolarium_data::{ObstacleKind, Rect};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_spawn_avoids_obstacles() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let world = World::generate(&config, &mut rng);
        for _ in 0..200 {
            let p = world.spawn_position(&mut rng);
            if !p.used_fallback {
                assert!(!world.collides_blocking(p.position, config.agent.radius));
                assert!(!world.is_excluded(p.position, 0.0));
            } else {
                assert_eq!(p.position, world.fallback_position());
            }
        }
    }

    #[test]
    fn test_fully_blocked_world_falls_back() {
        let config = AppConfig::default();
        let mut world = World::empty(&config);
        world.place_obstacle(ObstacleKind::Wall, Rect::new(0.0, 0.0, config.world.width, config.world.height));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let p = world.spawn_position(&mut rng);
        assert!(p.used_fallback);
        assert_eq!(p.position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_probe_requirement_rejects_pockets() {
        let config = AppConfig::default();
        let mut world = World::empty(&config);
        // A 3-sided pocket around (400, 400)
        world.place_obstacle(ObstacleKind::Wall, Rect::new(370.0, 370.0, 60.0, 10.0));
        world.place_obstacle(ObstacleKind::Wall, Rect::new(370.0, 420.0, 60.0, 10.0));
        world.place_obstacle(ObstacleKind::Wall, Rect::new(370.0, 370.0, 10.0, 60.0));
        let strict = PlacementRequest {
            radius: 8.0,
            margin: 8.0,
            filter: ObstacleFilter::BLOCKING,
            food_spacing: None,
            probe: Some(Probe {
                distance: 20.0,
                min_free: 8,
            }),
            attempts: 1,
        };
        assert!(!world.is_valid_placement(Vec2::new(400.0, 400.0), &strict));
        let lenient = PlacementRequest {
            probe: None,
            ..strict
        };
        assert!(world.is_valid_placement(Vec2::new(400.0, 400.0), &lenient));
    }

    #[test]
    fn test_food_spacing() {
        let config = AppConfig::default();
        let mut world = World::empty(&config);
        world.place_food(Vec2::new(500.0, 500.0));
        let req = PlacementRequest::food(&world);
        assert!(!world.is_valid_placement(Vec2::new(520.0, 500.0), &req));
        assert!(world.is_valid_placement(Vec2::new(560.0, 500.0), &req));
    }
}
