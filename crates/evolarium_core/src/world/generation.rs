use super::placement::PlacementRequest;
use super::World;
use crate::config::{sample_count, CountRange};
use evolarium_data::{
    Chest, Door, DoorKind, Fortress, Key, KeyKind, ObstacleFilter, ObstacleKind, Provenance, Rect,
    Tool, Vec2,
};
use rand::Rng;

/// Gap kept between fortress walls and the world edge.
const FORTRESS_INSET: f64 = 40.0;

/// Groups of same-kind obstacles scattered around random centres.
struct ClusterShape {
    kind: ObstacleKind,
    size: f64,
    clusters: CountRange,
    per_cluster: CountRange,
    spread: f64,
}

impl World {
    /// Builds both fortresses with their walls, doors and contents, and
    /// places the red key out in the open.
    ///
    /// The wood fortress (top right) holds the gold key; the iron fortress
    /// (bottom right) holds the chest. Each is sealed by a door set into its
    /// west wall.
    pub fn install_fortresses<R: Rng>(&mut self, rng: &mut R) {
        let p = self.puzzle_rules.clone();
        let x = self.width - p.fortress_width - FORTRESS_INSET;
        let wood = Rect::new(x, FORTRESS_INSET, p.fortress_width, p.fortress_height);
        let iron = Rect::new(
            x,
            self.height - p.fortress_height - FORTRESS_INSET,
            p.fortress_width,
            p.fortress_height,
        );

        let wood_door = self.build_fortress(wood, DoorKind::Wood);
        let iron_door = self.build_fortress(iron, DoorKind::Iron);
        self.wood_door = Some(Door::new(DoorKind::Wood, wood_door));
        self.iron_door = Some(Door::new(DoorKind::Iron, iron_door));

        self.gold_key = Some(Key {
            kind: KeyKind::Gold,
            position: wood.center(),
            collected: false,
        });
        self.chest = Some(Chest {
            rect: Rect::centered(iron.center(), 24.0, 24.0),
            open: false,
        });
        self.rebuild_grid();

        let req = PlacementRequest::pickup(self);
        let fallback = self.fallback_position().offset(self.settings.safe_zone_radius, 0.0);
        let placement = self.find_placement(&req, fallback, rng);
        self.red_key = Some(Key {
            kind: KeyKind::Red,
            position: placement.position,
            collected: false,
        });
    }

    /// Adds perimeter walls for `bounds`, leaving a gap in the west wall.
    /// Returns the door rectangle filling that gap.
    fn build_fortress(&mut self, bounds: Rect, door: DoorKind) -> Rect {
        let t = self.puzzle_rules.wall_thickness;
        let gap = self.puzzle_rules.door_width;
        let gap_top = bounds.center().y - gap / 2.0;
        let gap_bottom = gap_top + gap;

        let walls = [
            Rect::new(bounds.x, bounds.y, bounds.width, t),
            Rect::new(bounds.x, bounds.max_y() - t, bounds.width, t),
            Rect::new(bounds.max_x() - t, bounds.y, t, bounds.height),
            Rect::new(bounds.x, bounds.y, t, gap_top - bounds.y),
            Rect::new(bounds.x, gap_bottom, t, bounds.max_y() - gap_bottom),
        ];
        for wall in walls {
            self.push_obstacle(ObstacleKind::Wall, wall, Provenance::Fortress);
        }
        self.fortresses.push(Fortress { bounds, door });
        Rect::new(bounds.x, gap_top, t, gap)
    }

    pub(crate) fn spawn_tool<R: Rng>(&mut self, rng: &mut R) {
        let req = PlacementRequest::pickup(self);
        let placement = self.find_placement(&req, self.fallback_position(), rng);
        self.tool = Some(Tool {
            position: placement.position,
            picked_up: false,
        });
    }

    /// Points that regenerated obstacles must keep clear: the tool and any
    /// key still lying on the ground.
    fn reserved_points(&self) -> Vec<Vec2> {
        let mut points = Vec::new();
        if let Some(tool) = self.tool.filter(|t| !t.picked_up) {
            points.push(tool.position);
        }
        points.extend(
            [self.red_key, self.gold_key]
                .into_iter()
                .flatten()
                .filter(|k| !k.collected)
                .map(|k| k.position),
        );
        points
    }

    /// Whether a new obstacle footprint may go at `rect`.
    fn obstacle_fits(&self, rect: &Rect, clearance: f64, reserved: &[Vec2]) -> bool {
        let center = rect.center();
        let reach = rect.width.max(rect.height) / 2.0;
        let margin = self.settings.wall_cell;
        rect.x >= margin
            && rect.y >= margin
            && rect.max_x() <= self.width - margin
            && rect.max_y() <= self.height - margin
            && !self.is_excluded(center, reach + self.agent_radius)
            && !reserved
                .iter()
                .any(|p| rect.inflate(self.agent_radius * 2.0).contains(*p))
            && !self.collides(center, clearance, ObstacleFilter::ALL)
    }

    fn try_place_generated<R: Rng>(
        &mut self,
        kind: ObstacleKind,
        size: f64,
        around: Option<(Vec2, f64)>,
        attempts: usize,
        reserved: &[Vec2],
        rng: &mut R,
    ) -> bool {
        let margin = self.settings.obstacle_margin;
        if self.width <= 2.0 * margin || self.height <= 2.0 * margin {
            return false;
        }
        let clearance = self.settings.obstacle_clearance;
        for _ in 0..attempts {
            let center = match around {
                Some((c, spread)) => c.offset(
                    rng.gen_range(-spread..=spread),
                    rng.gen_range(-spread..=spread),
                ),
                None => Vec2::new(
                    rng.gen_range(margin..self.width - margin),
                    rng.gen_range(margin..self.height - margin),
                ),
            };
            let rect = Rect::centered(center, size, size);
            if self.obstacle_fits(&rect, clearance, reserved) {
                self.push_obstacle(kind, rect, Provenance::Generated);
                self.rebuild_grid();
                return true;
            }
        }
        false
    }

    /// Places a rigid wall shape (cells relative to its origin) at a random
    /// origin, retrying when any cell lands in an excluded region.
    fn try_place_wall_shape<R: Rng>(
        &mut self,
        cells: &[(i32, i32)],
        reserved: &[Vec2],
        rng: &mut R,
    ) -> bool {
        let cell = self.settings.wall_cell;
        let (lo_x, hi_x) = (100.0, self.width - 200.0);
        let (lo_y, hi_y) = (100.0, self.height - 200.0);
        if lo_x >= hi_x || lo_y >= hi_y {
            return false;
        }
        for _ in 0..self.settings.cluster_attempts {
            let origin = Vec2::new(rng.gen_range(lo_x..hi_x), rng.gen_range(lo_y..hi_y));
            let rects: Vec<Rect> = cells
                .iter()
                .map(|&(cx, cy)| {
                    Rect::new(
                        origin.x + f64::from(cx) * cell,
                        origin.y + f64::from(cy) * cell,
                        cell,
                        cell,
                    )
                })
                .collect();
            if rects.iter().all(|r| self.obstacle_fits(r, 0.0, reserved)) {
                for rect in rects {
                    self.push_obstacle(ObstacleKind::Wall, rect, Provenance::Generated);
                }
                self.rebuild_grid();
                return true;
            }
        }
        false
    }

    fn generate_walls<R: Rng>(&mut self, reserved: &[Vec2], rng: &mut R) {
        let s = self.settings.clone();
        for _ in 0..sample_count(s.wall_lines, rng) {
            let length = sample_count(s.wall_line_length, rng) as i32;
            let horizontal = rng.gen_bool(0.5);
            let cells: Vec<(i32, i32)> = (0..length)
                .map(|i| if horizontal { (i, 0) } else { (0, i) })
                .collect();
            self.try_place_wall_shape(&cells, reserved, rng);
        }
        for _ in 0..sample_count(s.wall_l_shapes, rng) {
            self.try_place_wall_shape(&[(0, 0), (1, 0), (2, 0), (0, 1), (0, 2)], reserved, rng);
        }
        for _ in 0..sample_count(s.wall_squares, rng) {
            self.try_place_wall_shape(&[(0, 0), (1, 0), (0, 1), (1, 1)], reserved, rng);
        }
    }

    fn generate_clusters<R: Rng>(&mut self, shape: &ClusterShape, reserved: &[Vec2], rng: &mut R) {
        let (w, h) = (self.width, self.height);
        if w <= 200.0 || h <= 200.0 {
            return;
        }
        let attempts = self.settings.cluster_attempts;
        for _ in 0..sample_count(shape.clusters, rng) {
            let center = Vec2::new(rng.gen_range(100.0..w - 100.0), rng.gen_range(100.0..h - 100.0));
            for _ in 0..sample_count(shape.per_cluster, rng) {
                self.try_place_generated(
                    shape.kind,
                    shape.size,
                    Some((center, shape.spread)),
                    attempts,
                    reserved,
                    rng,
                );
            }
        }
    }

    /// Procedural obstacle layout: walls, loose forest, tree clusters, water
    /// clusters, huts and potions, in that order.
    pub(crate) fn generate_layout<R: Rng>(&mut self, rng: &mut R) {
        let s = self.settings.clone();
        let reserved = self.reserved_points();
        self.rebuild_grid();

        self.generate_walls(&reserved, rng);

        for _ in 0..sample_count(s.loose_trees, rng) {
            self.try_place_generated(ObstacleKind::Tree, s.tree_size, None, s.obstacle_attempts, &reserved, rng);
        }
        let forest = ClusterShape {
            kind: ObstacleKind::Tree,
            size: s.tree_size,
            clusters: s.tree_clusters,
            per_cluster: s.trees_per_cluster,
            spread: s.tree_spread,
        };
        self.generate_clusters(&forest, &reserved, rng);
        let lakes = ClusterShape {
            kind: ObstacleKind::Water,
            size: s.water_size,
            clusters: s.water_clusters,
            per_cluster: s.water_per_cluster,
            spread: s.water_spread,
        };
        self.generate_clusters(&lakes, &reserved, rng);
        for _ in 0..sample_count(s.huts, rng) {
            self.try_place_generated(ObstacleKind::Hut, s.hut_size, None, s.obstacle_attempts, &reserved, rng);
        }
        for _ in 0..sample_count(s.potions, rng) {
            self.try_place_generated(ObstacleKind::Potion, s.potion_size, None, s.obstacle_attempts, &reserved, rng);
        }
    }

    /// Spawns up to `count` food items. Items that exhaust their placement
    /// budget are skipped. Returns how many were placed.
    pub(crate) fn spawn_food<R: Rng>(&mut self, count: usize, rng: &mut R) -> usize {
        let req = PlacementRequest::food(self);
        let mut placed = 0;
        for _ in 0..count {
            let placement = self.find_placement(&req, self.fallback_position(), rng);
            if !placement.used_fallback {
                self.place_food(placement.position);
                placed += 1;
            }
        }
        if placed < count {
            tracing::debug!(requested = count, placed = placed, "Food placement fell short");
        }
        placed
    }
}
