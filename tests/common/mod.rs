use evolarium_core::controller::ControllerLogic;
use evolarium_core::agent::create_agent_with_rng;
use evolarium_core::{AppConfig, Simulation, World};
use evolarium_data::{Agent, AgentOrigin, Controller, ObstacleKind, Rect, Vec2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

type WorldMod = Box<dyn FnOnce(&mut World)>;

/// Builds hand-made worlds and simulations for scenario tests.
#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    generated: bool,
    mods: Vec<WorldMod>,
}

#[allow(dead_code)]
impl WorldBuilder {
    /// A small, empty world with a fixed seed.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.seed = Some(42);
        config.evolution.population_size = 8;
        Self {
            config,
            generated: false,
            mods: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    /// Use procedural generation instead of an empty world.
    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }

    pub fn with_obstacle(mut self, kind: ObstacleKind, x: f64, y: f64, w: f64, h: f64) -> Self {
        self.mods.push(Box::new(move |world| {
            world.place_obstacle(kind, Rect::new(x, y, w, h));
        }));
        self
    }

    pub fn with_food(mut self, x: f64, y: f64) -> Self {
        self.mods.push(Box::new(move |world| {
            world.place_food(Vec2::new(x, y));
        }));
        self
    }

    /// Places the tool and immediately picks it up.
    pub fn with_tool_held(mut self) -> Self {
        self.mods.push(Box::new(|world| {
            let spot = Vec2::new(50.0, 50.0);
            world.place_tool(spot);
            world.try_pickup_tool(spot);
        }));
        self
    }

    pub fn with_fortresses(mut self) -> Self {
        self.mods.push(Box::new(|world| {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            world.install_fortresses(&mut rng);
        }));
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn build_world(self) -> (AppConfig, World) {
        let mut world = if self.generated {
            let mut rng = ChaCha8Rng::seed_from_u64(self.config.world.seed.unwrap_or(0));
            World::generate(&self.config, &mut rng)
        } else {
            World::empty(&self.config)
        };
        for m in self.mods {
            m(&mut world);
        }
        (self.config, world)
    }

    pub fn build(self) -> Simulation {
        let (config, world) = self.build_world();
        Simulation::with_world(config, world).expect("valid test config")
    }
}

/// A fresh random-controller agent at `(x, y)`.
#[allow(dead_code)]
pub fn agent_at(config: &AppConfig, x: f64, y: f64, seed: u64) -> Agent {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let controller = Controller::new_random_with_rng(&config.controller, &mut rng);
    create_agent_with_rng(config, controller, AgentOrigin::Random, Vec2::new(x, y), &mut rng)
}
