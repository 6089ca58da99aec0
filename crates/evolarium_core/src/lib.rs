//! # Evolarium Core
//!
//! Simulation engine for Evolarium, a neuroevolution sandbox where small
//! feed-forward controllers learn to forage, cut trees, raid huts and solve
//! a key-and-door puzzle.
//!
//! This crate contains the deterministic simulation logic:
//! - Feed-forward controllers with mutation and crossover
//! - The world model (obstacles, food, tool, fortresses, puzzle chain)
//! - Per-agent perceive / decide / act
//! - Fitness scoring and the genetic algorithm
//! - Generation statistics, snapshots and metrics
//!
//! ## Architecture
//!
//! - **Single owned world**: agents act on `&mut World` one at a time, in
//!   population order
//! - **Seeded RNG**: every random draw comes from one `ChaCha8Rng`, so a
//!   seed reproduces a whole run
//! - **Parallel reductions**: with the `parallel` feature, scoring and
//!   diversity use Rayon without changing results
//!
//! ## Example
//!
//! ```
//! use evolarium_core::controller::{ControllerLogic, SENSOR_COUNT};
//! use evolarium_core::config::ControllerConfig;
//! use evolarium_data::Controller;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let controller = Controller::new_random_with_rng(&ControllerConfig::default(), &mut rng);
//!
//! let outputs = controller.forward(&[0.5; SENSOR_COUNT]).unwrap();
//! assert!(outputs.iter().all(|o| (-1.0..=1.0).contains(o)));
//! ```

/// Perception, decision and action for a single agent
pub mod agent;
/// Configuration management for simulation parameters
pub mod config;
/// Feed-forward controllers: forward pass, mutation, crossover
pub mod controller;
/// Error types
pub mod error;
/// Selection, crossover, adaptive mutation and immigration
pub mod evolution;
/// Fitness scoring in [0, 100]
pub mod fitness;
/// Performance metrics collection and logging
pub mod metrics;
/// Tick and generation driver
pub mod simulation;
/// Serializable views for renderers
pub mod snapshot;
/// Per-generation statistics
pub mod stats;
/// Obstacles, food, tool and puzzle state
pub mod world;

pub use config::AppConfig;
pub use controller::ControllerLogic;
pub use error::{Result, SimError};
pub use evolution::GeneticAlgorithm;
pub use metrics::{init_logging, Metrics};
pub use simulation::{GenerationReport, Simulation, TickOutcome};
pub use world::World;
