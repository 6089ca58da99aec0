//! Command-line front end for the Evolarium simulation.
//!
//! The engine lives in `evolarium_core`; this crate adds config loading,
//! the run loop used by the binaries and the JSON-lines history log.

pub mod app;
pub mod history;

pub use evolarium_core::{AppConfig, Simulation};
pub use evolarium_data::GenerationSummary;
