//! Core data structures for the Evolarium simulation.

pub mod agent;
pub mod controller;
pub mod geometry;
pub mod obstacle;
pub mod puzzle;
pub mod record;
pub mod ring;
