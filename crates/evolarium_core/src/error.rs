//! Error types for evolarium_core.
//!
//! Only invariant violations surface as errors. Recoverable conditions
//! (placement exhaustion, degenerate populations, missing puzzle
//! prerequisites) are handled in place and never reach this type.

use thiserror::Error;

/// Main error type for simulation operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Adjacent controller layers do not chain, or a layer's vectors
    /// disagree with its declared shape.
    #[error("Controller shape mismatch at layer {layer}: expected {expected}, found {found}")]
    ShapeMismatch {
        layer: usize,
        expected: usize,
        found: usize,
    },

    /// Crossover parents with different topologies.
    #[error("Incompatible parents: {left:?} vs {right:?}")]
    IncompatibleParents {
        left: Vec<usize>,
        right: Vec<usize>,
    },

    /// Perception vector length does not match the controller input.
    #[error("Input size mismatch: expected {expected}, found {found}")]
    InputSize { expected: usize, found: usize },

    /// Score vector does not line up with the population.
    #[error("Population mismatch: {agents} agents but {scores} scores")]
    PopulationMismatch { agents: usize, scores: usize },

    /// Configuration rejected at simulation start.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<SimError>,
    },
}

/// Result type alias for evolarium_core operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Creates a new shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(layer: usize, expected: usize, found: usize) -> Self {
        Self::ShapeMismatch {
            layer,
            expected,
            found,
        }
    }

    /// Creates a new configuration error.
    #[must_use]
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::shape_mismatch(1, 20, 19);
        assert_eq!(
            err.to_string(),
            "Controller shape mismatch at layer 1: expected 20, found 19"
        );
    }

    #[test]
    fn test_error_context() {
        let err = SimError::invalid_config("population is zero").with_context("starting run");
        let text = err.to_string();
        assert!(text.contains("starting run"));
        assert!(text.contains("population is zero"));
    }
}
