//! Error types for the vacuum simulator core

use thiserror::Error;

/// Errors surfaced by the simulator core
///
/// Collisions and lost walls are not errors: the navigation controller
/// handles them as ordinary state transitions.
#[derive(Debug, Error)]
pub enum VacuumError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No free spot found inside the house after {attempts} attempts")]
    GeometryExhausted { attempts: usize },

    #[error("Sampling region is empty")]
    EmptyRegion,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for simulator core operations
pub type Result<T> = std::result::Result<T, VacuumError>;
