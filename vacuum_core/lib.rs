//! # Vacuum Simulator Core
//!
//! Grid house model, robot kinematics and navigation for a 2D robotic
//! vacuum cleaner simulator.
//!
//! ## Structure
//!
//! ```text
//! vacuum_core/
//! ── messages/       # Pose, drive commands, sensor readings, events
//! ── algorithms/     # House grid, layouts, kinematics, navigation
//! ── config.rs       # TOML/YAML simulator configuration
//! ── simulation.rs   # Headless tick loop
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use vacuum_core::{KeyState, SimConfig, Simulation};
//!
//! let mut config = SimConfig::default();
//! config.seed = Some(3);
//!
//! let mut sim = Simulation::builder().with_config(config).build().unwrap();
//! for _ in 0..100 {
//!     sim.step(&KeyState::idle());
//! }
//! assert_eq!(sim.frame(), 100);
//! ```

pub mod algorithms;
pub mod config;
pub mod error;
pub mod messages;
pub mod simulation;

pub use config::SimConfig;
pub use error::{Result, VacuumError};
pub use messages::*;
pub use simulation::{RaySensor, SimStats, Simulation, SimulationBuilder, WallSensing};

/// Commonly used types
pub mod prelude {
    pub use crate::algorithms::house_grid::{HouseGrid, SensorModel};
    pub use crate::algorithms::kinematics::VacuumRobot;
    pub use crate::algorithms::navigation::{
        AutoStrategy, ControlMode, ControllerConfig, MovementState, NavigationController,
        WallState,
    };
    pub use crate::config::SimConfig;
    pub use crate::error::{Result, VacuumError};
    pub use crate::messages::*;
    pub use crate::simulation::{Simulation, SimulationBuilder, WallSensing};
}
