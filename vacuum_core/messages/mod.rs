//! Message types exchanged between the simulator components
//!
//! Every message is a small `Copy` value (or an owned event) so that nothing
//! is aliased across ticks.
//!
//! # Message Organization
//!
//! - Geometry: robot pose and heading helpers
//! - Drive: velocity commands and manual key snapshots
//! - Sensor: front/back wall readings
//! - Events: observational signals pushed to the orchestrator's caller

pub mod drive;
pub mod events;
pub mod geometry;
pub mod sensor;

pub use drive::{DriveCommand, KeyState};
pub use events::SimEvent;
pub use geometry::{angle_difference, normalize_angle, Pose2D};
pub use sensor::{SensorDirection, WallReadings};
