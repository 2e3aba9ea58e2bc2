//! Simulator configuration
//!
//! Loaded from TOML or YAML (chosen by file extension). Every section has
//! defaults, so a config file only needs the values it changes:
//!
//! ```toml
//! seed = 7
//!
//! [world]
//! width = 400
//! height = 300
//!
//! [control]
//! strategy = "random_bounce"
//! ```

use crate::algorithms::house_grid::{SensorModel, DEFAULT_MAX_SAMPLE_ATTEMPTS};
use crate::algorithms::navigation::{AutoStrategy, ControlMode, ControllerConfig};
use crate::error::{Result, VacuumError};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use std::path::Path;

/// House and dust parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    pub dust_count: usize,
    /// Dust is kept this far (x, y) inside the wall bounds
    pub dust_margin: [usize; 2],
    pub max_sample_attempts: usize,
    /// Samples used to check that a drawn layout encloses anything
    pub validation_tries: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
            dust_count: 100,
            dust_margin: [9, 6], // half a dust sprite
            max_sample_attempts: DEFAULT_MAX_SAMPLE_ATTEMPTS,
            validation_tries: 1000,
        }
    }
}

/// Robot body and default velocities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub radius: f64,
    pub linear_velocity: f64,
    pub angular_velocity: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            radius: 25.0,
            linear_velocity: 200.0,
            angular_velocity: PI,
        }
    }
}

/// Controller parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub mode: ControlMode,
    pub strategy: AutoStrategy,
    /// Ticks per second
    pub frequency: f64,
    pub nudge_fraction: f64,
    pub contorning_distance_factor: f64,
    pub contorning_angle: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            mode: ControlMode::Automatic,
            strategy: AutoStrategy::WallFollowing,
            frequency: 30.0,
            nudge_fraction: 0.01,
            contorning_distance_factor: 2.0,
            contorning_angle: FRAC_PI_2,
        }
    }
}

/// Complete simulator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub robot: RobotConfig,
    pub control: ControlConfig,
    pub sensor: SensorModel,
    /// Random seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl SimConfig {
    /// Load from a file
    ///
    /// `.toml` files are parsed as TOML, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config: SimConfig = if path.extension().and_then(|e| e.to_str()) == Some("toml") {
            toml::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Check numeric ranges
    pub fn validate(&self) -> Result<()> {
        if self.world.width == 0 || self.world.height == 0 {
            return Err(VacuumError::InvalidConfig(format!(
                "world dimensions must be positive, got {}x{}",
                self.world.width, self.world.height
            )));
        }
        if self.world.max_sample_attempts == 0 {
            return Err(VacuumError::InvalidConfig(
                "max_sample_attempts must be at least 1".to_string(),
            ));
        }
        let shortest_side = self.world.width.min(self.world.height) as f64;
        if !(self.robot.radius.is_finite() && 2.0 * self.robot.radius < shortest_side) {
            return Err(VacuumError::InvalidConfig(format!(
                "robot radius {} does not fit a {}x{} world",
                self.robot.radius, self.world.width, self.world.height
            )));
        }
        if !(self.sensor.range_factor.is_finite() && self.sensor.range_factor > 0.0) {
            return Err(VacuumError::InvalidConfig(format!(
                "sensor range factor must be positive, got {}",
                self.sensor.range_factor
            )));
        }
        self.controller_config().validate()
    }

    /// Period of one tick in seconds
    pub fn dt(&self) -> f64 {
        1.0 / self.control.frequency
    }

    /// Parameters for the navigation controller
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            mode: self.control.mode,
            strategy: self.control.strategy,
            linear_velocity: self.robot.linear_velocity,
            angular_velocity: self.robot.angular_velocity,
            frequency: self.control.frequency,
            radius: self.robot.radius,
            nudge_fraction: self.control.nudge_fraction,
            contorning_distance_factor: self.control.contorning_distance_factor,
            contorning_angle: self.control.contorning_angle,
        }
    }

    /// Inset that keeps a freshly placed robot off the walls
    pub fn robot_margin(&self) -> (usize, usize) {
        let r = self.robot.radius.ceil() as usize;
        (r, r)
    }

    pub fn dust_margin(&self) -> (usize, usize) {
        (self.world.dust_margin[0], self.world.dust_margin[1])
    }
}
