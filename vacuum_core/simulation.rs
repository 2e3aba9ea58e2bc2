//! Headless simulation tick
//!
//! Owns the house, the robot and the controller and advances them in the
//! fixed order: sense, compute controls, integrate, resolve collision,
//! vacuum. Rendering, audio, input polling and frame pacing belong to the
//! caller, which consumes the returned [`SimEvent`]s.

use crate::algorithms::house_grid::{HouseGrid, SensorModel};
use crate::algorithms::kinematics::VacuumRobot;
use crate::algorithms::layout;
use crate::algorithms::navigation::NavigationController;
use crate::config::SimConfig;
use crate::error::{Result, VacuumError};
use crate::messages::{DriveCommand, KeyState, Pose2D, SensorDirection, SimEvent, WallReadings};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Source of front/back wall readings
pub trait WallSensing {
    fn read(&self, house: &HouseGrid, pose: &Pose2D, radius: f64) -> WallReadings;
}

/// Ray-cast sensors against the house grid
#[derive(Debug, Clone, Copy, Default)]
pub struct RaySensor {
    model: SensorModel,
}

impl RaySensor {
    pub fn new(model: SensorModel) -> Self {
        Self { model }
    }
}

impl WallSensing for RaySensor {
    fn read(&self, house: &HouseGrid, pose: &Pose2D, radius: f64) -> WallReadings {
        WallReadings {
            front: house.sense_wall(pose, radius, SensorDirection::Front, &self.model),
            back: house.sense_wall(pose, radius, SensorDirection::Back, &self.model),
        }
    }
}

/// Snapshot of simulation progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimStats {
    pub frame: u64,
    pub elapsed_secs: f64,
    pub collisions: u64,
    pub dust_total: usize,
    pub dust_remaining: usize,
    pub cleaned_percent: u32,
    pub pose: Pose2D,
}

/// Builder for a [`Simulation`]
pub struct SimulationBuilder {
    config: Option<SimConfig>,
    walls: Option<Vec<(usize, usize)>>,
    seed: Option<u64>,
    sensor: Option<Box<dyn WallSensing>>,
    robot_pose: Option<Pose2D>,
}

impl SimulationBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            walls: None,
            seed: None,
            sensor: None,
            robot_pose: None,
        }
    }

    /// Set the configuration
    pub fn with_config(mut self, config: SimConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a drawn wall layout instead of the default one
    pub fn with_walls(mut self, walls: Vec<(usize, usize)>) -> Self {
        self.walls = Some(walls);
        self
    }

    /// Override the config seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the ray-cast sensors
    pub fn with_sensor(mut self, sensor: impl WallSensing + 'static) -> Self {
        self.sensor = Some(Box::new(sensor));
        self
    }

    /// Place the robot here instead of sampling a free spot
    pub fn with_robot_pose(mut self, pose: Pose2D) -> Self {
        self.robot_pose = Some(pose);
        self
    }

    /// Build the house, scatter dust and place the robot
    ///
    /// The robot lands on a free cell with no wall inside its radius, unless
    /// a pose was given with [`with_robot_pose`](Self::with_robot_pose).
    ///
    /// A drawn layout that encloses nothing, or leaves no room for the dust
    /// and the robot, is replaced by [`layout::default_layout`].
    pub fn build(self) -> Result<Simulation> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let mut rng = match self.seed.or(config.seed) {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let (house, robot) = match self.walls {
            Some(walls) => match furnish(&config, walls, self.robot_pose, &mut rng) {
                Err(VacuumError::GeometryExhausted { .. }) | Err(VacuumError::EmptyRegion) => {
                    warn!("Drawn walls leave no usable floor, falling back to the default layout");
                    furnish(&config, default_walls(&config), self.robot_pose, &mut rng)?
                }
                other => other?,
            },
            None => furnish(&config, default_walls(&config), self.robot_pose, &mut rng)?,
        };

        let controller = NavigationController::new(
            config.controller_config(),
            ChaCha8Rng::seed_from_u64(rng.gen()),
        )?;

        let sensor = self
            .sensor
            .unwrap_or_else(|| Box::new(RaySensor::new(config.sensor)));

        let initial_dust = house.dust_count();
        info!(
            "House {}x{}: {} wall cells, {} dust, robot at ({:.1}, {:.1})",
            house.width(),
            house.height(),
            house.wall_cells().len(),
            initial_dust,
            robot.pose().x,
            robot.pose().y
        );

        Ok(Simulation {
            dt: config.dt(),
            config,
            house,
            robot,
            controller,
            sensor,
            frame: 0,
            collisions: 0,
            initial_dust,
            last_command: DriveCommand::stop(),
            all_clean_sent: false,
        })
    }
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_walls(config: &SimConfig) -> Vec<(usize, usize)> {
    layout::default_layout(config.world.width, config.world.height)
}

/// Lay out walls, check the layout, scatter dust and place the robot
fn furnish(
    config: &SimConfig,
    walls: Vec<(usize, usize)>,
    robot_pose: Option<Pose2D>,
    rng: &mut ChaCha8Rng,
) -> Result<(HouseGrid, VacuumRobot)> {
    let mut house = HouseGrid::new(config.world.width, config.world.height)?
        .with_max_sample_attempts(config.world.max_sample_attempts);
    house.set_walls(walls, config.robot_margin());

    if !house.has_interior(rng, config.world.validation_tries) {
        return Err(VacuumError::EmptyRegion);
    }

    house.generate_dust(config.world.dust_count, config.dust_margin(), rng)?;

    let pose = match robot_pose {
        Some(pose) => pose,
        None => {
            let (x, y) = house.clear_spot(config.robot.radius, rng)?;
            Pose2D::new(x as f64, y as f64, 0.0)
        }
    };

    Ok((house, VacuumRobot::new(config.robot.radius, pose)))
}

/// A running headless simulation
pub struct Simulation {
    config: SimConfig,
    dt: f64,
    house: HouseGrid,
    robot: VacuumRobot,
    controller: NavigationController,
    sensor: Box<dyn WallSensing>,
    frame: u64,
    collisions: u64,
    initial_dust: usize,
    last_command: DriveCommand,
    all_clean_sent: bool,
}

impl Simulation {
    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::new()
    }

    /// Advance one tick
    ///
    /// `keys` only matters in manual mode.
    pub fn step(&mut self, keys: &KeyState) -> Vec<SimEvent> {
        let mut events = Vec::new();
        self.frame += 1;

        let pose = self.robot.pose();
        let readings = self.sensor.read(&self.house, &pose, self.robot.radius());
        let command = self.controller.compute(keys, readings, pose);
        self.last_command = command;

        self.robot.integrate(command.linear, command.angular, self.dt);

        if self.robot.check_wall_collision(&self.house) {
            self.robot.collided();
            self.controller.collide();
            self.collisions += 1;
            debug!("Collision at frame {}", self.frame);
            events.push(SimEvent::Collision {
                pose: self.robot.pose(),
            });
        }

        if command.vacuum {
            let cells = self.robot.vacuum(&self.house);
            if !cells.is_empty() {
                for &(x, y) in &cells {
                    self.house.clean(x, y);
                }
                let remaining = self.house.dust_count();
                events.push(SimEvent::DustCleared { cells, remaining });

                if remaining == 0 && !self.all_clean_sent {
                    self.all_clean_sent = true;
                    info!("All clean after {} frames", self.frame);
                    events.push(SimEvent::AllClean { frame: self.frame });
                }
            }
        }

        events
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn house(&self) -> &HouseGrid {
        &self.house
    }

    pub fn robot(&self) -> &VacuumRobot {
        &self.robot
    }

    pub fn controller(&self) -> &NavigationController {
        &self.controller
    }

    /// Command issued on the last tick
    pub fn last_command(&self) -> DriveCommand {
        self.last_command
    }

    /// Ticks run so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated time in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.frame as f64 * self.dt
    }

    /// Share of the initial dust cleared, rounded down
    pub fn cleaned_percent(&self) -> u32 {
        if self.initial_dust == 0 {
            return 100;
        }
        let cleaned = self.initial_dust - self.house.dust_count();
        (100 * cleaned / self.initial_dust) as u32
    }

    pub fn is_clean(&self) -> bool {
        self.house.dust_count() == 0
    }

    pub fn stats(&self) -> SimStats {
        SimStats {
            frame: self.frame,
            elapsed_secs: self.elapsed_secs(),
            collisions: self.collisions,
            dust_total: self.initial_dust,
            dust_remaining: self.house.dust_count(),
            cleaned_percent: self.cleaned_percent(),
            pose: self.robot.pose(),
        }
    }
}
