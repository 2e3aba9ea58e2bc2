//! Navigation Controller
//!
//! Turns wall sensor readings and the robot pose into drive commands.
//!
//! # Features
//!
//! - Manual mode: direct key-to-command mapping
//! - Wall following: reactive bug-style state machine keeping the wall on
//!   the robot's right-hand side
//! - Random bounce: walk until a collision, then turn a random amount
//! - Frame-count rotation timers and a fixed escape nudge after collisions
//!
//! # State machine
//!
//! Two state variables evolve together. [`MovementState`] is what the wheels
//! do (walk forward or rotate in place); [`WallState`] is the relationship
//! with the wall (looking for it, following it, or contorning after losing
//! it). [`wall_following_step`] is the pure transition function; the
//! [`NavigationController`] wraps it with the collision flag, the RNG and
//! logging.
//!
//! # Example
//!
//! ```rust
//! use vacuum_core::algorithms::navigation::{ControllerConfig, NavigationController, WallState};
//! use vacuum_core::messages::{KeyState, Pose2D, WallReadings};
//!
//! let mut controller = NavigationController::from_seed(ControllerConfig::default(), 42).unwrap();
//! let pose = Pose2D::new(10.0, 10.0, 0.0);
//!
//! let cmd = controller.compute(&KeyState::idle(), WallReadings::new(true, true), pose);
//! assert!(cmd.vacuum);
//! assert_eq!(controller.wall_state(), WallState::Following);
//! ```

use crate::error::{Result, VacuumError};
use crate::messages::{angle_difference, DriveCommand, KeyState, Pose2D, WallReadings};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use tracing::debug;

/// Who drives the robot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    Manual,
    Automatic,
}

/// Automatic driving strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoStrategy {
    /// Follow walls, recovering them after they are lost
    WallFollowing,
    /// Walk straight and turn a random amount after each collision
    RandomBounce,
}

/// Rotation sense on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnDirection {
    /// Counter-clockwise, increasing heading (+1)
    Left,
    /// Clockwise, decreasing heading (-1)
    Right,
}

impl TurnDirection {
    pub fn sign(&self) -> f64 {
        match self {
            TurnDirection::Left => 1.0,
            TurnDirection::Right => -1.0,
        }
    }
}

/// An in-place rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rotation {
    pub direction: TurnDirection,
    /// Number of frames to rotate; `None` rotates until a wall condition ends it
    pub timer: Option<u32>,
}

/// Locomotion behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementState {
    Walking,
    Rotating(Rotation),
}

impl MovementState {
    pub fn is_walking(&self) -> bool {
        matches!(self, MovementState::Walking)
    }

    pub fn is_rotating(&self) -> bool {
        matches!(self, MovementState::Rotating(_))
    }
}

/// Relationship with the wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallState {
    /// No wall contact yet
    Looking,
    /// Moving along a wall
    Following,
    /// Wall lost, searching for it again
    Contorning,
}

/// Controller parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub mode: ControlMode,
    pub strategy: AutoStrategy,
    /// Default linear velocity (cells/s)
    pub linear_velocity: f64,
    /// Default angular velocity (rad/s)
    pub angular_velocity: f64,
    /// Tick frequency (Hz)
    pub frequency: f64,
    /// Robot radius, bounds the blind walk while contorning
    pub radius: f64,
    /// Escape nudge as a fraction of a half turn
    pub nudge_fraction: f64,
    /// Blind walk limit while contorning, in robot radii
    pub contorning_distance_factor: f64,
    /// Largest search rotation while contorning (rad)
    pub contorning_angle: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            mode: ControlMode::Automatic,
            strategy: AutoStrategy::WallFollowing,
            linear_velocity: 200.0,
            angular_velocity: PI,
            frequency: 30.0,
            radius: 25.0,
            nudge_fraction: 0.01,
            contorning_distance_factor: 2.0,
            contorning_angle: FRAC_PI_2,
        }
    }
}

impl ControllerConfig {
    /// Reject parameters that would make timers or motion undefined
    pub fn validate(&self) -> Result<()> {
        if !(self.angular_velocity.is_finite() && self.angular_velocity > 0.0) {
            return Err(VacuumError::InvalidConfig(format!(
                "angular velocity must be positive, got {}",
                self.angular_velocity
            )));
        }
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(VacuumError::InvalidConfig(format!(
                "frequency must be positive, got {}",
                self.frequency
            )));
        }
        if !(self.linear_velocity.is_finite() && self.linear_velocity >= 0.0) {
            return Err(VacuumError::InvalidConfig(format!(
                "linear velocity must be non-negative, got {}",
                self.linear_velocity
            )));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(VacuumError::InvalidConfig(format!(
                "robot radius must be positive, got {}",
                self.radius
            )));
        }
        if !(self.nudge_fraction.is_finite() && self.nudge_fraction >= 0.0) {
            return Err(VacuumError::InvalidConfig(format!(
                "nudge fraction must be non-negative, got {}",
                self.nudge_fraction
            )));
        }
        if !(self.contorning_distance_factor.is_finite() && self.contorning_distance_factor > 0.0)
        {
            return Err(VacuumError::InvalidConfig(format!(
                "contorning distance factor must be positive, got {}",
                self.contorning_distance_factor
            )));
        }
        if !(self.contorning_angle > 0.0 && self.contorning_angle <= PI) {
            return Err(VacuumError::InvalidConfig(format!(
                "contorning angle must be in (0, π], got {}",
                self.contorning_angle
            )));
        }
        Ok(())
    }

    /// Frames of the post-collision escape nudge
    pub fn escape_frames(&self) -> u32 {
        (self.frequency * self.nudge_fraction * PI / self.angular_velocity).round() as u32
    }

    /// Frames needed to turn `fraction` of a half turn
    pub fn half_turn_frames(&self, fraction: f64) -> u32 {
        (fraction * PI / self.angular_velocity * self.frequency).round() as u32
    }

    /// Blind walk limit while contorning
    pub fn contorning_distance(&self) -> f64 {
        self.contorning_distance_factor * self.radius
    }
}

/// Full controller state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavState {
    pub movement: MovementState,
    pub wall: WallState,
    /// Rotation frames already emitted for the current timed rotation
    pub n_frames: u32,
    pub start_angle: Option<f64>,
    pub start_pos: Option<(f64, f64)>,
    /// Set by a collision, consumed by the next evaluation
    pub collided: bool,
}

impl Default for NavState {
    fn default() -> Self {
        Self {
            movement: MovementState::Walking,
            wall: WallState::Looking,
            n_frames: 0,
            start_angle: None,
            start_pos: None,
            collided: false,
        }
    }
}

impl NavState {
    /// Start a rotation and reset the frame counter
    pub fn begin_rotation(&mut self, direction: TurnDirection, timer: Option<u32>) {
        self.movement = MovementState::Rotating(Rotation { direction, timer });
        self.n_frames = 0;
    }

    /// Timer if the current rotation is timed
    pub fn rotation_timer(&self) -> Option<u32> {
        match self.movement {
            MovementState::Rotating(Rotation { timer, .. }) => timer,
            MovementState::Walking => None,
        }
    }

    /// End a timed rotation once its frames have all been emitted
    fn expire_timer(&mut self) {
        if let Some(timer) = self.rotation_timer() {
            if self.n_frames >= timer.max(1) {
                self.movement = MovementState::Walking;
            }
        }
    }

    /// Command for the current movement state; counts timed rotation frames
    fn emit(&mut self, config: &ControllerConfig) -> DriveCommand {
        match self.movement {
            MovementState::Walking => DriveCommand::forward(config.linear_velocity),
            MovementState::Rotating(rotation) => {
                if rotation.timer.is_some() {
                    self.n_frames += 1;
                }
                DriveCommand::rotate(rotation.direction.sign() * config.angular_velocity)
            }
        }
    }
}

/// One wall-following evaluation
///
/// Pure transition `(state, sensors, pose) -> (state, command)`. A pending
/// collision escape (timed rotation) always wins over the wall logic's own
/// rotation decisions.
pub fn wall_following_step(
    mut state: NavState,
    config: &ControllerConfig,
    sensors: WallReadings,
    pose: Pose2D,
) -> (NavState, DriveCommand) {
    let collided = std::mem::take(&mut state.collided);
    state.expire_timer();

    match state.wall {
        WallState::Looking => {
            if sensors.both() {
                state.wall = WallState::Following;
            }
        }
        WallState::Following => {
            if state.movement.is_walking() && sensors.none() {
                state.wall = WallState::Contorning;
                state.begin_rotation(TurnDirection::Right, None);
                state.start_angle = Some(pose.theta);
                state.start_pos = None;
            }
        }
        WallState::Contorning => match state.movement {
            MovementState::Walking => {
                if sensors.both() {
                    state.wall = WallState::Following;
                    state.start_pos = None;
                    state.start_angle = None;
                } else {
                    match state.start_pos {
                        // Walking again after an escape nudge: re-anchor
                        None => state.start_pos = Some(pose.position()),
                        Some((sx, sy)) => {
                            if pose.distance_to(sx, sy) > config.contorning_distance() {
                                state.start_pos = None;
                                state.begin_rotation(TurnDirection::Right, None);
                                state.start_angle = Some(pose.theta);
                            }
                        }
                    }
                }
            }
            MovementState::Rotating(Rotation { timer: None, .. }) if !collided => {
                let start = *state.start_angle.get_or_insert(pose.theta);
                let turned = angle_difference(pose.theta, start).abs();
                if turned > config.contorning_angle || sensors.front {
                    state.movement = MovementState::Walking;
                    state.start_pos = Some(pose.position());
                }
            }
            // Escape nudge in progress
            MovementState::Rotating(_) => {}
        },
    }

    let command = state.emit(config);
    (state, command)
}

/// One random-bounce evaluation: walk, or finish the current timed turn
pub fn random_bounce_step(
    mut state: NavState,
    config: &ControllerConfig,
) -> (NavState, DriveCommand) {
    state.collided = false;
    state.expire_timer();
    let command = state.emit(config);
    (state, command)
}

/// Manual key mapping
///
/// Keys are checked in the order forward, rotate left, backward, rotate
/// right, stop. The stop key and an empty key set both give a standstill,
/// so `stop` only matters as the lowest-priority entry in that order.
pub fn manual_command(keys: &KeyState, config: &ControllerConfig) -> DriveCommand {
    let v = config.linear_velocity;
    let w = config.angular_velocity;

    let (linear, angular) = if keys.forward {
        (v, 0.0)
    } else if keys.rotate_left {
        (0.0, w)
    } else if keys.backward {
        (-v, 0.0)
    } else if keys.rotate_right {
        (0.0, -w)
    } else {
        // Stop key held, or no motion key at all
        (0.0, 0.0)
    };

    DriveCommand::new(linear, angular, keys.vacuum)
}

/// Navigation controller
pub struct NavigationController {
    config: ControllerConfig,
    state: NavState,
    rng: ChaCha8Rng,
}

impl NavigationController {
    /// Create a controller with an injected random source
    pub fn new(config: ControllerConfig, rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            state: NavState::default(),
            rng,
        })
    }

    /// Create a controller with a seeded random source
    pub fn from_seed(config: ControllerConfig, seed: u64) -> Result<Self> {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Compute this tick's command
    ///
    /// `keys` is only read in manual mode, `sensors` and `pose` only in
    /// automatic mode.
    pub fn compute(
        &mut self,
        keys: &KeyState,
        sensors: WallReadings,
        pose: Pose2D,
    ) -> DriveCommand {
        let previous = self.state;

        let (next, command) = match (self.config.mode, self.config.strategy) {
            (ControlMode::Manual, _) => {
                let mut next = self.state;
                next.collided = false;
                (next, manual_command(keys, &self.config))
            }
            (ControlMode::Automatic, AutoStrategy::WallFollowing) => {
                wall_following_step(self.state, &self.config, sensors, pose)
            }
            (ControlMode::Automatic, AutoStrategy::RandomBounce) => {
                random_bounce_step(self.state, &self.config)
            }
        };

        if next.wall != previous.wall {
            debug!("wall state {:?} -> {:?}", previous.wall, next.wall);
        }
        if next.movement.is_walking() != previous.movement.is_walking() {
            debug!("movement {:?} -> {:?}", previous.movement, next.movement);
        }

        self.state = next;
        command
    }

    /// Signal a collision
    ///
    /// In automatic mode, starts an escape rotation unless the robot is
    /// already rotating. Wall following nudges left for
    /// [`ControllerConfig::escape_frames`]; random bounce turns a random
    /// direction for a random quarter-to-full half turn.
    pub fn collide(&mut self) {
        self.state.collided = true;

        if self.config.mode != ControlMode::Automatic || self.state.movement.is_rotating() {
            return;
        }

        let (direction, frames) = match self.config.strategy {
            AutoStrategy::WallFollowing => (TurnDirection::Left, self.config.escape_frames()),
            AutoStrategy::RandomBounce => {
                let direction = if self.rng.gen_bool(0.5) {
                    TurnDirection::Left
                } else {
                    TurnDirection::Right
                };
                let fraction = self.rng.gen_range(0.25..1.0);
                (direction, self.config.half_turn_frames(fraction))
            }
        };

        debug!("collision: rotating {:?} for {} frames", direction, frames);
        self.state.begin_rotation(direction, Some(frames));
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn mode(&self) -> ControlMode {
        self.config.mode
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn movement_state(&self) -> MovementState {
        self.state.movement
    }

    pub fn wall_state(&self) -> WallState {
        self.state.wall
    }

    pub fn rotation_timer(&self) -> Option<u32> {
        self.state.rotation_timer()
    }

    pub fn n_frames(&self) -> u32 {
        self.state.n_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const NO_WALL: WallReadings = WallReadings {
        front: false,
        back: false,
    };
    const BOTH: WallReadings = WallReadings {
        front: true,
        back: true,
    };

    fn config() -> ControllerConfig {
        ControllerConfig {
            linear_velocity: 2.0,
            angular_velocity: PI,
            frequency: 60.0,
            radius: 1.0,
            ..ControllerConfig::default()
        }
    }

    fn manual_config() -> ControllerConfig {
        ControllerConfig {
            mode: ControlMode::Manual,
            ..config()
        }
    }

    #[test]
    fn test_zero_angular_velocity_rejected() {
        let cfg = ControllerConfig {
            angular_velocity: 0.0,
            ..config()
        };
        assert!(matches!(
            NavigationController::from_seed(cfg, 0),
            Err(VacuumError::InvalidConfig(_))
        ));

        let cfg = ControllerConfig {
            angular_velocity: -1.0,
            ..config()
        };
        assert!(NavigationController::from_seed(cfg, 0).is_err());
    }

    #[test]
    fn test_zero_frequency_rejected() {
        let cfg = ControllerConfig {
            frequency: 0.0,
            ..config()
        };
        assert!(NavigationController::from_seed(cfg, 0).is_err());
    }

    #[test]
    fn test_manual_mapping() {
        let cfg = manual_config();

        let keys = KeyState {
            forward: true,
            ..KeyState::idle()
        };
        assert_eq!(manual_command(&keys, &cfg), DriveCommand::new(2.0, 0.0, false));

        let keys = KeyState {
            rotate_left: true,
            vacuum: true,
            ..KeyState::idle()
        };
        assert_eq!(manual_command(&keys, &cfg), DriveCommand::new(0.0, PI, true));

        let keys = KeyState {
            backward: true,
            ..KeyState::idle()
        };
        assert_eq!(manual_command(&keys, &cfg), DriveCommand::new(-2.0, 0.0, false));

        let keys = KeyState {
            rotate_right: true,
            ..KeyState::idle()
        };
        assert_eq!(manual_command(&keys, &cfg), DriveCommand::new(0.0, -PI, false));

        let keys = KeyState {
            stop: true,
            vacuum: true,
            ..KeyState::idle()
        };
        assert_eq!(manual_command(&keys, &cfg), DriveCommand::new(0.0, 0.0, true));
    }

    #[test]
    fn test_manual_stop_key() {
        let cfg = manual_config();

        let stop = KeyState {
            stop: true,
            ..KeyState::idle()
        };
        assert_eq!(manual_command(&stop, &cfg), manual_command(&KeyState::idle(), &cfg));
        assert_eq!(manual_command(&stop, &cfg), DriveCommand::stop());

        // Every motion key outranks stop
        let keys = KeyState {
            rotate_right: true,
            stop: true,
            ..KeyState::idle()
        };
        assert_eq!(manual_command(&keys, &cfg), DriveCommand::new(0.0, -PI, false));
    }

    #[test]
    fn test_manual_priority() {
        let keys = KeyState {
            backward: true,
            rotate_left: true,
            ..KeyState::idle()
        };
        let cmd = manual_command(&keys, &manual_config());
        assert_relative_eq!(cmd.linear, 0.0);
        assert_relative_eq!(cmd.angular, PI);
    }

    #[test]
    fn test_manual_collision_does_not_rotate() {
        let mut controller = NavigationController::from_seed(manual_config(), 0).unwrap();
        controller.collide();
        assert!(controller.movement_state().is_walking());

        let keys = KeyState {
            forward: true,
            ..KeyState::idle()
        };
        let cmd = controller.compute(&keys, NO_WALL, Pose2D::default());
        assert_relative_eq!(cmd.linear, 2.0);
        assert!(!controller.state().collided);
    }

    #[test]
    fn test_initial_automatic_walks() {
        let mut controller = NavigationController::from_seed(config(), 0).unwrap();
        let cmd = controller.compute(&KeyState::idle(), NO_WALL, Pose2D::default());

        assert_eq!(cmd, DriveCommand::forward(2.0));
        assert_eq!(controller.wall_state(), WallState::Looking);
    }

    #[test]
    fn test_looking_to_following() {
        let cfg = config();
        let state = NavState::default();

        let (state, _) = wall_following_step(
            state,
            &cfg,
            WallReadings::new(true, false),
            Pose2D::default(),
        );
        assert_eq!(state.wall, WallState::Looking);

        let (state, cmd) = wall_following_step(state, &cfg, BOTH, Pose2D::default());
        assert_eq!(state.wall, WallState::Following);
        assert!(cmd.vacuum);
    }

    #[test]
    fn test_following_loses_wall() {
        let cfg = config();
        let state = NavState {
            wall: WallState::Following,
            ..NavState::default()
        };
        let pose = Pose2D::new(5.0, 5.0, 1.0);

        let (state, cmd) = wall_following_step(state, &cfg, NO_WALL, pose);

        assert_eq!(state.wall, WallState::Contorning);
        assert_eq!(
            state.movement,
            MovementState::Rotating(Rotation {
                direction: TurnDirection::Right,
                timer: None
            })
        );
        assert_eq!(state.start_angle, Some(1.0));
        assert_relative_eq!(cmd.angular, -PI);
        assert!(!cmd.vacuum);
    }

    #[test]
    fn test_following_keeps_wall_with_one_sensor() {
        let cfg = config();
        let state = NavState {
            wall: WallState::Following,
            ..NavState::default()
        };

        let (state, _) =
            wall_following_step(state, &cfg, WallReadings::new(false, true), Pose2D::default());
        assert_eq!(state.wall, WallState::Following);
        assert!(state.movement.is_walking());
    }

    #[test]
    fn test_contorning_rotation_ends_on_angle() {
        let cfg = config();
        let (mut state, _) = wall_following_step(
            NavState {
                wall: WallState::Following,
                ..NavState::default()
            },
            &cfg,
            NO_WALL,
            Pose2D::new(5.0, 5.0, 1.0),
        );

        // Not yet past π/2
        let (next, _) = wall_following_step(state, &cfg, NO_WALL, Pose2D::new(5.0, 5.0, 1.0 - 1.5));
        assert!(next.movement.is_rotating());
        state = next;

        // Past π/2, across the 0/2π seam
        let heading = crate::messages::normalize_angle(1.0 - 1.6);
        let (next, cmd) = wall_following_step(state, &cfg, NO_WALL, Pose2D::new(5.0, 5.0, heading));
        assert!(next.movement.is_walking());
        assert_eq!(next.wall, WallState::Contorning);
        assert_eq!(next.start_pos, Some((5.0, 5.0)));
        assert!(cmd.vacuum);
    }

    #[test]
    fn test_contorning_rotation_ends_on_front_sensor() {
        let cfg = config();
        let (state, _) = wall_following_step(
            NavState {
                wall: WallState::Following,
                ..NavState::default()
            },
            &cfg,
            NO_WALL,
            Pose2D::new(5.0, 5.0, 1.0),
        );

        let (state, _) = wall_following_step(
            state,
            &cfg,
            WallReadings::new(true, false),
            Pose2D::new(5.0, 5.0, 0.9),
        );
        assert!(state.movement.is_walking());
        assert_eq!(state.start_pos, Some((5.0, 5.0)));
    }

    #[test]
    fn test_contorning_distance_bound() {
        let cfg = config(); // radius 1, limit 2 cells
        let state = NavState {
            wall: WallState::Contorning,
            start_pos: Some((5.0, 5.0)),
            ..NavState::default()
        };

        let (state, cmd) = wall_following_step(state, &cfg, NO_WALL, Pose2D::new(6.5, 5.0, 0.0));
        assert!(state.movement.is_walking());
        assert!(cmd.vacuum);

        let (state, cmd) = wall_following_step(state, &cfg, NO_WALL, Pose2D::new(7.1, 5.0, 0.3));
        assert_eq!(
            state.movement,
            MovementState::Rotating(Rotation {
                direction: TurnDirection::Right,
                timer: None
            })
        );
        assert_eq!(state.start_pos, None);
        assert_eq!(state.start_angle, Some(0.3));
        assert_relative_eq!(cmd.angular, -PI);
    }

    #[test]
    fn test_contorning_reacquires_wall() {
        let cfg = config();
        let state = NavState {
            wall: WallState::Contorning,
            start_pos: Some((5.0, 5.0)),
            start_angle: Some(0.0),
            ..NavState::default()
        };

        let (state, _) = wall_following_step(state, &cfg, BOTH, Pose2D::new(5.5, 5.0, 0.0));
        assert_eq!(state.wall, WallState::Following);
        assert_eq!(state.start_pos, None);
    }

    #[test]
    fn test_timer_expiry() {
        let cfg = config();
        let mut state = NavState {
            wall: WallState::Following,
            ..NavState::default()
        };
        state.begin_rotation(TurnDirection::Left, Some(5));

        // Five rotation frames, counted 1..=5
        for expected in 1..=5 {
            let (next, cmd) = wall_following_step(state, &cfg, BOTH, Pose2D::default());
            assert!(next.movement.is_rotating(), "walked early at frame {}", expected);
            assert_eq!(next.n_frames, expected);
            assert_relative_eq!(cmd.angular, PI);
            state = next;
        }

        // The evaluation that observes n_frames == 5 walks
        let (state, cmd) = wall_following_step(state, &cfg, BOTH, Pose2D::default());
        assert!(state.movement.is_walking());
        assert_eq!(cmd, DriveCommand::forward(2.0));
    }

    #[test]
    fn test_zero_timer_rotates_one_frame() {
        let cfg = config();
        let mut state = NavState::default();
        state.begin_rotation(TurnDirection::Left, Some(0));

        let (state, cmd) = wall_following_step(state, &cfg, NO_WALL, Pose2D::default());
        assert!(cmd.angular > 0.0);
        let (state, _) = wall_following_step(state, &cfg, NO_WALL, Pose2D::default());
        assert!(state.movement.is_walking());
    }

    #[test]
    fn test_collision_nudge_magnitude() {
        let cfg = config(); // 60 Hz, ω = π
        assert_eq!(cfg.escape_frames(), 1);

        let mut controller = NavigationController::from_seed(cfg, 0).unwrap();
        controller.collide();

        assert_eq!(controller.rotation_timer(), Some(1));
        assert_eq!(
            controller.movement_state(),
            MovementState::Rotating(Rotation {
                direction: TurnDirection::Left,
                timer: Some(1)
            })
        );
    }

    #[test]
    fn test_collision_forces_rotation_in_any_wall_state() {
        for wall in [WallState::Looking, WallState::Following, WallState::Contorning] {
            let mut controller = NavigationController::from_seed(config(), 0).unwrap();
            controller.state.wall = wall;
            controller.collide();
            assert!(controller.movement_state().is_rotating());

            let cmd = controller.compute(&KeyState::idle(), NO_WALL, Pose2D::default());
            assert_relative_eq!(cmd.angular, PI);
            assert_relative_eq!(cmd.linear, 0.0);
        }
    }

    #[test]
    fn test_collision_while_rotating_keeps_rotation() {
        let mut controller = NavigationController::from_seed(config(), 0).unwrap();
        controller.state.begin_rotation(TurnDirection::Right, None);
        controller.collide();

        assert_eq!(controller.rotation_timer(), None);
        assert!(controller.state().collided);
    }

    #[test]
    fn test_collided_flag_consumed_once() {
        let mut controller = NavigationController::from_seed(config(), 0).unwrap();
        controller.collide();
        controller.compute(&KeyState::idle(), NO_WALL, Pose2D::default());
        assert!(!controller.state().collided);

        // A second collision after the nudge retriggers a fresh nudge
        controller.compute(&KeyState::idle(), NO_WALL, Pose2D::default());
        assert!(controller.movement_state().is_walking());
        controller.collide();
        assert_eq!(controller.rotation_timer(), Some(1));
        assert_eq!(controller.n_frames(), 0);
    }

    #[test]
    fn test_collision_blocks_contorning_exit_for_one_tick() {
        let cfg = config();
        let state = NavState {
            wall: WallState::Contorning,
            movement: MovementState::Rotating(Rotation {
                direction: TurnDirection::Right,
                timer: None,
            }),
            start_angle: Some(0.0),
            collided: true,
            ..NavState::default()
        };

        let (state, _) =
            wall_following_step(state, &cfg, WallReadings::new(true, false), Pose2D::default());
        assert!(state.movement.is_rotating());
        assert!(!state.collided);

        let (state, _) =
            wall_following_step(state, &cfg, WallReadings::new(true, false), Pose2D::default());
        assert!(state.movement.is_walking());
    }

    #[test]
    fn test_random_bounce_deterministic() {
        let cfg = ControllerConfig {
            strategy: AutoStrategy::RandomBounce,
            ..config()
        };

        let mut a = NavigationController::from_seed(cfg, 99).unwrap();
        let mut b = NavigationController::from_seed(cfg, 99).unwrap();
        a.collide();
        b.collide();

        assert_eq!(a.movement_state(), b.movement_state());

        // Quarter to full half turn at 60 Hz and π rad/s: 15..=60 frames
        let frames = a.rotation_timer().unwrap();
        assert!((15..=60).contains(&frames), "frames = {}", frames);
    }

    #[test]
    fn test_random_bounce_turns_then_walks() {
        let cfg = ControllerConfig {
            strategy: AutoStrategy::RandomBounce,
            ..config()
        };
        let mut controller = NavigationController::from_seed(cfg, 5).unwrap();
        controller.collide();
        let frames = controller.rotation_timer().unwrap();

        for _ in 0..frames {
            let cmd = controller.compute(&KeyState::idle(), NO_WALL, Pose2D::default());
            assert_relative_eq!(cmd.linear, 0.0);
            assert!(!cmd.vacuum);
        }
        let cmd = controller.compute(&KeyState::idle(), NO_WALL, Pose2D::default());
        assert_eq!(cmd, DriveCommand::forward(2.0));
        assert_eq!(controller.wall_state(), WallState::Looking);
    }
}
