//! Vacuum Robot Kinematics
//!
//! Round differential-drive robot moving in screen space.
//!
//! # Features
//!
//! - Unicycle integration of (linear, angular) commands
//! - One-level rollback after a collision
//! - Wall contact and dust reach checks against the house grid
//!
//! # Example
//!
//! ```rust
//! use vacuum_core::algorithms::kinematics::VacuumRobot;
//! use vacuum_core::messages::Pose2D;
//!
//! let mut robot = VacuumRobot::new(1.0, Pose2D::new(5.0, 5.0, 0.0));
//!
//! robot.integrate(2.0, 0.0, 0.5);  // linear, angular, dt
//! assert_eq!(robot.pose().x, 6.0);
//!
//! robot.collided();
//! assert_eq!(robot.pose().x, 5.0);
//! ```

use crate::algorithms::house_grid::HouseGrid;
use crate::messages::{normalize_angle, Pose2D};

/// Vacuum robot body
#[derive(Debug, Clone)]
pub struct VacuumRobot {
    radius: f64, // collision footprint and vacuum reach (cells)
    pose: Pose2D,
    previous_pose: Pose2D,
}

impl VacuumRobot {
    /// Create a robot at `pose`
    ///
    /// # Arguments
    /// * `radius` - Body radius in cells
    /// * `pose` - Initial pose
    pub fn new(radius: f64, pose: Pose2D) -> Self {
        Self {
            radius,
            pose,
            previous_pose: pose,
        }
    }

    /// Integrate a velocity command over `dt` seconds
    ///
    /// Screen y grows downward, so forward motion at heading `theta` moves
    /// by `-sin(theta)` in y. The heading is wrapped into [0, 2π).
    ///
    /// # Arguments
    /// * `linear` - Linear velocity (cells/s)
    /// * `angular` - Angular velocity (rad/s)
    /// * `dt` - Time step (seconds)
    pub fn integrate(&mut self, linear: f64, angular: f64, dt: f64) {
        self.previous_pose = self.pose;

        let Pose2D { x, y, theta } = self.pose;
        self.pose = Pose2D {
            x: x + dt * linear * theta.cos(),
            y: y - dt * linear * theta.sin(),
            theta: normalize_angle(theta + dt * angular),
        };
    }

    /// Roll back to the pose before the last integration
    pub fn collided(&mut self) {
        self.pose = self.previous_pose;
    }

    /// Check if any wall cell center is closer than the radius
    pub fn check_wall_collision(&self, house: &HouseGrid) -> bool {
        !house
            .walls_near(self.pose.x, self.pose.y, self.radius)
            .is_empty()
    }

    /// Dust cells within reach
    ///
    /// The robot never mutates the house; the caller clears these cells.
    pub fn vacuum(&self, house: &HouseGrid) -> Vec<(usize, usize)> {
        house.dust_near(self.pose.x, self.pose.y, self.radius)
    }

    /// Get current pose
    pub fn pose(&self) -> Pose2D {
        self.pose
    }

    /// Pose before the last integration
    pub fn previous_pose(&self) -> Pose2D {
        self.previous_pose
    }

    /// Place the robot, discarding the rollback pose
    pub fn set_pose(&mut self, pose: Pose2D) {
        self.pose = pose;
        self.previous_pose = pose;
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}
