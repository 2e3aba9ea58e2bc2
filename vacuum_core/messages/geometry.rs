//! Robot pose in screen space
//!
//! Coordinates are grid cells with y growing downward, so a positive heading
//! turns the robot counter-clockwise on screen.

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Robot pose (x, y, heading)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    pub x: f64,
    pub y: f64,
    /// Heading in radians
    pub theta: f64,
}

impl Pose2D {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// Position as an (x, y) tuple
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Euclidean distance between the positions of two poses
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        ((self.x - x).powi(2) + (self.y - y).powi(2)).sqrt()
    }

    /// Unit vector for a direction `offset` radians from the heading.
    ///
    /// The y component is negated because screen y grows downward.
    pub fn direction(&self, offset: f64) -> (f64, f64) {
        let angle = self.theta + offset;
        (angle.cos(), -angle.sin())
    }
}

/// Wrap an angle into [0, 2π)
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest difference `a - b`, in (-π, π]
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(TAU);
    if diff > PI {
        diff - TAU
    } else {
        diff
    }
}
