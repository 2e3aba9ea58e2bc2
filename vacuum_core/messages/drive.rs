use serde::{Deserialize, Serialize};

/// Drive command for the robot base
///
/// Linear and angular velocity plus the vacuum motor flag. Produced once per
/// tick by the navigation controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveCommand {
    pub linear: f64,  // cells/s forward velocity
    pub angular: f64, // rad/s turning velocity
    pub vacuum: bool,
}

impl DriveCommand {
    pub fn new(linear: f64, angular: f64, vacuum: bool) -> Self {
        Self {
            linear,
            angular,
            vacuum,
        }
    }

    /// Straight-line motion with the vacuum running
    pub fn forward(linear: f64) -> Self {
        Self::new(linear, 0.0, true)
    }

    /// In-place rotation, vacuum off
    pub fn rotate(angular: f64) -> Self {
        Self::new(0.0, angular, false)
    }

    /// Zero velocity command (stop)
    pub fn stop() -> Self {
        Self::new(0.0, 0.0, false)
    }
}

/// Semantic key snapshot for manual driving
///
/// The surrounding application maps physical keys (W, A, S, D, the stop key
/// and space) onto these flags; the controller never sees raw key codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub forward: bool,
    pub rotate_left: bool,
    pub backward: bool,
    pub rotate_right: bool,
    /// Explicit no-motion key. Lowest priority: it commands the same
    /// standstill as releasing every motion key, and any held motion key
    /// wins over it.
    pub stop: bool,
    pub vacuum: bool,
}

impl KeyState {
    /// No keys held
    pub fn idle() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_drive_command_constructors() {
        let cmd = DriveCommand::forward(2.0);
        assert_relative_eq!(cmd.linear, 2.0);
        assert_relative_eq!(cmd.angular, 0.0);
        assert!(cmd.vacuum);

        let cmd = DriveCommand::rotate(-1.5);
        assert_relative_eq!(cmd.linear, 0.0);
        assert_relative_eq!(cmd.angular, -1.5);
        assert!(!cmd.vacuum);

        assert_eq!(DriveCommand::stop(), DriveCommand::default());
    }
}
