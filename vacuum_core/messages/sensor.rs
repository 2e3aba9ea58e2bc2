use serde::{Deserialize, Serialize};

/// Which of the two wall sensors to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorDirection {
    /// Mounted on the front rim, along the heading
    Front,
    /// Mounted on the rear rim, opposite the heading
    Back,
}

/// Binary wall readings from the front and back sensors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallReadings {
    pub front: bool,
    pub back: bool,
}

impl WallReadings {
    pub fn new(front: bool, back: bool) -> Self {
        Self { front, back }
    }

    /// Both sensors see the wall
    pub fn both(&self) -> bool {
        self.front && self.back
    }

    /// Neither sensor sees the wall
    pub fn none(&self) -> bool {
        !self.front && !self.back
    }
}
