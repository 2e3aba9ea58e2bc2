use super::geometry::Pose2D;
use serde::{Deserialize, Serialize};

/// Observational events emitted by a simulation tick
///
/// These carry no state the core depends on; renderers and audio layers
/// consume them to update the cleaned percentage or play a sound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// The robot hit a wall and was rolled back to `pose`
    Collision { pose: Pose2D },
    /// Dust cells were vacuumed this tick
    DustCleared {
        cells: Vec<(usize, usize)>,
        remaining: usize,
    },
    /// The last dust cell was cleared on `frame`
    AllClean { frame: u64 },
}
