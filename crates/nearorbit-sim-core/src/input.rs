use bevy_math::Vec3;
use serde::{Deserialize, Serialize};

/// Raw directional axes, each nominally in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualAxes {
    /// Vertical thrusters, along body-forward.
    pub vertical: f32,
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

/// Tracked hand and head points in the pilot rig's local space (metres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedPose {
    pub left: Vec3,
    pub right: Vec3,
    pub head: Vec3,
}

impl TrackedPose {
    pub fn average_hand(&self) -> Vec3 {
        0.5 * (self.left + self.right)
    }
}

/// One tick of pilot intent. Captured by the input collaborator, consumed by
/// exactly one `FlightController::tick` and then dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub thrust_held: bool,
    pub boosting: bool,
    pub manual_axes: ManualAxes,
    /// `None` when no tracked rig is active (keyboard play). The assisted
    /// scheme then derives its angles from `manual_axes` instead.
    pub tracking: Option<TrackedPose>,
}
