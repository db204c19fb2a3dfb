//! Control scheme resolution: raw input → scheme-specific rates or angles.
//!
//! Angles here are degrees, matching the tuning values. Rotations use
//! yaw-pitch-roll composition (`Y * X * Z`) via [`euler_deg`].

use bevy_math::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::input::{InputSnapshot, ManualAxes, TrackedPose};
use crate::tuning::ControlTuning;

/// Fixed attitude offset layered under the assisted heading.
pub const ASSISTED_AXIS_OFFSET: Vec3 = Vec3::new(-90.0, 0.0, 0.0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlScheme {
    #[default]
    Assisted,
    Manual,
}

impl ControlScheme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Assisted => Self::Manual,
            Self::Manual => Self::Assisted,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualRates {
    /// Vertical thrust along body-forward (units/s).
    pub v_thrust: f32,
    pub pitch_rate: f32,
    pub roll_rate: f32,
    pub yaw_rate: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistedAttitude {
    pub bank: f32,
    pub pitch: f32,
    /// Heading change in deg/s fed into the persistent accumulator.
    pub turn_rate: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ResolvedControls {
    Manual(ManualRates),
    Assisted(AssistedAttitude),
}

pub fn resolve(scheme: ControlScheme, input: &InputSnapshot, tuning: &ControlTuning) -> ResolvedControls {
    match scheme {
        ControlScheme::Manual => ResolvedControls::Manual(resolve_manual(&input.manual_axes, tuning)),
        ControlScheme::Assisted => ResolvedControls::Assisted(resolve_assisted(input, tuning)),
    }
}

/// Squared, sign-preserving response curve. Out-of-range input is clamped to
/// `[-1, 1]` and non-finite input reads as centred.
pub fn smooth_axis(x: f32) -> f32 {
    let x = finite_or_zero(x).clamp(-1.0, 1.0);
    x.signum() * x.abs().powi(2)
}

pub fn resolve_manual(axes: &ManualAxes, tuning: &ControlTuning) -> ManualRates {
    ManualRates {
        v_thrust: smooth_axis(axes.vertical) * tuning.max_v_thrust,
        // inverted pitch
        pitch_rate: -smooth_axis(axes.pitch) * tuning.max_pitch,
        roll_rate: smooth_axis(axes.roll) * tuning.max_roll,
        yaw_rate: smooth_axis(axes.yaw) * tuning.max_yaw,
    }
}

pub fn resolve_assisted(input: &InputSnapshot, tuning: &ControlTuning) -> AssistedAttitude {
    let max_theta = tuning.max_assisted_theta;
    let (bank, pitch) = match &input.tracking {
        Some(pose) => tracked_angles(pose, tuning),
        None => {
            let axes = &input.manual_axes;
            (
                finite_or_zero(axes.roll).clamp(-1.0, 1.0) * max_theta,
                finite_or_zero(axes.pitch).clamp(-1.0, 1.0) * max_theta,
            )
        }
    };
    AssistedAttitude {
        bank,
        pitch,
        turn_rate: finite_or_zero(bank / max_theta * tuning.max_pitch),
    }
}

fn tracked_angles(pose: &TrackedPose, tuning: &ControlTuning) -> (f32, f32) {
    let max_theta = tuning.max_assisted_theta;
    let shoulders = pose.head - Vec3::new(0.0, tuning.shoulder_offset, 0.0);
    let bank = -assisted_theta(pose.left, pose.right, max_theta);
    let pitch = assisted_theta(pose.average_hand(), shoulders, max_theta);
    (bank, pitch)
}

/// Negated lean angle of the segment `a → b` against the horizontal, in
/// degrees, clamped to `±max_theta_deg`.
///
/// Coincident points and non-finite input yield `0.0`; the `asin` argument is
/// clamped so rounding can never leave its domain.
pub fn assisted_theta(a: Vec3, b: Vec3, max_theta_deg: f32) -> f32 {
    let distance = a.distance(b);
    if !distance.is_finite() || distance <= f32::EPSILON {
        return 0.0;
    }
    let ratio = ((a.y - b.y) / distance).clamp(-1.0, 1.0);
    let angle = ratio.asin().to_degrees();
    -finite_or_zero(angle).clamp(-max_theta_deg, max_theta_deg)
}

/// Quaternion from `(x, y, z)` degrees, composed yaw (Y) then pitch (X) then
/// roll (Z).
pub fn euler_deg(angles: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        angles.y.to_radians(),
        angles.x.to_radians(),
        angles.z.to_radians(),
    )
}

/// Inverse of [`euler_deg`].
pub fn euler_deg_of(orientation: Quat) -> Vec3 {
    let (y, x, z) = orientation.to_euler(EulerRot::YXZ);
    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

/// Persistent heading plus the instantaneous lean.
pub fn assisted_orientation(accumulated: Vec3, attitude: &AssistedAttitude) -> Quat {
    let heading = euler_deg(accumulated + ASSISTED_AXIS_OFFSET);
    let lean = euler_deg(Vec3::new(-attitude.pitch, -attitude.bank, 0.0));
    (heading * lean).normalize()
}

/// Incremental manual rotation for one tick, in body space.
pub fn manual_rotation_step(rates: &ManualRates, dt: f32) -> Quat {
    euler_deg(Vec3::new(rates.pitch_rate, -rates.roll_rate, rates.yaw_rate) * dt)
}

fn finite_or_zero(x: f32) -> f32 {
    if x.is_finite() { x } else { 0.0 }
}
