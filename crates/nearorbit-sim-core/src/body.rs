use bevy_math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Rigid-body state as read at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    /// World-space angular velocity (rad/s).
    pub angular_velocity: Vec3,
}

impl BodyState {
    pub fn at_rest(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }

    /// Principal thrust axis in world space.
    pub fn up(&self) -> Vec3 {
        self.orientation.normalize() * Vec3::Y
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation.normalize() * Vec3::Z
    }
}

/// Physics engine seam. The controller never owns the body; hosts hand it a
/// handle each tick and the controller performs one commit per tick through
/// these calls.
pub trait VehicleBody {
    fn state(&self) -> BodyState;
    /// Additive force for the next integration step.
    fn apply_force(&mut self, force: Vec3);
    fn set_linear_velocity(&mut self, velocity: Vec3);
    fn set_angular_velocity(&mut self, angular_velocity: Vec3);
    fn set_pose(&mut self, position: Vec3, orientation: Quat);
}

/// Self-integrating body for headless runs and golden-vector tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityKinematics {
    pub state: BodyState,
    pub mass: f32,
    pub pending_force: Vec3,
}

impl EntityKinematics {
    pub fn new(position: Vec3, orientation: Quat, mass: f32) -> Self {
        Self {
            state: BodyState::at_rest(position, orientation),
            mass,
            pending_force: Vec3::ZERO,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.state.linear_velocity = velocity;
        self
    }

    /// Semi-implicit Euler step consuming the accumulated force.
    pub fn integrate(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let inv_mass = if self.mass > 0.0 { 1.0 / self.mass } else { 0.0 };
        let s = &mut self.state;
        s.linear_velocity += self.pending_force * inv_mass * dt;
        s.position += s.linear_velocity * dt;
        if s.angular_velocity != Vec3::ZERO {
            s.orientation = (Quat::from_scaled_axis(s.angular_velocity * dt) * s.orientation).normalize();
        }
        self.pending_force = Vec3::ZERO;
    }
}

impl VehicleBody for EntityKinematics {
    fn state(&self) -> BodyState {
        self.state
    }

    fn apply_force(&mut self, force: Vec3) {
        self.pending_force += force;
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.state.linear_velocity = velocity;
    }

    fn set_angular_velocity(&mut self, angular_velocity: Vec3) {
        self.state.angular_velocity = angular_velocity;
    }

    fn set_pose(&mut self, position: Vec3, orientation: Quat) {
        self.state.position = position;
        self.state.orientation = orientation;
    }
}
