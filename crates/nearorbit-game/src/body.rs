use avian3d::prelude::*;
use bevy::prelude::*;
use nearorbit_sim_core::{BodyState, VehicleBody};

/// Avian components a pilot ship's body is read from and written back to.
pub type BodyData = (
    &'static mut Position,
    &'static mut Rotation,
    &'static mut LinearVelocity,
    &'static mut AngularVelocity,
);

/// Records what the flight controller commits during one call so it can be
/// written back to avian components afterwards. The force goes through
/// avian's `Forces` helper separately, since that query borrows the same
/// velocity components.
#[derive(Debug, Clone, Copy)]
pub struct PendingBodyWrite {
    state: BodyState,
    force: Vec3,
    linear_velocity: Option<Vec3>,
    angular_velocity: Option<Vec3>,
    pose: Option<(Vec3, Quat)>,
}

impl PendingBodyWrite {
    pub fn read(
        position: &Position,
        rotation: &Rotation,
        linear_velocity: &LinearVelocity,
        angular_velocity: &AngularVelocity,
    ) -> Self {
        Self {
            state: BodyState {
                position: position.0,
                orientation: rotation.0,
                linear_velocity: linear_velocity.0,
                angular_velocity: angular_velocity.0,
            },
            force: Vec3::ZERO,
            linear_velocity: None,
            angular_velocity: None,
            pose: None,
        }
    }

    pub fn force(&self) -> Vec3 {
        self.force
    }

    pub fn commit(
        &self,
        position: &mut Position,
        rotation: &mut Rotation,
        linear_velocity: &mut LinearVelocity,
        angular_velocity: &mut AngularVelocity,
    ) {
        if let Some(velocity) = self.linear_velocity {
            linear_velocity.0 = velocity;
        }
        if let Some(velocity) = self.angular_velocity {
            angular_velocity.0 = velocity;
        }
        if let Some((new_position, new_rotation)) = self.pose {
            position.0 = new_position;
            rotation.0 = new_rotation;
        }
    }
}

impl VehicleBody for PendingBodyWrite {
    fn state(&self) -> BodyState {
        self.state
    }

    fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.state.linear_velocity = velocity;
        self.linear_velocity = Some(velocity);
    }

    fn set_angular_velocity(&mut self, angular_velocity: Vec3) {
        self.state.angular_velocity = angular_velocity;
        self.angular_velocity = Some(angular_velocity);
    }

    fn set_pose(&mut self, position: Vec3, orientation: Quat) {
        self.state.position = position;
        self.state.orientation = orientation;
        self.pose = Some((position, orientation));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_committed_fields_are_written_back() {
        let mut write = PendingBodyWrite::read(
            &Position(Vec3::ONE),
            &Rotation(Quat::IDENTITY),
            &LinearVelocity(Vec3::X),
            &AngularVelocity(Vec3::Y),
        );
        write.set_angular_velocity(Vec3::ZERO);
        write.apply_force(Vec3::Z);
        write.apply_force(Vec3::Z);

        let mut position = Position(Vec3::ONE);
        let mut rotation = Rotation(Quat::IDENTITY);
        let mut linear = LinearVelocity(Vec3::new(9.0, 0.0, 0.0));
        let mut angular = AngularVelocity(Vec3::Y);
        write.commit(&mut position, &mut rotation, &mut linear, &mut angular);

        assert_eq!(linear.0, Vec3::new(9.0, 0.0, 0.0));
        assert_eq!(angular.0, Vec3::ZERO);
        assert_eq!(position.0, Vec3::ONE);
        assert_eq!(write.force(), Vec3::new(0.0, 0.0, 2.0));
    }
}
