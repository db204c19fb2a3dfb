use bevy::prelude::*;

pub mod body;
pub mod components;
pub mod flight;
pub mod ship;

pub use body::{BodyData, PendingBodyWrite};
pub use components::*;
pub use flight::{
    apply_pilot_collisions, apply_pilot_hits, apply_scheme_toggles, step_flight_controllers,
};
pub use ship::{PilotShipBundle, PilotSpawnConfig, SpawnError};

/// Systems that turn pilot input and messages into committed body state.
/// Input sources should run before it.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PilotFlightSet;

pub struct NearOrbitGamePlugin;

impl Plugin for NearOrbitGamePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<HealthPool>()
            .register_type::<SpawnPoint>();

        app.add_message::<PilotHit>()
            .add_message::<PilotCollision>()
            .add_message::<ToggleControlScheme>()
            .add_message::<PilotFire>();

        // FixedUpdate keeps the flight model in lockstep with avian's fixed step.
        app.add_systems(
            FixedUpdate,
            (
                apply_scheme_toggles,
                apply_pilot_collisions,
                apply_pilot_hits,
                step_flight_controllers,
            )
                .chain()
                .in_set(PilotFlightSet),
        );
    }
}
