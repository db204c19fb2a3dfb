use bevy::prelude::*;
use bevy::reflect::Reflect;
use nearorbit_core::EntityId;
use nearorbit_sim_core::{FlightController, InputSnapshot, TickReport};
use serde::{Deserialize, Serialize};

/// Stable identity of a pilot ship, independent of the ECS `Entity`.
#[derive(Debug, Clone, Copy, Component, PartialEq, Eq, Hash)]
pub struct PilotId(pub EntityId);

/// Flight model state owned by the ship.
#[derive(Debug, Clone, Component)]
#[require(PilotInput, FlightTelemetry)]
pub struct Pilot {
    pub controller: FlightController,
}

/// Latest input snapshot, overwritten by the input source before each fixed step.
#[derive(Debug, Clone, Copy, Default, Component, PartialEq)]
pub struct PilotInput(pub InputSnapshot);

#[derive(Debug, Clone, Default, Component)]
pub struct FlightTelemetry {
    pub last: Option<TickReport>,
}

#[derive(Debug, Clone, Copy, Component, Reflect, Serialize, Deserialize, PartialEq)]
#[reflect(Component, Serialize, Deserialize)]
pub struct HealthPool {
    pub current: f32,
    pub maximum: f32,
}

impl HealthPool {
    pub fn full(maximum: f32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }
}

/// Where the ship returns to when its health runs out.
#[derive(Debug, Clone, Copy, Component, Reflect, Serialize, Deserialize, PartialEq)]
#[reflect(Component, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub position: Vec3,
    pub rotation: Quat,
}

/// A weapon hit on `pilot`. Damage drains [`HealthPool`]; `stun_s` disables
/// thrust and boost for at least that long.
#[derive(Message, Debug, Clone, Copy)]
pub struct PilotHit {
    pub pilot: Entity,
    pub damage: f32,
    pub stun_s: f32,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct PilotCollision {
    pub pilot: Entity,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct ToggleControlScheme {
    pub pilot: Entity,
}

/// Trigger pull from `pilot`. Weapons are not modelled here; the message is a
/// hook for whatever consumes shots.
#[derive(Message, Debug, Clone, Copy)]
pub struct PilotFire {
    pub pilot: Entity,
}
