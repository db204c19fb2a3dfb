// Pilot ship bundle
// Component set for a single flyable ship: flight model, input slot,
// health, spawn point and the avian rigid body it drives.

use avian3d::prelude::*;
use bevy::prelude::*;
use nearorbit_core::EntityId;
use nearorbit_sim_core::{ControlScheme, FlightController, FlightTuning, TuningError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{HealthPool, Pilot, PilotId, SpawnPoint};

pub const DEFAULT_MAX_HEALTH: f32 = 100.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpawnError {
    #[error(transparent)]
    Tuning(#[from] TuningError),
    #[error("max_health must be finite and positive, got {0}")]
    MaxHealth(f32),
}

#[derive(Bundle)]
pub struct PilotShipBundle {
    pub name: Name,
    pub pilot_id: PilotId,
    pub pilot: Pilot,
    pub health: HealthPool,
    pub spawn: SpawnPoint,

    pub rigid_body: RigidBody,
    pub mass: Mass,
    pub position: Position,
    pub rotation: Rotation,
    pub linear_velocity: LinearVelocity,
    pub angular_velocity: AngularVelocity,
    pub sleeping_disabled: SleepingDisabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PilotSpawnConfig {
    pub tuning: FlightTuning,
    pub scheme: ControlScheme,
    pub position: Vec3,
    pub rotation: Quat,
    pub max_health: f32,
    /// Defaults to "Pilot" if None
    pub display_name: Option<String>,
}

impl Default for PilotSpawnConfig {
    fn default() -> Self {
        Self {
            tuning: FlightTuning::default(),
            scheme: ControlScheme::default(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            max_health: DEFAULT_MAX_HEALTH,
            display_name: None,
        }
    }
}

impl PilotShipBundle {
    /// Fails if the tuning does not validate or `max_health` is not a
    /// positive finite value.
    pub fn new(config: PilotSpawnConfig) -> Result<Self, SpawnError> {
        if !config.max_health.is_finite() || config.max_health <= 0.0 {
            return Err(SpawnError::MaxHealth(config.max_health));
        }
        let controller = FlightController::new(config.tuning, config.scheme, config.rotation)?;
        Ok(Self {
            name: Name::new(config.display_name.unwrap_or_else(|| "Pilot".to_string())),
            pilot_id: PilotId(EntityId::new_v4()),
            pilot: Pilot { controller },
            health: HealthPool::full(config.max_health),
            spawn: SpawnPoint {
                position: config.position,
                rotation: config.rotation,
            },
            rigid_body: RigidBody::Dynamic,
            // Unit mass keeps contributor outputs equal to accelerations.
            mass: Mass(1.0),
            position: Position(config.position),
            rotation: Rotation(config.rotation),
            linear_velocity: LinearVelocity::ZERO,
            angular_velocity: AngularVelocity::ZERO,
            sleeping_disabled: SleepingDisabled,
        })
    }
}
