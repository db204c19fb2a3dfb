//! Fixed-step flight systems.
//!
//! Routing per tick:
//! PilotInput → FlightController::tick → PendingBodyWrite → avian components
//! and `Forces::apply_force`. Avian's integrator runs afterwards in the
//! physics schedule and consumes the net force.
//!
//! Hit, collision and scheme-toggle messages are applied before the tick so a
//! stun or respawn takes effect in the same step it arrives.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::body::{BodyData, PendingBodyWrite};
use crate::components::{
    FlightTelemetry, HealthPool, Pilot, PilotCollision, PilotHit, PilotInput, SpawnPoint,
    ToggleControlScheme,
};

pub fn apply_scheme_toggles(
    mut toggles: MessageReader<ToggleControlScheme>,
    mut pilots: Query<&mut Pilot>,
) {
    for toggle in toggles.read() {
        match pilots.get_mut(toggle.pilot) {
            Ok(mut pilot) => pilot.controller.toggle_scheme(),
            Err(_) => debug!(entity = ?toggle.pilot, "scheme toggle for non-pilot entity"),
        }
    }
}

pub fn apply_pilot_collisions(
    mut collisions: MessageReader<PilotCollision>,
    mut pilots: Query<(&mut Pilot, BodyData)>,
) {
    for collision in collisions.read() {
        let Ok((mut pilot, (mut position, mut rotation, mut linear, mut angular))) =
            pilots.get_mut(collision.pilot)
        else {
            continue;
        };
        let mut write = PendingBodyWrite::read(&position, &rotation, &linear, &angular);
        pilot.controller.on_collision(&mut write);
        write.commit(&mut position, &mut rotation, &mut linear, &mut angular);
    }
}

/// Drains health and stuns on hit; an emptied pool respawns the ship at its
/// [`SpawnPoint`] with health refilled.
pub fn apply_pilot_hits(
    mut hits: MessageReader<PilotHit>,
    mut pilots: Query<(&mut Pilot, &mut HealthPool, &SpawnPoint, BodyData)>,
) {
    for hit in hits.read() {
        let Ok((mut pilot, mut health, spawn, (mut position, mut rotation, mut linear, mut angular))) =
            pilots.get_mut(hit.pilot)
        else {
            debug!(entity = ?hit.pilot, "hit on non-pilot entity");
            continue;
        };
        let damage = if hit.damage.is_finite() {
            hit.damage.max(0.0)
        } else {
            0.0
        };
        health.current = (health.current - damage).max(0.0);

        let mut write = PendingBodyWrite::read(&position, &rotation, &linear, &angular);
        pilot.controller.on_hit(&mut write, hit.stun_s);
        if health.current <= 0.0 {
            pilot
                .controller
                .reset_after_respawn(&mut write, spawn.position, spawn.rotation);
            health.current = health.maximum;
            warn!(entity = ?hit.pilot, "pilot destroyed; respawned at spawn point");
        }
        write.commit(&mut position, &mut rotation, &mut linear, &mut angular);
    }
}

pub fn step_flight_controllers(
    time: Res<Time>,
    mut pilots: Query<(Entity, &mut Pilot, &PilotInput, &mut FlightTelemetry)>,
    mut bodies: ParamSet<(Query<BodyData>, Query<Forces>)>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    let mut net_forces = Vec::<(Entity, Vec3)>::new();
    let mut kinematics = bodies.p0();
    for (entity, mut pilot, input, mut telemetry) in &mut pilots {
        let Ok((mut position, mut rotation, mut linear, mut angular)) = kinematics.get_mut(entity)
        else {
            warn!(?entity, "pilot without a rigid body skipped");
            continue;
        };
        let mut write = PendingBodyWrite::read(&position, &rotation, &linear, &angular);
        let report = pilot.controller.tick(&mut write, &input.0, dt);
        write.commit(&mut position, &mut rotation, &mut linear, &mut angular);
        net_forces.push((entity, write.force()));
        telemetry.last = Some(report);
    }

    let mut forces = bodies.p1();
    for (entity, net_force) in net_forces {
        if net_force == Vec3::ZERO {
            continue;
        }
        if let Ok(mut body_forces) = forces.get_mut(entity) {
            body_forces.apply_force(net_force);
        }
    }
}
