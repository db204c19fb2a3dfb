use std::time::Duration;

use avian3d::collision::CollisionDiagnostics;
use avian3d::dynamics::solver::SolverDiagnostics;
use avian3d::picking::PhysicsPickingDiagnostics;
use avian3d::prelude::{AngularVelocity, Gravity, LinearVelocity, PhysicsPlugins, Position};
use avian3d::spatial_query::SpatialQueryDiagnostics;
use bevy::asset::{AssetApp, AssetPlugin};
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::time::TimeUpdateStrategy;
use nearorbit_core::SIM_TICK_HZ;
use nearorbit_game::{
    FlightTelemetry, HealthPool, NearOrbitGamePlugin, Pilot, PilotCollision, PilotFire, PilotHit,
    PilotInput, PilotShipBundle, PilotSpawnConfig, ToggleControlScheme,
};
use nearorbit_sim_core::{ControlScheme, InputSnapshot};

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        AssetPlugin::default(),
        ScenePlugin,
        NearOrbitGamePlugin,
        PhysicsPlugins::default(),
    ));
    app.add_message::<bevy::asset::AssetEvent<Mesh>>();
    app.init_asset::<Mesh>();
    app.insert_resource(CollisionDiagnostics::default());
    app.insert_resource(SolverDiagnostics::default());
    app.insert_resource(SpatialQueryDiagnostics::default());
    app.insert_resource(PhysicsPickingDiagnostics::default());
    app.insert_resource(Gravity(Vec3::ZERO));
    app.insert_resource(Time::<Fixed>::from_hz(f64::from(SIM_TICK_HZ)));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / f64::from(SIM_TICK_HZ),
    )));
    // The first update only initialises time.
    app.update();
    app
}

fn spawn_manual_pilot(app: &mut App, position: Vec3) -> Entity {
    let bundle = PilotShipBundle::new(PilotSpawnConfig {
        scheme: ControlScheme::Manual,
        position,
        ..Default::default()
    })
    .expect("default tuning is valid");
    app.world_mut().spawn(bundle).id()
}

fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

#[test]
fn held_thrust_accelerates_the_rigid_body_along_up() {
    let mut app = test_app();
    let ship = spawn_manual_pilot(&mut app, Vec3::ZERO);
    app.world_mut()
        .entity_mut(ship)
        .insert(PilotInput(InputSnapshot {
            thrust_held: true,
            ..Default::default()
        }));

    run_ticks(&mut app, 30);

    let world = app.world();
    let velocity = world.get::<LinearVelocity>(ship).expect("velocity").0;
    let position = world.get::<Position>(ship).expect("position").0;
    assert!(velocity.y > 1.0, "velocity={velocity:?}");
    assert!(velocity.x.abs() < 1e-3 && velocity.z.abs() < 1e-3);
    assert!(position.y > 0.5, "position={position:?}");

    let telemetry = world.get::<FlightTelemetry>(ship).expect("telemetry");
    let report = telemetry.last.as_ref().expect("a tick was reported");
    assert!(report.thrust > 0.0);
}

#[test]
fn idle_ship_stays_put() {
    let mut app = test_app();
    let start = Vec3::new(2.0, -1.0, 5.0);
    let ship = spawn_manual_pilot(&mut app, start);

    run_ticks(&mut app, 20);

    let world = app.world();
    assert_eq!(world.get::<LinearVelocity>(ship).expect("velocity").0, Vec3::ZERO);
    let position = world.get::<Position>(ship).expect("position").0;
    assert!((position - start).length() < 1e-4, "position={position:?}");
}

#[test]
fn hit_drains_health_and_stuns() {
    let mut app = test_app();
    let ship = spawn_manual_pilot(&mut app, Vec3::ZERO);
    app.world_mut().entity_mut(ship).insert(AngularVelocity(Vec3::ONE));

    app.world_mut().write_message(PilotHit {
        pilot: ship,
        damage: 25.0,
        stun_s: 1.0,
    });
    run_ticks(&mut app, 1);

    let world = app.world();
    let health = world.get::<HealthPool>(ship).expect("health");
    assert_eq!(health.current, 75.0);
    let pilot = world.get::<Pilot>(ship).expect("pilot");
    assert!(pilot.controller.stunned_s() > 0.0);
    assert_eq!(pilot.controller.thrust(), 0.0);
    assert_eq!(world.get::<AngularVelocity>(ship).expect("spin").0, Vec3::ZERO);
}

#[test]
fn lethal_hit_respawns_at_spawn_point() {
    let mut app = test_app();
    let spawn = Vec3::new(0.0, 10.0, 0.0);
    let ship = spawn_manual_pilot(&mut app, spawn);
    app.world_mut()
        .entity_mut(ship)
        .insert(PilotInput(InputSnapshot {
            thrust_held: true,
            boosting: true,
            ..Default::default()
        }));
    run_ticks(&mut app, 30);
    assert!(app.world().get::<Position>(ship).expect("position").0.y > spawn.y + 1.0);

    app.world_mut()
        .entity_mut(ship)
        .insert(PilotInput::default());
    app.world_mut().write_message(PilotHit {
        pilot: ship,
        damage: 500.0,
        stun_s: 0.5,
    });
    run_ticks(&mut app, 1);

    let world = app.world();
    let health = world.get::<HealthPool>(ship).expect("health");
    assert_eq!(health.current, health.maximum);
    let position = world.get::<Position>(ship).expect("position").0;
    assert!((position - spawn).length() < 1e-4, "position={position:?}");
    assert_eq!(world.get::<LinearVelocity>(ship).expect("velocity").0, Vec3::ZERO);
    let pilot = world.get::<Pilot>(ship).expect("pilot");
    assert_eq!(pilot.controller.thrust(), 0.0);
}

#[test]
fn collision_clears_spin_only() {
    let mut app = test_app();
    let ship = spawn_manual_pilot(&mut app, Vec3::ZERO);
    app.world_mut()
        .entity_mut(ship)
        .insert(AngularVelocity(Vec3::new(0.0, 2.0, 0.0)));
    app.world_mut().write_message(PilotCollision { pilot: ship });
    run_ticks(&mut app, 1);

    let world = app.world();
    assert_eq!(world.get::<AngularVelocity>(ship).expect("spin").0, Vec3::ZERO);
    assert_eq!(world.get::<HealthPool>(ship).expect("health").current, 100.0);
}

#[test]
fn scheme_toggle_message_flips_the_controller() {
    let mut app = test_app();
    let ship = spawn_manual_pilot(&mut app, Vec3::ZERO);
    app.world_mut().write_message(ToggleControlScheme { pilot: ship });
    run_ticks(&mut app, 1);

    let pilot = app.world().get::<Pilot>(ship).expect("pilot");
    assert_eq!(pilot.controller.scheme(), ControlScheme::Assisted);
}

#[test]
fn fire_is_delivered_to_hosts_without_touching_flight() {
    let mut app = test_app();
    let ship = spawn_manual_pilot(&mut app, Vec3::ZERO);
    app.world_mut().write_message(PilotFire { pilot: ship });

    let queued = app.world().resource::<Messages<PilotFire>>();
    assert_eq!(queued.len(), 1);

    run_ticks(&mut app, 1);
    let world = app.world();
    assert_eq!(world.get::<LinearVelocity>(ship).expect("velocity").0, Vec3::ZERO);
    assert_eq!(world.get::<HealthPool>(ship).expect("health").current, 100.0);
}
