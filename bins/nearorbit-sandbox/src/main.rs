mod script;

use std::time::Duration;

use anyhow::Context;
use avian3d::prelude::*;
use bevy::asset::{AssetApp, AssetPlugin};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::time::TimeUpdateStrategy;
use nearorbit_core::SIM_TICK_HZ;
use nearorbit_core::env::{first_present_env, parse_bool_env, scoped_keys};
use nearorbit_game::{
    FlightTelemetry, NearOrbitGamePlugin, PilotFire, PilotFlightSet, PilotHit, PilotInput,
    PilotShipBundle, PilotSpawnConfig, ToggleControlScheme,
};
use nearorbit_input_map::InputMapper;
use nearorbit_sim_core::{ControlScheme, FlightTuning};

const SCOPE: &str = "SANDBOX";
const LOG_EVERY_TICKS: u32 = 30;

#[derive(Debug, Clone, Copy, Resource)]
struct SandboxConfig {
    ticks: u32,
    assisted: bool,
    json_telemetry: bool,
    realtime: bool,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            assisted: false,
            json_telemetry: false,
            realtime: false,
        }
    }
}

impl SandboxConfig {
    fn from_env() -> anyhow::Result<Self> {
        let mut cfg = Self::default();
        if let Some((key, raw)) = first_present_env(&scoped_keys(SCOPE, "ticks")) {
            cfg.ticks = raw
                .trim()
                .parse()
                .with_context(|| format!("{key}={raw:?} is not a tick count"))?;
        }
        if let Some(v) = parse_bool_env(&scoped_keys(SCOPE, "assisted"))? {
            cfg.assisted = v;
        }
        if let Some(v) = parse_bool_env(&scoped_keys(SCOPE, "json_telemetry"))? {
            cfg.json_telemetry = v;
        }
        if let Some(v) = parse_bool_env(&scoped_keys(SCOPE, "realtime"))? {
            cfg.realtime = v;
        }
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Copy, Resource)]
struct SandboxPilot(Entity);

#[derive(Debug, Default, Resource)]
struct SandboxMapper(InputMapper);

#[derive(Debug, Default, Resource)]
struct ScriptClock {
    tick: u32,
}

#[derive(Debug, Default, Resource)]
struct ShotsFired(u32);

fn main() -> anyhow::Result<()> {
    let tuning = FlightTuning::from_env(SCOPE).context("invalid SANDBOX flight tuning")?;
    let config = SandboxConfig::from_env().context("invalid SANDBOX config")?;

    let mut app = App::new();
    app.add_plugins(LogPlugin::default());
    build_app(&mut app, config, tuning)?;
    app.run();
    Ok(())
}

fn build_app(app: &mut App, config: SandboxConfig, tuning: FlightTuning) -> anyhow::Result<Entity> {
    app.add_plugins(MinimalPlugins);
    app.add_plugins(AssetPlugin::default());
    app.add_plugins(ScenePlugin);
    app.add_plugins(NearOrbitGamePlugin);
    app.add_plugins(PhysicsPlugins::default().with_length_unit(1.0));
    app.add_message::<bevy::asset::AssetEvent<Mesh>>();
    app.init_asset::<Mesh>();
    app.insert_resource(Gravity(Vec3::ZERO));
    app.insert_resource(Time::<Fixed>::from_hz(f64::from(SIM_TICK_HZ)));
    if !config.realtime {
        // Advance exactly one fixed step per frame instead of following the wall clock.
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / f64::from(SIM_TICK_HZ),
        )));
    }

    let scheme = if config.assisted {
        ControlScheme::Assisted
    } else {
        ControlScheme::Manual
    };
    let bundle = PilotShipBundle::new(PilotSpawnConfig {
        tuning,
        scheme,
        display_name: Some("sandbox pilot".to_string()),
        ..Default::default()
    })?;
    let pilot = app.world_mut().spawn(bundle).id();
    info!(?pilot, ?scheme, ticks = config.ticks, "sandbox pilot spawned");

    app.insert_resource(config);
    app.insert_resource(SandboxPilot(pilot));
    app.insert_resource(SandboxMapper::default());
    app.insert_resource(ScriptClock::default());
    app.insert_resource(ShotsFired::default());
    app.add_systems(FixedUpdate, drive_script.before(PilotFlightSet));
    app.add_systems(FixedUpdate, count_shots.after(drive_script));
    app.add_systems(FixedUpdate, report_telemetry.after(PilotFlightSet));
    Ok(pilot)
}

fn drive_script(
    clock: Res<ScriptClock>,
    pilot: Res<SandboxPilot>,
    mut mapper: ResMut<SandboxMapper>,
    mut inputs: Query<&mut PilotInput>,
    mut toggles: MessageWriter<ToggleControlScheme>,
    mut hits: MessageWriter<PilotHit>,
    mut fire: MessageWriter<PilotFire>,
) {
    let step = script::step_at(clock.tick);
    let mapped = mapper.0.map(&step.raw);
    if let Ok(mut input) = inputs.get_mut(pilot.0) {
        input.0 = mapped.snapshot;
    }
    if mapped.toggle_scheme {
        toggles.write(ToggleControlScheme { pilot: pilot.0 });
    }
    if mapped.fire {
        fire.write(PilotFire { pilot: pilot.0 });
    }
    if let Some(hit) = step.hit {
        hits.write(PilotHit {
            pilot: pilot.0,
            damage: hit.damage,
            stun_s: hit.stun_s,
        });
    }
}

fn count_shots(
    clock: Res<ScriptClock>,
    mut shots: ResMut<ShotsFired>,
    mut fire: MessageReader<PilotFire>,
) {
    for shot in fire.read() {
        shots.0 += 1;
        info!(tick = clock.tick, pilot = ?shot.pilot, total = shots.0, "pilot fired");
    }
}

fn report_telemetry(
    config: Res<SandboxConfig>,
    pilot: Res<SandboxPilot>,
    mut clock: ResMut<ScriptClock>,
    telemetry: Query<&FlightTelemetry>,
    mut exit: MessageWriter<AppExit>,
) {
    let tick = clock.tick;
    clock.tick += 1;

    let Some(report) = telemetry.get(pilot.0).ok().and_then(|t| t.last.as_ref()) else {
        return;
    };
    if config.json_telemetry {
        match serde_json::to_string(report) {
            Ok(line) => println!("{line}"),
            Err(err) => warn!("telemetry serialization failed: {err}"),
        }
    }
    if tick % LOG_EVERY_TICKS == 0 {
        info!(
            tick,
            scheme = ?report.scheme,
            position = ?report.position,
            net_force = ?report.net_force,
            thrust = report.thrust,
            stunned_s = report.stunned_s,
            stalled = report.stalled,
            "pilot telemetry"
        );
    }
    if clock.tick >= config.ticks {
        info!(ticks = clock.tick, "sandbox script finished");
        exit.write(AppExit::Success);
    }
}
