use bevy_math::{Quat, Vec3};
use serde::Serialize;
use tracing::{debug, info};

use crate::body::{BodyState, VehicleBody};
use crate::forces::{ForceContext, ForceContributor, Status};
use crate::input::InputSnapshot;
use crate::scheme::{self, ControlScheme, ResolvedControls};
use crate::tuning::{FlightTuning, TuningError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContributionReport {
    pub contributor: ForceContributor,
    pub status: Status,
    /// Zero unless `status` is `Active`.
    pub force: Vec3,
}

/// What one tick computed and committed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub dt: f32,
    pub scheme: ControlScheme,
    pub controls: ResolvedControls,
    pub contributions: Vec<ContributionReport>,
    pub net_force: Vec3,
    /// Drag clamped the velocity to zero this tick.
    pub stalled: bool,
    pub thrust: f32,
    /// Stun remaining after this tick's decay.
    pub stunned_s: f32,
    pub position: Vec3,
    pub orientation: Quat,
}

/// Per-vehicle orchestrator of the flight model.
#[derive(Debug, Clone)]
pub struct FlightController {
    tuning: FlightTuning,
    scheme: ControlScheme,
    contributors: Vec<ForceContributor>,
    /// Main thrust accumulator in `[0, max_thrust]`.
    thrust: f32,
    stunned_s: f32,
    /// Assisted heading in degrees, independent of the body orientation.
    accumulated_rotation: Vec3,
    last_net_force: Vec3,
}

impl FlightController {
    pub fn new(
        tuning: FlightTuning,
        scheme: ControlScheme,
        spawn_orientation: Quat,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            tuning,
            scheme,
            contributors: ForceContributor::STOCK.to_vec(),
            thrust: 0.0,
            stunned_s: 0.0,
            accumulated_rotation: scheme::euler_deg_of(spawn_orientation),
            last_net_force: Vec3::ZERO,
        })
    }

    pub fn tuning(&self) -> &FlightTuning {
        &self.tuning
    }

    pub fn scheme(&self) -> ControlScheme {
        self.scheme
    }

    pub fn set_scheme(&mut self, scheme: ControlScheme) {
        if self.scheme != scheme {
            info!(from = ?self.scheme, to = ?scheme, "control scheme changed");
            self.scheme = scheme;
        }
    }

    pub fn toggle_scheme(&mut self) {
        self.set_scheme(self.scheme.toggled());
    }

    pub fn contributors(&self) -> &[ForceContributor] {
        &self.contributors
    }

    pub fn thrust(&self) -> f32 {
        self.thrust
    }

    pub fn stunned_s(&self) -> f32 {
        self.stunned_s
    }

    pub fn accumulated_rotation(&self) -> Vec3 {
        self.accumulated_rotation
    }

    pub fn net_force_last_tick(&self) -> Vec3 {
        self.last_net_force
    }

    /// Advance one simulation step.
    ///
    /// Order: thrust accumulator, scheme resolution, contributor evaluation
    /// against a single body snapshot, then one commit (stall clamp, net
    /// force, pose). A non-positive or non-finite `dt` commits nothing.
    pub fn tick<B: VehicleBody + ?Sized>(
        &mut self,
        body: &mut B,
        input: &InputSnapshot,
        dt: f32,
    ) -> TickReport {
        let state = body.state();
        let controls = scheme::resolve(self.scheme, input, &self.tuning.control);
        if !dt.is_finite() || dt <= 0.0 {
            self.last_net_force = Vec3::ZERO;
            return self.report(0.0, controls, Vec::new(), false, &state);
        }

        let control = &self.tuning.control;
        let thrust_step = if input.thrust_held {
            control.thrust_rate
        } else {
            -control.thrust_rate
        };
        self.thrust = (self.thrust + thrust_step * dt).clamp(0.0, control.max_thrust);

        let ctx = ForceContext {
            body: &state,
            input,
            stunned_s: self.stunned_s,
            dt,
            tuning: &self.tuning.forces,
        };
        let mut contributions = Vec::with_capacity(self.contributors.len());
        let mut net_force = Vec3::ZERO;
        let mut stalled = false;
        for &contributor in &self.contributors {
            let status = contributor.status(&ctx);
            let force = if status == Status::Active {
                let output = contributor.force(&ctx);
                stalled |= output.is_stall();
                output.vector()
            } else {
                Vec3::ZERO
            };
            net_force += force;
            contributions.push(ContributionReport {
                contributor,
                status,
                force,
            });
        }
        self.retire_removed(&contributions);

        if stalled {
            debug!(speed = state.linear_velocity.length(), "drag stall clamp");
            body.set_linear_velocity(Vec3::ZERO);
        }
        body.apply_force(net_force);
        let (position, orientation) = self.advance_pose(&state, &controls, dt);
        body.set_pose(position, orientation);

        self.last_net_force = net_force;
        self.stunned_s = (self.stunned_s - dt).max(0.0);

        let mut report = self.report(dt, controls, contributions, stalled, &state);
        report.position = position;
        report.orientation = orientation;
        report
    }

    /// Collision interrupt: kills any spin picked up from the impact.
    pub fn on_collision<B: VehicleBody + ?Sized>(&mut self, body: &mut B) {
        body.set_angular_velocity(Vec3::ZERO);
    }

    /// Weapon hit: collision interrupt, stun for at least `stun_s` and drop
    /// the built-up main thrust.
    pub fn on_hit<B: VehicleBody + ?Sized>(&mut self, body: &mut B, stun_s: f32) {
        self.on_collision(body);
        if stun_s.is_finite() {
            self.stunned_s = self.stunned_s.max(stun_s);
        }
        self.thrust = 0.0;
        self.last_net_force = Vec3::ZERO;
        debug!(stunned_s = self.stunned_s, "pilot hit");
    }

    pub fn reset_after_respawn<B: VehicleBody + ?Sized>(
        &mut self,
        body: &mut B,
        position: Vec3,
        orientation: Quat,
    ) {
        body.set_pose(position, orientation);
        body.set_linear_velocity(Vec3::ZERO);
        body.set_angular_velocity(Vec3::ZERO);
        self.contributors = ForceContributor::STOCK.to_vec();
        self.thrust = 0.0;
        self.stunned_s = 0.0;
        self.accumulated_rotation = scheme::euler_deg_of(orientation);
        self.last_net_force = Vec3::ZERO;
        info!(?position, "flight controller reset after respawn");
    }

    fn retire_removed(&mut self, contributions: &[ContributionReport]) {
        if contributions.iter().all(|c| c.status != Status::Remove) {
            return;
        }
        let mut statuses = contributions.iter().map(|c| c.status);
        self.contributors.retain(|contributor| {
            let keep = statuses.next() != Some(Status::Remove);
            if !keep {
                debug!(?contributor, "force contributor retired");
            }
            keep
        });
    }

    fn advance_pose(
        &mut self,
        state: &BodyState,
        controls: &ResolvedControls,
        dt: f32,
    ) -> (Vec3, Quat) {
        let main_thrust = Vec3::Y * self.thrust;
        match controls {
            ResolvedControls::Manual(rates) => {
                let local = main_thrust + Vec3::Z * rates.v_thrust;
                let position = state.position + state.orientation * local * dt;
                let orientation =
                    (state.orientation * scheme::manual_rotation_step(rates, dt)).normalize();
                (position, orientation)
            }
            ResolvedControls::Assisted(attitude) => {
                let position = state.position + state.orientation * main_thrust * dt;
                let heading = &mut self.accumulated_rotation.z;
                *heading = (*heading + attitude.turn_rate * dt).rem_euclid(360.0);
                let orientation = scheme::assisted_orientation(self.accumulated_rotation, attitude);
                (position, orientation)
            }
        }
    }

    fn report(
        &self,
        dt: f32,
        controls: ResolvedControls,
        contributions: Vec<ContributionReport>,
        stalled: bool,
        state: &BodyState,
    ) -> TickReport {
        TickReport {
            dt,
            scheme: self.scheme,
            controls,
            contributions,
            net_force: self.last_net_force,
            stalled,
            thrust: self.thrust,
            stunned_s: self.stunned_s,
            position: state.position,
            orientation: state.orientation,
        }
    }
}
