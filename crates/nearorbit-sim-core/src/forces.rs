//! Force contributors.
//!
//! Each contributor is a pure function of the tick's body snapshot, input and
//! stun timer. The controller sums the `Active` ones; nothing here writes to
//! the body. Drag's stall clamp is reported as [`ForceOutput::Stall`] and
//! committed by the controller.

use bevy_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::body::BodyState;
use crate::input::InputSnapshot;
use crate::tuning::ForceTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Active,
    Inactive,
    /// Excluded this tick and retired from the active set afterwards.
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForceContributor {
    Drag,
    Thrust,
    Boost,
}

#[derive(Debug, Clone, Copy)]
pub struct ForceContext<'a> {
    pub body: &'a BodyState,
    pub input: &'a InputSnapshot,
    pub stunned_s: f32,
    pub dt: f32,
    pub tuning: &'a ForceTuning,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ForceOutput {
    Force(Vec3),
    /// Drag would overshoot: velocity snaps to zero and no force is applied.
    Stall,
}

impl ForceOutput {
    pub fn vector(self) -> Vec3 {
        match self {
            Self::Force(force) => force,
            Self::Stall => Vec3::ZERO,
        }
    }

    pub fn is_stall(self) -> bool {
        matches!(self, Self::Stall)
    }
}

impl ForceContributor {
    /// Evaluation order of a freshly spawned vehicle.
    pub const STOCK: [ForceContributor; 3] = [Self::Drag, Self::Thrust, Self::Boost];

    pub fn status(self, ctx: &ForceContext<'_>) -> Status {
        match self {
            Self::Drag => Status::Active,
            Self::Thrust => gated(ctx.stunned_s, ctx.input.thrust_held),
            Self::Boost => gated(ctx.stunned_s, ctx.input.boosting),
        }
    }

    /// Must only be called in a tick where [`Self::status`] is `Active`.
    pub fn force(self, ctx: &ForceContext<'_>) -> ForceOutput {
        debug_assert_eq!(
            self.status(ctx),
            Status::Active,
            "{self:?} force evaluated while not active"
        );
        let t = ctx.tuning;
        match self {
            Self::Drag => drag(ctx),
            Self::Thrust => ForceOutput::Force(directed_thrust(ctx, t.base_accel, t.lateral_drag)),
            Self::Boost => {
                ForceOutput::Force(directed_thrust(ctx, t.boost_accel, t.boost_lateral_drag))
            }
        }
    }
}

fn gated(stunned_s: f32, held: bool) -> Status {
    if stunned_s <= 0.0 && held {
        Status::Active
    } else {
        Status::Inactive
    }
}

fn drag(ctx: &ForceContext<'_>) -> ForceOutput {
    let t = ctx.tuning;
    let boosting = ctx.input.boosting;
    let velocity = ctx.body.linear_velocity;
    let speed = velocity.length();

    let cap = if boosting { t.boost_speed } else { t.max_speed };
    let ratio = speed / cap;
    let drag_factor = ((ratio - t.drag_thresh) / (1.0 - t.drag_thresh)).clamp(0.0, 2.0);
    let accel = if boosting { t.boost_accel } else { t.base_accel };
    let drag = t.base_drag + accel * drag_factor;

    if speed < drag * ctx.dt {
        return ForceOutput::Stall;
    }
    ForceOutput::Force(-drag * velocity.normalize_or_zero())
}

/// Thrust along body-up plus a correction against drift off that axis.
fn directed_thrust(ctx: &ForceContext<'_>, accel: f32, lateral_drag: f32) -> Vec3 {
    let up = ctx.body.up();
    let lateral = ctx.body.linear_velocity.reject_from_normalized(up);
    (accel + ctx.tuning.base_drag) * up - lateral_drag * lateral
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_math::Quat;

    fn ctx<'a>(
        body: &'a BodyState,
        input: &'a InputSnapshot,
        tuning: &'a ForceTuning,
        stunned_s: f32,
    ) -> ForceContext<'a> {
        ForceContext {
            body,
            input,
            stunned_s,
            dt: 0.02,
            tuning,
        }
    }

    #[test]
    fn drag_ramps_only_above_threshold() {
        let tuning = ForceTuning::default();
        let input = InputSnapshot::default();
        let mut body = BodyState::at_rest(Vec3::ZERO, Quat::IDENTITY);

        // 0.9 * MAX_SPEED sits below DRAG_THRESH, so only base drag applies.
        body.linear_velocity = Vec3::new(4.5, 0.0, 0.0);
        let slow = ForceContributor::Drag.force(&ctx(&body, &input, &tuning, 0.0)).vector();
        assert!((slow - Vec3::new(-4.0, 0.0, 0.0)).length() < 1e-5, "{slow:?}");

        // 0.97 * MAX_SPEED: factor (0.97 - 0.94) / 0.06 = 0.5.
        body.linear_velocity = Vec3::new(4.85, 0.0, 0.0);
        let fast = ForceContributor::Drag.force(&ctx(&body, &input, &tuning, 0.0)).vector();
        let expected = 4.0 + 6.25 * 0.5;
        assert!((fast.x + expected).abs() < 1e-3, "{fast:?}");
    }

    #[test]
    fn drag_factor_saturates_at_two() {
        let tuning = ForceTuning::default();
        let input = InputSnapshot::default();
        let mut body = BodyState::at_rest(Vec3::ZERO, Quat::IDENTITY);
        body.linear_velocity = Vec3::new(0.0, 0.0, 50.0);
        let force = ForceContributor::Drag.force(&ctx(&body, &input, &tuning, 0.0)).vector();
        assert!((force.z + (4.0 + 6.25 * 2.0)).abs() < 1e-4, "{force:?}");
    }

    #[test]
    fn stun_gates_thrust_and_boost_but_not_drag() {
        let tuning = ForceTuning::default();
        let body = BodyState::at_rest(Vec3::ZERO, Quat::IDENTITY);
        let input = InputSnapshot {
            thrust_held: true,
            boosting: true,
            ..Default::default()
        };
        let stunned = ctx(&body, &input, &tuning, 0.25);
        assert_eq!(ForceContributor::Drag.status(&stunned), Status::Active);
        assert_eq!(ForceContributor::Thrust.status(&stunned), Status::Inactive);
        assert_eq!(ForceContributor::Boost.status(&stunned), Status::Inactive);

        let free = ctx(&body, &input, &tuning, 0.0);
        assert_eq!(ForceContributor::Thrust.status(&free), Status::Active);
        assert_eq!(ForceContributor::Boost.status(&free), Status::Active);
    }

    #[test]
    #[should_panic(expected = "force evaluated while not active")]
    fn evaluating_inactive_contributor_panics_in_debug() {
        let tuning = ForceTuning::default();
        let body = BodyState::at_rest(Vec3::ZERO, Quat::IDENTITY);
        let input = InputSnapshot::default();
        let _ = ForceContributor::Thrust.force(&ctx(&body, &input, &tuning, 0.0));
    }
}
