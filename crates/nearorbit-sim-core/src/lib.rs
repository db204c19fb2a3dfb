//! Deterministic flight model shared by every host of a pilot vehicle.
//!
//! Per tick: input snapshot → control scheme resolution → force contributors
//! evaluated against one body snapshot → a single commit of net force, stall
//! clamp and pose to the [`VehicleBody`].

mod body;
mod controller;
mod forces;
mod input;
pub mod scheme;
mod tuning;

pub use bevy_math::{Quat, Vec3};
pub use body::{BodyState, EntityKinematics, VehicleBody};
pub use controller::{ContributionReport, FlightController, TickReport};
pub use forces::{ForceContext, ForceContributor, ForceOutput, Status};
pub use input::{InputSnapshot, ManualAxes, TrackedPose};
pub use scheme::{AssistedAttitude, ControlScheme, ManualRates, ResolvedControls};
pub use tuning::{ControlTuning, FlightTuning, ForceTuning, TuningError};
