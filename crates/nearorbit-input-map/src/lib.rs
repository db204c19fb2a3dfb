//! Raw device state → [`InputSnapshot`] plus edge-triggered control events.
//!
//! Two devices are supported: the keyboard and a tracked rig (two hand
//! controllers and a head point). The primary controller is the left hand.

use bevy_math::{Vec2, Vec3};
use nearorbit_sim_core::{InputSnapshot, ManualAxes, TrackedPose};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Hand-trigger average above which main thrust is held.
pub const THRUST_TRIGGER_THRESHOLD: f32 = 0.3;
/// Index-trigger level above which boost and fire read as pressed.
pub const INDEX_TRIGGER_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputDevice {
    #[default]
    Keyboard,
    TrackedControllers,
}

/// Keyboard keys and virtual axes sampled this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyboardState {
    /// `Space`
    pub thrust: bool,
    /// `LeftShift`
    pub boost: bool,
    pub vertical_alt: f32,
    pub horizontal: f32,
    pub vertical: f32,
    pub horizontal_alt: f32,
    /// `E`
    pub toggle_scheme: bool,
    /// `Q`
    pub toggle_device: bool,
    /// `M`
    pub fire: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HandController {
    pub position: Vec3,
    pub hand_trigger: f32,
    pub index_trigger: f32,
    pub stick: Vec2,
    pub stick_click: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackedControllerState {
    /// Primary hand.
    pub left: HandController,
    /// Secondary hand.
    pub right: HandController,
    pub head: Vec3,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInputState {
    pub keyboard: KeyboardState,
    /// `None` when no rig is connected.
    pub controllers: Option<TrackedControllerState>,
}

/// Output of one [`InputMapper::map`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MappedInput {
    pub snapshot: InputSnapshot,
    pub toggle_scheme: bool,
    pub fire: bool,
    pub device: InputDevice,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Buttons {
    toggle_scheme: bool,
    toggle_device: bool,
    fire: bool,
}

/// Holds the selected device and last frame's buttons for edge detection.
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    device: InputDevice,
    previous: Buttons,
}

impl InputMapper {
    pub fn new(device: InputDevice) -> Self {
        Self {
            device,
            previous: Buttons::default(),
        }
    }

    pub fn device(&self) -> InputDevice {
        self.device
    }

    pub fn map(&mut self, raw: &RawInputState) -> MappedInput {
        let held = self.held_buttons(raw);
        let pressed = |now: bool, before: bool| now && !before;

        if pressed(held.toggle_device, self.previous.toggle_device) {
            self.device = match self.device {
                InputDevice::Keyboard => InputDevice::TrackedControllers,
                InputDevice::TrackedControllers => InputDevice::Keyboard,
            };
            info!(device = ?self.device, "input device toggled");
        }
        let toggle_scheme = pressed(held.toggle_scheme, self.previous.toggle_scheme);
        let fire = pressed(held.fire, self.previous.fire);
        self.previous = held;

        let snapshot = match (self.device, raw.controllers.as_ref()) {
            (InputDevice::TrackedControllers, Some(rig)) => map_controllers(rig),
            // A missing rig reads as keyboard until one is connected.
            _ => map_keyboard(&raw.keyboard),
        };
        MappedInput {
            snapshot,
            toggle_scheme,
            fire,
            device: self.device,
        }
    }

    fn held_buttons(&self, raw: &RawInputState) -> Buttons {
        let keys = &raw.keyboard;
        let rig = match self.device {
            InputDevice::TrackedControllers => raw.controllers.as_ref(),
            InputDevice::Keyboard => None,
        };
        Buttons {
            toggle_scheme: keys.toggle_scheme || rig.is_some_and(|r| r.left.stick_click),
            toggle_device: keys.toggle_device,
            fire: keys.fire || rig.is_some_and(|r| r.right.index_trigger > INDEX_TRIGGER_THRESHOLD),
        }
    }
}

pub fn map_keyboard(keys: &KeyboardState) -> InputSnapshot {
    InputSnapshot {
        thrust_held: keys.thrust,
        boosting: keys.boost,
        manual_axes: ManualAxes {
            vertical: keys.vertical_alt,
            roll: keys.horizontal,
            pitch: keys.vertical,
            yaw: keys.horizontal_alt,
        },
        tracking: None,
    }
}

pub fn map_controllers(rig: &TrackedControllerState) -> InputSnapshot {
    let hand_trigger = 0.5 * (rig.left.hand_trigger + rig.right.hand_trigger);
    let index_trigger = 0.5 * (rig.left.index_trigger + rig.right.index_trigger);
    InputSnapshot {
        thrust_held: hand_trigger > THRUST_TRIGGER_THRESHOLD,
        boosting: index_trigger > INDEX_TRIGGER_THRESHOLD,
        manual_axes: ManualAxes {
            vertical: rig.right.stick.y,
            roll: rig.left.stick.x,
            pitch: rig.left.stick.y,
            yaw: rig.right.stick.x,
        },
        tracking: Some(TrackedPose {
            left: rig.left.position,
            right: rig.right.position,
            head: rig.head,
        }),
    }
}
