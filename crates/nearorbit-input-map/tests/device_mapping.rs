use bevy_math::{Vec2, Vec3};
use nearorbit_input_map::{
    HandController, InputDevice, InputMapper, KeyboardState, RawInputState,
    TrackedControllerState, map_controllers, map_keyboard,
};

fn rig() -> TrackedControllerState {
    TrackedControllerState {
        left: HandController {
            position: Vec3::new(-0.3, 1.0, 0.2),
            stick: Vec2::new(0.25, -0.5),
            ..Default::default()
        },
        right: HandController {
            position: Vec3::new(0.3, 1.1, 0.2),
            stick: Vec2::new(-1.0, 0.75),
            ..Default::default()
        },
        head: Vec3::new(0.0, 1.6, 0.0),
    }
}

#[test]
fn keyboard_axes_land_in_manual_slots() {
    let snapshot = map_keyboard(&KeyboardState {
        thrust: true,
        vertical_alt: 1.0,
        horizontal: -0.5,
        vertical: 0.25,
        horizontal_alt: -1.0,
        ..Default::default()
    });
    assert!(snapshot.thrust_held);
    assert!(!snapshot.boosting);
    assert_eq!(snapshot.manual_axes.vertical, 1.0);
    assert_eq!(snapshot.manual_axes.roll, -0.5);
    assert_eq!(snapshot.manual_axes.pitch, 0.25);
    assert_eq!(snapshot.manual_axes.yaw, -1.0);
    assert!(snapshot.tracking.is_none());
}

#[test]
fn controller_sticks_and_points_are_mapped() {
    let rig = rig();
    let snapshot = map_controllers(&rig);
    assert_eq!(snapshot.manual_axes.vertical, 0.75);
    assert_eq!(snapshot.manual_axes.roll, 0.25);
    assert_eq!(snapshot.manual_axes.pitch, -0.5);
    assert_eq!(snapshot.manual_axes.yaw, -1.0);
    let pose = snapshot.tracking.expect("tracking supplied in controller mode");
    assert_eq!(pose.left, rig.left.position);
    assert_eq!(pose.right, rig.right.position);
    assert_eq!(pose.head, rig.head);
}

#[test]
fn trigger_averages_drive_thrust_and_boost() {
    let mut rig = rig();
    rig.left.hand_trigger = 0.5;
    rig.right.hand_trigger = 0.0;
    // Average 0.25 stays under the thrust threshold.
    assert!(!map_controllers(&rig).thrust_held);
    rig.right.hand_trigger = 0.2;
    assert!(map_controllers(&rig).thrust_held);

    rig.left.index_trigger = 1.0;
    rig.right.index_trigger = 0.0;
    assert!(!map_controllers(&rig).boosting);
    rig.right.index_trigger = 0.2;
    assert!(map_controllers(&rig).boosting);
}

#[test]
fn events_fire_on_press_edges_only() {
    let mut mapper = InputMapper::default();
    let mut raw = RawInputState::default();
    raw.keyboard.toggle_scheme = true;
    raw.keyboard.fire = true;

    let first = mapper.map(&raw);
    assert!(first.toggle_scheme);
    assert!(first.fire);

    let held = mapper.map(&raw);
    assert!(!held.toggle_scheme);
    assert!(!held.fire);

    raw.keyboard.toggle_scheme = false;
    raw.keyboard.fire = false;
    mapper.map(&raw);
    raw.keyboard.fire = true;
    assert!(mapper.map(&raw).fire);
}

#[test]
fn device_toggle_switches_snapshot_source() {
    let mut mapper = InputMapper::new(InputDevice::Keyboard);
    let mut raw = RawInputState {
        keyboard: KeyboardState {
            horizontal: 1.0,
            ..Default::default()
        },
        controllers: Some(rig()),
    };
    let mapped = mapper.map(&raw);
    assert_eq!(mapped.device, InputDevice::Keyboard);
    assert!(mapped.snapshot.tracking.is_none());
    assert_eq!(mapped.snapshot.manual_axes.roll, 1.0);

    raw.keyboard.toggle_device = true;
    let mapped = mapper.map(&raw);
    assert_eq!(mapper.device(), InputDevice::TrackedControllers);
    assert!(mapped.snapshot.tracking.is_some());
    assert_eq!(mapped.snapshot.manual_axes.roll, 0.25);

    // Holding Q does not flip it back.
    mapper.map(&raw);
    assert_eq!(mapper.device(), InputDevice::TrackedControllers);
}

#[test]
fn controller_buttons_only_count_in_controller_mode() {
    let mut rig = rig();
    rig.left.stick_click = true;
    rig.right.index_trigger = 0.9;
    let raw = RawInputState {
        keyboard: KeyboardState::default(),
        controllers: Some(rig),
    };

    let mut keyboard_mode = InputMapper::new(InputDevice::Keyboard);
    let mapped = keyboard_mode.map(&raw);
    assert!(!mapped.toggle_scheme);
    assert!(!mapped.fire);

    let mut rig_mode = InputMapper::new(InputDevice::TrackedControllers);
    let mapped = rig_mode.map(&raw);
    assert!(mapped.toggle_scheme);
    assert!(mapped.fire);
}

#[test]
fn missing_rig_falls_back_to_keyboard() {
    let mut mapper = InputMapper::new(InputDevice::TrackedControllers);
    let raw = RawInputState {
        keyboard: KeyboardState {
            boost: true,
            ..Default::default()
        },
        controllers: None,
    };
    let mapped = mapper.map(&raw);
    assert!(mapped.snapshot.boosting);
    assert!(mapped.snapshot.tracking.is_none());
}
