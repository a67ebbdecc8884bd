//! Building devices from declarative controller profiles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use glam::Vec2;
use virtual_input::prelude::*;
use virtual_input::profile::{DUALSHOCK_4, XBOX_360};

/// A scriptable stand-in for a platform joystick API.
#[derive(Default)]
struct MockPad {
    buttons: Mutex<HashMap<usize, bool>>,
    axes: Mutex<HashMap<usize, f32>>,
}

impl MockPad {
    fn set_button(&self, index: usize, pressed: bool) {
        self.buttons.lock().unwrap().insert(index, pressed);
    }

    fn set_axis(&self, index: usize, value: f32) {
        self.axes.lock().unwrap().insert(index, value);
    }
}

impl RawInputSource for MockPad {
    fn button(&self, index: usize) -> bool {
        self.buttons
            .lock()
            .unwrap()
            .get(&index)
            .copied()
            .unwrap_or(false)
    }

    fn axis(&self, index: usize) -> f32 {
        self.axes
            .lock()
            .unwrap()
            .get(&index)
            .copied()
            .unwrap_or(0.0)
    }
}

#[test]
fn bound_buttons_reach_the_raw_indices() {
    let pad = Arc::new(MockPad::default());
    let mut device = XBOX_360.build_device(Arc::<MockPad>::clone(&pad));

    pad.set_button(0, true);
    device.update(Instant::now());

    let ctx = TickContext::Update;
    assert_eq!(device.button_state(ControllerInput::A, ctx), ButtonState::Down);
    assert_eq!(device.button_state(ControllerInput::B, ctx), ButtonState::None);
}

#[test]
fn stick_axes_are_canonicalized_up_positive() {
    let pad = Arc::new(MockPad::default());
    let mut device = XBOX_360.build_device(Arc::<MockPad>::clone(&pad));

    // Raw vertical axes report down-positive; pushing the stick up reads
    // negative at the hardware and positive canonically.
    pad.set_axis(0, 0.5);
    pad.set_axis(1, -0.7);
    device.update(Instant::now());

    let ctx = TickContext::Update;
    assert_eq!(device.axle(ControllerInput::LeftStickX, ctx), 0.5);
    assert_eq!(device.axle(ControllerInput::LeftStickY, ctx), 0.7);
    assert_eq!(
        device.dual_axle(ControllerInput::LeftStick, ctx),
        Vec2::new(0.5, 0.7)
    );
}

#[test]
fn triggers_read_as_both_axle_and_button() {
    let pad = Arc::new(MockPad::default());
    let mut device = XBOX_360.build_device(Arc::<MockPad>::clone(&pad));

    pad.set_axis(5, 0.8);
    device.update(Instant::now());

    let ctx = TickContext::Update;
    assert_eq!(device.axle(ControllerInput::RightTrigger, ctx), 0.8);
    assert_eq!(
        device.button_state(ControllerInput::RightTrigger, ctx),
        ButtonState::Down
    );

    assert_eq!(device.axle(ControllerInput::LeftTrigger, ctx), 0.0);
    assert_eq!(
        device.button_state(ControllerInput::LeftTrigger, ctx),
        ButtonState::None
    );
}

#[test]
fn dpad_directions_read_the_hat_axes() {
    let pad = Arc::new(MockPad::default());
    let mut device = XBOX_360.build_device(Arc::<MockPad>::clone(&pad));

    pad.set_axis(6, -1.0);
    device.update(Instant::now());

    let ctx = TickContext::Update;
    assert_eq!(
        device.button_state(ControllerInput::DPadLeft, ctx),
        ButtonState::Down
    );
    assert_eq!(
        device.button_state(ControllerInput::DPadRight, ctx),
        ButtonState::None
    );
    assert_eq!(device.axle(ControllerInput::DPadX, ctx), -1.0);
}

#[test]
fn button_axle_bindings_difference_two_buttons() {
    let profile = GamepadProfile::new("Paddle")
        .with_button_axle(ControllerInput::DPadX, 4, 5);

    let pad = Arc::new(MockPad::default());
    let mut device = profile.build_device(Arc::<MockPad>::clone(&pad));
    let ctx = TickContext::Update;

    pad.set_button(5, true);
    device.update(Instant::now());
    assert_eq!(device.axle(ControllerInput::DPadX, ctx), 1.0);

    pad.set_button(4, true);
    device.update(Instant::now());
    assert_eq!(device.axle(ControllerInput::DPadX, ctx), 0.0);

    pad.set_button(5, false);
    device.update(Instant::now());
    assert_eq!(device.axle(ControllerInput::DPadX, ctx), -1.0);
}

#[test]
fn dualshock_face_buttons_translate_onto_the_canonical_layout() {
    let pad = Arc::new(MockPad::default());
    let mut device = DUALSHOCK_4.build_device(Arc::<MockPad>::clone(&pad));

    // Square sits at raw index 3 and answers as the canonical X button.
    pad.set_button(3, true);
    device.update(Instant::now());

    let ctx = TickContext::Update;
    assert_eq!(device.button_state(ControllerInput::X, ctx), ButtonState::Down);
    assert_eq!(device.button_state(ControllerInput::Y, ctx), ButtonState::None);
}

#[test]
fn registry_selection_then_binding_end_to_end() {
    let mut registry = ProfileRegistry::new();
    registry.register(XBOX_360.clone());
    registry.register(DUALSHOCK_4.clone());

    let profile = registry.find("Wireless Controller").unwrap();
    assert_eq!(profile.name(), "DualShock 4");

    let pad = Arc::new(MockPad::default());
    let mut device = profile.build_device(Arc::<MockPad>::clone(&pad));

    pad.set_button(0, true);
    device.update(Instant::now());
    assert_eq!(
        device.button_state(ControllerInput::A, TickContext::Update),
        ButtonState::Down
    );
}
