//! Declarative controller profiles.
//!
//! A profile maps the canonical Xbox-style layout onto one controller
//! model's raw hardware indices. Profiles are plain data: built once,
//! serializable, and applied by constructing delegated signatures over a
//! shared [`RawInputSource`]. Which profile to use for a given OS-reported
//! joystick name is decided by a [`ProfileRegistry`] owned by the
//! composition root; there is no process-wide registry.

use std::sync::Arc;

use glam::Vec2;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cutoff::CutoffKind;
use crate::device::MappedInputDevice;
use crate::signature::{
    AxleValueConsideration, DelegatedAxleButtonSignature, DelegatedAxleSignature,
    DelegatedButtonSignature, DelegatedDualAxleSignature, InputSignature,
};
use crate::SignatureKind;

/// The platform collaborator that reads raw hardware state.
///
/// Implementations wrap whatever joystick API the platform offers. Axis
/// values are expected roughly within `[-1.0, 1.0]` (sticks, hats) or
/// `[0.0, 1.0]` (triggers); anything out of range is clamped downstream by
/// the dead-zone normalizer. Out-of-range indices should answer `false`/`0.0`.
pub trait RawInputSource: Send + Sync {
    /// The current pressed state of the button at `index`.
    fn button(&self, index: usize) -> bool;

    /// The current value of the axis at `index`.
    fn axis(&self, index: usize) -> f32;
}

/// The canonical controller layout every profile binds against.
///
/// Modeled on an Xbox-style pad: face buttons, bumpers, menu buttons, stick
/// presses, a D-pad readable both as four buttons and as axes, two sticks,
/// and two analog triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerInput {
    /// The bottom face button.
    A,
    /// The right face button.
    B,
    /// The left face button.
    X,
    /// The top face button.
    Y,
    /// The left shoulder button.
    LeftBumper,
    /// The right shoulder button.
    RightBumper,
    /// The left menu button (Back/Share/View).
    Back,
    /// The right menu button (Start/Options/Menu).
    Start,
    /// The center system button.
    Guide,
    /// Clicking the left stick.
    LeftStickPress,
    /// Clicking the right stick.
    RightStickPress,
    /// D-pad up as a button.
    DPadUp,
    /// D-pad down as a button.
    DPadDown,
    /// D-pad left as a button.
    DPadLeft,
    /// D-pad right as a button.
    DPadRight,
    /// The left stick's horizontal axis.
    LeftStickX,
    /// The left stick's vertical axis, up-positive.
    LeftStickY,
    /// The right stick's horizontal axis.
    RightStickX,
    /// The right stick's vertical axis, up-positive.
    RightStickY,
    /// The left analog trigger.
    LeftTrigger,
    /// The right analog trigger.
    RightTrigger,
    /// The D-pad's horizontal axis.
    DPadX,
    /// The D-pad's vertical axis, up-positive.
    DPadY,
    /// The left stick as one vector.
    LeftStick,
    /// The right stick as one vector.
    RightStick,
    /// The D-pad as one vector.
    DPad,
}

impl ControllerInput {
    /// The stable string identity used for signatures built from this input.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            ControllerInput::A => "ButtonA",
            ControllerInput::B => "ButtonB",
            ControllerInput::X => "ButtonX",
            ControllerInput::Y => "ButtonY",
            ControllerInput::LeftBumper => "LeftBumper",
            ControllerInput::RightBumper => "RightBumper",
            ControllerInput::Back => "Back",
            ControllerInput::Start => "Start",
            ControllerInput::Guide => "Guide",
            ControllerInput::LeftStickPress => "LeftStickPress",
            ControllerInput::RightStickPress => "RightStickPress",
            ControllerInput::DPadUp => "DPadUp",
            ControllerInput::DPadDown => "DPadDown",
            ControllerInput::DPadLeft => "DPadLeft",
            ControllerInput::DPadRight => "DPadRight",
            ControllerInput::LeftStickX => "LeftStickX",
            ControllerInput::LeftStickY => "LeftStickY",
            ControllerInput::RightStickX => "RightStickX",
            ControllerInput::RightStickY => "RightStickY",
            ControllerInput::LeftTrigger => "LeftTrigger",
            ControllerInput::RightTrigger => "RightTrigger",
            ControllerInput::DPadX => "DPadX",
            ControllerInput::DPadY => "DPadY",
            ControllerInput::LeftStick => "LeftStick",
            ControllerInput::RightStick => "RightStick",
            ControllerInput::DPad => "DPad",
        }
    }

    /// The shape a binding for this input produces.
    #[must_use]
    pub fn kind(&self) -> SignatureKind {
        use ControllerInput::*;
        match self {
            A | B | X | Y | LeftBumper | RightBumper | Back | Start | Guide | LeftStickPress
            | RightStickPress | DPadUp | DPadDown | DPadLeft | DPadRight => SignatureKind::Button,
            LeftStickX | LeftStickY | RightStickX | RightStickY | LeftTrigger | RightTrigger
            | DPadX | DPadY => SignatureKind::Axle,
            LeftStick | RightStick | DPad => SignatureKind::DualAxle,
        }
    }
}

/// One entry of a profile's binding table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProfileBinding {
    /// A plain hardware button.
    Button {
        /// The raw button index.
        button: usize,
    },
    /// A hardware axis read as an analog value.
    Axle {
        /// The raw axis index.
        axis: usize,
        /// Flip the sign of every sample.
        invert: bool,
        /// The dead zone applied on read.
        deadzone: f32,
        /// How the dead zone is applied.
        cutoff: CutoffKind,
    },
    /// A hardware axis read as a button (and still readable as an analog
    /// value), e.g. a trigger or one D-pad direction of a hat axis.
    AxleButton {
        /// The raw axis index.
        axis: usize,
        /// Which deflection counts as pressed.
        consideration: AxleValueConsideration,
        /// The activation threshold.
        deadzone: f32,
    },
    /// An analog value synthesized from two buttons: `positive - negative`.
    ButtonAxle {
        /// The raw index of the button mapped to `-1.0`.
        negative: usize,
        /// The raw index of the button mapped to `1.0`.
        positive: usize,
    },
    /// Two hardware axes read as one stick vector.
    DualAxle {
        /// The raw index of the horizontal axis.
        x: usize,
        /// The raw index of the vertical axis.
        y: usize,
        /// Flip the horizontal samples.
        invert_x: bool,
        /// Flip the vertical samples.
        invert_y: bool,
    },
}

/// A declarative binding table for one controller model.
///
/// Several hardware name strings may map onto one profile (wired and
/// wireless variants of the same pad, for instance), so matching is
/// many-to-one over the alias list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamepadProfile {
    name: String,
    aliases: Vec<String>,
    bindings: Vec<(ControllerInput, ProfileBinding)>,
}

impl GamepadProfile {
    /// Creates an empty profile.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// The profile's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The hardware name strings this profile claims.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The binding table, in registration order.
    #[must_use]
    pub fn bindings(&self) -> &[(ControllerInput, ProfileBinding)] {
        &self.bindings
    }

    /// The binding registered for the given input, if any.
    #[must_use]
    pub fn binding(&self, input: ControllerInput) -> Option<&ProfileBinding> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == input)
            .map(|(_, binding)| binding)
    }

    /// Claims a hardware name string.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Binds a canonical input to a raw button index.
    #[must_use]
    pub fn with_button(self, input: ControllerInput, button: usize) -> Self {
        self.with_binding(input, ProfileBinding::Button { button })
    }

    /// Binds a canonical input to a raw axis, with no dead zone.
    #[must_use]
    pub fn with_axle(self, input: ControllerInput, axis: usize, invert: bool) -> Self {
        self.with_binding(
            input,
            ProfileBinding::Axle {
                axis,
                invert,
                deadzone: 0.0,
                cutoff: CutoffKind::None,
            },
        )
    }

    /// Binds a canonical input to a raw axis with an explicit dead zone.
    #[must_use]
    pub fn with_axle_deadzone(
        self,
        input: ControllerInput,
        axis: usize,
        invert: bool,
        deadzone: f32,
        cutoff: CutoffKind,
    ) -> Self {
        self.with_binding(
            input,
            ProfileBinding::Axle {
                axis,
                invert,
                deadzone,
                cutoff,
            },
        )
    }

    /// Binds a canonical input to a raw axis read as a button.
    #[must_use]
    pub fn with_axle_button(
        self,
        input: ControllerInput,
        axis: usize,
        consideration: AxleValueConsideration,
        deadzone: f32,
    ) -> Self {
        self.with_binding(
            input,
            ProfileBinding::AxleButton {
                axis,
                consideration,
                deadzone,
            },
        )
    }

    /// Binds a canonical input to an axis synthesized from two buttons.
    #[must_use]
    pub fn with_button_axle(
        self,
        input: ControllerInput,
        negative: usize,
        positive: usize,
    ) -> Self {
        self.with_binding(input, ProfileBinding::ButtonAxle { negative, positive })
    }

    /// Binds a canonical input to a pair of raw axes read as one vector.
    #[must_use]
    pub fn with_dual_axle(
        self,
        input: ControllerInput,
        x: usize,
        y: usize,
        invert_x: bool,
        invert_y: bool,
    ) -> Self {
        self.with_binding(
            input,
            ProfileBinding::DualAxle {
                x,
                y,
                invert_x,
                invert_y,
            },
        )
    }

    /// Registers a binding, replacing any earlier binding for the same input.
    #[must_use]
    pub fn with_binding(mut self, input: ControllerInput, binding: ProfileBinding) -> Self {
        self.bindings.retain(|(bound, _)| *bound != input);
        self.bindings.push((input, binding));
        self
    }

    /// Does this profile claim the given OS-reported joystick name?
    ///
    /// Comparison is case-insensitive over the alias list.
    #[must_use]
    pub fn matches(&self, device_name: &str) -> bool {
        self.aliases
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(device_name))
    }

    /// Applies the binding table: builds a mapped device whose signatures
    /// poll the given source at the bound indices.
    pub fn build_device(
        &self,
        source: Arc<dyn RawInputSource>,
    ) -> MappedInputDevice<ControllerInput> {
        let mut device = MappedInputDevice::new(self.name.clone());

        for (input, binding) in &self.bindings {
            let id = input.id();
            let signature: Box<dyn InputSignature> = match *binding {
                ProfileBinding::Button { button } => {
                    let source = Arc::clone(&source);
                    Box::new(DelegatedButtonSignature::new(
                        id,
                        Some(Box::new(move || source.button(button))),
                    ))
                }
                ProfileBinding::Axle {
                    axis,
                    invert,
                    deadzone,
                    cutoff,
                } => {
                    let source = Arc::clone(&source);
                    Box::new(
                        DelegatedAxleSignature::new(
                            id,
                            Some(Box::new(move || source.axis(axis))),
                        )
                        .with_invert(invert)
                        .with_deadzone(deadzone, cutoff),
                    )
                }
                ProfileBinding::AxleButton {
                    axis,
                    consideration,
                    deadzone,
                } => {
                    let source = Arc::clone(&source);
                    Box::new(
                        DelegatedAxleButtonSignature::new(
                            id,
                            Some(Box::new(move || source.axis(axis))),
                            consideration,
                        )
                        .with_axis_button_deadzone(deadzone),
                    )
                }
                ProfileBinding::ButtonAxle { negative, positive } => {
                    let source = Arc::clone(&source);
                    Box::new(DelegatedAxleSignature::new(
                        id,
                        Some(Box::new(move || {
                            f32::from(source.button(positive)) - f32::from(source.button(negative))
                        })),
                    ))
                }
                ProfileBinding::DualAxle {
                    x,
                    y,
                    invert_x,
                    invert_y,
                } => {
                    let source = Arc::clone(&source);
                    Box::new(
                        DelegatedDualAxleSignature::new(
                            id,
                            Some(Box::new(move || {
                                Vec2::new(source.axis(x), source.axis(y))
                            })),
                        )
                        .with_invert(invert_x, invert_y),
                    )
                }
            };

            if let Err(error) = device.register(*input, signature) {
                warn!(%error, profile = %self.name, "skipping duplicate profile binding");
            }
        }

        debug!(
            profile = %self.name,
            bindings = self.bindings.len(),
            "built mapped device from profile"
        );
        device
    }
}

/// An explicitly constructed profile lookup, owned by the composition root.
///
/// Registration order is significant: the first registered profile claiming
/// a name wins, so more specific profiles should be registered first.
#[derive(Debug, Default)]
pub struct ProfileRegistry {
    profiles: Vec<Arc<GamepadProfile>>,
}

impl ProfileRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of registered profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Is the registry empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Adds a profile to the lookup.
    pub fn register(&mut self, profile: impl Into<Arc<GamepadProfile>>) {
        self.profiles.push(profile.into());
    }

    /// Iterates registered profiles in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<GamepadProfile>> {
        self.profiles.iter()
    }

    /// Finds the first profile claiming the given OS-reported joystick name.
    #[must_use]
    pub fn find(&self, device_name: &str) -> Option<Arc<GamepadProfile>> {
        let found = self
            .profiles
            .iter()
            .find(|profile| profile.matches(device_name))
            .cloned();
        match &found {
            Some(profile) => {
                debug!(device = device_name, profile = %profile.name(), "matched controller profile");
            }
            None => {
                debug!(device = device_name, "no controller profile claims this device");
            }
        }
        found
    }
}

/// The Xbox 360 pad as exposed by the Linux `xpad` driver.
///
/// Button order: A, B, X, Y, LB, RB, Back, Start, Guide, stick presses.
/// Axis order: left stick (0, 1), left trigger (2), right stick (3, 4),
/// right trigger (5), D-pad hat (6, 7). Stick and hat Y axes report
/// down-positive and are inverted into the canonical up-positive layout;
/// the D-pad directions read the hat axes as buttons.
pub static XBOX_360: Lazy<GamepadProfile> = Lazy::new(|| {
    use AxleValueConsideration::{Negative, Positive};
    use ControllerInput::*;

    GamepadProfile::new("Xbox 360 Controller")
        .with_alias("Microsoft X-Box 360 pad")
        .with_alias("Microsoft Xbox 360 Controller")
        .with_alias("Xbox 360 Wireless Receiver")
        .with_alias("Xbox Gamepad (userspace driver)")
        .with_button(A, 0)
        .with_button(B, 1)
        .with_button(X, 2)
        .with_button(Y, 3)
        .with_button(LeftBumper, 4)
        .with_button(RightBumper, 5)
        .with_button(Back, 6)
        .with_button(Start, 7)
        .with_button(Guide, 8)
        .with_button(LeftStickPress, 9)
        .with_button(RightStickPress, 10)
        .with_axle(LeftStickX, 0, false)
        .with_axle(LeftStickY, 1, true)
        .with_axle(RightStickX, 3, false)
        .with_axle(RightStickY, 4, true)
        .with_axle_button(LeftTrigger, 2, Positive, 0.5)
        .with_axle_button(RightTrigger, 5, Positive, 0.5)
        .with_axle(DPadX, 6, false)
        .with_axle(DPadY, 7, true)
        .with_axle_button(DPadLeft, 6, Negative, 0.5)
        .with_axle_button(DPadRight, 6, Positive, 0.5)
        .with_axle_button(DPadUp, 7, Negative, 0.5)
        .with_axle_button(DPadDown, 7, Positive, 0.5)
        .with_dual_axle(LeftStick, 0, 1, false, true)
        .with_dual_axle(RightStick, 3, 4, false, true)
        .with_dual_axle(DPad, 6, 7, false, true)
});

/// The DualShock 4 as exposed by the Linux `hid-sony` driver, translated
/// onto the canonical Xbox-style layout (Cross -> A, Circle -> B,
/// Square -> X, Triangle -> Y, Share -> Back, Options -> Start).
pub static DUALSHOCK_4: Lazy<GamepadProfile> = Lazy::new(|| {
    use AxleValueConsideration::{Negative, Positive};
    use ControllerInput::*;

    GamepadProfile::new("DualShock 4")
        .with_alias("Sony Interactive Entertainment Wireless Controller")
        .with_alias("Sony Computer Entertainment Wireless Controller")
        .with_alias("Wireless Controller")
        .with_button(A, 0)
        .with_button(B, 1)
        .with_button(Y, 2)
        .with_button(X, 3)
        .with_button(LeftBumper, 4)
        .with_button(RightBumper, 5)
        .with_button(Back, 8)
        .with_button(Start, 9)
        .with_button(Guide, 10)
        .with_button(LeftStickPress, 11)
        .with_button(RightStickPress, 12)
        .with_axle(LeftStickX, 0, false)
        .with_axle(LeftStickY, 1, true)
        .with_axle(RightStickX, 3, false)
        .with_axle(RightStickY, 4, true)
        .with_axle_button(LeftTrigger, 2, Positive, 0.5)
        .with_axle_button(RightTrigger, 5, Positive, 0.5)
        .with_axle(DPadX, 6, false)
        .with_axle(DPadY, 7, true)
        .with_axle_button(DPadLeft, 6, Negative, 0.5)
        .with_axle_button(DPadRight, 6, Positive, 0.5)
        .with_axle_button(DPadUp, 7, Negative, 0.5)
        .with_axle_button(DPadDown, 7, Positive, 0.5)
        .with_dual_axle(LeftStick, 0, 1, false, true)
        .with_dual_axle(RightStick, 3, 4, false, true)
        .with_dual_axle(DPad, 6, 7, false, true)
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebinding_an_input_replaces_the_earlier_entry() {
        let profile = GamepadProfile::new("Test")
            .with_button(ControllerInput::A, 0)
            .with_button(ControllerInput::A, 5);

        assert_eq!(profile.bindings().len(), 1);
        assert_eq!(
            profile.binding(ControllerInput::A),
            Some(&ProfileBinding::Button { button: 5 })
        );
    }

    #[test]
    fn matching_is_case_insensitive_and_many_to_one() {
        assert!(XBOX_360.matches("Microsoft X-Box 360 pad"));
        assert!(XBOX_360.matches("microsoft x-box 360 PAD"));
        assert!(XBOX_360.matches("Xbox 360 Wireless Receiver"));
        assert!(!XBOX_360.matches("Steering Wheel"));
    }

    #[test]
    fn registration_order_breaks_ties() {
        // Both profiles claim the same name; the first registered wins.
        let generic = GamepadProfile::new("Generic").with_alias("Wireless Controller");

        let mut registry = ProfileRegistry::new();
        registry.register(DUALSHOCK_4.clone());
        registry.register(generic);

        let found = registry.find("Wireless Controller").unwrap();
        assert_eq!(found.name(), "DualShock 4");
    }

    #[test]
    fn unknown_names_match_nothing() {
        let mut registry = ProfileRegistry::new();
        registry.register(XBOX_360.clone());
        assert!(registry.find("Flight Yoke").is_none());
    }
}
