//! Helpful abstractions over logical input channels of all sorts.
//!
//! A *signature* is one logical input channel (a button, a single analog
//! axle, a dual-axle stick, or a cursor) with a stable string identity and a
//! precedence used for sort order. Signatures are the unit everything else in
//! this crate composes: collections register them by id, devices answer typed
//! queries against them, and profiles build them from raw hardware bindings.
//!
//! The foundation is the [`InputSignature`] trait. Its
//! [`value`](InputSignature::value) method reports the current reading as a
//! [`SignatureValue`] sum type, so consumers dispatch over shapes with an
//! exhaustive `match` rather than downcasting.
//!
//! Shape-specific behavior lives in the capability traits layered on top:
//! [`ButtonSignature`], [`AxleSignature`], [`DualAxleSignature`], and
//! [`CursorSignature`].
//!
//! ## Built-in signatures
//!
//! - The `Delegated*` family wraps zero-argument sampling closures, whatever
//!   polls the actual hardware, and normalizes the samples.
//! - [`RepeatingButtonSignature`] synthesizes key-repeat pulses while held.
//! - The `Merged*` family combines several same-shaped signatures into one
//!   logical input.

use std::time::{Duration, Instant};

use glam::Vec2;

use crate::buttonlike::{ButtonState, ButtonValue};
use crate::tick::TickContext;
use crate::SignatureKind;

pub use self::delegated::{
    AxleValueConsideration, DelegatedAxleButtonSignature, DelegatedAxleSignature,
    DelegatedButtonSignature, DelegatedCursorSignature, DelegatedDualAxleButtonSignature,
    DelegatedDualAxleSignature,
};
pub use self::merged::{
    MergePolicy, MergedAxleSignature, MergedButtonSignature, MergedDualAxleSignature,
};
pub use self::repeating::RepeatingButtonSignature;

pub mod delegated;
pub mod merged;
pub mod repeating;

/// A zero-argument boolean sampling closure, typically a hardware poll.
pub type ButtonDelegate = Box<dyn Fn() -> bool + Send + Sync>;

/// A zero-argument float sampling closure, typically a hardware axis poll.
pub type AxisDelegate = Box<dyn Fn() -> f32 + Send + Sync>;

/// A zero-argument vector sampling closure, typically a stick or pointer poll.
pub type DualAxisDelegate = Box<dyn Fn() -> Vec2 + Send + Sync>;

/// The dead zone used when deriving a button state from an analog reading,
/// unless the caller configures one explicitly.
pub const DEFAULT_AXLE_BUTTON_DEADZONE: f32 = 0.5;

/// The current reading of a signature, tagged by shape.
///
/// Consumers match on this exhaustively; there is no way to hold a reading
/// of unknown shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignatureValue {
    /// The reading of a button-shaped signature, including how far the
    /// button is pressed when it derives from an analog input.
    Button(ButtonValue),
    /// The reading of a single-axle signature, within `[-1.0, 1.0]`.
    Axle(f32),
    /// The reading of a dual-axle signature, within the unit disc.
    DualAxle(Vec2),
    /// The reading of a cursor signature, in delegate-defined units.
    Cursor(Vec2),
}

impl SignatureValue {
    /// The shape of this reading.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> SignatureKind {
        match self {
            SignatureValue::Button(_) => SignatureKind::Button,
            SignatureValue::Axle(_) => SignatureKind::Axle,
            SignatureValue::DualAxle(_) => SignatureKind::DualAxle,
            SignatureValue::Cursor(_) => SignatureKind::Cursor,
        }
    }
}

/// One logical input channel with a stable identity.
///
/// A signature is owned exclusively by the collection or device that
/// registers it; the id-uniqueness check at registration enforces that no
/// signature participates in two collections at once.
///
/// `update` and `fixed_update` are each expected to run exactly once per
/// tick of their phase, driven by the owning device. Both complete
/// synchronously: one delegate invocation plus pure computation.
pub trait InputSignature: Send + Sync {
    /// The stable identity of this signature.
    fn id(&self) -> &str;

    /// The shape of this signature's reading.
    fn kind(&self) -> SignatureKind;

    /// The sort key used when a collection orders its signatures.
    fn precedence(&self) -> f32;

    /// Reassigns the sort key. Takes effect the next time the owning
    /// collection is sorted.
    fn set_precedence(&mut self, precedence: f32);

    /// Advances the ordinary per-frame state from a fresh sample.
    fn update(&mut self, now: Instant);

    /// Advances the fixed-rate state from a fresh sample.
    fn fixed_update(&mut self, now: Instant);

    /// The current reading for the given tick context.
    fn value(&self, context: TickContext) -> SignatureValue;

    /// Collapses this tick's transient button state, if this signature has
    /// one. The default does nothing; button-capable signatures override it.
    fn consume(&mut self, _context: TickContext) {}

    /// When this signature last transitioned to [`ButtonState::Down`], if it
    /// tracks presses at all. The default reports `None`.
    fn last_down(&self, _context: TickContext) -> Option<Instant> {
        None
    }
}

/// A signature that classifies a boolean stream through the button machine.
pub trait ButtonSignature: InputSignature {
    /// The current button classification for the given tick context.
    fn state(&self, context: TickContext) -> ButtonState;

    /// Was this button pressed within the trailing `window` ending at `now`?
    #[must_use]
    fn down_within(&self, context: TickContext, window: Duration, now: Instant) -> bool {
        match self.last_down(context) {
            Some(last_down) => now.saturating_duration_since(last_down) <= window,
            None => false,
        }
    }
}

/// A signature producing a single normalized analog value.
pub trait AxleSignature: InputSignature {
    /// The current normalized value, within `[-1.0, 1.0]`.
    fn axle_value(&self, context: TickContext) -> f32;
}

/// A signature producing a normalized 2D analog vector.
pub trait DualAxleSignature: InputSignature {
    /// The current normalized vector, within the unit disc.
    fn dual_axle_value(&self, context: TickContext) -> Vec2;
}

/// A signature reporting an unnormalized 2D position.
pub trait CursorSignature: InputSignature {
    /// The current position, in whatever units the delegate produces.
    fn cursor_position(&self, context: TickContext) -> Vec2;
}
