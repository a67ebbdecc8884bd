#![forbid(missing_docs)]
#![forbid(unsafe_code)]
#![warn(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

pub mod buttonlike;
pub mod collection;
pub mod cutoff;
pub mod device;
pub mod errors;
pub mod profile;
pub mod signature;
pub mod tick;

/// Everything you need to get started
pub mod prelude {
    pub use crate::buttonlike::{ButtonMachine, ButtonState, ButtonValue};
    pub use crate::collection::{MappedSignatureCollection, SignatureCollection};
    pub use crate::cutoff::{cutoff_axis, cutoff_dual_axis, CutoffKind};
    pub use crate::device::{GenericInputDevice, MappedInputDevice};
    pub use crate::profile::{
        ControllerInput, GamepadProfile, ProfileBinding, ProfileRegistry, RawInputSource,
    };
    pub use crate::signature::{
        AxleSignature, AxleValueConsideration, ButtonSignature, CursorSignature,
        DelegatedAxleButtonSignature, DelegatedAxleSignature, DelegatedButtonSignature,
        DelegatedCursorSignature, DelegatedDualAxleButtonSignature, DelegatedDualAxleSignature,
        DualAxleSignature, InputSignature, MergePolicy, MergedAxleSignature,
        MergedButtonSignature, MergedDualAxleSignature, RepeatingButtonSignature, SignatureValue,
    };
    pub use crate::tick::{TickContext, TickState};
    pub use crate::SignatureKind;
}

use serde::{Deserialize, Serialize};

/// Classifies the shape of a signature's output.
///
/// - [`SignatureKind::Button`]: a digital input with an on/off state,
///   classified per tick as a [`ButtonState`](crate::buttonlike::ButtonState).
/// - [`SignatureKind::Axle`]: a single analog channel with a continuous value
///   normalized to `[-1.0, 1.0]`. Non-zero values are considered active.
/// - [`SignatureKind::DualAxle`]: two analog channels read as one vector
///   (e.g. a thumbstick), normalized to the unit disc.
/// - [`SignatureKind::Cursor`]: a raw 2D position (e.g. a pointer), reported
///   in whatever units the sampling delegate produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureKind {
    /// A digital on/off input.
    Button,
    /// A single analog channel.
    Axle,
    /// A pair of analog channels treated as one vector.
    DualAxle,
    /// An unnormalized 2D position.
    Cursor,
}
