//! Devices: typed query surfaces over a signature registry.
//!
//! A device owns exactly one collection and answers shape-typed reads that
//! never fail. A missing id, a shape mismatch, or a soft-disabled device all
//! degrade to the neutral value for the requested shape
//! ([`ButtonState::None`], `0.0`, [`Vec2::ZERO`]); shape mismatches go
//! through a small, fully defined coercion table instead of erroring.

use std::fmt;
use std::hash::Hash;
use std::time::{Duration, Instant};

use glam::Vec2;

use crate::buttonlike::ButtonState;
use crate::collection::{MappedSignatureCollection, SignatureCollection};
use crate::errors::DuplicateSignatureId;
use crate::signature::{InputSignature, SignatureValue, DEFAULT_AXLE_BUTTON_DEADZONE};
use crate::tick::TickContext;

fn coerce_button_state(value: SignatureValue, axle_button_deadzone: f32) -> ButtonState {
    match value {
        SignatureValue::Button(button) => button.state,
        SignatureValue::Axle(value) => {
            if value.abs() > axle_button_deadzone {
                ButtonState::Held
            } else {
                ButtonState::None
            }
        }
        SignatureValue::DualAxle(value) => {
            if value.length_squared() > axle_button_deadzone * axle_button_deadzone {
                ButtonState::Held
            } else {
                ButtonState::None
            }
        }
        SignatureValue::Cursor(_) => ButtonState::None,
    }
}

fn coerce_axle(value: SignatureValue) -> f32 {
    match value {
        SignatureValue::Axle(value) => value,
        SignatureValue::Button(button) => button.value,
        SignatureValue::DualAxle(value) => value.x,
        SignatureValue::Cursor(_) => 0.0,
    }
}

fn coerce_dual_axle(value: SignatureValue) -> Vec2 {
    match value {
        SignatureValue::DualAxle(value) => value,
        SignatureValue::Axle(value) => Vec2::new(value, 0.0),
        SignatureValue::Button(button) => Vec2::new(button.value, 0.0),
        SignatureValue::Cursor(_) => Vec2::ZERO,
    }
}

fn coerce_cursor(value: SignatureValue) -> Vec2 {
    match value {
        SignatureValue::Cursor(position) => position,
        SignatureValue::DualAxle(value) => value,
        SignatureValue::Button(_) | SignatureValue::Axle(_) => Vec2::ZERO,
    }
}

/// A device whose signatures are addressed by their own string ids.
pub struct GenericInputDevice {
    id: String,
    active: bool,
    axle_button_deadzone: f32,
    signatures: SignatureCollection,
}

impl GenericInputDevice {
    /// Creates an empty, active device.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            active: true,
            axle_button_deadzone: DEFAULT_AXLE_BUTTON_DEADZONE,
            signatures: SignatureCollection::new(),
        }
    }

    /// The device's name.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Is the device answering reads?
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Soft-enables or soft-disables the device. While disabled every read
    /// answers its neutral value; the underlying signatures are untouched
    /// and keep ticking.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Sets the threshold used when a button is read from an analog
    /// signature.
    pub fn set_axle_button_deadzone(&mut self, deadzone: f32) {
        self.axle_button_deadzone = deadzone.max(0.0);
    }

    /// The owned signature collection.
    #[must_use]
    pub fn signatures(&self) -> &SignatureCollection {
        &self.signatures
    }

    /// Mutable access to the owned signature collection. Mutate only outside
    /// the tick.
    pub fn signatures_mut(&mut self) -> &mut SignatureCollection {
        &mut self.signatures
    }

    /// Registers a signature on this device.
    pub fn register(
        &mut self,
        signature: Box<dyn InputSignature>,
    ) -> Result<(), DuplicateSignatureId> {
        self.signatures.add(signature)
    }

    /// Advances the ordinary per-frame state of every signature.
    pub fn update(&mut self, now: Instant) {
        self.signatures.update_all(now);
    }

    /// Advances the fixed-rate state of every signature.
    pub fn fixed_update(&mut self, now: Instant) {
        self.signatures.fixed_update_all(now);
    }

    /// The button classification for this id, coerced across shapes when
    /// the registered signature is analog.
    #[must_use]
    pub fn button_state(&self, id: &str, context: TickContext) -> ButtonState {
        if !self.active {
            return ButtonState::None;
        }
        match self.signatures.get(id) {
            Some(signature) => {
                coerce_button_state(signature.value(context), self.axle_button_deadzone)
            }
            None => ButtonState::None,
        }
    }

    /// The normalized analog value for this id.
    #[must_use]
    pub fn axle(&self, id: &str, context: TickContext) -> f32 {
        if !self.active {
            return 0.0;
        }
        match self.signatures.get(id) {
            Some(signature) => coerce_axle(signature.value(context)),
            None => 0.0,
        }
    }

    /// The normalized stick vector for this id.
    #[must_use]
    pub fn dual_axle(&self, id: &str, context: TickContext) -> Vec2 {
        if !self.active {
            return Vec2::ZERO;
        }
        match self.signatures.get(id) {
            Some(signature) => coerce_dual_axle(signature.value(context)),
            None => Vec2::ZERO,
        }
    }

    /// The cursor position for this id.
    #[must_use]
    pub fn cursor(&self, id: &str, context: TickContext) -> Vec2 {
        if !self.active {
            return Vec2::ZERO;
        }
        match self.signatures.get(id) {
            Some(signature) => coerce_cursor(signature.value(context)),
            None => Vec2::ZERO,
        }
    }

    /// Was this input pressed within the trailing `window` ending at `now`?
    #[must_use]
    pub fn down_within(
        &self,
        id: &str,
        context: TickContext,
        window: Duration,
        now: Instant,
    ) -> bool {
        if !self.active {
            return false;
        }
        match self.signatures.get(id).and_then(|sig| sig.last_down(context)) {
            Some(last_down) => now.saturating_duration_since(last_down) <= window,
            None => false,
        }
    }

    /// Collapses this tick's transient button state for the given id so no
    /// later consumer observes it again.
    pub fn consume(&mut self, id: &str, context: TickContext) {
        if !self.active {
            return;
        }
        if let Some(signature) = self.signatures.get_mut(id) {
            signature.consume(context);
        }
    }
}

impl fmt::Debug for GenericInputDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericInputDevice")
            .field("id", &self.id)
            .field("active", &self.active)
            .field("signatures", &self.signatures)
            .finish()
    }
}

/// A device whose signatures are addressed by a typed key, usually an enum
/// of the game's logical inputs.
pub struct MappedInputDevice<K> {
    id: String,
    active: bool,
    axle_button_deadzone: f32,
    signatures: MappedSignatureCollection<K>,
}

impl<K: Copy + Eq + Hash + fmt::Debug> MappedInputDevice<K> {
    /// Creates an empty, active device.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            active: true,
            axle_button_deadzone: DEFAULT_AXLE_BUTTON_DEADZONE,
            signatures: MappedSignatureCollection::new(),
        }
    }

    /// The device's name.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Is the device answering reads?
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Soft-enables or soft-disables the device. While disabled every read
    /// answers its neutral value; the underlying signatures are untouched.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Sets the threshold used when a button is read from an analog
    /// signature.
    pub fn set_axle_button_deadzone(&mut self, deadzone: f32) {
        self.axle_button_deadzone = deadzone.max(0.0);
    }

    /// The owned signature collection.
    #[must_use]
    pub fn signatures(&self) -> &MappedSignatureCollection<K> {
        &self.signatures
    }

    /// Mutable access to the owned signature collection. Mutate only outside
    /// the tick.
    pub fn signatures_mut(&mut self) -> &mut MappedSignatureCollection<K> {
        &mut self.signatures
    }

    /// Registers a signature under the given key.
    pub fn register(
        &mut self,
        key: K,
        signature: Box<dyn InputSignature>,
    ) -> Result<(), DuplicateSignatureId> {
        self.signatures.add(key, signature)
    }

    /// Advances the ordinary per-frame state of every signature.
    pub fn update(&mut self, now: Instant) {
        self.signatures.update_all(now);
    }

    /// Advances the fixed-rate state of every signature.
    pub fn fixed_update(&mut self, now: Instant) {
        self.signatures.fixed_update_all(now);
    }

    /// The button classification for this key, coerced across shapes when
    /// the registered signature is analog.
    #[must_use]
    pub fn button_state(&self, key: K, context: TickContext) -> ButtonState {
        if !self.active {
            return ButtonState::None;
        }
        match self.signatures.get(key) {
            Some(signature) => {
                coerce_button_state(signature.value(context), self.axle_button_deadzone)
            }
            None => ButtonState::None,
        }
    }

    /// The normalized analog value for this key.
    #[must_use]
    pub fn axle(&self, key: K, context: TickContext) -> f32 {
        if !self.active {
            return 0.0;
        }
        match self.signatures.get(key) {
            Some(signature) => coerce_axle(signature.value(context)),
            None => 0.0,
        }
    }

    /// The normalized stick vector for this key.
    #[must_use]
    pub fn dual_axle(&self, key: K, context: TickContext) -> Vec2 {
        if !self.active {
            return Vec2::ZERO;
        }
        match self.signatures.get(key) {
            Some(signature) => coerce_dual_axle(signature.value(context)),
            None => Vec2::ZERO,
        }
    }

    /// The cursor position for this key.
    #[must_use]
    pub fn cursor(&self, key: K, context: TickContext) -> Vec2 {
        if !self.active {
            return Vec2::ZERO;
        }
        match self.signatures.get(key) {
            Some(signature) => coerce_cursor(signature.value(context)),
            None => Vec2::ZERO,
        }
    }

    /// Was this input pressed within the trailing `window` ending at `now`?
    #[must_use]
    pub fn down_within(
        &self,
        key: K,
        context: TickContext,
        window: Duration,
        now: Instant,
    ) -> bool {
        if !self.active {
            return false;
        }
        match self
            .signatures
            .get(key)
            .and_then(|sig| sig.last_down(context))
        {
            Some(last_down) => now.saturating_duration_since(last_down) <= window,
            None => false,
        }
    }

    /// Collapses this tick's transient button state for the given key.
    pub fn consume(&mut self, key: K, context: TickContext) {
        if !self.active {
            return;
        }
        if let Some(signature) = self.signatures.get_mut(key) {
            signature.consume(context);
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for MappedInputDevice<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedInputDevice")
            .field("id", &self.id)
            .field("active", &self.active)
            .field("signatures", &self.signatures)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buttonlike::ButtonValue;

    #[test]
    fn button_coercion_table() {
        let dz = DEFAULT_AXLE_BUTTON_DEADZONE;

        assert_eq!(
            coerce_button_state(
                SignatureValue::Button(ButtonValue::from_state(ButtonState::Down)),
                dz
            ),
            ButtonState::Down
        );
        assert_eq!(
            coerce_button_state(SignatureValue::Axle(0.9), dz),
            ButtonState::Held
        );
        assert_eq!(
            coerce_button_state(SignatureValue::Axle(-0.9), dz),
            ButtonState::Held
        );
        assert_eq!(
            coerce_button_state(SignatureValue::Axle(0.3), dz),
            ButtonState::None
        );
        assert_eq!(
            coerce_button_state(SignatureValue::DualAxle(Vec2::new(0.6, 0.6)), dz),
            ButtonState::Held
        );
        assert_eq!(
            coerce_button_state(SignatureValue::Cursor(Vec2::new(100.0, 100.0)), dz),
            ButtonState::None
        );
    }

    #[test]
    fn axle_coercion_table() {
        assert_eq!(coerce_axle(SignatureValue::Axle(-0.25)), -0.25);
        assert_eq!(
            coerce_axle(SignatureValue::Button(ButtonValue::from_state(
                ButtonState::Held
            ))),
            1.0
        );
        assert_eq!(
            coerce_axle(SignatureValue::Button(ButtonValue::from_state(
                ButtonState::None
            ))),
            0.0
        );
        // A button derived from an analog input keeps its press amount.
        assert_eq!(
            coerce_axle(SignatureValue::Button(ButtonValue::new(
                ButtonState::Down,
                0.8
            ))),
            0.8
        );
        assert_eq!(
            coerce_axle(SignatureValue::DualAxle(Vec2::new(0.7, -0.2))),
            0.7
        );
        assert_eq!(coerce_axle(SignatureValue::Cursor(Vec2::new(5.0, 5.0))), 0.0);
    }

    #[test]
    fn dual_axle_coercion_table() {
        assert_eq!(
            coerce_dual_axle(SignatureValue::DualAxle(Vec2::new(0.1, 0.2))),
            Vec2::new(0.1, 0.2)
        );
        assert_eq!(
            coerce_dual_axle(SignatureValue::Axle(0.4)),
            Vec2::new(0.4, 0.0)
        );
        assert_eq!(
            coerce_dual_axle(SignatureValue::Button(ButtonValue::from_state(
                ButtonState::Down
            ))),
            Vec2::new(1.0, 0.0)
        );
        assert_eq!(
            coerce_dual_axle(SignatureValue::Cursor(Vec2::new(5.0, 5.0))),
            Vec2::ZERO
        );
    }

    #[test]
    fn cursor_coercion_table() {
        assert_eq!(
            coerce_cursor(SignatureValue::Cursor(Vec2::new(640.0, 360.0))),
            Vec2::new(640.0, 360.0)
        );
        assert_eq!(
            coerce_cursor(SignatureValue::DualAxle(Vec2::new(0.5, 0.5))),
            Vec2::new(0.5, 0.5)
        );
        assert_eq!(coerce_cursor(SignatureValue::Axle(0.5)), Vec2::ZERO);
    }
}
