//! Signatures that wrap zero-argument sampling closures.
//!
//! These are the leaves of the signature tree: each one polls a delegate
//! (whatever reads the actual hardware) once per tick and normalizes the
//! sample. A missing delegate is treated as "always inactive", never an
//! error, so partially bound devices stay usable.

use std::fmt;
use std::time::Instant;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::buttonlike::{ButtonMachine, ButtonState, ButtonValue};
use crate::cutoff::{cutoff_axis, cutoff_dual_axis, CutoffKind};
use crate::tick::{TickContext, TickState};
use crate::SignatureKind;

use super::{
    AxisDelegate, AxleSignature, ButtonDelegate, ButtonSignature, CursorSignature,
    DualAxisDelegate, DualAxleSignature, InputSignature, SignatureValue,
    DEFAULT_AXLE_BUTTON_DEADZONE,
};

/// Which side of an analog reading counts as "pressed" when deriving a
/// button state from an axle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxleValueConsideration {
    /// Active while `value >= deadzone`.
    #[default]
    Positive,
    /// Active while `value <= -deadzone`.
    Negative,
    /// Evaluates with the same comparison as
    /// [`Positive`](AxleValueConsideration::Positive): negative deflections
    /// do not activate it.
    Absolute,
}

impl AxleValueConsideration {
    /// Applies this consideration to a raw analog sample.
    #[inline]
    #[must_use]
    pub fn is_active(&self, value: f32, deadzone: f32) -> bool {
        match self {
            AxleValueConsideration::Positive => value >= deadzone,
            AxleValueConsideration::Negative => value <= -deadzone,
            AxleValueConsideration::Absolute => value >= deadzone,
        }
    }
}

/// A button signature fed by a boolean sampling delegate.
///
/// The sample stream runs through two [`ButtonMachine`]s, one per tick
/// context, so ordinary and fixed-rate consumers each see their own
/// `Down`/`Held`/`Released` lifecycle.
pub struct DelegatedButtonSignature {
    id: String,
    precedence: f32,
    delegate: Option<ButtonDelegate>,
    machines: TickState<ButtonMachine>,
}

impl DelegatedButtonSignature {
    /// Creates a button signature over the given delegate.
    pub fn new(id: impl Into<String>, delegate: Option<ButtonDelegate>) -> Self {
        Self {
            id: id.into(),
            precedence: 0.0,
            delegate,
            machines: TickState::default(),
        }
    }

    /// Sets the precedence sort key.
    #[must_use]
    pub fn with_precedence(mut self, precedence: f32) -> Self {
        self.precedence = precedence;
        self
    }

    fn sample(&self) -> bool {
        self.delegate.as_ref().map(|poll| poll()).unwrap_or(false)
    }
}

impl fmt::Debug for DelegatedButtonSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedButtonSignature")
            .field("id", &self.id)
            .field("precedence", &self.precedence)
            .field("bound", &self.delegate.is_some())
            .finish()
    }
}

impl InputSignature for DelegatedButtonSignature {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> SignatureKind {
        SignatureKind::Button
    }

    fn precedence(&self) -> f32 {
        self.precedence
    }

    fn set_precedence(&mut self, precedence: f32) {
        self.precedence = precedence;
    }

    fn update(&mut self, now: Instant) {
        let active = self.sample();
        self.machines.get_mut(TickContext::Update).advance(active, now);
    }

    fn fixed_update(&mut self, now: Instant) {
        let active = self.sample();
        self.machines
            .get_mut(TickContext::FixedUpdate)
            .advance(active, now);
    }

    fn value(&self, context: TickContext) -> SignatureValue {
        SignatureValue::Button(ButtonValue::from_state(self.state(context)))
    }

    fn consume(&mut self, context: TickContext) {
        self.machines.get_mut(context).consume();
    }

    fn last_down(&self, context: TickContext) -> Option<Instant> {
        self.machines.get(context).last_down()
    }
}

impl ButtonSignature for DelegatedButtonSignature {
    fn state(&self, context: TickContext) -> ButtonState {
        self.machines.get(context).state()
    }
}

/// An axle signature fed by a float sampling delegate.
///
/// The raw sample is stored per tick context; inversion and dead-zone cutoff
/// are applied lazily on every read, never cached.
pub struct DelegatedAxleSignature {
    id: String,
    precedence: f32,
    delegate: Option<AxisDelegate>,
    invert: bool,
    deadzone: f32,
    cutoff: CutoffKind,
    raw: TickState<f32>,
}

impl DelegatedAxleSignature {
    /// Creates an axle signature over the given delegate, with no inversion
    /// and no dead zone.
    pub fn new(id: impl Into<String>, delegate: Option<AxisDelegate>) -> Self {
        Self {
            id: id.into(),
            precedence: 0.0,
            delegate,
            invert: false,
            deadzone: 0.0,
            cutoff: CutoffKind::None,
            raw: TickState::default(),
        }
    }

    /// Sets the precedence sort key.
    #[must_use]
    pub fn with_precedence(mut self, precedence: f32) -> Self {
        self.precedence = precedence;
        self
    }

    /// Flips the sign of every sample before the cutoff runs.
    #[must_use]
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Configures the dead-zone cutoff applied on read.
    #[must_use]
    pub fn with_deadzone(mut self, deadzone: f32, cutoff: CutoffKind) -> Self {
        self.deadzone = deadzone;
        self.cutoff = cutoff;
        self
    }

    fn sample(&self) -> f32 {
        self.delegate.as_ref().map(|poll| poll()).unwrap_or(0.0)
    }
}

impl fmt::Debug for DelegatedAxleSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedAxleSignature")
            .field("id", &self.id)
            .field("precedence", &self.precedence)
            .field("invert", &self.invert)
            .field("deadzone", &self.deadzone)
            .field("cutoff", &self.cutoff)
            .field("bound", &self.delegate.is_some())
            .finish()
    }
}

impl InputSignature for DelegatedAxleSignature {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> SignatureKind {
        SignatureKind::Axle
    }

    fn precedence(&self) -> f32 {
        self.precedence
    }

    fn set_precedence(&mut self, precedence: f32) {
        self.precedence = precedence;
    }

    fn update(&mut self, _now: Instant) {
        *self.raw.get_mut(TickContext::Update) = self.sample();
    }

    fn fixed_update(&mut self, _now: Instant) {
        *self.raw.get_mut(TickContext::FixedUpdate) = self.sample();
    }

    fn value(&self, context: TickContext) -> SignatureValue {
        SignatureValue::Axle(self.axle_value(context))
    }
}

impl AxleSignature for DelegatedAxleSignature {
    fn axle_value(&self, context: TickContext) -> f32 {
        let raw = *self.raw.get(context);
        let raw = if self.invert { -raw } else { raw };
        cutoff_axis(raw, self.deadzone, self.cutoff)
    }
}

/// An axle signature that is also readable as a button.
///
/// The analog semantics match [`DelegatedAxleSignature`]. In addition, every
/// tick the **raw** sample, before inversion and before cutoff, is compared
/// against `axis_button_deadzone` under an [`AxleValueConsideration`], and
/// the outcome drives a pair of button machines.
pub struct DelegatedAxleButtonSignature {
    id: String,
    precedence: f32,
    delegate: Option<AxisDelegate>,
    invert: bool,
    deadzone: f32,
    cutoff: CutoffKind,
    axis_button_deadzone: f32,
    consideration: AxleValueConsideration,
    raw: TickState<f32>,
    machines: TickState<ButtonMachine>,
}

impl DelegatedAxleButtonSignature {
    /// Creates an axle-button signature over the given delegate.
    pub fn new(
        id: impl Into<String>,
        delegate: Option<AxisDelegate>,
        consideration: AxleValueConsideration,
    ) -> Self {
        Self {
            id: id.into(),
            precedence: 0.0,
            delegate,
            invert: false,
            deadzone: 0.0,
            cutoff: CutoffKind::None,
            axis_button_deadzone: DEFAULT_AXLE_BUTTON_DEADZONE,
            consideration,
            raw: TickState::default(),
            machines: TickState::default(),
        }
    }

    /// Sets the precedence sort key.
    #[must_use]
    pub fn with_precedence(mut self, precedence: f32) -> Self {
        self.precedence = precedence;
        self
    }

    /// Flips the sign of every sample before the analog cutoff runs. The
    /// button derivation still sees the raw sample.
    #[must_use]
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Configures the dead-zone cutoff applied to analog reads.
    #[must_use]
    pub fn with_deadzone(mut self, deadzone: f32, cutoff: CutoffKind) -> Self {
        self.deadzone = deadzone;
        self.cutoff = cutoff;
        self
    }

    /// Sets the threshold the button derivation compares against.
    #[must_use]
    pub fn with_axis_button_deadzone(mut self, deadzone: f32) -> Self {
        self.axis_button_deadzone = deadzone;
        self
    }

    fn sample(&self) -> f32 {
        self.delegate.as_ref().map(|poll| poll()).unwrap_or(0.0)
    }
}

impl fmt::Debug for DelegatedAxleButtonSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedAxleButtonSignature")
            .field("id", &self.id)
            .field("precedence", &self.precedence)
            .field("consideration", &self.consideration)
            .field("axis_button_deadzone", &self.axis_button_deadzone)
            .field("bound", &self.delegate.is_some())
            .finish()
    }
}

impl InputSignature for DelegatedAxleButtonSignature {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> SignatureKind {
        SignatureKind::Button
    }

    fn precedence(&self) -> f32 {
        self.precedence
    }

    fn set_precedence(&mut self, precedence: f32) {
        self.precedence = precedence;
    }

    fn update(&mut self, now: Instant) {
        let sample = self.sample();
        *self.raw.get_mut(TickContext::Update) = sample;
        let active = self
            .consideration
            .is_active(sample, self.axis_button_deadzone);
        self.machines.get_mut(TickContext::Update).advance(active, now);
    }

    fn fixed_update(&mut self, now: Instant) {
        let sample = self.sample();
        *self.raw.get_mut(TickContext::FixedUpdate) = sample;
        let active = self
            .consideration
            .is_active(sample, self.axis_button_deadzone);
        self.machines
            .get_mut(TickContext::FixedUpdate)
            .advance(active, now);
    }

    fn value(&self, context: TickContext) -> SignatureValue {
        SignatureValue::Button(ButtonValue::new(
            self.state(context),
            self.axle_value(context),
        ))
    }

    fn consume(&mut self, context: TickContext) {
        self.machines.get_mut(context).consume();
    }

    fn last_down(&self, context: TickContext) -> Option<Instant> {
        self.machines.get(context).last_down()
    }
}

impl ButtonSignature for DelegatedAxleButtonSignature {
    fn state(&self, context: TickContext) -> ButtonState {
        self.machines.get(context).state()
    }
}

impl AxleSignature for DelegatedAxleButtonSignature {
    fn axle_value(&self, context: TickContext) -> f32 {
        let raw = *self.raw.get(context);
        let raw = if self.invert { -raw } else { raw };
        cutoff_axis(raw, self.deadzone, self.cutoff)
    }
}

/// A dual-axle signature fed by a vector sampling delegate.
pub struct DelegatedDualAxleSignature {
    id: String,
    precedence: f32,
    delegate: Option<DualAxisDelegate>,
    invert_x: bool,
    invert_y: bool,
    axle_deadzone: f32,
    axle_cutoff: CutoffKind,
    radial_deadzone: f32,
    radial_cutoff: CutoffKind,
    raw: TickState<Vec2>,
}

impl DelegatedDualAxleSignature {
    /// Creates a dual-axle signature over the given delegate, with no
    /// inversion and no dead zones.
    pub fn new(id: impl Into<String>, delegate: Option<DualAxisDelegate>) -> Self {
        Self {
            id: id.into(),
            precedence: 0.0,
            delegate,
            invert_x: false,
            invert_y: false,
            axle_deadzone: 0.0,
            axle_cutoff: CutoffKind::None,
            radial_deadzone: 0.0,
            radial_cutoff: CutoffKind::None,
            raw: TickState::default(),
        }
    }

    /// Sets the precedence sort key.
    #[must_use]
    pub fn with_precedence(mut self, precedence: f32) -> Self {
        self.precedence = precedence;
        self
    }

    /// Flips the sign of each component before the cutoff runs.
    #[must_use]
    pub fn with_invert(mut self, invert_x: bool, invert_y: bool) -> Self {
        self.invert_x = invert_x;
        self.invert_y = invert_y;
        self
    }

    /// Configures the per-axis dead-zone cutoff applied on read.
    #[must_use]
    pub fn with_axle_deadzone(mut self, deadzone: f32, cutoff: CutoffKind) -> Self {
        self.axle_deadzone = deadzone;
        self.axle_cutoff = cutoff;
        self
    }

    /// Configures the radial dead-zone cutoff applied on read.
    #[must_use]
    pub fn with_radial_deadzone(mut self, deadzone: f32, cutoff: CutoffKind) -> Self {
        self.radial_deadzone = deadzone;
        self.radial_cutoff = cutoff;
        self
    }

    fn sample(&self) -> Vec2 {
        self.delegate
            .as_ref()
            .map(|poll| poll())
            .unwrap_or(Vec2::ZERO)
    }

    fn inverted(&self, raw: Vec2) -> Vec2 {
        Vec2::new(
            if self.invert_x { -raw.x } else { raw.x },
            if self.invert_y { -raw.y } else { raw.y },
        )
    }
}

impl fmt::Debug for DelegatedDualAxleSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedDualAxleSignature")
            .field("id", &self.id)
            .field("precedence", &self.precedence)
            .field("invert_x", &self.invert_x)
            .field("invert_y", &self.invert_y)
            .field("bound", &self.delegate.is_some())
            .finish()
    }
}

impl InputSignature for DelegatedDualAxleSignature {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> SignatureKind {
        SignatureKind::DualAxle
    }

    fn precedence(&self) -> f32 {
        self.precedence
    }

    fn set_precedence(&mut self, precedence: f32) {
        self.precedence = precedence;
    }

    fn update(&mut self, _now: Instant) {
        *self.raw.get_mut(TickContext::Update) = self.sample();
    }

    fn fixed_update(&mut self, _now: Instant) {
        *self.raw.get_mut(TickContext::FixedUpdate) = self.sample();
    }

    fn value(&self, context: TickContext) -> SignatureValue {
        SignatureValue::DualAxle(self.dual_axle_value(context))
    }
}

impl DualAxleSignature for DelegatedDualAxleSignature {
    fn dual_axle_value(&self, context: TickContext) -> Vec2 {
        let raw = self.inverted(*self.raw.get(context));
        cutoff_dual_axis(
            raw,
            self.axle_deadzone,
            self.axle_cutoff,
            self.radial_deadzone,
            self.radial_cutoff,
        )
    }
}

/// A dual-axle signature that is also readable as a button.
///
/// The button derivation compares the raw vector's squared magnitude against
/// the squared `axis_button_deadzone`, avoiding a square root per tick.
pub struct DelegatedDualAxleButtonSignature {
    id: String,
    precedence: f32,
    delegate: Option<DualAxisDelegate>,
    invert_x: bool,
    invert_y: bool,
    axle_deadzone: f32,
    axle_cutoff: CutoffKind,
    radial_deadzone: f32,
    radial_cutoff: CutoffKind,
    axis_button_deadzone: f32,
    raw: TickState<Vec2>,
    machines: TickState<ButtonMachine>,
}

impl DelegatedDualAxleButtonSignature {
    /// Creates a dual-axle-button signature over the given delegate.
    pub fn new(id: impl Into<String>, delegate: Option<DualAxisDelegate>) -> Self {
        Self {
            id: id.into(),
            precedence: 0.0,
            delegate,
            invert_x: false,
            invert_y: false,
            axle_deadzone: 0.0,
            axle_cutoff: CutoffKind::None,
            radial_deadzone: 0.0,
            radial_cutoff: CutoffKind::None,
            axis_button_deadzone: DEFAULT_AXLE_BUTTON_DEADZONE,
            raw: TickState::default(),
            machines: TickState::default(),
        }
    }

    /// Sets the precedence sort key.
    #[must_use]
    pub fn with_precedence(mut self, precedence: f32) -> Self {
        self.precedence = precedence;
        self
    }

    /// Flips the sign of each component before the cutoff runs.
    #[must_use]
    pub fn with_invert(mut self, invert_x: bool, invert_y: bool) -> Self {
        self.invert_x = invert_x;
        self.invert_y = invert_y;
        self
    }

    /// Configures the per-axis dead-zone cutoff applied on read.
    #[must_use]
    pub fn with_axle_deadzone(mut self, deadzone: f32, cutoff: CutoffKind) -> Self {
        self.axle_deadzone = deadzone;
        self.axle_cutoff = cutoff;
        self
    }

    /// Configures the radial dead-zone cutoff applied on read.
    #[must_use]
    pub fn with_radial_deadzone(mut self, deadzone: f32, cutoff: CutoffKind) -> Self {
        self.radial_deadzone = deadzone;
        self.radial_cutoff = cutoff;
        self
    }

    /// Sets the magnitude threshold the button derivation compares against.
    #[must_use]
    pub fn with_axis_button_deadzone(mut self, deadzone: f32) -> Self {
        self.axis_button_deadzone = deadzone;
        self
    }

    fn sample(&self) -> Vec2 {
        self.delegate
            .as_ref()
            .map(|poll| poll())
            .unwrap_or(Vec2::ZERO)
    }

    fn is_sample_active(&self, sample: Vec2) -> bool {
        sample.length_squared() >= self.axis_button_deadzone * self.axis_button_deadzone
    }

    fn inverted(&self, raw: Vec2) -> Vec2 {
        Vec2::new(
            if self.invert_x { -raw.x } else { raw.x },
            if self.invert_y { -raw.y } else { raw.y },
        )
    }
}

impl fmt::Debug for DelegatedDualAxleButtonSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedDualAxleButtonSignature")
            .field("id", &self.id)
            .field("precedence", &self.precedence)
            .field("axis_button_deadzone", &self.axis_button_deadzone)
            .field("bound", &self.delegate.is_some())
            .finish()
    }
}

impl InputSignature for DelegatedDualAxleButtonSignature {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> SignatureKind {
        SignatureKind::Button
    }

    fn precedence(&self) -> f32 {
        self.precedence
    }

    fn set_precedence(&mut self, precedence: f32) {
        self.precedence = precedence;
    }

    fn update(&mut self, now: Instant) {
        let sample = self.sample();
        *self.raw.get_mut(TickContext::Update) = sample;
        let active = self.is_sample_active(sample);
        self.machines.get_mut(TickContext::Update).advance(active, now);
    }

    fn fixed_update(&mut self, now: Instant) {
        let sample = self.sample();
        *self.raw.get_mut(TickContext::FixedUpdate) = sample;
        let active = self.is_sample_active(sample);
        self.machines
            .get_mut(TickContext::FixedUpdate)
            .advance(active, now);
    }

    fn value(&self, context: TickContext) -> SignatureValue {
        SignatureValue::Button(ButtonValue::new(
            self.state(context),
            self.dual_axle_value(context).length(),
        ))
    }

    fn consume(&mut self, context: TickContext) {
        self.machines.get_mut(context).consume();
    }

    fn last_down(&self, context: TickContext) -> Option<Instant> {
        self.machines.get(context).last_down()
    }
}

impl ButtonSignature for DelegatedDualAxleButtonSignature {
    fn state(&self, context: TickContext) -> ButtonState {
        self.machines.get(context).state()
    }
}

impl DualAxleSignature for DelegatedDualAxleButtonSignature {
    fn dual_axle_value(&self, context: TickContext) -> Vec2 {
        let raw = self.inverted(*self.raw.get(context));
        cutoff_dual_axis(
            raw,
            self.axle_deadzone,
            self.axle_cutoff,
            self.radial_deadzone,
            self.radial_cutoff,
        )
    }
}

/// A cursor signature fed by a position sampling delegate.
///
/// Positions pass through untouched; no normalization or dead zone applies.
pub struct DelegatedCursorSignature {
    id: String,
    precedence: f32,
    delegate: Option<DualAxisDelegate>,
    raw: TickState<Vec2>,
}

impl DelegatedCursorSignature {
    /// Creates a cursor signature over the given delegate.
    pub fn new(id: impl Into<String>, delegate: Option<DualAxisDelegate>) -> Self {
        Self {
            id: id.into(),
            precedence: 0.0,
            delegate,
            raw: TickState::default(),
        }
    }

    /// Sets the precedence sort key.
    #[must_use]
    pub fn with_precedence(mut self, precedence: f32) -> Self {
        self.precedence = precedence;
        self
    }

    fn sample(&self) -> Vec2 {
        self.delegate
            .as_ref()
            .map(|poll| poll())
            .unwrap_or(Vec2::ZERO)
    }
}

impl fmt::Debug for DelegatedCursorSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedCursorSignature")
            .field("id", &self.id)
            .field("precedence", &self.precedence)
            .field("bound", &self.delegate.is_some())
            .finish()
    }
}

impl InputSignature for DelegatedCursorSignature {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> SignatureKind {
        SignatureKind::Cursor
    }

    fn precedence(&self) -> f32 {
        self.precedence
    }

    fn set_precedence(&mut self, precedence: f32) {
        self.precedence = precedence;
    }

    fn update(&mut self, _now: Instant) {
        *self.raw.get_mut(TickContext::Update) = self.sample();
    }

    fn fixed_update(&mut self, _now: Instant) {
        *self.raw.get_mut(TickContext::FixedUpdate) = self.sample();
    }

    fn value(&self, context: TickContext) -> SignatureValue {
        SignatureValue::Cursor(self.cursor_position(context))
    }
}

impl CursorSignature for DelegatedCursorSignature {
    fn cursor_position(&self, context: TickContext) -> Vec2 {
        *self.raw.get(context)
    }
}
