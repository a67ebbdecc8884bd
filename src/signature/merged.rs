//! Signatures that combine several same-shaped children into one logical
//! input.
//!
//! A merged signature owns its children outright, forwards every tick to all
//! of them first, and only then derives its own reading. The merged button
//! runs its own state machines over the OR of its children, so it has an
//! independent `Down`/`Held`/`Released` lifecycle rather than echoing any
//! single child.

use std::fmt;
use std::time::Instant;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::buttonlike::{ButtonMachine, ButtonState, ButtonValue};
use crate::cutoff::{cutoff_axis, cutoff_dual_axis, CutoffKind};
use crate::tick::{TickContext, TickState};
use crate::SignatureKind;

use super::{
    AxleSignature, ButtonSignature, DualAxleSignature, InputSignature, SignatureValue,
};

/// How a merged analog signature picks a winner among its children.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MergePolicy {
    /// Children are scanned in list order and every non-zero child
    /// overwrites the result, so the one registered last wins.
    #[default]
    FirstActive,
    /// The scan stops at the first non-zero child in list order.
    LastActive,
    /// Signed comparison against an accumulator that starts at zero. A child
    /// set that only deflects negative never displaces the zero floor.
    Largest,
    /// Signed comparison against an accumulator seeded from the first child.
    Smallest,
}

/// A button built from the logical OR of several child buttons.
pub struct MergedButtonSignature {
    id: String,
    precedence: f32,
    children: Vec<Box<dyn ButtonSignature>>,
    machines: TickState<ButtonMachine>,
}

impl MergedButtonSignature {
    /// Creates an empty merged button. With no children it never activates.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            precedence: 0.0,
            children: Vec::new(),
            machines: TickState::default(),
        }
    }

    /// Sets the precedence sort key.
    #[must_use]
    pub fn with_precedence(mut self, precedence: f32) -> Self {
        self.precedence = precedence;
        self
    }

    /// Adds a child, builder style.
    #[must_use]
    pub fn with_child(mut self, child: Box<dyn ButtonSignature>) -> Self {
        self.add_child(child);
        self
    }

    /// Adds a child. A child whose id is already present is dropped.
    pub fn add_child(&mut self, child: Box<dyn ButtonSignature>) {
        if self.children.iter().any(|c| c.id() == child.id()) {
            warn!(id = child.id(), merged = %self.id, "dropping duplicate merged child");
            return;
        }
        self.children.push(child);
    }

    /// The children, in registration order.
    pub fn children(&self) -> &[Box<dyn ButtonSignature>] {
        &self.children
    }
}

impl fmt::Debug for MergedButtonSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergedButtonSignature")
            .field("id", &self.id)
            .field("precedence", &self.precedence)
            .field("children", &self.children.len())
            .finish()
    }
}

impl InputSignature for MergedButtonSignature {
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
        for child in &mut self.children {
            child.update(now);
        }
        let active = self
            .children
            .iter()
            .any(|child| child.state(TickContext::Update).is_active());
        self.machines.get_mut(TickContext::Update).advance(active, now);
    }

    fn fixed_update(&mut self, now: Instant) {
        for child in &mut self.children {
            child.fixed_update(now);
        }
        let active = self
            .children
            .iter()
            .any(|child| child.state(TickContext::FixedUpdate).is_active());
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

impl ButtonSignature for MergedButtonSignature {
    fn state(&self, context: TickContext) -> ButtonState {
        self.machines.get(context).state()
    }
}

/// An axle combining several child axles under a [`MergePolicy`].
///
/// The merged value runs through the dead-zone normalizer exactly as a
/// primary axle signature would.
pub struct MergedAxleSignature {
    id: String,
    precedence: f32,
    policy: MergePolicy,
    deadzone: f32,
    cutoff: CutoffKind,
    children: Vec<Box<dyn AxleSignature>>,
}

impl MergedAxleSignature {
    /// Creates an empty merged axle. With no children it reads `0.0`.
    pub fn new(id: impl Into<String>, policy: MergePolicy) -> Self {
        Self {
            id: id.into(),
            precedence: 0.0,
            policy,
            deadzone: 0.0,
            cutoff: CutoffKind::None,
            children: Vec::new(),
        }
    }

    /// Sets the precedence sort key.
    #[must_use]
    pub fn with_precedence(mut self, precedence: f32) -> Self {
        self.precedence = precedence;
        self
    }

    /// Configures the dead-zone cutoff applied to the merged value.
    #[must_use]
    pub fn with_deadzone(mut self, deadzone: f32, cutoff: CutoffKind) -> Self {
        self.deadzone = deadzone;
        self.cutoff = cutoff;
        self
    }

    /// Adds a child, builder style.
    #[must_use]
    pub fn with_child(mut self, child: Box<dyn AxleSignature>) -> Self {
        self.add_child(child);
        self
    }

    /// Adds a child. A child whose id is already present is dropped.
    pub fn add_child(&mut self, child: Box<dyn AxleSignature>) {
        if self.children.iter().any(|c| c.id() == child.id()) {
            warn!(id = child.id(), merged = %self.id, "dropping duplicate merged child");
            return;
        }
        self.children.push(child);
    }

    /// The children, in registration order.
    pub fn children(&self) -> &[Box<dyn AxleSignature>] {
        &self.children
    }

    fn merged_raw(&self, context: TickContext) -> f32 {
        match self.policy {
            MergePolicy::FirstActive => {
                let mut result = 0.0;
                for child in &self.children {
                    let value = child.axle_value(context);
                    if value != 0.0 {
                        result = value;
                    }
                }
                result
            }
            MergePolicy::LastActive => {
                for child in &self.children {
                    let value = child.axle_value(context);
                    if value != 0.0 {
                        return value;
                    }
                }
                0.0
            }
            MergePolicy::Largest => {
                let mut result = 0.0;
                for child in &self.children {
                    let value = child.axle_value(context);
                    if value > result {
                        result = value;
                    }
                }
                result
            }
            MergePolicy::Smallest => {
                let mut children = self.children.iter();
                let Some(first) = children.next() else {
                    return 0.0;
                };
                let mut result = first.axle_value(context);
                for child in children {
                    let value = child.axle_value(context);
                    if value < result {
                        result = value;
                    }
                }
                result
            }
        }
    }
}

impl fmt::Debug for MergedAxleSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergedAxleSignature")
            .field("id", &self.id)
            .field("precedence", &self.precedence)
            .field("policy", &self.policy)
            .field("children", &self.children.len())
            .finish()
    }
}

impl InputSignature for MergedAxleSignature {
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

    fn update(&mut self, now: Instant) {
        for child in &mut self.children {
            child.update(now);
        }
    }

    fn fixed_update(&mut self, now: Instant) {
        for child in &mut self.children {
            child.fixed_update(now);
        }
    }

    fn value(&self, context: TickContext) -> SignatureValue {
        SignatureValue::Axle(self.axle_value(context))
    }
}

impl AxleSignature for MergedAxleSignature {
    fn axle_value(&self, context: TickContext) -> f32 {
        cutoff_axis(self.merged_raw(context), self.deadzone, self.cutoff)
    }
}

/// A dual axle combining several child sticks under a [`MergePolicy`].
///
/// Analog policies compare squared magnitudes. The merged vector runs
/// through the dual-axis normalizer exactly as a primary signature would.
pub struct MergedDualAxleSignature {
    id: String,
    precedence: f32,
    policy: MergePolicy,
    axle_deadzone: f32,
    axle_cutoff: CutoffKind,
    radial_deadzone: f32,
    radial_cutoff: CutoffKind,
    children: Vec<Box<dyn DualAxleSignature>>,
}

impl MergedDualAxleSignature {
    /// Creates an empty merged dual axle. With no children it reads zero.
    pub fn new(id: impl Into<String>, policy: MergePolicy) -> Self {
        Self {
            id: id.into(),
            precedence: 0.0,
            policy,
            axle_deadzone: 0.0,
            axle_cutoff: CutoffKind::None,
            radial_deadzone: 0.0,
            radial_cutoff: CutoffKind::None,
            children: Vec::new(),
        }
    }

    /// Sets the precedence sort key.
    #[must_use]
    pub fn with_precedence(mut self, precedence: f32) -> Self {
        self.precedence = precedence;
        self
    }

    /// Configures the per-axis dead-zone cutoff applied to the merged value.
    #[must_use]
    pub fn with_axle_deadzone(mut self, deadzone: f32, cutoff: CutoffKind) -> Self {
        self.axle_deadzone = deadzone;
        self.axle_cutoff = cutoff;
        self
    }

    /// Configures the radial dead-zone cutoff applied to the merged value.
    #[must_use]
    pub fn with_radial_deadzone(mut self, deadzone: f32, cutoff: CutoffKind) -> Self {
        self.radial_deadzone = deadzone;
        self.radial_cutoff = cutoff;
        self
    }

    /// Adds a child, builder style.
    #[must_use]
    pub fn with_child(mut self, child: Box<dyn DualAxleSignature>) -> Self {
        self.add_child(child);
        self
    }

    /// Adds a child. A child whose id is already present is dropped.
    pub fn add_child(&mut self, child: Box<dyn DualAxleSignature>) {
        if self.children.iter().any(|c| c.id() == child.id()) {
            warn!(id = child.id(), merged = %self.id, "dropping duplicate merged child");
            return;
        }
        self.children.push(child);
    }

    /// The children, in registration order.
    pub fn children(&self) -> &[Box<dyn DualAxleSignature>] {
        &self.children
    }

    fn merged_raw(&self, context: TickContext) -> Vec2 {
        match self.policy {
            MergePolicy::FirstActive => {
                let mut result = Vec2::ZERO;
                for child in &self.children {
                    let value = child.dual_axle_value(context);
                    if value != Vec2::ZERO {
                        result = value;
                    }
                }
                result
            }
            MergePolicy::LastActive => {
                for child in &self.children {
                    let value = child.dual_axle_value(context);
                    if value != Vec2::ZERO {
                        return value;
                    }
                }
                Vec2::ZERO
            }
            MergePolicy::Largest => {
                let mut result = Vec2::ZERO;
                for child in &self.children {
                    let value = child.dual_axle_value(context);
                    if value.length_squared() > result.length_squared() {
                        result = value;
                    }
                }
                result
            }
            MergePolicy::Smallest => {
                let mut children = self.children.iter();
                let Some(first) = children.next() else {
                    return Vec2::ZERO;
                };
                let mut result = first.dual_axle_value(context);
                for child in children {
                    let value = child.dual_axle_value(context);
                    if value.length_squared() < result.length_squared() {
                        result = value;
                    }
                }
                result
            }
        }
    }
}

impl fmt::Debug for MergedDualAxleSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergedDualAxleSignature")
            .field("id", &self.id)
            .field("precedence", &self.precedence)
            .field("policy", &self.policy)
            .field("children", &self.children.len())
            .finish()
    }
}

impl InputSignature for MergedDualAxleSignature {
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

    fn update(&mut self, now: Instant) {
        for child in &mut self.children {
            child.update(now);
        }
    }

    fn fixed_update(&mut self, now: Instant) {
        for child in &mut self.children {
            child.fixed_update(now);
        }
    }

    fn value(&self, context: TickContext) -> SignatureValue {
        SignatureValue::DualAxle(self.dual_axle_value(context))
    }
}

impl DualAxleSignature for MergedDualAxleSignature {
    fn dual_axle_value(&self, context: TickContext) -> Vec2 {
        cutoff_dual_axis(
            self.merged_raw(context),
            self.axle_deadzone,
            self.axle_cutoff,
            self.radial_deadzone,
            self.radial_cutoff,
        )
    }
}
