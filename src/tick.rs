//! The two scheduling phases of a game loop and per-phase state storage.

use serde::{Deserialize, Serialize};

/// Which scheduling phase of the game loop is currently executing.
///
/// Ordinary per-frame updates and fixed-rate (physics) updates sample inputs
/// at different moments, so every stateful read in this crate takes the
/// context explicitly. There is no ambient "current phase" flag: the caller
/// always says which phase it is reading for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickContext {
    /// The ordinary once-per-frame phase.
    #[default]
    Update,
    /// The fixed-rate phase, typically driven at the physics step.
    FixedUpdate,
}

/// A pair of values, one per [`TickContext`].
///
/// Signatures keep raw samples and button machines in one of these so the
/// two phases never observe each other's transients.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TickState<T> {
    update: T,
    fixed: T,
}

impl<T> TickState<T> {
    /// Creates a pair from explicit per-phase values.
    pub fn new(update: T, fixed: T) -> Self {
        Self { update, fixed }
    }

    /// The value for the given phase.
    #[inline]
    pub fn get(&self, context: TickContext) -> &T {
        match context {
            TickContext::Update => &self.update,
            TickContext::FixedUpdate => &self.fixed,
        }
    }

    /// A mutable reference to the value for the given phase.
    #[inline]
    pub fn get_mut(&mut self, context: TickContext) -> &mut T {
        match context {
            TickContext::Update => &mut self.update,
            TickContext::FixedUpdate => &mut self.fixed,
        }
    }
}
