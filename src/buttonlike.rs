//! Tools for classifying boolean sample streams into per-tick button states.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// The per-tick classification of a button-like input.
///
/// A fresh boolean sample is folded into the previous state once per tick,
/// so the transient states ([`Down`](ButtonState::Down) and
/// [`Released`](ButtonState::Released)) are each observable for exactly one
/// tick unless collapsed early by [`ButtonMachine::consume`].
///
/// Transitions only ever follow
/// `None/Released -> Down -> Held -> Released -> None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ButtonState {
    /// The button is up and was up on the previous tick.
    #[default]
    None,
    /// The button went down since the previous tick.
    Down,
    /// The button is down and was down on the previous tick.
    Held,
    /// The button went up since the previous tick.
    Released,
}

impl ButtonState {
    /// Computes the state that follows `self` given a fresh boolean sample.
    ///
    /// This is the complete transition table; it has no side effects and is
    /// the single source of truth for button classification.
    ///
    /// ```rust
    /// use virtual_input::buttonlike::ButtonState;
    ///
    /// let mut state = ButtonState::None;
    /// let mut observed = Vec::new();
    /// for sample in [false, true, true, false] {
    ///     state = state.next(sample);
    ///     observed.push(state);
    /// }
    /// assert_eq!(
    ///     observed,
    ///     [
    ///         ButtonState::None,
    ///         ButtonState::Down,
    ///         ButtonState::Held,
    ///         ButtonState::Released,
    ///     ]
    /// );
    /// ```
    #[inline]
    #[must_use]
    pub fn next(self, active: bool) -> ButtonState {
        use ButtonState::*;
        match (self, active) {
            (None | Released, true) => Down,
            (Down | Held, true) => Held,
            (Down | Held, false) => Released,
            (None | Released, false) => None,
        }
    }

    /// Is the button currently down, in either the [`Down`](ButtonState::Down)
    /// or [`Held`](ButtonState::Held) state?
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, ButtonState::Down | ButtonState::Held)
    }

    /// Did the button go down since the previous tick?
    #[inline]
    #[must_use]
    pub fn just_pressed(&self) -> bool {
        *self == ButtonState::Down
    }

    /// Did the button go up since the previous tick?
    #[inline]
    #[must_use]
    pub fn just_released(&self) -> bool {
        *self == ButtonState::Released
    }
}

/// A button classification together with how far the button is pressed.
///
/// Plain on/off buttons report `0.0` or `1.0`; buttons derived from analog
/// inputs (triggers, stick deflections) report the normalized analog
/// reading, so "how hard is this pressed" survives a button-shaped read.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ButtonValue {
    /// The per-tick classification.
    pub state: ButtonState,
    /// How far the button is pressed. `0.0` when fully released.
    pub value: f32,
}

impl ButtonValue {
    /// Creates a reading with an explicit analog press amount.
    #[inline]
    #[must_use]
    pub fn new(state: ButtonState, value: f32) -> Self {
        Self { state, value }
    }

    /// Creates a reading for a plain on/off button: the value is `1.0`
    /// while active and `0.0` otherwise.
    #[inline]
    #[must_use]
    pub fn from_state(state: ButtonState) -> Self {
        Self::new(state, f32::from(state.is_active()))
    }
}

/// A button state machine driven by one sample per tick.
///
/// Button-capable signatures run two of these, one per
/// [`TickContext`](crate::tick::TickContext), because the ordinary and
/// fixed-rate phases of a game loop sample at different moments and must not
/// observe each other's transients.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ButtonMachine {
    state: ButtonState,
    last_down: Option<Instant>,
}

impl ButtonMachine {
    /// Folds a fresh sample into the machine.
    ///
    /// Call exactly once per tick. `now` is recorded as the press timestamp
    /// whenever this advance produces a [`ButtonState::Down`] transition.
    pub fn advance(&mut self, active: bool, now: Instant) {
        let next = self.state.next(active);
        if next == ButtonState::Down && self.state != ButtonState::Down {
            self.last_down = Some(now);
        }
        self.state = next;
    }

    /// Collapses the transient states early: [`ButtonState::Down`] becomes
    /// [`ButtonState::Held`] and [`ButtonState::Released`] becomes
    /// [`ButtonState::None`].
    ///
    /// A consumer that reacts to a press calls this so no other consumer can
    /// observe the same press within the same tick.
    pub fn consume(&mut self) {
        self.state = match self.state {
            ButtonState::Down => ButtonState::Held,
            ButtonState::Released => ButtonState::None,
            other => other,
        };
    }

    /// The current classification.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// When the most recent `-> Down` transition happened, if ever.
    #[inline]
    #[must_use]
    pub fn last_down(&self) -> Option<Instant> {
        self.last_down
    }

    /// Was the button pressed within the trailing `window` ending at `now`?
    ///
    /// A pure time-delta comparison; nothing is scheduled or mutated.
    #[must_use]
    pub fn down_within(&self, window: Duration, now: Instant) -> bool {
        match self.last_down {
            Some(last_down) => now.saturating_duration_since(last_down) <= window,
            None => false,
        }
    }

    /// Forces a synthetic [`ButtonState::Down`] pulse, refreshing the press
    /// timestamp. Used by key-repeat synthesis.
    pub(crate) fn pulse(&mut self, now: Instant) {
        self.state = ButtonState::Down;
        self.last_down = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_is_total() {
        use ButtonState::*;
        assert_eq!(None.next(true), Down);
        assert_eq!(Down.next(true), Held);
        assert_eq!(Held.next(true), Held);
        assert_eq!(Released.next(true), Down);
        assert_eq!(None.next(false), None);
        assert_eq!(Down.next(false), Released);
        assert_eq!(Held.next(false), Released);
        assert_eq!(Released.next(false), None);
    }

    #[test]
    fn sample_sequence_classifies_as_expected() {
        let now = Instant::now();
        let mut machine = ButtonMachine::default();
        let mut observed = Vec::new();
        for sample in [false, true, true, false] {
            machine.advance(sample, now);
            observed.push(machine.state());
        }
        assert_eq!(
            observed,
            [
                ButtonState::None,
                ButtonState::Down,
                ButtonState::Held,
                ButtonState::Released,
            ]
        );
    }

    #[test]
    fn consume_collapses_transients() {
        let now = Instant::now();
        let mut machine = ButtonMachine::default();

        machine.advance(true, now);
        assert_eq!(machine.state(), ButtonState::Down);
        machine.consume();
        assert_eq!(machine.state(), ButtonState::Held);

        machine.advance(false, now);
        assert_eq!(machine.state(), ButtonState::Released);
        machine.consume();
        assert_eq!(machine.state(), ButtonState::None);

        // Consuming a settled state is a no-op.
        machine.advance(true, now);
        machine.advance(true, now);
        assert_eq!(machine.state(), ButtonState::Held);
        machine.consume();
        assert_eq!(machine.state(), ButtonState::Held);
    }

    #[test]
    fn last_down_records_the_press_instant() {
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_millis(100);
        let t2 = t1 + Duration::from_millis(100);

        let mut machine = ButtonMachine::default();
        assert_eq!(machine.last_down(), Option::None);

        machine.advance(true, t0);
        assert_eq!(machine.last_down(), Some(t0));

        // Holding does not refresh the timestamp.
        machine.advance(true, t1);
        assert_eq!(machine.last_down(), Some(t0));

        // A fresh press does.
        machine.advance(false, t1);
        machine.advance(true, t2);
        assert_eq!(machine.last_down(), Some(t2));
    }

    #[test]
    fn down_within_is_a_pure_window_query() {
        let t0 = Instant::now();
        let mut machine = ButtonMachine::default();
        machine.advance(true, t0);

        let window = Duration::from_millis(150);
        assert!(machine.down_within(window, t0));
        assert!(machine.down_within(window, t0 + Duration::from_millis(150)));
        assert!(!machine.down_within(window, t0 + Duration::from_millis(151)));
    }
}
