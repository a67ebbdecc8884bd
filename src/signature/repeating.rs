//! Key-repeat synthesis for held buttons.

use std::fmt;
use std::time::{Duration, Instant};

use crate::buttonlike::{ButtonMachine, ButtonState, ButtonValue};
use crate::tick::{TickContext, TickState};
use crate::SignatureKind;

use super::{ButtonDelegate, ButtonSignature, InputSignature, SignatureValue};

fn lerp_duration(from: Duration, to: Duration, t: f32) -> Duration {
    let t = t.clamp(0.0, 1.0);
    let secs = from.as_secs_f32() + (to.as_secs_f32() - from.as_secs_f32()) * t;
    Duration::from_secs_f32(secs.max(0.0))
}

/// A button signature that emits extra [`ButtonState::Down`] pulses while
/// held, like key repeat in a text field.
///
/// After a real press, the first synthetic pulse fires once
/// `first_repeat_delay` elapses; later pulses fire every `repeat_delay`.
/// When a lerp target is configured, the interval eases toward `max_repeat`
/// on every pulse, accelerating (or decelerating) the repeat rate the longer
/// the button stays held.
///
/// Repeats are only synthesized in the [`TickContext::Update`] context; the
/// fixed-rate machine classifies the raw stream without repeating. Fixed-rate
/// consumers that want repeats should read the ordinary context instead.
pub struct RepeatingButtonSignature {
    id: String,
    precedence: f32,
    delegate: Option<ButtonDelegate>,
    first_repeat_delay: Duration,
    repeat_delay: Duration,
    repeat_lerp: f32,
    max_repeat: Option<Duration>,
    current_delay: Duration,
    last_signal: Option<Instant>,
    repeat_count: u32,
    machines: TickState<ButtonMachine>,
}

impl RepeatingButtonSignature {
    /// Creates a repeating button over the given delegate and schedule.
    pub fn new(
        id: impl Into<String>,
        delegate: Option<ButtonDelegate>,
        first_repeat_delay: Duration,
        repeat_delay: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            precedence: 0.0,
            delegate,
            first_repeat_delay,
            repeat_delay,
            repeat_lerp: 0.0,
            max_repeat: None,
            current_delay: first_repeat_delay,
            last_signal: None,
            repeat_count: 0,
            machines: TickState::default(),
        }
    }

    /// Sets the precedence sort key.
    #[must_use]
    pub fn with_precedence(mut self, precedence: f32) -> Self {
        self.precedence = precedence;
        self
    }

    /// Eases the repeat interval toward `max_repeat` by `lerp` on every
    /// synthetic pulse.
    #[must_use]
    pub fn with_repeat_lerp(mut self, max_repeat: Duration, lerp: f32) -> Self {
        self.max_repeat = Some(max_repeat);
        self.repeat_lerp = lerp;
        self
    }

    fn sample(&self) -> bool {
        self.delegate.as_ref().map(|poll| poll()).unwrap_or(false)
    }
}

impl fmt::Debug for RepeatingButtonSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepeatingButtonSignature")
            .field("id", &self.id)
            .field("precedence", &self.precedence)
            .field("first_repeat_delay", &self.first_repeat_delay)
            .field("repeat_delay", &self.repeat_delay)
            .field("bound", &self.delegate.is_some())
            .finish()
    }
}

impl InputSignature for RepeatingButtonSignature {
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
        let machine = self.machines.get_mut(TickContext::Update);
        machine.advance(active, now);

        match machine.state() {
            ButtonState::Down => {
                self.last_signal = Some(now);
                self.current_delay = self.first_repeat_delay;
                self.repeat_count = 0;
            }
            ButtonState::Held => {
                let last_signal = self.last_signal.get_or_insert(now);
                if now.saturating_duration_since(*last_signal) >= self.current_delay {
                    machine.pulse(now);
                    self.last_signal = Some(now);
                    self.repeat_count += 1;
                    if self.repeat_count == 1 {
                        self.current_delay = self.repeat_delay;
                    }
                    if let Some(max_repeat) = self.max_repeat {
                        self.current_delay =
                            lerp_duration(self.current_delay, max_repeat, self.repeat_lerp);
                    }
                }
            }
            ButtonState::Released | ButtonState::None => {
                self.last_signal = None;
            }
        }
    }

    fn fixed_update(&mut self, now: Instant) {
        // No repeat synthesis here; the fixed-rate machine only classifies.
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

impl ButtonSignature for RepeatingButtonSignature {
    fn state(&self, context: TickContext) -> ButtonState {
        self.machines.get(context).state()
    }
}
