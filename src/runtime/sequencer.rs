//! Escape-key sequencing: double-tap close and `Esc` + digit actions.
//!
//! States:
//! - `Idle`: a first Escape either closes (single-Escape policy) or arms.
//! - `Armed`: waiting for a disambiguating key until the deadline passes.
//!
//! An `alt+<key>` chord is Escape and the key arriving in one input chunk.
//! It closes under the single-Escape policy and while armed; otherwise an
//! `alt+<digit>` resolves like Escape followed by the digit.
//!
//! The armed state carries both a monotonic deadline, checked against the
//! clock on every event, and a token echoed by the scheduled
//! `EscapeTimeout` event. A timeout whose token does not match the current
//! arming is stale and ignored.

use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::core::command::Command;
use crate::core::input_event::InputEvent;
use crate::runtime::next_event_token;

pub const DEFAULT_ESCAPE_TIMEOUT: Duration = Duration::from_millis(300);

const THEME_DIGIT: u8 = 2;
const CLOSE_DIGIT: u8 = 0;

/// Source of monotonic time.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

pub type SharedClock = Rc<dyn Clock>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    Armed { token: u64, deadline: Instant },
}

/// What the dialog should do with an event after sequencing.
#[derive(Debug)]
pub enum SequencerAction {
    /// Not handled here; forward to the content.
    PassThrough,
    /// Handled; `Command` may schedule the timeout.
    Consumed(Command),
    Close,
    RequestTheme,
}

pub struct EscapeSequencer {
    state: SequencerState,
    close_on_single_esc: bool,
    timeout: Duration,
    clock: SharedClock,
}

impl EscapeSequencer {
    pub fn new(close_on_single_esc: bool, timeout: Duration, clock: SharedClock) -> Self {
        Self {
            state: SequencerState::Idle,
            close_on_single_esc,
            timeout,
            clock,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, SequencerState::Armed { .. })
    }

    pub fn close_on_single_esc(&self) -> bool {
        self.close_on_single_esc
    }

    pub fn set_close_on_single_esc(&mut self, value: bool) {
        self.close_on_single_esc = value;
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn set_clock(&mut self, clock: SharedClock) {
        self.clock = clock;
    }

    pub fn reset(&mut self) {
        self.state = SequencerState::Idle;
    }

    /// Runs one event through the state machine.
    ///
    /// `theme_capable` tells whether `Esc` + `2` has a handler; without one the
    /// digit disarms like any other unmatched key.
    pub fn process(&mut self, event: &InputEvent, theme_capable: bool) -> SequencerAction {
        if let InputEvent::EscapeTimeout { token } = event {
            if matches!(self.state, SequencerState::Armed { token: armed, .. } if armed == *token) {
                tracing::debug!(token, "escape sequence timed out");
                self.state = SequencerState::Idle;
            }
            return SequencerAction::Consumed(Command::None);
        }

        self.expire_if_due();

        match self.state {
            SequencerState::Idle => {
                if let Some(key) = event.alt_chord() {
                    if self.close_on_single_esc {
                        return SequencerAction::Close;
                    }
                    return match chord_digit(key) {
                        Some(digit) => resolve_digit(digit, theme_capable),
                        None => SequencerAction::PassThrough,
                    };
                }
                if !event.is_escape() {
                    return SequencerAction::PassThrough;
                }
                if self.close_on_single_esc {
                    return SequencerAction::Close;
                }
                SequencerAction::Consumed(self.arm())
            }
            SequencerState::Armed { .. } => {
                if event.is_escape() || event.alt_chord().is_some() {
                    self.state = SequencerState::Idle;
                    return SequencerAction::Close;
                }
                // Pointer motion between the two keys must not break the sequence.
                if !event.is_keystroke() {
                    return SequencerAction::PassThrough;
                }

                self.state = SequencerState::Idle;
                match event.digit() {
                    Some(digit) => resolve_digit(digit, theme_capable),
                    None => SequencerAction::PassThrough,
                }
            }
        }
    }

    fn arm(&mut self) -> Command {
        let token = next_event_token();
        self.state = SequencerState::Armed {
            token,
            deadline: self.clock.now() + self.timeout,
        };
        tracing::debug!(token, timeout_ms = self.timeout.as_millis() as u64, "escape armed");
        Command::schedule(self.timeout, InputEvent::EscapeTimeout { token })
    }

    fn expire_if_due(&mut self) {
        if let SequencerState::Armed { deadline, token } = self.state {
            if self.clock.now() >= deadline {
                tracing::debug!(token, "escape deadline passed");
                self.state = SequencerState::Idle;
            }
        }
    }
}

fn resolve_digit(digit: u8, theme_capable: bool) -> SequencerAction {
    match digit {
        CLOSE_DIGIT => SequencerAction::Close,
        THEME_DIGIT if theme_capable => SequencerAction::RequestTheme,
        _ => {
            tracing::debug!(digit, "unbound escape digit");
            SequencerAction::Consumed(Command::None)
        }
    }
}

fn chord_digit(key: &str) -> Option<u8> {
    InputEvent::key(key).digit()
}
