//! Dialog runtime: escape sequencing, dialogs, the dialog stack, and the event loop host.

use std::sync::atomic::{AtomicU64, Ordering};

pub mod dialog;
pub mod host;
pub mod sequencer;
pub mod stack;

pub use dialog::{Dialog, DialogLayout, DialogTiming, DialogUpdate};
pub use host::{EventQueue, Host};
pub use sequencer::{Clock, EscapeSequencer, SequencerAction, SequencerState, SystemClock};
pub use stack::{DialogStack, Registered, StackError};

static NEXT_EVENT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique token for scheduled synthetic events, so a stale
/// timeout or tick can never be mistaken for a current one, even when it is
/// delivered to a different dialog than the one that scheduled it.
pub(crate) fn next_event_token() -> u64 {
    NEXT_EVENT_TOKEN.fetch_add(1, Ordering::Relaxed)
}
