//! Single-threaded driver: one event stream, commands applied between events.
//!
//! Terminal input and scheduled synthetic events share the same queue, so a
//! dialog never observes two events at once. Time is passed in explicitly,
//! which keeps the loop deterministic under test.

use std::any::Any;
use std::collections::VecDeque;
use std::time::Instant;

use crate::core::command::Command;
use crate::core::input_event::{parse_input_events, InputEvent};
use crate::runtime::dialog::Dialog;
use crate::runtime::stack::{DialogStack, Registered};

struct Timer {
    due: Instant,
    event: InputEvent,
}

/// Ready events in arrival order plus timers ordered by deadline.
#[derive(Default)]
pub struct EventQueue {
    ready: VecDeque<InputEvent>,
    timers: Vec<Timer>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.ready.push_back(event);
    }

    /// Timers with equal deadlines fire in the order they were scheduled.
    pub fn schedule(&mut self, due: Instant, event: InputEvent) {
        let idx = self.timers.partition_point(|timer| timer.due <= due);
        self.timers.insert(idx, Timer { due, event });
    }

    /// Moves every timer due at `now` to the back of the ready queue.
    pub fn promote_due(&mut self, now: Instant) -> usize {
        let due = self.timers.partition_point(|timer| timer.due <= now);
        for timer in self.timers.drain(..due) {
            self.ready.push_back(timer.event);
        }
        due
    }

    pub fn pop(&mut self) -> Option<InputEvent> {
        self.ready.pop_front()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.first().map(|timer| timer.due)
    }

    pub fn ready_len(&self) -> usize {
        self.ready.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ready.is_empty() && self.timers.is_empty()
    }
}

pub struct Host {
    stack: DialogStack,
    queue: EventQueue,
    emitted: Vec<Box<dyn Any>>,
}

impl Host {
    pub fn new(stack: DialogStack) -> Self {
        Self {
            stack,
            queue: EventQueue::new(),
            emitted: Vec::new(),
        }
    }

    pub fn stack(&self) -> &DialogStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut DialogStack {
        &mut self.stack
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    /// Registers a dialog, opening it at once if it replaces a shown one.
    pub fn register(&mut self, name: impl Into<String>, dialog: Dialog, now: Instant) -> Option<Dialog> {
        let Registered { previous, command } = self.stack.register(name, dialog);
        self.apply(command, now);
        previous
    }

    pub fn show(&mut self, name: &str, now: Instant) {
        let command = self.stack.show(name);
        self.apply(command, now);
    }

    pub fn hide(&mut self, now: Instant) {
        let command = self.stack.hide();
        self.apply(command, now);
    }

    /// Queues an event behind whatever is already waiting.
    pub fn enqueue(&mut self, event: InputEvent) {
        self.queue.push(event);
    }

    /// Parses raw terminal input, queues the events, and pumps.
    pub fn feed_raw(&mut self, data: &str, now: Instant) -> usize {
        for event in parse_input_events(data) {
            self.queue.push(event);
        }
        self.pump(now)
    }

    /// Routes one event to the stack and applies the resulting command.
    pub fn dispatch(&mut self, event: &InputEvent, now: Instant) {
        let command = self.stack.update(event);
        self.apply(command, now);
    }

    pub fn apply(&mut self, command: Command, now: Instant) {
        for leaf in command.into_vec() {
            match leaf {
                Command::Schedule { after, event } => self.queue.schedule(now + after, event),
                Command::Emit(message) => self.emitted.push(message),
                Command::None | Command::Batch(_) => {}
            }
        }
    }

    /// Delivers every ready event and every timer due at `now`, in order.
    ///
    /// Timers scheduled while pumping are left for a later pump even when
    /// already due, so a zero-delay reschedule cannot spin.
    pub fn pump(&mut self, now: Instant) -> usize {
        self.queue.promote_due(now);
        let mut delivered = 0;
        while let Some(event) = self.queue.pop() {
            self.dispatch(&event, now);
            delivered += 1;
        }
        if delivered > 0 {
            tracing::trace!(delivered, "pumped events");
        }
        delivered
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.next_deadline()
    }

    /// Host-bound messages emitted since the last call.
    pub fn take_emitted(&mut self) -> Vec<Box<dyn Any>> {
        std::mem::take(&mut self.emitted)
    }

    pub fn frame(&mut self) -> String {
        self.stack.view()
    }
}
