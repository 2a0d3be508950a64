//! Side effects returned from updates.
//!
//! Nothing here runs anything: a command is a description handed back to the
//! host loop, which applies it after the current event has been fully processed.

use std::any::Any;
use std::fmt;
use std::time::Duration;

use crate::core::input_event::InputEvent;

pub enum Command {
    None,
    Batch(Vec<Command>),
    /// Deliver `event` back into the event stream once `after` has elapsed.
    Schedule { after: Duration, event: InputEvent },
    /// Opaque message for the host application.
    Emit(Box<dyn Any>),
}

impl Command {
    pub fn schedule(after: Duration, event: InputEvent) -> Self {
        Self::Schedule { after, event }
    }

    pub fn emit<T: Any>(message: T) -> Self {
        Self::Emit(Box::new(message))
    }

    /// Combines commands, dropping `None` and flattening nested batches.
    pub fn batch(commands: impl IntoIterator<Item = Command>) -> Self {
        let mut flat = Vec::new();
        for command in commands {
            command.flatten_into(&mut flat);
        }
        match flat.len() {
            0 => Self::None,
            1 => flat.pop().unwrap_or(Self::None),
            _ => Self::Batch(flat),
        }
    }

    pub fn is_none(&self) -> bool {
        match self {
            Self::None => true,
            Self::Batch(commands) => commands.iter().all(Command::is_none),
            _ => false,
        }
    }

    /// Leaf commands in execution order.
    pub fn into_vec(self) -> Vec<Command> {
        let mut flat = Vec::new();
        self.flatten_into(&mut flat);
        flat
    }

    fn flatten_into(self, out: &mut Vec<Command>) {
        match self {
            Self::None => {}
            Self::Batch(commands) => {
                for command in commands {
                    command.flatten_into(out);
                }
            }
            other => out.push(other),
        }
    }
}

impl Default for Command {
    fn default() -> Self {
        Self::None
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Batch(commands) => f.debug_tuple("Batch").field(commands).finish(),
            Self::Schedule { after, event } => f
                .debug_struct("Schedule")
                .field("after", after)
                .field("event", event)
                .finish(),
            Self::Emit(_) => f.write_str("Emit(..)"),
        }
    }
}
