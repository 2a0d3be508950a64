//! Named dialogs and the LIFO stack of the ones currently shown.
//!
//! Only the topmost dialog receives input. Membership in the stack is the
//! single source of truth for "is this dialog shown": a dialog that closes
//! itself reports it through [`DialogUpdate::close_requested`] and is popped
//! in the same update.

use std::collections::HashMap;

use crate::core::command::Command;
use crate::core::input_event::InputEvent;
use crate::runtime::dialog::{Dialog, DialogUpdate};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StackError {
    #[error("no dialog registered under '{0}'")]
    UnknownDialog(String),
}

/// Outcome of [`DialogStack::register`].
#[derive(Default)]
pub struct Registered {
    /// Dialog previously registered under the same name.
    pub previous: Option<Dialog>,
    /// Opening effects of the new dialog when it took over a shown slot.
    pub command: Command,
}

#[derive(Default)]
pub struct DialogStack {
    registry: HashMap<String, Dialog>,
    stack: Vec<String>,
    size: Option<(usize, usize)>,
}

impl DialogStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `dialog` under `name`, handing back any dialog it replaces.
    ///
    /// A replaced dialog that was shown keeps its place in the stack, now
    /// occupied by the new dialog, which is opened right away.
    pub fn register(&mut self, name: impl Into<String>, mut dialog: Dialog) -> Registered {
        let name = name.into();
        if let Some((width, height)) = self.size {
            dialog.set_size(width, height);
        }
        let shown = self.is_open(&name);
        tracing::debug!(name = %name, shown, "dialog registered");

        let command = if shown { dialog.open() } else { Command::None };
        let previous = self.registry.insert(name, dialog);
        Registered { previous, command }
    }

    /// Removes a dialog from the registry (and from the stack if shown).
    pub fn unregister(&mut self, name: &str) -> Option<Dialog> {
        self.stack.retain(|entry| entry != name);
        self.registry.remove(name)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    /// Shows the named dialog on top of the stack.
    ///
    /// Showing the topmost dialog again is a no-op. A dialog already shown
    /// lower in the stack is moved to the top. Unknown names are ignored.
    pub fn show(&mut self, name: &str) -> Command {
        match self.try_show(name) {
            Ok(command) => command,
            Err(err) => {
                tracing::warn!(%err, "show ignored");
                Command::None
            }
        }
    }

    pub fn try_show(&mut self, name: &str) -> Result<Command, StackError> {
        if !self.registry.contains_key(name) {
            return Err(StackError::UnknownDialog(name.to_string()));
        }
        if self.active_name() == Some(name) {
            return Ok(Command::None);
        }

        self.stack.retain(|entry| entry != name);
        self.stack.push(name.to_string());
        tracing::debug!(name, depth = self.stack.len(), "dialog shown");

        let Some(dialog) = self.registry.get_mut(name) else {
            return Err(StackError::UnknownDialog(name.to_string()));
        };
        Ok(dialog.open())
    }

    /// Pops the topmost dialog. No-op on an empty stack.
    pub fn hide(&mut self) -> Command {
        let Some(name) = self.stack.pop() else {
            return Command::None;
        };
        tracing::debug!(name = %name, depth = self.stack.len(), "dialog hidden");
        self.resume_top()
    }

    pub fn hide_all(&mut self) {
        self.stack.clear();
    }

    /// Routes `event` to the topmost dialog only.
    pub fn update(&mut self, event: &InputEvent) -> Command {
        if let InputEvent::Resize { columns, rows } = event {
            self.set_size(usize::from(*columns), usize::from(*rows));
        }

        let Some(name) = self.stack.last().cloned() else {
            return Command::None;
        };
        let Some(dialog) = self.registry.get_mut(&name) else {
            self.stack.pop();
            return Command::None;
        };

        let DialogUpdate {
            command,
            close_requested,
        } = dialog.update(event);

        if close_requested && self.stack.last() == Some(&name) {
            self.stack.pop();
            tracing::debug!(name = %name, depth = self.stack.len(), "dialog closed itself");
            return Command::batch([command, self.resume_top()]);
        }
        command
    }

    /// Renders the topmost dialog, or an empty string when none is shown.
    pub fn view(&mut self) -> String {
        match self.active_mut() {
            Some(dialog) => dialog.view(),
            None => String::new(),
        }
    }

    /// Sizes every registered dialog, shown or not.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.size = Some((width, height));
        for dialog in self.registry.values_mut() {
            dialog.set_size(width, height);
        }
    }

    pub fn is_visible(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn is_open(&self, name: &str) -> bool {
        self.stack.iter().any(|entry| entry == name)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn active_name(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    pub fn active(&self) -> Option<&Dialog> {
        self.active_name().and_then(|name| self.registry.get(name))
    }

    pub fn active_mut(&mut self) -> Option<&mut Dialog> {
        let name = self.stack.last()?;
        self.registry.get_mut(name)
    }

    pub fn get(&self, name: &str) -> Option<&Dialog> {
        self.registry.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Dialog> {
        self.registry.get_mut(name)
    }

    fn resume_top(&mut self) -> Command {
        self.active_mut().map(Dialog::resume).unwrap_or_default()
    }
}
