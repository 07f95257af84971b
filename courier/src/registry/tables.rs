//! Subscription and registration storage.

use courier_core::{BoxedHandler, MediatorError, TypeKey};
use std::collections::HashMap;

/// The two indexes a mediator owns.
///
/// Subscriptions keep every handler in insertion order, duplicates included.
/// Registrations keep exactly one handler per command type.
#[derive(Default)]
pub(crate) struct Tables {
    subscriptions: HashMap<TypeKey, Vec<BoxedHandler>>,
    registrations: HashMap<TypeKey, BoxedHandler>,
}

impl Tables {
    /// Appends an event handler.
    pub(crate) fn subscribe(&mut self, handler: BoxedHandler) {
        self.subscriptions
            .entry(handler.key())
            .or_default()
            .push(handler);
    }

    /// Stores a command handler; the first registration wins.
    pub(crate) fn register(&mut self, handler: BoxedHandler) -> Result<(), MediatorError> {
        let command = handler.key();
        if self.registrations.contains_key(&command) {
            return Err(MediatorError::DuplicateHandler { command });
        }
        self.registrations.insert(command, handler);
        Ok(())
    }

    /// Clones the subscribers of `key` in registration order.
    pub(crate) fn subscribers(&self, key: &TypeKey) -> Vec<BoxedHandler> {
        self.subscriptions.get(key).cloned().unwrap_or_default()
    }

    /// Clones the handler registered for `key`.
    pub(crate) fn registration(&self, key: &TypeKey) -> Option<BoxedHandler> {
        self.registrations.get(key).cloned()
    }

    pub(crate) fn subscriber_count(&self, key: &TypeKey) -> usize {
        self.subscriptions.get(key).map_or(0, Vec::len)
    }

    pub(crate) fn has_registration(&self, key: &TypeKey) -> bool {
        self.registrations.contains_key(key)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.subscriptions.is_empty() && self.registrations.is_empty()
    }
}
