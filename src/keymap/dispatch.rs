//! Dispatch listener: matches key-downs against the active bindings
//!
//! There is one dispatch listener per process. It is attached to a
//! [`BindingSnapshot`] and must be re-synced whenever the registry swaps
//! its snapshot, otherwise it keeps matching the stale configuration.

use super::normalize::normalize;
use super::registry::{BindingRegistry, BindingSnapshot};
use super::types::KeyEvent;
use crate::events::{ActionEvent, EventBus, ACTION_EVENT};
use crate::input::EventResult;

/// Process-wide key-down listener emitting [`ActionEvent`]s
#[derive(Debug)]
pub struct DispatchListener {
    bus: EventBus<ActionEvent>,
    snapshot: Option<BindingSnapshot>,
}

impl DispatchListener {
    /// Create a detached listener publishing on `bus`
    pub fn new(bus: EventBus<ActionEvent>) -> Self {
        Self {
            bus,
            snapshot: None,
        }
    }

    pub fn attach(&mut self, snapshot: BindingSnapshot) {
        tracing::debug!(bindings = snapshot.slots().len(), "Dispatch listener attached");
        self.snapshot = Some(snapshot);
    }

    pub fn detach(&mut self) {
        if self.snapshot.take().is_some() {
            tracing::debug!("Dispatch listener detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Reattach if the registry's snapshot changed since the last attach
    ///
    /// Returns true when a reattach happened.
    pub fn sync(&mut self, registry: &BindingRegistry) -> bool {
        let current = registry.snapshot();
        if self
            .snapshot
            .as_ref()
            .is_some_and(|attached| attached.ptr_eq(&current))
        {
            return false;
        }
        self.detach();
        self.attach(current);
        true
    }

    /// The snapshot currently matched against
    pub fn snapshot(&self) -> Option<&BindingSnapshot> {
        self.snapshot.as_ref()
    }

    /// Handle a key-down event
    ///
    /// The first slot (in registration order) whose combination matches
    /// fires. Matching events are consumed; everything else bubbles.
    pub fn handle_key(&self, event: &KeyEvent) -> EventResult {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return EventResult::Bubble;
        };
        let Some(combination) = normalize(event) else {
            return EventResult::Bubble;
        };
        let Some(slot) = snapshot.find_match(&combination) else {
            return EventResult::Bubble;
        };

        tracing::debug!(
            binding = %slot.id,
            combination = %combination,
            "Key binding triggered"
        );
        let action = ActionEvent {
            binding_id: slot.id.clone(),
            action: slot.action.clone(),
        };
        self.bus.publish(ACTION_EVENT, &action);
        EventResult::Consumed
    }
}
