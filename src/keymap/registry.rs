//! Binding registry: the configured slots for one plugin instance
//!
//! The registry never mutates slots in place. Every `update`/`clear`
//! builds a fresh [`BindingSnapshot`] and swaps it in, so anything holding
//! the previous snapshot keeps seeing a consistent view.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use super::binding::{BindingConfig, BindingSlot};
use super::config::KeymapError;
use super::types::KeyCombination;

/// Immutable, ordered view of all slots
#[derive(Clone)]
pub struct BindingSnapshot(Rc<[BindingSlot]>);

impl BindingSnapshot {
    pub fn new(slots: Vec<BindingSlot>) -> Self {
        Self(slots.into())
    }

    pub fn slots(&self) -> &[BindingSlot] {
        &self.0
    }

    /// Whether both handles point at the same snapshot
    pub fn ptr_eq(&self, other: &BindingSnapshot) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// First slot (in registration order) bound to the combination
    pub fn find_match(&self, combination: &KeyCombination) -> Option<&BindingSlot> {
        self.0.iter().find(|slot| slot.matches(combination))
    }

    pub fn get(&self, id: &str) -> Option<&BindingSlot> {
        self.0.iter().find(|slot| slot.id == id)
    }
}

impl Default for BindingSnapshot {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Debug for BindingSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// Two or more slots bound to the same combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub combination: KeyCombination,
    /// Colliding slot ids in registration order; the first one wins dispatch
    pub slot_ids: Vec<String>,
}

impl Collision {
    /// The slot the dispatch listener will fire
    pub fn winner(&self) -> &str {
        &self.slot_ids[0]
    }
}

/// Result of an `update`/`clear` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// Applied, but the combination is shared with other slots
    Collision(Collision),
    /// No slot with that id; nothing changed
    UnknownSlot,
}

type ChangeCallback = Box<dyn FnMut(&[BindingSlot])>;

/// Holds the current bindings for one plugin instance
pub struct BindingRegistry {
    snapshot: BindingSnapshot,
    on_change: Option<ChangeCallback>,
}

impl BindingRegistry {
    /// Resolve the configs in order into the initial snapshot
    pub fn new(configs: &[BindingConfig]) -> Result<Self, KeymapError> {
        let mut seen = HashSet::new();
        for config in configs {
            if !seen.insert(config.id.as_str()) {
                return Err(KeymapError::DuplicateId(config.id.clone()));
            }
        }

        let slots = configs.iter().map(BindingConfig::resolve).collect();
        Ok(Self {
            snapshot: BindingSnapshot::new(slots),
            on_change: None,
        })
    }

    /// Builder: notify with the full slot list after every change
    pub fn on_change(mut self, callback: impl FnMut(&[BindingSlot]) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn snapshot(&self) -> BindingSnapshot {
        self.snapshot.clone()
    }

    pub fn slots(&self) -> &[BindingSlot] {
        self.snapshot.slots()
    }

    pub fn get(&self, id: &str) -> Option<&BindingSlot> {
        self.snapshot.get(id)
    }

    /// Replace the combination bound to `id`
    ///
    /// The key label is canonicalized first, so `s` and `S` bind alike.
    pub fn update(&mut self, id: &str, combination: KeyCombination) -> UpdateOutcome {
        self.replace(id, combination)
    }

    /// Unbind `id`
    pub fn clear(&mut self, id: &str) -> UpdateOutcome {
        self.replace(id, KeyCombination::UNSET)
    }

    fn replace(&mut self, id: &str, combination: KeyCombination) -> UpdateOutcome {
        if self.snapshot.get(id).is_none() {
            tracing::warn!(binding = id, "Ignoring change for unknown binding id");
            return UpdateOutcome::UnknownSlot;
        }
        let combination = combination.normalized();

        let slots: Vec<BindingSlot> = self
            .snapshot
            .slots()
            .iter()
            .map(|slot| {
                if slot.id == id {
                    BindingSlot {
                        combination: combination.clone(),
                        ..slot.clone()
                    }
                } else {
                    slot.clone()
                }
            })
            .collect();

        self.snapshot = BindingSnapshot::new(slots);
        tracing::debug!(
            binding = id,
            combination = %combination.display_label(),
            "Binding updated"
        );

        if let Some(callback) = self.on_change.as_mut() {
            callback(self.snapshot.slots());
        }

        match self.collision_for(&combination) {
            Some(collision) => {
                tracing::warn!(
                    combination = %collision.combination,
                    slots = ?collision.slot_ids,
                    winner = collision.winner(),
                    "Key combination is bound to more than one action"
                );
                UpdateOutcome::Collision(collision)
            }
            None => UpdateOutcome::Applied,
        }
    }

    fn collision_for(&self, combination: &KeyCombination) -> Option<Collision> {
        if !combination.is_set() {
            return None;
        }
        let slot_ids: Vec<String> = self
            .slots()
            .iter()
            .filter(|slot| slot.matches(combination))
            .map(|slot| slot.id.clone())
            .collect();

        (slot_ids.len() > 1).then(|| Collision {
            combination: combination.clone(),
            slot_ids,
        })
    }

    /// Every combination currently bound to more than one slot
    pub fn collisions(&self) -> Vec<Collision> {
        let mut collisions: Vec<Collision> = Vec::new();
        for slot in self.slots() {
            if collisions
                .iter()
                .any(|c| c.combination.matches(&slot.combination))
            {
                continue;
            }
            if let Some(collision) = self.collision_for(&slot.combination) {
                collisions.push(collision);
            }
        }
        collisions
    }
}

impl fmt::Debug for BindingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingRegistry")
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}
