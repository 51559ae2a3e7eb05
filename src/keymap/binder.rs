//! Keyboard binder: the configuration UI state for one plugin
//!
//! Owns the plugin's [`BindingRegistry`] and one [`Recorder`] per slot.
//! Recording is gated by the process-wide [`RecordingLock`], so two binders
//! sharing a lock can never record at the same time.

use super::binding::{BindingConfig, BindingSlot};
use super::config::KeymapError;
use super::recorder::{Recorder, RecordingLock};
use super::registry::{BindingRegistry, UpdateOutcome};
use super::types::KeyEvent;
use crate::input::EventResult;

/// One row of the binding list as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingRow {
    pub id: String,
    pub action: String,
    /// "Ctrl + S", or "Not set"
    pub display: String,
    pub recording: bool,
    /// A clear button is only offered for bound slots
    pub can_clear: bool,
}

#[derive(Debug)]
pub struct KeyboardBinder {
    registry: BindingRegistry,
    recorders: Vec<Recorder>,
    lock: RecordingLock,
    disabled: bool,
    last_outcome: Option<UpdateOutcome>,
}

impl KeyboardBinder {
    pub fn new(configs: &[BindingConfig], lock: RecordingLock) -> Result<Self, KeymapError> {
        let registry = BindingRegistry::new(configs)?;
        let recorders = registry
            .slots()
            .iter()
            .map(|slot| Recorder::new(slot.id.clone()))
            .collect();

        Ok(Self {
            registry,
            recorders,
            lock,
            disabled: false,
            last_outcome: None,
        })
    }

    /// Builder: notify with the full slot list whenever a slot changes
    pub fn on_change(mut self, callback: impl FnMut(&[BindingSlot]) + 'static) -> Self {
        self.registry = self.registry.on_change(callback);
        self
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    /// Outcome of the most recent update or clear (collision warnings live here)
    pub fn last_outcome(&self) -> Option<&UpdateOutcome> {
        self.last_outcome.as_ref()
    }

    /// Disable or enable every record/clear control
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        for recorder in &mut self.recorders {
            recorder.set_disabled(disabled);
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Start recording for a slot; false if ignored
    pub fn start_recording(&mut self, id: &str) -> bool {
        match self.recorders.iter_mut().find(|r| r.slot_id() == id) {
            Some(recorder) => recorder.start(&self.lock),
            None => {
                tracing::warn!(binding = id, "Cannot record unknown binding id");
                false
            }
        }
    }

    /// Cancel whatever recording this binder has in progress
    pub fn cancel_recording(&mut self) {
        for recorder in &mut self.recorders {
            recorder.cancel();
        }
    }

    /// Slot currently recording in this binder
    pub fn recording_slot(&self) -> Option<&str> {
        self.recorders
            .iter()
            .find(|r| r.is_recording())
            .map(Recorder::slot_id)
    }

    pub fn is_recording(&self) -> bool {
        self.recording_slot().is_some()
    }

    /// Route a key-down to the active recorder, if any
    pub fn handle_key(&mut self, event: &KeyEvent) -> EventResult {
        let Some(recorder) = self.recorders.iter_mut().find(|r| r.is_recording()) else {
            return EventResult::Bubble;
        };

        let registry = &mut self.registry;
        let last_outcome = &mut self.last_outcome;
        recorder.handle_key(event, |slot, combination| {
            *last_outcome = Some(registry.update(slot, combination));
        })
    }

    /// Unbind a slot; ignored while disabled
    pub fn clear(&mut self, id: &str) -> Option<&UpdateOutcome> {
        if self.disabled {
            return None;
        }
        self.last_outcome = Some(self.registry.clear(id));
        self.last_outcome.as_ref()
    }

    /// Rows for rendering the binding list
    pub fn rows(&self) -> Vec<BindingRow> {
        let recording = self.recording_slot();
        self.registry
            .slots()
            .iter()
            .map(|slot| BindingRow {
                id: slot.id.clone(),
                action: slot.action.clone(),
                display: slot.display_string(),
                recording: recording == Some(slot.id.as_str()),
                can_clear: slot.combination.is_set(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::types::{KeyCombination, Modifiers};

    fn configs() -> Vec<BindingConfig> {
        vec![
            BindingConfig::new("save", "Save Document"),
            BindingConfig::new("delete", "Delete Item").key("Delete"),
        ]
    }

    #[test]
    fn test_record_updates_registry() {
        let mut binder = KeyboardBinder::new(&configs(), RecordingLock::new()).unwrap();

        assert!(binder.start_recording("save"));
        assert_eq!(binder.recording_slot(), Some("save"));

        let result = binder.handle_key(&KeyEvent::new("s", "KeyS", Modifiers::CTRL));
        assert_eq!(result, EventResult::Consumed);
        assert!(!binder.is_recording());
        assert_eq!(
            binder.registry().get("save").unwrap().combination,
            KeyCombination::new("S", Modifiers::CTRL).with_code("KeyS")
        );
        assert_eq!(binder.last_outcome(), Some(&UpdateOutcome::Applied));
    }

    #[test]
    fn test_not_recording_bubbles() {
        let mut binder = KeyboardBinder::new(&configs(), RecordingLock::new()).unwrap();
        let result = binder.handle_key(&KeyEvent::new("s", "KeyS", Modifiers::CTRL));
        assert_eq!(result, EventResult::Bubble);
    }

    #[test]
    fn test_binders_share_recording_lock() {
        let lock = RecordingLock::new();
        let mut a = KeyboardBinder::new(&configs(), lock.clone()).unwrap();
        let mut b = KeyboardBinder::new(&configs(), lock.clone()).unwrap();

        assert!(a.start_recording("save"));
        assert!(!b.start_recording("save"));
        assert!(!a.start_recording("delete"));

        a.cancel_recording();
        assert!(b.start_recording("delete"));
    }

    #[test]
    fn test_rows_reflect_state() {
        let mut binder = KeyboardBinder::new(&configs(), RecordingLock::new()).unwrap();
        binder.start_recording("delete");

        let rows = binder.rows();
        assert_eq!(rows[0].display, "Not set");
        assert!(!rows[0].can_clear);
        assert!(!rows[0].recording);
        assert_eq!(rows[1].display, "Delete");
        assert!(rows[1].can_clear);
        assert!(rows[1].recording);
    }

    #[test]
    fn test_disabled_binder_ignores_record_and_clear() {
        let mut binder = KeyboardBinder::new(&configs(), RecordingLock::new()).unwrap();
        binder.set_disabled(true);

        assert!(!binder.start_recording("save"));
        assert!(binder.clear("delete").is_none());
        assert!(binder.registry().get("delete").unwrap().combination.is_set());
    }

    #[test]
    fn test_unknown_slot_cannot_record() {
        let mut binder = KeyboardBinder::new(&configs(), RecordingLock::new()).unwrap();
        assert!(!binder.start_recording("missing"));
    }
}
