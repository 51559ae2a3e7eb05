//! Key recorder: captures the next key combination for one binding slot
//!
//! ```text
//! Idle --start--> Recording --first non-modifier key--> Idle (capture)
//!                     \------------cancel-------------> Idle
//! ```
//!
//! Only one recorder may be recording at a time across the whole UI. That
//! is enforced by a shared [`RecordingLock`]: a session holds the lock's
//! guard and releases it when it ends.

use std::cell::RefCell;
use std::rc::Rc;

use super::normalize::normalize;
use super::types::{KeyCombination, KeyEvent};
use crate::input::EventResult;

/// Process-wide token granting exclusive keyboard capture to one recorder
#[derive(Debug, Clone, Default)]
pub struct RecordingLock {
    holder: Rc<RefCell<Option<String>>>,
}

impl RecordingLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `slot_id`, or `None` if another session holds it
    pub fn try_acquire(&self, slot_id: &str) -> Option<RecordingGuard> {
        let mut holder = self.holder.borrow_mut();
        if let Some(current) = holder.as_deref() {
            tracing::debug!(
                requested = slot_id,
                holder = current,
                "Recording lock already held"
            );
            return None;
        }
        *holder = Some(slot_id.to_string());
        Some(RecordingGuard {
            holder: Rc::clone(&self.holder),
        })
    }

    /// Slot currently recording, if any
    pub fn holder(&self) -> Option<String> {
        self.holder.borrow().clone()
    }

    pub fn is_held(&self) -> bool {
        self.holder.borrow().is_some()
    }
}

/// Releases the [`RecordingLock`] on drop
#[derive(Debug)]
pub struct RecordingGuard {
    holder: Rc<RefCell<Option<String>>>,
}

impl Drop for RecordingGuard {
    fn drop(&mut self) {
        self.holder.borrow_mut().take();
    }
}

/// Ephemeral state while waiting for the user's next keypress
#[derive(Debug)]
pub struct RecorderSession {
    pub target_slot: String,
    _guard: RecordingGuard,
}

#[derive(Debug, Default)]
pub enum RecorderState {
    #[default]
    Idle,
    Recording(RecorderSession),
}

/// Per-slot recorder state machine
#[derive(Debug)]
pub struct Recorder {
    slot_id: String,
    disabled: bool,
    state: RecorderState,
}

impl Recorder {
    pub fn new(slot_id: impl Into<String>) -> Self {
        Self {
            slot_id: slot_id.into(),
            disabled: false,
            state: RecorderState::Idle,
        }
    }

    pub fn slot_id(&self) -> &str {
        &self.slot_id
    }

    pub fn state(&self) -> &RecorderState {
        &self.state
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Recording(_))
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Disabling an active recorder cancels its session
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.cancel();
        }
    }

    /// Start recording; returns false if the start was ignored
    pub fn start(&mut self, lock: &RecordingLock) -> bool {
        if self.disabled || self.is_recording() {
            return false;
        }
        let Some(guard) = lock.try_acquire(&self.slot_id) else {
            return false;
        };

        tracing::debug!(slot = %self.slot_id, "Recording started");
        self.state = RecorderState::Recording(RecorderSession {
            target_slot: self.slot_id.clone(),
            _guard: guard,
        });
        true
    }

    /// Abandon the session without capturing anything
    pub fn cancel(&mut self) {
        if let RecorderState::Recording(session) = std::mem::take(&mut self.state) {
            tracing::debug!(slot = %session.target_slot, "Recording cancelled");
        }
    }

    /// Feed a key-down event to the recorder
    ///
    /// While recording every event is consumed. Modifier-only presses and
    /// keys with no usable code keep the session open; the first other key
    /// is normalized, handed to
    /// `on_capture`, and the recorder returns to idle.
    pub fn handle_key<F>(&mut self, event: &KeyEvent, on_capture: F) -> EventResult
    where
        F: FnOnce(&str, KeyCombination),
    {
        if !self.is_recording() {
            return EventResult::Bubble;
        }

        let Some(combination) = normalize(event) else {
            return EventResult::Consumed;
        };

        if let RecorderState::Recording(session) = std::mem::take(&mut self.state) {
            let target = session.target_slot.clone();
            // Release the lock before the callback runs
            drop(session);
            tracing::debug!(slot = %target, combination = %combination, "Combination captured");
            on_capture(&target, combination);
        }
        EventResult::Consumed
    }
}
