//! Configurable keyboard binding engine
//!
//! This module provides the binding side of the overlay:
//! - Normalizes raw key events into canonical combinations
//! - Holds each plugin's configured slots as immutable snapshots
//! - Records the next combination for a slot from the physical keyboard
//! - Matches key-downs against the active snapshot and emits action events
//!
//! # Architecture
//!
//! ```text
//! KeyEvent → normalize() → KeyCombination
//!     ├─ Recorder (while recording) → BindingRegistry::update → new snapshot
//!     └─ DispatchListener::handle_key → EventBus<ActionEvent>
//! ```
//!
//! # Loading Bindings
//!
//! ```ignore
//! // An explicit file, else ~/.config/plugin-canvas/bindings.yaml, else defaults
//! let configs = load_bindings(Some(Path::new("bindings.yaml")));
//! let binder = KeyboardBinder::new(&configs, RecordingLock::new())?;
//! ```

mod binder;
mod binding;
mod config;
mod defaults;
mod dispatch;
mod normalize;
mod recorder;
mod registry;
mod types;

pub use binder::{BindingRow, KeyboardBinder};
pub use binding::{BindingConfig, BindingSlot};
pub use config::{
    load_bindings_file, parse_bindings_yaml, parse_key_string, BindingsFile, KeymapError,
};
pub use defaults::{default_bindings, load_bindings};
pub use dispatch::DispatchListener;
pub use normalize::{canonical_label, is_modifier_key, key_name, normalize};
pub use recorder::{Recorder, RecorderSession, RecorderState, RecordingGuard, RecordingLock};
pub use registry::{BindingRegistry, BindingSnapshot, Collision, UpdateOutcome};
pub use types::{KeyCombination, KeyEvent, ModifierSet, Modifiers};
