//! Normalization of raw key events into canonical key combinations
//!
//! Recorder and dispatch both go through [`normalize`], so a combination
//! captured while recording always compares equal to the same physical
//! keypress later on.

use super::types::{KeyCombination, KeyEvent};

/// Logical key names that only ever act as modifiers
const MODIFIER_KEYS: [&str; 4] = ["Control", "Shift", "Alt", "Meta"];

/// Physical codes with a dedicated short label
const NAMED_CODES: [(&str, &str); 14] = [
    ("Space", "Space"),
    ("Escape", "Esc"),
    ("Enter", "Enter"),
    ("Tab", "Tab"),
    ("ArrowUp", "↑"),
    ("ArrowDown", "↓"),
    ("ArrowLeft", "←"),
    ("ArrowRight", "→"),
    ("Backspace", "Backspace"),
    ("Delete", "Delete"),
    ("Home", "Home"),
    ("End", "End"),
    ("PageUp", "PageUp"),
    ("PageDown", "PageDown"),
];

/// Prefixes stripped from codes outside the named table
const CODE_PREFIXES: [&str; 4] = ["Key", "Digit", "Numpad", "Arrow"];

/// Returns true for a press of Control/Shift/Alt/Meta on its own
pub fn is_modifier_key(key: &str) -> bool {
    MODIFIER_KEYS.contains(&key)
}

/// Map a physical key code to its canonical label
///
/// `KeyS` → `S`, `Digit1` → `1`, `ArrowUp` → `↑`, `Escape` → `Esc`.
pub fn key_name(code: &str) -> String {
    if let Some((_, label)) = NAMED_CODES.iter().find(|(c, _)| *c == code) {
        return (*label).to_string();
    }

    let stripped = CODE_PREFIXES
        .iter()
        .find_map(|prefix| code.strip_prefix(prefix))
        .unwrap_or(code);
    stripped.to_uppercase()
}

/// Canonicalize a key label that may already be canonical
///
/// Labels from the named table are kept as-is; anything else is treated
/// as a code. Applying this twice yields the same result as applying it once.
pub fn canonical_label(label: &str) -> String {
    if NAMED_CODES.iter().any(|(_, l)| *l == label) {
        return label.to_string();
    }
    key_name(label)
}

/// Normalize a raw key-down event
///
/// Returns `None` for modifier-only presses and for codes with no
/// usable label (empty or bare prefix); callers waiting for a combination
/// should keep waiting.
pub fn normalize(event: &KeyEvent) -> Option<KeyCombination> {
    if is_modifier_key(&event.key) {
        return None;
    }

    let key = key_name(&event.code);
    if key.is_empty() {
        tracing::trace!(key = %event.key, code = %event.code, "Key event has no usable code");
        return None;
    }

    Some(KeyCombination {
        key,
        code: event.code.clone(),
        mods: event.mods,
    })
}

impl KeyCombination {
    /// Re-canonicalize the key label, keeping code and modifiers
    pub fn normalized(&self) -> KeyCombination {
        if !self.is_set() {
            return self.clone();
        }
        KeyCombination {
            key: canonical_label(&self.key),
            code: self.code.clone(),
            mods: self.mods,
        }
    }
}
