//! Core types for the keymap system: Modifiers, KeyEvent, KeyCombination

use std::fmt;

use serde::{Deserialize, Serialize};

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS, Win on Windows

    /// Create modifiers from individual flags
    pub const fn new(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 0b0001;
        }
        if shift {
            bits |= 0b0010;
        }
        if alt {
            bits |= 0b0100;
        }
        if meta {
            bits |= 0b1000;
        }
        Modifiers(bits)
    }

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0001 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0010 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0100 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & 0b1000 != 0
    }

    /// Check if no modifiers are held
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Combine two modifier sets
    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Check if this contains all modifiers in other
    #[inline]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Modifier names in display order
    pub fn labels(self) -> Vec<&'static str> {
        let mut parts = Vec::with_capacity(4);
        if self.ctrl() {
            parts.push("Ctrl");
        }
        if self.shift() {
            parts.push("Shift");
        }
        if self.alt() {
            parts.push("Alt");
        }
        if self.meta() {
            parts.push("Meta");
        }
        parts
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels().join(" + "))
    }
}

/// Optional per-flag modifier set as written in binding configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierSet {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl From<ModifierSet> for Modifiers {
    fn from(set: ModifierSet) -> Self {
        Modifiers::new(set.ctrl, set.shift, set.alt, set.meta)
    }
}

/// A raw key-down event as delivered by the host
///
/// `key` is the logical key name ("Control", "s"), `code` is the physical
/// key code ("ControlLeft", "KeyS").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub code: String,
    pub mods: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, code: impl Into<String>, mods: Modifiers) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
            mods,
        }
    }
}

/// A canonical key combination: primary key label plus modifiers
///
/// An empty `key` represents an unset combination.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyCombination {
    /// Canonical label ("Esc", "↑", "S")
    pub key: String,
    /// Physical code the combination was recorded from (empty for defaults)
    pub code: String,
    pub mods: Modifiers,
}

impl KeyCombination {
    pub const UNSET: KeyCombination = KeyCombination {
        key: String::new(),
        code: String::new(),
        mods: Modifiers::NONE,
    };

    pub fn new(key: impl Into<String>, mods: Modifiers) -> Self {
        Self {
            key: key.into(),
            code: String::new(),
            mods,
        }
    }

    /// Builder: attach the physical code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        !self.key.is_empty()
    }

    /// Check whether two combinations trigger the same binding
    ///
    /// Compares the key label and all four modifier flags; the physical code
    /// is informational only.
    pub fn matches(&self, other: &KeyCombination) -> bool {
        self.key == other.key && self.mods == other.mods
    }

    /// Display string, or "Not set" for an unset combination
    pub fn display_label(&self) -> String {
        if self.is_set() {
            self.to_string()
        } else {
            "Not set".to_string()
        }
    }
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = self.mods.labels();
        parts.push(&self.key);
        write!(f, "{}", parts.join(" + "))
    }
}
