//! Binding slots and the configuration they are resolved from

use serde::{Deserialize, Serialize};

use super::types::{KeyCombination, ModifierSet};

/// Consumer-supplied description of one configurable action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    /// Stable, caller-assigned identifier ("move-up")
    pub id: String,
    /// Display-only action label ("Move Up")
    pub action: String,
    #[serde(default, rename = "key")]
    pub default_key: Option<String>,
    #[serde(default, rename = "modifiers")]
    pub default_modifiers: ModifierSet,
}

impl BindingConfig {
    /// A config with no default combination
    pub fn new(id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            action: action.into(),
            default_key: None,
            default_modifiers: ModifierSet::default(),
        }
    }

    /// Builder: set the default key label
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.default_key = Some(key.into());
        self
    }

    /// Builder: set the default modifier set
    pub fn modifiers(mut self, modifiers: ModifierSet) -> Self {
        self.default_modifiers = modifiers;
        self
    }

    /// Resolve into a slot carrying the default combination
    pub fn resolve(&self) -> BindingSlot {
        let combination = match self.default_key.as_deref() {
            Some(key) if !key.is_empty() => {
                KeyCombination::new(key, self.default_modifiers.into()).normalized()
            }
            _ => KeyCombination::UNSET,
        };

        BindingSlot {
            id: self.id.clone(),
            action: self.action.clone(),
            combination,
        }
    }
}

/// One configurable action and its currently bound combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSlot {
    pub id: String,
    pub action: String,
    pub combination: KeyCombination,
}

impl BindingSlot {
    /// Check if this slot fires for the given combination
    pub fn matches(&self, combination: &KeyCombination) -> bool {
        self.combination.is_set() && self.combination.matches(combination)
    }

    /// Get display string for this slot's combination
    pub fn display_string(&self) -> String {
        self.combination.display_label()
    }
}
