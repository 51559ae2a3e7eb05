//! YAML configuration parsing for binding lists
//!
//! Parses binding files into `BindingConfig` lists:
//!
//! ```yaml
//! bindings:
//!   - id: save
//!     action: Save Document
//!     key: S
//!     modifiers: { ctrl: true }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::binding::BindingConfig;
use super::types::{KeyEvent, Modifiers};

/// Root structure of a bindings YAML file
#[derive(Debug, Serialize, Deserialize)]
pub struct BindingsFile {
    pub bindings: Vec<BindingConfig>,
}

/// Load binding configs from a YAML file
pub fn load_bindings_file(path: &Path) -> Result<Vec<BindingConfig>, KeymapError> {
    let content = std::fs::read_to_string(path).map_err(|e| KeymapError::IoError(e.to_string()))?;

    parse_bindings_yaml(&content)
}

/// Parse binding configs from a YAML string
pub fn parse_bindings_yaml(yaml: &str) -> Result<Vec<BindingConfig>, KeymapError> {
    let file: BindingsFile =
        serde_yaml::from_str(yaml).map_err(|e| KeymapError::ParseError(e.to_string()))?;

    let mut seen = HashSet::new();
    for binding in &file.bindings {
        if binding.id.is_empty() {
            return Err(KeymapError::InvalidKey("binding with empty id".to_string()));
        }
        if !seen.insert(binding.id.as_str()) {
            return Err(KeymapError::DuplicateId(binding.id.clone()));
        }
    }

    Ok(file.bindings)
}

/// Parse a key string like "ctrl+shift+s" into the key event it describes
pub fn parse_key_string(key_str: &str) -> Result<KeyEvent, KeymapError> {
    let mut mods = Modifiers::NONE;
    let mut key_part = None;

    for part in key_str.split('+') {
        let part_lower = part.trim().to_lowercase();
        match part_lower.as_str() {
            "ctrl" | "control" => mods = mods | Modifiers::CTRL,
            "shift" => mods = mods | Modifiers::SHIFT,
            "alt" | "option" | "opt" => mods = mods | Modifiers::ALT,
            "meta" | "super" | "win" | "cmd" => mods = mods | Modifiers::META,
            "" => return Err(KeymapError::InvalidKey(key_str.to_string())),
            _ => {
                if key_part.is_some() {
                    return Err(KeymapError::InvalidKey(format!(
                        "Multiple keys in binding: {}",
                        key_str
                    )));
                }
                key_part = Some(parse_key_code(&part_lower)?);
            }
        }
    }

    let (key, code) = key_part
        .ok_or_else(|| KeymapError::InvalidKey(format!("No key found in binding: {}", key_str)))?;

    Ok(KeyEvent::new(key, code, mods))
}

/// Parse a key name into its (logical key, physical code) pair
fn parse_key_code(key: &str) -> Result<(String, String), KeymapError> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            let upper = c.to_ascii_uppercase();
            return Ok((c.to_string(), format!("Key{}", upper)));
        }
        if c.is_ascii_digit() {
            return Ok((c.to_string(), format!("Digit{}", c)));
        }
    }

    let code = match key {
        "enter" | "return" => "Enter",
        "escape" | "esc" => "Escape",
        "tab" => "Tab",
        "backspace" | "back" => "Backspace",
        "delete" | "del" => "Delete",
        "space" => "Space",

        "up" | "arrowup" => "ArrowUp",
        "down" | "arrowdown" => "ArrowDown",
        "left" | "arrowleft" => "ArrowLeft",
        "right" | "arrowright" => "ArrowRight",

        "home" => "Home",
        "end" => "End",
        "pageup" | "pgup" => "PageUp",
        "pagedown" | "pgdown" | "pgdn" => "PageDown",

        _ => {
            if let Some(n) = key.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                if (1..=24).contains(&n) {
                    let code = format!("F{}", n);
                    return Ok((code.clone(), code));
                }
            }
            return Err(KeymapError::InvalidKey(format!("Unknown key: {}", key)));
        }
    };

    Ok((code.to_string(), code.to_string()))
}

/// Errors that can occur when loading binding configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymapError {
    IoError(String),
    ParseError(String),
    InvalidKey(String),
    DuplicateId(String),
}

impl std::fmt::Display for KeymapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeymapError::IoError(e) => write!(f, "IO error: {}", e),
            KeymapError::ParseError(e) => write!(f, "Parse error: {}", e),
            KeymapError::InvalidKey(k) => write!(f, "Invalid key: {}", k),
            KeymapError::DuplicateId(id) => write!(f, "Duplicate binding id: {}", id),
        }
    }
}

impl std::error::Error for KeymapError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::normalize::normalize;

    #[test]
    fn test_parse_simple_key() {
        let event = parse_key_string("a").unwrap();
        assert_eq!(event.key, "a");
        assert_eq!(event.code, "KeyA");
        assert!(event.mods.is_empty());
    }

    #[test]
    fn test_parse_key_with_multiple_modifiers() {
        let event = parse_key_string("ctrl+shift+s").unwrap();
        assert_eq!(event.code, "KeyS");
        assert!(event.mods.ctrl());
        assert!(event.mods.shift());
        assert!(!event.mods.alt());
    }

    #[test]
    fn test_parse_named_key_normalizes() {
        let event = parse_key_string("esc").unwrap();
        assert_eq!(normalize(&event).unwrap().key, "Esc");

        let event = parse_key_string("alt+up").unwrap();
        let combo = normalize(&event).unwrap();
        assert_eq!(combo.to_string(), "Alt + ↑");
    }

    #[test]
    fn test_parse_function_key() {
        let event = parse_key_string("f5").unwrap();
        assert_eq!(event.code, "F5");
        assert!(parse_key_string("f99").is_err());
    }

    #[test]
    fn test_parse_rejects_two_keys() {
        assert!(matches!(
            parse_key_string("a+b"),
            Err(KeymapError::InvalidKey(_))
        ));
        assert!(matches!(
            parse_key_string("ctrl+"),
            Err(KeymapError::InvalidKey(_))
        ));
        assert!(matches!(
            parse_key_string("ctrl+shift"),
            Err(KeymapError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
bindings:
  - id: save
    action: Save Document
    key: S
    modifiers:
      ctrl: true
  - id: delete
    action: Delete Item
    key: Delete
  - id: escape
    action: Cancel Operation
"#;

        let bindings = parse_bindings_yaml(yaml).unwrap();
        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings[0].id, "save");
        assert_eq!(bindings[0].default_key.as_deref(), Some("S"));
        assert!(bindings[0].default_modifiers.ctrl);
        assert!(!bindings[1].default_modifiers.ctrl);
        assert_eq!(bindings[2].default_key, None);
    }

    #[test]
    fn test_parse_yaml_duplicate_id() {
        let yaml = r#"
bindings:
  - id: save
    action: Save
  - id: save
    action: Save Again
"#;
        assert_eq!(
            parse_bindings_yaml(yaml).unwrap_err(),
            KeymapError::DuplicateId("save".to_string())
        );
    }

    #[test]
    fn test_parse_yaml_malformed() {
        assert!(matches!(
            parse_bindings_yaml("bindings: 12"),
            Err(KeymapError::ParseError(_))
        ));
    }
}
