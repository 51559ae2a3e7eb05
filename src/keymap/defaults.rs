//! Default binding configuration
//!
//! The bindings that ship with the overlay live in `bindings.yaml` at the
//! project root and are embedded at compile time. A user-supplied file,
//! either configured explicitly or found in the config directory, replaces
//! them entirely; binding changes made at runtime are never written back.

use std::path::Path;

use super::binding::BindingConfig;
use super::config::{load_bindings_file, parse_bindings_yaml};
use crate::plugin::noclip;

/// Default bindings YAML embedded at compile time
const DEFAULT_BINDINGS_YAML: &str = include_str!("../../bindings.yaml");

/// Load binding configs
///
/// Loading order:
/// 1. `path`, when given; otherwise the user's `bindings.yaml` in the
///    config directory, when it exists
/// 2. Embedded `bindings.yaml`
/// 3. Hardcoded noclip defaults
pub fn load_bindings(path: Option<&Path>) -> Vec<BindingConfig> {
    let user_file = match path {
        Some(path) => Some(path.to_path_buf()),
        None => crate::config_paths::bindings_file().filter(|p| p.exists()),
    };

    if let Some(path) = user_file {
        match load_bindings_file(&path) {
            Ok(bindings) => {
                tracing::info!(
                    "Loaded bindings from {} ({} bindings)",
                    path.display(),
                    bindings.len()
                );
                return bindings;
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load bindings from {}: {}, using defaults",
                    path.display(),
                    e
                );
            }
        }
    }

    default_bindings()
}

/// Bindings that ship with the overlay, ignoring any user file
pub fn default_bindings() -> Vec<BindingConfig> {
    match parse_bindings_yaml(DEFAULT_BINDINGS_YAML) {
        Ok(bindings) => {
            tracing::debug!("Loaded embedded default bindings ({} bindings)", bindings.len());
            bindings
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse embedded bindings: {}, using hardcoded defaults",
                e
            );
            noclip::default_bindings()
        }
    }
}
