//! Overlay configuration persistence
//!
//! Stores user preferences in `~/.config/plugin-canvas/config.yaml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::plugin::attach::MIN_POLL_INTERVAL;
use crate::viewport::Qualifier;

/// Overlay configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Modifier that turns a pointer-down on a window into a drag
    #[serde(default)]
    pub drag_qualifier: Qualifier,
    /// Interval between plugin factory checks while attaching
    #[serde(default = "default_poll_interval_ms")]
    pub attach_poll_interval_ms: u64,
    /// User bindings file; the embedded defaults are used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bindings_file: Option<PathBuf>,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            drag_qualifier: Qualifier::default(),
            attach_poll_interval_ms: default_poll_interval_ms(),
            bindings_file: None,
        }
    }
}

impl OverlayConfig {
    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`; a missing or invalid file yields defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.attach_poll_interval_ms).max(MIN_POLL_INTERVAL)
    }
}
