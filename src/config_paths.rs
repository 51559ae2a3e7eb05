//! Centralized configuration paths for plugin-canvas
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/plugin-canvas/`
//! - Windows: `%APPDATA%\plugin-canvas\`

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "plugin-canvas";

/// Prefix of the daily-rotated log files (`overlay.log.YYYY-MM-DD`)
pub const LOG_FILE_PREFIX: &str = "overlay.log";

/// Base config directory for plugin-canvas
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/plugin-canvas`
///   - Else: `~/.config/plugin-canvas`
///
/// Windows:
///   - `%APPDATA%\plugin-canvas`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/plugin-canvas/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/plugin-canvas/bindings.yaml`
pub fn bindings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("bindings.yaml"))
}

/// `~/.config/plugin-canvas/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&logs)?;
    Ok(logs)
}
