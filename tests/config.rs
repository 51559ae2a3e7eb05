//! Configuration system tests
//!
//! Tests for config paths, overlay config, and binding file loading.

use std::time::Duration;

use plugin_canvas::config_paths;
use plugin_canvas::keymap::{load_bindings_file, parse_bindings_yaml, KeymapError, Modifiers};
use plugin_canvas::viewport::Qualifier;
use plugin_canvas::OverlayConfig;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("plugin-canvas"));
    }
}

#[test]
fn test_config_file_ends_with_yaml() {
    if let Some(path) = config_paths::config_file() {
        assert!(path.to_string_lossy().ends_with("config.yaml"));
    }
}

#[test]
fn test_logs_dir_is_under_config_dir() {
    if let (Some(config), Some(logs)) = (config_paths::config_dir(), config_paths::logs_dir()) {
        assert!(logs.starts_with(config));
    }
}

// ========================================================================
// Overlay Config Tests
// ========================================================================

#[test]
fn test_missing_config_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = OverlayConfig::load_from(&dir.path().join("config.yaml"));
    assert_eq!(config, OverlayConfig::default());
}

#[test]
fn test_invalid_config_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "drag_qualifier: [hyper").unwrap();

    assert_eq!(OverlayConfig::load_from(&path), OverlayConfig::default());
}

#[test]
fn test_unknown_qualifier_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "drag_qualifier: hyper\n").unwrap();

    assert_eq!(OverlayConfig::load_from(&path).drag_qualifier, Qualifier::Ctrl);
}

#[test]
fn test_config_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");
    let config = OverlayConfig {
        drag_qualifier: Qualifier::Meta,
        attach_poll_interval_ms: 250,
        bindings_file: Some(dir.path().join("bindings.yaml")),
    };

    config.save_to(&path).unwrap();
    let loaded = OverlayConfig::load_from(&path);

    assert_eq!(loaded, config);
    assert_eq!(loaded.poll_interval(), Duration::from_millis(250));
}

// ========================================================================
// Binding File Tests
// ========================================================================

#[test]
fn test_load_bindings_file_with_modifiers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bindings.yaml");
    std::fs::write(
        &path,
        r#"
bindings:
  - id: save
    action: Save
    key: S
    modifiers: { ctrl: true, shift: true }
  - id: unbound
    action: Not Bound Yet
"#,
    )
    .unwrap();

    let bindings = load_bindings_file(&path).unwrap();
    assert_eq!(bindings.len(), 2);

    let save = bindings[0].resolve();
    assert_eq!(save.combination.mods, Modifiers::CTRL | Modifiers::SHIFT);
    assert_eq!(save.display_string(), "Ctrl + Shift + S");
    assert!(!bindings[1].resolve().combination.is_set());
}

#[test]
fn test_missing_bindings_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_bindings_file(&dir.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(err, KeymapError::IoError(_)));
}

#[test]
fn test_duplicate_binding_ids_rejected() {
    let yaml = "bindings:\n  - { id: a, action: A }\n  - { id: a, action: Again }\n";
    assert!(matches!(
        parse_bindings_yaml(yaml),
        Err(KeymapError::DuplicateId(_))
    ));
}
