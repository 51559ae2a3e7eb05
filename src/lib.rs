//! plugin-canvas - keyboard bindings and pointer routing for canvas plugins
//!
//! This crate provides the input layer for plugins that live in floating
//! windows on a pan/zoom canvas: configurable key bindings with live
//! recording, action dispatch over an event bus, drag-vs-pan pointer routing,
//! and the protocol that attaches a plugin to a running emulator.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod events;
pub mod input;
pub mod keymap;
pub mod overlay;
pub mod plugin;
pub mod tracing;
pub mod viewport;

// Re-export commonly used types
pub use config::OverlayConfig;
pub use events::{ActionEvent, EventBus, ACTION_EVENT};
pub use input::EventResult;
pub use overlay::Overlay;
