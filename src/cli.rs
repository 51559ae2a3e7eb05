//! Command-line interface for inspecting bindings
//!
//! Supports:
//! - Listing resolved bindings and collisions
//! - Printing the canonical label of a key event
//! - Dry-running dispatch for key strings

use std::cell::RefCell;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::OverlayConfig;
use crate::events::{ActionEvent, EventBus, ACTION_EVENT};
use crate::keymap::{
    is_modifier_key, load_bindings, load_bindings_file, normalize, parse_key_string,
    BindingConfig, BindingRegistry, DispatchListener, KeyEvent, Modifiers,
};

/// Keyboard bindings and pointer routing for canvas plugins
#[derive(Parser, Debug)]
#[command(name = "plugin-canvas", version, about)]
pub struct CliArgs {
    /// Config file (defaults to ~/.config/plugin-canvas/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List resolved bindings and any collisions
    Bindings {
        /// Bindings file (defaults to the configured or built-in bindings)
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the canonical label for a key event
    Normalize {
        /// Physical key code (KeyS, Digit1, ArrowUp, ...)
        #[arg(long)]
        code: String,
        /// Logical key name (defaults to one derived from the code)
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        ctrl: bool,
        #[arg(long)]
        shift: bool,
        #[arg(long)]
        alt: bool,
        #[arg(long)]
        meta: bool,
    },
    /// Show which binding each key string would fire
    Dispatch {
        /// Bindings file (defaults to the configured or built-in bindings)
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
        /// Key strings such as "i" or "ctrl+shift+s"
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

impl CliArgs {
    pub fn overlay_config(&self) -> OverlayConfig {
        match &self.config {
            Some(path) => OverlayConfig::load_from(path),
            None => OverlayConfig::load(),
        }
    }
}

/// Run a parsed command, returning what it prints
pub fn run(args: &CliArgs) -> Result<String> {
    let config = args.overlay_config();
    match &args.command {
        Command::Bindings { file, json } => {
            let configs = resolve_bindings(file.as_deref(), &config)?;
            bindings_report(&configs, *json)
        }
        Command::Normalize {
            code,
            key,
            ctrl,
            shift,
            alt,
            meta,
        } => {
            let mods = Modifiers::new(*ctrl, *shift, *alt, *meta);
            let key = key.clone().unwrap_or_else(|| logical_key(code));
            Ok(normalize_report(&KeyEvent::new(key, code.as_str(), mods)))
        }
        Command::Dispatch { file, keys } => {
            let configs = resolve_bindings(file.as_deref(), &config)?;
            dispatch_report(&configs, keys)
        }
    }
}

/// An explicit file must load; otherwise fall back through config and defaults
fn resolve_bindings(file: Option<&Path>, config: &OverlayConfig) -> Result<Vec<BindingConfig>> {
    match file {
        Some(path) => load_bindings_file(path)
            .with_context(|| format!("Failed to load bindings from {}", path.display())),
        None => Ok(load_bindings(config.bindings_file.as_deref())),
    }
}

/// "ShiftLeft" → "Shift"; other codes stand in for their own key name
fn logical_key(code: &str) -> String {
    let base = code
        .strip_suffix("Left")
        .or_else(|| code.strip_suffix("Right"))
        .unwrap_or(code);
    if is_modifier_key(base) {
        base.to_string()
    } else {
        code.to_string()
    }
}

#[derive(Serialize)]
struct BindingListing {
    bindings: Vec<ListedBinding>,
    collisions: Vec<ListedCollision>,
}

#[derive(Serialize)]
struct ListedBinding {
    id: String,
    action: String,
    combination: Option<String>,
}

#[derive(Serialize)]
struct ListedCollision {
    combination: String,
    slots: Vec<String>,
    winner: String,
}

pub fn bindings_report(configs: &[BindingConfig], json: bool) -> Result<String> {
    let registry = BindingRegistry::new(configs)?;

    let listing = BindingListing {
        bindings: registry
            .slots()
            .iter()
            .map(|slot| ListedBinding {
                id: slot.id.clone(),
                action: slot.action.clone(),
                combination: slot
                    .combination
                    .is_set()
                    .then(|| slot.combination.to_string()),
            })
            .collect(),
        collisions: registry
            .collisions()
            .into_iter()
            .map(|c| ListedCollision {
                combination: c.combination.to_string(),
                winner: c.winner().to_string(),
                slots: c.slot_ids,
            })
            .collect(),
    };

    if json {
        return Ok(serde_json::to_string_pretty(&listing)?);
    }

    let id_width = listing
        .bindings
        .iter()
        .map(|b| b.id.len())
        .max()
        .unwrap_or(0);
    let action_width = listing
        .bindings
        .iter()
        .map(|b| b.action.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for binding in &listing.bindings {
        writeln!(
            out,
            "{:id_width$}  {:action_width$}  {}",
            binding.id,
            binding.action,
            binding.combination.as_deref().unwrap_or("Not set"),
        )?;
    }
    for collision in &listing.collisions {
        writeln!(
            out,
            "collision: {} bound to {} ({} wins)",
            collision.combination,
            collision.slots.join(", "),
            collision.winner,
        )?;
    }
    Ok(out)
}

pub fn normalize_report(event: &KeyEvent) -> String {
    match normalize(event) {
        Some(combination) => combination.to_string(),
        None => "(modifier only)".to_string(),
    }
}

pub fn dispatch_report(configs: &[BindingConfig], keys: &[String]) -> Result<String> {
    let registry = BindingRegistry::new(configs)?;
    let bus = EventBus::new();
    let mut listener = DispatchListener::new(bus.clone());
    listener.sync(&registry);

    let fired: Rc<RefCell<Option<ActionEvent>>> = Rc::default();
    let sink = Rc::clone(&fired);
    let _subscription = bus.subscribe(ACTION_EVENT, move |event: &ActionEvent| {
        *sink.borrow_mut() = Some(event.clone());
    });

    let mut out = String::new();
    for key in keys {
        let event = parse_key_string(key)?;
        listener.handle_key(&event);
        match fired.borrow_mut().take() {
            Some(action) => writeln!(out, "{} -> {} ({})", key, action.binding_id, action.action)?,
            None => writeln!(out, "{} -> (unbound)", key)?,
        }
    }
    Ok(out)
}
