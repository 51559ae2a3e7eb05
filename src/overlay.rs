//! The overlay facade a host embeds
//!
//! Wires the keyboard side (binders, recording lock, dispatch listener, action
//! bus) and the pointer side (viewport router) behind one object. Hosts feed
//! raw key and pointer events in; plugins subscribe to the bus.

use std::fmt::Debug;

use crate::config::OverlayConfig;
use crate::events::{ActionEvent, EventBus};
use crate::input::EventResult;
use crate::keymap::{
    load_bindings, BindingConfig, DispatchListener, KeyEvent, KeyboardBinder, KeymapError,
    RecordingLock,
};
use crate::viewport::{PanZoom, PointerEvent, PointerRoute, ViewportRouter, WindowLayout};

/// Name the built-in noclip plugin's binder is registered under
pub const NOCLIP_PLUGIN: &str = "noclip";

#[derive(Debug)]
pub struct Overlay<Id> {
    bus: EventBus<ActionEvent>,
    lock: RecordingLock,
    binders: Vec<(String, KeyboardBinder)>,
    active: Option<usize>,
    dispatch: DispatchListener,
    router: ViewportRouter<Id>,
}

impl<Id: Clone + Debug> Overlay<Id> {
    /// An overlay with no plugins registered
    pub fn new(config: &OverlayConfig) -> Self {
        let bus = EventBus::new();
        Self {
            dispatch: DispatchListener::new(bus.clone()),
            bus,
            lock: RecordingLock::new(),
            binders: Vec::new(),
            active: None,
            router: ViewportRouter::new(config.drag_qualifier),
        }
    }

    /// An overlay with the noclip plugin's bindings loaded and active
    pub fn from_config(config: &OverlayConfig) -> Result<Self, KeymapError> {
        let mut overlay = Self::new(config);
        let bindings = load_bindings(config.bindings_file.as_deref());
        overlay.add_plugin(NOCLIP_PLUGIN, &bindings)?;
        Ok(overlay)
    }

    /// Register a plugin's bindings; the first plugin becomes active
    pub fn add_plugin(
        &mut self,
        name: impl Into<String>,
        configs: &[BindingConfig],
    ) -> Result<&mut KeyboardBinder, KeymapError> {
        let name = name.into();
        let binder = KeyboardBinder::new(configs, self.lock.clone())?;
        tracing::debug!("Registered plugin {} with {} bindings", name, configs.len());

        let index = match self.binders.iter().position(|(n, _)| *n == name) {
            Some(index) => {
                self.binders[index].1 = binder;
                index
            }
            None => {
                self.binders.push((name, binder));
                self.binders.len() - 1
            }
        };
        if self.active.is_none() {
            self.active = Some(index);
        }
        self.sync_dispatch();

        Ok(&mut self.binders[index].1)
    }

    /// Make `name`'s bindings the ones dispatched; false for unknown plugins
    pub fn set_active(&mut self, name: &str) -> bool {
        match self.binders.iter().position(|(n, _)| n == name) {
            Some(index) => {
                self.active = Some(index);
                self.sync_dispatch();
                true
            }
            None => {
                tracing::warn!("Cannot activate unknown plugin {}", name);
                false
            }
        }
    }

    pub fn active_plugin(&self) -> Option<&str> {
        self.active.map(|i| self.binders[i].0.as_str())
    }

    pub fn binder(&self, name: &str) -> Option<&KeyboardBinder> {
        self.binders
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, binder)| binder)
    }

    pub fn bus(&self) -> &EventBus<ActionEvent> {
        &self.bus
    }

    pub fn recording_lock(&self) -> &RecordingLock {
        &self.lock
    }

    pub fn dispatch(&self) -> &DispatchListener {
        &self.dispatch
    }

    pub fn router(&self) -> &ViewportRouter<Id> {
        &self.router
    }

    /// Start recording a plugin's slot; false if unknown or another slot holds the lock
    pub fn start_recording(&mut self, plugin: &str, id: &str) -> bool {
        match self.binders.iter_mut().find(|(n, _)| n == plugin) {
            Some((_, binder)) => binder.start_recording(id),
            None => false,
        }
    }

    pub fn cancel_recording(&mut self) {
        for (_, binder) in &mut self.binders {
            binder.cancel_recording();
        }
    }

    /// Unbind a plugin's slot
    pub fn clear_binding(&mut self, plugin: &str, id: &str) -> bool {
        let cleared = match self.binders.iter_mut().find(|(n, _)| n == plugin) {
            Some((_, binder)) => binder.clear(id).is_some(),
            None => false,
        };
        self.sync_dispatch();
        cleared
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        for (_, binder) in &mut self.binders {
            binder.set_disabled(disabled);
        }
    }

    /// Route a key-down: a recording binder captures it, otherwise dispatch
    pub fn key_down(&mut self, event: &KeyEvent) -> EventResult {
        if let Some((_, binder)) = self.binders.iter_mut().find(|(_, b)| b.is_recording()) {
            let result = binder.handle_key(event);
            self.sync_dispatch();
            return result;
        }
        self.dispatch.handle_key(event)
    }

    fn sync_dispatch(&mut self) {
        match self.active.and_then(|i| self.binders.get(i)) {
            Some((_, binder)) => {
                self.dispatch.sync(binder.registry());
            }
            None => self.dispatch.detach(),
        }
    }

    pub fn pointer_down(
        &mut self,
        event: &PointerEvent<Id>,
        pan_zoom: &mut impl PanZoom<Id>,
    ) -> PointerRoute {
        self.router.pointer_down(event, pan_zoom)
    }

    pub fn pointer_move(
        &mut self,
        event: &PointerEvent<Id>,
        layout: &mut impl WindowLayout<Id>,
        pan_zoom: &mut impl PanZoom<Id>,
    ) -> PointerRoute {
        self.router.pointer_move(event, layout, pan_zoom)
    }

    pub fn pointer_up(
        &mut self,
        event: &PointerEvent<Id>,
        pan_zoom: &mut impl PanZoom<Id>,
    ) -> PointerRoute {
        self.router.pointer_up(event, pan_zoom)
    }
}
