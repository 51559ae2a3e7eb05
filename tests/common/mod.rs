//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;

use plugin_canvas::events::{ActionEvent, EventBus, Subscription, ACTION_EVENT};
use plugin_canvas::keymap::{KeyEvent, Modifiers};
use plugin_canvas::plugin::{
    AttachError, EmulatorContext, FrameHookSlot, PluginFactory, PluginHandle, PluginHost,
    PluginList, SharedMemory,
};
use plugin_canvas::viewport::{PanZoom, Point, PointerEvent, Size, WindowLayout};

// ========================================================================
// Keys
// ========================================================================

/// Key-down for a letter, e.g. `letter('s', Modifiers::CTRL)`
pub fn letter(c: char, mods: Modifiers) -> KeyEvent {
    KeyEvent::new(
        c.to_ascii_lowercase().to_string(),
        format!("Key{}", c.to_ascii_uppercase()),
        mods,
    )
}

/// Collect the binding ids published on the bus
pub fn collect_actions(bus: &EventBus<ActionEvent>) -> (Rc<RefCell<Vec<String>>>, Subscription) {
    let fired = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&fired);
    let sub = bus.subscribe(ACTION_EVENT, move |event: &ActionEvent| {
        sink.borrow_mut().push(event.binding_id.clone());
    });
    (fired, sub)
}

// ========================================================================
// Plugin host doubles
// ========================================================================

/// Plugin whose accessors only work after `init_emulator`
///
/// With `stuck` set, the accessors never become callable.
#[derive(Default)]
pub struct TestPlugin {
    pub x: Cell<i32>,
    pub y: Cell<i32>,
    pub context: Cell<Option<EmulatorContext>>,
    pub stuck: bool,
    pub hook: FrameHookSlot,
}

impl PluginHandle for TestPlugin {
    fn x(&self) -> i32 {
        self.x.get()
    }
    fn y(&self) -> i32 {
        self.y.get()
    }
    fn set_x(&self, x: i32) {
        self.x.set(x);
    }
    fn set_y(&self, y: i32) {
        self.y.set(y);
    }
    fn init_emulator(&self, context: EmulatorContext) {
        self.context.set(Some(context));
    }
    fn is_ready(&self) -> bool {
        !self.stuck && self.context.get().is_some()
    }
    fn frame_hook(&self) -> &FrameHookSlot {
        &self.hook
    }
}

#[derive(Default)]
pub struct TestFactory {
    pub instantiations: Cell<u32>,
    pub last_memory: Cell<Option<SharedMemory>>,
    /// Most recently created plugin, kept even when attachment fails
    pub last_plugin: RefCell<Option<Rc<TestPlugin>>>,
    pub fail_with: Option<String>,
    pub stuck_plugins: bool,
}

#[async_trait(?Send)]
impl PluginFactory for TestFactory {
    async fn instantiate(&self, memory: SharedMemory) -> Result<Rc<dyn PluginHandle>, AttachError> {
        self.instantiations.set(self.instantiations.get() + 1);
        self.last_memory.set(Some(memory));
        match &self.fail_with {
            Some(msg) => Err(AttachError::Factory(msg.clone())),
            None => {
                let plugin = Rc::new(TestPlugin {
                    stuck: self.stuck_plugins,
                    ..Default::default()
                });
                *self.last_plugin.borrow_mut() = Some(Rc::clone(&plugin));
                Ok(plugin)
            }
        }
    }
}

/// Host whose factory appears after `factory_after` failed checks
pub struct TestHost {
    pub factory: Rc<TestFactory>,
    pub factory_after: u32,
    pub checks: Cell<u32>,
    pub context: Option<EmulatorContext>,
    pub memory: SharedMemory,
    pub plugins: PluginList,
}

impl TestHost {
    pub fn new(factory_after: u32) -> Self {
        Self {
            factory: Rc::new(TestFactory::default()),
            factory_after,
            checks: Cell::new(0),
            context: Some(EmulatorContext(0xC0FFEE)),
            memory: SharedMemory(7),
            plugins: PluginList::new(),
        }
    }

    pub fn without_emulator(mut self) -> Self {
        self.context = None;
        self
    }

    pub fn with_factory(mut self, factory: TestFactory) -> Self {
        self.factory = Rc::new(factory);
        self
    }
}

impl PluginHost for TestHost {
    fn factory(&self) -> Option<Rc<dyn PluginFactory>> {
        let checks = self.checks.get();
        self.checks.set(checks + 1);
        if checks < self.factory_after {
            None
        } else {
            Some(Rc::clone(&self.factory) as Rc<dyn PluginFactory>)
        }
    }

    fn shared_memory(&self) -> SharedMemory {
        self.memory
    }

    fn emulator_context(&self) -> Option<EmulatorContext> {
        self.context
    }

    fn register_plugin(&self, handle: Rc<dyn PluginHandle>) {
        self.plugins.register(handle);
    }
}

// ========================================================================
// Canvas doubles
// ========================================================================

/// Pan/zoom stand-in that records what it was forwarded
#[derive(Default)]
pub struct RecordingPanZoom {
    pub calls: Vec<(&'static str, Point)>,
}

impl RecordingPanZoom {
    pub fn kinds(&self) -> Vec<&'static str> {
        self.calls.iter().map(|(kind, _)| *kind).collect()
    }
}

impl<Id> PanZoom<Id> for RecordingPanZoom {
    fn handle_down(&mut self, event: &PointerEvent<Id>) {
        self.calls.push(("down", event.pos));
    }
    fn handle_move(&mut self, event: &PointerEvent<Id>) {
        self.calls.push(("move", event.pos));
    }
    fn handle_up(&mut self, event: &PointerEvent<Id>) {
        self.calls.push(("up", event.pos));
    }
}

pub struct TestWindow {
    pub rendered: Size,
    pub layout: Size,
    pub offset: Point,
}

/// Floating windows keyed by name
#[derive(Default)]
pub struct Canvas {
    pub windows: HashMap<&'static str, TestWindow>,
}

impl Canvas {
    /// Add a window rendered at `zoom` times its layout size
    pub fn with_window(mut self, id: &'static str, layout: Size, zoom: f64) -> Self {
        self.windows.insert(
            id,
            TestWindow {
                rendered: Size::new(layout.width * zoom, layout.height * zoom),
                layout,
                offset: Point::ZERO,
            },
        );
        self
    }

    pub fn offset(&self, id: &'static str) -> Point {
        self.windows[id].offset
    }
}

impl WindowLayout<&'static str> for Canvas {
    fn rendered_size(&self, id: &&'static str) -> Option<Size> {
        self.windows.get(id).map(|w| w.rendered)
    }
    fn layout_size(&self, id: &&'static str) -> Option<Size> {
        self.windows.get(id).map(|w| w.layout)
    }
    fn offset(&self, id: &&'static str) -> Option<Point> {
        self.windows.get(id).map(|w| w.offset)
    }
    fn set_offset(&mut self, id: &&'static str, offset: Point) {
        if let Some(window) = self.windows.get_mut(id) {
            window.offset = offset;
        }
    }
}
