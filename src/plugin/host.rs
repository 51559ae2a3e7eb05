//! Host-side contracts for plugin attachment

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;

use super::attach::AttachError;
use super::handle::{EmulatorContext, PluginHandle, SharedMemory};

/// Host-injected plugin constructor
#[async_trait(?Send)]
pub trait PluginFactory {
    /// Instantiate the plugin against the host's shared memory
    async fn instantiate(&self, memory: SharedMemory) -> Result<Rc<dyn PluginHandle>, AttachError>;
}

/// What the host environment exposes to the attachment protocol
pub trait PluginHost {
    /// The plugin factory, once the plugin's runtime has loaded
    fn factory(&self) -> Option<Rc<dyn PluginFactory>>;

    fn shared_memory(&self) -> SharedMemory;

    /// The running emulator's context, if an emulator is running
    fn emulator_context(&self) -> Option<EmulatorContext>;

    /// Make the handle discoverable by other subsystems
    fn register_plugin(&self, handle: Rc<dyn PluginHandle>);
}

/// The host's global list of attached plugins
#[derive(Default)]
pub struct PluginList {
    handles: RefCell<Vec<Rc<dyn PluginHandle>>>,
}

impl PluginList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handle: Rc<dyn PluginHandle>) {
        self.handles.borrow_mut().push(handle);
    }

    pub fn len(&self) -> usize {
        self.handles.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rc<dyn PluginHandle>> {
        self.handles.borrow().get(index).cloned()
    }

    /// Render-loop entry point: run every installed frame hook once
    ///
    /// Returns the number of hooks that ran.
    pub fn run_frame_hooks(&self) -> usize {
        // Snapshot so a hook may register further plugins
        let handles: Vec<_> = self.handles.borrow().clone();
        handles
            .iter()
            .filter(|handle| handle.frame_hook().run())
            .count()
    }
}

impl std::fmt::Debug for PluginList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginList")
            .field("len", &self.len())
            .finish()
    }
}
