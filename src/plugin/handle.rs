//! The narrow capability interface a plugin exposes to the host

use std::cell::RefCell;
use std::fmt;

/// Opaque handle to the host's shared plugin memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedMemory(pub u64);

/// Opaque emulator context pointer handed to plugins on init
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmulatorContext(pub usize);

/// Callback invoked once per rendered frame
pub type FrameHook = Box<dyn FnMut()>;

/// Writable per-frame hook slot on a plugin handle
///
/// The attachment protocol installs the hook; the host's render loop (not
/// this crate) calls [`FrameHookSlot::run`] once per frame.
#[derive(Default)]
pub struct FrameHookSlot {
    hook: RefCell<Option<FrameHook>>,
}

impl FrameHookSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self, hook: FrameHook) {
        *self.hook.borrow_mut() = Some(hook);
    }

    pub fn clear(&self) {
        self.hook.borrow_mut().take();
    }

    pub fn is_installed(&self) -> bool {
        self.hook.borrow().is_some()
    }

    /// Run the hook, if any; returns whether it ran
    pub fn run(&self) -> bool {
        match self.hook.try_borrow_mut() {
            Ok(mut hook) => match hook.as_mut() {
                Some(hook) => {
                    hook();
                    true
                }
                None => false,
            },
            Err(_) => {
                tracing::warn!("Frame hook re-entered; skipping");
                false
            }
        }
    }
}

impl fmt::Debug for FrameHookSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameHookSlot")
            .field("installed", &self.is_installed())
            .finish()
    }
}

/// An attached plugin as seen by the host
///
/// Only the fields the overlay consumes: two axis accessors each, emulator
/// init, and the frame hook slot.
pub trait PluginHandle {
    fn x(&self) -> i32;
    fn y(&self) -> i32;
    fn set_x(&self, x: i32);
    fn set_y(&self, y: i32);

    fn init_emulator(&self, context: EmulatorContext);

    /// Whether the position accessors can be called yet
    fn is_ready(&self) -> bool {
        true
    }

    fn frame_hook(&self) -> &FrameHookSlot;
}

/// Text element the frame hook writes the plugin position into
pub trait DisplaySink {
    fn set_text(&self, text: &str);
}

impl DisplaySink for RefCell<String> {
    fn set_text(&self, text: &str) {
        let mut current = self.borrow_mut();
        current.clear();
        current.push_str(text);
    }
}

/// Format a plugin position the way the overlay displays it
pub fn format_position(x: i32, y: i32) -> String {
    format!("({}, {})", x, y)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_hook_slot_runs_installed_hook() {
        let slot = FrameHookSlot::new();
        assert!(!slot.run());

        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        slot.install(Box::new(move || *counter.borrow_mut() += 1));

        assert!(slot.is_installed());
        assert!(slot.run());
        assert!(slot.run());
        assert_eq!(*count.borrow(), 2);

        slot.clear();
        assert!(!slot.run());
    }

    #[test]
    fn test_display_sink_replaces_text() {
        let sink = RefCell::new("old".to_string());
        sink.set_text(&format_position(3, -4));
        assert_eq!(*sink.borrow(), "(3, -4)");
    }
}
