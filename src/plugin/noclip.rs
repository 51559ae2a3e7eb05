//! Noclip movement: moves the attached plugin in fixed steps when its
//! bindings fire

use std::rc::{Rc, Weak};

use crate::events::{ActionEvent, EventBus, Subscription, ACTION_EVENT};
use crate::keymap::BindingConfig;

use super::handle::PluginHandle;

pub const MOVE_UP: &str = "move-up";
pub const MOVE_RIGHT: &str = "move-right";
pub const MOVE_LEFT: &str = "move-left";
pub const MOVE_DOWN: &str = "move-down";

/// Units moved per triggered binding
pub const STEP: i32 = 100;

/// Built-in movement bindings (I/J/K/L)
pub fn default_bindings() -> Vec<BindingConfig> {
    vec![
        BindingConfig::new(MOVE_UP, "Move Up").key("I"),
        BindingConfig::new(MOVE_RIGHT, "Move Right").key("L"),
        BindingConfig::new(MOVE_LEFT, "Move Left").key("J"),
        BindingConfig::new(MOVE_DOWN, "Move Down").key("K"),
    ]
}

/// Apply one movement binding to a plugin; false for ids it doesn't own
pub fn apply(handle: &dyn PluginHandle, binding_id: &str) -> bool {
    match binding_id {
        MOVE_UP => handle.set_y(handle.y().saturating_sub(STEP)),
        MOVE_DOWN => handle.set_y(handle.y().saturating_add(STEP)),
        MOVE_LEFT => handle.set_x(handle.x().saturating_sub(STEP)),
        MOVE_RIGHT => handle.set_x(handle.x().saturating_add(STEP)),
        _ => return false,
    }
    true
}

/// Bridges action events to the plugin handle
///
/// Holds the handle weakly; once the plugin is gone, events are ignored.
/// Dropping the controller unsubscribes it.
#[derive(Debug)]
pub struct NoclipController {
    subscription: Subscription,
}

impl NoclipController {
    pub fn subscribe(bus: &EventBus<ActionEvent>, handle: &Rc<dyn PluginHandle>) -> Self {
        let weak: Weak<dyn PluginHandle> = Rc::downgrade(handle);
        let subscription = bus.subscribe(ACTION_EVENT, move |event: &ActionEvent| {
            let Some(handle) = weak.upgrade() else {
                tracing::trace!("Plugin dropped; ignoring {}", event.binding_id);
                return;
            };
            if apply(handle.as_ref(), &event.binding_id) {
                tracing::debug!(
                    "{} -> plugin at ({}, {})",
                    event.binding_id,
                    handle.x(),
                    handle.y()
                );
            }
        });
        Self { subscription }
    }

    pub fn detach(self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::plugin::handle::{EmulatorContext, FrameHookSlot};

    #[derive(Default)]
    struct Dummy {
        x: Cell<i32>,
        y: Cell<i32>,
        hook: FrameHookSlot,
    }

    impl PluginHandle for Dummy {
        fn x(&self) -> i32 {
            self.x.get()
        }
        fn y(&self) -> i32 {
            self.y.get()
        }
        fn set_x(&self, x: i32) {
            self.x.set(x)
        }
        fn set_y(&self, y: i32) {
            self.y.set(y)
        }
        fn init_emulator(&self, _context: EmulatorContext) {}
        fn frame_hook(&self) -> &FrameHookSlot {
            &self.hook
        }
    }

    fn event(id: &str) -> ActionEvent {
        ActionEvent {
            binding_id: id.to_string(),
            action: String::new(),
        }
    }

    #[test]
    fn test_apply_moves_by_step() {
        let dummy = Dummy::default();
        assert!(apply(&dummy, MOVE_UP));
        assert_eq!((dummy.x(), dummy.y()), (0, -STEP));
        assert!(apply(&dummy, MOVE_RIGHT));
        assert!(apply(&dummy, MOVE_RIGHT));
        assert_eq!((dummy.x(), dummy.y()), (2 * STEP, -STEP));
        assert!(apply(&dummy, MOVE_DOWN));
        assert!(apply(&dummy, MOVE_LEFT));
        assert_eq!((dummy.x(), dummy.y()), (STEP, 0));
        assert!(!apply(&dummy, "jump"));
    }

    #[test]
    fn test_apply_saturates_at_coordinate_limits() {
        let dummy = Dummy::default();
        dummy.set_x(i32::MAX - 1);
        dummy.set_y(i32::MIN + 1);

        assert!(apply(&dummy, MOVE_RIGHT));
        assert!(apply(&dummy, MOVE_UP));
        assert_eq!((dummy.x(), dummy.y()), (i32::MAX, i32::MIN));
    }

    #[test]
    fn test_controller_follows_bus() {
        let bus = EventBus::new();
        let handle: Rc<dyn PluginHandle> = Rc::new(Dummy::default());
        let controller = NoclipController::subscribe(&bus, &handle);

        bus.publish(ACTION_EVENT, &event(MOVE_DOWN));
        assert_eq!(handle.y(), STEP);

        controller.detach();
        bus.publish(ACTION_EVENT, &event(MOVE_DOWN));
        assert_eq!(handle.y(), STEP);
    }

    #[test]
    fn test_controller_ignores_dropped_plugin() {
        let bus = EventBus::new();
        let handle: Rc<dyn PluginHandle> = Rc::new(Dummy::default());
        let _controller = NoclipController::subscribe(&bus, &handle);
        drop(handle);

        assert_eq!(bus.publish(ACTION_EVENT, &event(MOVE_UP)), 1);
    }

    #[test]
    fn test_default_bindings_use_ijkl() {
        let keys: Vec<_> = default_bindings()
            .into_iter()
            .map(|b| b.default_key.unwrap_or_default())
            .collect();
        assert_eq!(keys, ["I", "L", "J", "K"]);
    }
}
