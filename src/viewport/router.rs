//! Viewport interaction router
//!
//! Every pointer-down is classified once:
//! - qualifier modifier held over a window → drag that window
//! - anything else → forwarded to the pan/zoom handler
//!
//! The rest of the gesture follows that decision until pointer-up. Only one
//! drag session exists at a time; a second pointer-down while a window is
//! being dragged is rejected (multi-pointer gestures are not supported).

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use super::geometry::{scale_ratio, Point, Size};
use crate::keymap::Modifiers;

/// The modifier that turns a canvas gesture into a window drag
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Qualifier {
    #[default]
    Ctrl,
    Shift,
    Alt,
    Meta,
}

impl Qualifier {
    pub fn modifier(self) -> Modifiers {
        match self {
            Qualifier::Ctrl => Modifiers::CTRL,
            Qualifier::Shift => Modifiers::SHIFT,
            Qualifier::Alt => Modifiers::ALT,
            Qualifier::Meta => Modifiers::META,
        }
    }

    /// True when the qualifier is down, whatever else is held with it
    pub fn is_held(self, mods: Modifiers) -> bool {
        mods.contains(self.modifier())
    }
}

/// A pointer event in screen space
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent<Id> {
    pub pos: Point,
    pub mods: Modifiers,
    /// Window under the pointer, `None` for bare canvas
    pub target: Option<Id>,
}

impl<Id> PointerEvent<Id> {
    pub fn new(x: f64, y: f64, mods: Modifiers, target: Option<Id>) -> Self {
        Self {
            pos: Point::new(x, y),
            mods,
            target,
        }
    }
}

/// The external pan/zoom implementation
pub trait PanZoom<Id> {
    fn handle_down(&mut self, event: &PointerEvent<Id>);
    fn handle_move(&mut self, event: &PointerEvent<Id>);
    fn handle_up(&mut self, event: &PointerEvent<Id>);
}

/// Layout access for floating windows on the canvas
pub trait WindowLayout<Id> {
    /// On-screen bounding box size, after ancestor transforms
    fn rendered_size(&self, id: &Id) -> Option<Size>;
    /// Unscaled layout size
    fn layout_size(&self, id: &Id) -> Option<Size>;
    fn offset(&self, id: &Id) -> Option<Point>;
    fn set_offset(&mut self, id: &Id, offset: Point);
}

/// How a pointer event was routed
#[derive(Clone, Debug, PartialEq)]
pub enum PointerRoute {
    /// Forwarded to the pan/zoom handler
    PanZoom,
    /// A window drag session started
    DragStarted,
    /// The dragged window moved by `delta` layout units
    Dragged { delta: Point },
    /// The drag session ended (pointer-up or qualifier released)
    DragEnded,
    /// Ignored: a drag session already owns the pointer
    Rejected,
}

/// Active window drag
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession<Id> {
    pub target: Id,
    /// `None` until a position is known; the first move then yields no delta
    pub last_pos: Option<Point>,
}

/// Process-wide pointer router
#[derive(Debug)]
pub struct ViewportRouter<Id> {
    qualifier: Qualifier,
    drag: Option<DragSession<Id>>,
}

impl<Id: Clone + Debug> ViewportRouter<Id> {
    pub fn new(qualifier: Qualifier) -> Self {
        Self {
            qualifier,
            drag: None,
        }
    }

    pub fn qualifier(&self) -> Qualifier {
        self.qualifier
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_target(&self) -> Option<&Id> {
        self.drag.as_ref().map(|d| &d.target)
    }

    pub fn drag_session(&self) -> Option<&DragSession<Id>> {
        self.drag.as_ref()
    }

    pub fn pointer_down(
        &mut self,
        event: &PointerEvent<Id>,
        pan_zoom: &mut impl PanZoom<Id>,
    ) -> PointerRoute {
        if let Some(drag) = &self.drag {
            tracing::debug!(window = ?drag.target, "Pointer down rejected during window drag");
            return PointerRoute::Rejected;
        }

        match (&event.target, self.qualifier.is_held(event.mods)) {
            (Some(target), true) => {
                tracing::debug!(window = ?target, "Window drag started");
                self.drag = Some(DragSession {
                    target: target.clone(),
                    last_pos: Some(event.pos),
                });
                PointerRoute::DragStarted
            }
            _ => {
                pan_zoom.handle_down(event);
                PointerRoute::PanZoom
            }
        }
    }

    pub fn pointer_move(
        &mut self,
        event: &PointerEvent<Id>,
        layout: &mut impl WindowLayout<Id>,
        pan_zoom: &mut impl PanZoom<Id>,
    ) -> PointerRoute {
        let Some(drag) = self.drag.as_mut() else {
            pan_zoom.handle_move(event);
            return PointerRoute::PanZoom;
        };

        if !self.qualifier.is_held(event.mods) {
            tracing::debug!(window = ?drag.target, "Qualifier released, ending window drag");
            self.drag = None;
            pan_zoom.handle_move(event);
            return PointerRoute::DragEnded;
        }

        let screen_delta = match drag.last_pos {
            Some(last) => event.pos - last,
            None => Point::ZERO,
        };
        drag.last_pos = Some(event.pos);

        let delta = match (layout.rendered_size(&drag.target), layout.layout_size(&drag.target)) {
            (Some(rendered), Some(unscaled)) => {
                let (sx, sy) = scale_ratio(rendered, unscaled);
                screen_delta.scale(sx, sy)
            }
            _ => screen_delta,
        };

        let offset = layout.offset(&drag.target).unwrap_or_default();
        layout.set_offset(&drag.target, offset + delta);
        tracing::trace!(window = ?drag.target, dx = delta.x, dy = delta.y, "Window dragged");

        PointerRoute::Dragged { delta }
    }

    /// End the gesture; always forwarded to pan/zoom
    pub fn pointer_up(
        &mut self,
        event: &PointerEvent<Id>,
        pan_zoom: &mut impl PanZoom<Id>,
    ) -> PointerRoute {
        let ended = self.drag.take();
        pan_zoom.handle_up(event);

        match ended {
            Some(drag) => {
                tracing::debug!(window = ?drag.target, "Window drag ended");
                PointerRoute::DragEnded
            }
            None => PointerRoute::PanZoom,
        }
    }
}
