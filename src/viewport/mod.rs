//! Pointer routing for the pan/zoom canvas and its floating plugin windows

pub mod geometry;
pub mod router;

pub use geometry::{scale_ratio, Point, Size};
pub use router::{
    DragSession, PanZoom, PointerEvent, PointerRoute, Qualifier, ViewportRouter, WindowLayout,
};
