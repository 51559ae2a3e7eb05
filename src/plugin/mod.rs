//! Plugin attachment and the noclip movement plugin

pub mod attach;
pub mod handle;
pub mod host;
pub mod noclip;

pub use attach::{AttachError, AttachState, Attachment, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
pub use handle::{
    format_position, DisplaySink, EmulatorContext, FrameHook, FrameHookSlot, PluginHandle,
    SharedMemory,
};
pub use host::{PluginFactory, PluginHost, PluginList};
pub use noclip::NoclipController;
