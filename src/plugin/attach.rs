//! One-shot plugin attachment
//!
//! Polls the host until the plugin factory appears, instantiates the plugin,
//! initializes it against the running emulator, wires the per-frame position
//! display, and registers the handle with the host.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::handle::{format_position, DisplaySink, PluginHandle};
use super::host::PluginHost;

/// Default interval between factory availability checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Shortest accepted poll interval; `tokio::time::interval` rejects zero
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Observable progress of an attachment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AttachState {
    #[default]
    NotAttached,
    /// Factory not yet present after this many checks
    Waiting { attempts: u32 },
    Attached,
    Failed(String),
    Cancelled,
}

impl AttachState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AttachState::Attached | AttachState::Failed(_) | AttachState::Cancelled
        )
    }
}

/// Errors that end an attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachError {
    Cancelled,
    /// No emulator is running to initialize the plugin against
    MissingEmulatorContext,
    /// The plugin's position accessors never became callable
    AccessorsUnavailable,
    /// The factory failed to instantiate the plugin
    Factory(String),
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachError::Cancelled => write!(f, "Attachment cancelled"),
            AttachError::MissingEmulatorContext => {
                write!(f, "No emulator context available for plugin init")
            }
            AttachError::AccessorsUnavailable => {
                write!(f, "Plugin position accessors are not available")
            }
            AttachError::Factory(msg) => write!(f, "Plugin factory failed: {}", msg),
        }
    }
}

impl std::error::Error for AttachError {}

/// A single attachment attempt
///
/// [`Attachment::run`] consumes the attachment, so each one produces at most
/// one plugin handle.
pub struct Attachment {
    poll_interval: Duration,
    display: Option<Rc<dyn DisplaySink>>,
    state: watch::Sender<AttachState>,
}

impl Attachment {
    /// Intervals below [`MIN_POLL_INTERVAL`] are raised to it
    pub fn new(poll_interval: Duration) -> Self {
        let (state, _) = watch::channel(AttachState::NotAttached);
        Self {
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
            display: None,
            state,
        }
    }

    /// Text element the frame hook writes "(x, y)" into
    pub fn with_display(mut self, display: Rc<dyn DisplaySink>) -> Self {
        self.display = Some(display);
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn state(&self) -> AttachState {
        self.state.borrow().clone()
    }

    /// Watch state transitions; the last state stays readable after `run` ends
    pub fn subscribe(&self) -> watch::Receiver<AttachState> {
        self.state.subscribe()
    }

    fn set_state(&self, state: AttachState) {
        self.state.send_replace(state);
    }

    fn fail(&self, err: AttachError) -> AttachError {
        tracing::error!("Plugin attachment failed: {}", err);
        self.set_state(AttachState::Failed(err.to_string()));
        err
    }

    fn cancelled(&self) -> AttachError {
        tracing::info!("Plugin attachment cancelled");
        self.set_state(AttachState::Cancelled);
        AttachError::Cancelled
    }

    /// Drive the attachment to completion
    pub async fn run<H>(
        self,
        host: &H,
        cancel: &CancellationToken,
    ) -> Result<Rc<dyn PluginHandle>, AttachError>
    where
        H: PluginHost + ?Sized,
    {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut attempts: u32 = 0;
        let factory = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(self.cancelled()),
                _ = ticker.tick() => {}
            }

            attempts += 1;
            if let Some(factory) = host.factory() {
                tracing::debug!("Plugin factory available after {} checks", attempts);
                break factory;
            }

            if attempts == 1 {
                tracing::info!(
                    "Waiting for plugin factory (polling every {:?})",
                    self.poll_interval
                );
            } else {
                tracing::trace!("Plugin factory still missing after {} checks", attempts);
            }
            self.set_state(AttachState::Waiting { attempts });
        };

        let memory = host.shared_memory();
        let instantiated = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(self.cancelled()),
            result = factory.instantiate(memory) => result,
        };
        let handle = instantiated.map_err(|err| self.fail(err))?;

        let context = host
            .emulator_context()
            .ok_or_else(|| self.fail(AttachError::MissingEmulatorContext))?;
        handle.init_emulator(context);

        if !handle.is_ready() {
            return Err(self.fail(AttachError::AccessorsUnavailable));
        }
        let (x, y) = (handle.x(), handle.y());
        tracing::debug!("Plugin initialized at ({}, {})", x, y);

        if let Some(display) = self.display.clone() {
            let weak = Rc::downgrade(&handle);
            handle.frame_hook().install(Box::new(move || {
                if let Some(handle) = weak.upgrade() {
                    display.set_text(&format_position(handle.x(), handle.y()));
                }
            }));
        }

        host.register_plugin(Rc::clone(&handle));
        self.set_state(AttachState::Attached);
        tracing::info!("Plugin attached");

        Ok(handle)
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("poll_interval", &self.poll_interval)
            .field("has_display", &self.display.is_some())
            .field("state", &*self.state.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            AttachError::Factory("boom".into()).to_string(),
            "Plugin factory failed: boom"
        );
        assert_eq!(AttachError::Cancelled.to_string(), "Attachment cancelled");
    }

    #[test]
    fn test_terminal_states() {
        assert!(!AttachState::NotAttached.is_terminal());
        assert!(!AttachState::Waiting { attempts: 3 }.is_terminal());
        assert!(AttachState::Attached.is_terminal());
        assert!(AttachState::Failed("x".into()).is_terminal());
        assert!(AttachState::Cancelled.is_terminal());
    }

    #[test]
    fn test_new_attachment_is_not_attached() {
        let attachment = Attachment::new(DEFAULT_POLL_INTERVAL);
        assert_eq!(attachment.state(), AttachState::NotAttached);
        assert_eq!(*attachment.subscribe().borrow(), AttachState::NotAttached);
    }

    #[test]
    fn test_zero_interval_is_raised_to_minimum() {
        assert_eq!(
            Attachment::new(Duration::ZERO).poll_interval(),
            MIN_POLL_INTERVAL
        );
    }
}
