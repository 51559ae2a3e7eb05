//! Shared result type for keyboard handlers

/// What a handler did with an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was handled; suppress the default action and stop propagation
    Consumed,
    /// Event was not handled; let it pass through untouched
    Bubble,
}

impl EventResult {
    #[inline]
    pub fn is_consumed(self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}
