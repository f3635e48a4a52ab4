//! Table change notifications.
//!
//! [`EnrichmentState`](crate::state::EnrichmentState) is the only publisher.
//! It emits [`TableEvent::RowsUpdated`] after the working table has been
//! replaced, never before, and never for an empty load. Delivery is
//! synchronous and in subscription order; a subscriber sees the new table
//! before the publishing call returns.

use crate::rows::RowSequence;

/// What replaced the working table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOrigin {
    /// A CSV was loaded (file or hand-off blob).
    Loaded,
    /// Adapter results were merged under `column`.
    Merged { column: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// The working table changed. Carries a snapshot of the new rows.
    RowsUpdated {
        rows: RowSequence,
        origin: UpdateOrigin,
    },
}

/// Callback type for receiving table events.
pub type EventCallback = Box<dyn FnMut(&TableEvent)>;

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<EventCallback>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribers live as long as the bus.
    pub fn subscribe(&mut self, callback: impl FnMut(&TableEvent) + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    pub fn publish(&mut self, event: &TableEvent) {
        for callback in self.subscribers.iter_mut() {
            callback(event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
