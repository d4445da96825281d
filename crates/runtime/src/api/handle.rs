//! Cloneable façade for observing the runtime.
//!
//! [`RuntimeHandle`] can be shared with UI tasks that stream events from
//! specific topics while the runtime drives the encounter.
use std::collections::HashMap;

use tokio::sync::broadcast;

use crate::events::{Event, EventBus, Topic};

/// Client-facing handle to observe the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Combat` - Combat log entries
    /// - `Topic::Turn` - Turn progress
    /// - `Topic::Lifecycle` - Encounter start and end
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use combat_runtime::Topic;
    ///
    /// let mut log_rx = handle.subscribe(Topic::Combat);
    /// while let Ok(event) = log_rx.recv().await {
    ///     // Render the entry
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
