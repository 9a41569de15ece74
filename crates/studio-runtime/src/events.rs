//! Collects the news entries emitted during one transition.

use studio_core::{sort_events, EventKind, GameEvent};

/// Buffers events for a single week, then merges them into the log.
pub(crate) struct EventSink {
    week: u32,
    events: Vec<GameEvent>,
}

impl EventSink {
    pub(crate) fn new(week: u32) -> Self {
        Self {
            week,
            events: Vec::new(),
        }
    }

    /// Record an event with id `evt-{week}-{key}`.
    pub(crate) fn push(&mut self, key: &str, kind: EventKind, message: String) {
        self.events.push(GameEvent {
            id: format!("evt-{}-{}", self.week, key),
            week: self.week,
            message,
            kind,
        });
    }

    /// Append to `log` and restore newest-first order.
    pub(crate) fn flush_into(self, log: &mut Vec<GameEvent>) {
        log.extend(self.events);
        sort_events(log);
    }
}
