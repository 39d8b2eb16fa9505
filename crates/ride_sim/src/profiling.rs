//! Event counters for a run.

use std::collections::HashMap;

use bevy_ecs::prelude::Resource;
use tracing::info;

use crate::clock::EventKind;

/// Event processing metrics, updated by the runner when present in the world.
#[derive(Debug, Default, Resource)]
pub struct EventMetrics {
    /// Total events processed.
    pub events_processed: u64,
    /// Events per event kind.
    pub events_by_kind: HashMap<EventKind, u64>,
    /// Events dropped because they were at or past the horizon.
    pub events_discarded: u64,
}

impl EventMetrics {
    /// Record an event being processed.
    pub fn record_event(&mut self, kind: EventKind) {
        self.events_processed += 1;
        *self.events_by_kind.entry(kind).or_insert(0) += 1;
    }

    pub fn record_discarded(&mut self, count: usize) {
        self.events_discarded += count as u64;
    }

    pub fn count(&self, kind: EventKind) -> u64 {
        self.events_by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Log summary statistics.
    pub fn log_summary(&self) {
        let mut entries: Vec<_> = self.events_by_kind.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        info!(
            processed = self.events_processed,
            discarded = self.events_discarded,
            "event processing summary"
        );
        for (kind, count) in entries {
            info!(kind = ?kind, count, "events by kind");
        }
    }
}
