//! # Event Log Adapter
//!
//! In-memory append-only audit trail. Production deployments would adapt a
//! durable log behind the same trait.

use crate::events::{EventEnvelope, EventKind};
use crate::ports::outbound::EventLog;
use async_trait::async_trait;
use std::sync::RwLock;

/// In-memory append-only event log.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    entries: RwLock<Vec<EventEnvelope>>,
}

impl InMemoryEventLog {
    /// Create a new empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries in commit order.
    #[must_use]
    pub fn entries(&self) -> Vec<EventEnvelope> {
        self.entries.read().unwrap().clone()
    }
}

#[async_trait]
impl EventLog for InMemoryEventLog {
    async fn append(&self, envelope: EventEnvelope) {
        self.entries.write().unwrap().push(envelope);
    }

    async fn query(&self, kind: EventKind) -> Vec<EventEnvelope> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    async fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }
}

// =============================================================================
// TESTS
// =============================================================================
