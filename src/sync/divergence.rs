use std::collections::VecDeque;
use std::fmt;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use crate::core::error::{Error, ErrorKind};
use crate::core::types::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOperation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SyncOperation::Create => "create",
            SyncOperation::Update => "update",
            SyncOperation::Delete => "delete",
        })
    }
}

/// A committed primary-store change the index failed to follow.
#[derive(Debug, Clone, PartialEq)]
pub struct Divergence {
    pub index: &'static str,
    pub entity_id: EntityId,
    pub operation: SyncOperation,
    pub kind: ErrorKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Divergence {
    pub fn new(index: &'static str, entity_id: EntityId, operation: SyncOperation, error: &Error) -> Self {
        Divergence {
            index,
            entity_id,
            operation,
            kind: error.kind(),
            message: error.to_string(),
            at: Utc::now(),
        }
    }
}

/// Bounded FIFO of divergences awaiting an external reconciliation pass.
#[derive(Debug)]
pub struct DivergenceLog {
    entries: Mutex<VecDeque<Divergence>>,
    capacity: usize,
}

impl DivergenceLog {
    pub fn new(capacity: usize) -> Self {
        DivergenceLog {
            entries: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// Appends `divergence`, evicting the oldest entry when full.
    pub fn record(&self, divergence: Divergence) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(divergence);
    }

    pub fn snapshot(&self) -> Vec<Divergence> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn drain(&self) -> Vec<Divergence> {
        self.entries.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
