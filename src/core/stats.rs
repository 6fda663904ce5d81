use std::sync::atomic::{AtomicU64, Ordering};
use serde::{Serialize, Deserialize};

/// Snapshot of synchronization activity for monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStats {
    pub creates: u64,
    pub updates: u64,
    pub deletes: u64,
    pub searches: u64,
    pub index_failures: u64,       // primary write committed, index write failed
    pub pending_divergences: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Create,
    Update,
    Delete,
    Search,
    IndexFailure,
}

/// Lock-free counters behind [`SyncStats`].
#[derive(Debug, Default)]
pub struct SyncCounters {
    creates: AtomicU64,
    updates: AtomicU64,
    deletes: AtomicU64,
    searches: AtomicU64,
    index_failures: AtomicU64,
}

impl SyncCounters {
    pub fn bump(&self, counter: Counter) {
        let slot = match counter {
            Counter::Create => &self.creates,
            Counter::Update => &self.updates,
            Counter::Delete => &self.deletes,
            Counter::Search => &self.searches,
            Counter::IndexFailure => &self.index_failures,
        };
        slot.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, pending_divergences: usize) -> SyncStats {
        SyncStats {
            creates: self.creates.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            searches: self.searches.load(Ordering::Relaxed),
            index_failures: self.index_failures.load(Ordering::Relaxed),
            pending_divergences,
        }
    }
}

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

impl From<&SyncStats> for HealthStatus {
    fn from(stats: &SyncStats) -> Self {
        match stats.pending_divergences {
            0 => HealthStatus::Healthy,
            n => HealthStatus::Degraded(format!("{} index write(s) awaiting reconciliation", n)),
        }
    }
}
