use std::sync::Arc;
use crate::core::config::SyncConfig;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::logging::targets;
use crate::core::stats::{Counter, HealthStatus, SyncCounters, SyncStats};
use crate::core::types::{EntityId, SearchEntity};
use crate::gateway::search::{ScoredEntity, SearchGateway};
use crate::store::PrimaryStore;
use crate::sync::divergence::{Divergence, DivergenceLog, SyncOperation};

/// Result of the index half of a write.
#[derive(Debug)]
pub enum IndexStatus {
    Indexed,
    /// The primary change stands; the index missed it.
    NotIndexed(Error),
}

impl IndexStatus {
    pub fn is_indexed(&self) -> bool {
        matches!(self, IndexStatus::Indexed)
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            IndexStatus::Indexed => None,
            IndexStatus::NotIndexed(err) => Some(err),
        }
    }
}

/// A committed entity plus what happened when mirroring it.
#[derive(Debug)]
pub struct SyncOutcome<E> {
    pub entity: E,
    pub index: IndexStatus,
}

impl<E> SyncOutcome<E> {
    pub fn is_indexed(&self) -> bool {
        self.index.is_indexed()
    }

    pub fn into_entity(self) -> E {
        self.entity
    }
}

/// Write path across the primary store and the search index.
///
/// The primary store is the source of truth. A mutation is committed there
/// first and mirrored to the index only once that succeeded. Index failures
/// never undo the committed change: they are logged, counted, kept in the
/// divergence log and handed back in the outcome. Reads by id come from the
/// primary store, free-text search from the index, so search results may
/// briefly lag behind writes.
pub struct SyncService<E: SearchEntity> {
    store: Arc<dyn PrimaryStore<E>>,
    gateway: SearchGateway<E>,
    divergences: DivergenceLog,
    counters: SyncCounters,
}

impl<E: SearchEntity> SyncService<E> {
    pub fn new(store: Arc<dyn PrimaryStore<E>>, gateway: SearchGateway<E>, config: &SyncConfig) -> Self {
        SyncService {
            store,
            gateway,
            divergences: DivergenceLog::new(config.divergence_capacity),
            counters: SyncCounters::default(),
        }
    }

    pub fn gateway(&self) -> &SearchGateway<E> {
        &self.gateway
    }

    pub fn create(&self, entity: E) -> Result<SyncOutcome<E>> {
        if entity.id().is_some() {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("a new {} cannot already have an id", E::INDEX_NAME),
            ));
        }

        let saved = self.store.save(entity)?;
        self.counters.bump(Counter::Create);
        let index = self.mirror(SyncOperation::Create, &saved);
        Ok(SyncOutcome { entity: saved, index })
    }

    pub fn update(&self, entity: E) -> Result<SyncOutcome<E>> {
        let id = entity.id().ok_or_else(|| {
            Error::new(ErrorKind::InvalidArgument, format!("invalid id for {}", E::INDEX_NAME))
        })?;
        if self.store.find_by_id(id)?.is_none() {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("{} {} does not exist", E::INDEX_NAME, id),
            ));
        }

        let saved = self.store.save(entity)?;
        self.counters.bump(Counter::Update);
        let index = self.mirror(SyncOperation::Update, &saved);
        Ok(SyncOutcome { entity: saved, index })
    }

    /// Deletes from the primary store, then from the index.
    pub fn delete(&self, id: EntityId) -> Result<IndexStatus> {
        self.store.delete(id)?;
        self.counters.bump(Counter::Delete);

        match self.gateway.delete(id) {
            Ok(()) => Ok(IndexStatus::Indexed),
            Err(err) => Ok(self.diverged(SyncOperation::Delete, id, err)),
        }
    }

    pub fn get(&self, id: EntityId) -> Result<Option<E>> {
        self.store.find_by_id(id)
    }

    pub fn find_all(&self) -> Result<Vec<E>> {
        self.store.find_all()
    }

    pub fn search(&self, text: &str) -> Result<Vec<E>> {
        self.counters.bump(Counter::Search);
        self.gateway.query(text)
    }

    pub fn search_hits(&self, text: &str) -> Result<Vec<ScoredEntity<E>>> {
        self.counters.bump(Counter::Search);
        self.gateway.query_hits(text)
    }

    pub fn divergences(&self) -> Vec<Divergence> {
        self.divergences.snapshot()
    }

    /// Hands pending divergences over to a reconciliation process.
    pub fn drain_divergences(&self) -> Vec<Divergence> {
        self.divergences.drain()
    }

    pub fn stats(&self) -> SyncStats {
        self.counters.snapshot(self.divergences.len())
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus::from(&self.stats())
    }

    fn mirror(&self, operation: SyncOperation, entity: &E) -> IndexStatus {
        match self.gateway.index(entity) {
            Ok(()) => IndexStatus::Indexed,
            Err(err) => {
                // save() always yields an id
                let id = entity.id().unwrap_or(EntityId(0));
                self.diverged(operation, id, err)
            }
        }
    }

    fn diverged(&self, operation: SyncOperation, id: EntityId, err: Error) -> IndexStatus {
        tracing::warn!(
            target: targets::SYNC,
            index = E::INDEX_NAME,
            id = id.0,
            %operation,
            kind = %err.kind(),
            error = %err,
            "index diverged from primary store"
        );
        self.counters.bump(Counter::IndexFailure);
        self.divergences
            .record(Divergence::new(E::INDEX_NAME, id, operation, &err));
        IndexStatus::NotIndexed(err)
    }
}
