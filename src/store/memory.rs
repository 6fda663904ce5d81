use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use parking_lot::RwLock;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{EntityId, SearchEntity};
use crate::store::PrimaryStore;

/// Volatile primary store backed by an ordered map.
pub struct MemoryStore<E> {
    rows: RwLock<BTreeMap<EntityId, E>>,
    next_id: AtomicU64,
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> MemoryStore<E> {
    pub fn new() -> Self {
        MemoryStore {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

impl<E: SearchEntity> PrimaryStore<E> for MemoryStore<E> {
    fn save(&self, mut entity: E) -> Result<E> {
        let id = match entity.id() {
            Some(id) => {
                self.next_id.fetch_max(id.0.saturating_add(1), Ordering::SeqCst);
                id
            }
            None => {
                let next = self
                    .next_id
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| (n < u64::MAX).then(|| n + 1))
                    .map_err(|_| {
                        Error::new(
                            ErrorKind::InvalidInput,
                            format!("id sequence of {} exhausted", E::INDEX_NAME),
                        )
                    })?;
                let id = EntityId(next);
                entity.set_id(id);
                id
            }
        };

        self.rows.write().insert(id, entity.clone());
        Ok(entity)
    }

    fn find_by_id(&self, id: EntityId) -> Result<Option<E>> {
        Ok(self.rows.read().get(&id).cloned())
    }

    fn find_all(&self) -> Result<Vec<E>> {
        Ok(self.rows.read().values().cloned().collect())
    }

    fn delete(&self, id: EntityId) -> Result<()> {
        self.rows.write().remove(&id);
        Ok(())
    }
}
