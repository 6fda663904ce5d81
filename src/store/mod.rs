pub mod journal;
pub mod memory;

use crate::core::error::Result;
use crate::core::types::{EntityId, SearchEntity};

pub use journal::JournalStore;
pub use memory::MemoryStore;

/// System of record for entities of type `E`.
pub trait PrimaryStore<E: SearchEntity>: Send + Sync {
    /// Persists `entity`, assigning a fresh id when it has none.
    fn save(&self, entity: E) -> Result<E>;

    fn find_by_id(&self, id: EntityId) -> Result<Option<E>>;

    /// Every entity, ascending by id.
    fn find_all(&self) -> Result<Vec<E>>;

    /// Removes `id`; an absent id is a no-op.
    fn delete(&self, id: EntityId) -> Result<()>;
}
