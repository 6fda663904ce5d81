use crate::core::error::Result;
use crate::core::types::EntityId;
use crate::schema::shape::EntityShape;
use crate::search::results::SearchHit;

/// Document store addressed by index name and id.
///
/// Sources travel as JSON object strings. Implementations report transport
/// or backend failures as `Err`; absence is never an error.
pub trait SearchBackend: Send + Sync {
    /// Creates the index if needed and applies `mapping` to it.
    fn ensure_index(&self, index: &str, mapping: &EntityShape) -> Result<()>;

    /// Inserts or replaces the record stored under `id`.
    fn upsert(&self, index: &str, id: EntityId, source: &str) -> Result<()>;

    /// Returns whether a record was removed.
    fn delete(&self, index: &str, id: EntityId) -> Result<bool>;

    fn get(&self, index: &str, id: EntityId) -> Result<Option<String>>;

    /// Free-text query, best hits first, at most `limit` of them.
    fn search(&self, index: &str, text: &str, limit: usize) -> Result<Vec<SearchHit>>;

    fn name(&self) -> &str;
}
