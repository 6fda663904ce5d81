use std::fmt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use crate::schema::shape::EntityShape;

/// Identifier assigned by the primary store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn new(id: u64) -> Self {
        EntityId(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        EntityId(id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generic string-keyed projection of an entity.
pub type SearchDocument = serde_json::Map<String, serde_json::Value>;

/// A record owned by the primary store and mirrored into the search index.
pub trait SearchEntity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Index the entity's documents live in.
    const INDEX_NAME: &'static str;

    fn id(&self) -> Option<EntityId>;

    fn set_id(&mut self, id: EntityId);

    fn shape() -> EntityShape;
}
