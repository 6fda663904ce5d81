#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use docsync::codec::timestamp;
use docsync::core::error::{Error, ErrorKind, Result};
use docsync::engine::{MemoryEngine, SearchBackend};
use docsync::schema::shape::{EntityShape, FieldType};
use docsync::search::results::SearchHit;
use docsync::{EntityId, PrimaryStore, SearchEntity};

/// Entity exercising every field kind the codec cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: Option<EntityId>,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub seats: i64,
    #[serde(with = "timestamp::nanos")]
    pub starts_at: DateTime<Utc>,
    #[serde(with = "timestamp::nanos_option", default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Program {
    pub fn new(title: &str) -> Self {
        Program {
            id: None,
            title: title.to_string(),
            tags: Vec::new(),
            seats: 10,
            starts_at: DateTime::from_timestamp(1_700_000_000, 987_654_321).unwrap(),
            closed_at: None,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(EntityId(id));
        self
    }
}

impl SearchEntity for Program {
    const INDEX_NAME: &'static str = "program";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn shape() -> EntityShape {
        EntityShape::new(Self::INDEX_NAME)
            .id_field()
            .text_field("title")
            .list_field("tags", FieldType::Text, true)
            .number_field("seats")
            .timestamp_field("startsAt")
            .timestamp_field("closedAt")
    }
}

/// Backend that can be taken offline to simulate a network partition.
pub struct FlakyBackend {
    inner: MemoryEngine,
    online: AtomicBool,
}

impl FlakyBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(FlakyBackend {
            inner: MemoryEngine::new(),
            online: AtomicBool::new(true),
        })
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn engine(&self) -> &MemoryEngine {
        &self.inner
    }

    fn check(&self) -> Result<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::Io, "connection refused"))
        }
    }
}

impl SearchBackend for FlakyBackend {
    fn ensure_index(&self, index: &str, mapping: &EntityShape) -> Result<()> {
        self.check()?;
        self.inner.ensure_index(index, mapping)
    }

    fn upsert(&self, index: &str, id: EntityId, source: &str) -> Result<()> {
        self.check()?;
        self.inner.upsert(index, id, source)
    }

    fn delete(&self, index: &str, id: EntityId) -> Result<bool> {
        self.check()?;
        self.inner.delete(index, id)
    }

    fn get(&self, index: &str, id: EntityId) -> Result<Option<String>> {
        self.check()?;
        self.inner.get(index, id)
    }

    fn search(&self, index: &str, text: &str, limit: usize) -> Result<Vec<SearchHit>> {
        self.check()?;
        self.inner.search(index, text, limit)
    }

    fn name(&self) -> &str {
        "flaky"
    }
}


/// Primary store whose writes always fail; reads see an empty store.
pub struct FailingStore;

impl FailingStore {
    fn refuse<T>() -> Result<T> {
        Err(Error::new(ErrorKind::Io, "disk full"))
    }
}

impl<E: SearchEntity> PrimaryStore<E> for FailingStore {
    fn save(&self, _entity: E) -> Result<E> {
        Self::refuse()
    }

    fn find_by_id(&self, _id: EntityId) -> Result<Option<E>> {
        Ok(None)
    }

    fn find_all(&self) -> Result<Vec<E>> {
        Ok(Vec::new())
    }

    fn delete(&self, _id: EntityId) -> Result<()> {
        Self::refuse()
    }
}
