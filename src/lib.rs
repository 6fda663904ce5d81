pub mod core;
pub mod schema;
pub mod codec;
pub mod analysis;
pub mod index;
pub mod scoring;
pub mod search;
pub mod engine;
pub mod gateway;
pub mod store;
pub mod sync;
pub mod domain;

pub use crate::codec::mapper::EntityMapper;
pub use crate::core::config::Config;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::types::{EntityId, SearchDocument, SearchEntity};
pub use crate::engine::{MemoryEngine, SearchBackend};
pub use crate::gateway::SearchGateway;
pub use crate::schema::shape::{EntityShape, FieldType};
pub use crate::store::{JournalStore, MemoryStore, PrimaryStore};
pub use crate::sync::{IndexStatus, SyncOutcome, SyncService};

/*
┌──────────────────────────────────────────────────────────────────────────────┐
│                           DOCSYNC WRITE / READ PATHS                         │
└──────────────────────────────────────────────────────────────────────────────┘

   create / update / delete                         search(text)
            │                                            │
            ▼                                            │
  ┌──────────────────────┐                               │
  │  SyncService<E>      │  1. primary store first       │
  │  store: PrimaryStore │─────────────────────┐         │
  │  gateway             │                     ▼         │
  │  divergences         │        ┌────────────────────┐ │
  │  counters            │        │ MemoryStore /      │ │
  └──────────┬───────────┘        │ JournalStore (WAL) │ │
             │ 2. only on success └────────────────────┘ │
             ▼                                           ▼
  ┌──────────────────────────────────────────────────────────────┐
  │  SearchGateway<E>                                            │
  │  backend errors ──► SearchUnavailable                        │
  │  codec errors   ──► MappingFailure                           │
  └──────────┬──────────────────────────────────┬────────────────┘
             │ encode (map_to_string)           │ decode (map_to_object)
             ▼                                  ▲
  ┌──────────────────────┐                      │
  │  EntityMapper        │  unknown fields dropped, scalar → [scalar],
  │  + EntityShape       │  timestamps as i64 epoch nanoseconds
  └──────────┬───────────┘                      │
             ▼                                  │
  ┌──────────────────────────────────────────────────────────────┐
  │  dyn SearchBackend  (MemoryEngine)                           │
  │  Analyzer ─► InvertedIndex ─► BM25Scorer ─► TopKCollector    │
  └──────────────────────────────────────────────────────────────┘

  Index failures after a committed primary write are NOT rolled back:
  they land in the DivergenceLog and in SyncStats for reconciliation.
*/
