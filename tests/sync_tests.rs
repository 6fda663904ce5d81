mod common;

use std::sync::Arc;
use chrono::{TimeZone, Utc};
use common::{FailingStore, FlakyBackend, Program};
use docsync::core::config::{Config, SearchConfig, SyncConfig};
use docsync::core::stats::HealthStatus;
use docsync::domain::Region;
use docsync::sync::SyncOperation;
use docsync::{
    EntityId, EntityMapper, ErrorKind, MemoryEngine, MemoryStore, PrimaryStore, SearchBackend,
    SearchGateway, SearchEntity, SyncService,
};

struct Fixture {
    backend: Arc<FlakyBackend>,
    store: Arc<MemoryStore<Program>>,
    service: SyncService<Program>,
}

fn fixture() -> Fixture {
    let config = Config::default();
    let backend = FlakyBackend::new();
    let store = Arc::new(MemoryStore::<Program>::new());
    let gateway = SearchGateway::<Program>::new(backend.clone(), EntityMapper::new(config.mapper.clone()), &config.search);
    gateway.put_mapping().unwrap();
    let service = SyncService::new(store.clone(), gateway, &config.sync);
    Fixture { backend, store, service }
}

#[test]
fn create_assigns_id_and_indexes() {
    let f = fixture();
    let outcome = f.service.create(Program::new("Alpha Program")).unwrap();

    assert!(outcome.is_indexed());
    let id = outcome.entity.id.unwrap();
    assert_eq!(f.service.get(id).unwrap(), Some(outcome.entity.clone()));
    assert_eq!(f.service.search("alpha").unwrap(), vec![outcome.entity]);
}

#[test]
fn create_rejects_entities_with_an_id() {
    let f = fixture();
    let err = f.service.create(Program::new("Alpha").with_id(3)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(f.store.is_empty());
}

#[test]
fn update_requires_an_existing_id() {
    let f = fixture();
    let err = f.service.update(Program::new("Alpha")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = f.service.update(Program::new("Alpha").with_id(99)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(f.service.stats().updates, 0);
}

#[test]
fn update_is_mirrored_to_the_index() {
    let f = fixture();
    let mut program = f.service.create(Program::new("Alpha Program")).unwrap().into_entity();

    program.title = "Beta Program".into();
    let outcome = f.service.update(program.clone()).unwrap();

    assert!(outcome.is_indexed());
    assert!(f.service.search("alpha").unwrap().is_empty());
    assert_eq!(f.service.search("beta").unwrap(), vec![program]);
}

#[test]
fn update_survives_unreachable_index() {
    let f = fixture();
    let mut program = f.service.create(Program::new("Alpha Program")).unwrap().into_entity();
    let id = program.id.unwrap();

    f.backend.set_online(false);
    program.title = "Alpha Program Revised".into();
    let outcome = f.service.update(program.clone()).unwrap();

    // primary store holds the update
    assert_eq!(f.store.find_by_id(id).unwrap(), Some(program.clone()));
    assert_eq!(f.service.get(id).unwrap(), Some(program));

    // the index failure is reported, not raised
    assert!(!outcome.is_indexed());
    assert!(outcome.index.error().unwrap().is_search_unavailable());

    let divergences = f.service.divergences();
    assert_eq!(divergences.len(), 1);
    assert_eq!(divergences[0].entity_id, id);
    assert_eq!(divergences[0].operation, SyncOperation::Update);
    assert_eq!(divergences[0].kind, ErrorKind::SearchUnavailable);

    // index still serves the last state it saw
    f.backend.set_online(true);
    let indexed = f.service.gateway().get(id).unwrap().unwrap();
    assert_eq!(indexed.title, "Alpha Program");
}

#[test]
fn create_while_index_is_down_still_commits() {
    let f = fixture();
    f.backend.set_online(false);

    let outcome = f.service.create(Program::new("Offline")).unwrap();
    assert!(!outcome.is_indexed());
    assert_eq!(f.store.len(), 1);

    f.backend.set_online(true);
    assert!(f.service.search("offline").unwrap().is_empty());
}

#[test]
fn delete_removes_from_both_stores() {
    let f = fixture();
    let program = f.service.create(Program::new("Alpha")).unwrap().into_entity();
    let id = program.id.unwrap();

    let status = f.service.delete(id).unwrap();
    assert!(status.is_indexed());
    assert_eq!(f.service.get(id).unwrap(), None);
    assert_eq!(f.service.gateway().get(id).unwrap(), None);

    // absent in both: still fine
    assert!(f.service.delete(id).unwrap().is_indexed());
}

#[test]
fn delete_with_index_down_is_not_fatal() {
    let f = fixture();
    let id = f.service.create(Program::new("Alpha")).unwrap().entity.id.unwrap();

    f.backend.set_online(false);
    let status = f.service.delete(id).unwrap();

    assert!(!status.is_indexed());
    assert_eq!(f.service.get(id).unwrap(), None);
    assert_eq!(f.service.divergences()[0].operation, SyncOperation::Delete);
}

#[test]
fn search_errors_propagate_unchanged() {
    let f = fixture();
    f.service.create(Program::new("Alpha")).unwrap();
    f.backend.set_online(false);

    let err = f.service.search("alpha").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SearchUnavailable);
    assert!(f.service.divergences().is_empty());
}

#[test]
fn health_degrades_until_divergences_are_drained() {
    let f = fixture();
    assert!(f.service.health().is_healthy());

    f.backend.set_online(false);
    f.service.create(Program::new("Alpha")).unwrap();
    f.service.create(Program::new("Beta")).unwrap();

    let stats = f.service.stats();
    assert_eq!(stats.creates, 2);
    assert_eq!(stats.index_failures, 2);
    assert_eq!(stats.pending_divergences, 2);
    assert!(matches!(f.service.health(), HealthStatus::Degraded(_)));

    assert_eq!(f.service.drain_divergences().len(), 2);
    assert!(f.service.health().is_healthy());
    assert_eq!(f.service.stats().index_failures, 2);
}

#[test]
fn find_all_reads_the_primary_store() {
    let f = fixture();
    f.backend.set_online(false);
    for title in ["One", "Two", "Three"] {
        f.service.create(Program::new(title)).unwrap();
    }

    let ids: Vec<_> = f.service.find_all().unwrap().iter().map(|p| p.id.unwrap().0).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn divergence_log_is_bounded() {
    let backend = FlakyBackend::new();
    let gateway = SearchGateway::<Region>::new(backend.clone(), EntityMapper::default(), &Default::default());
    let service = SyncService::<Region>::new(
        Arc::new(MemoryStore::new()),
        gateway,
        &SyncConfig { divergence_capacity: 2 },
    );
    backend.set_online(false);

    for name in ["North", "South", "East"] {
        service.create(Region::named(name)).unwrap();
    }

    let ids: Vec<_> = service.divergences().iter().map(|d| d.entity_id).collect();
    assert_eq!(ids, vec![EntityId(2), EntityId(3)]);
    assert_eq!(service.stats().index_failures, 3);
}

#[test]
fn failed_primary_write_never_reaches_the_index() {
    let engine = Arc::new(MemoryEngine::new());
    let gateway = SearchGateway::<Program>::new(engine.clone(), EntityMapper::default(), &SearchConfig::default());
    let service = SyncService::<Program>::new(Arc::new(FailingStore), gateway, &SyncConfig::default());

    let err = service.create(Program::new("Alpha")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(engine.count(Program::INDEX_NAME), 0);

    // a record indexed out of band survives a failed primary delete
    engine
        .upsert(Program::INDEX_NAME, EntityId(1), r#"{"title":"Alpha","seats":1,"startsAt":0}"#)
        .unwrap();
    let err = service.delete(EntityId(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(engine.count(Program::INDEX_NAME), 1);

    assert!(service.divergences().is_empty());
    let stats = service.stats();
    assert_eq!((stats.creates, stats.deletes, stats.index_failures), (0, 0, 0));
}

#[test]
fn unencodable_entity_is_a_divergence_not_an_error() {
    let f = fixture();
    let mut program = Program::new("Far Future");
    program.starts_at = Utc.with_ymd_and_hms(2300, 1, 1, 0, 0, 0).unwrap();

    let outcome = f.service.create(program).unwrap();
    let id = outcome.entity.id.unwrap();

    assert_eq!(outcome.index.error().unwrap().kind(), ErrorKind::MappingFailure);
    assert!(f.store.find_by_id(id).unwrap().is_some());
    assert_eq!(f.backend.engine().count(Program::INDEX_NAME), 0);

    let divergences = f.service.divergences();
    assert_eq!(divergences.len(), 1);
    assert_eq!(divergences[0].kind, ErrorKind::MappingFailure);
    assert_eq!(divergences[0].operation, SyncOperation::Create);
}
