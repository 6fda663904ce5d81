use std::sync::Arc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use docsync::core::config::{SearchConfig, SyncConfig};
use docsync::domain::Opportunity;
use docsync::{EntityMapper, MemoryEngine, MemoryStore, SearchGateway, SyncService};
use rand::Rng;

const WORDS: [&str; 12] = [
    "mentor", "weekly", "community", "garden", "tutoring", "food",
    "bank", "remote", "shelter", "library", "coding", "seniors",
];

fn random_text(words: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..words)
        .map(|_| WORDS[rng.gen_range(0..WORDS.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

fn service() -> SyncService<Opportunity> {
    let gateway = SearchGateway::<Opportunity>::new(
        Arc::new(MemoryEngine::new()),
        EntityMapper::default(),
        &SearchConfig::default(),
    );
    gateway.put_mapping().unwrap();
    SyncService::<Opportunity>::new(Arc::new(MemoryStore::new()), gateway, &SyncConfig::default())
}

/// Benchmark create through the primary store and the index
fn bench_create(c: &mut Criterion) {
    let service = service();

    c.bench_function("sync_create", |b| {
        b.iter(|| {
            let opportunity = Opportunity::new("Volunteer", &random_text(50), 2, 12);
            service.create(black_box(opportunity)).unwrap();
        });
    });
}

/// Benchmark free-text search over growing indices
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for size in [100, 1_000, 10_000].iter() {
        let service = service();
        for i in 0..*size {
            let title = format!("Opportunity {}", i);
            service
                .create(Opportunity::new(&title, &random_text(40), 1, 4))
                .unwrap();
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| service.search(black_box("community garden")).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_create, bench_search);
criterion_main!(benches);
