/// Region / opportunity synchronization demo
///
/// Walks through the write and read paths:
/// - create and update through the primary store and the search index
/// - free-text search with relevance scores
/// - journal replay after reopening the primary store

use std::sync::Arc;
use docsync::core::logging::init_tracing;
use docsync::domain::{Opportunity, Region};
use docsync::{Config, EntityMapper, JournalStore, MemoryEngine, MemoryStore, SearchGateway, SyncService};
use tracing::Level;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(Level::INFO);

    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   docsync - Region Synchronization Demo       ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    let config = Config::default();
    let engine = Arc::new(MemoryEngine::new());
    let journal_dir = std::env::temp_dir().join("docsync-demo");
    let _ = std::fs::remove_dir_all(&journal_dir);

    // Step 1: regions backed by a journal
    println!("Step 1: CREATE - regions...");
    let regions = {
        let store = JournalStore::<Region>::open(&journal_dir, EntityMapper::new(config.mapper.clone()), config.store.sync_mode)?;
        let gateway = SearchGateway::<Region>::new(engine.clone(), EntityMapper::new(config.mapper.clone()), &config.search);
        gateway.put_mapping()?;
        SyncService::new(Arc::new(store), gateway, &config.sync)
    };

    let mut nordics = regions.create(Region::named("Nordic Countries"))?.into_entity();
    regions.create(Region::named("Baltic States"))?;
    println!("  Created {} regions\n", regions.find_all()?.len());

    // Step 2: update
    println!("Step 2: UPDATE - renaming a region...");
    nordics.region_name = Some("Nordic and Baltic Countries".into());
    let outcome = regions.update(nordics)?;
    println!("  Indexed: {}\n", outcome.is_indexed());

    // Step 3: search
    println!("Step 3: SEARCH - 'baltic'...");
    for hit in regions.search_hits("baltic")? {
        println!("  {:>6.3}  {:?}", hit.score, hit.entity.region_name);
    }
    println!();

    // Step 4: opportunities in a volatile store
    println!("Step 4: OPPORTUNITIES - in-memory store...");
    let opportunities = {
        let gateway = SearchGateway::<Opportunity>::new(engine.clone(), EntityMapper::new(config.mapper.clone()), &config.search);
        gateway.put_mapping()?;
        SyncService::<Opportunity>::new(Arc::new(MemoryStore::new()), gateway, &config.sync)
    };
    opportunities.create(Opportunity::new("Garden Helper", "Weekly community gardening", 3, 10))?;
    opportunities.create(Opportunity::new("Reading Mentor", "Help kids with reading", 2, 26))?;
    let found = opportunities.search("gardening")?;
    println!("  'gardening': {} results\n", found.len());

    // Step 5: statistics
    println!("Step 5: STATS...");
    let stats = regions.stats();
    println!("  creates={} updates={} searches={}", stats.creates, stats.updates, stats.searches);
    println!("  engine: {:?}", engine.stats());
    println!("  health: {:?}\n", regions.health());

    // Step 6: restart the primary store
    println!("Step 6: REOPEN - replaying the journal...");
    drop(regions);
    let reopened = JournalStore::<Region>::open(&journal_dir, EntityMapper::default(), config.store.sync_mode)?;
    println!("  {} regions restored from {}\n", reopened.len(), reopened.path().display());

    std::fs::remove_dir_all(&journal_dir)?;
    println!("Done!");
    Ok(())
}
