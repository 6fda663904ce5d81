use std::collections::{BTreeSet, HashMap};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use crate::analysis::analyzer::{AnalyzerRegistry, STANDARD};
use crate::analysis::token::Token;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::logging::targets;
use crate::core::types::{EntityId, SearchDocument};
use crate::engine::backend::SearchBackend;
use crate::index::inverted::InvertedIndex;
use crate::schema::shape::EntityShape;
use crate::scoring::scorer::{BM25Scorer, DocStats, Scorer};
use crate::search::results::{SearchHit, TopKCollector};

#[derive(Debug, Default)]
struct IndexStore {
    mapping: Option<EntityShape>,   // None: every string value is analyzed
    records: HashMap<EntityId, String>,
    inverted: InvertedIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub indices: usize,
    pub documents: usize,
    pub terms: usize,
}

/// Embedded search engine keeping every index in memory.
///
/// Each index stores the JSON source of its records next to an inverted
/// index of their analyzed text. Queries are disjunctive over the analyzed
/// query terms and ranked with the configured scorer (BM25 by default).
pub struct MemoryEngine {
    indices: RwLock<HashMap<String, IndexStore>>,
    analyzers: AnalyzerRegistry,
    scorer: Box<dyn Scorer>,
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::with_scorer(Box::new(BM25Scorer::default()))
    }

    pub fn with_scorer(scorer: Box<dyn Scorer>) -> Self {
        MemoryEngine {
            indices: RwLock::new(HashMap::new()),
            analyzers: AnalyzerRegistry::new(),
            scorer,
        }
    }

    pub fn analyzers(&self) -> &AnalyzerRegistry {
        &self.analyzers
    }

    pub fn count(&self, index: &str) -> usize {
        self.indices
            .read()
            .get(index)
            .map_or(0, |store| store.records.len())
    }

    pub fn stats(&self) -> EngineStats {
        let indices = self.indices.read();
        EngineStats {
            indices: indices.len(),
            documents: indices.values().map(|s| s.records.len()).sum(),
            terms: indices.values().map(|s| s.inverted.term_count()).sum(),
        }
    }

    fn analyze_document(&self, mapping: Option<&EntityShape>, document: &SearchDocument) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        for (name, value) in document {
            let analyzer_name = match mapping {
                None => STANDARD,
                Some(mapping) => match mapping.field(name) {
                    Some(field) if field.searchable => field.analyzer.as_deref().unwrap_or(STANDARD),
                    _ => continue,
                },
            };
            let analyzer = self.analyzers.resolve(analyzer_name)?;

            let mut texts = Vec::new();
            collect_text(value, &mut texts);
            for text in texts {
                let base = tokens.len() as u32;
                tokens.extend(analyzer.analyze(text).into_iter().map(|t| t.rebased(base)));
            }
        }

        Ok(tokens)
    }

    fn query_terms(&self, mapping: Option<&EntityShape>, text: &str) -> Result<BTreeSet<String>> {
        let analyzer_names: BTreeSet<&str> = match mapping {
            None => BTreeSet::from([STANDARD]),
            Some(mapping) => mapping
                .searchable_fields()
                .map(|f| f.analyzer.as_deref().unwrap_or(STANDARD))
                .collect(),
        };

        let mut terms = BTreeSet::new();
        for name in analyzer_names {
            terms.extend(self.analyzers.analyze(name, text)?.into_iter().map(|t| t.text));
        }
        Ok(terms)
    }
}

impl SearchBackend for MemoryEngine {
    fn ensure_index(&self, index: &str, mapping: &EntityShape) -> Result<()> {
        for field in mapping.searchable_fields() {
            if let Some(analyzer) = &field.analyzer {
                self.analyzers.resolve(analyzer)?;
            }
        }

        let mut indices = self.indices.write();
        let store = indices.entry(index.to_string()).or_default();
        if store.mapping.as_ref() == Some(mapping) {
            return Ok(());
        }

        store.mapping = Some(mapping.clone());
        let mut rebuilt = InvertedIndex::new();
        for (id, source) in &store.records {
            let document = parse_source(source)?;
            let tokens = self.analyze_document(store.mapping.as_ref(), &document)?;
            rebuilt.add_document(*id, &tokens);
        }
        store.inverted = rebuilt;

        tracing::debug!(
            target: targets::ENGINE,
            index,
            fields = mapping.fields.len(),
            reindexed = store.records.len(),
            "index mapping applied"
        );
        Ok(())
    }

    fn upsert(&self, index: &str, id: EntityId, source: &str) -> Result<()> {
        let document = parse_source(source)?;

        let mut indices = self.indices.write();
        let store = indices.entry(index.to_string()).or_default();
        let tokens = self.analyze_document(store.mapping.as_ref(), &document)?;
        store.inverted.add_document(id, &tokens);
        store.records.insert(id, source.to_string());

        tracing::trace!(
            target: targets::ENGINE,
            index,
            id = id.0,
            tokens = tokens.len(),
            "record upserted"
        );
        Ok(())
    }

    fn delete(&self, index: &str, id: EntityId) -> Result<bool> {
        let mut indices = self.indices.write();
        let Some(store) = indices.get_mut(index) else {
            return Ok(false);
        };
        store.inverted.remove_document(id);
        Ok(store.records.remove(&id).is_some())
    }

    fn get(&self, index: &str, id: EntityId) -> Result<Option<String>> {
        Ok(self
            .indices
            .read()
            .get(index)
            .and_then(|store| store.records.get(&id).cloned()))
    }

    fn search(&self, index: &str, text: &str, limit: usize) -> Result<Vec<SearchHit>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let indices = self.indices.read();
        let Some(store) = indices.get(index) else {
            return Ok(Vec::new());
        };

        let terms = self.query_terms(store.mapping.as_ref(), text)?;
        let avg_doc_length = store.inverted.avg_doc_length();
        let mut scores: HashMap<EntityId, f32> = HashMap::new();

        for term in &terms {
            let (Some(list), Some(info)) = (store.inverted.search_term(term), store.inverted.term_info(term)) else {
                continue;
            };
            for posting in list.iter() {
                let stats = DocStats {
                    doc_length: store.inverted.doc_length(posting.doc_id),
                    avg_doc_length,
                };
                *scores.entry(posting.doc_id).or_insert(0.0) += self.scorer.score(posting, &info, &stats);
            }
        }

        let mut collector = TopKCollector::new(limit);
        for (id, score) in scores {
            collector.collect(id, score);
        }

        let hits: Vec<SearchHit> = collector
            .into_ranked()
            .into_iter()
            .filter_map(|(id, score)| {
                store.records.get(&id).map(|source| SearchHit {
                    id,
                    score,
                    source: source.clone(),
                })
            })
            .collect();

        tracing::debug!(
            target: targets::ENGINE,
            index,
            terms = terms.len(),
            hits = hits.len(),
            scorer = self.scorer.name(),
            "query executed"
        );
        Ok(hits)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

fn parse_source(source: &str) -> Result<SearchDocument> {
    match serde_json::from_str::<Value>(source) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(_) => Err(Error::new(ErrorKind::InvalidInput, "record source must be a JSON object")),
        Err(e) => Err(Error::with_source(
            ErrorKind::InvalidInput,
            format!("record source is not valid JSON: {}", e),
            e,
        )),
    }
}

fn collect_text<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => out.push(s),
        Value::Array(items) => items.iter().for_each(|v| collect_text(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_text(v, out)),
        _ => {}
    }
}
