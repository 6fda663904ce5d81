use std::collections::HashMap;
use crate::analysis::token::Token;
use crate::core::types::EntityId;
use crate::index::posting::{Posting, PostingList};

/// Term statistics
#[derive(Debug, Clone, Copy)]
pub struct TermInfo {
    pub doc_freq: u32,        // Number of documents containing term
    pub idf: f32,             // Inverse document frequency
}

/// Inverted index over analyzed tokens, one entry per document.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, PostingList>,
    doc_terms: HashMap<EntityId, Vec<String>>,   // for removal
    doc_lengths: HashMap<EntityId, u32>,
    total_tokens: u64,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes `tokens` for `doc_id`, replacing whatever was indexed before.
    pub fn add_document(&mut self, doc_id: EntityId, tokens: &[Token]) {
        self.remove_document(doc_id);

        let mut term_freqs: HashMap<&str, u32> = HashMap::new();
        for token in tokens {
            *term_freqs.entry(token.text.as_str()).or_insert(0) += 1;
        }

        let mut terms = Vec::with_capacity(term_freqs.len());
        for (term, term_freq) in term_freqs {
            self.postings
                .entry(term.to_string())
                .or_default()
                .add_posting(Posting { doc_id, term_freq });
            terms.push(term.to_string());
        }

        self.doc_terms.insert(doc_id, terms);
        self.doc_lengths.insert(doc_id, tokens.len() as u32);
        self.total_tokens += tokens.len() as u64;
    }

    pub fn remove_document(&mut self, doc_id: EntityId) -> bool {
        let Some(terms) = self.doc_terms.remove(&doc_id) else {
            return false;
        };

        for term in terms {
            if let Some(list) = self.postings.get_mut(&term) {
                list.remove(doc_id);
                if list.is_empty() {
                    self.postings.remove(&term);
                }
            }
        }
        if let Some(len) = self.doc_lengths.remove(&doc_id) {
            self.total_tokens -= u64::from(len);
        }
        true
    }

    pub fn search_term(&self, term: &str) -> Option<&PostingList> {
        self.postings.get(term)
    }

    /// BM25 flavour of IDF; never negative, so common terms still match.
    pub fn term_info(&self, term: &str) -> Option<TermInfo> {
        let doc_freq = self.postings.get(term)?.doc_freq();
        let n = self.doc_count() as f32;
        let df = doc_freq as f32;
        Some(TermInfo {
            doc_freq,
            idf: (1.0 + (n - df + 0.5) / (df + 0.5)).ln(),
        })
    }

    pub fn doc_length(&self, doc_id: EntityId) -> u32 {
        self.doc_lengths.get(&doc_id).copied().unwrap_or(0)
    }

    pub fn avg_doc_length(&self) -> f32 {
        if self.doc_lengths.is_empty() {
            0.0
        } else {
            self.total_tokens as f32 / self.doc_lengths.len() as f32
        }
    }

    pub fn doc_count(&self) -> usize {
        self.doc_terms.len()
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }
}
