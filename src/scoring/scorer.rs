use crate::index::inverted::TermInfo;
use crate::index::posting::Posting;

/// Scorer trait
pub trait Scorer: Send + Sync {
    fn score(&self, posting: &Posting, term_info: &TermInfo, doc_stats: &DocStats) -> f32;

    fn name(&self) -> &str;
}

/// Document statistics for scoring
#[derive(Debug, Clone, Copy)]
pub struct DocStats {
    pub doc_length: u32,      // Number of tokens in document
    pub avg_doc_length: f32,  // Average document length in the index
}

/// BM25 Scorer
#[derive(Debug, Clone, Copy)]
pub struct BM25Scorer {
    pub k1: f32,  // Term frequency saturation
    pub b: f32,   // Length normalization strength
}

impl Default for BM25Scorer {
    fn default() -> Self {
        BM25Scorer {
            k1: 1.2,
            b: 0.75,
        }
    }
}

impl Scorer for BM25Scorer {
    fn score(&self, posting: &Posting, term_info: &TermInfo, doc_stats: &DocStats) -> f32 {
        let tf = posting.term_freq as f32;
        let doc_len = doc_stats.doc_length as f32;
        let avg_doc_len = if doc_stats.avg_doc_length > 0.0 {
            doc_stats.avg_doc_length
        } else {
            1.0
        };

        let numerator = term_info.idf * tf * (self.k1 + 1.0);
        let denominator = tf + self.k1 * (1.0 - self.b + self.b * (doc_len / avg_doc_len));

        numerator / denominator
    }

    fn name(&self) -> &str {
        "bm25"
    }
}
