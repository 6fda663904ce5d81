use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use rust_stemmers::Algorithm;
use crate::analysis::filter::TokenFilter;
use crate::analysis::filters::lowercase::LowercaseFilter;
use crate::analysis::filters::stemmer::StemmerFilter;
use crate::analysis::filters::stopword::StopWordFilter;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};
use crate::core::error::{Error, ErrorKind, Result};

pub const STANDARD: &str = "standard";
pub const SIMPLE: &str = "simple";

/// Text analysis pipeline
pub struct Analyzer {
    pub tokenizer: Box<dyn Tokenizer>,
    pub filters: Vec<Box<dyn TokenFilter>>,
    pub name: String,
}

impl Analyzer {
    pub fn new(name: &str, tokenizer: Box<dyn Tokenizer>) -> Self {
        Analyzer {
            tokenizer,
            filters: Vec::new(),
            name: name.to_string(),
        }
    }

    pub fn add_filter(mut self, filter: Box<dyn TokenFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);

        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }

        tokens
    }

    /// Words, lowercased, English stop words removed, Snowball-stemmed.
    pub fn standard_english() -> Self {
        Analyzer::new(STANDARD, Box::new(StandardTokenizer::default()))
            .add_filter(Box::new(LowercaseFilter))
            .add_filter(Box::new(StopWordFilter::english()))
            .add_filter(Box::new(StemmerFilter::new(Algorithm::English)))
    }

    /// Words, lowercased, nothing else.
    pub fn simple() -> Self {
        Analyzer::new(SIMPLE, Box::new(StandardTokenizer::default()))
            .add_filter(Box::new(LowercaseFilter))
    }
}

/// Registry for managing analyzers
pub struct AnalyzerRegistry {
    analyzers: RwLock<HashMap<String, Arc<Analyzer>>>,
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        let registry = AnalyzerRegistry {
            analyzers: RwLock::new(HashMap::new()),
        };
        registry.register(Analyzer::standard_english());
        registry.register(Analyzer::simple());
        registry
    }

    pub fn register(&self, analyzer: Analyzer) {
        self.analyzers
            .write()
            .insert(analyzer.name.clone(), Arc::new(analyzer));
    }

    pub fn get(&self, name: &str) -> Option<Arc<Analyzer>> {
        self.analyzers.read().get(name).cloned()
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<Analyzer>> {
        self.get(name).ok_or_else(|| {
            Error::new(ErrorKind::InvalidInput, format!("analyzer '{}' not found", name))
        })
    }

    pub fn analyze(&self, analyzer_name: &str, text: &str) -> Result<Vec<Token>> {
        Ok(self.resolve(analyzer_name)?.analyze(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(tokens: Vec<Token>) -> Vec<String> {
        tokens.into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn standard_lowercases_drops_stop_words_and_stems() {
        let tokens = Analyzer::standard_english().analyze("The Programs of Alpha");
        assert_eq!(terms(tokens), vec!["program", "alpha"]);
    }

    #[test]
    fn simple_keeps_every_word() {
        let tokens = Analyzer::simple().analyze("The Programs");
        assert_eq!(terms(tokens), vec!["the", "programs"]);
    }

    #[test]
    fn unknown_analyzer_is_invalid_input() {
        let registry = AnalyzerRegistry::new();
        let err = registry.analyze("klingon", "qapla").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
