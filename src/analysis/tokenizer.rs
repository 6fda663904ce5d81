use crate::analysis::token::Token;
use unicode_segmentation::UnicodeSegmentation;

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    fn name(&self) -> &str;
}

/// Splits on Unicode word boundaries (UAX #29).
#[derive(Debug, Clone)]
pub struct StandardTokenizer {
    pub max_token_length: usize,
}

impl Default for StandardTokenizer {
    fn default() -> Self {
        StandardTokenizer {
            max_token_length: 255,
        }
    }
}

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut position = 0u32;

        text.unicode_word_indices()
            .filter(|(_, word)| word.len() <= self.max_token_length)
            .map(|(offset, word)| {
                let token = Token::new(word.to_string(), position, offset);
                position += 1;
                token
            })
            .collect()
    }

    fn name(&self) -> &str {
        "standard"
    }
}
