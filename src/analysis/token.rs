use serde::{Serialize, Deserialize};

/// Token produced by text analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub position: u32,     // ordinal within the analyzed document
    pub offset: usize,     // byte offset in the source text
}

impl Token {
    pub fn new(text: String, position: u32, offset: usize) -> Self {
        Token {
            text,
            position,
            offset,
        }
    }

    /// Same token shifted to start at `base` in a longer token stream.
    pub fn rebased(mut self, base: u32) -> Self {
        self.position += base;
        self
    }
}
