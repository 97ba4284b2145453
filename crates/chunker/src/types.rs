use serde::{Deserialize, Serialize};

/// A contiguous window of the source text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Position in the chunk sequence (0-indexed)
    pub index: usize,

    /// Offset of the first character, counted in characters
    pub start: usize,

    /// The chunk text
    pub text: String,
}

impl Chunk {
    #[must_use]
    pub const fn new(index: usize, start: usize, text: String) -> Self {
        Self { index, start, text }
    }

    /// Length in characters
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Offset one past the last character
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.char_len()
    }
}
