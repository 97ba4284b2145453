use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};

/// Default chunk length in characters
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap between consecutive chunks in characters
pub const DEFAULT_OVERLAP: usize = 200;

/// Configuration for fixed-window chunking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Target chunk length in characters (the last chunk may be shorter)
    pub chunk_size: usize,

    /// Characters shared by each chunk and its predecessor
    pub overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

impl ChunkerConfig {
    #[must_use]
    pub const fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Distance between the starts of consecutive chunks.
    ///
    /// Only meaningful for a validated config.
    #[must_use]
    pub const fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ChunkerError::invalid_config("chunk_size must be > 0"));
        }

        if self.overlap >= self.chunk_size {
            return Err(ChunkerError::invalid_config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }

        Ok(())
    }
}
