//! # docqa Chunker
//!
//! Fixed-size, overlapping character windows over a document's text.
//!
//! ## Layout
//!
//! ```text
//! text:    |------------------------------------------|
//! chunk 0: |==========L==========|
//! chunk 1:               |==========L==========|
//!                        |<--O-->|
//! chunk 2:                             |=====rest=====|
//! ```
//!
//! Chunk *i* starts at `i * (L - O)` characters and is at most `L` characters
//! long. Emission stops at the first chunk that reaches the end of the text.
//!
//! ## Example
//!
//! ```rust
//! use docqa_chunker::{Chunker, ChunkerConfig};
//!
//! let chunker = Chunker::new(ChunkerConfig::new(10, 4)).unwrap();
//! let chunks = chunker.chunk_str("abcdefghijklmnop").unwrap();
//!
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[0].text, "abcdefghij");
//! assert_eq!(chunks[1].text, "ghijklmnop");
//! ```

mod chunker;
mod config;
mod error;
mod types;

pub use chunker::{Chunker, ChunkingStats};
pub use config::{ChunkerConfig, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
pub use error::{ChunkerError, Result};
pub use types::Chunk;
