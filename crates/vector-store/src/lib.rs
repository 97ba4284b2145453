//! # docqa Vector Store
//!
//! Embeddings for a single document's chunks, a flat-file cache for them, and
//! cosine-similarity retrieval.
//!
//! ## Architecture
//!
//! ```text
//! Chunk[]
//!     │
//!     ├──> EmbeddingCache (fingerprinted flat file)
//!     │      └─> hit: reuse vectors
//!     │
//!     ├──> Embedder (one call per chunk, in order)
//!     │      └─> Vec<f32>[]
//!     │
//!     └──> DocumentIndex (immutable, shared by reference)
//!            └─> Retriever: cosine similarity, stable top-k
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use docqa_chunker::{Chunker, ChunkerConfig};
//! use docqa_vector_store::{
//!     DocumentIndex, EmbeddingCache, Embedder, Fingerprint, Retriever, StubEmbedder,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let text = "The capital of Sweden is Stockholm.";
//!     let config = ChunkerConfig::default();
//!     let chunks = Chunker::new(config)?.chunk_str(text)?;
//!
//!     let embedder = StubEmbedder::default();
//!     let fingerprint = Fingerprint::compute(embedder.model_id(), &config, text);
//!     let cache = EmbeddingCache::new("embeddings.bin");
//!     let index = DocumentIndex::build(chunks, fingerprint, &embedder, &cache).await?;
//!
//!     let results = Retriever::default()
//!         .retrieve(&index, &embedder, "What is the capital of Sweden?")
//!         .await?;
//!     for result in results {
//!         println!("#{} {:.3}", result.chunk.index, result.score);
//!     }
//!     Ok(())
//! }
//! ```

mod embedding_cache;
mod embeddings;
mod error;
mod fingerprint;
mod index;
mod retriever;
mod similarity;

pub use embedding_cache::EmbeddingCache;
pub use embeddings::{Embedder, StubEmbedder, TaskType, STUB_DIMENSION};
pub use error::{Result, VectorStoreError};
pub use fingerprint::Fingerprint;
pub use index::DocumentIndex;
pub use retriever::{render_context, Retriever, SearchResult, DEFAULT_TOP_K};
pub use similarity::cosine_similarity;

// Re-export chunker types for convenience
pub use docqa_chunker::{Chunk, ChunkerConfig};
