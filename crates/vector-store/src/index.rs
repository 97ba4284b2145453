use crate::embedding_cache::EmbeddingCache;
use crate::embeddings::{Embedder, TaskType};
use crate::error::{Result, VectorStoreError};
use crate::fingerprint::Fingerprint;
use docqa_chunker::Chunk;

/// Chunks of one document with their index-aligned embeddings.
///
/// Built once at startup and never mutated; queries borrow it.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
    fingerprint: Fingerprint,
}

impl DocumentIndex {
    /// Pair chunks with embeddings, checking count and dimension agree
    pub fn new(
        chunks: Vec<Chunk>,
        embeddings: Vec<Vec<f32>>,
        fingerprint: Fingerprint,
    ) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(VectorStoreError::CountMismatch {
                chunks: chunks.len(),
                embeddings: embeddings.len(),
            });
        }
        let dimension = embeddings.first().map_or(0, Vec::len);
        if let Some(bad) = embeddings.iter().find(|v| v.len() != dimension) {
            return Err(VectorStoreError::InvalidDimension {
                expected: dimension,
                actual: bad.len(),
            });
        }

        Ok(Self {
            chunks,
            embeddings,
            fingerprint,
        })
    }

    /// Reuse cached embeddings when they match `fingerprint`, otherwise embed
    /// every chunk and persist the result.
    pub async fn build(
        chunks: Vec<Chunk>,
        fingerprint: Fingerprint,
        embedder: &dyn Embedder,
        cache: &EmbeddingCache,
    ) -> Result<Self> {
        if let Some(cached) = cache.load(&fingerprint).await {
            match Self::new(chunks.clone(), cached, fingerprint) {
                Ok(index) => {
                    log::info!(
                        "Loaded {} cached embeddings from {}",
                        index.len(),
                        cache.path().display()
                    );
                    return Ok(index);
                }
                Err(err) => {
                    log::warn!("Discarding embedding cache: {err}");
                }
            }
        }

        log::info!(
            "Creating embeddings for {} chunks with {}",
            chunks.len(),
            embedder.model_id()
        );
        let embeddings = Self::embed_chunks(&chunks, embedder).await?;
        let index = Self::new(chunks, embeddings, fingerprint)?;
        cache.save(&index.fingerprint, &index.embeddings).await?;
        Ok(index)
    }

    /// Embed chunks strictly one at a time, in order. The first failure
    /// aborts the batch.
    pub async fn embed_chunks(chunks: &[Chunk], embedder: &dyn Embedder) -> Result<Vec<Vec<f32>>> {
        let total = chunks.len();
        let mut embeddings = Vec::with_capacity(total);
        for chunk in chunks {
            log::info!("Embedding {}/{}", chunk.index + 1, total);
            let vector = embedder
                .embed(&chunk.text, TaskType::RetrievalDocument)
                .await?;
            embeddings.push(vector);
        }
        Ok(embeddings)
    }

    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    #[must_use]
    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    #[must_use]
    pub const fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.embeddings.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
