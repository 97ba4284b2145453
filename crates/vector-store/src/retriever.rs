use crate::embeddings::{Embedder, TaskType};
use crate::error::{Result, VectorStoreError};
use crate::index::DocumentIndex;
use crate::similarity::cosine_similarity;
use docqa_chunker::Chunk;
use std::cmp::Ordering;

pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub score: f32,
}

/// Brute-force cosine-similarity search over a [`DocumentIndex`]
#[derive(Debug, Clone, Copy)]
pub struct Retriever {
    top_k: usize,
}

impl Default for Retriever {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

impl Retriever {
    #[must_use]
    pub const fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// Embed `query` as a retrieval query and return the best chunks
    pub async fn retrieve(
        &self,
        index: &DocumentIndex,
        embedder: &dyn Embedder,
        query: &str,
    ) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(VectorStoreError::EmptyQuery);
        }

        log::debug!("Searching for: '{}' (top_k: {})", query, self.top_k);
        let query_vector = embedder.embed(query, TaskType::RetrievalQuery).await?;
        self.search(index, &query_vector)
    }

    /// Score every chunk against `query_vector`.
    ///
    /// Results are in descending similarity; equal scores keep document
    /// order. At most `top_k` results are returned.
    pub fn search(&self, index: &DocumentIndex, query_vector: &[f32]) -> Result<Vec<SearchResult>> {
        let mut scores = index
            .embeddings()
            .iter()
            .enumerate()
            .map(|(i, emb)| cosine_similarity(query_vector, emb).map(|score| (i, score)))
            .collect::<Result<Vec<(usize, f32)>>>()?;

        // sort_by is stable, so ties stay in chunk order. partial_cmp keeps
        // -0.0 and 0.0 equal; cosine_similarity never returns NaN.
        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scores.truncate(self.top_k);

        let results: Vec<SearchResult> = scores
            .into_iter()
            .map(|(i, score)| SearchResult {
                chunk: index.chunks()[i].clone(),
                score,
            })
            .collect();

        log::debug!(
            "Top chunks: {:?}",
            results
                .iter()
                .map(|r| (r.chunk.index, r.score))
                .collect::<Vec<_>>()
        );
        Ok(results)
    }
}

/// Chunk texts joined by newlines, in result order
#[must_use]
pub fn render_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|result| result.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
