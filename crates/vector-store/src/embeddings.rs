use crate::error::Result;
use async_trait::async_trait;

/// How the embedding service should treat the text
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TaskType {
    /// A chunk of the indexed document
    RetrievalDocument,
    /// A user question
    RetrievalQuery,
}

impl TaskType {
    /// Wire name used by the Generative Language API
    #[must_use]
    pub const fn as_api_str(self) -> &'static str {
        match self {
            Self::RetrievalDocument => "RETRIEVAL_DOCUMENT",
            Self::RetrievalQuery => "RETRIEVAL_QUERY",
        }
    }
}

/// Source of embedding vectors.
///
/// Implementations must return vectors of one fixed dimension.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Identifier of the model; part of the cache fingerprint
    fn model_id(&self) -> &str;

    async fn embed(&self, text: &str, task: TaskType) -> Result<Vec<f32>>;
}

pub const STUB_DIMENSION: usize = 256;

/// Deterministic offline embedder.
///
/// Each lowercase alphanumeric word is hashed into one of `dimension` buckets
/// and the bucket counts are L2-normalized, so texts sharing words score
/// higher than texts that don't. Text without words embeds to the zero
/// vector.
#[derive(Clone, Debug)]
pub struct StubEmbedder {
    dimension: usize,
    model_id: String,
}

impl StubEmbedder {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        Self {
            dimension,
            model_id: format!("stub-bow-{dimension}"),
        }
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        stub_embed(text, self.dimension)
    }
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self::new(STUB_DIMENSION)
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn embed(&self, text: &str, _task: TaskType) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }
}

fn stub_embed(text: &str, dimension: usize) -> Vec<f32> {
    let mut vec = vec![0.0f32; dimension];
    for word in text
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
    {
        let word = word.to_lowercase();
        #[allow(clippy::cast_possible_truncation)]
        let bucket = (fnv1a_64(word.as_bytes()) % dimension as u64) as usize;
        vec[bucket] += 1.0;
    }
    normalize(&mut vec);
    vec
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vec {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::cosine_similarity;

    #[tokio::test]
    async fn stub_is_deterministic_and_sized() {
        let embedder = StubEmbedder::new(64);
        let a = embedder
            .embed("Stockholm is a city", TaskType::RetrievalDocument)
            .await
            .unwrap();
        let b = embedder
            .embed("Stockholm is a city", TaskType::RetrievalQuery)
            .await
            .unwrap();
        assert_eq!(a.len(), 64);
        assert_eq!(a, b);
    }

    #[test]
    fn stub_ignores_case_and_punctuation() {
        let embedder = StubEmbedder::default();
        assert_eq!(
            embedder.embed_sync("Capital, SWEDEN!"),
            embedder.embed_sync("capital sweden")
        );
    }

    #[test]
    fn stub_scores_shared_words_higher() {
        let embedder = StubEmbedder::default();
        let doc = embedder.embed_sync("The capital of Sweden is Stockholm.");
        let related = embedder.embed_sync("What is the capital of Sweden?");
        let unrelated = embedder.embed_sync("Photosynthesis converts light energy");

        let related_score = cosine_similarity(&doc, &related).unwrap();
        let unrelated_score = cosine_similarity(&doc, &unrelated).unwrap();
        assert!(related_score > unrelated_score);
    }

    #[test]
    fn stub_without_words_is_zero_vector() {
        let embedder = StubEmbedder::new(8);
        assert_eq!(embedder.embed_sync("?!  ..."), vec![0.0; 8]);
    }

    #[test]
    fn zero_dimension_is_clamped_consistently() {
        let embedder = StubEmbedder::new(0);
        assert_eq!(embedder.dimension(), 1);
        assert_eq!(embedder.model_id(), "stub-bow-1");
        assert_eq!(embedder.embed_sync("word").len(), embedder.dimension());
    }

    #[test]
    fn task_type_wire_names() {
        assert_eq!(TaskType::RetrievalDocument.as_api_str(), "RETRIEVAL_DOCUMENT");
        assert_eq!(TaskType::RetrievalQuery.as_api_str(), "RETRIEVAL_QUERY");
    }
}
