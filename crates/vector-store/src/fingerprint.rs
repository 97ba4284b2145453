use docqa_chunker::ChunkerConfig;
use sha2::{Digest, Sha256};
use std::fmt;

/// Identity of the inputs an embedding cache was built from.
///
/// Covers the embedding model, both chunking parameters and the full source
/// text, so any change to what would be embedded changes the fingerprint.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub const LEN: usize = 32;

    #[must_use]
    pub fn compute(model_id: &str, config: &ChunkerConfig, text: &str) -> Self {
        let mut hasher = Sha256::new();
        // Length-prefix variable fields so adjacent fields cannot run together.
        hasher.update((model_id.len() as u64).to_le_bytes());
        hasher.update(model_id.as_bytes());
        hasher.update((config.chunk_size as u64).to_le_bytes());
        hasher.update((config.overlap as u64).to_le_bytes());
        hasher.update((text.len() as u64).to_le_bytes());
        hasher.update(text.as_bytes());
        Self(hasher.finalize().into())
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First 12 hex digits, for logs
    #[must_use]
    pub fn short(&self) -> String {
        self.to_string()[..12].to_string()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short())
    }
}
