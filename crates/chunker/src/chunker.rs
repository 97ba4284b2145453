use crate::config::ChunkerConfig;
use crate::error::{ChunkerError, Result};
use crate::types::Chunk;

/// Splits text into fixed-size overlapping windows
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    /// Create a new chunker, rejecting configs that would not advance
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Chunk a string.
    ///
    /// Offsets and lengths are in characters, so a window never ends inside a
    /// multi-byte character.
    pub fn chunk_str(&self, text: &str) -> Result<Vec<Chunk>> {
        if text.is_empty() {
            return Err(ChunkerError::EmptyContent);
        }

        // Byte offset of every character boundary, including the end of the text.
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();
        let total_chars = boundaries.len() - 1;

        let size = self.config.chunk_size;
        let step = self.config.step();

        let mut chunks = Vec::with_capacity(total_chars.div_ceil(step));
        let mut start = 0;
        loop {
            let end = (start + size).min(total_chars);
            let slice = &text[boundaries[start]..boundaries[end]];
            chunks.push(Chunk::new(chunks.len(), start, slice.to_string()));
            if end == total_chars {
                break;
            }
            start += step;
        }

        log::debug!(
            "Chunked {} chars into {} chunks (size={}, overlap={})",
            total_chars,
            chunks.len(),
            size,
            self.config.overlap
        );

        Ok(chunks)
    }

    /// Get chunking statistics
    #[must_use]
    pub fn get_stats(chunks: &[Chunk]) -> ChunkingStats {
        let lengths = || chunks.iter().map(Chunk::char_len);
        let total_chars: usize = lengths().sum();
        ChunkingStats {
            total_chunks: chunks.len(),
            total_chars,
            avg_chars_per_chunk: if chunks.is_empty() {
                0
            } else {
                total_chars / chunks.len()
            },
            min_chars: lengths().min().unwrap_or(0),
            max_chars: lengths().max().unwrap_or(0),
        }
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            config: ChunkerConfig::default(),
        }
    }
}

/// Statistics about chunking results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingStats {
    pub total_chunks: usize,
    pub total_chars: usize,
    pub avg_chars_per_chunk: usize,
    pub min_chars: usize,
    pub max_chars: usize,
}

impl std::fmt::Display for ChunkingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunks: {} | Chars: {} | Avg: {} | Range: {}-{}",
            self.total_chunks,
            self.total_chars,
            self.avg_chars_per_chunk,
            self.min_chars,
            self.max_chars
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn chunker(size: usize, overlap: usize) -> Chunker {
        Chunker::new(ChunkerConfig::new(size, overlap)).unwrap()
    }

    fn expected_count(n: usize, size: usize, overlap: usize) -> usize {
        if n <= size {
            1
        } else {
            (n - overlap).div_ceil(size - overlap)
        }
    }

    #[test]
    fn test_chunk_empty_content() {
        let result = Chunker::default().chunk_str("");
        assert_eq!(result, Err(ChunkerError::EmptyContent));
    }

    #[test]
    fn test_invalid_overlap_rejected() {
        let result = Chunker::new(ChunkerConfig::new(10, 10));
        assert!(matches!(result, Err(ChunkerError::InvalidConfig(_))));
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let text = "The capital of Sweden is Stockholm.";
        let chunks = Chunker::default().chunk_str(text).unwrap();
        assert_eq!(chunks, vec![Chunk::new(0, 0, text.to_string())]);
    }

    #[test]
    fn test_text_of_exact_chunk_size_is_single_chunk() {
        let text = "x".repeat(1000);
        let chunks = Chunker::default().chunk_str(&text).unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_windows_start_at_multiples_of_step() {
        let chunks = chunker(4, 1).chunk_str("abcdefghij").unwrap();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["abcd", "defg", "ghij"]);
        let starts: Vec<usize> = chunks.iter().map(|c| c.start).collect();
        assert_eq!(starts, vec![0, 3, 6]);
    }

    #[test]
    fn test_last_chunk_may_be_short() {
        let chunks = chunker(4, 1).chunk_str("abcdefghijk").unwrap();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["abcd", "defg", "ghij", "jk"]);
    }

    #[test]
    fn test_multibyte_characters_counted_as_characters() {
        let chunks = chunker(3, 1).chunk_str("åäöÅÄÖ").unwrap();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["åäö", "öÅÄ", "ÄÖ"]);
    }

    #[test]
    fn test_chunking_stats() {
        let chunks = chunker(4, 1).chunk_str("abcdefghijk").unwrap();
        let stats = Chunker::get_stats(&chunks);

        assert_eq!(stats.total_chunks, 4);
        assert_eq!(stats.total_chars, 14);
        assert_eq!(stats.avg_chars_per_chunk, 3);
        assert_eq!(stats.min_chars, 2);
        assert_eq!(stats.max_chars, 4);
    }

    fn size_and_overlap() -> impl Strategy<Value = (usize, usize)> {
        (1usize..300).prop_flat_map(|size| (Just(size), 0..size))
    }

    proptest! {
        #[test]
        fn proptest_chunk_count_matches_formula(
            chars in proptest::collection::vec(any::<char>(), 1..2000),
            (size, overlap) in size_and_overlap(),
        ) {
            let text: String = chars.iter().collect();
            let chunks = chunker(size, overlap).chunk_str(&text).unwrap();
            prop_assert_eq!(chunks.len(), expected_count(chars.len(), size, overlap));
        }

        #[test]
        fn proptest_all_but_last_chunk_have_full_length(
            chars in proptest::collection::vec(any::<char>(), 1..2000),
            (size, overlap) in size_and_overlap(),
        ) {
            let text: String = chars.iter().collect();
            let chunks = chunker(size, overlap).chunk_str(&text).unwrap();
            let (last, rest) = chunks.split_last().unwrap();
            for chunk in rest {
                prop_assert_eq!(chunk.char_len(), size);
            }
            prop_assert!(last.char_len() <= size);
            prop_assert_eq!(last.end(), chars.len());
        }

        #[test]
        fn proptest_consecutive_chunks_overlap_exactly(
            chars in proptest::collection::vec(any::<char>(), 1..2000),
            (size, overlap) in size_and_overlap(),
        ) {
            let text: String = chars.iter().collect();
            let chunks = chunker(size, overlap).chunk_str(&text).unwrap();
            for pair in chunks.windows(2) {
                let prev: Vec<char> = pair[0].text.chars().collect();
                let next: Vec<char> = pair[1].text.chars().collect();
                prop_assert_eq!(pair[1].start - pair[0].start, size - overlap);
                prop_assert_eq!(&prev[size - overlap..], &next[..overlap]);
            }
        }

        #[test]
        fn proptest_chunks_reassemble_source(
            chars in proptest::collection::vec(any::<char>(), 1..2000),
            (size, overlap) in size_and_overlap(),
        ) {
            let text: String = chars.iter().collect();
            let chunks = chunker(size, overlap).chunk_str(&text).unwrap();
            let mut rebuilt: String = chunks[0].text.clone();
            for chunk in &chunks[1..] {
                rebuilt.extend(chunk.text.chars().skip(overlap));
            }
            prop_assert_eq!(rebuilt, text);
        }
    }
}
