use crate::error::{Result, VectorStoreError};
use crate::fingerprint::Fingerprint;
use std::path::{Path, PathBuf};

const CACHE_MAGIC: &[u8; 4] = b"DQE1";
const HEADER_LEN: usize = 4 + Fingerprint::LEN + 4 + 4;

/// Flat-file cache of one document's chunk embeddings.
///
/// Layout (little-endian): magic, fingerprint, `u32` vector count, `u32`
/// dimension, then `count * dimension` `f32` values in chunk order.
#[derive(Clone, Debug)]
pub struct EmbeddingCache {
    path: PathBuf,
}

impl EmbeddingCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read cached vectors if the file exists, is well-formed and was built
    /// from inputs matching `fingerprint`.
    pub async fn load(&self, fingerprint: &Fingerprint) -> Option<Vec<Vec<f32>>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No embedding cache at {}", self.path.display());
                return None;
            }
            Err(err) => {
                log::warn!("Cannot read embedding cache {}: {err}", self.path.display());
                return None;
            }
        };

        let (stored, vectors) = match decode(&bytes) {
            Ok(decoded) => decoded,
            Err(reason) => {
                log::warn!(
                    "Ignoring corrupt embedding cache {}: {reason}",
                    self.path.display()
                );
                return None;
            }
        };

        if stored != *fingerprint {
            log::warn!(
                "Embedding cache {} is stale (cached {}, current {})",
                self.path.display(),
                stored.short(),
                fingerprint.short()
            );
            return None;
        }

        Some(vectors)
    }

    /// Persist vectors, replacing any previous file atomically
    pub async fn save(&self, fingerprint: &Fingerprint, vectors: &[Vec<f32>]) -> Result<()> {
        let bytes = encode(fingerprint, vectors)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, &bytes).await?;
        if let Err(err) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }

        log::info!(
            "Saved {} embeddings to {}",
            vectors.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn encode(fingerprint: &Fingerprint, vectors: &[Vec<f32>]) -> Result<Vec<u8>> {
    let dimension = vectors.first().map_or(0, Vec::len);
    if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
        return Err(VectorStoreError::InvalidDimension {
            expected: dimension,
            actual: bad.len(),
        });
    }

    let mut out = Vec::with_capacity(HEADER_LEN + vectors.len() * dimension * 4);
    out.extend_from_slice(CACHE_MAGIC);
    out.extend_from_slice(fingerprint.as_bytes());
    #[allow(clippy::cast_possible_truncation)]
    {
        out.extend_from_slice(&(vectors.len() as u32).to_le_bytes());
        out.extend_from_slice(&(dimension as u32).to_le_bytes());
    }
    for v in vectors.iter().flatten() {
        out.extend_from_slice(&v.to_le_bytes());
    }
    Ok(out)
}

fn decode(bytes: &[u8]) -> std::result::Result<(Fingerprint, Vec<Vec<f32>>), &'static str> {
    if bytes.len() < HEADER_LEN {
        return Err("truncated header");
    }
    if &bytes[0..4] != CACHE_MAGIC {
        return Err("bad magic");
    }

    let fp_end = 4 + Fingerprint::LEN;
    let fingerprint: [u8; 32] = bytes[4..fp_end]
        .try_into()
        .map_err(|_| "bad fingerprint")?;
    let read_u32 = |at: usize| -> std::result::Result<usize, &'static str> {
        let raw: [u8; 4] = bytes[at..at + 4].try_into().map_err(|_| "bad header")?;
        Ok(u32::from_le_bytes(raw) as usize)
    };
    let count = read_u32(fp_end)?;
    let dimension = read_u32(fp_end + 4)?;

    let expected_len = count
        .checked_mul(dimension)
        .and_then(|n| n.checked_mul(4))
        .and_then(|n| n.checked_add(HEADER_LEN))
        .ok_or("header overflow")?;
    if bytes.len() != expected_len {
        return Err("length does not match header");
    }

    let mut values = bytes[HEADER_LEN..]
        .chunks_exact(4)
        .map(|raw| f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]));
    let vectors: Vec<Vec<f32>> = (0..count)
        .map(|_| values.by_ref().take(dimension).collect::<Vec<f32>>())
        .collect();

    Ok((Fingerprint::from_bytes(fingerprint), vectors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_chunker::ChunkerConfig;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn fingerprint(text: &str) -> Fingerprint {
        Fingerprint::compute("model", &ChunkerConfig::default(), text)
    }

    #[tokio::test]
    async fn roundtrip_is_bit_exact() {
        let tmp = TempDir::new().unwrap();
        let cache = EmbeddingCache::new(tmp.path().join("embeddings.bin"));
        let fp = fingerprint("doc");
        let vectors = vec![
            vec![0.1, -0.2, f32::MIN_POSITIVE, 1.0e-30],
            vec![std::f32::consts::PI, -0.0, 123_456.79, f32::EPSILON],
        ];

        cache.save(&fp, &vectors).await.unwrap();
        let loaded = cache.load(&fp).await.unwrap();

        let bits = |vs: &[Vec<f32>]| -> Vec<Vec<u32>> {
            vs.iter()
                .map(|v| v.iter().map(|x| x.to_bits()).collect())
                .collect()
        };
        assert_eq!(bits(&loaded), bits(&vectors));
    }

    #[tokio::test]
    async fn missing_file_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        let cache = EmbeddingCache::new(tmp.path().join("none.bin"));
        assert!(cache.load(&fingerprint("doc")).await.is_none());
    }

    #[tokio::test]
    async fn stale_fingerprint_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        let cache = EmbeddingCache::new(tmp.path().join("embeddings.bin"));
        cache
            .save(&fingerprint("old text"), &[vec![1.0, 2.0]])
            .await
            .unwrap();

        assert!(cache.load(&fingerprint("new text")).await.is_none());
        assert!(cache.load(&fingerprint("old text")).await.is_some());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("embeddings.bin");
        let cache = EmbeddingCache::new(&path);
        let fp = fingerprint("doc");
        cache.save(&fp, &[vec![1.0, 2.0, 3.0]]).await.unwrap();

        let mut bytes = std::fs::read(&path).unwrap();
        bytes.truncate(bytes.len() - 2);
        std::fs::write(&path, &bytes).unwrap();
        assert!(cache.load(&fp).await.is_none());

        std::fs::write(&path, b"not a cache file at all, just some words here").unwrap();
        assert!(cache.load(&fp).await.is_none());
    }

    #[tokio::test]
    async fn save_leaves_no_temp_file_and_creates_parent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("embeddings.bin");
        let cache = EmbeddingCache::new(&path);
        cache.save(&fingerprint("doc"), &[vec![0.5]]).await.unwrap();

        assert!(path.exists());
        assert!(!tmp.path().join("nested").join("embeddings.bin.tmp").exists());
    }

    #[tokio::test]
    async fn ragged_vectors_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let cache = EmbeddingCache::new(tmp.path().join("embeddings.bin"));
        let err = cache
            .save(&fingerprint("doc"), &[vec![1.0, 2.0], vec![1.0]])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VectorStoreError::InvalidDimension {
                expected: 2,
                actual: 1
            }
        ));
        assert!(!cache.path().exists());
    }
}
