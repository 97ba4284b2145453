use crate::config::AppConfig;
use anyhow::{Context, Result};
use docqa_chunker::Chunker;
use docqa_document::PdfLoader;
use docqa_vector_store::{DocumentIndex, Embedder, EmbeddingCache, Fingerprint};

/// Load the PDF, chunk it and attach embeddings (cached or fresh)
pub async fn build_index(config: &AppConfig, embedder: &dyn Embedder) -> Result<DocumentIndex> {
    let document = PdfLoader::load(&config.pdf_path)
        .with_context(|| format!("Failed to load {}", config.pdf_path.display()))?;
    let text = document.text();
    log::info!(
        "Loaded {} ({} pages, {} chars)",
        config.pdf_path.display(),
        document.page_count(),
        text.chars().count()
    );

    let chunker = Chunker::new(config.chunker)?;
    let chunks = chunker
        .chunk_str(&text)
        .with_context(|| format!("Failed to chunk {}", config.pdf_path.display()))?;
    log::info!("{}", Chunker::get_stats(&chunks));

    let fingerprint = Fingerprint::compute(embedder.model_id(), &config.chunker, &text);
    log::debug!("Document fingerprint {}", fingerprint.short());

    let cache = EmbeddingCache::new(config.cache_path.clone());
    DocumentIndex::build(chunks, fingerprint, embedder, &cache)
        .await
        .context("Failed to build embedding index")
}
