use crate::{Cli, EmbedMode};
use docqa_chunker::{ChunkerConfig, ChunkerError};
use docqa_llm::GeminiConfig;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variables checked for the API key, in order
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing API key: set GEMINI_API_KEY (or API_KEY)")]
    MissingApiKey,

    #[error(transparent)]
    Chunking(#[from] ChunkerError),

    #[error("--top-k must be > 0")]
    InvalidTopK,
}

/// Resolved settings for one run
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pdf_path: PathBuf,
    pub cache_path: PathBuf,
    pub chunker: ChunkerConfig,
    pub top_k: usize,
    pub embed_mode: EmbedMode,
    pub dry_run: bool,
    /// Present whenever the run will call the Gemini API
    pub gemini: Option<GeminiConfig>,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli, api_key: Option<String>) -> Result<Self, ConfigError> {
        let chunker = ChunkerConfig::new(cli.chunk_size, cli.overlap);
        chunker.validate()?;
        if cli.top_k == 0 {
            return Err(ConfigError::InvalidTopK);
        }

        let needs_api = cli.embed_mode == EmbedMode::Gemini || !cli.dry_run;
        let gemini = if needs_api {
            let api_key = api_key.ok_or(ConfigError::MissingApiKey)?;
            Some(GeminiConfig {
                base_url: cli.api_base.clone(),
                embedding_model: cli.embedding_model.clone(),
                generation_model: cli.generation_model.clone(),
                timeout: Duration::from_secs(cli.timeout_secs),
                max_retries: cli.max_retries,
                ..GeminiConfig::new(api_key)
            })
        } else {
            None
        };

        Ok(Self {
            pdf_path: cli.pdf.clone(),
            cache_path: cli.cache.clone(),
            chunker,
            top_k: cli.top_k,
            embed_mode: cli.embed_mode,
            dry_run: cli.dry_run,
            gemini,
        })
    }
}

/// First non-blank value among [`API_KEY_VARS`]
pub fn api_key_from_env() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
