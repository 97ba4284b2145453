use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, ValueEnum};
use docqa_chunker::{DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
use docqa_llm::{
    Answerer, GeminiClient, DEFAULT_API_BASE, DEFAULT_EMBEDDING_MODEL, DEFAULT_GENERATION_MODEL,
};
use docqa_vector_store::{Embedder, Retriever, StubEmbedder, DEFAULT_TOP_K};
use std::io;
use std::path::PathBuf;

pub mod config;
pub mod pipeline;
pub mod session;

pub use config::{api_key_from_env, AppConfig, ConfigError};
pub use session::{is_exit_command, ContextPreview, Responder, Session};

#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(about = "Ask questions about a PDF, answered only from its contents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// PDF to answer questions about
    #[arg(long, env = "DOCQA_PDF", default_value = "Magisteruppsats.pdf")]
    pub pdf: PathBuf,

    /// Embedding cache file, rebuilt when document or settings change
    #[arg(long, env = "DOCQA_CACHE", default_value = "embeddings.bin")]
    pub cache: PathBuf,

    /// Chunk length in characters
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    #[arg(long, default_value_t = DEFAULT_OVERLAP)]
    pub overlap: usize,

    /// Chunks retrieved as context per question
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,

    /// Embedding backend
    #[arg(long, env = "DOCQA_EMBEDDING_MODE", value_enum, default_value_t = EmbedMode::Gemini)]
    pub embed_mode: EmbedMode,

    #[arg(long, env = "DOCQA_EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)]
    pub embedding_model: String,

    #[arg(long, env = "DOCQA_GENERATION_MODEL", default_value = DEFAULT_GENERATION_MODEL)]
    pub generation_model: String,

    #[arg(long, env = "DOCQA_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Per-request timeout for API calls
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,

    /// Extra attempts for 429/5xx and connection failures
    #[arg(long, default_value_t = 2)]
    pub max_retries: usize,

    /// Print retrieved context instead of calling the generation model
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum EmbedMode {
    Gemini,
    Stub,
}

pub async fn main_entry() -> Result<()> {
    // .env must be loaded before parsing so it can feed the DOCQA_* fallbacks
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(&cli);
    match dotenv {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => log::warn!("Ignoring unreadable .env file: {err}"),
    }

    let config = AppConfig::from_cli(&cli, api_key_from_env())?;
    run(config).await
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // Dependency internals are only interesting when debugging. lopdf warns
    // on every font without an /Encoding entry, which most PDFs lack.
    if !cli.verbose {
        builder.filter_module("hyper", log::LevelFilter::Warn);
        builder.filter_module("reqwest", log::LevelFilter::Warn);
        builder.filter_module("lopdf", log::LevelFilter::Error);
    }
    builder.target(env_logger::Target::Stderr).init();
}

/// Build the index, then hand stdin/stdout to an interactive [`Session`]
pub async fn run(config: AppConfig) -> Result<()> {
    let gemini = config
        .gemini
        .clone()
        .map(GeminiClient::new)
        .transpose()
        .context("Failed to create Gemini client")?;

    let stub = StubEmbedder::default();
    let embedder: &dyn Embedder = match config.embed_mode {
        EmbedMode::Stub => &stub,
        EmbedMode::Gemini => gemini
            .as_ref()
            .context("Gemini embeddings need an API key")?,
    };

    let index = pipeline::build_index(&config, embedder).await?;
    log::info!(
        "Index ready: {} chunks, dimension {}",
        index.len(),
        index.dimension()
    );

    let retriever = Retriever::new(config.top_k);
    let document = config.pdf_path.file_stem().map_or_else(
        || config.pdf_path.display().to_string(),
        |stem| stem.to_string_lossy().into_owned(),
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    if config.dry_run {
        let preview = ContextPreview::new(&index, embedder, retriever);
        Session::new(&preview, document)
            .run(stdin.lock(), stdout.lock())
            .await?;
    } else {
        let generator = gemini
            .as_ref()
            .context("Answer generation needs an API key")?;
        let answerer = Answerer::new(&index, embedder, generator, retriever);
        Session::new(&answerer, document)
            .run(stdin.lock(), stdout.lock())
            .await?;
    }

    Ok(())
}
