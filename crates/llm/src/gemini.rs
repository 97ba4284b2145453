//! Client for the Generative Language REST API.

use std::time::Duration;

use crate::error::{LlmError, Result};
use crate::generator::Generator;
use async_trait::async_trait;
use docqa_vector_store::{Embedder, TaskType, VectorStoreError};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_EMBEDDING_MODEL: &str = "models/embedding-001";
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-1.5-flash";

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub embedding_model: String,
    pub generation_model: String,
    pub timeout: Duration,
    /// Extra attempts after a retryable failure (429, 5xx, connect, timeout)
    pub max_retries: usize,
    /// Delay before the first retry; doubles on each further attempt
    pub retry_backoff: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
    embed_url: String,
    generate_url: String,
    embedding_model: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Config("missing Gemini API key".to_string()));
        }

        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(config.api_key.trim())
            .map_err(|_| LlmError::Config("API key is not a valid header value".to_string()))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        let base = config.base_url.trim_end_matches('/');
        let embedding_model = qualified_model(&config.embedding_model);
        let generate_model = qualified_model(&config.generation_model);
        Ok(Self {
            embed_url: format!("{base}/{embedding_model}:embedContent"),
            generate_url: format!("{base}/{generate_model}:generateContent"),
            embedding_model,
            client,
            config,
        })
    }

    pub async fn embed_content(&self, text: &str, task: TaskType) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            model: &self.embedding_model,
            content: Content::user(text),
            task_type: task.as_api_str(),
        };
        let response: EmbedResponse = self
            .post_json("embedContent", &self.embed_url, &request)
            .await?;
        if response.embedding.values.is_empty() {
            return Err(LlmError::EmptyResponse {
                service: "embedContent",
                reason: "embedding has no values".to_string(),
            });
        }
        Ok(response.embedding.values)
    }

    pub async fn generate_content(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content::user(prompt)],
        };
        let response: GenerateResponse = self
            .post_json("generateContent", &self.generate_url, &request)
            .await?;
        response.into_text()
    }

    async fn post_json<B, R>(&self, service: &'static str, url: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut attempt = 0usize;
        loop {
            match self.client.post(url).json(body).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return Ok(resp.json().await?);
                    }

                    let text = resp
                        .text()
                        .await
                        .unwrap_or_else(|_| "<body unavailable>".to_string());
                    if should_retry(status) && attempt < self.config.max_retries {
                        attempt += 1;
                        log::warn!(
                            "{service} returned {status}, retry {attempt}/{}",
                            self.config.max_retries
                        );
                        tokio::time::sleep(self.retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(LlmError::Service {
                        service,
                        status: status.as_u16(),
                        body: text,
                    });
                }
                Err(err) => {
                    if is_retryable_error(&err) && attempt < self.config.max_retries {
                        attempt += 1;
                        log::warn!(
                            "{service} request failed ({err}), retry {attempt}/{}",
                            self.config.max_retries
                        );
                        tokio::time::sleep(self.retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(err.into());
                }
            }
        }
    }

    fn retry_backoff(&self, attempt: usize) -> Duration {
        let capped = attempt.saturating_sub(1).min(5) as u32;
        self.config.retry_backoff * (1 << capped)
    }
}

#[async_trait]
impl Embedder for GeminiClient {
    fn model_id(&self) -> &str {
        &self.embedding_model
    }

    async fn embed(&self, text: &str, task: TaskType) -> docqa_vector_store::Result<Vec<f32>> {
        self.embed_content(text, task)
            .await
            .map_err(|err| VectorStoreError::EmbeddingError(err.to_string()))
    }
}

#[async_trait]
impl Generator for GeminiClient {
    fn model_id(&self) -> &str {
        &self.config.generation_model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_content(prompt).await
    }
}

fn qualified_model(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    fn user(text: &'a str) -> Self {
        Self {
            role: "user",
            parts: vec![Part { text }],
        }
    }
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    task_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateResponse {
    /// Text parts of the first candidate, concatenated
    fn into_text(self) -> Result<String> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(LlmError::EmptyResponse {
                service: "generateContent",
                reason: block_reason.map_or_else(
                    || "no candidates".to_string(),
                    |reason| format!("prompt blocked ({reason})"),
                ),
            });
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(LlmError::EmptyResponse {
                service: "generateContent",
                reason: format!(
                    "candidate has no text (finish reason {})",
                    candidate.finish_reason.as_deref().unwrap_or("unknown")
                ),
            });
        }
        Ok(text)
    }
}
