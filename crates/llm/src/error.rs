use docqa_vector_store::VectorStoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LlmError>;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Invalid LLM configuration: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned {status}: {body}")]
    Service {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Empty response from {service}: {reason}")]
    EmptyResponse {
        service: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Retrieval(#[from] VectorStoreError),
}
