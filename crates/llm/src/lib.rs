//! # docqa LLM
//!
//! Grounded answers over a [`DocumentIndex`](docqa_vector_store::DocumentIndex):
//! retrieve the closest chunks, wrap them in a fixed prompt and ask a
//! generative model once.
//!
//! [`GeminiClient`] talks to the Generative Language REST API and serves as
//! both the [`Embedder`](docqa_vector_store::Embedder) and the [`Generator`].

mod answerer;
mod error;
mod gemini;
mod generator;
mod prompt;

pub use answerer::{Answer, Answerer};
pub use error::{LlmError, Result};
pub use gemini::{
    GeminiClient, GeminiConfig, DEFAULT_API_BASE, DEFAULT_EMBEDDING_MODEL, DEFAULT_GENERATION_MODEL,
};
pub use generator::Generator;
pub use prompt::{build_prompt, FALLBACK_ANSWER};
