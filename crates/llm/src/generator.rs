use crate::error::Result;
use async_trait::async_trait;

/// A text generation model
#[async_trait]
pub trait Generator: Send + Sync {
    fn model_id(&self) -> &str;

    /// One prompt in, the model's raw text out
    async fn generate(&self, prompt: &str) -> Result<String>;
}
