use async_trait::async_trait;

use crate::error::LlmError;

/// Prompt in, text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`. Exactly one provider call, no retry.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Model identifier, for logs and status checks.
    fn model(&self) -> &str;
}
