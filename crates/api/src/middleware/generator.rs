//! Guard for routes that need the text generation backend.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use storyforge_llm::{LlmError, TextGenerator};

use crate::error::AssistError;
use crate::state::AppState;

/// Yields the configured [`TextGenerator`]. Rejects with 400 and the status
/// envelope when no API key is configured, before any other work happens.
///
/// ```ignore
/// async fn summary(RequireGenerator(generator): RequireGenerator) -> AssistResult<Json<Value>> {
///     let text = generator.generate("...").await?;
///     // ...
/// }
/// ```
pub struct RequireGenerator(pub Arc<dyn TextGenerator>);

impl FromRequestParts<AppState> for RequireGenerator {
    type Rejection = AssistError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match &state.generator {
            Some(generator) => Ok(RequireGenerator(Arc::clone(generator))),
            None => {
                tracing::warn!("Generative route called without an API key");
                Err(LlmError::MissingApiKey.into())
            }
        }
    }
}
