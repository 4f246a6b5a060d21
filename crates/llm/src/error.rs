/// Failures of an outbound generation call.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Generative text API key is not configured")]
    MissingApiKey,

    #[error("Generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Generation API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Generation API returned no text")]
    EmptyResponse,

    #[error("Generation API returned an unreadable response: {0}")]
    InvalidResponse(String),
}
