/// Default model for `generateContent` calls.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default client-side timeout for one generation call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Text generation settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// `None` when no key is configured; generative routes are then refused.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var            | Default                                       |
    /// |--------------------|-----------------------------------------------|
    /// | `GOOGLE_API_KEY`   | unset                                         |
    /// | `LLM_MODEL`        | `gemini-2.0-flash`                            |
    /// | `LLM_BASE_URL`     | `https://generativelanguage.googleapis.com`   |
    /// | `LLM_TIMEOUT_SECS` | `60`                                          |
    pub fn from_env() -> Self {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let base_url = std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs: u64 = std::env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("LLM_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            model,
            base_url,
            timeout_secs,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
