use std::path::PathBuf;

use storyforge_core::context::{AttributeMerge, ContextFormat};
use storyforge_llm::LlmConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `90`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Directory research-note attachments are written to.
    pub media_root: PathBuf,
    /// Largest accepted request body in bytes (default: 10 MiB).
    pub max_upload_bytes: usize,
    /// Text block format used when a request does not ask for one.
    pub context_format: ContextFormat,
    /// How custom attributes treat intrinsic field names.
    pub attribute_merge: AttributeMerge,
    /// Outbound text generation settings.
    pub llm: LlmConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `90`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                       |
    /// | `MEDIA_ROOT`             | `storage/research_notes`   |
    /// | `MAX_UPLOAD_BYTES`       | `10485760`                 |
    /// | `CONTEXT_FORMAT`         | `json`                     |
    /// | `CUSTOM_ATTRIBUTE_MERGE` | `override`                 |
    ///
    /// The request timeout must outlast `LLM_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "90".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let media_root = PathBuf::from(
            std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "storage/research_notes".into()),
        );

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "10485760".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let context_format = std::env::var("CONTEXT_FORMAT")
            .map(|v| {
                ContextFormat::from_str_value(v.trim())
                    .unwrap_or_else(|e| panic!("Invalid CONTEXT_FORMAT: {e}"))
            })
            .unwrap_or_default();

        let attribute_merge = std::env::var("CUSTOM_ATTRIBUTE_MERGE")
            .map(|v| {
                AttributeMerge::from_str_value(v.trim())
                    .unwrap_or_else(|e| panic!("Invalid CUSTOM_ATTRIBUTE_MERGE: {e}"))
            })
            .unwrap_or_default();

        let llm = LlmConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            media_root,
            max_upload_bytes,
            context_format,
            attribute_merge,
            llm,
        }
    }
}
