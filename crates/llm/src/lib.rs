//! Outbound text generation.
//!
//! Handlers talk to a [`TextGenerator`]; [`GeminiClient`] is the production
//! implementation and tests substitute their own.

pub mod config;
pub mod error;
pub mod gemini;
pub mod generator;

pub use config::LlmConfig;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use generator::TextGenerator;
