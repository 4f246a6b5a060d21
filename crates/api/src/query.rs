//! Shared query parameter types for API handlers.

use serde::Deserialize;
use storyforge_core::context::{parse_sections, ContextFormat, ContextOptions};
use storyforge_core::error::CoreError;

use crate::config::ServerConfig;

/// Query parameters for context-building routes (`?exclude=&format=`).
///
/// `exclude` is a comma-separated list of section keys; `format` is
/// `json` or `labeled`. Omitted values fall back to server configuration.
#[derive(Debug, Default, Deserialize)]
pub struct ContextParams {
    pub exclude: Option<String>,
    pub format: Option<String>,
}

impl ContextParams {
    pub fn to_options(&self, config: &ServerConfig) -> Result<ContextOptions, CoreError> {
        let exclude = match self.exclude.as_deref() {
            Some(csv) => parse_sections(csv)?,
            None => Default::default(),
        };
        let format = match self.format.as_deref().map(str::trim) {
            Some(f) if !f.is_empty() => ContextFormat::from_str_value(f)?,
            _ => config.context_format,
        };
        Ok(ContextOptions {
            exclude,
            format,
            attribute_merge: config.attribute_merge,
        })
    }
}
