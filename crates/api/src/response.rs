//! Status envelope used by the generative routes.
//!
//! Successful responses look like `{"status": "success", "<key>": ...}`;
//! failures are rendered by [`AssistError`](crate::error::AssistError).

use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

pub const STATUS_SUCCESS: &str = "success";

/// `{"status": "success"}` extended with payload keys.
#[derive(Debug, Default)]
pub struct StatusEnvelope {
    fields: Map<String, Value>,
}

impl StatusEnvelope {
    pub fn success() -> Self {
        let mut fields = Map::new();
        fields.insert("status".to_string(), Value::from(STATUS_SUCCESS));
        Self { fields }
    }

    /// Add a payload key. Values that fail to serialize become `null`.
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn into_json(self) -> Json<Value> {
        Json(Value::Object(self.fields))
    }
}
