//! Sparse mapping builder used for every entity in the structured record.

use serde_json::{Map, Value};

use crate::delimited::{non_blank, split_list, split_tags};

use super::options::AttributeMerge;
use super::snapshot::CustomAttributeValue;

/// Ordered JSON object that never stores null, blank or empty-list values.
#[derive(Debug, Default)]
pub(crate) struct Fields {
    map: Map<String, Value>,
}

impl Fields {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Trimmed text, omitted when blank.
    pub(crate) fn text(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = non_blank(value) {
            self.map.insert(key.to_string(), Value::String(v.to_string()));
        }
        self
    }

    pub(crate) fn number(&mut self, key: &str, value: i64) -> &mut Self {
        self.map.insert(key.to_string(), Value::from(value));
        self
    }

    /// String list, omitted when empty.
    pub(crate) fn names(&mut self, key: &str, items: Vec<String>) -> &mut Self {
        if !items.is_empty() {
            let values = items.into_iter().map(Value::String).collect();
            self.map.insert(key.to_string(), Value::Array(values));
        }
        self
    }

    /// `;`-delimited field split into tokens.
    pub(crate) fn list(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        self.names(key, split_list(value))
    }

    /// `,`-delimited field split into tokens.
    pub(crate) fn tags(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        self.names(key, split_tags(value))
    }

    /// Array of nested objects, omitted when empty.
    pub(crate) fn objects(&mut self, key: &str, items: Vec<Value>) -> &mut Self {
        if !items.is_empty() {
            self.map.insert(key.to_string(), Value::Array(items));
        }
        self
    }

    /// Merge custom attribute values after the intrinsic fields.
    ///
    /// `attrs` must already be in output order. Keys listed in `reserved` are
    /// never written by a custom attribute.
    pub(crate) fn custom(
        &mut self,
        attrs: &[&CustomAttributeValue],
        merge: AttributeMerge,
        reserved: &[&str],
    ) -> &mut Self {
        for attr in attrs {
            let Some(value) = non_blank(Some(attr.value.as_str())) else {
                continue;
            };
            if reserved.contains(&attr.name.as_str()) {
                continue;
            }
            if self.map.contains_key(&attr.name) && merge == AttributeMerge::PreserveIntrinsic {
                continue;
            }
            // With `preserve_order`, inserting an existing key keeps its slot.
            self.map
                .insert(attr.name.clone(), Value::String(value.to_string()));
        }
        self
    }

    pub(crate) fn into_map(self) -> Map<String, Value> {
        self.map
    }

    pub(crate) fn into_value(self) -> Value {
        Value::Object(self.map)
    }
}
