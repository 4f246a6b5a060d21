//! Row models and request DTOs, one module per table family.

pub mod attribute;
pub mod chapter;
pub mod character;
pub mod organization;
pub mod place;
pub mod plot_point;
pub mod project;
pub mod relationship;
pub mod research_note;

use serde::{Deserialize, Deserializer};

/// Deserializer for clearable nullable fields.
///
/// Pair with `#[serde(default)]`: an absent key stays `None`, an explicit
/// `null` becomes `Some(None)` and a value becomes `Some(Some(v))`.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
