//! Custom attribute scopes and validation.
//!
//! A project can define named attributes for itself or for its characters,
//! places and organizations. Values are free text and are merged into the
//! owning entity's context mapping.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const SCOPE_PROJECT: &str = "project";
pub const SCOPE_CHARACTER: &str = "character";
pub const SCOPE_PLACE: &str = "place";
pub const SCOPE_ORGANIZATION: &str = "organization";

/// All valid attribute scope strings.
pub const VALID_SCOPES: &[&str] = &[
    SCOPE_PROJECT,
    SCOPE_CHARACTER,
    SCOPE_PLACE,
    SCOPE_ORGANIZATION,
];

/// Maximum length for an attribute name.
pub const MAX_ATTRIBUTE_NAME_LENGTH: usize = 100;

/// Which kind of entity an attribute definition applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeScope {
    Project,
    Character,
    Place,
    Organization,
}

impl AttributeScope {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            SCOPE_PROJECT => Ok(Self::Project),
            SCOPE_CHARACTER => Ok(Self::Character),
            SCOPE_PLACE => Ok(Self::Place),
            SCOPE_ORGANIZATION => Ok(Self::Organization),
            _ => Err(CoreError::Validation(format!(
                "Invalid attribute scope '{s}'. Must be one of: {}",
                VALID_SCOPES.join(", ")
            ))),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => SCOPE_PROJECT,
            Self::Character => SCOPE_CHARACTER,
            Self::Place => SCOPE_PLACE,
            Self::Organization => SCOPE_ORGANIZATION,
        }
    }
}

/// Validate a custom attribute name.
///
/// Names become keys in the context mapping, so they must be non-empty,
/// bounded, and made of lowercase letters, digits and underscores.
pub fn validate_attribute_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Attribute name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_ATTRIBUTE_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Attribute name exceeds maximum length of {MAX_ATTRIBUTE_NAME_LENGTH} characters (got {})",
            name.len()
        )));
    }
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid_chars || name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(CoreError::Validation(format!(
            "Attribute name '{name}' must start with a letter or underscore and contain only lowercase letters, digits and underscores"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_round_trips_through_db_string() {
        for scope in [
            AttributeScope::Project,
            AttributeScope::Character,
            AttributeScope::Place,
            AttributeScope::Organization,
        ] {
            assert_eq!(AttributeScope::from_str_value(scope.as_str()).unwrap(), scope);
        }
    }

    #[test]
    fn unknown_scope_rejected() {
        let err = AttributeScope::from_str_value("chapter").unwrap_err();
        assert!(err.to_string().contains("Invalid attribute scope"));
    }

    #[test]
    fn snake_case_name_passes() {
        assert!(validate_attribute_name("favourite_weapon").is_ok());
        assert!(validate_attribute_name("_hidden2").is_ok());
    }

    #[test]
    fn empty_name_rejected() {
        let err = validate_attribute_name("").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn name_with_spaces_or_capitals_rejected() {
        assert!(validate_attribute_name("Favourite Weapon").is_err());
        assert!(validate_attribute_name("9lives").is_err());
    }

    #[test]
    fn too_long_name_rejected() {
        let long = "a".repeat(MAX_ATTRIBUTE_NAME_LENGTH + 1);
        let err = validate_attribute_name(&long).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum length"));
    }
}
