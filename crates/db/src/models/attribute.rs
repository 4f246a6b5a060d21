//! Custom attribute definitions and their values.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyforge_core::attribute::AttributeScope;
use storyforge_core::context::{AttributeOwner, CustomAttributeValue};
use storyforge_core::error::CoreError;
use storyforge_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `custom_attributes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CustomAttribute {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    /// One of `project`, `character`, `place`, `organization`.
    pub scope: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CustomAttribute {
    pub fn scope(&self) -> Result<AttributeScope, CoreError> {
        AttributeScope::from_str_value(&self.scope)
    }
}

/// DTO for defining a custom attribute.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCustomAttribute {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub scope: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// A row from the `custom_attribute_values` table.
///
/// No owner column set means the value belongs to the project itself.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttributeValue {
    pub id: DbId,
    pub attribute_id: DbId,
    pub character_id: Option<DbId>,
    pub place_id: Option<DbId>,
    pub organization_id: Option<DbId>,
    pub value: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `PUT .../attributes/{id}/values`.
///
/// `entity_id` is required for character, place and organization scopes and
/// must be absent for the project scope. A blank `value` clears it.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetAttributeValue {
    pub entity_id: Option<DbId>,
    #[validate(length(max = 10000))]
    pub value: String,
}

/// Owner columns `(character_id, place_id, organization_id)` for an owner.
pub fn owner_columns(owner: AttributeOwner) -> (Option<DbId>, Option<DbId>, Option<DbId>) {
    match owner {
        AttributeOwner::Project => (None, None, None),
        AttributeOwner::Character(id) => (Some(id), None, None),
        AttributeOwner::Place(id) => (None, Some(id), None),
        AttributeOwner::Organization(id) => (None, None, Some(id)),
    }
}

/// Value joined with its definition name, as the context loader reads it.
#[derive(Debug, Clone, FromRow)]
pub struct NamedAttributeValue {
    pub attribute_id: DbId,
    pub name: String,
    pub character_id: Option<DbId>,
    pub place_id: Option<DbId>,
    pub organization_id: Option<DbId>,
    pub value: String,
}

impl NamedAttributeValue {
    pub fn owner(&self) -> AttributeOwner {
        match (self.character_id, self.place_id, self.organization_id) {
            (Some(id), _, _) => AttributeOwner::Character(id),
            (_, Some(id), _) => AttributeOwner::Place(id),
            (_, _, Some(id)) => AttributeOwner::Organization(id),
            (None, None, None) => AttributeOwner::Project,
        }
    }
}

impl From<NamedAttributeValue> for CustomAttributeValue {
    fn from(v: NamedAttributeValue) -> Self {
        Self {
            attribute_id: v.attribute_id,
            owner: v.owner(),
            name: v.name,
            value: v.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(c: Option<DbId>, p: Option<DbId>, o: Option<DbId>) -> NamedAttributeValue {
        NamedAttributeValue {
            attribute_id: 1,
            name: "alias".into(),
            character_id: c,
            place_id: p,
            organization_id: o,
            value: "x".into(),
        }
    }

    #[test]
    fn owner_follows_set_column() {
        assert_eq!(named(None, None, None).owner(), AttributeOwner::Project);
        assert_eq!(named(Some(4), None, None).owner(), AttributeOwner::Character(4));
        assert_eq!(named(None, Some(5), None).owner(), AttributeOwner::Place(5));
        assert_eq!(named(None, None, Some(6)).owner(), AttributeOwner::Organization(6));
    }

    #[test]
    fn owner_columns_round_trip() {
        for owner in [
            AttributeOwner::Project,
            AttributeOwner::Character(1),
            AttributeOwner::Place(2),
            AttributeOwner::Organization(3),
        ] {
            let (c, p, o) = owner_columns(owner);
            assert_eq!(named(c, p, o).owner(), owner);
        }
    }
}
