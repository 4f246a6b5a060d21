//! Directed character relationship model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyforge_core::context::RelationshipSnapshot;
use storyforge_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `character_relationships` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Relationship {
    pub id: DbId,
    pub project_id: DbId,
    pub from_character_id: DbId,
    pub to_character_id: DbId,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a relationship. Both characters must be in the project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRelationship {
    pub from_character_id: DbId,
    pub to_character_id: DbId,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// DTO for updating a relationship. The endpoints are fixed once created.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRelationship {
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl From<Relationship> for RelationshipSnapshot {
    fn from(r: Relationship) -> Self {
        Self {
            id: r.id,
            from_character_id: r.from_character_id,
            to_character_id: r.to_character_id,
            description: r.description,
            created_at: r.created_at,
        }
    }
}
