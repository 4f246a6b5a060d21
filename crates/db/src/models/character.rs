//! Character entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyforge_core::context::CharacterSnapshot;
use storyforge_core::entity::EntityFields;
use storyforge_core::types::{DbId, Timestamp};
use validator::Validate;

/// A character row from the `characters` table.
///
/// `traits`, `secondary_goals`, `key_motivations`, `strengths`, `weaknesses`,
/// `internal_conflict` and `external_conflict` are semicolon-delimited.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub role: Option<String>,
    pub description: Option<String>,
    pub traits: Option<String>,
    pub appearance: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub primary_goal: Option<String>,
    pub secondary_goals: Option<String>,
    pub key_motivations: Option<String>,
    pub character_arc_summary: Option<String>,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub internal_conflict: Option<String>,
    pub external_conflict: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new character.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateCharacter {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 100))]
    pub role: Option<String>,
    pub description: Option<String>,
    pub traits: Option<String>,
    pub appearance: Option<String>,
    #[validate(length(max = 50))]
    pub age: Option<String>,
    #[validate(length(max = 50))]
    pub gender: Option<String>,
    pub primary_goal: Option<String>,
    pub secondary_goals: Option<String>,
    pub key_motivations: Option<String>,
    pub character_arc_summary: Option<String>,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub internal_conflict: Option<String>,
    pub external_conflict: Option<String>,
}

/// DTO for updating an existing character. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCharacter {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub role: Option<String>,
    pub description: Option<String>,
    pub traits: Option<String>,
    pub appearance: Option<String>,
    #[validate(length(max = 50))]
    pub age: Option<String>,
    #[validate(length(max = 50))]
    pub gender: Option<String>,
    pub primary_goal: Option<String>,
    pub secondary_goals: Option<String>,
    pub key_motivations: Option<String>,
    pub character_arc_summary: Option<String>,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub internal_conflict: Option<String>,
    pub external_conflict: Option<String>,
}

impl From<Character> for CharacterSnapshot {
    fn from(c: Character) -> Self {
        Self {
            id: c.id,
            name: c.name,
            role: c.role,
            description: c.description,
            traits: c.traits,
            appearance: c.appearance,
            age: c.age,
            gender: c.gender,
            primary_goal: c.primary_goal,
            secondary_goals: c.secondary_goals,
            key_motivations: c.key_motivations,
            character_arc_summary: c.character_arc_summary,
            strengths: c.strengths,
            weaknesses: c.weaknesses,
            internal_conflict: c.internal_conflict,
            external_conflict: c.external_conflict,
        }
    }
}

impl From<&Character> for EntityFields {
    fn from(c: &Character) -> Self {
        EntityFields::Character {
            name: c.name.clone(),
            description: c.description.clone(),
        }
    }
}
