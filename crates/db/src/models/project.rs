//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyforge_core::context::ProjectSnapshot;
use storyforge_core::types::{DbId, Timestamp};
use validator::Validate;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub core_premise: Option<String>,
    /// Comma-delimited.
    pub key_themes: Option<String>,
    pub genre: Option<String>,
    pub style: Option<String>,
    pub owner_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub core_premise: Option<String>,
    pub key_themes: Option<String>,
    #[validate(length(max = 100))]
    pub genre: Option<String>,
    #[validate(length(max = 100))]
    pub style: Option<String>,
    pub owner_id: Option<DbId>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub core_premise: Option<String>,
    pub key_themes: Option<String>,
    #[validate(length(max = 100))]
    pub genre: Option<String>,
    #[validate(length(max = 100))]
    pub style: Option<String>,
}

impl From<Project> for ProjectSnapshot {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            core_premise: p.core_premise,
            key_themes: p.key_themes,
            genre: p.genre,
            style: p.style,
        }
    }
}
