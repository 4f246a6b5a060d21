//! Research note model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyforge_core::context::ResearchNoteSnapshot;
use storyforge_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `research_notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ResearchNote {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub content: Option<String>,
    /// Comma-delimited.
    pub tags: Option<String>,
    /// Location under the media root. Never sent to clients.
    #[serde(skip_serializing)]
    pub file_path: Option<String>,
    /// Original name of the uploaded file.
    pub file_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a research note. Files are attached separately.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateResearchNote {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub content: Option<String>,
    #[validate(length(max = 500))]
    pub tags: Option<String>,
}

/// DTO for updating a research note. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateResearchNote {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub content: Option<String>,
    #[validate(length(max = 500))]
    pub tags: Option<String>,
}

impl From<ResearchNote> for ResearchNoteSnapshot {
    fn from(n: ResearchNote) -> Self {
        Self {
            id: n.id,
            title: n.title,
            content: n.content,
            tags: n.tags,
            file_name: n.file_name,
            updated_at: n.updated_at,
        }
    }
}
