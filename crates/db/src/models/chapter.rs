//! Chapter entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyforge_core::context::ChapterSnapshot;
use storyforge_core::entity::EntityFields;
use storyforge_core::types::{DbId, Timestamp};
use validator::Validate;

/// A chapter row from the `chapters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Chapter {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub chapter_number: i32,
    pub notes: Option<String>,
    pub content: Option<String>,
    /// Set to NULL when the character is deleted.
    pub point_of_view_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Chapter {
    /// Prompt inputs, given the resolved point-of-view character name.
    pub fn entity_fields(&self, point_of_view: Option<String>) -> EntityFields {
        EntityFields::Chapter {
            title: self.title.clone(),
            chapter_number: self.chapter_number,
            point_of_view,
            notes: self.notes.clone(),
        }
    }
}

/// A chapter with its linked characters, places and organizations, plus
/// the plot points assigned to it.
#[derive(Debug, Clone, Serialize)]
pub struct ChapterDetail {
    #[serde(flatten)]
    pub chapter: Chapter,
    pub character_ids: Vec<DbId>,
    pub place_ids: Vec<DbId>,
    pub organization_ids: Vec<DbId>,
    pub plot_point_ids: Vec<DbId>,
}

/// DTO for creating a new chapter.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateChapter {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Defaults to 1 if omitted.
    #[validate(range(min = 0))]
    pub chapter_number: Option<i32>,
    pub notes: Option<String>,
    pub content: Option<String>,
    pub point_of_view_id: Option<DbId>,
    #[serde(default)]
    pub character_ids: Vec<DbId>,
    #[serde(default)]
    pub place_ids: Vec<DbId>,
    #[serde(default)]
    pub organization_ids: Vec<DbId>,
    /// Plot points to move into this chapter.
    #[serde(default)]
    pub plot_point_ids: Vec<DbId>,
}

/// DTO for updating a chapter. Present id lists replace their set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateChapter {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(range(min = 0))]
    pub chapter_number: Option<i32>,
    pub notes: Option<String>,
    pub content: Option<String>,
    /// Absent keeps the current value; `null` clears it.
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub point_of_view_id: Option<Option<DbId>>,
    pub character_ids: Option<Vec<DbId>>,
    pub place_ids: Option<Vec<DbId>>,
    pub organization_ids: Option<Vec<DbId>>,
    /// Replaces the set of plot points in this chapter. Plot points
    /// dropped from the list lose their chapter.
    pub plot_point_ids: Option<Vec<DbId>>,
}

impl From<ChapterDetail> for ChapterSnapshot {
    fn from(d: ChapterDetail) -> Self {
        let c = d.chapter;
        Self {
            id: c.id,
            title: c.title,
            chapter_number: c.chapter_number,
            notes: c.notes,
            content: c.content,
            point_of_view_id: c.point_of_view_id,
            character_ids: d.character_ids,
            place_ids: d.place_ids,
            organization_ids: d.organization_ids,
            created_at: c.created_at,
        }
    }
}
