//! Plot point entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyforge_core::context::PlotPointSnapshot;
use storyforge_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `plot_points` table.
///
/// `order` is stored as `sort_order`. The five narrative fields are
/// semicolon-delimited.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlotPoint {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
    /// Set to NULL when the chapter is deleted.
    pub chapter_id: Option<DbId>,
    pub narrative_function: Option<String>,
    pub key_events: Option<String>,
    pub information_revealed_to_reader: Option<String>,
    pub character_development_achieved: Option<String>,
    pub conflict_introduced_or_escalated: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A plot point with its linked characters, places and organizations.
#[derive(Debug, Clone, Serialize)]
pub struct PlotPointDetail {
    #[serde(flatten)]
    pub plot_point: PlotPoint,
    pub character_ids: Vec<DbId>,
    pub place_ids: Vec<DbId>,
    pub organization_ids: Vec<DbId>,
}

/// DTO for creating a new plot point.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreatePlotPoint {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Defaults to 0 if omitted.
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
    pub chapter_id: Option<DbId>,
    pub narrative_function: Option<String>,
    pub key_events: Option<String>,
    pub information_revealed_to_reader: Option<String>,
    pub character_development_achieved: Option<String>,
    pub conflict_introduced_or_escalated: Option<String>,
    #[serde(default)]
    pub character_ids: Vec<DbId>,
    #[serde(default)]
    pub place_ids: Vec<DbId>,
    #[serde(default)]
    pub organization_ids: Vec<DbId>,
}

/// DTO for updating a plot point. Present id lists replace their set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePlotPoint {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
    /// Absent keeps the current chapter; `null` detaches the plot point.
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub chapter_id: Option<Option<DbId>>,
    pub narrative_function: Option<String>,
    pub key_events: Option<String>,
    pub information_revealed_to_reader: Option<String>,
    pub character_development_achieved: Option<String>,
    pub conflict_introduced_or_escalated: Option<String>,
    pub character_ids: Option<Vec<DbId>>,
    pub place_ids: Option<Vec<DbId>>,
    pub organization_ids: Option<Vec<DbId>>,
}

impl From<PlotPointDetail> for PlotPointSnapshot {
    fn from(d: PlotPointDetail) -> Self {
        let p = d.plot_point;
        Self {
            id: p.id,
            title: p.title,
            order: p.sort_order,
            chapter_id: p.chapter_id,
            narrative_function: p.narrative_function,
            key_events: p.key_events,
            information_revealed_to_reader: p.information_revealed_to_reader,
            character_development_achieved: p.character_development_achieved,
            conflict_introduced_or_escalated: p.conflict_introduced_or_escalated,
            character_ids: d.character_ids,
            place_ids: d.place_ids,
            organization_ids: d.organization_ids,
            created_at: p.created_at,
        }
    }
}
