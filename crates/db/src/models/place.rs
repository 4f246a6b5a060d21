//! Place entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyforge_core::context::PlaceSnapshot;
use storyforge_core::entity::EntityFields;
use storyforge_core::types::{DbId, Timestamp};
use validator::Validate;

/// A place row from the `places` table.
///
/// `sensory_details_keywords`, `atmosphere_keywords` and
/// `strategic_importance_or_plot_relevance` are semicolon-delimited.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Place {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub sensory_details_keywords: Option<String>,
    pub atmosphere_keywords: Option<String>,
    pub strategic_importance_or_plot_relevance: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A place with the characters linked to it.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceDetail {
    #[serde(flatten)]
    pub place: Place,
    pub character_ids: Vec<DbId>,
}

/// DTO for creating a new place.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreatePlace {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(max = 100))]
    pub place_type: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub sensory_details_keywords: Option<String>,
    pub atmosphere_keywords: Option<String>,
    pub strategic_importance_or_plot_relevance: Option<String>,
    #[serde(default)]
    pub character_ids: Vec<DbId>,
}

/// DTO for updating a place. `character_ids`, when present, replaces the set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePlace {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(max = 100))]
    pub place_type: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub sensory_details_keywords: Option<String>,
    pub atmosphere_keywords: Option<String>,
    pub strategic_importance_or_plot_relevance: Option<String>,
    pub character_ids: Option<Vec<DbId>>,
}

impl From<PlaceDetail> for PlaceSnapshot {
    fn from(d: PlaceDetail) -> Self {
        let p = d.place;
        Self {
            id: p.id,
            name: p.name,
            place_type: p.place_type,
            description: p.description,
            summary: p.summary,
            sensory_details_keywords: p.sensory_details_keywords,
            atmosphere_keywords: p.atmosphere_keywords,
            strategic_importance_or_plot_relevance: p.strategic_importance_or_plot_relevance,
            character_ids: d.character_ids,
        }
    }
}

impl From<&Place> for EntityFields {
    fn from(p: &Place) -> Self {
        EntityFields::Place {
            name: p.name.clone(),
            description: p.description.clone(),
        }
    }
}
