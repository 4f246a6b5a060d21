//! Organization entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyforge_core::context::OrganizationSnapshot;
use storyforge_core::entity::EntityFields;
use storyforge_core::types::{DbId, Timestamp};
use validator::Validate;

/// An organization row from the `organizations` table.
///
/// The five descriptive fields after `description` are semicolon-delimited.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organization {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub org_type: Option<String>,
    pub description: Option<String>,
    pub goals_and_objectives: Option<String>,
    pub modus_operandi_keywords: Option<String>,
    pub hierarchy_and_membership: Option<String>,
    pub relationships_with_other_entities: Option<String>,
    pub internal_dynamics: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An organization with its member characters and places.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationDetail {
    #[serde(flatten)]
    pub organization: Organization,
    pub character_ids: Vec<DbId>,
    pub place_ids: Vec<DbId>,
}

/// DTO for creating a new organization.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateOrganization {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(max = 100))]
    pub org_type: Option<String>,
    pub description: Option<String>,
    pub goals_and_objectives: Option<String>,
    pub modus_operandi_keywords: Option<String>,
    pub hierarchy_and_membership: Option<String>,
    pub relationships_with_other_entities: Option<String>,
    pub internal_dynamics: Option<String>,
    #[serde(default)]
    pub character_ids: Vec<DbId>,
    #[serde(default)]
    pub place_ids: Vec<DbId>,
}

/// DTO for updating an organization. Present id lists replace their set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateOrganization {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(max = 100))]
    pub org_type: Option<String>,
    pub description: Option<String>,
    pub goals_and_objectives: Option<String>,
    pub modus_operandi_keywords: Option<String>,
    pub hierarchy_and_membership: Option<String>,
    pub relationships_with_other_entities: Option<String>,
    pub internal_dynamics: Option<String>,
    pub character_ids: Option<Vec<DbId>>,
    pub place_ids: Option<Vec<DbId>>,
}

impl From<OrganizationDetail> for OrganizationSnapshot {
    fn from(d: OrganizationDetail) -> Self {
        let o = d.organization;
        Self {
            id: o.id,
            name: o.name,
            org_type: o.org_type,
            description: o.description,
            goals_and_objectives: o.goals_and_objectives,
            modus_operandi_keywords: o.modus_operandi_keywords,
            hierarchy_and_membership: o.hierarchy_and_membership,
            relationships_with_other_entities: o.relationships_with_other_entities,
            internal_dynamics: o.internal_dynamics,
            character_ids: d.character_ids,
            place_ids: d.place_ids,
        }
    }
}

impl From<&Organization> for EntityFields {
    fn from(o: &Organization) -> Self {
        EntityFields::Organization {
            name: o.name.clone(),
            org_type: o.org_type.clone(),
            description: o.description.clone(),
        }
    }
}
