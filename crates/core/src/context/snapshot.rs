//! Eagerly loaded project aggregate consumed by the context builder.
//!
//! The db crate fills these from one query per relation. Link sets are carried
//! as id lists and resolved to names by the builder.

use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, Default)]
pub struct ProjectSnapshot {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub core_premise: Option<String>,
    /// Comma-delimited.
    pub key_themes: Option<String>,
    pub genre: Option<String>,
    pub style: Option<String>,
}

/// Semicolon-delimited fields: traits, secondary_goals, key_motivations,
/// strengths, weaknesses, internal_conflict, external_conflict.
#[derive(Debug, Clone, Default)]
pub struct CharacterSnapshot {
    pub id: DbId,
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
}

/// Directed edge `from_character_id -> to_character_id`.
#[derive(Debug, Clone, Default)]
pub struct RelationshipSnapshot {
    pub id: DbId,
    pub from_character_id: DbId,
    pub to_character_id: DbId,
    pub description: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct PlaceSnapshot {
    pub id: DbId,
    pub name: String,
    pub place_type: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub sensory_details_keywords: Option<String>,
    pub atmosphere_keywords: Option<String>,
    pub strategic_importance_or_plot_relevance: Option<String>,
    pub character_ids: Vec<DbId>,
}

#[derive(Debug, Clone, Default)]
pub struct OrganizationSnapshot {
    pub id: DbId,
    pub name: String,
    pub org_type: Option<String>,
    pub description: Option<String>,
    pub goals_and_objectives: Option<String>,
    pub modus_operandi_keywords: Option<String>,
    pub hierarchy_and_membership: Option<String>,
    pub relationships_with_other_entities: Option<String>,
    pub internal_dynamics: Option<String>,
    pub character_ids: Vec<DbId>,
    pub place_ids: Vec<DbId>,
}

#[derive(Debug, Clone, Default)]
pub struct ChapterSnapshot {
    pub id: DbId,
    pub title: String,
    pub chapter_number: i32,
    pub notes: Option<String>,
    pub content: Option<String>,
    pub point_of_view_id: Option<DbId>,
    pub character_ids: Vec<DbId>,
    pub place_ids: Vec<DbId>,
    pub organization_ids: Vec<DbId>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct PlotPointSnapshot {
    pub id: DbId,
    pub title: String,
    pub order: i32,
    pub chapter_id: Option<DbId>,
    pub narrative_function: Option<String>,
    pub key_events: Option<String>,
    pub information_revealed_to_reader: Option<String>,
    pub character_development_achieved: Option<String>,
    pub conflict_introduced_or_escalated: Option<String>,
    pub character_ids: Vec<DbId>,
    pub place_ids: Vec<DbId>,
    pub organization_ids: Vec<DbId>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct ResearchNoteSnapshot {
    pub id: DbId,
    pub title: String,
    pub content: Option<String>,
    /// Comma-delimited.
    pub tags: Option<String>,
    pub file_name: Option<String>,
    pub updated_at: Timestamp,
}

/// The entity a custom attribute value is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeOwner {
    Project,
    Character(DbId),
    Place(DbId),
    Organization(DbId),
}

#[derive(Debug, Clone)]
pub struct CustomAttributeValue {
    pub attribute_id: DbId,
    pub owner: AttributeOwner,
    pub name: String,
    pub value: String,
}

/// A project and everything hanging off it.
#[derive(Debug, Clone, Default)]
pub struct ProjectAggregate {
    pub project: ProjectSnapshot,
    pub characters: Vec<CharacterSnapshot>,
    pub relationships: Vec<RelationshipSnapshot>,
    pub places: Vec<PlaceSnapshot>,
    pub organizations: Vec<OrganizationSnapshot>,
    pub chapters: Vec<ChapterSnapshot>,
    pub plot_points: Vec<PlotPointSnapshot>,
    pub research_notes: Vec<ResearchNoteSnapshot>,
    pub custom_attributes: Vec<CustomAttributeValue>,
}

/// Anything that shows up as a bare name in another entity's reference list.
pub trait Named {
    fn display_name(&self) -> &str;
}

impl Named for CharacterSnapshot {
    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Named for PlaceSnapshot {
    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Named for OrganizationSnapshot {
    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Named for ChapterSnapshot {
    fn display_name(&self) -> &str {
        &self.title
    }
}
