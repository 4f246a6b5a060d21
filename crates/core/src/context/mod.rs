//! Project context aggregation.
//!
//! [`build_context`] turns a loaded [`ProjectAggregate`] into a structured
//! record (`{"project": {...}}`) and a flattened text block for prompts.
//! Entity mappings are sparse: null, blank and empty-list values never
//! appear. Sections are sorted here, so the output does not depend on the
//! order the caller loaded rows in.

mod fields;
mod options;
mod render;
mod snapshot;

use std::cmp::Reverse;
use std::collections::HashMap;

use serde_json::{json, Value};

use crate::error::CoreError;
use crate::types::DbId;

use fields::Fields;

pub use options::{
    parse_sections, AttributeMerge, ContextFormat, ContextOptions, Section, FORMAT_JSON,
    FORMAT_LABELED, MERGE_OVERRIDE, MERGE_PRESERVE_INTRINSIC,
};
pub use snapshot::{
    AttributeOwner, ChapterSnapshot, CharacterSnapshot, CustomAttributeValue, Named,
    OrganizationSnapshot, PlaceSnapshot, PlotPointSnapshot, ProjectAggregate, ProjectSnapshot,
    RelationshipSnapshot, ResearchNoteSnapshot,
};

/// Both renditions of a project's context.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectContext {
    /// `{"project": {...}}`.
    pub structured_record: Value,
    /// Rendered project map, see [`ContextFormat`].
    pub text_block: String,
}

/// Build the structured record and text block for `aggregate`.
///
/// Fails with [`CoreError::Internal`] when a link, point-of-view, chapter or
/// relationship refers to an entity missing from the aggregate. That means
/// the loader handed over an inconsistent snapshot.
pub fn build_context(
    aggregate: &ProjectAggregate,
    options: &ContextOptions,
) -> Result<ProjectContext, CoreError> {
    let index = Index::new(aggregate);
    let merge = options.attribute_merge;
    let project = &aggregate.project;

    let mut fields = Fields::new();
    fields
        .text("name", Some(project.name.as_str()))
        .text("description", project.description.as_deref())
        .text("core_premise", project.core_premise.as_deref())
        .tags("key_themes", project.key_themes.as_deref())
        .text("genre", project.genre.as_deref())
        .text("style", project.style.as_deref());

    let reserved: Vec<&str> = Section::ALL.iter().map(Section::key).collect();
    fields.custom(
        &index.attributes_for(AttributeOwner::Project),
        merge,
        &reserved,
    );

    for section in Section::ALL {
        if !options.includes(section) {
            continue;
        }
        let entries = match section {
            Section::Characters => characters(aggregate, &index, merge)?,
            Section::PlotPoints => plot_points(aggregate, &index)?,
            Section::Places => places(aggregate, &index, merge)?,
            Section::Organizations => organizations(aggregate, &index, merge)?,
            Section::Chapters => chapters(aggregate, &index)?,
            Section::ResearchNotes => research_notes(aggregate),
        };
        fields.objects(section.key(), entries);
    }

    let project_map = fields.into_map();
    let text_block = render::render_text_block(&project_map, options.format)?;

    Ok(ProjectContext {
        structured_record: json!({ "project": Value::Object(project_map) }),
        text_block,
    })
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn characters(
    aggregate: &ProjectAggregate,
    index: &Index<'_>,
    merge: AttributeMerge,
) -> Result<Vec<Value>, CoreError> {
    let mut sorted: Vec<&CharacterSnapshot> = aggregate.characters.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    sorted
        .into_iter()
        .map(|c| -> Result<Value, CoreError> {
            let mut fields = Fields::new();
            fields
                .text("name", Some(c.name.as_str()))
                .text("role", c.role.as_deref())
                .text("description", c.description.as_deref())
                .list("traits", c.traits.as_deref())
                .text("appearance", c.appearance.as_deref())
                .text("age", c.age.as_deref())
                .text("gender", c.gender.as_deref())
                .text("primary_goal", c.primary_goal.as_deref())
                .list("secondary_goals", c.secondary_goals.as_deref())
                .list("key_motivations", c.key_motivations.as_deref())
                .text("character_arc_summary", c.character_arc_summary.as_deref())
                .list("strengths", c.strengths.as_deref())
                .list("weaknesses", c.weaknesses.as_deref())
                .list("internal_conflict", c.internal_conflict.as_deref())
                .list("external_conflict", c.external_conflict.as_deref())
                .objects("relationships", index.outgoing_relationships(c.id)?)
                .custom(
                    &index.attributes_for(AttributeOwner::Character(c.id)),
                    merge,
                    &[],
                );
            Ok(fields.into_value())
        })
        .collect()
}

fn plot_points(aggregate: &ProjectAggregate, index: &Index<'_>) -> Result<Vec<Value>, CoreError> {
    let mut sorted: Vec<&PlotPointSnapshot> = aggregate.plot_points.iter().collect();
    sorted.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });

    sorted
        .into_iter()
        .map(|p| -> Result<Value, CoreError> {
            let referrer = format!("Plot point {}", p.id);
            let chapter_title = match p.chapter_id {
                Some(id) => Some(lookup(&index.chapters, id, "chapter", &referrer)?.title.as_str()),
                None => None,
            };
            let mut fields = Fields::new();
            fields
                .number("order", i64::from(p.order))
                .text("title", Some(p.title.as_str()))
                .list("narrative_function", p.narrative_function.as_deref())
                .text("chapter_title", chapter_title)
                .list("key_events", p.key_events.as_deref())
                .list(
                    "information_revealed_to_reader",
                    p.information_revealed_to_reader.as_deref(),
                )
                .list(
                    "character_development_achieved",
                    p.character_development_achieved.as_deref(),
                )
                .list(
                    "conflict_introduced_or_escalated",
                    p.conflict_introduced_or_escalated.as_deref(),
                )
                .names(
                    "characters",
                    resolve_names(&p.character_ids, &index.characters, "character", &referrer)?,
                )
                .names(
                    "places",
                    resolve_names(&p.place_ids, &index.places, "place", &referrer)?,
                )
                .names(
                    "organizations",
                    resolve_names(
                        &p.organization_ids,
                        &index.organizations,
                        "organization",
                        &referrer,
                    )?,
                );
            Ok(fields.into_value())
        })
        .collect()
}

fn places(
    aggregate: &ProjectAggregate,
    index: &Index<'_>,
    merge: AttributeMerge,
) -> Result<Vec<Value>, CoreError> {
    let mut sorted: Vec<&PlaceSnapshot> = aggregate.places.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    sorted
        .into_iter()
        .map(|p| -> Result<Value, CoreError> {
            let referrer = format!("Place {}", p.id);
            let mut fields = Fields::new();
            fields
                .text("name", Some(p.name.as_str()))
                .text("type", p.place_type.as_deref())
                .text("description", p.description.as_deref())
                .text("summary", p.summary.as_deref())
                .list("sensory_details_keywords", p.sensory_details_keywords.as_deref())
                .list("atmosphere_keywords", p.atmosphere_keywords.as_deref())
                .list(
                    "strategic_importance_or_plot_relevance",
                    p.strategic_importance_or_plot_relevance.as_deref(),
                )
                .names(
                    "characters",
                    resolve_names(&p.character_ids, &index.characters, "character", &referrer)?,
                )
                .custom(
                    &index.attributes_for(AttributeOwner::Place(p.id)),
                    merge,
                    &[],
                );
            Ok(fields.into_value())
        })
        .collect()
}

fn organizations(
    aggregate: &ProjectAggregate,
    index: &Index<'_>,
    merge: AttributeMerge,
) -> Result<Vec<Value>, CoreError> {
    let mut sorted: Vec<&OrganizationSnapshot> = aggregate.organizations.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    sorted
        .into_iter()
        .map(|o| -> Result<Value, CoreError> {
            let referrer = format!("Organization {}", o.id);
            let mut fields = Fields::new();
            fields
                .text("name", Some(o.name.as_str()))
                .text("type", o.org_type.as_deref())
                .text("description", o.description.as_deref())
                .list("goals_and_objectives", o.goals_and_objectives.as_deref())
                .list("modus_operandi_keywords", o.modus_operandi_keywords.as_deref())
                .list("hierarchy_and_membership", o.hierarchy_and_membership.as_deref())
                .list(
                    "relationships_with_other_entities",
                    o.relationships_with_other_entities.as_deref(),
                )
                .list("internal_dynamics", o.internal_dynamics.as_deref())
                .names(
                    "characters",
                    resolve_names(&o.character_ids, &index.characters, "character", &referrer)?,
                )
                .names(
                    "places",
                    resolve_names(&o.place_ids, &index.places, "place", &referrer)?,
                )
                .custom(
                    &index.attributes_for(AttributeOwner::Organization(o.id)),
                    merge,
                    &[],
                );
            Ok(fields.into_value())
        })
        .collect()
}

fn chapters(aggregate: &ProjectAggregate, index: &Index<'_>) -> Result<Vec<Value>, CoreError> {
    let mut sorted: Vec<&ChapterSnapshot> = aggregate.chapters.iter().collect();
    sorted.sort_by(|a, b| {
        a.chapter_number
            .cmp(&b.chapter_number)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });

    sorted
        .into_iter()
        .map(|ch| -> Result<Value, CoreError> {
            let referrer = format!("Chapter {}", ch.id);
            let point_of_view = match ch.point_of_view_id {
                Some(id) => Some(lookup(&index.characters, id, "character", &referrer)?.name.as_str()),
                None => None,
            };
            let mut fields = Fields::new();
            fields
                .text("title", Some(ch.title.as_str()))
                .number("chapter_number", i64::from(ch.chapter_number))
                .text("notes", ch.notes.as_deref())
                .text("content", ch.content.as_deref())
                .text("point_of_view", point_of_view)
                .names(
                    "characters",
                    resolve_names(&ch.character_ids, &index.characters, "character", &referrer)?,
                )
                .names(
                    "places",
                    resolve_names(&ch.place_ids, &index.places, "place", &referrer)?,
                )
                .names(
                    "organizations",
                    resolve_names(
                        &ch.organization_ids,
                        &index.organizations,
                        "organization",
                        &referrer,
                    )?,
                );
            Ok(fields.into_value())
        })
        .collect()
}

fn research_notes(aggregate: &ProjectAggregate) -> Vec<Value> {
    let mut sorted: Vec<&ResearchNoteSnapshot> = aggregate.research_notes.iter().collect();
    sorted.sort_by_key(|n| (Reverse(n.updated_at), n.id));

    sorted
        .into_iter()
        .map(|n| {
            let mut fields = Fields::new();
            fields
                .text("title", Some(n.title.as_str()))
                .text("content", n.content.as_deref())
                .tags("tags", n.tags.as_deref())
                .text("file_name", n.file_name.as_deref());
            fields.into_value()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Lookup index
// ---------------------------------------------------------------------------

/// Id lookups over the aggregate, built once per call.
struct Index<'a> {
    characters: HashMap<DbId, &'a CharacterSnapshot>,
    places: HashMap<DbId, &'a PlaceSnapshot>,
    organizations: HashMap<DbId, &'a OrganizationSnapshot>,
    chapters: HashMap<DbId, &'a ChapterSnapshot>,
    relationships: HashMap<DbId, Vec<&'a RelationshipSnapshot>>,
    attributes: HashMap<AttributeOwner, Vec<&'a CustomAttributeValue>>,
}

impl<'a> Index<'a> {
    fn new(aggregate: &'a ProjectAggregate) -> Self {
        let mut relationships: HashMap<DbId, Vec<&RelationshipSnapshot>> = HashMap::new();
        for rel in &aggregate.relationships {
            relationships.entry(rel.from_character_id).or_default().push(rel);
        }
        // Newest first, like the relationship list in the editor.
        for rels in relationships.values_mut() {
            rels.sort_by_key(|r| (Reverse(r.created_at), Reverse(r.id)));
        }

        let mut attributes: HashMap<AttributeOwner, Vec<&CustomAttributeValue>> = HashMap::new();
        for attr in &aggregate.custom_attributes {
            attributes.entry(attr.owner).or_default().push(attr);
        }
        for attrs in attributes.values_mut() {
            attrs.sort_by(|a, b| a.name.cmp(&b.name).then(a.attribute_id.cmp(&b.attribute_id)));
        }

        Self {
            characters: aggregate.characters.iter().map(|c| (c.id, c)).collect(),
            places: aggregate.places.iter().map(|p| (p.id, p)).collect(),
            organizations: aggregate.organizations.iter().map(|o| (o.id, o)).collect(),
            chapters: aggregate.chapters.iter().map(|c| (c.id, c)).collect(),
            relationships,
            attributes,
        }
    }

    fn attributes_for(&self, owner: AttributeOwner) -> Vec<&'a CustomAttributeValue> {
        self.attributes.get(&owner).cloned().unwrap_or_default()
    }

    /// `{to_character, description}` for every edge leaving `character_id`.
    fn outgoing_relationships(&self, character_id: DbId) -> Result<Vec<Value>, CoreError> {
        let Some(rels) = self.relationships.get(&character_id) else {
            return Ok(Vec::new());
        };
        rels.iter()
            .map(|rel| -> Result<Value, CoreError> {
                let referrer = format!("Relationship {}", rel.id);
                let target = lookup(&self.characters, rel.to_character_id, "character", &referrer)?;
                let mut fields = Fields::new();
                fields
                    .text("to_character", Some(target.name.as_str()))
                    .text("description", Some(rel.description.as_str()));
                Ok(fields.into_value())
            })
            .collect()
    }
}

fn lookup<'a, T>(
    index: &HashMap<DbId, &'a T>,
    id: DbId,
    entity: &str,
    referrer: &str,
) -> Result<&'a T, CoreError> {
    index.get(&id).copied().ok_or_else(|| {
        CoreError::Internal(format!("{referrer} references missing {entity} {id}"))
    })
}

/// Names of the referenced entities, sorted by name then id.
fn resolve_names<T: Named>(
    ids: &[DbId],
    index: &HashMap<DbId, &T>,
    entity: &str,
    referrer: &str,
) -> Result<Vec<String>, CoreError> {
    let mut resolved = ids
        .iter()
        .map(|&id| lookup(index, id, entity, referrer).map(|e| (e.display_name(), id)))
        .collect::<Result<Vec<_>, _>>()?;
    resolved.sort();
    resolved.dedup_by_key(|(_, id)| *id);
    Ok(resolved.into_iter().map(|(name, _)| name.to_string()).collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
