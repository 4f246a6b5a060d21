//! Entity kinds that support generative improvement.

use serde::Deserialize;

use crate::error::CoreError;
use crate::prompts::{
    render_template, CHAPTER_CONTENT_PROMPT, CHARACTER_BIO_PROMPT, CONTEXT_PLACEHOLDER,
    ORGANIZATION_DESCRIPTION_PROMPT, PLACE_DESCRIPTION_PROMPT,
};

pub const DEFAULT_CHAPTER_TITLE: &str = "Untitled";
pub const DEFAULT_POINT_OF_VIEW: &str = "Not specified";
pub const DEFAULT_CHAPTER_NOTES: &str = "None";

/// Entity selectable on the improve routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Character,
    Place,
    Organization,
    Chapter,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Character,
        EntityKind::Place,
        EntityKind::Organization,
        EntityKind::Chapter,
    ];

    /// Route segment.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Character => "character",
            EntityKind::Place => "place",
            EntityKind::Organization => "organization",
            EntityKind::Chapter => "chapter",
        }
    }

    /// Entity name used in not-found errors.
    pub fn entity_name(self) -> &'static str {
        match self {
            EntityKind::Character => "Character",
            EntityKind::Place => "Place",
            EntityKind::Organization => "Organization",
            EntityKind::Chapter => "Chapter",
        }
    }

    /// Key carrying the generated text in the response envelope.
    pub fn response_key(self) -> &'static str {
        match self {
            EntityKind::Character => "improved_bio",
            EntityKind::Place | EntityKind::Organization => "improved_description",
            EntityKind::Chapter => "generated_content",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            EntityKind::Character => CHARACTER_BIO_PROMPT,
            EntityKind::Place => PLACE_DESCRIPTION_PROMPT,
            EntityKind::Organization => ORGANIZATION_DESCRIPTION_PROMPT,
            EntityKind::Chapter => CHAPTER_CONTENT_PROMPT,
        }
    }

    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid entity type '{s}'. Must be one of: character, place, organization, chapter"
                ))
            })
    }
}

/// Prompt inputs taken from the selected entity.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityFields {
    Character {
        name: String,
        description: Option<String>,
    },
    Place {
        name: String,
        description: Option<String>,
    },
    Organization {
        name: String,
        org_type: Option<String>,
        description: Option<String>,
    },
    Chapter {
        title: String,
        chapter_number: i32,
        /// Name of the point-of-view character.
        point_of_view: Option<String>,
        notes: Option<String>,
    },
}

impl EntityFields {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityFields::Character { .. } => EntityKind::Character,
            EntityFields::Place { .. } => EntityKind::Place,
            EntityFields::Organization { .. } => EntityKind::Organization,
            EntityFields::Chapter { .. } => EntityKind::Chapter,
        }
    }
}

fn or_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
}

/// Render the improvement prompt for an entity with the project context block.
pub fn build_entity_prompt(fields: &EntityFields, llm_context: &str) -> Result<String, CoreError> {
    let template = fields.kind().template();
    match fields {
        EntityFields::Character { name, description } | EntityFields::Place { name, description } => {
            render_template(
                template,
                &[
                    ("name", name.as_str()),
                    ("description", or_empty(description)),
                    (CONTEXT_PLACEHOLDER, llm_context),
                ],
            )
        }
        EntityFields::Organization {
            name,
            org_type,
            description,
        } => render_template(
            template,
            &[
                ("name", name.as_str()),
                ("org_type", or_empty(org_type)),
                ("description", or_empty(description)),
                (CONTEXT_PLACEHOLDER, llm_context),
            ],
        ),
        EntityFields::Chapter {
            title,
            chapter_number,
            point_of_view,
            notes,
        } => {
            let number = chapter_number.to_string();
            let title = if title.trim().is_empty() {
                DEFAULT_CHAPTER_TITLE
            } else {
                title.as_str()
            };
            render_template(
                template,
                &[
                    ("chapter_number", number.as_str()),
                    ("chapter_title", title),
                    (
                        "point_of_view_character",
                        or_default(point_of_view, DEFAULT_POINT_OF_VIEW),
                    ),
                    ("chapter_notes", or_default(notes, DEFAULT_CHAPTER_NOTES)),
                    (CONTEXT_PLACEHOLDER, llm_context),
                ],
            )
        }
    }
}
