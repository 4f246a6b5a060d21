//! Knobs controlling what the context aggregator emits and how.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// One of the entity collections making up a project's context.
///
/// Variant order is the order sections appear in the structured record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Characters,
    PlotPoints,
    Places,
    Organizations,
    Chapters,
    ResearchNotes,
}

impl Section {
    /// Every section, in record order.
    pub const ALL: [Section; 6] = [
        Section::Characters,
        Section::PlotPoints,
        Section::Places,
        Section::Organizations,
        Section::Chapters,
        Section::ResearchNotes,
    ];

    /// Key used in the structured record.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Characters => "characters",
            Self::PlotPoints => "plot_points",
            Self::Places => "places",
            Self::Organizations => "organizations",
            Self::Chapters => "chapters",
            Self::ResearchNotes => "research_notes",
        }
    }

    /// Heading used by the labeled-sections text format.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Characters => "Characters",
            Self::PlotPoints => "Plot Points",
            Self::Places => "Places",
            Self::Organizations => "Organizations",
            Self::Chapters => "Chapters",
            Self::ResearchNotes => "Research Notes",
        }
    }

    /// Look up a section by its record key.
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    /// Like [`Section::parse`], but unknown keys are a validation error.
    pub fn from_key(key: &str) -> Result<Self, CoreError> {
        Self::parse(key).ok_or_else(|| {
            let valid: Vec<&str> = Self::ALL.iter().map(Section::key).collect();
            CoreError::Validation(format!(
                "Unknown context section '{key}'. Must be one of: {}",
                valid.join(", ")
            ))
        })
    }
}

/// Parse a comma-separated list of section keys (`"research_notes,places"`).
///
/// Blank entries are ignored, so an empty string yields an empty set.
pub fn parse_sections(csv: &str) -> Result<BTreeSet<Section>, CoreError> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Section::from_key)
        .collect()
}

// ---------------------------------------------------------------------------
// Output format
// ---------------------------------------------------------------------------

pub const FORMAT_JSON: &str = "json";
pub const FORMAT_LABELED: &str = "labeled";

/// Shape of the flattened text block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextFormat {
    /// Indented JSON of the project map.
    #[default]
    Json,
    /// `Project: ...` / `Characters: <json>` lines.
    LabeledSections,
}

impl ContextFormat {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            FORMAT_JSON => Ok(Self::Json),
            FORMAT_LABELED => Ok(Self::LabeledSections),
            _ => Err(CoreError::Validation(format!(
                "Invalid context format '{s}'. Must be one of: {FORMAT_JSON}, {FORMAT_LABELED}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => FORMAT_JSON,
            Self::LabeledSections => FORMAT_LABELED,
        }
    }
}

// ---------------------------------------------------------------------------
// Custom attribute merging
// ---------------------------------------------------------------------------

pub const MERGE_OVERRIDE: &str = "override";
pub const MERGE_PRESERVE_INTRINSIC: &str = "preserve_intrinsic";

/// What happens when a custom attribute shares its name with an intrinsic field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMerge {
    /// The custom value replaces the intrinsic one, keeping the key's position.
    #[default]
    Override,
    /// The intrinsic value wins and the custom value is dropped.
    PreserveIntrinsic,
}

impl AttributeMerge {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            MERGE_OVERRIDE => Ok(Self::Override),
            MERGE_PRESERVE_INTRINSIC => Ok(Self::PreserveIntrinsic),
            _ => Err(CoreError::Validation(format!(
                "Invalid attribute merge policy '{s}'. Must be one of: {MERGE_OVERRIDE}, {MERGE_PRESERVE_INTRINSIC}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Options for a single [`build_context`](super::build_context) call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextOptions {
    /// Sections omitted from both outputs.
    pub exclude: BTreeSet<Section>,
    pub format: ContextFormat,
    pub attribute_merge: AttributeMerge,
}

impl ContextOptions {
    /// Options that skip the given sections and use defaults otherwise.
    pub fn excluding(sections: impl IntoIterator<Item = Section>) -> Self {
        Self {
            exclude: sections.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn includes(&self, section: Section) -> bool {
        !self.exclude.contains(&section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_keys_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::parse(section.key()), Some(section));
        }
    }

    #[test]
    fn parse_sections_accepts_csv_with_spaces() {
        let parsed = parse_sections("research_notes, places,").unwrap();
        assert_eq!(
            parsed.into_iter().collect::<Vec<_>>(),
            vec![Section::Places, Section::ResearchNotes]
        );
    }

    #[test]
    fn parse_sections_empty_string_is_empty_set() {
        assert!(parse_sections("").unwrap().is_empty());
    }

    #[test]
    fn parse_sections_rejects_unknown_key() {
        let err = parse_sections("characters,villains").unwrap_err();
        assert!(err.to_string().contains("Unknown context section 'villains'"));
    }

    #[test]
    fn format_parses_known_values() {
        assert_eq!(ContextFormat::from_str_value("json").unwrap(), ContextFormat::Json);
        assert_eq!(
            ContextFormat::from_str_value("labeled").unwrap(),
            ContextFormat::LabeledSections
        );
        assert!(ContextFormat::from_str_value("yaml").is_err());
    }

    #[test]
    fn merge_policy_parses_known_values() {
        assert_eq!(
            AttributeMerge::from_str_value("preserve_intrinsic").unwrap(),
            AttributeMerge::PreserveIntrinsic
        );
        assert!(AttributeMerge::from_str_value("merge").is_err());
    }

    #[test]
    fn excluding_builds_set() {
        let options = ContextOptions::excluding([Section::Chapters]);
        assert!(!options.includes(Section::Chapters));
        assert!(options.includes(Section::Characters));
        assert_eq!(options.format, ContextFormat::Json);
    }
}
