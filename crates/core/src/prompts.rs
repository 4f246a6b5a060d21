//! Prompt templates and `{placeholder}` substitution.
//!
//! Every template ends with the project context block. Substitution is a
//! single pass, so braces inside substituted values (the JSON context) are
//! never treated as placeholders.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::CoreError;

/// Regex pattern matching `{placeholder}` tokens in prompt templates.
pub const PLACEHOLDER_PATTERN: &str = r"\{([a-z_][a-z0-9_]*)\}";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("valid regex"));

/// Placeholder every template uses for the project context text block.
pub const CONTEXT_PLACEHOLDER: &str = "llm_context";

pub const CHARACTER_BIO_PROMPT: &str = "\
Improve the following character bio for this writing project.
Be consistent with existing information and maintain a literary quality.
Write plain text with no comments, explanations, or JSON formatting.

Current character bio:
{description}

Character name: {name}

Please provide an improved character bio that:
1. Expands background and motivations
2. Incorporates relationships with other characters
3. References involvement in key plot points
4. Maintains consistency with established traits
5. Adds depth while staying true to their role

Project context will follow. Focus only on information relevant to this character bio:
{llm_context}";

pub const PLACE_DESCRIPTION_PROMPT: &str = "\
Improve the following place description for this writing project.
Be consistent with existing information and maintain a literary quality.
Write plain text with no comments, explanations, or JSON formatting.

Current place description:
{description}

Place name: {name}

Please provide an improved place description that:
1. Expands physical characteristics and atmosphere
2. Incorporates significance to story and characters
3. References involvement in key plot points
4. Maintains consistency with established role
5. Adds depth with vivid imagery and literary quality

Project context will follow. Focus only on information relevant to this place description:
{llm_context}";

pub const ORGANIZATION_DESCRIPTION_PROMPT: &str = "\
Improve the following organization description for this writing project.
Be consistent with existing information and maintain a literary quality.
Write plain text with no comments, explanations, or JSON formatting.

Current organization description:
{description}

Organization name: {name}
Organization type: {org_type}

Please provide an improved organization description that:
1. Expands goals and structure
2. Incorporates relationships with characters and other organizations
3. References involvement in key plot points
4. Maintains consistency with established role
5. Adds depth with vivid description of operations and culture

Project context will follow. Focus only on information relevant to this organization description:
{llm_context}";

pub const CHAPTER_CONTENT_PROMPT: &str = "\
Write the content for Chapter {chapter_number}: {chapter_title}

POV Character: {point_of_view_character}
Chapter Notes: {chapter_notes}

Write narrative fiction with dialogue and description appropriate to the story.
Be consistent with existing characters, plot progression, and tone.
Provide only the chapter content without comments or explanations.

Relevant project context:
{llm_context}";

pub const PROJECT_SUMMARY_PROMPT: &str = "\
Create a comprehensive summary of this writing project that includes:
1. Brief project overview
2. Key characters and roles
3. Main plot points in sequence
4. Important locations and organizations
5. Notable character relationships

Project data:
{llm_context}";

pub const TEXT_REFINEMENT_PROMPT: &str = "\
Refine the following passage for this writing project.
Keep its meaning, voice and point of view. Improve clarity, rhythm and word choice.
Write plain text with no comments, explanations, or JSON formatting.

Passage:
{text}

Additional instructions: {instructions}

Project context will follow. Keep the passage consistent with it:
{llm_context}";

/// Default for an omitted refinement instruction.
pub const NO_INSTRUCTIONS: &str = "None";

/// Substitute each `{placeholder}` in `template` with its value.
///
/// Every placeholder must have a value; unused values are ignored.
pub fn render_template(template: &str, values: &[(&str, &str)]) -> Result<String, CoreError> {
    let lookup: HashMap<&str, &str> = values.iter().copied().collect();

    let missing: Vec<&str> = PLACEHOLDER_RE
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|name| !lookup.contains_key(name))
        .collect();
    if !missing.is_empty() {
        return Err(CoreError::Validation(format!(
            "Missing value for prompt placeholder(s): {}",
            missing.join(", ")
        )));
    }

    let rendered = PLACEHOLDER_RE.replace_all(template, |caps: &Captures<'_>| {
        lookup.get(&caps[1]).copied().unwrap_or_default().to_string()
    });
    Ok(rendered.into_owned())
}

/// Project summary prompt around `llm_context`.
pub fn project_summary_prompt(llm_context: &str) -> Result<String, CoreError> {
    render_template(PROJECT_SUMMARY_PROMPT, &[(CONTEXT_PLACEHOLDER, llm_context)])
}

/// Refinement prompt for an arbitrary passage.
pub fn text_refinement_prompt(
    text: &str,
    instructions: Option<&str>,
    llm_context: &str,
) -> Result<String, CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(
            "Text to refine must not be empty".to_string(),
        ));
    }
    let instructions = instructions
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_INSTRUCTIONS);
    render_template(
        TEXT_REFINEMENT_PROMPT,
        &[
            ("text", text),
            ("instructions", instructions),
            (CONTEXT_PLACEHOLDER, llm_context),
        ],
    )
}
