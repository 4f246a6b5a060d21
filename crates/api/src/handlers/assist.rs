//! Generative writing assistance under `/ai`.
//!
//! Every route requires a configured text generation backend
//! ([`RequireGenerator`]) and answers with the status envelope. Prompts are
//! built from the project context; the GET variants return the prompt so a
//! client can edit it, and the POST variants send a prompt to the backend.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use storyforge_core::context::{build_context, ContextOptions, ProjectContext};
use storyforge_core::entity::{build_entity_prompt, EntityFields, EntityKind};
use storyforge_core::error::CoreError;
use storyforge_core::prompts::{project_summary_prompt, text_refinement_prompt};
use storyforge_core::types::DbId;
use storyforge_db::repositories::{
    ChapterRepo, CharacterRepo, ContextRepo, OrganizationRepo, PlaceRepo,
};
use storyforge_llm::TextGenerator;

use super::not_found;
use crate::error::{AppError, AssistResult};
use crate::extract::AssistJson;
use crate::middleware::generator::RequireGenerator;
use crate::query::ContextParams;
use crate::response::StatusEnvelope;
use crate::state::AppState;

/// Body of the POST routes that send a client-edited prompt.
#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub prompt: Option<String>,
}

impl PromptRequest {
    fn into_prompt(self) -> Result<String, AppError> {
        self.prompt
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("Prompt not provided in POST request".to_string()))
    }
}

/// Body of `POST /ai/projects/{project_id}/refine`.
#[derive(Debug, Deserialize)]
pub struct RefineRequest {
    pub text: Option<String>,
    pub instructions: Option<String>,
}

/// Load the project and build its context, 404 if it does not exist.
async fn load_context(
    state: &AppState,
    project_id: DbId,
    options: &ContextOptions,
) -> Result<ProjectContext, AppError> {
    let aggregate = ContextRepo::load_aggregate(&state.pool, project_id)
        .await?
        .ok_or(not_found("Project", project_id))?;
    let context = build_context(&aggregate, options)?;
    tracing::debug!(
        project_id,
        text_block_len = context.text_block.len(),
        "Built project context",
    );
    Ok(context)
}

/// Context options from server configuration alone.
fn default_options(state: &AppState) -> ContextOptions {
    ContextOptions {
        format: state.config.context_format,
        attribute_merge: state.config.attribute_merge,
        ..ContextOptions::default()
    }
}

/// Prompt inputs of the selected entity, 404 if it is not in the project.
async fn entity_fields(
    state: &AppState,
    project_id: DbId,
    kind: EntityKind,
    entity_id: DbId,
) -> Result<EntityFields, AppError> {
    let missing = || not_found(kind.entity_name(), entity_id);
    let fields = match kind {
        EntityKind::Character => {
            let character = CharacterRepo::find_by_id(&state.pool, project_id, entity_id)
                .await?
                .ok_or_else(missing)?;
            EntityFields::from(&character)
        }
        EntityKind::Place => {
            let detail = PlaceRepo::find_by_id(&state.pool, project_id, entity_id)
                .await?
                .ok_or_else(missing)?;
            EntityFields::from(&detail.place)
        }
        EntityKind::Organization => {
            let detail = OrganizationRepo::find_by_id(&state.pool, project_id, entity_id)
                .await?
                .ok_or_else(missing)?;
            EntityFields::from(&detail.organization)
        }
        EntityKind::Chapter => {
            let chapter = ChapterRepo::find_by_id(&state.pool, project_id, entity_id)
                .await?
                .ok_or_else(missing)?;
            let point_of_view = match chapter.point_of_view_id {
                Some(id) => CharacterRepo::find_name(&state.pool, id).await?,
                None => None,
            };
            chapter.entity_fields(point_of_view)
        }
    };
    Ok(fields)
}

/// Send `prompt` to the backend, logging the outcome.
async fn generate(
    generator: &Arc<dyn TextGenerator>,
    project_id: DbId,
    prompt: &str,
) -> Result<String, AppError> {
    tracing::info!(
        project_id,
        model = generator.model(),
        prompt_len = prompt.len(),
        "Sending prompt to text generator",
    );
    let text = generator.generate(prompt).await?;
    tracing::info!(project_id, response_len = text.len(), "Text generated");
    Ok(text)
}

/// GET /api/v1/ai/status
pub async fn status(RequireGenerator(generator): RequireGenerator) -> Json<Value> {
    StatusEnvelope::success()
        .with("message", "API key is accessible")
        .with("model", generator.model())
        .into_json()
}

/// GET /api/v1/ai/projects/{project_id}/context?exclude=&format=
pub async fn context(
    RequireGenerator(_): RequireGenerator,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<ContextParams>,
) -> AssistResult<Json<Value>> {
    let options = params.to_options(&state.config)?;
    let context = load_context(&state, project_id, &options).await?;
    Ok(StatusEnvelope::success()
        .with("raw_data", context.structured_record)
        .with("llm_context", context.text_block)
        .into_json())
}

/// GET /api/v1/ai/projects/{project_id}/summary
pub async fn summary_prompt(
    RequireGenerator(_): RequireGenerator,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AssistResult<Json<Value>> {
    let context = load_context(&state, project_id, &default_options(&state)).await?;
    let prompt = project_summary_prompt(&context.text_block)?;
    Ok(StatusEnvelope::success().with("prompt", prompt).into_json())
}

/// POST /api/v1/ai/projects/{project_id}/summary
pub async fn summary_generate(
    RequireGenerator(generator): RequireGenerator,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    AssistJson(body): AssistJson<PromptRequest>,
) -> AssistResult<Json<Value>> {
    let prompt = body.into_prompt()?;
    super::ensure_project(&state.pool, project_id).await?;
    let summary = generate(&generator, project_id, &prompt).await?;
    Ok(StatusEnvelope::success().with("summary", summary).into_json())
}

/// POST /api/v1/ai/projects/{project_id}/refine
pub async fn refine(
    RequireGenerator(generator): RequireGenerator,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    AssistJson(body): AssistJson<RefineRequest>,
) -> AssistResult<Json<Value>> {
    let text = body.text.unwrap_or_default();
    if text.trim().is_empty() {
        return Err(CoreError::Validation("Text to refine must not be empty".to_string()).into());
    }
    let context = load_context(&state, project_id, &default_options(&state)).await?;
    let prompt = text_refinement_prompt(&text, body.instructions.as_deref(), &context.text_block)?;
    let refined = generate(&generator, project_id, &prompt).await?;
    Ok(StatusEnvelope::success()
        .with("refined_text", refined)
        .into_json())
}

/// GET /api/v1/ai/projects/{project_id}/{kind}/{entity_id}/improve
pub async fn improve_prompt(
    RequireGenerator(_): RequireGenerator,
    State(state): State<AppState>,
    Path((project_id, kind, entity_id)): Path<(DbId, String, DbId)>,
) -> AssistResult<Json<Value>> {
    let kind = EntityKind::from_str_value(&kind)?;
    super::ensure_project(&state.pool, project_id).await?;
    let fields = entity_fields(&state, project_id, kind, entity_id).await?;
    let context = load_context(&state, project_id, &default_options(&state)).await?;
    let prompt = build_entity_prompt(&fields, &context.text_block)?;
    Ok(StatusEnvelope::success().with("prompt", prompt).into_json())
}

/// POST /api/v1/ai/projects/{project_id}/{kind}/{entity_id}/improve
///
/// The response carries the text under the kind's payload key
/// (`improved_bio`, `improved_description` or `generated_content`).
pub async fn improve_generate(
    RequireGenerator(generator): RequireGenerator,
    State(state): State<AppState>,
    Path((project_id, kind, entity_id)): Path<(DbId, String, DbId)>,
    AssistJson(body): AssistJson<PromptRequest>,
) -> AssistResult<Json<Value>> {
    let kind = EntityKind::from_str_value(&kind)?;
    super::ensure_project(&state.pool, project_id).await?;
    entity_fields(&state, project_id, kind, entity_id).await?;
    let prompt = body.into_prompt()?;
    let text = generate(&generator, project_id, &prompt).await?;
    Ok(StatusEnvelope::success()
        .with(kind.response_key(), text)
        .into_json())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn blank_prompt_is_rejected() {
        let body = PromptRequest {
            prompt: Some("   ".to_string()),
        };
        assert_matches!(body.into_prompt(), Err(AppError::BadRequest(msg)) if msg == "Prompt not provided in POST request");
        assert!(PromptRequest { prompt: None }.into_prompt().is_err());
    }

    #[test]
    fn prompt_is_passed_through_unchanged() {
        let body = PromptRequest {
            prompt: Some("  Rewrite this.\n".to_string()),
        };
        assert_eq!(body.into_prompt().unwrap(), "  Rewrite this.\n");
    }
}
