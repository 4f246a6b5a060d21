//! Handlers for directed character relationships.
//!
//! `/projects/{project_id}/relationships[/{id}]`. Both ends must be
//! characters of the project and an edge may not point at its own source.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use storyforge_core::error::CoreError;
use storyforge_core::types::DbId;
use storyforge_db::models::relationship::{
    CreateRelationship, Relationship, UpdateRelationship,
};
use storyforge_db::repositories::RelationshipRepo;

use super::{ensure_in_project, ensure_project, not_found, validate_input};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/relationships
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    AppJson(input): AppJson<CreateRelationship>,
) -> AppResult<(StatusCode, Json<Relationship>)> {
    validate_input(&input)?;
    if input.from_character_id == input.to_character_id {
        return Err(AppError::Core(CoreError::Validation(
            "A character cannot have a relationship with itself".to_string(),
        )));
    }
    ensure_project(&state.pool, project_id).await?;
    ensure_in_project(
        &state.pool,
        "characters",
        "Character",
        project_id,
        &[input.from_character_id, input.to_character_id],
    )
    .await?;

    let relationship = RelationshipRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(relationship)))
}

/// GET /api/v1/projects/{project_id}/relationships
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Relationship>>> {
    ensure_project(&state.pool, project_id).await?;
    let relationships = RelationshipRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(relationships))
}

/// GET /api/v1/projects/{project_id}/relationships/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Relationship>> {
    let relationship = RelationshipRepo::find_by_id(&state.pool, project_id, id)
        .await?
        .ok_or(not_found("Relationship", id))?;
    Ok(Json(relationship))
}

/// PUT /api/v1/projects/{project_id}/relationships/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<UpdateRelationship>,
) -> AppResult<Json<Relationship>> {
    validate_input(&input)?;
    let relationship = RelationshipRepo::update(&state.pool, project_id, id, &input)
        .await?
        .ok_or(not_found("Relationship", id))?;
    Ok(Json(relationship))
}

/// DELETE /api/v1/projects/{project_id}/relationships/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if RelationshipRepo::delete(&state.pool, project_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Relationship", id))
    }
}
