//! Handlers for the `/characters` resource.
//!
//! Characters are nested under projects:
//! `/projects/{project_id}/characters[/{id}]`

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use storyforge_core::types::DbId;
use storyforge_db::models::character::{Character, CreateCharacter, UpdateCharacter};
use storyforge_db::repositories::CharacterRepo;

use super::{ensure_project, not_found, validate_input};
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/characters
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    AppJson(input): AppJson<CreateCharacter>,
) -> AppResult<(StatusCode, Json<Character>)> {
    validate_input(&input)?;
    ensure_project(&state.pool, project_id).await?;
    let character = CharacterRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(character)))
}

/// GET /api/v1/projects/{project_id}/characters
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Character>>> {
    ensure_project(&state.pool, project_id).await?;
    let characters = CharacterRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(characters))
}

/// GET /api/v1/projects/{project_id}/characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Character>> {
    let character = CharacterRepo::find_by_id(&state.pool, project_id, id)
        .await?
        .ok_or(not_found("Character", id))?;
    Ok(Json(character))
}

/// PUT /api/v1/projects/{project_id}/characters/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<UpdateCharacter>,
) -> AppResult<Json<Character>> {
    validate_input(&input)?;
    let character = CharacterRepo::update(&state.pool, project_id, id, &input)
        .await?
        .ok_or(not_found("Character", id))?;
    Ok(Json(character))
}

/// DELETE /api/v1/projects/{project_id}/characters/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if CharacterRepo::delete(&state.pool, project_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Character", id))
    }
}
