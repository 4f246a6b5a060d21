//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use storyforge_core::types::DbId;
use storyforge_db::models::project::{CreateProject, Project, UpdateProject};
use storyforge_db::repositories::ProjectRepo;

use super::{not_found, validate_input};
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::state::AppState;
use crate::storage;

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    validate_input(&input)?;
    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(project_id = project.id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found("Project", id))?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateProject>,
) -> AppResult<Json<Project>> {
    validate_input(&input)?;
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(not_found("Project", id))?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Removes the project and, through cascading foreign keys, all of its
/// children. Attachment files under the project's media directory go too.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = ProjectRepo::delete(&state.pool, id).await?;
    if deleted {
        storage::remove_project_files(&state.config.media_root, id).await?;
        tracing::info!(project_id = id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Project", id))
    }
}
