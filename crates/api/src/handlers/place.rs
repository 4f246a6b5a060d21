//! Handlers for the `/places` resource.
//!
//! `/projects/{project_id}/places[/{id}]`. Responses carry the linked
//! `character_ids`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use storyforge_core::types::DbId;
use storyforge_db::models::place::{CreatePlace, PlaceDetail, UpdatePlace};
use storyforge_db::repositories::PlaceRepo;

use super::{ensure_in_project, ensure_project, not_found, validate_input};
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/places
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    AppJson(input): AppJson<CreatePlace>,
) -> AppResult<(StatusCode, Json<PlaceDetail>)> {
    validate_input(&input)?;
    ensure_project(&state.pool, project_id).await?;
    ensure_in_project(&state.pool, "characters", "Character", project_id, &input.character_ids)
        .await?;
    let place = PlaceRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(place)))
}

/// GET /api/v1/projects/{project_id}/places
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<PlaceDetail>>> {
    ensure_project(&state.pool, project_id).await?;
    let mut conn = state.pool.acquire().await?;
    let places = PlaceRepo::list_by_project(&mut conn, project_id).await?;
    Ok(Json(places))
}

/// GET /api/v1/projects/{project_id}/places/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<PlaceDetail>> {
    let place = PlaceRepo::find_by_id(&state.pool, project_id, id)
        .await?
        .ok_or(not_found("Place", id))?;
    Ok(Json(place))
}

/// PUT /api/v1/projects/{project_id}/places/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<UpdatePlace>,
) -> AppResult<Json<PlaceDetail>> {
    validate_input(&input)?;
    if let Some(ids) = &input.character_ids {
        ensure_in_project(&state.pool, "characters", "Character", project_id, ids).await?;
    }
    let place = PlaceRepo::update(&state.pool, project_id, id, &input)
        .await?
        .ok_or(not_found("Place", id))?;
    Ok(Json(place))
}

/// DELETE /api/v1/projects/{project_id}/places/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if PlaceRepo::delete(&state.pool, project_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Place", id))
    }
}
