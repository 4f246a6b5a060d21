//! Handlers for the `/organizations` resource.
//!
//! `/projects/{project_id}/organizations[/{id}]`. Responses carry the
//! linked `character_ids` and `place_ids`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use storyforge_core::types::DbId;
use storyforge_db::models::organization::{
    CreateOrganization, OrganizationDetail, UpdateOrganization,
};
use storyforge_db::repositories::OrganizationRepo;

use super::{ensure_links, ensure_project, not_found, validate_input};
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/organizations
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    AppJson(input): AppJson<CreateOrganization>,
) -> AppResult<(StatusCode, Json<OrganizationDetail>)> {
    validate_input(&input)?;
    ensure_project(&state.pool, project_id).await?;
    ensure_links(
        &state.pool,
        project_id,
        Some(input.character_ids.as_slice()),
        Some(input.place_ids.as_slice()),
        None,
    )
    .await?;
    let organization = OrganizationRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(organization)))
}

/// GET /api/v1/projects/{project_id}/organizations
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<OrganizationDetail>>> {
    ensure_project(&state.pool, project_id).await?;
    let mut conn = state.pool.acquire().await?;
    let organizations = OrganizationRepo::list_by_project(&mut conn, project_id).await?;
    Ok(Json(organizations))
}

/// GET /api/v1/projects/{project_id}/organizations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<OrganizationDetail>> {
    let organization = OrganizationRepo::find_by_id(&state.pool, project_id, id)
        .await?
        .ok_or(not_found("Organization", id))?;
    Ok(Json(organization))
}

/// PUT /api/v1/projects/{project_id}/organizations/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<UpdateOrganization>,
) -> AppResult<Json<OrganizationDetail>> {
    validate_input(&input)?;
    ensure_links(
        &state.pool,
        project_id,
        input.character_ids.as_deref(),
        input.place_ids.as_deref(),
        None,
    )
    .await?;
    let organization = OrganizationRepo::update(&state.pool, project_id, id, &input)
        .await?
        .ok_or(not_found("Organization", id))?;
    Ok(Json(organization))
}

/// DELETE /api/v1/projects/{project_id}/organizations/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if OrganizationRepo::delete(&state.pool, project_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Organization", id))
    }
}
