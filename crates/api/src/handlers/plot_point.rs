//! Handlers for the `/plot-points` resource.
//!
//! `/projects/{project_id}/plot-points[/{id}]`. Plot points are returned in
//! story order (`order`, then creation).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use storyforge_core::types::DbId;
use storyforge_db::models::plot_point::{CreatePlotPoint, PlotPointDetail, UpdatePlotPoint};
use storyforge_db::repositories::PlotPointRepo;

use super::{ensure_in_project, ensure_links, ensure_project, not_found, validate_input};
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/plot-points
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    AppJson(input): AppJson<CreatePlotPoint>,
) -> AppResult<(StatusCode, Json<PlotPointDetail>)> {
    validate_input(&input)?;
    ensure_project(&state.pool, project_id).await?;
    if let Some(chapter_id) = input.chapter_id {
        ensure_in_project(&state.pool, "chapters", "Chapter", project_id, &[chapter_id]).await?;
    }
    ensure_links(
        &state.pool,
        project_id,
        Some(input.character_ids.as_slice()),
        Some(input.place_ids.as_slice()),
        Some(input.organization_ids.as_slice()),
    )
    .await?;
    let plot_point = PlotPointRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(plot_point)))
}

/// GET /api/v1/projects/{project_id}/plot-points
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<PlotPointDetail>>> {
    ensure_project(&state.pool, project_id).await?;
    let mut conn = state.pool.acquire().await?;
    let plot_points = PlotPointRepo::list_by_project(&mut conn, project_id).await?;
    Ok(Json(plot_points))
}

/// GET /api/v1/projects/{project_id}/plot-points/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<PlotPointDetail>> {
    let plot_point = PlotPointRepo::find_by_id(&state.pool, project_id, id)
        .await?
        .ok_or(not_found("PlotPoint", id))?;
    Ok(Json(plot_point))
}

/// PUT /api/v1/projects/{project_id}/plot-points/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<UpdatePlotPoint>,
) -> AppResult<Json<PlotPointDetail>> {
    validate_input(&input)?;
    if let Some(Some(chapter_id)) = input.chapter_id {
        ensure_in_project(&state.pool, "chapters", "Chapter", project_id, &[chapter_id]).await?;
    }
    ensure_links(
        &state.pool,
        project_id,
        input.character_ids.as_deref(),
        input.place_ids.as_deref(),
        input.organization_ids.as_deref(),
    )
    .await?;
    let plot_point = PlotPointRepo::update(&state.pool, project_id, id, &input)
        .await?
        .ok_or(not_found("PlotPoint", id))?;
    Ok(Json(plot_point))
}

/// DELETE /api/v1/projects/{project_id}/plot-points/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if PlotPointRepo::delete(&state.pool, project_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("PlotPoint", id))
    }
}
