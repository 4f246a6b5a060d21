//! Handlers for the `/chapters` resource.
//!
//! `/projects/{project_id}/chapters[/{id}]`. A chapter may name a
//! point-of-view character and links characters, places and organizations.
//! Plot points can be assigned from the chapter through `plot_point_ids`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use storyforge_core::types::DbId;
use storyforge_db::models::chapter::{ChapterDetail, CreateChapter, UpdateChapter};
use storyforge_db::repositories::ChapterRepo;

use super::{ensure_in_project, ensure_links, ensure_project, not_found, validate_input};
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/chapters
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    AppJson(input): AppJson<CreateChapter>,
) -> AppResult<(StatusCode, Json<ChapterDetail>)> {
    validate_input(&input)?;
    ensure_project(&state.pool, project_id).await?;
    if let Some(pov) = input.point_of_view_id {
        ensure_in_project(&state.pool, "characters", "Character", project_id, &[pov]).await?;
    }
    ensure_links(
        &state.pool,
        project_id,
        Some(input.character_ids.as_slice()),
        Some(input.place_ids.as_slice()),
        Some(input.organization_ids.as_slice()),
    )
    .await?;
    ensure_in_project(&state.pool, "plot_points", "PlotPoint", project_id, &input.plot_point_ids)
        .await?;
    let chapter = ChapterRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(chapter)))
}

/// GET /api/v1/projects/{project_id}/chapters
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<ChapterDetail>>> {
    ensure_project(&state.pool, project_id).await?;
    let mut conn = state.pool.acquire().await?;
    let chapters = ChapterRepo::list_by_project(&mut conn, project_id).await?;
    Ok(Json(chapters))
}

/// GET /api/v1/projects/{project_id}/chapters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<ChapterDetail>> {
    let chapter = ChapterRepo::find_detail(&state.pool, project_id, id)
        .await?
        .ok_or(not_found("Chapter", id))?;
    Ok(Json(chapter))
}

/// PUT /api/v1/projects/{project_id}/chapters/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<UpdateChapter>,
) -> AppResult<Json<ChapterDetail>> {
    validate_input(&input)?;
    if let Some(Some(pov)) = input.point_of_view_id {
        ensure_in_project(&state.pool, "characters", "Character", project_id, &[pov]).await?;
    }
    ensure_links(
        &state.pool,
        project_id,
        input.character_ids.as_deref(),
        input.place_ids.as_deref(),
        input.organization_ids.as_deref(),
    )
    .await?;
    if let Some(ids) = &input.plot_point_ids {
        ensure_in_project(&state.pool, "plot_points", "PlotPoint", project_id, ids).await?;
    }
    let chapter = ChapterRepo::update(&state.pool, project_id, id, &input)
        .await?
        .ok_or(not_found("Chapter", id))?;
    Ok(Json(chapter))
}

/// DELETE /api/v1/projects/{project_id}/chapters/{id}
///
/// Plot points in the chapter stay, with their chapter cleared.
pub async fn delete(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if ChapterRepo::delete(&state.pool, project_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Chapter", id))
    }
}
