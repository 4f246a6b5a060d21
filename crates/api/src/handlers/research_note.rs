//! Handlers for the `/research-notes` resource.
//!
//! `/projects/{project_id}/research-notes[/{id}]` plus the attachment
//! sub-resource `/{id}/file` (multipart upload, delete). Stored files are
//! removed when they are replaced, detached, or their note is deleted.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use storyforge_core::types::DbId;
use storyforge_db::models::research_note::{
    CreateResearchNote, ResearchNote, UpdateResearchNote,
};
use storyforge_db::repositories::ResearchNoteRepo;

use super::{ensure_project, not_found, validate_input};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;
use crate::storage;

/// POST /api/v1/projects/{project_id}/research-notes
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    AppJson(input): AppJson<CreateResearchNote>,
) -> AppResult<(StatusCode, Json<ResearchNote>)> {
    validate_input(&input)?;
    ensure_project(&state.pool, project_id).await?;
    let note = ResearchNoteRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /api/v1/projects/{project_id}/research-notes
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<ResearchNote>>> {
    ensure_project(&state.pool, project_id).await?;
    let notes = ResearchNoteRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(notes))
}

/// GET /api/v1/projects/{project_id}/research-notes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<ResearchNote>> {
    let note = ResearchNoteRepo::find_by_id(&state.pool, project_id, id)
        .await?
        .ok_or(not_found("ResearchNote", id))?;
    Ok(Json(note))
}

/// PUT /api/v1/projects/{project_id}/research-notes/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<UpdateResearchNote>,
) -> AppResult<Json<ResearchNote>> {
    validate_input(&input)?;
    let note = ResearchNoteRepo::update(&state.pool, project_id, id, &input)
        .await?
        .ok_or(not_found("ResearchNote", id))?;
    Ok(Json(note))
}

/// DELETE /api/v1/projects/{project_id}/research-notes/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let note = ResearchNoteRepo::delete(&state.pool, project_id, id)
        .await?
        .ok_or(not_found("ResearchNote", id))?;
    if let Some(path) = note.file_path.as_deref() {
        storage::remove_attachment(&state.config.media_root, path).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{project_id}/research-notes/{id}/file
///
/// Accepts a multipart form with a required `file` field. Replaces any
/// file already attached to the note.
pub async fn upload_file(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
    mut multipart: Multipart,
) -> AppResult<Json<ResearchNote>> {
    let existing = ResearchNoteRepo::find_by_id(&state.pool, project_id, id)
        .await?
        .ok_or(not_found("ResearchNote", id))?;

    let mut file_data: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = storage::sanitize_file_name(field.file_name().unwrap_or_default());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file_data = Some((file_name, data.to_vec()));
    }

    let (file_name, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let relative =
        storage::save_attachment(&state.config.media_root, project_id, &file_name, &data).await?;
    let note = match ResearchNoteRepo::set_file(
        &state.pool,
        project_id,
        id,
        Some(&relative),
        Some(&file_name),
    )
    .await
    {
        Ok(Some(note)) => note,
        Ok(None) => {
            storage::remove_attachment(&state.config.media_root, &relative).await?;
            return Err(not_found("ResearchNote", id));
        }
        Err(e) => {
            storage::remove_attachment(&state.config.media_root, &relative).await?;
            return Err(e.into());
        }
    };

    if let Some(previous) = existing.file_path.as_deref() {
        storage::remove_attachment(&state.config.media_root, previous).await?;
    }

    tracing::info!(
        project_id,
        note_id = id,
        file_name = %file_name,
        bytes = data.len(),
        "Research note file attached",
    );
    Ok(Json(note))
}

/// DELETE /api/v1/projects/{project_id}/research-notes/{id}/file
pub async fn delete_file(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<ResearchNote>> {
    let existing = ResearchNoteRepo::find_by_id(&state.pool, project_id, id)
        .await?
        .ok_or(not_found("ResearchNote", id))?;
    let Some(previous) = existing.file_path.as_deref() else {
        return Err(AppError::BadRequest(
            "Research note has no attached file".to_string(),
        ));
    };

    let note = ResearchNoteRepo::set_file(&state.pool, project_id, id, None, None)
        .await?
        .ok_or(not_found("ResearchNote", id))?;
    storage::remove_attachment(&state.config.media_root, previous).await?;
    Ok(Json(note))
}
