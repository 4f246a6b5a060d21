pub mod ai;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                             list, create
/// /projects/{id}                                        get, update, delete
/// /projects/{project_id}/characters[/{id}]              CRUD
/// /projects/{project_id}/relationships[/{id}]           CRUD
/// /projects/{project_id}/places[/{id}]                  CRUD
/// /projects/{project_id}/organizations[/{id}]           CRUD
/// /projects/{project_id}/chapters[/{id}]                CRUD
/// /projects/{project_id}/plot-points[/{id}]             CRUD
/// /projects/{project_id}/research-notes[/{id}]          CRUD
/// /projects/{project_id}/research-notes/{id}/file       upload, delete
/// /projects/{project_id}/attributes[/{id}]              list, create, get, delete
/// /projects/{project_id}/attributes/{id}/values         list, set
///
/// /ai/status                                            backend check
/// /ai/projects/{project_id}/context                     structured record + text block
/// /ai/projects/{project_id}/summary                     prompt (GET), generate (POST)
/// /ai/projects/{project_id}/refine                      refine a passage (POST)
/// /ai/projects/{project_id}/{kind}/{entity_id}/improve  prompt (GET), generate (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/ai", ai::router())
}
