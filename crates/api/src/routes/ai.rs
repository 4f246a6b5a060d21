//! Route definitions for generative assistance under `/ai`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assist;
use crate::state::AppState;

/// Routes mounted at `/ai`.
///
/// ```text
/// GET  /status                                          -> status
/// GET  /projects/{project_id}/context                   -> context
/// GET  /projects/{project_id}/summary                   -> summary_prompt
/// POST /projects/{project_id}/summary                   -> summary_generate
/// POST /projects/{project_id}/refine                    -> refine
/// GET  /projects/{project_id}/{kind}/{entity_id}/improve -> improve_prompt
/// POST /projects/{project_id}/{kind}/{entity_id}/improve -> improve_generate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(assist::status))
        .route("/projects/{project_id}/context", get(assist::context))
        .route(
            "/projects/{project_id}/summary",
            get(assist::summary_prompt).post(assist::summary_generate),
        )
        .route("/projects/{project_id}/refine", post(assist::refine))
        .route(
            "/projects/{project_id}/{kind}/{entity_id}/improve",
            get(assist::improve_prompt).post(assist::improve_generate),
        )
}
