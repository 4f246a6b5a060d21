//! Route definitions for the `/projects` resource.
//!
//! Every other entity is nested under `/projects/{project_id}/...`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{
    attribute, chapter, character, organization, place, plot_point, project, relationship,
    research_note,
};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                          -> list
/// POST   /                                          -> create
/// GET    /{id}                                      -> get_by_id
/// PUT    /{id}                                      -> update
/// DELETE /{id}                                      -> delete
///
/// GET|POST            /{project_id}/characters
/// GET|PUT|DELETE      /{project_id}/characters/{id}
/// GET|POST            /{project_id}/relationships
/// GET|PUT|DELETE      /{project_id}/relationships/{id}
/// GET|POST            /{project_id}/places
/// GET|PUT|DELETE      /{project_id}/places/{id}
/// GET|POST            /{project_id}/organizations
/// GET|PUT|DELETE      /{project_id}/organizations/{id}
/// GET|POST            /{project_id}/chapters
/// GET|PUT|DELETE      /{project_id}/chapters/{id}
/// GET|POST            /{project_id}/plot-points
/// GET|PUT|DELETE      /{project_id}/plot-points/{id}
/// GET|POST            /{project_id}/research-notes
/// GET|PUT|DELETE      /{project_id}/research-notes/{id}
/// POST|DELETE         /{project_id}/research-notes/{id}/file
/// GET|POST            /{project_id}/attributes
/// GET|DELETE          /{project_id}/attributes/{id}
/// GET|PUT             /{project_id}/attributes/{id}/values
/// ```
pub fn router() -> Router<AppState> {
    let character_routes = Router::new()
        .route("/", get(character::list_by_project).post(character::create))
        .route(
            "/{id}",
            get(character::get_by_id)
                .put(character::update)
                .delete(character::delete),
        );

    let relationship_routes = Router::new()
        .route(
            "/",
            get(relationship::list_by_project).post(relationship::create),
        )
        .route(
            "/{id}",
            get(relationship::get_by_id)
                .put(relationship::update)
                .delete(relationship::delete),
        );

    let place_routes = Router::new()
        .route("/", get(place::list_by_project).post(place::create))
        .route(
            "/{id}",
            get(place::get_by_id).put(place::update).delete(place::delete),
        );

    let organization_routes = Router::new()
        .route(
            "/",
            get(organization::list_by_project).post(organization::create),
        )
        .route(
            "/{id}",
            get(organization::get_by_id)
                .put(organization::update)
                .delete(organization::delete),
        );

    let chapter_routes = Router::new()
        .route("/", get(chapter::list_by_project).post(chapter::create))
        .route(
            "/{id}",
            get(chapter::get_by_id)
                .put(chapter::update)
                .delete(chapter::delete),
        );

    let plot_point_routes = Router::new()
        .route(
            "/",
            get(plot_point::list_by_project).post(plot_point::create),
        )
        .route(
            "/{id}",
            get(plot_point::get_by_id)
                .put(plot_point::update)
                .delete(plot_point::delete),
        );

    let research_note_routes = Router::new()
        .route(
            "/",
            get(research_note::list_by_project).post(research_note::create),
        )
        .route(
            "/{id}",
            get(research_note::get_by_id)
                .put(research_note::update)
                .delete(research_note::delete),
        )
        .route(
            "/{id}/file",
            post(research_note::upload_file).delete(research_note::delete_file),
        );

    let attribute_routes = Router::new()
        .route(
            "/",
            get(attribute::list_by_project).post(attribute::create),
        )
        .route(
            "/{id}",
            get(attribute::get_by_id).delete(attribute::delete),
        )
        .route(
            "/{id}/values",
            put(attribute::set_value).get(attribute::list_values),
        );

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .nest("/{project_id}/characters", character_routes)
        .nest("/{project_id}/relationships", relationship_routes)
        .nest("/{project_id}/places", place_routes)
        .nest("/{project_id}/organizations", organization_routes)
        .nest("/{project_id}/chapters", chapter_routes)
        .nest("/{project_id}/plot-points", plot_point_routes)
        .nest("/{project_id}/research-notes", research_note_routes)
        .nest("/{project_id}/attributes", attribute_routes)
}
