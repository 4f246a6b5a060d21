//! Request handlers.
//!
//! Each submodule provides async handler functions (create, list, get_by_id,
//! update, delete) for a single entity type. Handlers delegate to the
//! corresponding repository in `storyforge_db` and map errors via [`AppError`].
//! Child resources are always looked up within their project, so an id from
//! another project is reported as not found.

pub mod assist;
pub mod attribute;
pub mod chapter;
pub mod character;
pub mod organization;
pub mod place;
pub mod plot_point;
pub mod project;
pub mod relationship;
pub mod research_note;

use storyforge_core::error::CoreError;
use storyforge_core::types::DbId;
use storyforge_db::models::project::Project;
use storyforge_db::repositories::{LinkRepo, ProjectRepo};
use storyforge_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Run derive-based validation on a request body.
pub(crate) fn validate_input<T: Validate>(input: &T) -> AppResult<()> {
    input.validate().map_err(AppError::from)
}

/// Load the project or fail with 404.
pub(crate) async fn ensure_project(pool: &DbPool, project_id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))
}

/// Fail with a validation error if any of `ids` is not a row of `table`
/// in `project_id`.
pub(crate) async fn ensure_in_project(
    pool: &DbPool,
    table: &'static str,
    entity: &str,
    project_id: DbId,
    ids: &[DbId],
) -> AppResult<()> {
    let missing = LinkRepo::missing_in_project(pool, table, project_id, ids).await?;
    if missing.is_empty() {
        return Ok(());
    }
    let listed: Vec<String> = missing.iter().map(ToString::to_string).collect();
    Err(AppError::Core(CoreError::Validation(format!(
        "{entity} id(s) not found in project {project_id}: {}",
        listed.join(", ")
    ))))
}

/// Not-found error for a child entity.
pub(crate) fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

/// Check optional character, place and organization id lists against
/// the project. `None` lists are skipped.
pub(crate) async fn ensure_links(
    pool: &DbPool,
    project_id: DbId,
    character_ids: Option<&[DbId]>,
    place_ids: Option<&[DbId]>,
    organization_ids: Option<&[DbId]>,
) -> AppResult<()> {
    if let Some(ids) = character_ids {
        ensure_in_project(pool, "characters", "Character", project_id, ids).await?;
    }
    if let Some(ids) = place_ids {
        ensure_in_project(pool, "places", "Place", project_id, ids).await?;
    }
    if let Some(ids) = organization_ids {
        ensure_in_project(pool, "organizations", "Organization", project_id, ids).await?;
    }
    Ok(())
}
