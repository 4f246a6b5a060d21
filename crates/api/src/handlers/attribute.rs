//! Handlers for project-defined custom attributes.
//!
//! ```text
//! GET    /projects/{project_id}/attributes              -> list definitions
//! POST   /projects/{project_id}/attributes              -> define
//! GET    /projects/{project_id}/attributes/{id}         -> get definition
//! DELETE /projects/{project_id}/attributes/{id}         -> delete with values
//! GET    /projects/{project_id}/attributes/{id}/values  -> list values
//! PUT    /projects/{project_id}/attributes/{id}/values  -> set one value
//! ```

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use storyforge_core::attribute::{validate_attribute_name, AttributeScope};
use storyforge_core::context::{AttributeOwner, Section};
use storyforge_core::error::CoreError;
use storyforge_core::types::DbId;
use storyforge_db::models::attribute::{
    AttributeValue, CreateCustomAttribute, CustomAttribute, SetAttributeValue,
};
use storyforge_db::repositories::AttributeRepo;

use super::{ensure_in_project, ensure_project, not_found, validate_input};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// Table and entity name holding owners of a scoped attribute.
fn owner_table(scope: AttributeScope) -> Option<(&'static str, &'static str)> {
    match scope {
        AttributeScope::Project => None,
        AttributeScope::Character => Some(("characters", "Character")),
        AttributeScope::Place => Some(("places", "Place")),
        AttributeScope::Organization => Some(("organizations", "Organization")),
    }
}

/// Resolve the owner a value is being set on.
fn owner_for(scope: AttributeScope, entity_id: Option<DbId>) -> Result<AttributeOwner, CoreError> {
    match (scope, entity_id) {
        (AttributeScope::Project, None) => Ok(AttributeOwner::Project),
        (AttributeScope::Project, Some(_)) => Err(CoreError::Validation(
            "entity_id must be omitted for project-scoped attributes".to_string(),
        )),
        (_, None) => Err(CoreError::Validation(format!(
            "entity_id is required for {}-scoped attributes",
            scope.as_str()
        ))),
        (AttributeScope::Character, Some(id)) => Ok(AttributeOwner::Character(id)),
        (AttributeScope::Place, Some(id)) => Ok(AttributeOwner::Place(id)),
        (AttributeScope::Organization, Some(id)) => Ok(AttributeOwner::Organization(id)),
    }
}

async fn find_attribute(
    state: &AppState,
    project_id: DbId,
    id: DbId,
) -> AppResult<CustomAttribute> {
    AttributeRepo::find_by_id(&state.pool, project_id, id)
        .await?
        .ok_or(not_found("CustomAttribute", id))
}

/// POST /api/v1/projects/{project_id}/attributes
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    AppJson(input): AppJson<CreateCustomAttribute>,
) -> AppResult<(StatusCode, Json<CustomAttribute>)> {
    validate_input(&input)?;
    validate_attribute_name(&input.name)?;
    let scope = AttributeScope::from_str_value(&input.scope)?;
    if scope == AttributeScope::Project && Section::parse(&input.name).is_some() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Project attribute name '{}' is reserved for a context section",
            input.name
        ))));
    }
    ensure_project(&state.pool, project_id).await?;

    let attribute = AttributeRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(
        project_id,
        attribute_id = attribute.id,
        scope = scope.as_str(),
        "Custom attribute defined",
    );
    Ok((StatusCode::CREATED, Json(attribute)))
}

/// GET /api/v1/projects/{project_id}/attributes
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<CustomAttribute>>> {
    ensure_project(&state.pool, project_id).await?;
    let attributes = AttributeRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(attributes))
}

/// GET /api/v1/projects/{project_id}/attributes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<CustomAttribute>> {
    Ok(Json(find_attribute(&state, project_id, id).await?))
}

/// DELETE /api/v1/projects/{project_id}/attributes/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if AttributeRepo::delete(&state.pool, project_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("CustomAttribute", id))
    }
}

/// GET /api/v1/projects/{project_id}/attributes/{id}/values
pub async fn list_values(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Vec<AttributeValue>>> {
    find_attribute(&state, project_id, id).await?;
    let values = AttributeRepo::list_values(&state.pool, id).await?;
    Ok(Json(values))
}

/// PUT /api/v1/projects/{project_id}/attributes/{id}/values
///
/// Returns the stored value, or 204 when a blank value cleared it.
pub async fn set_value(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(DbId, DbId)>,
    AppJson(input): AppJson<SetAttributeValue>,
) -> AppResult<Response> {
    validate_input(&input)?;
    let attribute = find_attribute(&state, project_id, id).await?;
    let scope = attribute.scope()?;
    let owner = owner_for(scope, input.entity_id)?;
    if let (Some((table, entity)), Some(entity_id)) = (owner_table(scope), input.entity_id) {
        ensure_in_project(&state.pool, table, entity, project_id, &[entity_id]).await?;
    }

    match AttributeRepo::set_value(&state.pool, id, owner, &input.value).await? {
        Some(value) => Ok(Json(value).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn project_scope_takes_no_entity() {
        assert_matches!(
            owner_for(AttributeScope::Project, None),
            Ok(AttributeOwner::Project)
        );
        assert_matches!(
            owner_for(AttributeScope::Project, Some(4)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn entity_scopes_require_entity() {
        assert_matches!(
            owner_for(AttributeScope::Place, Some(9)),
            Ok(AttributeOwner::Place(9))
        );
        assert_matches!(
            owner_for(AttributeScope::Character, None),
            Err(CoreError::Validation(msg)) if msg.contains("character-scoped")
        );
    }
}
