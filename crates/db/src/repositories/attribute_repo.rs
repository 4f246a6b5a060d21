//! Repository for custom attribute definitions and values.

use sqlx::{PgExecutor, PgPool};
use storyforge_core::context::AttributeOwner;
use storyforge_core::types::DbId;

use crate::models::attribute::{
    owner_columns, AttributeValue, CreateCustomAttribute, CustomAttribute, NamedAttributeValue,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, scope, description, created_at, updated_at";

const VALUE_COLUMNS: &str =
    "id, attribute_id, character_id, place_id, organization_id, value, created_at, updated_at";

/// Provides operations on per-project custom attributes.
pub struct AttributeRepo;

impl AttributeRepo {
    /// Define an attribute. The name must be unique per project and scope
    /// (`uq_custom_attributes_project_scope_name`).
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateCustomAttribute,
    ) -> Result<CustomAttribute, sqlx::Error> {
        let query = format!(
            "INSERT INTO custom_attributes (project_id, name, scope, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomAttribute>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.scope)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<CustomAttribute>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM custom_attributes WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, CustomAttribute>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's definitions by scope, then name.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<CustomAttribute>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM custom_attributes WHERE project_id = $1 \
             ORDER BY scope, name, id"
        );
        sqlx::query_as::<_, CustomAttribute>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a definition and all its values.
    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM custom_attributes WHERE id = $1 AND project_id = $2")
                .bind(id)
                .bind(project_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the value of `attribute_id` on `owner`, replacing any previous one.
    ///
    /// A blank `value` removes the row and returns `None`.
    pub async fn set_value(
        pool: &PgPool,
        attribute_id: DbId,
        owner: AttributeOwner,
        value: &str,
    ) -> Result<Option<AttributeValue>, sqlx::Error> {
        let (character_id, place_id, organization_id) = owner_columns(owner);
        let mut tx = pool.begin().await?;

        sqlx::query(
            "DELETE FROM custom_attribute_values
             WHERE attribute_id = $1
               AND character_id IS NOT DISTINCT FROM $2
               AND place_id IS NOT DISTINCT FROM $3
               AND organization_id IS NOT DISTINCT FROM $4",
        )
        .bind(attribute_id)
        .bind(character_id)
        .bind(place_id)
        .bind(organization_id)
        .execute(&mut *tx)
        .await?;

        let stored = if value.trim().is_empty() {
            None
        } else {
            let query = format!(
                "INSERT INTO custom_attribute_values \
                    (attribute_id, character_id, place_id, organization_id, value)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING {VALUE_COLUMNS}"
            );
            Some(
                sqlx::query_as::<_, AttributeValue>(&query)
                    .bind(attribute_id)
                    .bind(character_id)
                    .bind(place_id)
                    .bind(organization_id)
                    .bind(value)
                    .fetch_one(&mut *tx)
                    .await?,
            )
        };

        tx.commit().await?;
        Ok(stored)
    }

    /// All values of one attribute.
    pub async fn list_values(
        pool: &PgPool,
        attribute_id: DbId,
    ) -> Result<Vec<AttributeValue>, sqlx::Error> {
        let query = format!(
            "SELECT {VALUE_COLUMNS} FROM custom_attribute_values WHERE attribute_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, AttributeValue>(&query)
            .bind(attribute_id)
            .fetch_all(pool)
            .await
    }

    /// Every value in the project joined with its attribute name.
    pub async fn named_values_for_project<'e, E: PgExecutor<'e>>(
        executor: E,
        project_id: DbId,
    ) -> Result<Vec<NamedAttributeValue>, sqlx::Error> {
        sqlx::query_as::<_, NamedAttributeValue>(
            "SELECT a.id AS attribute_id, a.name, v.character_id, v.place_id, \
                    v.organization_id, v.value
             FROM custom_attribute_values v
             JOIN custom_attributes a ON a.id = v.attribute_id
             WHERE a.project_id = $1
             ORDER BY a.name, a.id",
        )
        .bind(project_id)
        .fetch_all(executor)
        .await
    }
}
