//! Repository for the `character_relationships` table.

use sqlx::{PgExecutor, PgPool};
use storyforge_core::types::DbId;

use crate::models::relationship::{CreateRelationship, Relationship, UpdateRelationship};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, from_character_id, to_character_id, description, created_at, updated_at";

/// Provides CRUD operations for directed character relationships.
pub struct RelationshipRepo;

impl RelationshipRepo {
    /// Insert a relationship. A second edge for the same ordered pair fails
    /// with `uq_character_relationships_pair`.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateRelationship,
    ) -> Result<Relationship, sqlx::Error> {
        let query = format!(
            "INSERT INTO character_relationships \
                (project_id, from_character_id, to_character_id, description)
             VALUES ($1, $2, $3, COALESCE($4, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(project_id)
            .bind(input.from_character_id)
            .bind(input.to_character_id)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<Relationship>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM character_relationships WHERE id = $1 AND project_id = $2"
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's relationships, newest first.
    pub async fn list_by_project<'e, E: PgExecutor<'e>>(
        executor: E,
        project_id: DbId,
    ) -> Result<Vec<Relationship>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM character_relationships WHERE project_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        input: &UpdateRelationship,
    ) -> Result<Option<Relationship>, sqlx::Error> {
        let query = format!(
            "UPDATE character_relationships SET
                description = COALESCE($3, description),
                updated_at = NOW()
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(id)
            .bind(project_id)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a relationship. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM character_relationships WHERE id = $1 AND project_id = $2")
                .bind(id)
                .bind(project_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
