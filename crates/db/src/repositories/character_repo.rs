//! Repository for the `characters` table.

use sqlx::{PgExecutor, PgPool};
use storyforge_core::types::DbId;

use crate::models::character::{Character, CreateCharacter, UpdateCharacter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, role, description, traits, appearance, age, gender, \
                       primary_goal, secondary_goals, key_motivations, character_arc_summary, \
                       strengths, weaknesses, internal_conflict, external_conflict, \
                       created_at, updated_at";

/// Provides CRUD operations for characters within a project.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateCharacter,
    ) -> Result<Character, sqlx::Error> {
        let query = format!(
            "INSERT INTO characters (project_id, name, role, description, traits, appearance, \
                age, gender, primary_goal, secondary_goals, key_motivations, \
                character_arc_summary, strengths, weaknesses, internal_conflict, external_conflict)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.role)
            .bind(&input.description)
            .bind(&input.traits)
            .bind(&input.appearance)
            .bind(&input.age)
            .bind(&input.gender)
            .bind(&input.primary_goal)
            .bind(&input.secondary_goals)
            .bind(&input.key_motivations)
            .bind(&input.character_arc_summary)
            .bind(&input.strengths)
            .bind(&input.weaknesses)
            .bind(&input.internal_conflict)
            .bind(&input.external_conflict)
            .fetch_one(pool)
            .await
    }

    /// Find a character in a project.
    pub async fn find_by_id(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's characters by name.
    pub async fn list_by_project<'e, E: PgExecutor<'e>>(
        executor: E,
        project_id: DbId,
    ) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters WHERE project_id = $1 ORDER BY name, id"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    /// Update a character. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists in the project.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        input: &UpdateCharacter,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET
                name = COALESCE($3, name),
                role = COALESCE($4, role),
                description = COALESCE($5, description),
                traits = COALESCE($6, traits),
                appearance = COALESCE($7, appearance),
                age = COALESCE($8, age),
                gender = COALESCE($9, gender),
                primary_goal = COALESCE($10, primary_goal),
                secondary_goals = COALESCE($11, secondary_goals),
                key_motivations = COALESCE($12, key_motivations),
                character_arc_summary = COALESCE($13, character_arc_summary),
                strengths = COALESCE($14, strengths),
                weaknesses = COALESCE($15, weaknesses),
                internal_conflict = COALESCE($16, internal_conflict),
                external_conflict = COALESCE($17, external_conflict),
                updated_at = NOW()
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.role)
            .bind(&input.description)
            .bind(&input.traits)
            .bind(&input.appearance)
            .bind(&input.age)
            .bind(&input.gender)
            .bind(&input.primary_goal)
            .bind(&input.secondary_goals)
            .bind(&input.key_motivations)
            .bind(&input.character_arc_summary)
            .bind(&input.strengths)
            .bind(&input.weaknesses)
            .bind(&input.internal_conflict)
            .bind(&input.external_conflict)
            .fetch_optional(pool)
            .await
    }

    /// Delete a character. Returns `true` if a row was removed.
    ///
    /// Relationships and link rows cascade; chapters lose their point of view.
    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM characters WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Name of a character, if it exists.
    pub async fn find_name(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT name FROM characters WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
