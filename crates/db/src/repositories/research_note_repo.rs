//! Repository for the `research_notes` table.

use sqlx::{PgExecutor, PgPool};
use storyforge_core::types::DbId;

use crate::models::research_note::{CreateResearchNote, ResearchNote, UpdateResearchNote};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, title, content, tags, file_path, file_name, created_at, updated_at";

/// Provides CRUD operations for research notes and their attached file.
pub struct ResearchNoteRepo;

impl ResearchNoteRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateResearchNote,
    ) -> Result<ResearchNote, sqlx::Error> {
        let query = format!(
            "INSERT INTO research_notes (project_id, title, content, tags)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ResearchNote>(&query)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.tags)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<ResearchNote>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM research_notes WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, ResearchNote>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's notes, most recently updated first.
    pub async fn list_by_project<'e, E: PgExecutor<'e>>(
        executor: E,
        project_id: DbId,
    ) -> Result<Vec<ResearchNote>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM research_notes WHERE project_id = $1 \
             ORDER BY updated_at DESC, id"
        );
        sqlx::query_as::<_, ResearchNote>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    /// Update a note. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        input: &UpdateResearchNote,
    ) -> Result<Option<ResearchNote>, sqlx::Error> {
        let query = format!(
            "UPDATE research_notes SET
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                tags = COALESCE($5, tags),
                updated_at = NOW()
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ResearchNote>(&query)
            .bind(id)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.tags)
            .fetch_optional(pool)
            .await
    }

    /// Point a note at a stored file, or detach it when both are `None`.
    pub async fn set_file(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        file_path: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<Option<ResearchNote>, sqlx::Error> {
        let query = format!(
            "UPDATE research_notes SET file_path = $3, file_name = $4, updated_at = NOW()
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ResearchNote>(&query)
            .bind(id)
            .bind(project_id)
            .bind(file_path)
            .bind(file_name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a note, returning the removed row so its file can be cleaned up.
    pub async fn delete(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<ResearchNote>, sqlx::Error> {
        let query = format!(
            "DELETE FROM research_notes WHERE id = $1 AND project_id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ResearchNote>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }
}
