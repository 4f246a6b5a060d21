//! Repository for the `places` table and its character links.

use sqlx::{PgConnection, PgPool};
use storyforge_core::types::DbId;

use crate::models::place::{CreatePlace, Place, PlaceDetail, UpdatePlace};
use crate::repositories::links::{LinkRepo, PLACE_CHARACTERS};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, place_type, description, summary, \
                       sensory_details_keywords, atmosphere_keywords, \
                       strategic_importance_or_plot_relevance, created_at, updated_at";

/// Provides CRUD operations for places within a project.
pub struct PlaceRepo;

impl PlaceRepo {
    /// Insert a place and its character links in one transaction.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreatePlace,
    ) -> Result<PlaceDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO places (project_id, name, place_type, description, summary, \
                sensory_details_keywords, atmosphere_keywords, strategic_importance_or_plot_relevance)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let place = sqlx::query_as::<_, Place>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.place_type)
            .bind(&input.description)
            .bind(&input.summary)
            .bind(&input.sensory_details_keywords)
            .bind(&input.atmosphere_keywords)
            .bind(&input.strategic_importance_or_plot_relevance)
            .fetch_one(&mut *tx)
            .await?;

        LinkRepo::replace(&mut tx, PLACE_CHARACTERS, place.id, &input.character_ids).await?;
        let character_ids = LinkRepo::ids_for(&mut *tx, PLACE_CHARACTERS, place.id).await?;

        tx.commit().await?;
        Ok(PlaceDetail {
            place,
            character_ids,
        })
    }

    /// Find a place in a project, with its links.
    pub async fn find_by_id(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<PlaceDetail>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM places WHERE id = $1 AND project_id = $2");
        let Some(place) = sqlx::query_as::<_, Place>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };
        let character_ids = LinkRepo::ids_for(pool, PLACE_CHARACTERS, place.id).await?;
        Ok(Some(PlaceDetail {
            place,
            character_ids,
        }))
    }

    /// List a project's places by name, with their links.
    pub async fn list_by_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<Vec<PlaceDetail>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM places WHERE project_id = $1 ORDER BY name, id");
        let places = sqlx::query_as::<_, Place>(&query)
            .bind(project_id)
            .fetch_all(&mut *conn)
            .await?;
        let mut characters =
            LinkRepo::grouped_for_project(&mut *conn, PLACE_CHARACTERS, project_id).await?;

        Ok(places
            .into_iter()
            .map(|place| PlaceDetail {
                character_ids: characters.remove(&place.id).unwrap_or_default(),
                place,
            })
            .collect())
    }

    /// Update a place. `None` fields are left unchanged; a present
    /// `character_ids` replaces the link set.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        input: &UpdatePlace,
    ) -> Result<Option<PlaceDetail>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE places SET
                name = COALESCE($3, name),
                place_type = COALESCE($4, place_type),
                description = COALESCE($5, description),
                summary = COALESCE($6, summary),
                sensory_details_keywords = COALESCE($7, sensory_details_keywords),
                atmosphere_keywords = COALESCE($8, atmosphere_keywords),
                strategic_importance_or_plot_relevance =
                    COALESCE($9, strategic_importance_or_plot_relevance),
                updated_at = NOW()
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        let Some(place) = sqlx::query_as::<_, Place>(&query)
            .bind(id)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.place_type)
            .bind(&input.description)
            .bind(&input.summary)
            .bind(&input.sensory_details_keywords)
            .bind(&input.atmosphere_keywords)
            .bind(&input.strategic_importance_or_plot_relevance)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(ids) = &input.character_ids {
            LinkRepo::replace(&mut tx, PLACE_CHARACTERS, place.id, ids).await?;
        }
        let character_ids = LinkRepo::ids_for(&mut *tx, PLACE_CHARACTERS, place.id).await?;

        tx.commit().await?;
        Ok(Some(PlaceDetail {
            place,
            character_ids,
        }))
    }

    /// Delete a place. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM places WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
