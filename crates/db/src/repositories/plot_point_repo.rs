//! Repository for the `plot_points` table and its links.

use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use storyforge_core::types::DbId;

use crate::models::plot_point::{CreatePlotPoint, PlotPoint, PlotPointDetail, UpdatePlotPoint};
use crate::repositories::links::{
    LinkRepo, PLOT_POINT_CHARACTERS, PLOT_POINT_ORGANIZATIONS, PLOT_POINT_PLACES,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, title, sort_order, chapter_id, narrative_function, \
                       key_events, information_revealed_to_reader, \
                       character_development_achieved, conflict_introduced_or_escalated, \
                       created_at, updated_at";

/// Provides CRUD operations for plot points within a project.
pub struct PlotPointRepo;

impl PlotPointRepo {
    /// Insert a plot point and its links in one transaction.
    ///
    /// `order` defaults to 0 when omitted.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreatePlotPoint,
    ) -> Result<PlotPointDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO plot_points (project_id, title, sort_order, chapter_id, \
                narrative_function, key_events, information_revealed_to_reader, \
                character_development_achieved, conflict_introduced_or_escalated)
             VALUES ($1, $2, COALESCE($3, 0), $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let plot_point = sqlx::query_as::<_, PlotPoint>(&query)
            .bind(project_id)
            .bind(&input.title)
            .bind(input.sort_order)
            .bind(input.chapter_id)
            .bind(&input.narrative_function)
            .bind(&input.key_events)
            .bind(&input.information_revealed_to_reader)
            .bind(&input.character_development_achieved)
            .bind(&input.conflict_introduced_or_escalated)
            .fetch_one(&mut *tx)
            .await?;

        let id = plot_point.id;
        LinkRepo::replace(&mut tx, PLOT_POINT_CHARACTERS, id, &input.character_ids).await?;
        LinkRepo::replace(&mut tx, PLOT_POINT_PLACES, id, &input.place_ids).await?;
        LinkRepo::replace(&mut tx, PLOT_POINT_ORGANIZATIONS, id, &input.organization_ids).await?;
        let detail = Self::with_links(&mut tx, plot_point).await?;

        tx.commit().await?;
        Ok(detail)
    }

    /// Find a plot point in a project, with its links.
    pub async fn find_by_id(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<PlotPointDetail>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM plot_points WHERE id = $1 AND project_id = $2");
        let Some(plot_point) = sqlx::query_as::<_, PlotPoint>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(PlotPointDetail {
            character_ids: LinkRepo::ids_for(pool, PLOT_POINT_CHARACTERS, id).await?,
            place_ids: LinkRepo::ids_for(pool, PLOT_POINT_PLACES, id).await?,
            organization_ids: LinkRepo::ids_for(pool, PLOT_POINT_ORGANIZATIONS, id).await?,
            plot_point,
        }))
    }

    /// List a project's plot points in story order, with their links.
    pub async fn list_by_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<Vec<PlotPointDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM plot_points WHERE project_id = $1 \
             ORDER BY sort_order, created_at, id"
        );
        let plot_points = sqlx::query_as::<_, PlotPoint>(&query)
            .bind(project_id)
            .fetch_all(&mut *conn)
            .await?;
        let mut characters =
            LinkRepo::grouped_for_project(&mut *conn, PLOT_POINT_CHARACTERS, project_id).await?;
        let mut places =
            LinkRepo::grouped_for_project(&mut *conn, PLOT_POINT_PLACES, project_id).await?;
        let mut organizations =
            LinkRepo::grouped_for_project(&mut *conn, PLOT_POINT_ORGANIZATIONS, project_id).await?;

        Ok(plot_points
            .into_iter()
            .map(|plot_point| PlotPointDetail {
                character_ids: characters.remove(&plot_point.id).unwrap_or_default(),
                place_ids: places.remove(&plot_point.id).unwrap_or_default(),
                organization_ids: organizations.remove(&plot_point.id).unwrap_or_default(),
                plot_point,
            })
            .collect())
    }

    /// Update a plot point. `None` fields are left unchanged; present id
    /// lists replace their link set. An explicit `null` chapter detaches it.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        input: &UpdatePlotPoint,
    ) -> Result<Option<PlotPointDetail>, sqlx::Error> {
        let chapter_provided = input.chapter_id.is_some();
        let chapter_value = input.chapter_id.flatten();

        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE plot_points SET
                title = COALESCE($3, title),
                sort_order = COALESCE($4, sort_order),
                chapter_id = CASE WHEN $5 THEN $6 ELSE chapter_id END,
                narrative_function = COALESCE($7, narrative_function),
                key_events = COALESCE($8, key_events),
                information_revealed_to_reader = COALESCE($9, information_revealed_to_reader),
                character_development_achieved = COALESCE($10, character_development_achieved),
                conflict_introduced_or_escalated =
                    COALESCE($11, conflict_introduced_or_escalated),
                updated_at = NOW()
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        let Some(plot_point) = sqlx::query_as::<_, PlotPoint>(&query)
            .bind(id)
            .bind(project_id)
            .bind(&input.title)
            .bind(input.sort_order)
            .bind(chapter_provided)
            .bind(chapter_value)
            .bind(&input.narrative_function)
            .bind(&input.key_events)
            .bind(&input.information_revealed_to_reader)
            .bind(&input.character_development_achieved)
            .bind(&input.conflict_introduced_or_escalated)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(ids) = &input.character_ids {
            LinkRepo::replace(&mut tx, PLOT_POINT_CHARACTERS, id, ids).await?;
        }
        if let Some(ids) = &input.place_ids {
            LinkRepo::replace(&mut tx, PLOT_POINT_PLACES, id, ids).await?;
        }
        if let Some(ids) = &input.organization_ids {
            LinkRepo::replace(&mut tx, PLOT_POINT_ORGANIZATIONS, id, ids).await?;
        }
        let detail = Self::with_links(&mut tx, plot_point).await?;

        tx.commit().await?;
        Ok(Some(detail))
    }

    /// Delete a plot point. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM plot_points WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn with_links(
        tx: &mut Transaction<'_, Postgres>,
        plot_point: PlotPoint,
    ) -> Result<PlotPointDetail, sqlx::Error> {
        let id = plot_point.id;
        Ok(PlotPointDetail {
            character_ids: LinkRepo::ids_for(&mut **tx, PLOT_POINT_CHARACTERS, id).await?,
            place_ids: LinkRepo::ids_for(&mut **tx, PLOT_POINT_PLACES, id).await?,
            organization_ids: LinkRepo::ids_for(&mut **tx, PLOT_POINT_ORGANIZATIONS, id).await?,
            plot_point,
        })
    }
}
