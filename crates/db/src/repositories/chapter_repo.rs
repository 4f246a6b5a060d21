//! Repository for the `chapters` table and its links.

use sqlx::{PgConnection, PgExecutor, PgPool, Postgres, Transaction};
use storyforge_core::types::DbId;

use crate::models::chapter::{Chapter, ChapterDetail, CreateChapter, UpdateChapter};
use crate::repositories::links::{
    group_links, LinkRepo, CHAPTER_CHARACTERS, CHAPTER_ORGANIZATIONS, CHAPTER_PLACES,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, title, chapter_number, notes, content, point_of_view_id, \
                       created_at, updated_at";

/// Reading order.
const ORDER_BY: &str = "ORDER BY chapter_number, created_at, id";

/// Provides CRUD operations for chapters within a project.
pub struct ChapterRepo;

impl ChapterRepo {
    /// Insert a chapter and its links in one transaction.
    ///
    /// `chapter_number` defaults to 1 when omitted. Listed plot points are
    /// moved into the new chapter.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateChapter,
    ) -> Result<ChapterDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO chapters (project_id, title, chapter_number, notes, content, point_of_view_id)
             VALUES ($1, $2, COALESCE($3, 1), $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let chapter = sqlx::query_as::<_, Chapter>(&query)
            .bind(project_id)
            .bind(&input.title)
            .bind(input.chapter_number)
            .bind(&input.notes)
            .bind(&input.content)
            .bind(input.point_of_view_id)
            .fetch_one(&mut *tx)
            .await?;

        let id = chapter.id;
        LinkRepo::replace(&mut tx, CHAPTER_CHARACTERS, id, &input.character_ids).await?;
        LinkRepo::replace(&mut tx, CHAPTER_PLACES, id, &input.place_ids).await?;
        LinkRepo::replace(&mut tx, CHAPTER_ORGANIZATIONS, id, &input.organization_ids).await?;
        Self::assign_plot_points(&mut tx, project_id, id, &input.plot_point_ids).await?;
        let detail = Self::with_links(&mut tx, chapter).await?;

        tx.commit().await?;
        Ok(detail)
    }

    /// Find a chapter row in a project, without links.
    pub async fn find_by_id(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<Chapter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chapters WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, Chapter>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a chapter in a project, with its links.
    pub async fn find_detail(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<ChapterDetail>, sqlx::Error> {
        let Some(chapter) = Self::find_by_id(pool, project_id, id).await? else {
            return Ok(None);
        };
        Ok(Some(ChapterDetail {
            character_ids: LinkRepo::ids_for(pool, CHAPTER_CHARACTERS, id).await?,
            place_ids: LinkRepo::ids_for(pool, CHAPTER_PLACES, id).await?,
            organization_ids: LinkRepo::ids_for(pool, CHAPTER_ORGANIZATIONS, id).await?,
            plot_point_ids: Self::plot_point_ids(pool, id).await?,
            chapter,
        }))
    }

    /// List a project's chapters in reading order, with their links.
    pub async fn list_by_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<Vec<ChapterDetail>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chapters WHERE project_id = $1 {ORDER_BY}");
        let chapters = sqlx::query_as::<_, Chapter>(&query)
            .bind(project_id)
            .fetch_all(&mut *conn)
            .await?;
        let mut characters =
            LinkRepo::grouped_for_project(&mut *conn, CHAPTER_CHARACTERS, project_id).await?;
        let mut places = LinkRepo::grouped_for_project(&mut *conn, CHAPTER_PLACES, project_id).await?;
        let mut organizations =
            LinkRepo::grouped_for_project(&mut *conn, CHAPTER_ORGANIZATIONS, project_id).await?;
        let mut plot_points = group_links(
            sqlx::query_as::<_, (DbId, DbId)>(
                "SELECT chapter_id, id FROM plot_points \
                 WHERE project_id = $1 AND chapter_id IS NOT NULL \
                 ORDER BY chapter_id, sort_order, id",
            )
            .bind(project_id)
            .fetch_all(&mut *conn)
            .await?,
        );

        Ok(chapters
            .into_iter()
            .map(|chapter| ChapterDetail {
                character_ids: characters.remove(&chapter.id).unwrap_or_default(),
                place_ids: places.remove(&chapter.id).unwrap_or_default(),
                organization_ids: organizations.remove(&chapter.id).unwrap_or_default(),
                plot_point_ids: plot_points.remove(&chapter.id).unwrap_or_default(),
                chapter,
            })
            .collect())
    }

    /// Update a chapter. `None` fields are left unchanged; present id lists
    /// replace their link set. An explicit `null` point of view clears it.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        input: &UpdateChapter,
    ) -> Result<Option<ChapterDetail>, sqlx::Error> {
        let pov_provided = input.point_of_view_id.is_some();
        let pov_value = input.point_of_view_id.flatten();

        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE chapters SET
                title = COALESCE($3, title),
                chapter_number = COALESCE($4, chapter_number),
                notes = COALESCE($5, notes),
                content = COALESCE($6, content),
                point_of_view_id = CASE WHEN $7 THEN $8 ELSE point_of_view_id END,
                updated_at = NOW()
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        let Some(chapter) = sqlx::query_as::<_, Chapter>(&query)
            .bind(id)
            .bind(project_id)
            .bind(&input.title)
            .bind(input.chapter_number)
            .bind(&input.notes)
            .bind(&input.content)
            .bind(pov_provided)
            .bind(pov_value)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(ids) = &input.character_ids {
            LinkRepo::replace(&mut tx, CHAPTER_CHARACTERS, id, ids).await?;
        }
        if let Some(ids) = &input.place_ids {
            LinkRepo::replace(&mut tx, CHAPTER_PLACES, id, ids).await?;
        }
        if let Some(ids) = &input.organization_ids {
            LinkRepo::replace(&mut tx, CHAPTER_ORGANIZATIONS, id, ids).await?;
        }
        if let Some(ids) = &input.plot_point_ids {
            sqlx::query(
                "UPDATE plot_points SET chapter_id = NULL, updated_at = NOW() \
                 WHERE chapter_id = $1 AND NOT (id = ANY($2))",
            )
            .bind(id)
            .bind(ids)
            .execute(&mut *tx)
            .await?;
            Self::assign_plot_points(&mut tx, project_id, id, ids).await?;
        }
        let detail = Self::with_links(&mut tx, chapter).await?;

        tx.commit().await?;
        Ok(Some(detail))
    }

    /// Delete a chapter. Plot points in it keep existing without a chapter.
    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chapters WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn with_links(
        tx: &mut Transaction<'_, Postgres>,
        chapter: Chapter,
    ) -> Result<ChapterDetail, sqlx::Error> {
        let id = chapter.id;
        Ok(ChapterDetail {
            character_ids: LinkRepo::ids_for(&mut **tx, CHAPTER_CHARACTERS, id).await?,
            place_ids: LinkRepo::ids_for(&mut **tx, CHAPTER_PLACES, id).await?,
            organization_ids: LinkRepo::ids_for(&mut **tx, CHAPTER_ORGANIZATIONS, id).await?,
            plot_point_ids: Self::plot_point_ids(&mut **tx, id).await?,
            chapter,
        })
    }

    /// Ids of the plot points in a chapter, in story order.
    async fn plot_point_ids<'e, E: PgExecutor<'e>>(
        executor: E,
        chapter_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM plot_points WHERE chapter_id = $1 ORDER BY sort_order, id",
        )
        .bind(chapter_id)
        .fetch_all(executor)
        .await
    }

    /// Move the listed plot points of the project into `chapter_id`.
    async fn assign_plot_points(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
        chapter_id: DbId,
        plot_point_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        if plot_point_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "UPDATE plot_points SET chapter_id = $1, updated_at = NOW() \
             WHERE project_id = $2 AND id = ANY($3)",
        )
        .bind(chapter_id)
        .bind(project_id)
        .bind(plot_point_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
