//! Repository for the `organizations` table and its member links.

use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use storyforge_core::types::DbId;

use crate::models::organization::{
    CreateOrganization, Organization, OrganizationDetail, UpdateOrganization,
};
use crate::repositories::links::{LinkRepo, ORGANIZATION_CHARACTERS, ORGANIZATION_PLACES};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, org_type, description, goals_and_objectives, \
                       modus_operandi_keywords, hierarchy_and_membership, \
                       relationships_with_other_entities, internal_dynamics, \
                       created_at, updated_at";

/// Provides CRUD operations for organizations within a project.
pub struct OrganizationRepo;

impl OrganizationRepo {
    /// Insert an organization and its links in one transaction.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateOrganization,
    ) -> Result<OrganizationDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO organizations (project_id, name, org_type, description, \
                goals_and_objectives, modus_operandi_keywords, hierarchy_and_membership, \
                relationships_with_other_entities, internal_dynamics)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let organization = sqlx::query_as::<_, Organization>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.org_type)
            .bind(&input.description)
            .bind(&input.goals_and_objectives)
            .bind(&input.modus_operandi_keywords)
            .bind(&input.hierarchy_and_membership)
            .bind(&input.relationships_with_other_entities)
            .bind(&input.internal_dynamics)
            .fetch_one(&mut *tx)
            .await?;

        let id = organization.id;
        LinkRepo::replace(&mut tx, ORGANIZATION_CHARACTERS, id, &input.character_ids).await?;
        LinkRepo::replace(&mut tx, ORGANIZATION_PLACES, id, &input.place_ids).await?;
        let detail = Self::with_links(&mut tx, organization).await?;

        tx.commit().await?;
        Ok(detail)
    }

    /// Find an organization in a project, with its links.
    pub async fn find_by_id(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<OrganizationDetail>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM organizations WHERE id = $1 AND project_id = $2");
        let Some(organization) = sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };
        let character_ids = LinkRepo::ids_for(pool, ORGANIZATION_CHARACTERS, id).await?;
        let place_ids = LinkRepo::ids_for(pool, ORGANIZATION_PLACES, id).await?;
        Ok(Some(OrganizationDetail {
            organization,
            character_ids,
            place_ids,
        }))
    }

    /// List a project's organizations by name, with their links.
    pub async fn list_by_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<Vec<OrganizationDetail>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM organizations WHERE project_id = $1 ORDER BY name, id");
        let organizations = sqlx::query_as::<_, Organization>(&query)
            .bind(project_id)
            .fetch_all(&mut *conn)
            .await?;
        let mut characters =
            LinkRepo::grouped_for_project(&mut *conn, ORGANIZATION_CHARACTERS, project_id).await?;
        let mut places =
            LinkRepo::grouped_for_project(&mut *conn, ORGANIZATION_PLACES, project_id).await?;

        Ok(organizations
            .into_iter()
            .map(|organization| OrganizationDetail {
                character_ids: characters.remove(&organization.id).unwrap_or_default(),
                place_ids: places.remove(&organization.id).unwrap_or_default(),
                organization,
            })
            .collect())
    }

    /// Update an organization. `None` fields are left unchanged; present id
    /// lists replace their link set.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        input: &UpdateOrganization,
    ) -> Result<Option<OrganizationDetail>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE organizations SET
                name = COALESCE($3, name),
                org_type = COALESCE($4, org_type),
                description = COALESCE($5, description),
                goals_and_objectives = COALESCE($6, goals_and_objectives),
                modus_operandi_keywords = COALESCE($7, modus_operandi_keywords),
                hierarchy_and_membership = COALESCE($8, hierarchy_and_membership),
                relationships_with_other_entities =
                    COALESCE($9, relationships_with_other_entities),
                internal_dynamics = COALESCE($10, internal_dynamics),
                updated_at = NOW()
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        let Some(organization) = sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.org_type)
            .bind(&input.description)
            .bind(&input.goals_and_objectives)
            .bind(&input.modus_operandi_keywords)
            .bind(&input.hierarchy_and_membership)
            .bind(&input.relationships_with_other_entities)
            .bind(&input.internal_dynamics)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(ids) = &input.character_ids {
            LinkRepo::replace(&mut tx, ORGANIZATION_CHARACTERS, id, ids).await?;
        }
        if let Some(ids) = &input.place_ids {
            LinkRepo::replace(&mut tx, ORGANIZATION_PLACES, id, ids).await?;
        }
        let detail = Self::with_links(&mut tx, organization).await?;

        tx.commit().await?;
        Ok(Some(detail))
    }

    /// Delete an organization. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn with_links(
        tx: &mut Transaction<'_, Postgres>,
        organization: Organization,
    ) -> Result<OrganizationDetail, sqlx::Error> {
        let character_ids =
            LinkRepo::ids_for(&mut **tx, ORGANIZATION_CHARACTERS, organization.id).await?;
        let place_ids = LinkRepo::ids_for(&mut **tx, ORGANIZATION_PLACES, organization.id).await?;
        Ok(OrganizationDetail {
            organization,
            character_ids,
            place_ids,
        })
    }
}
