//! Junction tables linking entities inside one project.

use std::collections::HashMap;

use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use storyforge_core::types::DbId;

/// A junction table `(owner_column, target_column)` whose owner rows live in
/// `owner_table`.
#[derive(Debug, Clone, Copy)]
pub struct LinkTable {
    pub table: &'static str,
    pub owner_table: &'static str,
    pub owner_column: &'static str,
    pub target_column: &'static str,
}

pub const PLACE_CHARACTERS: LinkTable = LinkTable {
    table: "place_characters",
    owner_table: "places",
    owner_column: "place_id",
    target_column: "character_id",
};

pub const ORGANIZATION_CHARACTERS: LinkTable = LinkTable {
    table: "organization_characters",
    owner_table: "organizations",
    owner_column: "organization_id",
    target_column: "character_id",
};

pub const ORGANIZATION_PLACES: LinkTable = LinkTable {
    table: "organization_places",
    owner_table: "organizations",
    owner_column: "organization_id",
    target_column: "place_id",
};

pub const CHAPTER_CHARACTERS: LinkTable = LinkTable {
    table: "chapter_characters",
    owner_table: "chapters",
    owner_column: "chapter_id",
    target_column: "character_id",
};

pub const CHAPTER_PLACES: LinkTable = LinkTable {
    table: "chapter_places",
    owner_table: "chapters",
    owner_column: "chapter_id",
    target_column: "place_id",
};

pub const CHAPTER_ORGANIZATIONS: LinkTable = LinkTable {
    table: "chapter_organizations",
    owner_table: "chapters",
    owner_column: "chapter_id",
    target_column: "organization_id",
};

pub const PLOT_POINT_CHARACTERS: LinkTable = LinkTable {
    table: "plot_point_characters",
    owner_table: "plot_points",
    owner_column: "plot_point_id",
    target_column: "character_id",
};

pub const PLOT_POINT_PLACES: LinkTable = LinkTable {
    table: "plot_point_places",
    owner_table: "plot_points",
    owner_column: "plot_point_id",
    target_column: "place_id",
};

pub const PLOT_POINT_ORGANIZATIONS: LinkTable = LinkTable {
    table: "plot_point_organizations",
    owner_table: "plot_points",
    owner_column: "plot_point_id",
    target_column: "organization_id",
};

/// Group `(owner_id, target_id)` pairs by owner.
pub fn group_links(pairs: Vec<(DbId, DbId)>) -> HashMap<DbId, Vec<DbId>> {
    let mut grouped: HashMap<DbId, Vec<DbId>> = HashMap::new();
    for (owner, target) in pairs {
        grouped.entry(owner).or_default().push(target);
    }
    grouped
}

/// Operations shared by every junction table.
pub struct LinkRepo;

impl LinkRepo {
    /// Replace all links of `owner_id` with `target_ids`. Duplicates collapse.
    pub async fn replace(
        tx: &mut Transaction<'_, Postgres>,
        link: LinkTable,
        owner_id: DbId,
        target_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let delete = format!("DELETE FROM {} WHERE {} = $1", link.table, link.owner_column);
        sqlx::query(&delete)
            .bind(owner_id)
            .execute(&mut **tx)
            .await?;

        let insert = format!(
            "INSERT INTO {} ({}, {}) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            link.table, link.owner_column, link.target_column
        );
        for &target_id in target_ids {
            sqlx::query(&insert)
                .bind(owner_id)
                .bind(target_id)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }

    /// Target ids linked to one owner, ascending.
    pub async fn ids_for<'e, E: PgExecutor<'e>>(
        executor: E,
        link: LinkTable,
        owner_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!(
            "SELECT {target} FROM {table} WHERE {owner} = $1 ORDER BY {target}",
            target = link.target_column,
            table = link.table,
            owner = link.owner_column,
        );
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(owner_id)
            .fetch_all(executor)
            .await
    }

    /// Every `(owner_id, target_id)` pair whose owner belongs to `project_id`.
    pub async fn pairs_for_project<'e, E: PgExecutor<'e>>(
        executor: E,
        link: LinkTable,
        project_id: DbId,
    ) -> Result<Vec<(DbId, DbId)>, sqlx::Error> {
        let query = format!(
            "SELECT l.{owner}, l.{target} FROM {table} l \
             JOIN {owner_table} o ON o.id = l.{owner} \
             WHERE o.project_id = $1 \
             ORDER BY l.{owner}, l.{target}",
            owner = link.owner_column,
            target = link.target_column,
            table = link.table,
            owner_table = link.owner_table,
        );
        sqlx::query_as::<_, (DbId, DbId)>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    /// Links of every owner in the project, grouped by owner.
    pub async fn grouped_for_project<'e, E: PgExecutor<'e>>(
        executor: E,
        link: LinkTable,
        project_id: DbId,
    ) -> Result<HashMap<DbId, Vec<DbId>>, sqlx::Error> {
        Ok(group_links(
            Self::pairs_for_project(executor, link, project_id).await?,
        ))
    }

    /// Ids from `ids` that are not rows of `table` in `project_id`.
    ///
    /// `table` must be one of the project-scoped entity tables.
    pub async fn missing_in_project(
        pool: &PgPool,
        table: &'static str,
        project_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT id FROM {table} WHERE project_id = $1 AND id = ANY($2)");
        let found: Vec<DbId> = sqlx::query_scalar::<_, DbId>(&query)
            .bind(project_id)
            .bind(ids)
            .fetch_all(pool)
            .await?;
        let mut missing: Vec<DbId> = ids.iter().copied().filter(|id| !found.contains(id)).collect();
        missing.sort_unstable();
        missing.dedup();
        Ok(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_links_keeps_pair_order() {
        let grouped = group_links(vec![(1, 10), (2, 20), (1, 11)]);
        assert_eq!(grouped[&1], vec![10, 11]);
        assert_eq!(grouped[&2], vec![20]);
        assert!(!grouped.contains_key(&3));
    }
}
