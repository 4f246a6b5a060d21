//! Eager loader for the project context aggregate.

use sqlx::PgPool;
use storyforge_core::context::ProjectAggregate;
use storyforge_core::types::DbId;

use crate::repositories::{
    AttributeRepo, ChapterRepo, CharacterRepo, OrganizationRepo, PlaceRepo, PlotPointRepo,
    ProjectRepo, RelationshipRepo, ResearchNoteRepo,
};

/// Must be the first statement of the transaction.
const SNAPSHOT_ISOLATION: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

/// Loads everything the context builder needs in one pass.
pub struct ContextRepo;

impl ContextRepo {
    /// Load a project and all of its children, one query per relation.
    ///
    /// All reads share one repeatable-read snapshot, so a concurrent write
    /// cannot leave a link pointing at a row the loader never saw.
    /// Returns `None` if the project does not exist.
    pub async fn load_aggregate(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<ProjectAggregate>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query(SNAPSHOT_ISOLATION).execute(&mut *tx).await?;

        let Some(project) = ProjectRepo::find_by_id(&mut *tx, project_id).await? else {
            return Ok(None);
        };

        let characters = CharacterRepo::list_by_project(&mut *tx, project_id).await?;
        let relationships = RelationshipRepo::list_by_project(&mut *tx, project_id).await?;
        let places = PlaceRepo::list_by_project(&mut *tx, project_id).await?;
        let organizations = OrganizationRepo::list_by_project(&mut *tx, project_id).await?;
        let chapters = ChapterRepo::list_by_project(&mut *tx, project_id).await?;
        let plot_points = PlotPointRepo::list_by_project(&mut *tx, project_id).await?;
        let research_notes = ResearchNoteRepo::list_by_project(&mut *tx, project_id).await?;
        let custom_attributes =
            AttributeRepo::named_values_for_project(&mut *tx, project_id).await?;

        tx.commit().await?;

        tracing::debug!(
            project_id,
            characters = characters.len(),
            places = places.len(),
            organizations = organizations.len(),
            chapters = chapters.len(),
            plot_points = plot_points.len(),
            research_notes = research_notes.len(),
            "Loaded project aggregate",
        );

        Ok(Some(ProjectAggregate {
            project: project.into(),
            characters: characters.into_iter().map(Into::into).collect(),
            relationships: relationships.into_iter().map(Into::into).collect(),
            places: places.into_iter().map(Into::into).collect(),
            organizations: organizations.into_iter().map(Into::into).collect(),
            chapters: chapters.into_iter().map(Into::into).collect(),
            plot_points: plot_points.into_iter().map(Into::into).collect(),
            research_notes: research_notes.into_iter().map(Into::into).collect(),
            custom_attributes: custom_attributes.into_iter().map(Into::into).collect(),
        }))
    }
}
