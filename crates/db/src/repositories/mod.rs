//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Child repositories are
//! always scoped by `project_id`.

pub mod attribute_repo;
pub mod chapter_repo;
pub mod character_repo;
pub mod context_repo;
pub mod links;
pub mod organization_repo;
pub mod place_repo;
pub mod plot_point_repo;
pub mod project_repo;
pub mod relationship_repo;
pub mod research_note_repo;

pub use attribute_repo::AttributeRepo;
pub use chapter_repo::ChapterRepo;
pub use character_repo::CharacterRepo;
pub use context_repo::ContextRepo;
pub use links::LinkRepo;
pub use organization_repo::OrganizationRepo;
pub use place_repo::PlaceRepo;
pub use plot_point_repo::PlotPointRepo;
pub use project_repo::ProjectRepo;
pub use relationship_repo::RelationshipRepo;
pub use research_note_repo::ResearchNoteRepo;
