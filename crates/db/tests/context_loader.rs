//! The aggregate loader feeds the context builder a consistent snapshot.

use serde_json::json;
use sqlx::PgPool;
use storyforge_core::context::{build_context, AttributeOwner, ContextOptions};
use storyforge_db::models::attribute::CreateCustomAttribute;
use storyforge_db::models::chapter::CreateChapter;
use storyforge_db::models::character::CreateCharacter;
use storyforge_db::models::organization::CreateOrganization;
use storyforge_db::models::place::CreatePlace;
use storyforge_db::models::plot_point::CreatePlotPoint;
use storyforge_db::models::project::CreateProject;
use storyforge_db::models::relationship::CreateRelationship;
use storyforge_db::models::research_note::CreateResearchNote;
use storyforge_db::repositories::{
    AttributeRepo, ChapterRepo, CharacterRepo, ContextRepo, OrganizationRepo, PlaceRepo,
    PlotPointRepo, ProjectRepo, RelationshipRepo, ResearchNoteRepo,
};

fn new_character(name: &str, traits: Option<&str>) -> CreateCharacter {
    CreateCharacter {
        name: name.to_string(),
        traits: traits.map(str::to_string),
        ..Default::default()
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_project_loads_nothing(pool: PgPool) {
    assert!(ContextRepo::load_aggregate(&pool, 4242)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_loaded_aggregate_builds_full_context(pool: PgPool) {
    let project = ProjectRepo::create(
        &pool,
        &CreateProject {
            name: "Tides".to_string(),
            description: None,
            core_premise: Some("A diver finds a wreck.".to_string()),
            key_themes: Some("loss, the sea".to_string()),
            genre: None,
            style: None,
            owner_id: None,
        },
    )
    .await
    .unwrap();
    let pid = project.id;

    let mara = CharacterRepo::create(&pool, pid, &new_character("Mara", Some("Brave; Loyal; ")))
        .await
        .unwrap();
    let ines = CharacterRepo::create(&pool, pid, &new_character("Ines", None))
        .await
        .unwrap();
    RelationshipRepo::create(
        &pool,
        pid,
        &CreateRelationship {
            from_character_id: mara.id,
            to_character_id: ines.id,
            description: Some("rivals".to_string()),
        },
    )
    .await
    .unwrap();

    let harbor = PlaceRepo::create(
        &pool,
        pid,
        &CreatePlace {
            name: "Harbor".to_string(),
            place_type: Some("Town".to_string()),
            character_ids: vec![mara.id, ines.id],
            ..Default::default()
        },
    )
    .await
    .unwrap();
    OrganizationRepo::create(
        &pool,
        pid,
        &CreateOrganization {
            name: "Salvage Guild".to_string(),
            place_ids: vec![harbor.place.id],
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let chapter = ChapterRepo::create(
        &pool,
        pid,
        &CreateChapter {
            title: "Low Tide".to_string(),
            point_of_view_id: Some(mara.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    PlotPointRepo::create(
        &pool,
        pid,
        &CreatePlotPoint {
            title: "The wreck".to_string(),
            chapter_id: Some(chapter.chapter.id),
            character_ids: vec![mara.id],
            ..Default::default()
        },
    )
    .await
    .unwrap();
    ResearchNoteRepo::create(
        &pool,
        pid,
        &CreateResearchNote {
            title: "Diving tables".to_string(),
            content: None,
            tags: Some("diving,safety".to_string()),
        },
    )
    .await
    .unwrap();
    let alias = AttributeRepo::create(
        &pool,
        pid,
        &CreateCustomAttribute {
            name: "alias".to_string(),
            scope: "character".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    AttributeRepo::set_value(&pool, alias.id, AttributeOwner::Character(mara.id), "The Eel")
        .await
        .unwrap();

    let aggregate = ContextRepo::load_aggregate(&pool, pid)
        .await
        .unwrap()
        .unwrap();
    let context = build_context(&aggregate, &ContextOptions::default()).unwrap();
    let record = &context.structured_record["project"];

    assert_eq!(record["name"], "Tides");
    assert_eq!(record["key_themes"], json!(["loss", "the sea"]));
    assert!(record.get("description").is_none());

    let characters = record["characters"].as_array().unwrap();
    assert_eq!(characters[0]["name"], "Ines");
    assert!(characters[0].get("relationships").is_none());
    assert_eq!(characters[1]["name"], "Mara");
    assert_eq!(characters[1]["traits"], json!(["Brave", "Loyal"]));
    assert_eq!(characters[1]["alias"], "The Eel");
    assert_eq!(
        characters[1]["relationships"],
        json!([{"to_character": "Ines", "description": "rivals"}])
    );

    assert_eq!(record["places"][0]["type"], "Town");
    assert_eq!(record["places"][0]["characters"], json!(["Ines", "Mara"]));
    assert_eq!(record["organizations"][0]["places"], json!(["Harbor"]));
    assert_eq!(record["chapters"][0]["point_of_view"], "Mara");
    assert_eq!(record["plot_points"][0]["chapter_title"], "Low Tide");
    assert_eq!(record["research_notes"][0]["tags"], json!(["diving", "safety"]));

    let again = build_context(&aggregate, &ContextOptions::default()).unwrap();
    assert_eq!(context.text_block, again.text_block);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_readers_see_one_snapshot_inside_a_transaction(pool: PgPool) {
    let project = ProjectRepo::create(
        &pool,
        &CreateProject {
            name: "Snapshot".to_string(),
            description: None,
            core_premise: None,
            key_themes: None,
            genre: None,
            style: None,
            owner_id: None,
        },
    )
    .await
    .unwrap();
    let pid = project.id;
    let mara = CharacterRepo::create(&pool, pid, &new_character("Mara", None))
        .await
        .unwrap();
    PlaceRepo::create(
        &pool,
        pid,
        &CreatePlace {
            name: "Harbour".to_string(),
            character_ids: vec![mara.id],
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let mut tx = pool.begin().await.unwrap();
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await
        .unwrap();
    let characters = CharacterRepo::list_by_project(&mut *tx, pid).await.unwrap();
    assert_eq!(characters.len(), 1);

    // Committed on another connection after the snapshot was taken.
    assert!(CharacterRepo::delete(&pool, pid, mara.id).await.unwrap());

    let places = PlaceRepo::list_by_project(&mut *tx, pid).await.unwrap();
    assert_eq!(places[0].character_ids, vec![mara.id]);
    tx.commit().await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let places = PlaceRepo::list_by_project(&mut conn, pid).await.unwrap();
    assert!(places[0].character_ids.is_empty());

    let aggregate = ContextRepo::load_aggregate(&pool, pid).await.unwrap().unwrap();
    assert!(aggregate.characters.is_empty());
    assert!(aggregate.places[0].character_ids.is_empty());
}
