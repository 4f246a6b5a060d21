//! HTTP-level integration tests for the project and entity endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_id, delete, get, post_file, post_json, post_raw, put_json};
use serde_json::json;
use sqlx::PgPool;

async fn create_project(pool: &PgPool, name: &str) -> i64 {
    create_id(
        common::build_test_app(pool.clone()),
        "/api/v1/projects",
        json!({"name": name}),
    )
    .await
}

// ---------------------------------------------------------------------------
// Project CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_project_returns_201(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/projects",
        json!({"name": "Tides", "key_themes": "loss, the sea"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Tides");
    assert_eq!(json["key_themes"], "loss, the sea");
    assert!(json["id"].is_number());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_then_get_project(pool: PgPool) {
    let id = create_project(&pool, "Original").await;

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{id}"),
        json!({"genre": "Literary"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(common::build_test_app(pool), &format!("/api/v1/projects/{id}")).await).await;
    assert_eq!(json["name"], "Original");
    assert_eq!(json["genre"], "Literary");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_nonexistent_project_returns_404(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/projects/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_project_name_is_rejected(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/projects",
        json!({"name": ""}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_returns_400(pool: PgPool) {
    let response = post_raw(common::build_test_app(pool), "/api/v1/projects", "{\"name\":").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_project_cascades_to_children(pool: PgPool) {
    let project_id = create_project(&pool, "Doomed").await;
    let character_id = create_id(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/characters"),
        json!({"name": "Mara"}),
    )
    .await;

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM characters WHERE id = $1")
        .bind(character_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_project_removes_its_attachment_directory(pool: PgPool) {
    let media_root = tempfile::tempdir().unwrap();
    let app = || common::build_test_app_with_media(pool.clone(), media_root.path().to_path_buf());

    let project_id = create_project(&pool, "Archive").await;
    let other_id = create_project(&pool, "Neighbour").await;
    let mut stored = Vec::new();
    for id in [project_id, other_id] {
        let note_id = create_id(
            app(),
            &format!("/api/v1/projects/{id}/research-notes"),
            json!({"title": "Harbour map"}),
        )
        .await;
        let response = post_file(
            app(),
            &format!("/api/v1/projects/{id}/research-notes/{note_id}/file"),
            "map.txt",
            b"north",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let path = body_json(response).await["file_path"]
            .as_str()
            .unwrap()
            .to_string();
        stored.push(media_root.path().join(path));
    }
    let project_dir = media_root.path().join(project_id.to_string());
    assert!(stored[0].exists());
    assert!(project_dir.is_dir());

    let response = delete(app(), &format!("/api/v1/projects/{project_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(!project_dir.exists());
    assert!(stored[1].exists());
}

// ---------------------------------------------------------------------------
// Characters and relationships
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn character_crud_is_scoped_to_project(pool: PgPool) {
    let project_id = create_project(&pool, "Tides").await;
    let other_project = create_project(&pool, "Other").await;
    let id = create_id(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/characters"),
        json!({"name": "Mara", "traits": "Brave; Loyal"}),
    )
    .await;

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{other_project}/characters/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/characters/{id}"),
        json!({"role": "Protagonist"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["role"], "Protagonist");
    assert_eq!(json["traits"], "Brave; Loyal");

    let list = body_json(
        get(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/projects/{project_id}/characters"),
        )
        .await,
    )
    .await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/characters/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete(
        common::build_test_app(pool),
        &format!("/api/v1/projects/{project_id}/characters/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn characters_of_missing_project_return_404(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/projects/424242/characters",
        json!({"name": "Nobody"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn relationship_rules(pool: PgPool) {
    let project_id = create_project(&pool, "Tides").await;
    let other_project = create_project(&pool, "Other").await;
    let characters = format!("/api/v1/projects/{project_id}/characters");
    let a = create_id(common::build_test_app(pool.clone()), &characters, json!({"name": "A"})).await;
    let b = create_id(common::build_test_app(pool.clone()), &characters, json!({"name": "B"})).await;
    let stranger = create_id(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{other_project}/characters"),
        json!({"name": "Stranger"}),
    )
    .await;
    let relationships = format!("/api/v1/projects/{project_id}/relationships");

    let response = post_json(
        common::build_test_app(pool.clone()),
        &relationships,
        json!({"from_character_id": a, "to_character_id": b, "description": "rivals"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let rel_id = body_json(response).await["id"].as_i64().unwrap();

    // Same ordered pair again.
    let response = post_json(
        common::build_test_app(pool.clone()),
        &relationships,
        json!({"from_character_id": a, "to_character_id": b}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The reverse direction is a different edge.
    let response = post_json(
        common::build_test_app(pool.clone()),
        &relationships,
        json!({"from_character_id": b, "to_character_id": a}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        common::build_test_app(pool.clone()),
        &relationships,
        json!({"from_character_id": a, "to_character_id": a}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        common::build_test_app(pool.clone()),
        &relationships,
        json!({"from_character_id": a, "to_character_id": stranger}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("{relationships}/{rel_id}"),
        json!({"description": "bitter rivals"}),
    )
    .await;
    assert_eq!(body_json(response).await["description"], "bitter rivals");

    let response = delete(common::build_test_app(pool), &format!("{relationships}/{rel_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Linked entities
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn place_links_are_replaced_on_update(pool: PgPool) {
    let project_id = create_project(&pool, "Tides").await;
    let characters = format!("/api/v1/projects/{project_id}/characters");
    let a = create_id(common::build_test_app(pool.clone()), &characters, json!({"name": "A"})).await;
    let b = create_id(common::build_test_app(pool.clone()), &characters, json!({"name": "B"})).await;
    let places = format!("/api/v1/projects/{project_id}/places");

    let response = post_json(
        common::build_test_app(pool.clone()),
        &places,
        json!({"name": "Harbour", "type": "Town", "character_ids": [a, a]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["type"], "Town");
    assert_eq!(json["character_ids"], json!([a]));
    let place_id = json["id"].as_i64().unwrap();

    // Without character_ids the links stay.
    let json = body_json(
        put_json(
            common::build_test_app(pool.clone()),
            &format!("{places}/{place_id}"),
            json!({"summary": "Grey stone quays"}),
        )
        .await,
    )
    .await;
    assert_eq!(json["character_ids"], json!([a]));

    let json = body_json(
        put_json(
            common::build_test_app(pool.clone()),
            &format!("{places}/{place_id}"),
            json!({"character_ids": [b]}),
        )
        .await,
    )
    .await;
    assert_eq!(json["character_ids"], json!([b]));

    let json = body_json(put_json(
        common::build_test_app(pool),
        &format!("{places}/{place_id}"),
        json!({"character_ids": []}),
    )
    .await)
    .await;
    assert_eq!(json["character_ids"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn links_to_other_projects_are_rejected(pool: PgPool) {
    let project_id = create_project(&pool, "Tides").await;
    let other_project = create_project(&pool, "Other").await;
    let foreign_place = create_id(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{other_project}/places"),
        json!({"name": "Elsewhere"}),
    )
    .await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/organizations"),
        json!({"name": "Guild", "place_ids": [foreign_place]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        common::build_test_app(pool),
        &format!("/api/v1/projects/{project_id}/chapters"),
        json!({"title": "One", "point_of_view_id": 999999}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn chapter_delete_clears_plot_point_chapter(pool: PgPool) {
    let project_id = create_project(&pool, "Tides").await;
    let chapter_id = create_id(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/chapters"),
        json!({"title": "Low Tide"}),
    )
    .await;
    let plot_points = format!("/api/v1/projects/{project_id}/plot-points");
    let response = post_json(
        common::build_test_app(pool.clone()),
        &plot_points,
        json!({"title": "The wreck", "order": 2, "chapter_id": chapter_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["order"], 2);
    assert_eq!(json["chapter_id"], chapter_id);
    let plot_point_id = json["id"].as_i64().unwrap();

    let chapter = body_json(
        get(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/projects/{project_id}/chapters/{chapter_id}"),
        )
        .await,
    )
    .await;
    assert_eq!(chapter["chapter_number"], 1);

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/chapters/{chapter_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(
        get(
            common::build_test_app(pool),
            &format!("{plot_points}/{plot_point_id}"),
        )
        .await,
    )
    .await;
    assert!(json["chapter_id"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn null_point_of_view_clears_it_and_absent_keeps_it(pool: PgPool) {
    let project_id = create_project(&pool, "Tides").await;
    let mara = create_id(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/characters"),
        json!({"name": "Mara"}),
    )
    .await;
    let chapter_id = create_id(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/chapters"),
        json!({"title": "Low Tide", "point_of_view_id": mara}),
    )
    .await;
    let uri = format!("/api/v1/projects/{project_id}/chapters/{chapter_id}");

    let response = put_json(
        common::build_test_app(pool.clone()),
        &uri,
        json!({"title": "Slack Tide"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["point_of_view_id"], mara);

    let response = put_json(
        common::build_test_app(pool.clone()),
        &uri,
        json!({"point_of_view_id": null}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["point_of_view_id"].is_null());
    assert_eq!(json["title"], "Slack Tide");

    let json = body_json(get(common::build_test_app(pool), &uri).await).await;
    assert!(json["point_of_view_id"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn null_chapter_detaches_plot_point(pool: PgPool) {
    let project_id = create_project(&pool, "Tides").await;
    let chapter_id = create_id(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/chapters"),
        json!({"title": "Low Tide"}),
    )
    .await;
    let plot_point_id = create_id(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/plot-points"),
        json!({"title": "The wreck", "chapter_id": chapter_id}),
    )
    .await;
    let uri = format!("/api/v1/projects/{project_id}/plot-points/{plot_point_id}");

    let response = put_json(common::build_test_app(pool.clone()), &uri, json!({"order": 4})).await;
    assert_eq!(body_json(response).await["chapter_id"], chapter_id);

    let response = put_json(
        common::build_test_app(pool.clone()),
        &uri,
        json!({"chapter_id": null}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["chapter_id"].is_null());
    assert_eq!(json["order"], 4);

    let json = body_json(get(common::build_test_app(pool), &uri).await).await;
    assert!(json["chapter_id"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn chapter_assigns_and_releases_plot_points(pool: PgPool) {
    let project_id = create_project(&pool, "Tides").await;
    let plot_points = format!("/api/v1/projects/{project_id}/plot-points");
    let mut ids = Vec::new();
    for (title, order) in [("Storm", 2), ("Wreck", 1), ("Rescue", 3)] {
        ids.push(
            create_id(
                common::build_test_app(pool.clone()),
                &plot_points,
                json!({"title": title, "order": order}),
            )
            .await,
        );
    }
    let (storm, wreck, rescue) = (ids[0], ids[1], ids[2]);

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/chapters"),
        json!({"title": "Low Tide", "plot_point_ids": [storm, wreck]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["plot_point_ids"], json!([wreck, storm]));
    let chapter_id = json["id"].as_i64().unwrap();
    let uri = format!("/api/v1/projects/{project_id}/chapters/{chapter_id}");

    let response = put_json(
        common::build_test_app(pool.clone()),
        &uri,
        json!({"plot_point_ids": [wreck, rescue]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["plot_point_ids"], json!([wreck, rescue]));

    let json = body_json(
        get(common::build_test_app(pool.clone()), &format!("{plot_points}/{storm}")).await,
    )
    .await;
    assert!(json["chapter_id"].is_null());
    let json = body_json(
        get(common::build_test_app(pool.clone()), &format!("{plot_points}/{rescue}")).await,
    )
    .await;
    assert_eq!(json["chapter_id"], chapter_id);

    // Omitting the list leaves assignments alone.
    let response = put_json(
        common::build_test_app(pool.clone()),
        &uri,
        json!({"title": "High Tide"}),
    )
    .await;
    assert_eq!(body_json(response).await["plot_point_ids"], json!([wreck, rescue]));

    let other_project = create_project(&pool, "Elsewhere").await;
    let foreign = create_id(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{other_project}/plot-points"),
        json!({"title": "Foreign"}),
    )
    .await;
    let response = put_json(
        common::build_test_app(pool),
        &uri,
        json!({"plot_point_ids": [foreign]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn plot_points_list_in_story_order(pool: PgPool) {
    let project_id = create_project(&pool, "Tides").await;
    let plot_points = format!("/api/v1/projects/{project_id}/plot-points");
    for (title, order) in [("Third", 3), ("First", 1), ("Also first", 1)] {
        create_id(
            common::build_test_app(pool.clone()),
            &plot_points,
            json!({"title": title, "order": order}),
        )
        .await;
    }

    let list = body_json(get(common::build_test_app(pool), &plot_points).await).await;
    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["First", "Also first", "Third"]);
}

// ---------------------------------------------------------------------------
// Custom attributes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn attribute_definitions_and_values(pool: PgPool) {
    let project_id = create_project(&pool, "Tides").await;
    let character_id = create_id(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/characters"),
        json!({"name": "Mara"}),
    )
    .await;
    let attributes = format!("/api/v1/projects/{project_id}/attributes");

    let attribute_id = create_id(
        common::build_test_app(pool.clone()),
        &attributes,
        json!({"name": "favourite_weapon", "scope": "character"}),
    )
    .await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        &attributes,
        json!({"name": "favourite_weapon", "scope": "character"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json(
        common::build_test_app(pool.clone()),
        &attributes,
        json!({"name": "characters", "scope": "project"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        common::build_test_app(pool.clone()),
        &attributes,
        json!({"name": "Bad Name", "scope": "character"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let values = format!("{attributes}/{attribute_id}/values");
    let response = put_json(
        common::build_test_app(pool.clone()),
        &values,
        json!({"value": "harpoon"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(
        common::build_test_app(pool.clone()),
        &values,
        json!({"entity_id": character_id, "value": "harpoon"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["value"], "harpoon");

    let response = put_json(
        common::build_test_app(pool.clone()),
        &values,
        json!({"entity_id": character_id, "value": "net"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let list = body_json(get(common::build_test_app(pool.clone()), &values).await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["value"], "net");

    let response = put_json(
        common::build_test_app(pool.clone()),
        &values,
        json!({"entity_id": character_id, "value": "  "}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let list = body_json(get(common::build_test_app(pool), &values).await).await;
    assert!(list.as_array().unwrap().is_empty());
}
