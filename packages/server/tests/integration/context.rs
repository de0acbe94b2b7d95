use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn version_lifecycle() {
    let app = TestApp::spawn().await;
    let project_id = app.create_project("Context Home").await;

    // Create a snapshot.
    let res = app
        .post_json(
            routes::CONTEXT_VERSIONS,
            &json!({
                "project_id": project_id,
                "name": "Launch look",
                "brand_vibe": "warm and tactile",
                "context": "Overall guidelines",
            }),
        )
        .await;
    assert_eq!(res.status, 201, "create failed: {:?}", res.body);
    let version_id = res.body["id"].as_i64().unwrap() as i32;
    assert_eq!(res.body["brand_vibe"], "warm and tactile");

    // Listed under the project, newest first.
    let listing = app.get(&routes::context_versions_of(project_id)).await;
    assert_eq!(listing.status, 200);
    assert_eq!(listing.body[0]["id"], version_id);

    // Read back by id.
    let detail = app.get(&routes::context_version_detail(version_id)).await;
    assert_eq!(detail.status, 200);
    assert_eq!(detail.body["name"], "Launch look");

    // In-place update only touches supplied fields.
    let updated = app
        .put_json(
            &routes::context_version(version_id),
            &json!({"project_lighting": "soft window light"}),
        )
        .await;
    assert_eq!(updated.status, 200);
    assert_eq!(updated.body["project_lighting"], "soft window light");
    assert_eq!(updated.body["brand_vibe"], "warm and tactile");

    // Delete, then reads fail.
    assert_eq!(
        app.delete(&routes::context_version(version_id)).await.status,
        204
    );
    assert_eq!(
        app.get(&routes::context_version_detail(version_id))
            .await
            .status,
        404
    );
}

#[tokio::test]
async fn create_requires_an_existing_project() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(
            routes::CONTEXT_VERSIONS,
            &json!({"project_id": 31_337, "name": "Orphan"}),
        )
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn versions_survive_project_asset_cascade() {
    // Project delete cascades to assets only; versions are managed
    // independently, so a deleted project leaves its versions orphan-free
    // to delete individually.
    let app = TestApp::spawn().await;
    let project_id = app.create_project("Cascade Check").await;

    let res = app
        .post_json(
            routes::CONTEXT_VERSIONS,
            &json!({"project_id": project_id, "name": "Kept"}),
        )
        .await;
    let version_id = res.body["id"].as_i64().unwrap() as i32;

    app.delete(&routes::context_version(version_id)).await;
    let res = app.delete(&routes::context_version(version_id)).await;
    assert_eq!(res.status, 404);
}
