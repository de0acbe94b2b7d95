use ::common::storage::ObjectStore;
use serde_json::json;

use crate::common::{TestApp, routes};

mod project_crud {
    use super::*;

    #[tokio::test]
    async fn create_returns_the_new_project() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::PROJECTS,
                &json!({
                    "name": "Test Project",
                    "description": "A test project for verification",
                    "context": "Fashion context",
                    "brand_vibe": "minimal",
                }),
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["name"], "Test Project");
        assert_eq!(res.body["brand_vibe"], "minimal");
        assert!(res.body["id"].is_number());
        assert!(res.body["created_at"].is_string());
        assert_eq!(res.body["assets"], json!([]));
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.post_json(routes::PROJECTS, &json!({"name": "  "})).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn created_project_appears_in_list() {
        let app = TestApp::spawn().await;
        let id = app.create_project("Listed Project").await;

        let res = app.get(routes::PROJECTS).await;

        assert_eq!(res.status, 200);
        let found = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p["id"] == id);
        assert!(found, "created project missing from list: {:?}", res.body);
    }

    #[tokio::test]
    async fn get_missing_project_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::project(999_999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn update_replaces_descriptor_fields() {
        let app = TestApp::spawn().await;
        let id = app.create_project("Before").await;

        let res = app
            .put_json(
                &routes::project(id),
                &json!({
                    "name": "After",
                    "project_lighting": "golden hour",
                }),
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "After");
        assert_eq!(res.body["project_lighting"], "golden hour");
        // PUT semantics: fields not supplied are cleared.
        assert!(res.body["description"].is_null());
    }
}

mod cascade_delete {
    use super::*;

    async fn insert_asset(app: &TestApp, project_id: i32, key: &str) -> i32 {
        use sea_orm::{ActiveModelTrait, Set};
        use server::entity::asset;

        let model = asset::ActiveModel {
            project_id: Set(project_id),
            kind: Set("image".into()),
            storage_key: Set(key.to_string()),
            prompt: Set(Some("a prompt".into())),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };
        model.insert(&app.db).await.expect("insert asset").id
    }

    #[tokio::test]
    async fn deleting_a_project_deletes_its_assets() {
        let app = TestApp::spawn().await;
        let project_id = app.create_project("Test Project").await;
        app.store
            .put("known-key.png", b"bytes", "image/png")
            .await
            .unwrap();
        let asset_id = insert_asset(&app, project_id, "known-key.png").await;

        let res = app.delete(&routes::project(project_id)).await;
        assert_eq!(res.status, 204);

        // Both the project's asset listing and the asset itself are gone.
        let assets = app.get(&routes::project_assets(project_id)).await;
        assert_eq!(assets.status, 404);

        let asset = app.get(&routes::asset(asset_id)).await;
        assert_eq!(asset.status, 404);
        assert_eq!(asset.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn sibling_projects_are_untouched() {
        let app = TestApp::spawn().await;
        let doomed = app.create_project("Doomed").await;
        let survivor = app.create_project("Survivor").await;
        insert_asset(&app, doomed, "doomed.png").await;
        let kept_asset = insert_asset(&app, survivor, "kept.png").await;

        app.delete(&routes::project(doomed)).await;

        let res = app.get(&routes::project_assets(survivor)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["total"], 1);
        assert_eq!(res.body["assets"][0]["id"], kept_asset);
    }

    #[tokio::test]
    async fn delete_missing_project_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.delete(&routes::project(424_242)).await;

        assert_eq!(res.status, 404);
    }
}
