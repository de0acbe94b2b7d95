use ::common::storage::ObjectStore;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

use crate::common::{TestApp, routes};

mod save_image {
    use super::*;

    #[tokio::test]
    async fn base64_payload_round_trips_through_storage() {
        let app = TestApp::spawn().await;
        let project_id = app.create_project("Round Trip").await;

        let original = b"painted-pixels".to_vec();
        let res = app
            .post_json(
                routes::IMAGES_SAVE,
                &json!({
                    "image_data": BASE64.encode(&original),
                    "project_id": project_id,
                    "prompt": "a robot painting a canvas",
                }),
            )
            .await;

        assert_eq!(res.status, 201, "save failed: {:?}", res.body);
        let key = res.body["key"].as_str().unwrap();

        // The stored bytes equal the decoded payload.
        let stored = app.store.get(key).await.unwrap();
        assert_eq!(stored, original);

        // The returned URL is a signed capability, not the key itself.
        let url = res.body["image_url"].as_str().unwrap();
        assert!(url.contains(key));
        assert_ne!(url, key);
    }

    #[tokio::test]
    async fn saved_asset_is_visible_under_the_project() {
        let app = TestApp::spawn().await;
        let project_id = app.create_project("With Asset").await;

        let res = app
            .post_json(
                routes::IMAGES_SAVE,
                &json!({
                    "image_data": BASE64.encode(b"img"),
                    "project_id": project_id,
                    "prompt": "p",
                    "model_type": "speed",
                    "context_version": "v1",
                }),
            )
            .await;
        let asset_id = res.body["asset_id"].as_i64().unwrap() as i32;

        let asset = app.get(&routes::asset(asset_id)).await;
        assert_eq!(asset.status, 200);
        assert_eq!(asset.body["type"], "image");
        assert_eq!(asset.body["project_id"], project_id);
        assert_eq!(asset.body["model_type"], "speed");

        let listing = app.get(&routes::project_assets(project_id)).await;
        assert_eq!(listing.body["total"], 1);
    }

    #[tokio::test]
    async fn missing_payload_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let project_id = app.create_project("No Payload").await;

        let res = app
            .post_json(routes::IMAGES_SAVE, &json!({"project_id": project_id}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_project_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::IMAGES_SAVE,
                &json!({
                    "image_data": BASE64.encode(b"img"),
                    "project_id": 987_654,
                }),
            )
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn generation_does_not_create_assets_implicitly() {
        let app = TestApp::spawn().await;
        let project_id = app.create_project("Explicit Saves Only").await;

        // Simulate the client having generated but not saved anything.
        let listing = app.get(&routes::project_assets(project_id)).await;
        assert_eq!(listing.body["total"], 0);
    }
}

mod save_video {
    use super::*;

    #[tokio::test]
    async fn records_an_existing_storage_key() {
        let app = TestApp::spawn().await;
        let project_id = app.create_project("Video Home").await;
        app.store
            .put("generated_videos/abc.mp4", b"movie", "video/mp4")
            .await
            .unwrap();

        let res = app
            .post_json(
                routes::VIDEOS_SAVE,
                &json!({
                    "project_id": project_id,
                    "key": "generated_videos/abc.mp4",
                    "prompt": "a calm ocean",
                }),
            )
            .await;

        assert_eq!(res.status, 201, "save failed: {:?}", res.body);
        let asset_id = res.body["asset_id"].as_i64().unwrap() as i32;

        let asset = app.get(&routes::asset(asset_id)).await;
        assert_eq!(asset.body["type"], "video");
        assert!(
            asset.body["url"]
                .as_str()
                .unwrap()
                .contains("generated_videos/abc.mp4")
        );
    }
}

mod delete_asset {
    use super::*;

    #[tokio::test]
    async fn delete_then_fetch_is_not_found() {
        let app = TestApp::spawn().await;
        let project_id = app.create_project("Deletions").await;

        let res = app
            .post_json(
                routes::IMAGES_SAVE,
                &json!({
                    "image_data": BASE64.encode(b"soon gone"),
                    "project_id": project_id,
                }),
            )
            .await;
        let asset_id = res.body["asset_id"].as_i64().unwrap() as i32;

        assert_eq!(app.delete(&routes::asset(asset_id)).await.status, 204);
        assert_eq!(app.get(&routes::asset(asset_id)).await.status, 404);
    }

    #[tokio::test]
    async fn deleting_a_missing_asset_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.delete(&routes::asset(555_555)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
