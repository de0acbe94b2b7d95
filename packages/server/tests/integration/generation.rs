use std::sync::atomic::Ordering;

use ::common::storage::ObjectStore;
use reqwest::multipart::Form;
use serde_json::json;

use crate::common::{
    MOCK_IMAGE_BYTES, MOCK_VIDEO_BYTES, MockProvider, PROVIDER_ERROR_MESSAGE, ProviderScript,
    TestApp, routes,
};

mod image_generation {
    use super::*;

    #[tokio::test]
    async fn generated_images_land_in_storage_with_signed_urls() {
        let provider = MockProvider::spawn(ProviderScript::InlineImage).await;
        let app = TestApp::spawn_with_provider(&provider.endpoint).await;

        let form = Form::new().text("prompt", "a robot painting").text("num_images", "2");
        let res = app.post_multipart(routes::IMAGES_GENERATE, form).await;

        assert_eq!(res.status, 200, "generate failed: {:?}", res.body);
        let images = res.body["images"].as_array().unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(provider.generate_calls.load(Ordering::SeqCst), 2);

        for image in images {
            let key = image["key"].as_str().unwrap();
            assert_eq!(app.store.get(key).await.unwrap(), MOCK_IMAGE_BYTES);
            let url = image["url"].as_str().unwrap();
            assert!(url.contains(key));
            assert_ne!(url, key);
        }
    }

    #[tokio::test]
    async fn missing_prompt_is_rejected_without_calling_the_provider() {
        let provider = MockProvider::spawn(ProviderScript::InlineImage).await;
        let app = TestApp::spawn_with_provider(&provider.endpoint).await;

        let form = Form::new().text("num_images", "1");
        let res = app.post_multipart(routes::IMAGES_GENERATE, form).await;

        assert_eq!(res.status, 400);
        assert_eq!(provider.generate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn one_failed_generation_fails_the_whole_batch() {
        let provider = MockProvider::spawn(ProviderScript::FailNthGenerate(2)).await;
        let app = TestApp::spawn_with_provider(&provider.endpoint).await;

        let form = Form::new().text("prompt", "three please").text("num_images", "3");
        let res = app.post_multipart(routes::IMAGES_GENERATE, form).await;

        // All-or-nothing: the second failure aborts the call.
        assert_eq!(res.status, 502);
        assert_eq!(res.body["code"], "PROVIDER_ERROR");
        assert_eq!(provider.generate_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn oversized_batch_is_rejected() {
        let provider = MockProvider::spawn(ProviderScript::InlineImage).await;
        let app = TestApp::spawn_with_provider(&provider.endpoint).await;

        let form = Form::new().text("prompt", "p").text("num_images", "9");
        let res = app.post_multipart(routes::IMAGES_GENERATE, form).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod video_generation {
    use super::*;

    #[tokio::test]
    async fn batch_of_three_runs_three_concurrent_jobs() {
        let provider = MockProvider::spawn(ProviderScript::VideoSuccess).await;
        let app = TestApp::spawn_with_provider(&provider.endpoint).await;

        let res = app
            .post_json(
                routes::VIDEOS_GENERATE,
                &json!({"prompt": "a calm ocean", "num_videos": 3}),
            )
            .await;

        assert_eq!(res.status, 200, "generate failed: {:?}", res.body);
        let videos = res.body["videos"].as_array().unwrap();
        assert_eq!(videos.len(), 3);
        // Exactly three job submissions were made.
        assert_eq!(provider.video_submissions.load(Ordering::SeqCst), 3);

        for video in videos {
            let key = video["key"].as_str().unwrap();
            assert!(key.starts_with("generated_videos/"));
            assert_eq!(app.store.get(key).await.unwrap(), MOCK_VIDEO_BYTES);
            assert!(video["video_url"].as_str().unwrap().contains(key));
        }
    }

    #[tokio::test]
    async fn operation_error_fails_the_batch_with_the_provider_message() {
        let provider = MockProvider::spawn(ProviderScript::VideoError).await;
        let app = TestApp::spawn_with_provider(&provider.endpoint).await;

        let res = app
            .post_json(
                routes::VIDEOS_GENERATE,
                &json!({"prompt": "doomed", "num_videos": 3}),
            )
            .await;

        assert_eq!(res.status, 502);
        assert_eq!(res.body["code"], "PROVIDER_ERROR");
        // The provider's message survives verbatim.
        assert!(
            res.body["message"]
                .as_str()
                .unwrap()
                .contains(PROVIDER_ERROR_MESSAGE)
        );
        // No partial list of videos is returned.
        assert!(res.body.get("videos").is_none());
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected() {
        let provider = MockProvider::spawn(ProviderScript::VideoSuccess).await;
        let app = TestApp::spawn_with_provider(&provider.endpoint).await;

        let res = app
            .post_json(routes::VIDEOS_GENERATE, &json!({"prompt": "   "}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(provider.video_submissions.load(Ordering::SeqCst), 0);
    }
}
