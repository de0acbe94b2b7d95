use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use futures::future::try_join_all;
use genai::ProviderMode;
use genai::materialize::{LocatePolicy, materialize_video_output};
use genai::prompts;
use genai::types::{
    Content, GenerateConfig, MediaRef, Part, ReferenceImage, VideoInstance, VideoJobRequest,
    VideoParameters,
};
use genai::Quality;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{Value, json};
use tracing::instrument;

use crate::entity::asset;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::handlers::projects::find_project;
use crate::models::video::*;
use crate::models::shared::validate_batch_count;
use crate::state::AppState;
use crate::utils::keys::{temp_input_key, video_key};
use crate::utils::multipart::{UploadedFile, read_file_field, read_text_field, read_u32_field};

pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(256 * 1024 * 1024) // 256 MB, video extension inputs
}

#[utoipa::path(
    post,
    path = "/generate",
    tag = "Video Creation",
    operation_id = "generateVideos",
    summary = "Generate videos from a text prompt",
    description = "Starts `num_videos` independent long-running jobs concurrently and waits \
        for all of them. One failed job fails the whole batch; no partial result is returned.",
    request_body = GenerateVideosRequest,
    responses(
        (status = 200, description = "Generated videos", body = GenerateVideosResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 502, description = "Provider failure (PROVIDER_ERROR, OUTPUT_NOT_LOCATED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(num_videos = payload.num_videos))]
pub async fn generate_videos(
    State(state): State<AppState>,
    AppJson(payload): AppJson<GenerateVideosRequest>,
) -> Result<Json<GenerateVideosResponse>, AppError> {
    validate_generate_videos(&payload)?;

    let full_prompt = with_context(&payload.prompt, payload.context.as_deref());
    let model = state
        .genai
        .models()
        .video_model(Quality::parse(&payload.quality))
        .to_string();

    let instance = VideoInstance {
        prompt: full_prompt,
        ..Default::default()
    };

    let videos = try_join_all((0..payload.num_videos).map(|_| {
        run_video_job(
            &state,
            &model,
            instance.clone(),
            Some(payload.aspect_ratio.as_str()),
        )
    }))
    .await?;

    Ok(Json(GenerateVideosResponse { videos }))
}

#[utoipa::path(
    post,
    path = "/image-to-video",
    tag = "Video Creation",
    operation_id = "imageToVideo",
    summary = "Animate a still image into a video",
    description = "Multipart form: `image` file (required), `prompt` (required), `context`, \
        `num_videos` (1-8).",
    request_body(content_type = "multipart/form-data", description = "Animation form"),
    responses(
        (status = 200, description = "Generated videos", body = GenerateVideosResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 502, description = "Provider failure (PROVIDER_ERROR, OUTPUT_NOT_LOCATED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn image_to_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GenerateVideosResponse>, AppError> {
    let mut image: Option<UploadedFile> = None;
    let mut prompt: Option<String> = None;
    let mut context: Option<String> = None;
    let mut num_videos: u32 = 1;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("image") => image = Some(read_file_field(field).await?),
            Some("prompt") => prompt = Some(read_text_field(field).await?),
            Some("context") => context = Some(read_text_field(field).await?),
            Some("num_videos") => num_videos = read_u32_field(field, "num_videos").await?,
            _ => {}
        }
    }

    let image = image.ok_or_else(|| AppError::Validation("Missing 'image' field".into()))?;
    let prompt = prompt.ok_or_else(|| AppError::Validation("Missing 'prompt' field".into()))?;
    validate_batch_count(num_videos, "num_videos")?;

    let media = input_media(&state, &image, temp_input_key(".png")).await?;
    let instance = VideoInstance {
        prompt: with_context(&prompt, context.as_deref()),
        image: Some(media),
        ..Default::default()
    };
    let model = state.genai.models().video_model(Quality::Quality).to_string();

    let videos = try_join_all(
        (0..num_videos).map(|_| run_video_job(&state, &model, instance.clone(), Some("16:9"))),
    )
    .await?;

    Ok(Json(GenerateVideosResponse { videos }))
}

#[utoipa::path(
    post,
    path = "/first-last",
    tag = "Video Creation",
    operation_id = "firstLastVideo",
    summary = "Interpolate a video between a first and last frame",
    description = "Multipart form: `first_image` and `last_image` files (required), `prompt` \
        (required), `context`, `num_videos` (1-8).",
    request_body(content_type = "multipart/form-data", description = "Interpolation form"),
    responses(
        (status = 200, description = "Generated videos", body = GenerateVideosResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 502, description = "Provider failure (PROVIDER_ERROR, OUTPUT_NOT_LOCATED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn first_last_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GenerateVideosResponse>, AppError> {
    let mut first_image: Option<UploadedFile> = None;
    let mut last_image: Option<UploadedFile> = None;
    let mut prompt: Option<String> = None;
    let mut context: Option<String> = None;
    let mut num_videos: u32 = 1;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("first_image") => first_image = Some(read_file_field(field).await?),
            Some("last_image") => last_image = Some(read_file_field(field).await?),
            Some("prompt") => prompt = Some(read_text_field(field).await?),
            Some("context") => context = Some(read_text_field(field).await?),
            Some("num_videos") => num_videos = read_u32_field(field, "num_videos").await?,
            _ => {}
        }
    }

    let first_image =
        first_image.ok_or_else(|| AppError::Validation("Missing 'first_image' field".into()))?;
    let last_image =
        last_image.ok_or_else(|| AppError::Validation("Missing 'last_image' field".into()))?;
    let prompt = prompt.ok_or_else(|| AppError::Validation("Missing 'prompt' field".into()))?;
    validate_batch_count(num_videos, "num_videos")?;

    let first = input_media(&state, &first_image, temp_input_key("_first.png")).await?;
    let last = input_media(&state, &last_image, temp_input_key("_last.png")).await?;
    let instance = VideoInstance {
        prompt: with_context(&prompt, context.as_deref()),
        image: Some(first),
        last_frame: Some(last),
        ..Default::default()
    };
    let model = state.genai.models().video_model(Quality::Quality).to_string();

    let videos = try_join_all(
        (0..num_videos).map(|_| run_video_job(&state, &model, instance.clone(), Some("16:9"))),
    )
    .await?;

    Ok(Json(GenerateVideosResponse { videos }))
}

#[utoipa::path(
    post,
    path = "/reference",
    tag = "Video Creation",
    operation_id = "referenceVideo",
    summary = "Generate a video guided by a reference asset image",
    request_body(content_type = "multipart/form-data", description = "Reference form"),
    responses(
        (status = 200, description = "Generated videos", body = GenerateVideosResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 502, description = "Provider failure (PROVIDER_ERROR, OUTPUT_NOT_LOCATED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn reference_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GenerateVideosResponse>, AppError> {
    let mut image: Option<UploadedFile> = None;
    let mut prompt: Option<String> = None;
    let mut context: Option<String> = None;
    let mut num_videos: u32 = 1;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("image") => image = Some(read_file_field(field).await?),
            Some("prompt") => prompt = Some(read_text_field(field).await?),
            Some("context") => context = Some(read_text_field(field).await?),
            Some("num_videos") => num_videos = read_u32_field(field, "num_videos").await?,
            _ => {}
        }
    }

    let image = image.ok_or_else(|| AppError::Validation("Missing 'image' field".into()))?;
    let prompt = prompt.ok_or_else(|| AppError::Validation("Missing 'prompt' field".into()))?;
    validate_batch_count(num_videos, "num_videos")?;

    let media = input_media(&state, &image, temp_input_key("_ref.png")).await?;
    let instance = VideoInstance {
        prompt: with_context(&prompt, context.as_deref()),
        reference_images: Some(vec![ReferenceImage::asset(media)]),
        ..Default::default()
    };
    let model = state.genai.models().video_model(Quality::Quality).to_string();

    let videos = try_join_all(
        (0..num_videos).map(|_| run_video_job(&state, &model, instance.clone(), Some("16:9"))),
    )
    .await?;

    Ok(Json(GenerateVideosResponse { videos }))
}

#[utoipa::path(
    post,
    path = "/extend",
    tag = "Video Creation",
    operation_id = "extendVideo",
    summary = "Extend an existing video",
    description = "Multipart form: `video` file (required), `prompt` (required), `context`, \
        `num_videos` (1-8). The input is staged in the bucket and referenced by URI.",
    request_body(content_type = "multipart/form-data", description = "Extension form"),
    responses(
        (status = 200, description = "Generated videos", body = GenerateVideosResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 502, description = "Provider failure (PROVIDER_ERROR, OUTPUT_NOT_LOCATED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn extend_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GenerateVideosResponse>, AppError> {
    let mut video: Option<UploadedFile> = None;
    let mut prompt: Option<String> = None;
    let mut context: Option<String> = None;
    let mut num_videos: u32 = 1;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("video") => video = Some(read_file_field(field).await?),
            Some("prompt") => prompt = Some(read_text_field(field).await?),
            Some("context") => context = Some(read_text_field(field).await?),
            Some("num_videos") => num_videos = read_u32_field(field, "num_videos").await?,
            _ => {}
        }
    }

    let video = video.ok_or_else(|| AppError::Validation("Missing 'video' field".into()))?;
    let prompt = prompt.ok_or_else(|| AppError::Validation("Missing 'prompt' field".into()))?;
    validate_batch_count(num_videos, "num_videos")?;

    // Extension inputs are always staged in the bucket; the job references
    // the staged object by URI in both provider modes.
    let input_key = temp_input_key("_extend_input.mp4");
    state
        .store
        .put(&input_key, &video.bytes, &video.content_type)
        .await?;
    let media = MediaRef::object_uri(
        format!("gs://{}/{input_key}", state.config.storage.bucket),
        video.content_type.clone(),
    );

    let instance = VideoInstance {
        prompt: with_context(&prompt, context.as_deref()),
        video: Some(media),
        ..Default::default()
    };
    let model = state.genai.models().video_model(Quality::Quality).to_string();

    let videos = try_join_all(
        (0..num_videos).map(|_| run_video_job(&state, &model, instance.clone(), None)),
    )
    .await?;

    Ok(Json(GenerateVideosResponse { videos }))
}

#[utoipa::path(
    post,
    path = "/optimize-prompt",
    tag = "Video Creation",
    operation_id = "optimizeMotionPrompt",
    summary = "Turn an image and motion instructions into a video prompt",
    description = "Multipart form: `image` file (required), `instructions` (required). When \
        `instructions` names a product-motion preset slug the preset template is used instead \
        of the freeform optimizer.",
    request_body(content_type = "multipart/form-data", description = "Optimization form"),
    responses(
        (status = 200, description = "Optimized prompt", body = OptimizedMotionPromptResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 502, description = "Provider failure (PROVIDER_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn optimize_motion_prompt(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<OptimizedMotionPromptResponse>, AppError> {
    let mut image: Option<UploadedFile> = None;
    let mut instructions: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("image") => image = Some(read_file_field(field).await?),
            Some("instructions") => instructions = Some(read_text_field(field).await?),
            _ => {}
        }
    }

    let image = image.ok_or_else(|| AppError::Validation("Missing 'image' field".into()))?;
    let instructions =
        instructions.ok_or_else(|| AppError::Validation("Missing 'instructions' field".into()))?;

    let prompt = match prompts::product_motion_preset(&instructions) {
        Some(preset) => preset.to_string(),
        None => prompts::image_motion_optimizer(&instructions),
    };

    let model = state.genai.models().text_fast.clone();
    let optimized_prompt = state
        .genai
        .generate_text(
            &model,
            vec![Content::user(vec![
                Part::text(prompt),
                Part::inline(&image.bytes, image.content_type.clone()),
            ])],
            None,
            None,
        )
        .await?;

    Ok(Json(OptimizedMotionPromptResponse { optimized_prompt }))
}

#[utoipa::path(
    post,
    path = "/script",
    tag = "Video Creation",
    operation_id = "generateScript",
    summary = "Generate a storyboard script",
    description = "Returns a JSON object with `global_elements` and 8-second `scenes`. A \
        structured-schema attempt is made first, then one fallback without the schema.",
    request_body = ScriptRequest,
    responses(
        (status = 200, description = "Script JSON"),
        (status = 502, description = "Provider failure (PROVIDER_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn generate_script(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ScriptRequest>,
) -> Result<Json<Value>, AppError> {
    let prompt = prompts::video_script_writer(&payload.prompt, payload.context.as_deref());
    let model = state.genai.models().text_fast.clone();
    let contents = vec![Content::user(vec![Part::text(prompt)])];

    let attempt = state
        .genai
        .generate_json::<Value>(
            &model,
            contents.clone(),
            Some(GenerateConfig::json_with_schema(script_schema())),
        )
        .await;

    let script = match attempt {
        Ok(script) => script,
        Err(e) => {
            tracing::warn!(error = %e, "structured script attempt failed, retrying without schema");
            state
                .genai
                .generate_json::<Value>(&model, contents, Some(GenerateConfig::json()))
                .await?
        }
    };

    Ok(Json(script))
}

#[utoipa::path(
    post,
    path = "/script/edit",
    tag = "Video Creation",
    operation_id = "editScript",
    summary = "Edit an existing storyboard script",
    request_body = ScriptEditRequest,
    responses(
        (status = 200, description = "Edited script JSON"),
        (status = 502, description = "Provider failure (PROVIDER_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn edit_script(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ScriptEditRequest>,
) -> Result<Json<Value>, AppError> {
    let current = serde_json::to_string_pretty(&payload.current_script)
        .map_err(|e| AppError::Validation(format!("Invalid current_script: {e}")))?;
    let prompt = prompts::video_script_editor(&current, &payload.instructions);
    let model = state.genai.models().text_fast.clone();
    let contents = vec![Content::user(vec![Part::text(prompt)])];

    let attempt = state
        .genai
        .generate_json::<Value>(
            &model,
            contents.clone(),
            Some(GenerateConfig::json_with_schema(scene_list_schema())),
        )
        .await;

    let script = match attempt {
        Ok(script) => script,
        Err(e) => {
            tracing::warn!(error = %e, "structured edit attempt failed, retrying without schema");
            state
                .genai
                .generate_json::<Value>(&model, contents, Some(GenerateConfig::json()))
                .await?
        }
    };

    Ok(Json(script))
}

#[utoipa::path(
    post,
    path = "/save",
    tag = "Video Creation",
    operation_id = "saveVideo",
    summary = "Persist a generated video as a project asset",
    request_body = SaveVideoRequest,
    responses(
        (status = 201, description = "Asset created", body = SaveAssetResponse),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(project_id = payload.project_id))]
pub async fn save_video(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SaveVideoRequest>,
) -> Result<(StatusCode, Json<SaveAssetResponse>), AppError> {
    find_project(&state, payload.project_id).await?;

    let model = asset::ActiveModel {
        project_id: Set(payload.project_id),
        kind: Set("video".to_string()),
        storage_key: Set(payload.key),
        prompt: Set(Some(payload.prompt)),
        model_type: Set(payload.model_type),
        context_version: Set(payload.context_version),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let saved = model.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(SaveAssetResponse { asset_id: saved.id }),
    ))
}

/// Submit one video job, poll it to completion, and land its output at a
/// fresh canonical key.
async fn run_video_job(
    state: &AppState,
    model: &str,
    instance: VideoInstance,
    aspect_ratio: Option<&str>,
) -> Result<VideoArtifact, AppError> {
    let key = video_key();
    let parameters = VideoParameters {
        aspect_ratio: aspect_ratio.map(str::to_string),
        sample_count: Some(1),
        storage_uri: state
            .genai
            .mode()
            .video_output_uri(&state.config.storage.bucket, &key),
    };
    let request = VideoJobRequest {
        instances: vec![instance],
        parameters,
    };

    let operation = state.genai.start_video_job(model, &request).await?;
    let operation = state.genai.await_video_job(operation).await?;

    let locate = LocatePolicy {
        max_attempts: state.config.provider.locate_attempts,
        delay: state.config.provider.locate_delay(),
    };
    materialize_video_output(&state.genai, &*state.store, &operation, &key, locate).await?;

    let video_url = state.store.signed_url(&key).await?;
    Ok(VideoArtifact { key, video_url })
}

/// Stage an uploaded input for the provider: inline bytes in direct mode,
/// a bucket object referenced by URI in managed mode.
async fn input_media(
    state: &AppState,
    file: &UploadedFile,
    key_hint: String,
) -> Result<MediaRef, AppError> {
    match state.genai.mode() {
        ProviderMode::DirectApi { .. } => {
            Ok(MediaRef::bytes(&file.bytes, file.content_type.clone()))
        }
        ProviderMode::ManagedCloud { .. } => {
            state
                .store
                .put(&key_hint, &file.bytes, &file.content_type)
                .await?;
            Ok(MediaRef::object_uri(
                format!("gs://{}/{key_hint}", state.config.storage.bucket),
                file.content_type.clone(),
            ))
        }
    }
}

fn with_context(prompt: &str, context: Option<&str>) -> String {
    match context {
        Some(context) => format!("{prompt}{}", prompts::video_context_suffix(context)),
        None => prompt.to_string(),
    }
}

fn script_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "global_elements": {
                "type": "OBJECT",
                "properties": {
                    "character": {"type": "STRING"},
                    "visual_style": {"type": "STRING"},
                    "audio_vibe": {"type": "STRING"},
                    "costume": {"type": "STRING"},
                    "color_palette": {"type": "STRING"},
                    "set_design": {"type": "STRING"},
                    "objects_props": {"type": "STRING"},
                    "filming_techniques": {"type": "STRING"},
                    "voice": {"type": "STRING"},
                },
            },
            "scenes": scene_list_schema(),
        },
        "required": ["global_elements", "scenes"],
    })
}

fn scene_list_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "visual": {"type": "STRING"},
                "audio": {"type": "STRING"},
            },
            "required": ["visual", "audio"],
        },
    })
}
