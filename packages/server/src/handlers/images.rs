use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use genai::client::image_generate_config;
use genai::types::{Content, GenerateConfig, Part};
use genai::{GenaiError, Quality};
use sea_orm::{ActiveModelTrait, Set};
use tracing::instrument;

use crate::entity::asset;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::handlers::projects::find_project;
use crate::models::image::*;
use crate::models::shared::validate_batch_count;
use crate::state::AppState;
use crate::utils::keys::image_key;
use crate::utils::multipart::{UploadedFile, read_file_field, read_text_field, read_u32_field};

pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(64 * 1024 * 1024) // 64 MB
}

/// Aspect ratio requested from the preview-tier image model.
const IMAGE_ASPECT_RATIO: &str = "1:1";

#[derive(Default)]
struct GenerateForm {
    prompt: Option<String>,
    style: Option<String>,
    model_name: Option<String>,
    quality: Option<String>,
    num_images: u32,
    reference_images: Vec<UploadedFile>,
    style_images: Vec<UploadedFile>,
    product_images: Vec<UploadedFile>,
    scene_images: Vec<UploadedFile>,
}

#[utoipa::path(
    post,
    path = "/generate",
    tag = "Image Creation",
    operation_id = "generateImages",
    summary = "Generate images from a prompt and reference images",
    description = "Multipart form: `prompt` (required), `style`, `model_name`, `quality` \
        (speed|quality), `num_images` (1-8), and repeated `reference_images`, `style_images`, \
        `product_images`, `scene_images` file fields. Results are uploaded to storage and \
        returned as keys with signed URLs; nothing is persisted until an explicit save. \
        A failure in any generation fails the whole batch.",
    request_body(content_type = "multipart/form-data", description = "Generation form"),
    responses(
        (status = 200, description = "Generated images", body = GenerateImagesResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 502, description = "Provider failure (PROVIDER_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn generate_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GenerateImagesResponse>, AppError> {
    let mut form = GenerateForm {
        num_images: 1,
        ..Default::default()
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("prompt") => form.prompt = Some(read_text_field(field).await?),
            Some("style") => form.style = Some(read_text_field(field).await?),
            Some("model_name") => form.model_name = Some(read_text_field(field).await?),
            Some("quality") => form.quality = Some(read_text_field(field).await?),
            Some("num_images") => form.num_images = read_u32_field(field, "num_images").await?,
            Some("reference_images") => form.reference_images.push(read_file_field(field).await?),
            Some("style_images") => form.style_images.push(read_file_field(field).await?),
            Some("product_images") => form.product_images.push(read_file_field(field).await?),
            Some("scene_images") => form.scene_images.push(read_file_field(field).await?),
            _ => {} // Ignore unknown fields.
        }
    }

    let prompt = form
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Missing 'prompt' field".into()))?;
    validate_batch_count(form.num_images, "num_images")?;

    let full_prompt = match &form.style {
        Some(style) => format!("Style: {style}. {prompt}"),
        None => prompt.clone(),
    };

    let mut parts = vec![Part::text(full_prompt)];
    append_image_group(
        &mut parts,
        &form.style_images,
        "Follow the artistic style, color palette, and visual texture of these reference images:",
    );
    append_image_group(
        &mut parts,
        &form.product_images,
        "Incorporate the product shown in these images. Ensure the key features and appearance are maintained:",
    );
    append_image_group(
        &mut parts,
        &form.scene_images,
        "Place the subject or product within the environment shown in these images. Match the lighting, perspective, and background details:",
    );
    append_image_group(
        &mut parts,
        &form.reference_images,
        "Use these images as general visual references:",
    );

    let quality = Quality::parse(form.quality.as_deref().unwrap_or("speed"));
    let model = state
        .genai
        .models()
        .image_model(form.model_name.as_deref(), quality)
        .to_string();
    let config = image_generate_config(&model, IMAGE_ASPECT_RATIO);

    // Each generation is an independent attempt; the first failure aborts
    // the whole batch rather than returning a partial result.
    let mut images = Vec::with_capacity(form.num_images as usize);
    for _ in 0..form.num_images {
        let response = state
            .genai
            .generate(
                &model,
                vec![Content::user(parts.clone())],
                None,
                config.clone(),
            )
            .await?;
        let bytes = response.first_inline_data()?;

        let key = image_key();
        state.store.put(&key, &bytes, "image/png").await?;
        let url = state.store.signed_url(&key).await?;
        images.push(GeneratedImage { key, url });
    }

    Ok(Json(GenerateImagesResponse { images }))
}

fn append_image_group(parts: &mut Vec<Part>, images: &[UploadedFile], instruction: &str) {
    if images.is_empty() {
        return;
    }
    parts.push(Part::text(format!("\n{instruction}")));
    for image in images {
        parts.push(Part::inline(&image.bytes, image.content_type.clone()));
    }
}

#[utoipa::path(
    post,
    path = "/edit",
    tag = "Image Creation",
    operation_id = "editImage",
    summary = "Edit an image with natural-language instructions",
    description = "Multipart form: `image` file or `image_url`, `instruction` (required), \
        `style`, `model_name`, `num_images`, repeated `reference_images`. Returns base64 \
        payloads so the client can iterate before an explicit save.",
    request_body(content_type = "multipart/form-data", description = "Edit form"),
    responses(
        (status = 200, description = "Edited images", body = EditImageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 502, description = "Provider failure (PROVIDER_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn edit_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<EditImageResponse>, AppError> {
    let mut image: Option<UploadedFile> = None;
    let mut image_url: Option<String> = None;
    let mut instruction: Option<String> = None;
    let mut style: Option<String> = None;
    let mut model_name: Option<String> = None;
    let mut num_images: u32 = 1;
    let mut reference_images: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("image") => image = Some(read_file_field(field).await?),
            Some("image_url") => image_url = Some(read_text_field(field).await?),
            Some("instruction") => instruction = Some(read_text_field(field).await?),
            Some("style") => style = Some(read_text_field(field).await?),
            Some("model_name") => model_name = Some(read_text_field(field).await?),
            Some("num_images") => num_images = read_u32_field(field, "num_images").await?,
            Some("reference_images") => reference_images.push(read_file_field(field).await?),
            _ => {}
        }
    }

    let instruction =
        instruction.ok_or_else(|| AppError::Validation("Missing 'instruction' field".into()))?;
    validate_batch_count(num_images, "num_images")?;

    let (image_bytes, image_mime) = match (image, image_url) {
        (Some(file), _) => (file.bytes, file.content_type),
        (None, Some(url)) => (state.genai.download_uri(&url).await?, "image/png".into()),
        (None, None) => {
            return Err(AppError::Validation(
                "Either image file or image_url must be provided".into(),
            ));
        }
    };

    let full_instruction = match &style {
        Some(style) => format!("Style: {style}. {instruction}"),
        None => instruction,
    };

    let mut parts = vec![Part::text(full_instruction)];
    append_image_group(&mut parts, &reference_images, "Reference Images:");
    parts.push(Part::inline(&image_bytes, image_mime));

    let model = state
        .genai
        .models()
        .image_model(model_name.as_deref(), Quality::Speed)
        .to_string();
    let config = image_generate_config(&model, IMAGE_ASPECT_RATIO);

    let mut image_data = Vec::with_capacity(num_images as usize);
    for _ in 0..num_images {
        let response = state
            .genai
            .generate(
                &model,
                vec![Content::user(parts.clone())],
                None,
                config.clone(),
            )
            .await?;
        let bytes = response.first_inline_data()?;
        image_data.push(BASE64.encode(bytes));
    }

    Ok(Json(EditImageResponse { image_data }))
}

#[utoipa::path(
    post,
    path = "/save",
    tag = "Image Creation",
    operation_id = "saveImage",
    summary = "Persist an image as a project asset",
    description = "Decodes the base64 payload (or downloads `image_url`), uploads it under a \
        fresh storage key, and records an Asset row. This is the only path that creates image \
        assets; generation never saves implicitly.",
    request_body = SaveImageRequest,
    responses(
        (status = 201, description = "Asset created", body = SaveImageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(project_id = payload.project_id))]
pub async fn save_image(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SaveImageRequest>,
) -> Result<(axum::http::StatusCode, Json<SaveImageResponse>), AppError> {
    find_project(&state, payload.project_id).await?;

    let bytes = match (&payload.image_data, &payload.image_url) {
        (Some(data), _) => BASE64
            .decode(data.trim())
            .map_err(|e| AppError::Validation(format!("Invalid base64 image data: {e}")))?,
        (None, Some(url)) => state.genai.download_uri(url).await?,
        (None, None) => {
            return Err(AppError::Validation(
                "Either image_data or image_url must be provided".into(),
            ));
        }
    };

    let key = image_key();
    state.store.put(&key, &bytes, "image/png").await?;

    let model = asset::ActiveModel {
        project_id: Set(payload.project_id),
        kind: Set("image".to_string()),
        storage_key: Set(key.clone()),
        prompt: Set(payload.prompt),
        model_type: Set(payload.model_type),
        context_version: Set(payload.context_version),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let saved = model.insert(&state.db).await?;

    let image_url = state.store.signed_url(&key).await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(SaveImageResponse {
            asset_id: saved.id,
            key,
            image_url,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/optimize",
    tag = "Image Creation",
    operation_id = "optimizePrompt",
    summary = "Rewrite a prompt for higher-quality image generation",
    request_body = OptimizePromptRequest,
    responses(
        (status = 200, description = "Optimized prompt", body = OptimizePromptResponse),
        (status = 502, description = "Provider failure (PROVIDER_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn optimize_prompt(
    State(state): State<AppState>,
    AppJson(payload): AppJson<OptimizePromptRequest>,
) -> Result<Json<OptimizePromptResponse>, AppError> {
    let model = payload
        .model_name
        .clone()
        .unwrap_or_else(|| state.genai.models().text_fast.clone());

    let config = GenerateConfig {
        temperature: Some(0.7),
        ..Default::default()
    };

    let result = state
        .genai
        .generate_text(
            &model,
            vec![Content::user(vec![Part::text(payload.prompt.clone())])],
            Some(Content::system(
                genai::prompts::IMAGE_PROMPT_OPTIMIZER_SYSTEM,
            )),
            Some(config),
        )
        .await;

    let optimized_prompt = match result {
        Ok(text) => text,
        // An empty reply falls back to the caller's prompt unchanged.
        Err(GenaiError::NoOutput { .. }) => payload.prompt,
        Err(e) => return Err(e.into()),
    };

    Ok(Json(OptimizePromptResponse { optimized_prompt }))
}
