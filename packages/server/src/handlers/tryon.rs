use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use genai::types::MediaRef;
use sea_orm::{ActiveModelTrait, Set};
use tracing::instrument;

use crate::entity::asset;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::handlers::projects::find_project;
use crate::models::tryon::{SaveTryOnRequest, TryOnResponse};
use crate::models::video::SaveAssetResponse;
use crate::state::AppState;
use crate::utils::keys::image_key;
use crate::utils::multipart::{UploadedFile, read_file_field};

pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(64 * 1024 * 1024) // 64 MB
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Virtual Try-on",
    operation_id = "virtualTryOn",
    summary = "Composite garments onto a person image",
    description = "Multipart form: `person_image` file and one or more `clothing_images` \
        files. Garments are applied sequentially, each step feeding the next, so layered \
        outfits compose. The result is uploaded and returned as a key plus signed URL; \
        saving it as an asset is a separate, explicit call.",
    request_body(content_type = "multipart/form-data", description = "Try-on form"),
    responses(
        (status = 200, description = "Composited image", body = TryOnResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 502, description = "Provider failure (PROVIDER_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn virtual_try_on(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TryOnResponse>, AppError> {
    let mut person_image: Option<UploadedFile> = None;
    let mut clothing_images: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("person_image") => person_image = Some(read_file_field(field).await?),
            Some("clothing_images") => clothing_images.push(read_file_field(field).await?),
            _ => {}
        }
    }

    let person_image =
        person_image.ok_or_else(|| AppError::Validation("Missing 'person_image' field".into()))?;
    if clothing_images.is_empty() {
        return Err(AppError::Validation(
            "At least one 'clothing_images' file is required".into(),
        ));
    }

    let model = state.config.provider.models.try_on.clone();

    // Chain garments: each result becomes the person image for the next.
    let mut current = person_image.bytes;
    for garment in &clothing_images {
        current = state
            .genai
            .try_on(
                &model,
                MediaRef::bytes(&current, "image/png"),
                MediaRef::bytes(&garment.bytes, garment.content_type.clone()),
            )
            .await?;
    }

    let key = image_key();
    state.store.put(&key, &current, "image/png").await?;
    let image_url = state.store.signed_url(&key).await?;

    Ok(Json(TryOnResponse { key, image_url }))
}

#[utoipa::path(
    post,
    path = "/save",
    tag = "Virtual Try-on",
    operation_id = "saveTryOn",
    summary = "Persist a try-on result as a project asset",
    request_body = SaveTryOnRequest,
    responses(
        (status = 201, description = "Asset created", body = SaveAssetResponse),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(project_id = payload.project_id))]
pub async fn save_try_on(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SaveTryOnRequest>,
) -> Result<(StatusCode, Json<SaveAssetResponse>), AppError> {
    find_project(&state, payload.project_id).await?;

    let model = asset::ActiveModel {
        project_id: Set(payload.project_id),
        kind: Set("tryon".to_string()),
        storage_key: Set(payload.key),
        prompt: Set(payload.prompt.or_else(|| Some("Virtual Try-on".to_string()))),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let saved = model.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(SaveAssetResponse { asset_id: saved.id }),
    ))
}
