use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::EntityTrait;
use tracing::instrument;

use crate::entity::asset;
use crate::error::{AppError, ErrorBody};
use crate::models::asset::AssetResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Assets",
    operation_id = "getAsset",
    summary = "Get an asset by ID",
    description = "Returns the asset with a freshly signed download URL.",
    params(("id" = i32, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset details", body = AssetResponse),
        (status = 404, description = "Asset not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AssetResponse>, AppError> {
    let model = find_asset(&state, id).await?;
    Ok(Json(AssetResponse::from_model(model, &*state.store).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Assets",
    operation_id = "deleteAsset",
    summary = "Delete an asset",
    description = "Removes the asset row. The underlying object is preserved.",
    params(("id" = i32, Path, description = "Asset ID")),
    responses(
        (status = 204, description = "Asset deleted"),
        (status = 404, description = "Asset not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    find_asset(&state, id).await?;

    asset::Entity::delete_by_id(id).exec(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_asset(state: &AppState, id: i32) -> Result<asset::Model, AppError> {
    asset::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Asset not found".into()))
}
