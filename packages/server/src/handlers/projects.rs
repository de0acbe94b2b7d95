use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::instrument;

use crate::entity::{asset, project};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::asset::{AssetListResponse, AssetResponse};
use crate::models::project::*;
use crate::models::shared::Pagination;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Projects",
    operation_id = "createProject",
    summary = "Create a new project",
    request_body = ProjectFields,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_project(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ProjectFields>,
) -> Result<impl IntoResponse, AppError> {
    validate_project_fields(&payload)?;

    let new_project = project::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        context: Set(payload.context),
        brand_vibe: Set(payload.brand_vibe),
        brand_lighting: Set(payload.brand_lighting),
        brand_colors: Set(payload.brand_colors),
        brand_subject: Set(payload.brand_subject),
        project_vibe: Set(payload.project_vibe),
        project_lighting: Set(payload.project_lighting),
        project_colors: Set(payload.project_colors),
        project_subject: Set(payload.project_subject),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_project.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse::from_model(model, Vec::new())),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Projects",
    operation_id = "listProjects",
    summary = "List projects with pagination",
    params(ProjectListQuery),
    responses(
        (status = 200, description = "List of projects", body = ProjectListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> Result<Json<ProjectListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let select = project::Entity::find();

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by(project::Column::CreatedAt, Order::Desc)
        .select_only()
        .column(project::Column::Id)
        .column(project::Column::Name)
        .column(project::Column::Description)
        .column(project::Column::CreatedAt)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .into_model::<ProjectListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(ProjectListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Projects",
    operation_id = "getProject",
    summary = "Get a project with its assets",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project details", body = ProjectResponse),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProjectResponse>, AppError> {
    let model = find_project(&state, id).await?;
    let assets = signed_project_assets(&state, id).await?;
    Ok(Json(ProjectResponse::from_model(model, assets)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Projects",
    operation_id = "updateProject",
    summary = "Replace a project's descriptive fields",
    params(("id" = i32, Path, description = "Project ID")),
    request_body = ProjectFields,
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<ProjectFields>,
) -> Result<Json<ProjectResponse>, AppError> {
    validate_project_fields(&payload)?;

    let existing = find_project(&state, id).await?;
    let mut active: project::ActiveModel = existing.into();

    active.name = Set(payload.name.trim().to_string());
    active.description = Set(payload.description);
    active.context = Set(payload.context);
    active.brand_vibe = Set(payload.brand_vibe);
    active.brand_lighting = Set(payload.brand_lighting);
    active.brand_colors = Set(payload.brand_colors);
    active.brand_subject = Set(payload.brand_subject);
    active.project_vibe = Set(payload.project_vibe);
    active.project_lighting = Set(payload.project_lighting);
    active.project_colors = Set(payload.project_colors);
    active.project_subject = Set(payload.project_subject);

    let model = active.update(&state.db).await?;
    let assets = signed_project_assets(&state, id).await?;

    Ok(Json(ProjectResponse::from_model(model, assets)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Projects",
    operation_id = "deleteProject",
    summary = "Delete a project and all its assets",
    description = "Deletes the project's assets first, then the project itself — an explicit \
        two-step cascade rather than a database-level one. Underlying blobs are not removed.",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    find_project(&state, id).await?;

    asset::Entity::delete_many()
        .filter(asset::Column::ProjectId.eq(id))
        .exec(&state.db)
        .await?;
    project::Entity::delete_by_id(id).exec(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{id}/assets",
    tag = "Assets",
    operation_id = "listProjectAssets",
    summary = "List a project's assets",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Asset list", body = AssetListResponse),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn list_project_assets(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AssetListResponse>, AppError> {
    find_project(&state, id).await?;

    let assets = signed_project_assets(&state, id).await?;
    let total = assets.len() as u64;
    Ok(Json(AssetListResponse { assets, total }))
}

pub(crate) async fn find_project(state: &AppState, id: i32) -> Result<project::Model, AppError> {
    project::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))
}

/// Query a project's assets and resolve each storage key to a signed URL.
async fn signed_project_assets(
    state: &AppState,
    project_id: i32,
) -> Result<Vec<AssetResponse>, AppError> {
    let rows = asset::Entity::find()
        .filter(asset::Column::ProjectId.eq(project_id))
        .order_by_asc(asset::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let mut assets = Vec::with_capacity(rows.len());
    for row in rows {
        assets.push(AssetResponse::from_model(row, &*state.store).await?);
    }
    Ok(assets)
}
