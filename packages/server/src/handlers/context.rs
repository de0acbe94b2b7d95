use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use genai::prompts::{self, DescriptorFields, FileAnalysisKind};
use genai::strip_code_fences;
use genai::types::{Content, GenerateConfig, Part, Tool};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::Value;
use tracing::instrument;

use crate::entity::context_version;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::handlers::projects::find_project;
use crate::models::context::*;
use crate::state::AppState;
use crate::utils::multipart::{UploadedFile, read_file_field, read_text_field};

pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(32 * 1024 * 1024) // 32 MB reference documents
}

#[utoipa::path(
    post,
    path = "/generate",
    tag = "Context",
    operation_id = "generateContext",
    summary = "Generate descriptor metadata from a project goal",
    request_body = GenerateContextRequest,
    responses(
        (status = 200, description = "Descriptor JSON"),
        (status = 502, description = "Provider failure (PROVIDER_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn generate_context(
    State(state): State<AppState>,
    AppJson(payload): AppJson<GenerateContextRequest>,
) -> Result<Json<Value>, AppError> {
    let prompt = prompts::context_generation(&payload.goal);
    let descriptor = state
        .genai
        .generate_json::<Value>(
            &state.genai.models().text_fast.clone(),
            vec![Content::user(vec![Part::text(prompt)])],
            Some(GenerateConfig::json()),
        )
        .await?;
    Ok(Json(descriptor))
}

#[utoipa::path(
    post,
    path = "/enhance-field",
    tag = "Context",
    operation_id = "enhanceField",
    summary = "Rewrite a single descriptor field",
    request_body = EnhanceFieldRequest,
    responses(
        (status = 200, description = "Enhanced text JSON"),
        (status = 502, description = "Provider failure (PROVIDER_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn enhance_field(
    State(state): State<AppState>,
    AppJson(payload): AppJson<EnhanceFieldRequest>,
) -> Result<Json<Value>, AppError> {
    let prompt = prompts::enhance_field(
        &payload.field_name,
        &payload.current_value,
        payload.instructions.as_deref(),
    );
    let enhanced = state
        .genai
        .generate_json::<Value>(
            &state.genai.models().text_fast.clone(),
            vec![Content::user(vec![Part::text(prompt)])],
            Some(GenerateConfig::json()),
        )
        .await?;
    Ok(Json(enhanced))
}

#[utoipa::path(
    post,
    path = "/analyze-brand",
    tag = "Context",
    operation_id = "analyzeBrand",
    summary = "Analyze a named brand with web-search grounding",
    description = "Structured response types are unsupported alongside search grounding, so \
        the reply is fence-stripped and parsed manually.",
    request_body = AnalyzeBrandRequest,
    responses(
        (status = 200, description = "Brand descriptor JSON"),
        (status = 502, description = "Provider failure (PROVIDER_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(brand = %payload.brand_name))]
pub async fn analyze_brand(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AnalyzeBrandRequest>,
) -> Result<Json<Value>, AppError> {
    let prompt = prompts::brand_analysis(&payload.brand_name);
    let response = state
        .genai
        .generate_with_tools(
            &state.genai.models().text_fast.clone(),
            vec![Content::user(vec![Part::text(prompt)])],
            vec![Tool::web_search()],
        )
        .await?;

    let text = response.text().map_err(AppError::from)?;
    let descriptor: Value = serde_json::from_str(strip_code_fences(&text))
        .map_err(|e| AppError::Provider(format!("unparseable brand analysis: {e}")))?;
    Ok(Json(descriptor))
}

#[utoipa::path(
    post,
    path = "/analyze-file",
    tag = "Context",
    operation_id = "analyzeFile",
    summary = "Extract descriptor fields from an uploaded reference file",
    description = "Multipart form: `file` (required) and `analysis_type` (`brand` or \
        `project`).",
    request_body(content_type = "multipart/form-data", description = "Analysis form"),
    responses(
        (status = 200, description = "Descriptor JSON"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 502, description = "Provider failure (PROVIDER_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn analyze_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut file: Option<UploadedFile> = None;
    let mut analysis_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("file") => file = Some(read_file_field(field).await?),
            Some("analysis_type") => analysis_type = Some(read_text_field(field).await?),
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    let analysis_type =
        analysis_type.ok_or_else(|| AppError::Validation("Missing 'analysis_type' field".into()))?;

    let kind = FileAnalysisKind::parse(&analysis_type);
    let descriptor = state
        .genai
        .generate_json::<Value>(
            &state.genai.models().text_fast.clone(),
            vec![Content::user(vec![
                Part::inline(&file.bytes, file.content_type.clone()),
                Part::text(prompts::file_analysis(kind)),
            ])],
            Some(GenerateConfig::json()),
        )
        .await?;
    Ok(Json(descriptor))
}

#[utoipa::path(
    post,
    path = "/synthesize",
    tag = "Context",
    operation_id = "synthesizeContext",
    summary = "Synthesize descriptor fields into overall guidelines",
    request_body = SynthesizeRequest,
    responses(
        (status = 200, description = "Synthesized text JSON"),
        (status = 502, description = "Provider failure (PROVIDER_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn synthesize_context(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SynthesizeRequest>,
) -> Result<Json<Value>, AppError> {
    let fields = DescriptorFields {
        brand_vibe: &payload.brand_vibe,
        brand_lighting: &payload.brand_lighting,
        brand_colors: &payload.brand_colors,
        brand_subject: &payload.brand_subject,
        project_vibe: &payload.project_vibe,
        project_lighting: &payload.project_lighting,
        project_colors: &payload.project_colors,
        project_subject: &payload.project_subject,
    };
    let prompt = prompts::synthesize_context(&fields);
    let synthesized = state
        .genai
        .generate_json::<Value>(
            &state.genai.models().text_fast.clone(),
            vec![Content::user(vec![Part::text(prompt)])],
            Some(GenerateConfig::json()),
        )
        .await?;
    Ok(Json(synthesized))
}

#[utoipa::path(
    post,
    path = "/insight",
    tag = "Context",
    operation_id = "promptInsight",
    summary = "Analyze a generation prompt",
    request_body = PromptInsightRequest,
    responses(
        (status = 200, description = "Insight JSON"),
        (status = 502, description = "Provider failure (PROVIDER_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn prompt_insight(
    State(state): State<AppState>,
    AppJson(payload): AppJson<PromptInsightRequest>,
) -> Result<Json<Value>, AppError> {
    let prompt = prompts::prompt_insight(&payload.prompt_text);
    let insight = state
        .genai
        .generate_json::<Value>(
            &state.genai.models().text_quality.clone(),
            vec![Content::user(vec![Part::text(prompt)])],
            Some(GenerateConfig::json()),
        )
        .await?;
    Ok(Json(insight))
}

#[utoipa::path(
    post,
    path = "/versions",
    tag = "Context",
    operation_id = "createContextVersion",
    summary = "Snapshot a context configuration",
    request_body = CreateContextVersionRequest,
    responses(
        (status = 201, description = "Version created", body = ContextVersionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(project_id = payload.project_id))]
pub async fn create_version(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateContextVersionRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_version(&payload)?;
    find_project(&state, payload.project_id).await?;

    let fields = payload.fields;
    let model = context_version::ActiveModel {
        project_id: Set(payload.project_id),
        name: Set(fields.name.trim().to_string()),
        description: Set(fields.description),
        brand_vibe: Set(fields.brand_vibe),
        brand_lighting: Set(fields.brand_lighting),
        brand_colors: Set(fields.brand_colors),
        brand_subject: Set(fields.brand_subject),
        project_vibe: Set(fields.project_vibe),
        project_lighting: Set(fields.project_lighting),
        project_colors: Set(fields.project_colors),
        project_subject: Set(fields.project_subject),
        context: Set(fields.context),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let saved = model.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(ContextVersionResponse::from(saved)),
    ))
}

#[utoipa::path(
    get,
    path = "/versions/{id}",
    tag = "Context",
    operation_id = "listContextVersions",
    summary = "List a project's context versions, newest first",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Version list", body = [ContextVersionResponse]),
    ),
)]
#[instrument(skip(state), fields(project_id = id))]
pub async fn list_versions(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ContextVersionResponse>>, AppError> {
    let versions = context_version::Entity::find()
        .filter(context_version::Column::ProjectId.eq(id))
        .order_by_desc(context_version::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(
        versions
            .into_iter()
            .map(ContextVersionResponse::from)
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/version/{id}",
    tag = "Context",
    operation_id = "getContextVersion",
    summary = "Get a context version by ID",
    params(("id" = i32, Path, description = "Version ID")),
    responses(
        (status = 200, description = "Version details", body = ContextVersionResponse),
        (status = 404, description = "Version not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_version(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ContextVersionResponse>, AppError> {
    let version = find_version(&state, id).await?;
    Ok(Json(ContextVersionResponse::from(version)))
}

#[utoipa::path(
    put,
    path = "/versions/{id}",
    tag = "Context",
    operation_id = "updateContextVersion",
    summary = "Update a context version in place",
    description = "Only provided fields are modified; last write wins.",
    params(("id" = i32, Path, description = "Version ID")),
    request_body = UpdateContextVersionRequest,
    responses(
        (status = 200, description = "Version updated", body = ContextVersionResponse),
        (status = 404, description = "Version not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_version(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateContextVersionRequest>,
) -> Result<Json<ContextVersionResponse>, AppError> {
    let existing = find_version(&state, id).await?;
    let mut active: context_version::ActiveModel = existing.into();

    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(v) = payload.brand_vibe {
        active.brand_vibe = Set(Some(v));
    }
    if let Some(v) = payload.brand_lighting {
        active.brand_lighting = Set(Some(v));
    }
    if let Some(v) = payload.brand_colors {
        active.brand_colors = Set(Some(v));
    }
    if let Some(v) = payload.brand_subject {
        active.brand_subject = Set(Some(v));
    }
    if let Some(v) = payload.project_vibe {
        active.project_vibe = Set(Some(v));
    }
    if let Some(v) = payload.project_lighting {
        active.project_lighting = Set(Some(v));
    }
    if let Some(v) = payload.project_colors {
        active.project_colors = Set(Some(v));
    }
    if let Some(v) = payload.project_subject {
        active.project_subject = Set(Some(v));
    }
    if let Some(v) = payload.context {
        active.context = Set(Some(v));
    }

    let updated = active.update(&state.db).await?;
    Ok(Json(ContextVersionResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/versions/{id}",
    tag = "Context",
    operation_id = "deleteContextVersion",
    summary = "Delete a context version",
    params(("id" = i32, Path, description = "Version ID")),
    responses(
        (status = 204, description = "Version deleted"),
        (status = 404, description = "Version not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_version(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    find_version(&state, id).await?;

    context_version::Entity::delete_by_id(id)
        .exec(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_version(state: &AppState, id: i32) -> Result<context_version::Model, AppError> {
    context_version::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Version not found".into()))
}
