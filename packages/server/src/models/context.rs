use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::context_version;
use crate::error::AppError;

use super::shared::validate_name;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct GenerateContextRequest {
    pub goal: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct EnhanceFieldRequest {
    pub current_value: String,
    pub field_name: String,
    pub instructions: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AnalyzeBrandRequest {
    pub brand_name: String,
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct SynthesizeRequest {
    #[serde(default)]
    pub brand_vibe: String,
    #[serde(default)]
    pub brand_lighting: String,
    #[serde(default)]
    pub brand_colors: String,
    #[serde(default)]
    pub brand_subject: String,
    #[serde(default)]
    pub project_vibe: String,
    #[serde(default)]
    pub project_lighting: String,
    #[serde(default)]
    pub project_colors: String,
    #[serde(default)]
    pub project_subject: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct PromptInsightRequest {
    pub prompt_text: String,
}

/// Descriptor fields shared by version create and update payloads.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct ContextVersionFields {
    pub name: String,
    pub description: Option<String>,

    pub brand_vibe: Option<String>,
    pub brand_lighting: Option<String>,
    pub brand_colors: Option<String>,
    pub brand_subject: Option<String>,

    pub project_vibe: Option<String>,
    pub project_lighting: Option<String>,
    pub project_colors: Option<String>,
    pub project_subject: Option<String>,

    pub context: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateContextVersionRequest {
    pub project_id: i32,
    #[serde(flatten)]
    pub fields: ContextVersionFields,
}

/// Partial update; absent fields are left unchanged. Last write wins.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateContextVersionRequest {
    pub name: Option<String>,
    pub description: Option<String>,

    pub brand_vibe: Option<String>,
    pub brand_lighting: Option<String>,
    pub brand_colors: Option<String>,
    pub brand_subject: Option<String>,

    pub project_vibe: Option<String>,
    pub project_lighting: Option<String>,
    pub project_colors: Option<String>,
    pub project_subject: Option<String>,

    pub context: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContextVersionResponse {
    pub id: i32,
    pub project_id: i32,
    pub name: String,
    pub description: Option<String>,

    pub brand_vibe: Option<String>,
    pub brand_lighting: Option<String>,
    pub brand_colors: Option<String>,
    pub brand_subject: Option<String>,

    pub project_vibe: Option<String>,
    pub project_lighting: Option<String>,
    pub project_colors: Option<String>,
    pub project_subject: Option<String>,

    pub context: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<context_version::Model> for ContextVersionResponse {
    fn from(m: context_version::Model) -> Self {
        Self {
            id: m.id,
            project_id: m.project_id,
            name: m.name,
            description: m.description,
            brand_vibe: m.brand_vibe,
            brand_lighting: m.brand_lighting,
            brand_colors: m.brand_colors,
            brand_subject: m.brand_subject,
            project_vibe: m.project_vibe,
            project_lighting: m.project_lighting,
            project_colors: m.project_colors,
            project_subject: m.project_subject,
            context: m.context,
            created_at: m.created_at,
        }
    }
}

pub fn validate_create_version(req: &CreateContextVersionRequest) -> Result<(), AppError> {
    validate_name(&req.fields.name)
}
