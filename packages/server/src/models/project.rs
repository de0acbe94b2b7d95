use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use super::asset::AssetResponse;
use super::shared::{Pagination, validate_name};
use crate::entity::project;
use crate::error::AppError;

/// Creative-direction descriptor fields shared by create and update.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct ProjectFields {
    pub name: String,
    pub description: Option<String>,
    pub context: Option<String>,

    pub brand_vibe: Option<String>,
    pub brand_lighting: Option<String>,
    pub brand_colors: Option<String>,
    pub brand_subject: Option<String>,

    pub project_vibe: Option<String>,
    pub project_lighting: Option<String>,
    pub project_colors: Option<String>,
    pub project_subject: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProjectResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub context: Option<String>,

    pub brand_vibe: Option<String>,
    pub brand_lighting: Option<String>,
    pub brand_colors: Option<String>,
    pub brand_subject: Option<String>,

    pub project_vibe: Option<String>,
    pub project_lighting: Option<String>,
    pub project_colors: Option<String>,
    pub project_subject: Option<String>,

    pub created_at: DateTime<Utc>,
    /// Child assets with freshly signed URLs; populated on detail reads.
    pub assets: Vec<AssetResponse>,
}

impl ProjectResponse {
    pub fn from_model(m: project::Model, assets: Vec<AssetResponse>) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            context: m.context,
            brand_vibe: m.brand_vibe,
            brand_lighting: m.brand_lighting,
            brand_colors: m.brand_colors,
            brand_subject: m.brand_subject,
            project_vibe: m.project_vibe,
            project_lighting: m.project_lighting,
            project_colors: m.project_colors,
            project_subject: m.project_subject,
            created_at: m.created_at,
            assets,
        }
    }
}

#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct ProjectListItem {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProjectListResponse {
    pub data: Vec<ProjectListItem>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ProjectListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

pub fn validate_project_fields(req: &ProjectFields) -> Result<(), AppError> {
    validate_name(&req.name)
}
