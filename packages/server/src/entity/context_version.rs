use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Named snapshot of a project's creative-direction descriptor.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "context_version")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub project_id: i32,
    #[sea_orm(belongs_to, from = "project_id", to = "id")]
    pub project: HasOne<super::project::Entity>,

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

    /// Synthesized overall context text.
    pub context: Option<String>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
