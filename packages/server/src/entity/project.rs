use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub description: Option<String>,
    /// Overall creative-direction text used to condition generation prompts.
    pub context: Option<String>,

    // Brand core descriptor.
    pub brand_vibe: Option<String>,
    pub brand_lighting: Option<String>,
    pub brand_colors: Option<String>,
    pub brand_subject: Option<String>,

    // Project-specific descriptor.
    pub project_vibe: Option<String>,
    pub project_lighting: Option<String>,
    pub project_colors: Option<String>,
    pub project_subject: Option<String>,

    #[sea_orm(has_many)]
    pub assets: HasMany<super::asset::Entity>,

    #[sea_orm(has_many)]
    pub context_versions: HasMany<super::context_version::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
