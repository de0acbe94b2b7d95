use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "asset")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub project_id: i32,
    #[sea_orm(belongs_to, from = "project_id", to = "id")]
    pub project: HasOne<super::project::Entity>,

    /// One of: image, video, tryon.
    #[sea_orm(column_name = "type")]
    pub kind: String,

    /// Storage key of the underlying object, never a signed URL.
    /// Signed URLs expire; keys do not, and are resolved at read time.
    pub storage_key: String,

    /// Prompt that produced the asset, when known.
    pub prompt: Option<String>,
    pub model_type: Option<String>,
    pub context_version: Option<String>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
