use chrono::{DateTime, Utc};
use common::storage::{ObjectStore, StorageError};
use serde::Serialize;

use crate::entity::asset;

#[derive(Serialize, utoipa::ToSchema)]
pub struct AssetResponse {
    pub id: i32,
    pub project_id: i32,
    #[serde(rename = "type")]
    pub kind: String,
    /// Freshly signed download URL, recomputed on every read.
    pub url: String,
    pub prompt: Option<String>,
    pub model_type: Option<String>,
    pub context_version: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AssetResponse {
    /// Project an asset row, resolving its storage key to a signed URL.
    pub async fn from_model(
        m: asset::Model,
        store: &dyn ObjectStore,
    ) -> Result<Self, StorageError> {
        let url = store.signed_url(&m.storage_key).await?;
        Ok(Self {
            id: m.id,
            project_id: m.project_id,
            kind: m.kind,
            url,
            prompt: m.prompt,
            model_type: m.model_type,
            context_version: m.context_version,
            created_at: m.created_at,
        })
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AssetListResponse {
    pub assets: Vec<AssetResponse>,
    pub total: u64,
}
