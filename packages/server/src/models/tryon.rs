use serde::{Deserialize, Serialize};

#[derive(Serialize, utoipa::ToSchema)]
pub struct TryOnResponse {
    /// Storage key of the final composited image.
    pub key: String,
    /// Signed URL for immediate display.
    pub image_url: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SaveTryOnRequest {
    pub project_id: i32,
    /// Storage key returned by the try-on endpoint.
    pub key: String,
    #[serde(default)]
    pub prompt: Option<String>,
}
