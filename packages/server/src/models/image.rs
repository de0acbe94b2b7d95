use serde::{Deserialize, Serialize};

#[derive(Serialize, utoipa::ToSchema)]
pub struct GeneratedImage {
    /// Storage key of the uploaded result.
    pub key: String,
    /// Signed URL for immediate display.
    pub url: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct GenerateImagesResponse {
    pub images: Vec<GeneratedImage>,
}

/// Edited image payloads, base64-encoded. Edits are returned inline so the
/// client can iterate before an explicit save.
#[derive(Serialize, utoipa::ToSchema)]
pub struct EditImageResponse {
    pub image_data: Vec<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SaveImageRequest {
    /// Base64 image payload. Exactly one of this or `image_url` is required.
    pub image_data: Option<String>,
    /// URL to download the image from instead.
    pub image_url: Option<String>,
    pub project_id: i32,
    #[serde(default)]
    pub prompt: Option<String>,
    pub model_type: Option<String>,
    pub context_version: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SaveImageResponse {
    pub asset_id: i32,
    pub key: String,
    pub image_url: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct OptimizePromptRequest {
    pub prompt: String,
    pub model_name: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct OptimizePromptResponse {
    pub optimized_prompt: String,
}
