use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::validate_batch_count;

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

fn default_quality() -> String {
    "speed".to_string()
}

fn default_num_videos() -> u32 {
    1
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct GenerateVideosRequest {
    pub prompt: String,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    /// `speed` or `quality`.
    #[serde(default = "default_quality")]
    pub quality: String,
    #[serde(default = "default_num_videos")]
    pub num_videos: u32,
    /// Optional brand guidelines appended to the prompt.
    pub context: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct VideoArtifact {
    /// Canonical storage key of the generated video.
    pub key: String,
    /// Signed URL for immediate playback.
    pub video_url: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct GenerateVideosResponse {
    pub videos: Vec<VideoArtifact>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ScriptRequest {
    pub prompt: String,
    pub context: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ScriptEditRequest {
    /// The current script, as returned by the script endpoint.
    pub current_script: serde_json::Value,
    pub instructions: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SaveVideoRequest {
    pub project_id: i32,
    /// Storage key returned by a generation endpoint.
    pub key: String,
    pub prompt: String,
    pub model_type: Option<String>,
    pub context_version: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SaveAssetResponse {
    pub asset_id: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct OptimizedMotionPromptResponse {
    pub optimized_prompt: String,
}

pub fn validate_generate_videos(req: &GenerateVideosRequest) -> Result<(), AppError> {
    if req.prompt.trim().is_empty() {
        return Err(AppError::Validation("Prompt must not be empty".into()));
    }
    validate_batch_count(req.num_videos, "num_videos")
}
