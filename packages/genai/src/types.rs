//! Serde models of the provider wire contract.
//!
//! Only the fields this system reads or writes are modeled; everything else
//! the provider returns is ignored.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::error::GenaiError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerateConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

/// Provider-side tool attachment. Only web-search grounding is used.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_search: serde_json::Value,
}

impl Tool {
    pub fn web_search() -> Self {
        Self {
            google_search: serde_json::json!({}),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// Inline binary payload, base64-encoded on the wire.
    pub fn inline(data: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: BASE64.encode(data),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

impl GenerateConfig {
    pub fn json() -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            ..Default::default()
        }
    }

    pub fn json_with_schema(schema: serde_json::Value) -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: String,
    pub image_size: String,
    pub output_mime_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// First inline binary part of the first candidate, decoded.
    ///
    /// Absence of candidates, content, or a binary part is a `NoOutput`
    /// error carrying any model-reported finish reason.
    pub fn first_inline_data(&self) -> Result<Vec<u8>, GenaiError> {
        let Some(candidate) = self.candidates.first() else {
            return Err(GenaiError::NoOutput {
                finish_reason: "no candidates".to_string(),
            });
        };
        let finish_reason = candidate
            .finish_reason
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        let Some(content) = &candidate.content else {
            return Err(GenaiError::NoOutput { finish_reason });
        };
        for part in &content.parts {
            if let Some(inline) = &part.inline_data {
                return BASE64
                    .decode(&inline.data)
                    .map_err(|e| GenaiError::Provider(format!("undecodable inline data: {e}")));
            }
        }
        Err(GenaiError::NoOutput { finish_reason })
    }

    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Result<String, GenaiError> {
        let Some(candidate) = self.candidates.first() else {
            return Err(GenaiError::NoOutput {
                finish_reason: "no candidates".to_string(),
            });
        };
        let finish_reason = candidate
            .finish_reason
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        let Some(content) = &candidate.content else {
            return Err(GenaiError::NoOutput { finish_reason });
        };
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            return Err(GenaiError::NoOutput { finish_reason });
        }
        Ok(text)
    }
}

/// Handle for an in-progress long-running job, polled until terminal.
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    pub error: Option<OperationError>,
    pub response: Option<VideoOperationResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationError {
    pub code: Option<i32>,
    pub message: String,
}

/// Terminal result payload of a video job.
///
/// The two provider modes report results in different envelopes; both are
/// modeled and `first_video_uri` scans them in order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoOperationResult {
    pub generate_video_response: Option<GenerateVideoResponse>,
    #[serde(default)]
    pub videos: Vec<GeneratedVideo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedSample {
    pub video: Option<VideoRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoRef {
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedVideo {
    pub uri: Option<String>,
    pub gcs_uri: Option<String>,
}

impl Operation {
    /// URI of the first generated video, whichever envelope carried it.
    pub fn first_video_uri(&self) -> Option<String> {
        let result = self.response.as_ref()?;
        if let Some(response) = &result.generate_video_response {
            for sample in &response.generated_samples {
                if let Some(uri) = sample.video.as_ref().and_then(|v| v.uri.clone()) {
                    return Some(uri);
                }
            }
        }
        for video in &result.videos {
            if let Some(uri) = video.gcs_uri.clone().or_else(|| video.uri.clone()) {
                return Some(uri);
            }
        }
        None
    }
}

/// Request body for a long-running video job.
#[derive(Debug, Clone, Serialize)]
pub struct VideoJobRequest {
    pub instances: Vec<VideoInstance>,
    pub parameters: VideoParameters,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInstance {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_frame: Option<MediaRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<MediaRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_images: Option<Vec<ReferenceImage>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceImage {
    pub image: MediaRef,
    pub reference_type: String,
}

impl ReferenceImage {
    pub fn asset(image: MediaRef) -> Self {
        Self {
            image,
            reference_type: "asset".to_string(),
        }
    }
}

/// Media input, either inline bytes or a key in the caller's bucket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcs_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_base64_encoded: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl MediaRef {
    pub fn bytes(data: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            gcs_uri: None,
            bytes_base64_encoded: Some(BASE64.encode(data)),
            mime_type: Some(mime_type.into()),
        }
    }

    pub fn object_uri(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            gcs_uri: Some(uri.into()),
            bytes_base64_encoded: None,
            mime_type: Some(mime_type.into()),
        }
    }
}

/// Request body for image recontextualization (virtual try-on).
#[derive(Debug, Clone, Serialize)]
pub struct RecontextRequest {
    pub instances: Vec<RecontextInstance>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecontextInstance {
    pub person_image: RecontextImage,
    pub product_images: Vec<RecontextProduct>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecontextImage {
    pub image: MediaRef,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecontextProduct {
    pub product_image: RecontextImage,
}

impl RecontextRequest {
    pub fn try_on(person: MediaRef, garment: MediaRef) -> Self {
        Self {
            instances: vec![RecontextInstance {
                person_image: RecontextImage { image: person },
                product_images: vec![RecontextProduct {
                    product_image: RecontextImage { image: garment },
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub bytes_base64_encoded: Option<String>,
    pub mime_type: Option<String>,
}

impl PredictResponse {
    /// Bytes of the first generated image.
    pub fn first_image_bytes(&self) -> Result<Vec<u8>, GenaiError> {
        let Some(prediction) = self.predictions.first() else {
            return Err(GenaiError::NoOutput {
                finish_reason: "no predictions".to_string(),
            });
        };
        let Some(encoded) = &prediction.bytes_base64_encoded else {
            return Err(GenaiError::NoOutput {
                finish_reason: "prediction without image bytes".to_string(),
            });
        };
        BASE64
            .decode(encoded)
            .map_err(|e| GenaiError::Provider(format!("undecodable prediction bytes: {e}")))
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_count: Option<u32>,
    /// Bucket destination for output, managed mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_uri: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_data_extraction() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here is your image."},
                        {"inlineData": {"mimeType": "image/png", "data": BASE64.encode(b"png-bytes")}}
                    ]
                },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        assert_eq!(response.first_inline_data().unwrap(), b"png-bytes");
    }

    #[test]
    fn missing_candidates_reports_no_output() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({})).unwrap();
        match response.first_inline_data() {
            Err(GenaiError::NoOutput { finish_reason }) => {
                assert_eq!(finish_reason, "no candidates");
            }
            other => panic!("expected NoOutput, got {other:?}"),
        }
    }

    #[test]
    fn missing_content_carries_finish_reason() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        match response.first_inline_data() {
            Err(GenaiError::NoOutput { finish_reason }) => assert_eq!(finish_reason, "SAFETY"),
            other => panic!("expected NoOutput, got {other:?}"),
        }
    }

    #[test]
    fn text_only_response_has_no_inline_data() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": "just words"}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert!(matches!(
            response.first_inline_data(),
            Err(GenaiError::NoOutput { .. })
        ));
        assert_eq!(response.text().unwrap(), "just words");
    }

    #[test]
    fn video_uri_from_direct_api_envelope() {
        let op: Operation = serde_json::from_value(serde_json::json!({
            "name": "operations/abc",
            "done": true,
            "response": {
                "generateVideoResponse": {
                    "generatedSamples": [
                        {"video": {"uri": "https://generativelanguage.googleapis.com/v1beta/files/x:download"}}
                    ]
                }
            }
        }))
        .unwrap();
        assert_eq!(
            op.first_video_uri().unwrap(),
            "https://generativelanguage.googleapis.com/v1beta/files/x:download"
        );
    }

    #[test]
    fn video_uri_from_managed_envelope() {
        let op: Operation = serde_json::from_value(serde_json::json!({
            "name": "projects/p/locations/l/operations/1",
            "done": true,
            "response": {
                "videos": [{"gcsUri": "gs://bucket/generated_videos/a.mp4"}]
            }
        }))
        .unwrap();
        assert_eq!(
            op.first_video_uri().unwrap(),
            "gs://bucket/generated_videos/a.mp4"
        );
    }

    #[test]
    fn pending_operation_has_no_uri() {
        let op: Operation = serde_json::from_value(serde_json::json!({
            "name": "operations/pending"
        }))
        .unwrap();
        assert!(!op.done);
        assert_eq!(op.first_video_uri(), None);
    }
}
