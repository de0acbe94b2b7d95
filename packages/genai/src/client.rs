use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::GenaiError;
use crate::mode::{ProviderMode, requires_global_endpoint};
use crate::types::{
    Content, GenerateConfig, GenerateContentRequest, GenerateContentResponse, ImageConfig,
    Operation, VideoJobRequest,
};

/// Fixed interval between operation polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Quality/speed trade-off for model selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    #[default]
    Speed,
    Quality,
}

impl Quality {
    /// Parse the wire value; anything other than `quality` selects speed.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("quality") {
            Quality::Quality
        } else {
            Quality::Speed
        }
    }
}

/// The fixed set of named model variants, selectable by a quality flag or
/// overridden per call with an explicit model id.
#[derive(Debug, Clone)]
pub struct ModelTable {
    pub text_fast: String,
    pub text_quality: String,
    pub image_fast: String,
    pub image_quality: String,
    pub video_fast: String,
    pub video_quality: String,
}

impl Default for ModelTable {
    fn default() -> Self {
        Self {
            text_fast: "gemini-2.5-flash".to_string(),
            text_quality: "gemini-2.5-pro".to_string(),
            image_fast: "gemini-2.5-flash-image".to_string(),
            image_quality: "publishers/google/models/gemini-3-pro-image-preview".to_string(),
            video_fast: "veo-3.1-fast-generate-preview".to_string(),
            video_quality: "veo-3.1-generate-preview".to_string(),
        }
    }
}

impl ModelTable {
    pub fn text_model(&self, quality: Quality) -> &str {
        match quality {
            Quality::Speed => &self.text_fast,
            Quality::Quality => &self.text_quality,
        }
    }

    /// Explicit model id wins over the quality flag.
    pub fn image_model<'a>(&'a self, explicit: Option<&'a str>, quality: Quality) -> &'a str {
        if let Some(model) = explicit
            && !model.trim().is_empty()
        {
            return model;
        }
        match quality {
            Quality::Speed => &self.image_fast,
            Quality::Quality => &self.image_quality,
        }
    }

    pub fn video_model(&self, quality: Quality) -> &str {
        match quality {
            Quality::Speed => &self.video_fast,
            Quality::Quality => &self.video_quality,
        }
    }
}

/// Generation config appropriate for an image model.
///
/// The preview-tier variant requires a wider config shape: explicit
/// response modalities, a raised token ceiling, and image sizing.
pub fn image_generate_config(model: &str, aspect_ratio: &str) -> Option<GenerateConfig> {
    if !requires_global_endpoint(model) {
        return None;
    }
    Some(GenerateConfig {
        temperature: Some(1.0),
        top_p: Some(0.95),
        max_output_tokens: Some(32_768),
        response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
        image_config: Some(ImageConfig {
            aspect_ratio: aspect_ratio.to_string(),
            image_size: "1K".to_string(),
            output_mime_type: "image/png".to_string(),
        }),
        ..Default::default()
    })
}

/// Long-lived, stateless client for the generative provider.
///
/// Constructed once at startup and shared behind an `Arc`; safe to use from
/// concurrent request tasks.
pub struct GenerativeClient {
    http: reqwest::Client,
    mode: ProviderMode,
    models: ModelTable,
    poll_interval: Duration,
    poll_max_wait: Option<Duration>,
}

impl GenerativeClient {
    pub fn new(mode: ProviderMode, models: ModelTable) -> Self {
        Self {
            http: reqwest::Client::new(),
            mode,
            models,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_max_wait: None,
        }
    }

    pub fn with_polling(mut self, interval: Duration, max_wait: Option<Duration>) -> Self {
        self.poll_interval = interval;
        self.poll_max_wait = max_wait;
        self
    }

    pub fn models(&self) -> &ModelTable {
        &self.models
    }

    pub fn mode(&self) -> &ProviderMode {
        &self.mode
    }

    /// Synchronous multimodal call.
    #[instrument(skip(self, contents, config), fields(model))]
    pub async fn generate(
        &self,
        model: &str,
        contents: Vec<Content>,
        system_instruction: Option<Content>,
        config: Option<GenerateConfig>,
    ) -> Result<GenerateContentResponse, GenaiError> {
        let request = GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: config,
            tools: None,
        };
        let url = self.mode.generate_url(model);
        self.post_json(&url, &request).await
    }

    /// Synchronous call with provider-side tools attached. Structured JSON
    /// response types are unsupported alongside tools, so callers parse the
    /// text reply themselves.
    #[instrument(skip(self, contents, tools), fields(model))]
    pub async fn generate_with_tools(
        &self,
        model: &str,
        contents: Vec<Content>,
        tools: Vec<crate::types::Tool>,
    ) -> Result<GenerateContentResponse, GenaiError> {
        let request = GenerateContentRequest {
            contents,
            system_instruction: None,
            generation_config: None,
            tools: Some(tools),
        };
        let url = self.mode.generate_url(model);
        self.post_json(&url, &request).await
    }

    /// Text-only convenience over [`generate`](Self::generate).
    pub async fn generate_text(
        &self,
        model: &str,
        contents: Vec<Content>,
        system_instruction: Option<Content>,
        config: Option<GenerateConfig>,
    ) -> Result<String, GenaiError> {
        let response = self
            .generate(model, contents, system_instruction, config)
            .await?;
        Ok(response.text()?.trim().to_string())
    }

    /// Generate and parse a JSON reply, tolerating Markdown code fences.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        model: &str,
        contents: Vec<Content>,
        config: Option<GenerateConfig>,
    ) -> Result<T, GenaiError> {
        let text = self.generate_text(model, contents, None, config).await?;
        Ok(serde_json::from_str(strip_code_fences(&text))?)
    }

    /// Submit a long-running video job and return its operation handle.
    #[instrument(skip(self, request), fields(model))]
    pub async fn start_video_job(
        &self,
        model: &str,
        request: &VideoJobRequest,
    ) -> Result<Operation, GenaiError> {
        let url = self.mode.video_job_url(model);
        self.post_json(&url, request).await
    }

    /// Composite one garment onto a person image, returning the new image.
    #[instrument(skip(self, person, garment), fields(model))]
    pub async fn try_on(
        &self,
        model: &str,
        person: crate::types::MediaRef,
        garment: crate::types::MediaRef,
    ) -> Result<Vec<u8>, GenaiError> {
        let request = crate::types::RecontextRequest::try_on(person, garment);
        let url = self.mode.predict_url(model);
        let response: crate::types::PredictResponse = self.post_json(&url, &request).await?;
        response.first_image_bytes()
    }

    /// Re-fetch a long-running operation by name.
    pub async fn fetch_operation(&self, name: &str) -> Result<Operation, GenaiError> {
        let url = self.mode.operation_url(name);
        let response = self
            .mode
            .apply_auth(self.http.get(&url))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Poll `operation` at the configured fixed interval until it is done,
    /// then surface any provider-reported error.
    pub async fn await_video_job(&self, operation: Operation) -> Result<Operation, GenaiError> {
        poll_until_done(
            operation,
            |name| async move { self.fetch_operation(&name).await },
            self.poll_interval,
            self.poll_max_wait,
        )
        .await
    }

    /// Download job output from a fetchable URI, attaching the provider
    /// API key when the URI belongs to the provider's domain.
    pub async fn download_uri(&self, uri: &str) -> Result<Vec<u8>, GenaiError> {
        let mut request = self.http.get(uri);
        if let Some(api_key) = self.mode.download_api_key(uri) {
            request = request.header("x-goog-api-key", api_key);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(GenaiError::Provider(format!(
                "download of {uri} failed with status {}",
                response.status()
            )));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, GenaiError> {
        let response = self
            .mode
            .apply_auth(self.http.post(url).json(body))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GenaiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenaiError::Provider(format!("{status}: {body}")));
        }
        Ok(response.json().await?)
    }
}

/// Drive an operation to its terminal state.
///
/// Sleeps the fixed `interval`, re-fetches via `fetch`, and repeats until
/// the operation reports done. A provider-reported error on the completed
/// operation fails the job with the provider's message verbatim. `max_wait`
/// bounds the total wait when set; when unset the poll runs until the
/// process ends, matching the provider's own guidance for these jobs.
pub async fn poll_until_done<F, Fut>(
    mut operation: Operation,
    mut fetch: F,
    interval: Duration,
    max_wait: Option<Duration>,
) -> Result<Operation, GenaiError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Operation, GenaiError>>,
{
    let started = tokio::time::Instant::now();
    while !operation.done {
        if let Some(limit) = max_wait
            && started.elapsed() >= limit
        {
            return Err(GenaiError::Timeout {
                operation: operation.name,
                waited: started.elapsed(),
            });
        }
        tokio::time::sleep(interval).await;
        debug!(operation = %operation.name, "polling video operation");
        operation = fetch(operation.name.clone()).await?;
    }

    if let Some(error) = operation.error {
        return Err(GenaiError::Provider(error.message));
    }
    Ok(operation)
}

/// Strip Markdown code fences from a model reply before JSON parsing.
pub fn strip_code_fences(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::types::OperationError;

    fn pending(name: &str) -> Operation {
        serde_json::from_value(serde_json::json!({"name": name})).unwrap()
    }

    fn done(name: &str) -> Operation {
        serde_json::from_value(serde_json::json!({"name": name, "done": true, "response": {}}))
            .unwrap()
    }

    #[test]
    fn strip_code_fences_variants() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n[1,2]\n```"), "[1,2]");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn quality_parsing_defaults_to_speed() {
        assert_eq!(Quality::parse("quality"), Quality::Quality);
        assert_eq!(Quality::parse("QUALITY"), Quality::Quality);
        assert_eq!(Quality::parse("speed"), Quality::Speed);
        assert_eq!(Quality::parse("anything"), Quality::Speed);
    }

    #[test]
    fn explicit_model_overrides_quality_flag() {
        let table = ModelTable::default();
        assert_eq!(
            table.image_model(Some("custom-image-model"), Quality::Quality),
            "custom-image-model"
        );
        assert_eq!(table.image_model(None, Quality::Speed), "gemini-2.5-flash-image");
        assert_eq!(
            table.image_model(Some("  "), Quality::Quality),
            "publishers/google/models/gemini-3-pro-image-preview"
        );
        assert_eq!(table.video_model(Quality::Quality), "veo-3.1-generate-preview");
    }

    #[test]
    fn preview_image_model_gets_widened_config() {
        let config =
            image_generate_config("publishers/google/models/gemini-3-pro-image-preview", "1:1")
                .expect("preview model config");
        assert_eq!(config.max_output_tokens, Some(32_768));
        assert_eq!(
            config.response_modalities.as_deref(),
            Some(&["TEXT".to_string(), "IMAGE".to_string()][..])
        );
        let image = config.image_config.unwrap();
        assert_eq!(image.aspect_ratio, "1:1");
        assert_eq!(image.image_size, "1K");

        assert!(image_generate_config("gemini-2.5-flash-image", "1:1").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn poll_until_done_reaches_completion() {
        let responses = RefCell::new(vec![done("op"), pending("op"), pending("op")]);
        let fetches = RefCell::new(0u32);

        let result = poll_until_done(
            pending("op"),
            |_name| {
                *fetches.borrow_mut() += 1;
                let op = responses.borrow_mut().pop().unwrap();
                async move { Ok(op) }
            },
            Duration::from_secs(10),
            None,
        )
        .await
        .unwrap();

        assert!(result.done);
        assert_eq!(*fetches.borrow(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn completed_operation_with_error_fails_verbatim() {
        let result = poll_until_done(
            pending("op"),
            |name| async move {
                Ok(Operation {
                    name,
                    done: true,
                    error: Some(OperationError {
                        code: Some(13),
                        message: "Video generation failed: safety filters".to_string(),
                    }),
                    response: None,
                })
            },
            Duration::from_secs(10),
            None,
        )
        .await;

        match result {
            Err(GenaiError::Provider(message)) => {
                assert_eq!(message, "Video generation failed: safety filters");
            }
            other => panic!("expected Provider error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn max_wait_bounds_the_poll() {
        let result = poll_until_done(
            pending("op"),
            |name| async move { Ok(pending(&name)) },
            Duration::from_secs(10),
            Some(Duration::from_secs(35)),
        )
        .await;

        assert!(matches!(result, Err(GenaiError::Timeout { .. })));
    }

    #[tokio::test]
    async fn already_done_operation_never_fetches() {
        let fetches = RefCell::new(0u32);
        let result = poll_until_done(
            done("op"),
            |name| {
                *fetches.borrow_mut() += 1;
                async move { Ok(pending(&name)) }
            },
            Duration::from_secs(10),
            None,
        )
        .await
        .unwrap();
        assert!(result.done);
        assert_eq!(*fetches.borrow(), 0);
    }
}
