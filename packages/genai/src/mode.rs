use reqwest::RequestBuilder;

/// How requests reach the generative provider.
///
/// Chosen once from configuration at startup and injected into the client;
/// call sites never re-check a mode flag.
#[derive(Debug, Clone)]
pub enum ProviderMode {
    /// Public API host, authenticated with an API key. Media moves inline
    /// and video output is fetched back over HTTPS. `endpoint` overrides
    /// the default host (proxies, test doubles).
    DirectApi {
        api_key: String,
        endpoint: Option<String>,
    },

    /// Region-scoped managed endpoint, authenticated with a bearer token.
    /// Video jobs write their output into the caller's bucket.
    ManagedCloud {
        project: String,
        location: String,
        access_token: String,
    },
}

const DIRECT_API_HOST: &str = "https://generativelanguage.googleapis.com/v1beta";

impl ProviderMode {
    /// URL for a synchronous `generateContent` call.
    ///
    /// Preview image models are only served from the `global` managed
    /// region; `location_for` reroutes them there.
    pub fn generate_url(&self, model: &str) -> String {
        match self {
            ProviderMode::DirectApi { .. } => {
                format!("{}/models/{model}:generateContent", self.direct_host())
            }
            ProviderMode::ManagedCloud { project, .. } => {
                let location = self.location_for(model);
                format!(
                    "{}/v1/projects/{project}/locations/{location}/{}:generateContent",
                    Self::managed_host(&location),
                    Self::model_path(model),
                )
            }
        }
    }

    /// URL for submitting a long-running video job.
    pub fn video_job_url(&self, model: &str) -> String {
        match self {
            ProviderMode::DirectApi { .. } => {
                format!("{}/models/{model}:predictLongRunning", self.direct_host())
            }
            ProviderMode::ManagedCloud { project, .. } => {
                let location = self.location_for(model);
                format!(
                    "{}/v1/projects/{project}/locations/{location}/{}:predictLongRunning",
                    Self::managed_host(&location),
                    Self::model_path(model),
                )
            }
        }
    }

    /// URL for a synchronous `predict` call (image recontextualization).
    pub fn predict_url(&self, model: &str) -> String {
        match self {
            ProviderMode::DirectApi { .. } => {
                format!("{}/models/{model}:predict", self.direct_host())
            }
            ProviderMode::ManagedCloud { project, .. } => {
                let location = self.location_for(model);
                format!(
                    "{}/v1/projects/{project}/locations/{location}/{}:predict",
                    Self::managed_host(&location),
                    Self::model_path(model),
                )
            }
        }
    }

    /// URL for fetching a long-running operation by its resource name.
    pub fn operation_url(&self, name: &str) -> String {
        match self {
            ProviderMode::DirectApi { .. } => format!("{}/{name}", self.direct_host()),
            ProviderMode::ManagedCloud { location, .. } => {
                format!("{}/v1/{name}", Self::managed_host(location))
            }
        }
    }

    /// Attach this mode's credentials to a provider request.
    pub fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            ProviderMode::DirectApi { api_key, .. } => request.header("x-goog-api-key", api_key),
            ProviderMode::ManagedCloud { access_token, .. } => request.bearer_auth(access_token),
        }
    }

    /// Destination URI for a video job's output, when this mode supports
    /// bucket-directed output. Direct-API jobs return fetchable URIs
    /// instead.
    pub fn video_output_uri(&self, bucket: &str, key: &str) -> Option<String> {
        match self {
            ProviderMode::DirectApi { .. } => None,
            ProviderMode::ManagedCloud { .. } => Some(format!("gs://{bucket}/{key}")),
        }
    }

    /// API key to attach when downloading output from a provider-owned
    /// host, if this mode authenticates downloads that way.
    pub fn download_api_key(&self, uri: &str) -> Option<&str> {
        match self {
            ProviderMode::DirectApi { api_key, .. } if uri.contains("googleapis.com") => {
                Some(api_key)
            }
            _ => None,
        }
    }

    fn direct_host(&self) -> &str {
        match self {
            ProviderMode::DirectApi {
                endpoint: Some(endpoint),
                ..
            } => endpoint,
            _ => DIRECT_API_HOST,
        }
    }

    fn location_for(&self, model: &str) -> String {
        match self {
            ProviderMode::ManagedCloud { location, .. } => {
                if requires_global_endpoint(model) {
                    "global".to_string()
                } else {
                    location.clone()
                }
            }
            ProviderMode::DirectApi { .. } => String::new(),
        }
    }

    fn managed_host(location: &str) -> String {
        if location == "global" {
            "https://aiplatform.googleapis.com".to_string()
        } else {
            format!("https://{location}-aiplatform.googleapis.com")
        }
    }

    /// Managed endpoints address models by publisher path.
    fn model_path(model: &str) -> String {
        if model.starts_with("publishers/") {
            model.to_string()
        } else {
            format!("publishers/google/models/{model}")
        }
    }
}

/// Preview-tier image models are only served from the global region.
pub fn requires_global_endpoint(model: &str) -> bool {
    model.contains("pro-image")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn managed() -> ProviderMode {
        ProviderMode::ManagedCloud {
            project: "demo-project".into(),
            location: "us-central1".into(),
            access_token: "token".into(),
        }
    }

    #[test]
    fn direct_api_generate_url() {
        let mode = ProviderMode::DirectApi {
            api_key: "k".into(),
            endpoint: None,
        };
        assert_eq!(
            mode.generate_url("gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn direct_api_endpoint_override() {
        let mode = ProviderMode::DirectApi {
            api_key: "k".into(),
            endpoint: Some("http://127.0.0.1:4010".into()),
        };
        assert_eq!(
            mode.generate_url("gemini-2.5-flash"),
            "http://127.0.0.1:4010/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            mode.operation_url("operations/abc"),
            "http://127.0.0.1:4010/operations/abc"
        );
    }

    #[test]
    fn managed_generate_url_expands_model_path() {
        assert_eq!(
            managed().generate_url("gemini-2.5-flash"),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/demo-project/locations/us-central1/publishers/google/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn preview_image_model_routes_to_global_endpoint() {
        let url = managed().generate_url("publishers/google/models/gemini-3-pro-image-preview");
        assert!(url.starts_with("https://aiplatform.googleapis.com/v1/"));
        assert!(url.contains("/locations/global/"));
        // Already-qualified model paths are not re-prefixed.
        assert!(url.contains("/publishers/google/models/gemini-3-pro-image-preview:"));
    }

    #[test]
    fn output_uri_only_in_managed_mode() {
        let direct = ProviderMode::DirectApi {
            api_key: "k".into(),
            endpoint: None,
        };
        assert_eq!(direct.video_output_uri("bucket", "out/a.mp4"), None);
        assert_eq!(
            managed().video_output_uri("bucket", "out/a.mp4").unwrap(),
            "gs://bucket/out/a.mp4"
        );
    }

    #[test]
    fn download_key_only_for_provider_hosts() {
        let direct = ProviderMode::DirectApi {
            api_key: "k".into(),
            endpoint: None,
        };
        assert_eq!(
            direct.download_api_key("https://generativelanguage.googleapis.com/v1beta/files/x"),
            Some("k")
        );
        assert_eq!(direct.download_api_key("https://example.com/x.mp4"), None);
        assert_eq!(managed().download_api_key("https://generativelanguage.googleapis.com/f"), None);
    }
}
