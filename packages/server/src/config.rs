use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use genai::{ModelTable, ProviderMode};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub signed_url_ttl_secs: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelsConfig {
    pub text_fast: String,
    pub text_quality: String,
    pub image_fast: String,
    pub image_quality: String,
    pub video_fast: String,
    pub video_quality: String,
    pub try_on: String,
}

impl ModelsConfig {
    pub fn table(&self) -> ModelTable {
        ModelTable {
            text_fast: self.text_fast.clone(),
            text_quality: self.text_quality.clone(),
            image_fast: self.image_fast.clone(),
            image_quality: self.image_quality.clone(),
            video_fast: self.video_fast.clone(),
            video_quality: self.video_quality.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// `direct` (public API, keyed) or `managed` (cloud project endpoint).
    pub mode: String,
    pub api_key: Option<String>,
    /// Direct-mode host override (proxies, test doubles).
    pub endpoint: Option<String>,
    pub project: Option<String>,
    pub location: String,
    pub access_token: Option<String>,
    pub models: ModelsConfig,
    pub poll_interval_secs: u64,
    /// Unset means poll until the job completes, matching provider guidance.
    pub poll_max_wait_secs: Option<u64>,
    pub locate_attempts: u32,
    pub locate_delay_secs: u64,
}

impl ProviderConfig {
    /// Resolve the provider strategy once, at startup.
    pub fn provider_mode(&self) -> Result<ProviderMode, ConfigError> {
        match self.mode.as_str() {
            "direct" => {
                let api_key = self.api_key.clone().ok_or_else(|| {
                    ConfigError::Message("provider.api_key is required in direct mode".into())
                })?;
                Ok(ProviderMode::DirectApi {
                    api_key,
                    endpoint: self.endpoint.clone(),
                })
            }
            "managed" => {
                let project = self.project.clone().ok_or_else(|| {
                    ConfigError::Message("provider.project is required in managed mode".into())
                })?;
                let access_token = self.access_token.clone().ok_or_else(|| {
                    ConfigError::Message("provider.access_token is required in managed mode".into())
                })?;
                Ok(ProviderMode::ManagedCloud {
                    project,
                    location: self.location.clone(),
                    access_token,
                })
            }
            other => Err(ConfigError::Message(format!(
                "provider.mode must be 'direct' or 'managed', got '{other}'"
            ))),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn poll_max_wait(&self) -> Option<Duration> {
        self.poll_max_wait_secs.map(Duration::from_secs)
    }

    pub fn locate_delay(&self) -> Duration {
        Duration::from_secs(self.locate_delay_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub provider: ProviderConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("storage.bucket", "creative-studio-assets")?
            .set_default("storage.region", "us-east-1")?
            .set_default("storage.signed_url_ttl_secs", 3600)?
            .set_default("provider.mode", "direct")?
            .set_default("provider.location", "us-central1")?
            .set_default("provider.models.text_fast", "gemini-2.5-flash")?
            .set_default("provider.models.text_quality", "gemini-2.5-pro")?
            .set_default("provider.models.image_fast", "gemini-2.5-flash-image")?
            .set_default(
                "provider.models.image_quality",
                "publishers/google/models/gemini-3-pro-image-preview",
            )?
            .set_default("provider.models.video_fast", "veo-3.1-fast-generate-preview")?
            .set_default("provider.models.video_quality", "veo-3.1-generate-preview")?
            .set_default("provider.models.try_on", "virtual-try-on-preview-08-04")?
            .set_default("provider.poll_interval_secs", 10)?
            .set_default("provider.locate_attempts", 10)?
            .set_default("provider.locate_delay_secs", 2)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., STUDIO__DATABASE__URL)
            .add_source(Environment::with_prefix("STUDIO").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(mode: &str) -> ProviderConfig {
        ProviderConfig {
            mode: mode.to_string(),
            api_key: None,
            endpoint: None,
            project: None,
            location: "us-central1".to_string(),
            access_token: None,
            models: ModelsConfig {
                text_fast: "t".into(),
                text_quality: "t".into(),
                image_fast: "i".into(),
                image_quality: "i".into(),
                video_fast: "v".into(),
                video_quality: "v".into(),
                try_on: "vto".into(),
            },
            poll_interval_secs: 10,
            poll_max_wait_secs: None,
            locate_attempts: 10,
            locate_delay_secs: 2,
        }
    }

    #[test]
    fn direct_mode_requires_api_key() {
        assert!(provider("direct").provider_mode().is_err());

        let mut cfg = provider("direct");
        cfg.api_key = Some("key".into());
        assert!(matches!(
            cfg.provider_mode(),
            Ok(ProviderMode::DirectApi { .. })
        ));
    }

    #[test]
    fn managed_mode_requires_project_and_token() {
        assert!(provider("managed").provider_mode().is_err());

        let mut cfg = provider("managed");
        cfg.project = Some("p".into());
        cfg.access_token = Some("t".into());
        assert!(matches!(
            cfg.provider_mode(),
            Ok(ProviderMode::ManagedCloud { .. })
        ));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(provider("hybrid").provider_mode().is_err());
    }
}
