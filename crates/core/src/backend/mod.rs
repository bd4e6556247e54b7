//! Generative-model backends.
//!
//! Every provider implements [`ModelBackend`]; the pipeline never knows which
//! one it talks to.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::{Result, ScholarSyncError},
    provider::Provider,
};

pub mod gemini;
pub mod huggingface;
pub mod local;

pub use gemini::GeminiBackend;
pub use huggingface::HuggingFaceBackend;
pub use local::LocalBackend;

#[async_trait]
pub trait ModelBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Send a prompt and return the raw model text. `schema` is a hint that
    /// backends without structured output may ignore.
    async fn generate(&self, prompt: &str, schema: Option<&Value>) -> Result<String>;

    /// Whether the backend can serve requests right now.
    async fn is_available(&self) -> bool {
        true
    }
}

/// Use `primary` when it reports itself available, otherwise `fallback`.
pub struct FallbackBackend {
    primary: Arc<dyn ModelBackend>,
    fallback: Arc<dyn ModelBackend>,
}

impl FallbackBackend {
    pub fn new(primary: Arc<dyn ModelBackend>, fallback: Arc<dyn ModelBackend>) -> Self {
        Self { primary, fallback }
    }

    async fn select(&self) -> &Arc<dyn ModelBackend> {
        if self.primary.is_available().await {
            &self.primary
        } else {
            tracing::info!(
                primary = self.primary.name(),
                fallback = self.fallback.name(),
                "primary backend unavailable, using fallback"
            );
            &self.fallback
        }
    }
}

#[async_trait]
impl ModelBackend for FallbackBackend {
    fn name(&self) -> &str {
        self.primary.name()
    }

    async fn generate(&self, prompt: &str, schema: Option<&Value>) -> Result<String> {
        self.select().await.generate(prompt, schema).await
    }

    async fn is_available(&self) -> bool {
        self.primary.is_available().await || self.fallback.is_available().await
    }
}

/// Connection settings for one provider.
#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub provider: Provider,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub timeout: Duration,
}

impl BackendSettings {
    pub fn new(provider: Provider, timeout: Duration) -> Self {
        Self {
            provider,
            model: None,
            api_base: None,
            timeout,
        }
    }

    pub fn model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.provider.config().model.to_string())
    }

    pub fn api_base(&self) -> String {
        self.api_base
            .clone()
            .unwrap_or_else(|| self.provider.config().api_base.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn http_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder().timeout(self.timeout).build()?)
    }
}

pub fn build_backend(settings: &BackendSettings) -> Result<Arc<dyn ModelBackend>> {
    let backend: Arc<dyn ModelBackend> = match settings.provider {
        Provider::Gemini => Arc::new(GeminiBackend::new(settings)?),
        Provider::HuggingFace => Arc::new(HuggingFaceBackend::new(settings)?),
        Provider::Local => Arc::new(LocalBackend::new(settings)?),
    };
    Ok(backend)
}

/// Primary backend, wrapped in a [`FallbackBackend`] when a fallback is configured.
pub fn build_with_fallback(
    primary: &BackendSettings,
    fallback: Option<&BackendSettings>,
) -> Result<Arc<dyn ModelBackend>> {
    let primary_backend = build_backend(primary)?;
    match fallback {
        Some(settings) => Ok(Arc::new(FallbackBackend::new(
            primary_backend,
            build_backend(settings)?,
        ))),
        None => Ok(primary_backend),
    }
}

/// Send a JSON request and decode the JSON answer; non-2xx becomes `HttpStatus`.
pub(crate) async fn send_json(request: reqwest::RequestBuilder) -> Result<Value> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ScholarSyncError::HttpStatus { status, body });
    }
    Ok(response.json::<Value>().await?)
}
