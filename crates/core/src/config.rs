use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    backend::BackendSettings,
    error::{Result, ScholarSyncError},
    provider::Provider,
    retry::RetryPolicy,
    transcript::TimedTextProbe,
    transcript::timed_text::DEFAULT_LANGUAGES,
};

const CONFIG_FILE: &str = "config.json";

/// Runtime settings: defaults, then the config file, then `SCHOLARSYNC_*` env vars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: Provider,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub fallback_provider: Option<Provider>,
    /// Caption languages to probe on the timed-text endpoint, in order.
    pub languages: Vec<String>,
    /// Cookie header sent with credentialed caption requests.
    pub session_cookie: Option<String>,
    pub request_timeout_secs: u64,
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: None,
            api_base: None,
            fallback_provider: None,
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            session_cookie: None,
            request_timeout_secs: 60,
            retry: RetryPolicy::default(),
        }
    }
}

pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scholarsync")
}

pub fn get_config_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILE)
}

impl Config {
    /// Load from the default location and the process environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::from_file(&get_config_path())?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// A missing file is not an error; a malformed one is.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| ScholarSyncError::Config {
            reason: format!("{}: {e}", path.display()),
        })
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(provider) = var("SCHOLARSYNC_PROVIDER") {
            self.provider = provider.parse()?;
        }
        if let Some(provider) = var("SCHOLARSYNC_FALLBACK_PROVIDER") {
            self.fallback_provider = Some(provider.parse()?);
        }
        if let Some(model) = var("SCHOLARSYNC_MODEL") {
            self.model = Some(model);
        }
        if let Some(api_base) = var("SCHOLARSYNC_API_BASE") {
            self.api_base = Some(api_base);
        }
        if let Some(languages) = var("SCHOLARSYNC_LANGUAGES") {
            self.languages = languages
                .split(',')
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();
        }
        if let Some(cookie) = var("SCHOLARSYNC_COOKIE") {
            self.session_cookie = Some(cookie);
        }
        if let Some(retries) = var("SCHOLARSYNC_MAX_RETRIES") {
            self.retry.max_retries = retries.trim().parse().map_err(|_| ScholarSyncError::Config {
                reason: format!("SCHOLARSYNC_MAX_RETRIES must be a number, got '{retries}'"),
            })?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            provider: self.provider,
            model: self.model.clone(),
            api_base: self.api_base.clone(),
            timeout: self.request_timeout(),
        }
    }

    /// The fallback uses its provider defaults; model and base overrides belong to the primary.
    pub fn fallback_settings(&self) -> Option<BackendSettings> {
        self.fallback_provider
            .filter(|fallback| *fallback != self.provider)
            .map(|provider| BackendSettings::new(provider, self.request_timeout()))
    }

    pub fn timed_text_probe(&self) -> TimedTextProbe {
        TimedTextProbe::with_languages(self.languages.clone())
    }
}
