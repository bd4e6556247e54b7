use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScholarSyncError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    #[serde(alias = "hf")]
    HuggingFace,
    /// An OpenAI-compatible server on this machine (Ollama, llama.cpp, ...).
    Local,
}

pub struct ProviderConfig {
    pub api_base: &'static str,
    pub model: &'static str,
    pub env_var: Option<&'static str>,
}

impl Provider {
    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::Gemini => ProviderConfig {
                api_base: "https://generativelanguage.googleapis.com/v1beta",
                model: "gemini-2.5-flash",
                env_var: Some("GEMINI_API_KEY"),
            },
            Provider::HuggingFace => ProviderConfig {
                api_base: "https://api-inference.huggingface.co",
                model: "mistralai/Mistral-7B-Instruct-v0.3",
                env_var: Some("HF_API_TOKEN"),
            },
            Provider::Local => ProviderConfig {
                api_base: "http://localhost:11434/v1",
                model: "llama3.2",
                env_var: None,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::HuggingFace => "Hugging Face",
            Provider::Local => "Local",
        }
    }

    /// API key from the provider's environment variable.
    pub fn api_key(&self) -> Result<String> {
        self.api_key_from(|var| std::env::var(var).ok())
    }

    fn api_key_from(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        let Some(env_var) = self.config().env_var else {
            return Err(ScholarSyncError::Config {
                reason: format!("{} does not use an API key", self.name()),
            });
        };
        match lookup(env_var) {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ScholarSyncError::MissingApiKey {
                env_var: env_var.to_string(),
            }),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = ScholarSyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "huggingface" | "hf" => Ok(Provider::HuggingFace),
            "local" => Ok(Provider::Local),
            other => Err(ScholarSyncError::Config {
                reason: format!("unknown provider '{other}' (expected gemini, huggingface or local)"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_names() {
        assert_eq!("Gemini".parse::<Provider>().unwrap(), Provider::Gemini);
        assert_eq!("hf".parse::<Provider>().unwrap(), Provider::HuggingFace);
        assert_eq!(" local ".parse::<Provider>().unwrap(), Provider::Local);
        assert!("grok".parse::<Provider>().is_err());
    }

    #[test]
    fn keyed_providers_read_their_env_var() {
        let key = Provider::Gemini
            .api_key_from(|var| (var == "GEMINI_API_KEY").then(|| "secret".to_string()))
            .unwrap();
        assert_eq!(key, "secret");
    }

    #[test]
    fn blank_or_unset_key_is_missing() {
        let err = Provider::HuggingFace
            .api_key_from(|_| Some("  ".to_string()))
            .unwrap_err();
        assert!(matches!(err, ScholarSyncError::MissingApiKey { ref env_var } if env_var == "HF_API_TOKEN"));
        assert!(Provider::Gemini.api_key_from(|_| None).is_err());
    }

    #[test]
    fn local_has_no_key() {
        assert!(matches!(Provider::Local.api_key(), Err(ScholarSyncError::Config { .. })));
    }
}
