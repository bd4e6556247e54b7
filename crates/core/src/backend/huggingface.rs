use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{
    backend::{BackendSettings, ModelBackend, send_json},
    error::{Result, ScholarSyncError},
    provider::Provider,
};

const MAX_NEW_TOKENS: u32 = 1024;

/// Hugging Face hosted inference for text-generation models.
pub struct HuggingFaceBackend {
    client: reqwest::Client,
    api_token: String,
    api_base: String,
    model: String,
}

impl HuggingFaceBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self> {
        let api_token = Provider::HuggingFace.api_key()?;
        Ok(Self {
            client: settings.http_client()?,
            api_token,
            api_base: settings.api_base(),
            model: settings.model(),
        })
    }
}

/// `generated_text` from either `[{...}]` or `{...}` answers.
pub(crate) fn generated_text(response: &Value) -> Option<&str> {
    response[0]["generated_text"]
        .as_str()
        .or_else(|| response["generated_text"].as_str())
}

#[async_trait]
impl ModelBackend for HuggingFaceBackend {
    fn name(&self) -> &str {
        Provider::HuggingFace.name()
    }

    async fn generate(&self, prompt: &str, schema: Option<&Value>) -> Result<String> {
        if schema.is_some() {
            tracing::debug!("Hugging Face inference has no schema support; relying on the prompt");
        }
        let url = format!("{}/models/{}", self.api_base, self.model);

        let response = send_json(
            self.client
                .post(url)
                .bearer_auth(&self.api_token)
                .json(&json!({
                    "inputs": prompt,
                    "parameters": {
                        "max_new_tokens": MAX_NEW_TOKENS,
                        "return_full_text": false,
                    },
                })),
        )
        .await?;

        generated_text(&response)
            .map(str::to_string)
            .ok_or_else(|| {
                ScholarSyncError::upstream_invalid("Invalid API response structure.", response.to_string())
            })
    }
}
