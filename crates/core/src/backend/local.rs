use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{
    backend::{BackendSettings, ModelBackend, send_json},
    error::{Result, ScholarSyncError},
    provider::Provider,
};

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// An OpenAI-compatible chat-completions server running on this machine.
pub struct LocalBackend {
    client: reqwest::Client,
    api_base: String,
    model: String,
}

impl LocalBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self> {
        Ok(Self {
            client: settings.http_client()?,
            api_base: settings.api_base(),
            model: settings.model(),
        })
    }

    fn request_body(&self, prompt: &str, schema: Option<&Value>) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt,
                },
            ],
            "temperature": 0.3,
        });
        if schema.is_some() {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }
}

pub(crate) fn message_content(response: &Value) -> Option<&str> {
    response["choices"][0]["message"]["content"].as_str()
}

#[async_trait]
impl ModelBackend for LocalBackend {
    fn name(&self) -> &str {
        Provider::Local.name()
    }

    async fn generate(&self, prompt: &str, schema: Option<&Value>) -> Result<String> {
        let response = send_json(
            self.client
                .post(format!("{}/chat/completions", self.api_base))
                .header("Content-Type", "application/json")
                .json(&self.request_body(prompt, schema)),
        )
        .await?;

        message_content(&response)
            .map(str::to_string)
            .ok_or_else(|| {
                ScholarSyncError::upstream_invalid(
                    format!("Invalid API response: {:?}", response),
                    response.to_string(),
                )
            })
    }

    /// The server is usable when it answers its model listing.
    async fn is_available(&self) -> bool {
        let probe = self
            .client
            .get(format!("{}/models", self.api_base))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;
        match probe {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "local model server not reachable");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> LocalBackend {
        LocalBackend::new(&BackendSettings::new(Provider::Local, Duration::from_secs(1))).unwrap()
    }

    #[test]
    fn schema_requests_json_object() {
        let body = backend().request_body("hi", Some(&json!({})));
        assert_eq!(body["model"], "llama3.2");
        assert_eq!(body["messages"][0]["content"], "hi");
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn reads_chat_completion_content() {
        let response = json!({"choices": [{"message": {"role": "assistant", "content": "ok"}}]});
        assert_eq!(message_content(&response), Some("ok"));
    }
}
