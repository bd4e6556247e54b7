use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{
    backend::{BackendSettings, ModelBackend, send_json},
    error::{Result, ScholarSyncError},
    provider::Provider,
};

/// Google Gemini `generateContent`.
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl GeminiBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self> {
        let api_key = Provider::Gemini.api_key()?;
        Ok(Self {
            client: settings.http_client()?,
            api_key,
            api_base: settings.api_base(),
            model: settings.model(),
        })
    }

    fn request_body(prompt: &str, schema: Option<&Value>) -> Value {
        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        if let Some(schema) = schema {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        }
        body
    }
}

/// Text of the first candidate's first part.
pub(crate) fn candidate_text(response: &Value) -> Option<&str> {
    response["candidates"][0]["content"]["parts"][0]["text"].as_str()
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    fn name(&self) -> &str {
        Provider::Gemini.name()
    }

    async fn generate(&self, prompt: &str, schema: Option<&Value>) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        tracing::debug!(model = %self.model, structured = schema.is_some(), "calling Gemini");

        let response = send_json(
            self.client
                .post(url)
                .header("x-goog-api-key", &self.api_key)
                .json(&Self::request_body(prompt, schema)),
        )
        .await?;

        candidate_text(&response)
            .map(str::to_string)
            .ok_or_else(|| {
                ScholarSyncError::upstream_invalid("Invalid API response structure.", response.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_switches_on_json_mode() {
        let schema = json!({"type": "OBJECT"});
        let body = GeminiBackend::request_body("hi", Some(&schema));
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"], schema);

        let plain = GeminiBackend::request_body("hi", None);
        assert!(plain.get("generationConfig").is_none());
    }

    #[test]
    fn reads_candidate_text() {
        let response = json!({"candidates": [{"content": {"parts": [{"text": "{}"}]}}]});
        assert_eq!(candidate_text(&response), Some("{}"));
        assert_eq!(candidate_text(&json!({"promptFeedback": {}})), None);
    }
}
