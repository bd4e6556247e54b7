use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::{
    backend::ModelBackend,
    error::{Result, ScholarSyncError},
    extract::extract,
    prompt::{missing_guide_keys, modify_prompt, study_guide_prompt, study_guide_schema},
    retry::RetryPolicy,
    transcript::{PageContext, TranscriptResolver},
    types::{ExtractionResult, ModifyAction, StudyGuide, Transcript},
};

/// A guide together with the transcript it was generated from.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedGuide {
    pub transcript: Transcript,
    /// The model's JSON as returned; only the top-level keys were checked.
    pub guide: Value,
}

impl GeneratedGuide {
    pub fn study_guide(&self) -> std::result::Result<StudyGuide, serde_json::Error> {
        StudyGuide::from_value(&self.guide)
    }
}

/// Prompt, call the backend, recover and check the JSON.
pub struct StudyGuideService {
    backend: Arc<dyn ModelBackend>,
    retry: RetryPolicy,
}

impl StudyGuideService {
    pub fn new(backend: Arc<dyn ModelBackend>, retry: RetryPolicy) -> Self {
        Self { backend, retry }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    async fn call_backend(&self, prompt: &str, schema: Option<&Value>) -> Result<String> {
        self.retry
            .run(self.backend.name(), || self.backend.generate(prompt, schema))
            .await
            .map_err(ScholarSyncError::from_model)
    }

    pub async fn generate_guide(&self, transcript: &str) -> Result<Value> {
        if transcript.trim().is_empty() {
            return Err(ScholarSyncError::invalid_input("Missing or invalid transcript"));
        }

        let schema = study_guide_schema();
        let raw = self
            .call_backend(&study_guide_prompt(transcript), Some(&schema))
            .await?;

        let value = match extract(&raw) {
            ExtractionResult::Parsed(value) if value.is_object() => value,
            _ => {
                tracing::warn!(chars = raw.len(), "model answer held no JSON object");
                return Err(ScholarSyncError::upstream_invalid("AI returned invalid JSON", raw));
            }
        };

        let missing = missing_guide_keys(&value);
        if !missing.is_empty() {
            return Err(ScholarSyncError::upstream_invalid(
                format!("AI JSON missing required fields: {}", missing.join(", ")),
                value.to_string(),
            ));
        }

        Ok(value)
    }

    pub async fn modify_text(&self, text: &str, action: &ModifyAction) -> Result<String> {
        if text.trim().is_empty() {
            return Err(ScholarSyncError::invalid_input("Missing or invalid text"));
        }

        let modified = self
            .call_backend(&modify_prompt(action, text), None)
            .await?
            .trim()
            .to_string();

        if modified.is_empty() {
            return Err(ScholarSyncError::upstream_invalid(
                "AI returned empty modification",
                String::new(),
            ));
        }
        tracing::debug!(action = action.name(), chars = modified.len(), "text modified");
        Ok(modified)
    }

    pub async fn guide_for_page(
        &self,
        resolver: &TranscriptResolver,
        page: &(dyn PageContext + 'static),
    ) -> Result<GeneratedGuide> {
        let transcript = resolver.resolve_transcript(page).await?;
        let guide = self.generate_guide(&transcript.text).await?;
        Ok(GeneratedGuide { transcript, guide })
    }
}
