use serde_json::{Value, json};

use crate::types::ModifyAction;

/// Top-level keys a generated study guide must carry.
pub const REQUIRED_GUIDE_KEYS: [&str; 3] = ["summary", "keyConcepts", "quiz"];

static STUDY_GUIDE_INSTRUCTIONS: &str = r#"You are an assistant that produces structured study guides from YouTube transcripts.
Return ONLY valid minified JSON matching this exact schema, no code fences:
{"summary":"string","keyConcepts":["string"],"quiz":[{"question":"string","options":["string"],"answer":"string"}]}
Rules:
- Keep summary concise (3-5 sentences).
- Provide 5-10 key concepts as "Concept: Explanation" strings.
- Create 5 multiple-choice questions. Each has 4 options and one correct answer that exactly matches one option.
- Do not include any markdown, explanation, or extra text. Output must be PURE JSON."#;

pub fn study_guide_prompt(transcript: &str) -> String {
    format!("{STUDY_GUIDE_INSTRUCTIONS}\n\nTranscript:\n{transcript}")
}

/// Response schema for backends that accept one, in the OpenAPI subset
/// Gemini understands.
pub fn study_guide_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "keyConcepts": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "quiz": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "answer": { "type": "STRING" }
                    },
                    "required": ["question", "options", "answer"]
                }
            }
        },
        "required": REQUIRED_GUIDE_KEYS
    })
}

pub fn modify_prompt(action: &ModifyAction, text: &str) -> String {
    let instruction = match action {
        ModifyAction::Rewrite => {
            "Rewrite this text for clarity and concision, preserving meaning:".to_string()
        }
        ModifyAction::Translate { target } => {
            format!("Translate this text to {target}. Output only the translated text:")
        }
        ModifyAction::Proofread => {
            "Proofread and correct grammar/spelling. Output the corrected text only:".to_string()
        }
    };
    format!("{instruction}\n\n{text}")
}

/// Keys from [`REQUIRED_GUIDE_KEYS`] that the value lacks. Non-objects lack all of them.
pub fn missing_guide_keys(value: &Value) -> Vec<&'static str> {
    REQUIRED_GUIDE_KEYS
        .into_iter()
        .filter(|key| value.get(key).is_none())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guide_prompt_ends_with_transcript() {
        let prompt = study_guide_prompt("the mitochondria is the powerhouse");
        assert!(prompt.starts_with("You are an assistant"));
        assert!(prompt.ends_with("Transcript:\nthe mitochondria is the powerhouse"));
    }

    #[test]
    fn schema_requires_guide_keys() {
        let schema = study_guide_schema();
        assert_eq!(schema["required"], json!(["summary", "keyConcepts", "quiz"]));
    }

    #[test]
    fn translate_prompt_names_target() {
        let prompt = modify_prompt(
            &ModifyAction::Translate {
                target: "French".into(),
            },
            "hello",
        );
        assert_eq!(
            prompt,
            "Translate this text to French. Output only the translated text:\n\nhello"
        );
    }

    #[test]
    fn reports_missing_keys_shallowly() {
        assert!(missing_guide_keys(&json!({"summary": 1, "keyConcepts": null, "quiz": "x"})).is_empty());
        assert_eq!(missing_guide_keys(&json!({"summary": "s"})), vec!["keyConcepts", "quiz"]);
        assert_eq!(missing_guide_keys(&json!([1])).len(), 3);
    }
}
