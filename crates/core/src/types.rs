use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ScholarSyncError;

/// Which resolver strategy produced a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptSource {
    PlayerCaptions,
    TimedText,
    TranscriptPanel,
}

impl TranscriptSource {
    pub fn name(&self) -> &'static str {
        match self {
            TranscriptSource::PlayerCaptions => "player captions",
            TranscriptSource::TimedText => "timed-text endpoint",
            TranscriptSource::TranscriptPanel => "transcript panel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub source: TranscriptSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionKind {
    Authored,
    /// Auto-generated by speech recognition.
    Asr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionTrack {
    pub language_code: String,
    pub kind: CaptionKind,
    pub base_url: String,
}

/// Outcome of one structured-response extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    Parsed(Value),
    Failed { raw: String },
}

/// Study guide as rendered for the user.
///
/// Deserialization is lenient: generation only checks that the top-level
/// keys exist, so anything missing underneath falls back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyGuide {
    pub summary: String,
    pub key_concepts: Vec<KeyConcept>,
    pub quiz: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyConcept {
    Text(String),
    Detailed { concept: String, explanation: String },
}

impl fmt::Display for KeyConcept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyConcept::Text(text) => f.write_str(text),
            KeyConcept::Detailed {
                concept,
                explanation,
            } => write!(f, "{concept}: {explanation}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, choice: &str) -> bool {
        choice.trim() == self.answer.trim()
    }

    /// Whether the answer is one of the options. Advisory only.
    pub fn answer_is_listed(&self) -> bool {
        self.options.iter().any(|option| option == &self.answer)
    }
}

impl StudyGuide {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifyAction {
    Rewrite,
    Translate { target: String },
    Proofread,
}

impl ModifyAction {
    pub const DEFAULT_TRANSLATION_TARGET: &'static str = "Spanish";

    pub fn name(&self) -> &'static str {
        match self {
            ModifyAction::Rewrite => "rewrite",
            ModifyAction::Translate { .. } => "translate",
            ModifyAction::Proofread => "proofread",
        }
    }

    pub fn translate_to(target: Option<&str>) -> Self {
        let target = target
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(Self::DEFAULT_TRANSLATION_TARGET);
        ModifyAction::Translate {
            target: target.to_string(),
        }
    }
}

impl FromStr for ModifyAction {
    type Err = ScholarSyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "rewrite" => Ok(ModifyAction::Rewrite),
            "translate" => Ok(ModifyAction::translate_to(None)),
            "proofread" => Ok(ModifyAction::Proofread),
            _ => Err(ScholarSyncError::invalid_input(
                "Invalid action. Use rewrite|translate|proofread",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_guide_with_plain_and_detailed_concepts() {
        let value = json!({
            "summary": "ok",
            "keyConcepts": ["Ownership: one owner", {"concept": "Borrowing", "explanation": "references"}],
            "quiz": [{"question": "q?", "options": ["a", "b", "c", "d"], "answer": "b"}]
        });
        let guide = StudyGuide::from_value(&value).unwrap();
        assert_eq!(guide.key_concepts.len(), 2);
        assert_eq!(guide.key_concepts[1].to_string(), "Borrowing: references");
        assert!(guide.quiz[0].answer_is_listed());
    }

    #[test]
    fn tolerates_missing_nested_fields() {
        let value = json!({"summary": "s", "keyConcepts": [], "quiz": [{"question": "q"}]});
        let guide = StudyGuide::from_value(&value).unwrap();
        assert!(guide.quiz[0].options.is_empty());
        assert!(!guide.quiz[0].answer_is_listed());
    }

    #[test]
    fn quiz_check_ignores_surrounding_whitespace() {
        let q = QuizQuestion {
            question: "q".into(),
            options: vec!["Paris".into(), "Rome".into()],
            answer: "Paris ".into(),
        };
        assert!(q.is_correct(" Paris"));
        assert!(!q.is_correct("Rome"));
    }

    #[test]
    fn parses_modify_actions() {
        assert_eq!("rewrite".parse::<ModifyAction>().unwrap(), ModifyAction::Rewrite);
        assert_eq!(
            "translate".parse::<ModifyAction>().unwrap(),
            ModifyAction::Translate {
                target: "Spanish".into()
            }
        );
        assert!("summarize".parse::<ModifyAction>().is_err());
    }
}
