//! ScholarSync Core Library
//!
//! Resolves YouTube transcripts through a waterfall of strategies, asks a
//! generative model for a study guide and recovers the JSON it returns.

pub mod backend;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod retry;
pub mod strategy;
pub mod transcript;
pub mod types;
pub mod video_id;
pub mod vtt;

// Re-export commonly used items at crate root
pub use backend::{BackendSettings, FallbackBackend, ModelBackend, build_backend, build_with_fallback};
pub use config::Config;
pub use error::{Result, ScholarSyncError, TRANSCRIPT_UNAVAILABLE_MESSAGE};
pub use extract::{extract, extract_structured};
pub use format::{format_answer_key, format_study_guide_readable, format_transcript};
pub use pipeline::{GeneratedGuide, StudyGuideService};
pub use provider::{Provider, ProviderConfig};
pub use retry::RetryPolicy;
pub use transcript::{
    CaptionFetcher, Credentials, HttpCaptionFetcher, PageContext, TimedTextProbe,
    TranscriptResolver, WatchPage,
};
pub use types::{
    CaptionKind, CaptionTrack, ExtractionResult, KeyConcept, ModifyAction, QuizQuestion,
    StudyGuide, Transcript, TranscriptSource,
};
pub use video_id::extract_video_id;
pub use vtt::strip_vtt_to_plain_text;
