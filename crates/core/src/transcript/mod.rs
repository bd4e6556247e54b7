//! Best-effort transcript acquisition.
//!
//! The resolver walks an ordered list of strategies and returns the first
//! non-empty transcript. Strategy failures never surface as errors; only
//! exhausting the whole list does.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::{Result, ScholarSyncError},
    strategy::{Strategy, first_non_empty},
    types::{Transcript, TranscriptSource},
    vtt::collapse_whitespace,
};

pub mod fetch;
pub mod page;
pub mod panel;
pub mod player;
pub mod timed_text;

pub use fetch::HttpCaptionFetcher;
pub use page::WatchPage;
pub use panel::TranscriptPanelStrategy;
pub use player::PlayerCaptionsStrategy;
pub use timed_text::{TimedTextProbe, TimedTextStrategy};

/// Whether a caption request carries the viewer's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials {
    Omit,
    Include,
}

/// Fetches a caption payload. Non-2xx answers are errors.
#[async_trait]
pub trait CaptionFetcher: Send + Sync {
    async fn fetch(&self, url: &str, credentials: Credentials) -> Result<String>;
}

/// What the resolver can see of the video page.
pub trait PageContext: Send + Sync {
    fn url(&self) -> &str;

    /// The player response the page embeds at load time, if any.
    fn player_response(&self) -> Option<&Value>;

    /// Markup that may contain a rendered transcript panel.
    fn transcript_panel_html(&self) -> Option<&str>;
}

pub type TranscriptStrategy = Box<dyn Strategy<dyn PageContext, Transcript>>;

impl Transcript {
    /// Normalize whitespace; blank text is no transcript at all.
    pub fn from_text(text: &str, source: TranscriptSource) -> Option<Self> {
        let text = collapse_whitespace(text);
        if text.is_empty() {
            None
        } else {
            Some(Transcript { text, source })
        }
    }
}

pub struct TranscriptResolver {
    strategies: Vec<TranscriptStrategy>,
}

impl TranscriptResolver {
    /// Player captions, then the timed-text endpoint, then the rendered panel.
    pub fn new(fetcher: Arc<dyn CaptionFetcher>, probe: TimedTextProbe) -> Self {
        Self::with_strategies(vec![
            Box::new(PlayerCaptionsStrategy::new(Arc::clone(&fetcher))),
            Box::new(TimedTextStrategy::new(fetcher, probe)),
            Box::new(TranscriptPanelStrategy),
        ])
    }

    pub fn with_strategies(strategies: Vec<TranscriptStrategy>) -> Self {
        Self { strategies }
    }

    pub async fn resolve(&self, page: &(dyn PageContext + 'static)) -> Option<Transcript> {
        let (name, transcript) = first_non_empty(page, &self.strategies).await?;
        tracing::info!(
            strategy = name,
            chars = transcript.text.len(),
            "transcript resolved"
        );
        Some(transcript)
    }

    pub async fn resolve_transcript(&self, page: &(dyn PageContext + 'static)) -> Result<Transcript> {
        self.resolve(page).await.ok_or_else(|| {
            tracing::warn!(url = page.url(), "no transcript strategy succeeded");
            ScholarSyncError::TranscriptUnavailable
        })
    }
}
