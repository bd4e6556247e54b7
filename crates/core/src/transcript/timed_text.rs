use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;

use crate::{
    strategy::Strategy,
    transcript::{CaptionFetcher, Credentials, PageContext},
    types::{CaptionKind, Transcript, TranscriptSource},
    video_id::extract_video_id,
    vtt::strip_vtt_to_plain_text,
};

pub const TIMED_TEXT_ENDPOINT: &str = "https://www.youtube.com/api/timedtext";
pub const DEFAULT_LANGUAGES: &[&str] = &["en", "en-US", "en-GB", "en-IN"];

/// Which language/kind combinations to request from the timed-text endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedTextProbe {
    pub endpoint: String,
    pub languages: Vec<String>,
}

impl Default for TimedTextProbe {
    fn default() -> Self {
        Self {
            endpoint: TIMED_TEXT_ENDPOINT.to_string(),
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl TimedTextProbe {
    pub fn with_languages(languages: Vec<String>) -> Self {
        Self {
            languages,
            ..Self::default()
        }
    }

    /// Probe order: languages outer, kinds inner.
    ///
    /// This tries auto-generated `en` before authored `en-US`. The order is
    /// kept as-is; callers wanting "authored everywhere first" should reorder
    /// the languages or filter this list.
    pub fn candidates(&self) -> Vec<(String, CaptionKind)> {
        self.languages
            .iter()
            .flat_map(|lang| {
                [CaptionKind::Authored, CaptionKind::Asr]
                    .into_iter()
                    .map(move |kind| (lang.clone(), kind))
            })
            .collect()
    }

    pub fn url_for(&self, video_id: &str, lang: &str, kind: CaptionKind) -> Option<String> {
        let mut url = Url::parse(&self.endpoint).ok()?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("v", video_id)
                .append_pair("lang", lang)
                .append_pair("fmt", "vtt");
            if kind == CaptionKind::Asr {
                query.append_pair("kind", "asr");
            }
        }
        Some(url.into())
    }
}

/// Probe the timed-text endpoint directly with the viewer's session, which
/// reaches caption payloads the public track URLs refuse.
pub struct TimedTextStrategy {
    fetcher: Arc<dyn CaptionFetcher>,
    probe: TimedTextProbe,
}

impl TimedTextStrategy {
    pub fn new(fetcher: Arc<dyn CaptionFetcher>, probe: TimedTextProbe) -> Self {
        Self { fetcher, probe }
    }
}

#[async_trait]
impl Strategy<dyn PageContext, Transcript> for TimedTextStrategy {
    fn name(&self) -> &'static str {
        TranscriptSource::TimedText.name()
    }

    async fn attempt(&self, page: &(dyn PageContext + 'static)) -> Option<Transcript> {
        let video_id = extract_video_id(page.url())?;

        for (lang, kind) in self.probe.candidates() {
            let Some(url) = self.probe.url_for(&video_id, &lang, kind) else {
                continue;
            };

            match self.fetcher.fetch(&url, Credentials::Include).await {
                Ok(body) => {
                    let text = strip_vtt_to_plain_text(&body);
                    if let Some(transcript) = Transcript::from_text(&text, TranscriptSource::TimedText) {
                        tracing::debug!(%lang, ?kind, "timed-text probe hit");
                        return Some(transcript);
                    }
                }
                Err(e) => tracing::debug!(%lang, ?kind, error = %e, "timed-text probe failed"),
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_nest_kind_inside_language() {
        let probe = TimedTextProbe::with_languages(vec!["en".into(), "en-US".into()]);
        assert_eq!(
            probe.candidates(),
            vec![
                ("en".to_string(), CaptionKind::Authored),
                ("en".to_string(), CaptionKind::Asr),
                ("en-US".to_string(), CaptionKind::Authored),
                ("en-US".to_string(), CaptionKind::Asr),
            ]
        );
    }

    #[test]
    fn default_probe_covers_english_variants() {
        assert_eq!(TimedTextProbe::default().candidates().len(), 8);
    }

    #[test]
    fn builds_endpoint_urls() {
        let probe = TimedTextProbe::default();
        assert_eq!(
            probe.url_for("abc123", "en-GB", CaptionKind::Authored).unwrap(),
            "https://www.youtube.com/api/timedtext?v=abc123&lang=en-GB&fmt=vtt"
        );
        assert_eq!(
            probe.url_for("abc123", "en", CaptionKind::Asr).unwrap(),
            "https://www.youtube.com/api/timedtext?v=abc123&lang=en&fmt=vtt&kind=asr"
        );
    }
}
