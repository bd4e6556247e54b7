use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

use crate::{
    strategy::Strategy,
    transcript::{CaptionFetcher, Credentials, PageContext},
    types::{CaptionKind, CaptionTrack, Transcript, TranscriptSource},
    vtt::strip_vtt_to_plain_text,
};

fn track_list(player_response: &Value) -> Option<&Vec<Value>> {
    player_response["captions"]["playerCaptionsTracklistRenderer"]["captionTracks"].as_array()
}

fn parse_track(track: &Value) -> Option<CaptionTrack> {
    let base_url = track["baseUrl"].as_str()?;
    let kind = if track["kind"].as_str() == Some("asr") {
        CaptionKind::Asr
    } else {
        CaptionKind::Authored
    };
    Some(CaptionTrack {
        language_code: track["languageCode"].as_str().unwrap_or_default().to_string(),
        kind,
        base_url: base_url.to_string(),
    })
}

/// The first listed track only. A first entry without a `baseUrl` means no
/// track, later entries are not consulted.
pub fn first_caption_track(player_response: &Value) -> Option<CaptionTrack> {
    parse_track(track_list(player_response)?.first()?)
}

/// Ask for WebVTT, replacing any format the track URL already names.
pub fn vtt_url(base_url: &str) -> Option<String> {
    let mut url = Url::parse(base_url).ok()?;
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "fmt")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("fmt", "vtt");
    Some(url.into())
}

/// Fetch the first caption track the player lists. Public caption URLs need
/// no session, so credentials are omitted.
pub struct PlayerCaptionsStrategy {
    fetcher: Arc<dyn CaptionFetcher>,
}

impl PlayerCaptionsStrategy {
    pub fn new(fetcher: Arc<dyn CaptionFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Strategy<dyn PageContext, Transcript> for PlayerCaptionsStrategy {
    fn name(&self) -> &'static str {
        TranscriptSource::PlayerCaptions.name()
    }

    async fn attempt(&self, page: &(dyn PageContext + 'static)) -> Option<Transcript> {
        let track = first_caption_track(page.player_response()?)?;
        let url = vtt_url(&track.base_url)?;
        tracing::debug!(lang = %track.language_code, kind = ?track.kind, "fetching player caption track");

        let body = match self.fetcher.fetch(&url, Credentials::Omit).await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(error = %e, "player caption track fetch failed");
                return None;
            }
        };

        Transcript::from_text(&strip_vtt_to_plain_text(&body), TranscriptSource::PlayerCaptions)
    }
}
