use std::time::Duration;

use serde_json::Value;

use crate::{error::Result, transcript::PageContext};

const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse";

/// A YouTube watch page: its URL plus whatever markup we could get.
#[derive(Debug, Clone, Default)]
pub struct WatchPage {
    url: String,
    html: Option<String>,
    player_response: Option<Value>,
}

impl WatchPage {
    /// A page known only by its URL. Only the timed-text strategy can work with it.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn from_html(url: impl Into<String>, html: impl Into<String>) -> Self {
        let html = html.into();
        let player_response = embedded_player_response(&html);
        Self {
            url: url.into(),
            html: Some(html),
            player_response,
        }
    }

    pub async fn fetch(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let html = client
            .get(url)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(Self::from_html(url, html))
    }
}

impl PageContext for WatchPage {
    fn url(&self) -> &str {
        &self.url
    }

    fn player_response(&self) -> Option<&Value> {
        self.player_response.as_ref()
    }

    fn transcript_panel_html(&self) -> Option<&str> {
        self.html.as_deref()
    }
}

/// Pull `ytInitialPlayerResponse = {...};` out of the page scripts.
fn embedded_player_response(html: &str) -> Option<Value> {
    html.match_indices(PLAYER_RESPONSE_MARKER).find_map(|(idx, _)| {
        let rest = html[idx + PLAYER_RESPONSE_MARKER.len()..].trim_start();
        let rest = rest.strip_prefix('=')?.trim_start();
        if !rest.starts_with('{') {
            return None;
        }
        // Parse exactly one value and ignore the script that follows it.
        serde_json::Deserializer::from_str(rest)
            .into_iter::<Value>()
            .next()?
            .ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_player_response_in_script() {
        let html = r#"<script>var ytInitialPlayerResponse = {"captions":{"a":1}};var meta = {};</script>"#;
        let page = WatchPage::from_html("https://www.youtube.com/watch?v=abcdefg", html);
        assert_eq!(page.player_response().unwrap()["captions"]["a"], 1);
    }

    #[test]
    fn skips_references_without_assignment() {
        let html = r#"<script>if (window.ytInitialPlayerResponse) {}</script><script>ytInitialPlayerResponse={"ok":true};</script>"#;
        let page = WatchPage::from_html("https://youtu.be/abcdefg", html);
        assert_eq!(page.player_response().unwrap()["ok"], true);
    }

    #[test]
    fn url_only_page_has_nothing_embedded() {
        let page = WatchPage::from_url("https://youtu.be/abcdefg");
        assert!(page.player_response().is_none());
        assert!(page.transcript_panel_html().is_none());
    }
}
