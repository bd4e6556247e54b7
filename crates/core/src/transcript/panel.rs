use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use crate::{
    strategy::{Attempt, Strategy, first_some, non_empty},
    transcript::PageContext,
    types::{Transcript, TranscriptSource},
    vtt::collapse_whitespace,
};

const LEGACY_SEGMENTS: &str = "ytd-transcript-segment-renderer .segment-text";
const CURRENT_SEGMENTS: &str = "yt-formatted-string.segment-text, \
     ytd-transcript-segment-renderer #segment-text, \
     ytd-transcript-segment-renderer yt-formatted-string";
const PANEL_CONTAINER: &str = "ytd-transcript-renderer, ytd-engagement-panel-section-list-renderer";

/// Text nodes concatenated as rendered, so inline markup does not split words.
fn element_text(el: &ElementRef) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

fn segment_texts(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    let texts: Vec<String> = doc
        .select(&sel)
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty())
        .collect();
    non_empty(texts.join(" "))
}

fn legacy_segments(doc: &Html) -> Option<String> {
    segment_texts(doc, LEGACY_SEGMENTS)
}

fn current_segments(doc: &Html) -> Option<String> {
    segment_texts(doc, CURRENT_SEGMENTS)
}

fn panel_container(doc: &Html) -> Option<String> {
    let sel = Selector::parse(PANEL_CONTAINER).ok()?;
    doc.select(&sel)
        .next()
        .map(|el| element_text(&el))
        .and_then(non_empty)
}

/// Read a transcript panel that is already rendered in the page markup.
///
/// Older layouts first, then the current one, then whatever text the
/// panel container holds.
pub fn scrape_transcript_panel(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let attempts = [
        Attempt { name: "legacy segments", run: legacy_segments as fn(&Html) -> Option<String> },
        Attempt { name: "current segments", run: current_segments },
        Attempt { name: "panel container", run: panel_container },
    ];
    first_some(&doc, &attempts).map(|(_, text)| text)
}

pub struct TranscriptPanelStrategy;

#[async_trait]
impl Strategy<dyn PageContext, Transcript> for TranscriptPanelStrategy {
    fn name(&self) -> &'static str {
        TranscriptSource::TranscriptPanel.name()
    }

    async fn attempt(&self, page: &(dyn PageContext + 'static)) -> Option<Transcript> {
        let text = scrape_transcript_panel(page.transcript_panel_html()?)?;
        Transcript::from_text(&text, TranscriptSource::TranscriptPanel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_layout_wins() {
        let html = r#"
            <ytd-transcript-segment-renderer><div class="segment-text"> Hello </div></ytd-transcript-segment-renderer>
            <ytd-transcript-segment-renderer><div class="segment-text">world</div></ytd-transcript-segment-renderer>
            <yt-formatted-string class="segment-text">ignored</yt-formatted-string>
        "#;
        assert_eq!(scrape_transcript_panel(html).as_deref(), Some("Hello world"));
    }

    #[test]
    fn falls_back_to_current_layout() {
        let html = r#"
            <ytd-transcript-segment-renderer><yt-formatted-string id="segment-text">first</yt-formatted-string></ytd-transcript-segment-renderer>
            <ytd-transcript-segment-renderer><yt-formatted-string id="segment-text"></yt-formatted-string></ytd-transcript-segment-renderer>
            <ytd-transcript-segment-renderer><yt-formatted-string id="segment-text">second</yt-formatted-string></ytd-transcript-segment-renderer>
        "#;
        assert_eq!(scrape_transcript_panel(html).as_deref(), Some("first second"));
    }

    #[test]
    fn inline_markup_keeps_words_whole() {
        let html = r#"
            <ytd-transcript-segment-renderer><div class="segment-text">Hel<b>lo</b> world</div></ytd-transcript-segment-renderer>
            <ytd-transcript-segment-renderer><div class="segment-text"><span>again</span>, <i>now</i></div></ytd-transcript-segment-renderer>
        "#;
        assert_eq!(
            scrape_transcript_panel(html).as_deref(),
            Some("Hello world again, now")
        );
    }

    #[test]
    fn falls_back_to_container_text() {
        let html = "<ytd-transcript-renderer>\n<div>0:00</div>\n<div>intro <b>words</b></div>\n</ytd-transcript-renderer>";
        assert_eq!(scrape_transcript_panel(html).as_deref(), Some("0:00 intro words"));
    }

    #[test]
    fn no_panel_no_text() {
        assert_eq!(scrape_transcript_panel("<html><body><p>video</p></body></html>"), None);
    }
}
