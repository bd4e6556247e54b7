use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;

static PATH_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(?:shorts/)?([a-zA-Z0-9_-]{6,})").expect("valid video id regex"));

/// Extract the video id from a YouTube URL.
///
/// The `v` query parameter wins; otherwise the first path segment that looks
/// like an id is used, which covers `youtu.be/<id>` and `/shorts/<id>`.
pub fn extract_video_id(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;

    if let Some((_, id)) = url.query_pairs().find(|(key, _)| key == "v")
        && !id.is_empty()
    {
        return Some(id.into_owned());
    }

    PATH_ID
        .captures(url.path())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_query_parameter() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn query_parameter_beats_path() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/abcdefgh?v=xyz123"),
            Some("xyz123".to_string())
        );
    }

    #[test]
    fn short_link_and_shorts_paths() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=share"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/Ab_cD-123"),
            Some("Ab_cD-123".to_string())
        );
    }

    #[test]
    fn malformed_or_idless_urls() {
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/"), None);
    }
}
