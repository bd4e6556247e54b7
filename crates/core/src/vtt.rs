use once_cell::sync::Lazy;
use regex::Regex;

static CUE_TIMING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}:\d{2}:\d{2}\.\d{3}\s+-->").expect("valid cue timing regex"));

/// Reduce a WebVTT caption body to its cue text, joined by single spaces.
pub fn strip_vtt_to_plain_text(vtt: &str) -> String {
    let kept = vtt
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !is_header(line))
        .filter(|line| !is_cue_number(line))
        .filter(|line| !CUE_TIMING.is_match(line))
        .collect::<Vec<_>>()
        .join(" ");

    collapse_whitespace(&kept)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_header(line: &str) -> bool {
    line.get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("WEBVTT"))
}

fn is_cue_number(line: &str) -> bool {
    let line = line.trim_end_matches('\r');
    !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_cue_text() {
        let vtt = "WEBVTT\n\n1\n00:00:00.000 --> 00:00:02.500\nHello   there\n\n2\n00:00:02.500 --> 00:00:04.000\ngeneral\nKenobi\n";
        assert_eq!(strip_vtt_to_plain_text(vtt), "Hello there general Kenobi");
    }

    #[test]
    fn keeps_header_metadata_lines_but_drops_cue_timings() {
        let vtt = "WEBVTT\r\nKind: captions\r\nLanguage: en\r\n\r\n00:00:01.000 --> 00:00:03.000 align:start position:0%\r\nfirst line\r\n";
        assert_eq!(
            strip_vtt_to_plain_text(vtt),
            "Kind: captions Language: en first line"
        );
    }

    #[test]
    fn no_residual_numbers_or_arrows() {
        let vtt = "webvtt\n12\n01:02:03.004 --> 01:02:05.000\nwe counted 3 apples\n13\n01:02:05.000 --> 01:02:06.000\n42 is the answer\n";
        let text = strip_vtt_to_plain_text(vtt);
        assert_eq!(text, "we counted 3 apples 42 is the answer");
        assert!(!text.contains("-->"));
    }

    #[test]
    fn empty_body_gives_empty_text() {
        assert_eq!(strip_vtt_to_plain_text(""), "");
        assert_eq!(strip_vtt_to_plain_text("WEBVTT\n\n"), "");
    }
}
