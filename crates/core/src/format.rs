use crate::types::{StudyGuide, Transcript};

/// Wrap long transcript text at word boundaries.
pub fn format_transcript(transcript: &Transcript, width: usize) -> String {
    textwrap::fill(&transcript.text, width)
}

/// Format a study guide as human-readable markdown
pub fn format_study_guide_readable(guide: &StudyGuide) -> String {
    let mut output = String::new();

    output.push_str("## Summary\n\n");
    output.push_str(&guide.summary);
    output.push_str("\n\n");

    output.push_str("## Key Concepts\n\n");
    for concept in &guide.key_concepts {
        output.push_str(&format!("• {}\n", concept));
    }
    output.push('\n');

    output.push_str("## Quiz\n\n");
    for (i, question) in guide.quiz.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, question.question));
        for (letter, option) in ('a'..='z').zip(&question.options) {
            output.push_str(&format!("   {}) {}\n", letter, option));
        }
        output.push('\n');
    }

    output
}

/// Answer key, one line per question.
pub fn format_answer_key(guide: &StudyGuide) -> String {
    guide
        .quiz
        .iter()
        .enumerate()
        .map(|(i, q)| {
            if q.answer_is_listed() {
                format!("{}. {}", i + 1, q.answer)
            } else {
                format!("{}. {} (not among the options)", i + 1, q.answer)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
