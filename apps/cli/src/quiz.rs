use anyhow::Result;
use console::style;
use scholarsync_core::{QuizQuestion, StudyGuide};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Map a reply to an option: a letter picks by position, anything else is taken literally.
fn choice_for<'a>(question: &'a QuizQuestion, reply: &'a str) -> &'a str {
    let reply = reply.trim();
    let mut chars = reply.chars();
    if let (Some(letter), None) = (chars.next(), chars.next())
        && letter.is_ascii_alphabetic()
    {
        let idx = (letter.to_ascii_lowercase() as u8 - b'a') as usize;
        if let Some(option) = question.options.get(idx) {
            return option;
        }
    }
    reply
}

pub async fn run(guide: &StudyGuide) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut score = 0;

    for (i, question) in guide.quiz.iter().enumerate() {
        println!("{}. {}", i + 1, style(&question.question).bold());
        for (letter, option) in ('a'..='z').zip(&question.options) {
            println!("   {}) {}", letter, option);
        }

        let Some(reply) = lines.next_line().await? else {
            break;
        };

        if question.is_correct(choice_for(question, &reply)) {
            score += 1;
            println!("{} Correct\n", style("✓").green().bold());
        } else {
            println!(
                "{} Incorrect, the answer is {}\n",
                style("✗").red().bold(),
                style(&question.answer).yellow()
            );
        }
    }

    println!("Score: {}/{}", score, guide.quiz.len());
    Ok(())
}
