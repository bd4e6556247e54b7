//! Ordered "first non-empty wins" composition shared by the transcript
//! resolver and the response extractor.

use async_trait::async_trait;

/// A synchronous attempt: a named pure function from input to optional output.
pub struct Attempt<I: ?Sized, O> {
    pub name: &'static str,
    pub run: fn(&I) -> Option<O>,
}

/// Run attempts in order and return the first result, with its attempt name.
pub fn first_some<I: ?Sized, O>(input: &I, attempts: &[Attempt<I, O>]) -> Option<(&'static str, O)> {
    attempts.iter().find_map(|attempt| {
        let out = (attempt.run)(input);
        tracing::trace!(attempt = attempt.name, hit = out.is_some(), "attempt finished");
        out.map(|o| (attempt.name, o))
    })
}

/// An asynchronous strategy. Failures are expressed as `None`, never as errors.
#[async_trait]
pub trait Strategy<I: ?Sized + Sync, O>: Send + Sync {
    fn name(&self) -> &'static str;
    async fn attempt(&self, input: &I) -> Option<O>;
}

/// Await strategies one after another; the first `Some` short-circuits the rest.
pub async fn first_non_empty<I, O>(
    input: &I,
    strategies: &[Box<dyn Strategy<I, O>>],
) -> Option<(&'static str, O)>
where
    I: ?Sized + Sync,
{
    for strategy in strategies {
        match strategy.attempt(input).await {
            Some(out) => {
                tracing::debug!(strategy = strategy.name(), "strategy succeeded");
                return Some((strategy.name(), out));
            }
            None => tracing::debug!(strategy = strategy.name(), "strategy yielded nothing"),
        }
    }
    None
}

/// `Some(text)` unless the text is blank.
pub fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    fn never(_: &str) -> Option<usize> {
        None
    }

    fn length(s: &str) -> Option<usize> {
        Some(s.len())
    }

    fn panics(_: &str) -> Option<usize> {
        panic!("must not run after a success")
    }

    #[test]
    fn first_some_short_circuits() {
        let attempts = [
            Attempt { name: "never", run: never as fn(&str) -> Option<usize> },
            Attempt { name: "length", run: length },
            Attempt { name: "panics", run: panics },
        ];
        assert_eq!(first_some("abc", &attempts), Some(("length", 3)));
    }

    struct Counting {
        name: &'static str,
        result: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Strategy<str, String> for Counting {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn attempt(&self, _input: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.map(str::to_string)
        }
    }

    #[tokio::test]
    async fn first_non_empty_stops_at_first_hit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategies: Vec<Box<dyn Strategy<str, String>>> = vec![
            Box::new(Counting { name: "a", result: None, calls: calls.clone() }),
            Box::new(Counting { name: "b", result: Some("hit"), calls: calls.clone() }),
            Box::new(Counting { name: "c", result: Some("late"), calls: calls.clone() }),
        ];

        let got = first_non_empty("input", &strategies).await;
        assert_eq!(got, Some(("b", "hit".to_string())));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn blank_text_is_empty() {
        assert_eq!(non_empty("  \n".to_string()), None);
        assert_eq!(non_empty("x".to_string()), Some("x".to_string()));
    }
}
