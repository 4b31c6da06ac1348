//! Token counting seam.
//!
//! The engine treats the counter as a black box with one contract: monotonic
//! in text length and deterministic for identical text.

/// Estimates the token cost of a text span.
pub trait TokenCounter: Sync {
    fn count(&self, text: &str) -> usize;
}

/// Fast heuristic counter: code averages ~4 characters per token, with the
/// whitespace-delimited word count as a floor.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenCounter;

impl TokenCounter for HeuristicTokenCounter {
    fn count(&self, text: &str) -> usize {
        let char_estimate = text.len() / 4;
        let word_estimate = text.split_whitespace().count();
        char_estimate.max(word_estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_free() {
        assert_eq!(HeuristicTokenCounter.count(""), 0);
    }

    #[test]
    fn estimate_is_monotonic_in_length() {
        let counter = HeuristicTokenCounter;
        let short = counter.count("fn main() {}");
        let long = counter.count("fn main() { println!(\"hello world\"); }");
        assert!(long >= short);
    }

    #[test]
    fn estimate_is_deterministic() {
        let counter = HeuristicTokenCounter;
        let text = "use std::collections::HashMap;";
        assert_eq!(counter.count(text), counter.count(text));
    }
}
