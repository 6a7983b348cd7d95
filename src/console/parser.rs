//! Line tokenizer
//!
//! Whitespace splitting only: there is no quoting or escaping, so keys and
//! values cannot carry whitespace unambiguously. A value spread over
//! several tokens is rebuilt with single spaces, collapsing any runs of
//! whitespace in the original line.

/// Split a line into non-empty whitespace-separated tokens
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Rebuild a value from the tokens that follow the key
pub fn join_value(tokens: &[&str]) -> String {
    tokens.join(" ")
}
