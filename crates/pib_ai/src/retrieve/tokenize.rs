use std::collections::HashSet;

/// Tokens this short carry no signal and are dropped.
const MIN_TOKEN_LEN: usize = 3;

fn normalize_for_tokens(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch.is_whitespace() {
            normalized.push(ch);
        } else {
            normalized.push(' ');
        }
    }
    normalized
}

/// Lowercase word tokens in input order.
///
/// Anything outside `[a-z0-9-]` separates tokens, including non-ASCII letters, and tokens
/// shorter than three characters are discarded. No stopword list.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize_for_tokens(text)
        .split_whitespace()
        .filter(|t| t.len() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// De-duplicated form of [`tokenize`].
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}
