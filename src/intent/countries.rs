//! n-gram country scanner.
//!
//! Single words are taken from a split on non-word characters; multi-word
//! names come from every window of 2 to [`MAX_NAME_WORDS`] space-separated
//! words. All exact alias hits are kept, overlapping ones included, and the
//! resolved ids are deduplicated at the end.

use std::collections::BTreeSet;

use super::AliasTable;

/// Longest country name, in words, the scanner looks for.
pub const MAX_NAME_WORDS: usize = 4;

/// Find every country referenced in already-lowercased text.
pub fn scan(lower: &str, aliases: &AliasTable) -> BTreeSet<String> {
    let mut candidates: Vec<String> = single_word_candidates(lower, aliases);
    candidates.extend(multi_word_candidates(lower, aliases));

    candidates
        .iter()
        .filter_map(|alias| aliases.lookup(alias))
        .map(str::to_owned)
        .collect()
}

fn single_word_candidates(lower: &str, aliases: &AliasTable) -> Vec<String> {
    lower
        .split(|c: char| !is_word_char(c))
        .filter(|token| !token.is_empty() && aliases.contains(token))
        .map(str::to_owned)
        .collect()
}

fn multi_word_candidates(lower: &str, aliases: &AliasTable) -> Vec<String> {
    let words: Vec<&str> = lower.split(' ').collect();

    (2..=MAX_NAME_WORDS)
        .flat_map(|n| words.windows(n).map(|window| window.join(" ")))
        .map(|window| clean_window(&window))
        .filter(|window| aliases.contains(window))
        .collect()
}

/// Drop characters outside printable ASCII, and commas.
fn clean_window(window: &str) -> String {
    window
        .chars()
        .filter(|c| (' '..='~').contains(c) && *c != ',')
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
