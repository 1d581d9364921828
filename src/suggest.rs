use crate::normalize::normalize;

pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_SUGGESTIONS: usize = 8;

pub fn suggestions(query: &str, corpus: &[String]) -> Vec<String> {
    let term = query.trim();
    if term.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    let needle = normalize(term);
    corpus
        .iter()
        .filter(|city| normalize(city).contains(&needle))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}
