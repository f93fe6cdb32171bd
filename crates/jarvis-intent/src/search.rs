//! Search-term extraction and web-search URL construction.

use std::sync::OnceLock;

use regex::Regex;

/// Strip the search keywords (`search`, `google`, `find`, `show me`, each
/// followed by a space) from an already case-folded query.
pub fn extract_search_term(query: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let keywords = RE.get_or_init(|| {
        Regex::new(r"search |google |find |show me ").expect("Invalid search keyword regex")
    });
    keywords.replace_all(query, "").trim().to_string()
}

/// Build a search URL for `term`, falling back to `default_term` when the
/// extracted term is empty. The term is percent-encoded into the query.
pub fn build_search_url(base_url: &str, term: &str, default_term: &str) -> String {
    let term = if term.is_empty() { default_term } else { term };
    format!("{}{}", base_url, urlencoding::encode(term))
}
