//! Citation formatting for answers built straight from search results.

use crate::types::RetrievedItem;

/// Answer given when the corpus has nothing for a request.
pub const NO_MATCHES_ANSWER: &str =
    "No matching documents were found in the corpus for this request.";

/// Render search results as a citation-annotated answer.
///
/// Each snippet is numbered in relevance order and followed by its source.
pub fn format_citations(items: &[RetrievedItem]) -> String {
    if items.is_empty() {
        return NO_MATCHES_ANSWER.to_string();
    }

    let mut output = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            output.push_str("\n\n");
        }
        output.push_str(&format!("[{}] {}\n    Source: {}", i + 1, item.content.trim(), item.source));
    }

    output.push_str("\n\nSources: ");
    output.push_str(&unique_sources(items).join(", "));
    output
}

/// Distinct sources in first-seen order.
pub fn unique_sources(items: &[RetrievedItem]) -> Vec<&str> {
    let mut sources: Vec<&str> = Vec::new();
    for item in items {
        if !sources.contains(&item.source.as_str()) {
            sources.push(&item.source);
        }
    }
    sources
}
