//! Core types for the retrieval crate.

use serde::{Deserialize, Serialize};

/// One ranked snippet returned by the search service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedItem {
    /// Text of the snippet
    pub content: String,

    /// Document the snippet came from
    pub source: String,

    /// Relevance score, when the service supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl RetrievedItem {
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            score: None,
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}

/// One line of the corpus JSONL file handed to the search service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub content: String,
    pub source: String,
}

impl CorpusRecord {
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieved_item_score_is_optional() {
        let item: RetrievedItem =
            serde_json::from_str(r#"{"content":"c","source":"s.md"}"#).unwrap();
        assert_eq!(item, RetrievedItem::new("c", "s.md"));

        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("score"));
    }

    #[test]
    fn test_corpus_record_field_order() {
        let record = CorpusRecord::new("text", "doc.md");
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"content":"text","source":"doc.md"}"#
        );
    }
}
