//! Values that flow through one answer request.
//!
//! Every stage produces a fresh value for the next one; nothing here is
//! mutated after construction or kept beyond the request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::QueryError;

/// User question, guaranteed non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Accepts any text that is non-empty after trimming. The text itself is
    /// kept verbatim so the prompt quotes exactly what the user typed.
    pub fn parse(raw: impl Into<String>) -> Result<Self, QueryError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A corpus document that cleared the similarity threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMatch {
    pub id: String,
    pub title: String,
    pub url: String,
    pub similarity: f64,
}

/// Fetched source split into front-matter and body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub metadata: BTreeMap<String, String>,
    pub body: String,
}

impl ParsedDocument {
    /// Stand-in for a document that could not be fetched or parsed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty() && self.body.is_empty()
    }
}

/// Terminal artifact handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerResult {
    pub message: String,
    pub docs: Vec<DocumentMatch>,
}

impl AnswerResult {
    pub fn new(message: impl Into<String>, docs: Vec<DocumentMatch>) -> Self {
        Self {
            message: message.into(),
            docs,
        }
    }

    pub fn message_only(message: impl Into<String>) -> Self {
        Self::new(message, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_queries_are_rejected() {
        assert_eq!(Query::parse(""), Err(QueryError::Empty));
        assert_eq!(Query::parse("  \n\t "), Err(QueryError::Empty));
    }

    #[test]
    fn query_text_is_kept_verbatim() {
        let query = Query::parse("  How do I submit a project? ").expect("query");
        assert_eq!(query.as_str(), "  How do I submit a project? ");
    }

    #[test]
    fn answer_serializes_docs_in_wire_shape() {
        let result = AnswerResult::new(
            "Use the submit button.",
            vec![DocumentMatch {
                id: "submit/overview".to_string(),
                title: "Submit".to_string(),
                url: "https://x/submit".to_string(),
                similarity: 0.81,
            }],
        );
        let value = serde_json::to_value(&result).expect("json");
        assert_eq!(value["message"], "Use the submit button.");
        assert_eq!(value["docs"][0]["title"], "Submit");
        assert_eq!(value["docs"][0]["url"], "https://x/submit");
        assert_eq!(value["docs"][0]["id"], "submit/overview");
    }
}
