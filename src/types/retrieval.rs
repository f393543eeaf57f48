//! Retrieval result types

use serde::{Deserialize, Serialize};

/// One ranked match from the retrieval index.
///
/// Snippets arrive ordered by descending relevance score; the order is
/// preserved all the way into the assembled prompt context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedSnippet {
    /// Text content associated with the indexed vector.
    pub text: String,
    /// Relevance score as reported by the index.
    pub score: f32,
}

impl RetrievedSnippet {
    pub fn new(text: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            score,
        }
    }
}
