//! VectorMatcher trait: similarity search over the document corpus.
//!
//! Two backends exist: `RpcVectorMatcher` calls a match function exposed by
//! a hosted vector store, `MemoryVectorMatcher` ranks a corpus file loaded
//! at startup. Both funnel raw rows through [`rank_matches`].

use std::collections::HashSet;

use async_trait::async_trait;

use super::error::MatchError;
use super::types::DocumentMatch;
use crate::llm::EmbeddingVector;

#[async_trait]
pub trait VectorMatcher: Send + Sync {
    /// Backend name for logs and status output.
    fn name(&self) -> &str;

    /// Return up to `limit` documents with similarity strictly above
    /// `threshold`, most similar first.
    ///
    /// An empty list means nothing was relevant; `Err` means the store
    /// itself could not be queried.
    async fn find_matches(
        &self,
        vector: &EmbeddingVector,
        threshold: f64,
        limit: usize,
    ) -> Result<Vec<DocumentMatch>, MatchError>;
}

/// Filters, orders and de-duplicates candidate rows.
///
/// Rows at or below `threshold` and non-finite scores are dropped. The sort
/// is stable so ties keep the order the store produced them in. A repeated
/// id keeps only its first (highest) occurrence.
pub fn rank_matches(
    candidates: Vec<DocumentMatch>,
    threshold: f64,
    limit: usize,
) -> Vec<DocumentMatch> {
    let mut ranked: Vec<DocumentMatch> = candidates
        .into_iter()
        .filter(|m| m.similarity.is_finite() && m.similarity > threshold)
        .collect();

    ranked.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

    let mut seen = HashSet::new();
    ranked.retain(|m| seen.insert(m.id.clone()));
    ranked.truncate(limit);
    ranked
}
