//! Brute-force cosine search over a pre-embedded corpus file.
//!
//! The file is a JSON array of `{ id, title, url, embedding }` records,
//! produced by whatever ingestion job embedded the documentation.

use std::fs;
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use super::error::MatchError;
use super::store::{rank_matches, VectorMatcher};
use super::types::DocumentMatch;
use crate::llm::EmbeddingVector;
use crate::vector_math;

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusEntry {
    pub id: String,
    pub title: String,
    pub url: String,
    pub embedding: Vec<f32>,
}

pub struct MemoryVectorMatcher {
    entries: Vec<CorpusEntry>,
    embeddings: Vec<Vec<f32>>,
    dimensions: usize,
}

impl MemoryVectorMatcher {
    /// All entries must share one non-zero dimensionality.
    pub fn new(entries: Vec<CorpusEntry>) -> anyhow::Result<Self> {
        let dimensions = entries.first().map(|e| e.embedding.len()).unwrap_or(0);
        if let Some(first) = entries.first() {
            anyhow::ensure!(dimensions > 0, "corpus entry '{}' has an empty embedding", first.id);
        }
        for entry in &entries {
            anyhow::ensure!(
                entry.embedding.len() == dimensions,
                "corpus entry '{}' has {} dimensions, expected {}",
                entry.id,
                entry.embedding.len(),
                dimensions
            );
        }

        let embeddings = entries.iter().map(|e| e.embedding.clone()).collect();
        Ok(Self {
            entries,
            embeddings,
            dimensions,
        })
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read corpus file {}", path.display()))?;
        let entries: Vec<CorpusEntry> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse corpus file {}", path.display()))?;
        let matcher = Self::new(entries)?;
        tracing::info!(
            "Loaded {} corpus entries ({} dimensions) from {}",
            matcher.len(),
            matcher.dimensions,
            path.display()
        );
        Ok(matcher)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[async_trait]
impl VectorMatcher for MemoryVectorMatcher {
    fn name(&self) -> &str {
        "memory"
    }

    async fn find_matches(
        &self,
        vector: &EmbeddingVector,
        threshold: f64,
        limit: usize,
    ) -> Result<Vec<DocumentMatch>, MatchError> {
        if vector.is_degenerate() {
            return Err(MatchError::EmptyVector);
        }
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let ranking = vector_math::rank_descending_by_cosine(vector.as_slice(), &self.embeddings)?;

        let candidates = ranking
            .into_iter()
            .filter_map(|(idx, score)| {
                self.entries.get(idx).map(|entry| DocumentMatch {
                    id: entry.id.clone(),
                    title: entry.title.clone(),
                    url: entry.url.clone(),
                    similarity: f64::from(score),
                })
            })
            .collect();

        Ok(rank_matches(candidates, threshold, limit))
    }
}
