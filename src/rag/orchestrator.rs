//! RequestOrchestrator: sequences one answer request.
//!
//! ```text
//! Idle -> Embedding -> Matching -+-> NoMatch                    (200, clarification)
//!                                +-> ErrorResponding            (500, store failure)
//!                                +-> Fetching -> Prompting -> Generating -> Responding
//! ```
//!
//! Each collaborator contains its own failures; the orchestrator never
//! retries a stage.

use std::fmt;
use std::sync::Arc;

use super::error::MatchError;
use super::fetcher::{fetch_all, DocumentFetcher};
use super::generator::AnswerGenerator;
use super::prompt;
use super::store::VectorMatcher;
use super::types::{AnswerResult, DocumentMatch, Query};
use crate::core::config::RetrievalConfig;
use crate::llm::{EmbeddingProvider, EmbeddingVector};

/// Shown when nothing in the corpus cleared the similarity threshold.
pub const CLARIFICATION_MESSAGE: &str = "Sorry, I couldn't find anything in the documentation about that. \
Could you rephrase your question or add more detail?";

/// Shown when the vector store could not be queried.
pub const STORE_ERROR_MESSAGE: &str = "Error matching documents.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Embedding,
    Matching,
    NoMatch,
    ErrorResponding,
    Fetching,
    Prompting,
    Generating,
    Responding,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Embedding => "embedding",
            Stage::Matching => "matching",
            Stage::NoMatch => "no_match",
            Stage::ErrorResponding => "error_responding",
            Stage::Fetching => "fetching",
            Stage::Prompting => "prompting",
            Stage::Generating => "generating",
            Stage::Responding => "responding",
        };
        f.write_str(name)
    }
}

/// How a request ended. "Nothing relevant" and "store broken" stay
/// distinct here even though both carry an empty docs list.
#[derive(Debug)]
pub enum AnswerOutcome {
    Answered(AnswerResult),
    NoRelevantContent,
    StoreFailure(MatchError),
}

impl AnswerOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, AnswerOutcome::StoreFailure(_))
    }

    pub fn terminal_stage(&self) -> Stage {
        match self {
            AnswerOutcome::Answered(_) => Stage::Responding,
            AnswerOutcome::NoRelevantContent => Stage::NoMatch,
            AnswerOutcome::StoreFailure(_) => Stage::ErrorResponding,
        }
    }

    /// The caller-facing result for this outcome.
    pub fn into_result(self) -> AnswerResult {
        match self {
            AnswerOutcome::Answered(result) => result,
            AnswerOutcome::NoRelevantContent => AnswerResult::message_only(CLARIFICATION_MESSAGE),
            AnswerOutcome::StoreFailure(_) => AnswerResult::message_only(STORE_ERROR_MESSAGE),
        }
    }
}

pub struct RequestOrchestrator {
    embedder: Arc<dyn EmbeddingProvider>,
    matcher: Arc<dyn VectorMatcher>,
    fetcher: Arc<dyn DocumentFetcher>,
    generator: AnswerGenerator,
    retrieval: RetrievalConfig,
}

impl RequestOrchestrator {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        matcher: Arc<dyn VectorMatcher>,
        fetcher: Arc<dyn DocumentFetcher>,
        generator: AnswerGenerator,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            matcher,
            fetcher,
            generator,
            retrieval,
        }
    }

    pub fn retrieval(&self) -> &RetrievalConfig {
        &self.retrieval
    }

    pub fn matcher_name(&self) -> &str {
        self.matcher.name()
    }

    pub fn embedding_model(&self) -> &str {
        self.embedder.model_name()
    }

    pub fn generation_model(&self) -> &str {
        self.generator.model()
    }

    pub async fn answer(&self, query: &Query) -> AnswerOutcome {
        enter(Stage::Embedding);
        let vector = self.embed(query).await;

        enter(Stage::Matching);
        let matches = match self
            .matcher
            .find_matches(
                &vector,
                self.retrieval.match_threshold,
                self.retrieval.match_count,
            )
            .await
        {
            Ok(matches) => matches,
            Err(err) => {
                tracing::error!("Vector store {} failed: {}", self.matcher.name(), err);
                enter(Stage::ErrorResponding);
                return AnswerOutcome::StoreFailure(err);
            }
        };

        if matches.is_empty() {
            tracing::info!(
                "No documents above threshold {}",
                self.retrieval.match_threshold
            );
            enter(Stage::NoMatch);
            return AnswerOutcome::NoRelevantContent;
        }

        let message = self.answer_from(query, &matches).await;

        enter(Stage::Responding);
        AnswerOutcome::Answered(AnswerResult::new(message, matches))
    }

    async fn embed(&self, query: &Query) -> EmbeddingVector {
        match self.embedder.embed(query.as_str()).await {
            Ok(vector) => vector,
            Err(err) => {
                tracing::warn!(
                    "Embedding via {} failed, continuing with an empty vector: {}",
                    self.embedder.model_name(),
                    err
                );
                EmbeddingVector::degenerate()
            }
        }
    }

    async fn answer_from(&self, query: &Query, matches: &[DocumentMatch]) -> String {
        enter(Stage::Fetching);
        let documents = fetch_all(
            self.fetcher.as_ref(),
            matches,
            self.retrieval.fetch_concurrency,
        )
        .await;
        let loaded = documents.iter().filter(|d| !d.body.is_empty()).count();
        tracing::debug!("Loaded {}/{} matched documents", loaded, matches.len());

        enter(Stage::Prompting);
        let bodies: Vec<&str> = documents.iter().map(|d| d.body.as_str()).collect();
        let prompt = prompt::assemble(query.as_str(), &bodies);

        enter(Stage::Generating);
        self.generator.generate(&prompt).await
    }
}

fn enter(stage: Stage) {
    tracing::debug!(stage = %stage, "Answer pipeline stage");
}
