use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::config::{AppConfig, AppPaths, StoreKind};
use crate::llm::{OpenAiChatProvider, OpenAiEmbeddingProvider};
use crate::rag::{
    AnswerGenerator, DocumentFetcher, HttpDocumentFetcher, MemoryVectorMatcher,
    RequestOrchestrator, RpcVectorMatcher, VectorMatcher,
};

pub mod error;

use error::InitializationError;

/// Shared, read-only state handed to every route.
///
/// Requests never mutate it; each one borrows the orchestrator and runs
/// independently.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub orchestrator: Arc<RequestOrchestrator>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: AppConfig, orchestrator: RequestOrchestrator) -> Arc<Self> {
        Arc::new(Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
            started_at: Utc::now(),
        })
    }

    /// Builds the production collaborators from configuration.
    ///
    /// This process includes:
    /// 1. Creating the embedding and chat clients
    /// 2. Connecting the configured vector store (remote RPC or corpus file)
    /// 3. Creating the document fetcher
    pub fn initialize(
        config: &AppConfig,
        paths: &AppPaths,
    ) -> Result<Arc<Self>, InitializationError> {
        let embedder = OpenAiEmbeddingProvider::new(&config.embedding)
            .map_err(|e| InitializationError::Embedding(e.into()))?;

        let matcher = build_matcher(config, paths)?;

        let fetcher: Arc<dyn DocumentFetcher> = Arc::new(
            HttpDocumentFetcher::new(&config.documents)
                .map_err(|e| InitializationError::Documents(e.into()))?,
        );

        let chat = OpenAiChatProvider::new(&config.generation)
            .map_err(|e| InitializationError::Generation(e.into()))?;
        let generator = AnswerGenerator::new(Arc::new(chat), &config.generation);

        let orchestrator = RequestOrchestrator::new(
            Arc::new(embedder),
            matcher,
            fetcher,
            generator,
            config.retrieval.clone(),
        );

        tracing::info!(
            "Answer pipeline ready: store={}, embedding={}, generation={}",
            orchestrator.matcher_name(),
            orchestrator.embedding_model(),
            orchestrator.generation_model()
        );

        Ok(Self::new(config.clone(), orchestrator))
    }
}

fn build_matcher(
    config: &AppConfig,
    paths: &AppPaths,
) -> Result<Arc<dyn VectorMatcher>, InitializationError> {
    match config.store.kind {
        StoreKind::Rpc => {
            let matcher = RpcVectorMatcher::new(
                &config.store,
                &config.documents,
                config.embedding.dimensions,
            )
            .map_err(|e| InitializationError::Store(e.into()))?;
            Ok(Arc::new(matcher))
        }
        StoreKind::Memory => {
            let raw_path = config.store.corpus_path.as_ref().ok_or_else(|| {
                InitializationError::Store(anyhow::anyhow!(
                    "store.corpus_path is required for the memory store"
                ))
            })?;
            let matcher = MemoryVectorMatcher::load(&paths.resolve(raw_path))
                .map_err(InitializationError::Store)?;

            if let Some(expected) = config.embedding.dimensions {
                if matcher.dimensions() != expected {
                    return Err(InitializationError::Store(anyhow::anyhow!(
                        "corpus has {} dimensions but embedding.dimensions is {}",
                        matcher.dimensions(),
                        expected
                    )));
                }
            }
            Ok(Arc::new(matcher))
        }
    }
}
