use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to initialize embedding provider: {0}")]
    Embedding(#[source] anyhow::Error),

    #[error("Failed to initialize vector store: {0}")]
    Store(#[source] anyhow::Error),

    #[error("Failed to initialize document fetcher: {0}")]
    Documents(#[source] anyhow::Error),

    #[error("Failed to initialize generation provider: {0}")]
    Generation(#[source] anyhow::Error),
}
