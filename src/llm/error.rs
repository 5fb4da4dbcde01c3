use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Embedding provider returned no vector")]
    EmptyResponse,

    #[error("Embedding has {actual} dimensions, expected {expected}")]
    Dimensions { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Generation provider returned no content")]
    EmptyResponse,
}
