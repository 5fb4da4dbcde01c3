use thiserror::Error;

use crate::vector_math::VectorError;

/// Rejected before the pipeline starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("query is empty")]
    Empty,
}

/// Failure of the vector store itself, as opposed to "nothing relevant".
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Query embedding is empty")]
    EmptyVector,

    #[error("Query embedding has {actual} dimensions, store expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Vector store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Vector store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Vector store returned malformed rows: {0}")]
    Decode(String),
}

impl From<VectorError> for MatchError {
    fn from(err: VectorError) -> Self {
        match err {
            VectorError::Empty => MatchError::EmptyVector,
            VectorError::DimensionMismatch(actual, expected) => {
                MatchError::DimensionMismatch { expected, actual }
            }
        }
    }
}

/// Per-document failure. Never leaves the fetcher; logged and replaced by
/// an empty document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid document id '{0}'")]
    InvalidId(String),

    #[error("Document request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Document source returned {0}")]
    Status(u16),

    #[error("Front-matter is not terminated")]
    UnterminatedFrontMatter,

    #[error("Front-matter is not a mapping")]
    FrontMatterNotMapping,

    #[error("Invalid front-matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),
}
