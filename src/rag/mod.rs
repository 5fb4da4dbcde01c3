//! Retrieval-augmented answering over the documentation corpus.
//!
//! This module provides:
//! - `VectorMatcher` backends (`RpcVectorMatcher`, `MemoryVectorMatcher`)
//! - `DocumentFetcher` with front-matter parsing and ordered fan-out
//! - prompt assembly and `AnswerGenerator`
//! - `RequestOrchestrator`, which runs one request end to end

pub mod error;
pub mod fetcher;
pub mod front_matter;
pub mod generator;
pub mod memory_store;
pub mod orchestrator;
pub mod prompt;
pub mod rpc_store;
pub mod store;
pub mod types;

pub use fetcher::{DocumentFetcher, HttpDocumentFetcher};
pub use generator::AnswerGenerator;
pub use memory_store::MemoryVectorMatcher;
pub use orchestrator::{AnswerOutcome, RequestOrchestrator};
pub use rpc_store::RpcVectorMatcher;
pub use store::VectorMatcher;
pub use types::{AnswerResult, DocumentMatch, ParsedDocument, Query};
