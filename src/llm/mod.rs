pub mod error;
pub mod openai;
pub mod provider;
pub mod types;

pub use error::{EmbeddingError, GenerationError};
pub use openai::{OpenAiChatProvider, OpenAiEmbeddingProvider};
pub use provider::{ChatProvider, EmbeddingProvider};
pub use types::{ChatMessage, ChatRequest, EmbeddingVector};
