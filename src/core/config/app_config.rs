use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Typed view of the merged configuration.
///
/// Every section is optional in the YAML; anything missing falls back to
/// the values in [`defaults`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
    pub retrieval: RetrievalConfig,
    pub documents: DocumentsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
            cors_allowed_origins: defaults::default_cors_origins(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Remote procedure call against a hosted vector store.
    #[default]
    Rpc,
    /// Cosine search over a corpus file loaded at startup.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub kind: StoreKind,
    pub url: String,
    pub api_key: String,
    pub rpc_function: String,
    pub corpus_path: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::default(),
            url: String::new(),
            api_key: String::new(),
            rpc_function: defaults::STORE_RPC_FUNCTION.to_string(),
            corpus_path: None,
            timeout_secs: defaults::STORE_TIMEOUT_SECS,
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub dimensions: Option<usize>,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::OPENAI_BASE_URL.to_string(),
            api_key: String::new(),
            model: defaults::EMBEDDING_MODEL.to_string(),
            dimensions: None,
            timeout_secs: defaults::EMBEDDING_TIMEOUT_SECS,
        }
    }
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::OPENAI_BASE_URL.to_string(),
            api_key: String::new(),
            model: defaults::GENERATION_MODEL.to_string(),
            max_tokens: defaults::GENERATION_MAX_TOKENS,
            temperature: defaults::GENERATION_TEMPERATURE,
            timeout_secs: defaults::GENERATION_TIMEOUT_SECS,
        }
    }
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub match_threshold: f64,
    pub match_count: usize,
    /// Upper bound on simultaneous document fetches. `None` fetches every
    /// match at once.
    pub fetch_concurrency: Option<usize>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            match_threshold: defaults::MATCH_THRESHOLD,
            match_count: defaults::MATCH_COUNT,
            fetch_concurrency: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    /// Location raw document sources are served from, e.g. a raw git host.
    pub raw_base_url: String,
    pub extension: String,
    /// Used to build a link for store rows that come back without a url.
    pub public_base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            raw_base_url: String::new(),
            extension: defaults::DOCUMENT_EXTENSION.to_string(),
            public_base_url: None,
            timeout_secs: defaults::DOCUMENT_TIMEOUT_SECS,
        }
    }
}

impl DocumentsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_yields_observed_defaults() {
        let config: AppConfig = serde_json::from_value(json!({})).expect("defaults");
        assert_eq!(config.retrieval.match_threshold, 0.3);
        assert_eq!(config.retrieval.match_count, 3);
        assert_eq!(config.generation.max_tokens, 1000);
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.store.kind, StoreKind::Rpc);
        assert_eq!(config.store.rpc_function, "match_documents");
        assert!(config.retrieval.fetch_concurrency.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: AppConfig = serde_json::from_value(json!({
            "retrieval": { "match_count": 5 },
            "store": { "kind": "memory", "corpus_path": "corpus.json" }
        }))
        .expect("config");
        assert_eq!(config.retrieval.match_count, 5);
        assert_eq!(config.retrieval.match_threshold, 0.3);
        assert_eq!(config.store.kind, StoreKind::Memory);
        assert_eq!(config.store.timeout(), Duration::from_secs(10));
    }
}
