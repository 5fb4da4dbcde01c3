pub mod app_config;
pub mod defaults;
pub mod paths;
pub mod service;
pub mod validation;

pub use app_config::{
    AppConfig, DocumentsConfig, EmbeddingConfig, GenerationConfig, LoggingConfig,
    RetrievalConfig, ServerConfig, StoreConfig, StoreKind,
};
pub use paths::AppPaths;
pub use service::{ConfigError, ConfigService};
