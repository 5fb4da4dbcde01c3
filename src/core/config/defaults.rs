pub const SERVER_HOST: &str = "127.0.0.1";
pub const SERVER_PORT: u16 = 8000;

pub const STORE_RPC_FUNCTION: &str = "match_documents";
pub const STORE_TIMEOUT_SECS: u64 = 10;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const EMBEDDING_TIMEOUT_SECS: u64 = 10;

pub const GENERATION_MODEL: &str = "gpt-3.5-turbo";
pub const GENERATION_MAX_TOKENS: u32 = 1000;
pub const GENERATION_TEMPERATURE: f64 = 0.2;
pub const GENERATION_TIMEOUT_SECS: u64 = 30;

pub const MATCH_THRESHOLD: f64 = 0.3;
pub const MATCH_COUNT: usize = 3;

pub const DOCUMENT_EXTENSION: &str = ".md";
pub const DOCUMENT_TIMEOUT_SECS: u64 = 10;

pub const LOG_LEVEL: &str = "info";

pub fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost".to_string(),
        "http://localhost:3000".to_string(),
        "http://localhost:8081".to_string(),
        "http://127.0.0.1".to_string(),
        "http://127.0.0.1:3000".to_string(),
        "http://127.0.0.1:8081".to_string(),
    ]
}
