use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{json, Map, Value};
use thiserror::Error;

use super::app_config::AppConfig;
use super::paths::AppPaths;
use super::validation::validate_config;

const REDACT_PLACEHOLDER: &str = "****";

const SENSITIVE_PATTERNS: [&str; 8] = [
    "api_key",
    "secret",
    "password",
    "_token",
    "token_",
    "credential",
    "private_key",
    "bearer",
];

const SENSITIVE_WHITELIST: [&str; 2] = ["max_tokens", "tokens"];

/// Environment variables that override a single config path.
const ENV_OVERRIDES: [(&str, &[&str]); 6] = [
    ("DOCSQA_HOST", &["server", "host"]),
    ("DOCSQA_STORE_URL", &["store", "url"]),
    ("DOCSQA_STORE_KEY", &["store", "api_key"]),
    ("DOCSQA_DOCS_BASE_URL", &["documents", "raw_base_url"]),
    ("DOCSQA_LOG_DIR", &["logging", "dir"]),
    ("DOCSQA_LOG_LEVEL", &["logging", "level"]),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid config at '{path}': {reason}")]
    Invalid { path: String, reason: String },

    #[error("Failed to deserialize config: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn invalid(path: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Clone)]
pub struct ConfigService {
    paths: Arc<AppPaths>,
}

impl ConfigService {
    pub fn new(paths: Arc<AppPaths>) -> Self {
        Self { paths }
    }

    /// Loads `config.yml` merged with `secrets.yaml` and the process
    /// environment, validates it, and returns the typed config together
    /// with the raw merged value.
    pub fn load(&self) -> Result<(AppConfig, Value), ConfigError> {
        self.load_with_env(|key| env::var(key).ok())
    }

    pub fn load_with_env<F>(&self, lookup: F) -> Result<(AppConfig, Value), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let public_config = load_yaml_file(&self.paths.config_path)?;
        let secrets_config = load_yaml_file(&self.paths.secrets_path)?;
        let mut merged = deep_merge(&public_config, &secrets_config);
        apply_env_overrides(&mut merged, lookup);

        validate_config(&merged)?;
        let config: AppConfig = serde_json::from_value(merged.clone())?;
        Ok((config, merged))
    }

    pub fn redact_sensitive_values(&self, value: &Value) -> Value {
        redact_sensitive_values(value)
    }
}

fn load_yaml_file(path: &Path) -> Result<Value, ConfigError> {
    if !path.exists() {
        return Ok(Value::Object(Map::new()));
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_yaml::from_str::<Value>(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(_) => Ok(value),
        Value::Null => Ok(Value::Object(Map::new())),
        _ => Err(ConfigError::invalid("root", "expected object")),
    }
}

fn apply_env_overrides<F>(config: &mut Value, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for (var, path) in ENV_OVERRIDES {
        if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
            ensure_object_path(config, path, Value::String(value));
        }
    }

    if let Some(port) = lookup("PORT").and_then(|v| v.trim().parse::<u16>().ok()) {
        ensure_object_path(config, &["server", "port"], json!(port));
    }

    // One key serves both providers unless a section sets its own.
    if let Some(key) = lookup("OPENAI_API_KEY").filter(|v| !v.trim().is_empty()) {
        for section in ["embedding", "generation"] {
            let has_key = config
                .get(section)
                .and_then(|s| s.get("api_key"))
                .and_then(|v| v.as_str())
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false);
            if !has_key {
                ensure_object_path(config, &[section, "api_key"], Value::String(key.clone()));
            }
        }
    }
}

fn ensure_object_path(config: &mut Value, path: &[&str], value: Value) {
    if path.is_empty() {
        return;
    }

    let mut current = config;
    for (index, key) in path.iter().enumerate() {
        if index == path.len() - 1 {
            if let Some(map) = current.as_object_mut() {
                map.insert(key.to_string(), value);
            }
            return;
        }

        if !current.get(*key).map(|v| v.is_object()).unwrap_or(false) {
            let Some(map) = current.as_object_mut() else {
                return;
            };
            map.insert((*key).to_string(), Value::Object(Map::new()));
        }

        let Some(next) = current.get_mut(*key) else {
            return;
        };
        current = next;
    }
}

fn deep_merge(base: &Value, override_value: &Value) -> Value {
    match (base, override_value) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            let mut merged: Map<String, Value> = base_map.clone();
            for (key, value) in override_map {
                let merged_value = match merged.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), merged_value);
            }
            Value::Object(merged)
        }
        _ => override_value.clone(),
    }
}

fn redact_sensitive_values(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut redacted = Map::new();
            for (key, val) in map {
                if is_sensitive_key(key) && !val.is_null() {
                    redacted.insert(key.clone(), Value::String(REDACT_PLACEHOLDER.to_string()));
                } else {
                    redacted.insert(key.clone(), redact_sensitive_values(val));
                }
            }
            Value::Object(redacted)
        }
        Value::Array(items) => Value::Array(items.iter().map(redact_sensitive_values).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let key_lower = key.to_lowercase();
    if SENSITIVE_WHITELIST
        .iter()
        .any(|allowed| *allowed == key_lower)
    {
        return false;
    }
    SENSITIVE_PATTERNS
        .iter()
        .any(|pattern| key_lower.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::core::config::StoreKind;

    fn service_in(dir: &Path) -> ConfigService {
        ConfigService::new(Arc::new(AppPaths {
            project_root: dir.to_path_buf(),
            config_path: dir.join("config.yml"),
            secrets_path: dir.join("secrets.yaml"),
        }))
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn deep_merge_merges_objects_and_overrides_scalars() {
        let base = json!({
            "a": 1,
            "b": { "c": 2, "d": 3 },
            "arr": [1, 2]
        });
        let override_value = json!({
            "b": { "c": 99 },
            "arr": [3],
            "e": "x"
        });

        let merged = deep_merge(&base, &override_value);

        assert_eq!(
            merged,
            json!({
                "a": 1,
                "b": { "c": 99, "d": 3 },
                "arr": [3],
                "e": "x"
            })
        );
    }

    #[test]
    fn redact_sensitive_values_replaces_secrets_only() {
        let input = json!({
            "store": { "api_key": "secret", "url": "https://store" },
            "generation": { "max_tokens": 1000, "api_key": "sk-123" }
        });

        let redacted = redact_sensitive_values(&input);

        assert_eq!(
            redacted,
            json!({
                "store": { "api_key": "****", "url": "https://store" },
                "generation": { "max_tokens": 1000, "api_key": "****" }
            })
        );
    }

    #[test]
    fn load_merges_secrets_and_env() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("config.yml"),
            "store:\n  url: https://store.example.com\nretrieval:\n  match_count: 4\ndocuments:\n  raw_base_url: https://raw.example.com\n",
        )
        .expect("write config");
        fs::write(dir.path().join("secrets.yaml"), "store:\n  api_key: service-key\n")
            .expect("write secrets");

        let service = service_in(dir.path());
        let (config, _) = service
            .load_with_env(env_from(&[("OPENAI_API_KEY", "sk-test"), ("PORT", "9090")]))
            .expect("load");

        assert_eq!(config.store.url, "https://store.example.com");
        assert_eq!(config.store.api_key, "service-key");
        assert_eq!(config.retrieval.match_count, 4);
        assert_eq!(config.embedding.api_key, "sk-test");
        assert_eq!(config.generation.api_key, "sk-test");
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn env_only_config_is_enough() {
        let dir = tempfile::tempdir().expect("tempdir");
        let service = service_in(dir.path());
        let (config, _) = service
            .load_with_env(env_from(&[
                ("DOCSQA_STORE_URL", "https://store.example.com"),
                ("DOCSQA_DOCS_BASE_URL", "https://raw.example.com"),
            ]))
            .expect("load");
        assert_eq!(config.store.kind, StoreKind::Rpc);
        assert_eq!(config.documents.raw_base_url, "https://raw.example.com");
    }

    #[test]
    fn section_api_key_wins_over_shared_key() {
        let mut config = json!({ "generation": { "api_key": "gen-key" } });
        apply_env_overrides(&mut config, env_from(&[("OPENAI_API_KEY", "shared")]));
        assert_eq!(config["generation"]["api_key"], "gen-key");
        assert_eq!(config["embedding"]["api_key"], "shared");
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("config.yml"), "store: [unclosed").expect("write");
        let err = service_in(dir.path())
            .load_with_env(env_from(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
