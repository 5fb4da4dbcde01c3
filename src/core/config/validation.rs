use serde_json::{Map, Value};

use super::service::ConfigError;

pub fn validate_config(config: &Value) -> Result<(), ConfigError> {
    let root = config
        .as_object()
        .ok_or_else(|| config_type_error("root", "object"))?;

    if let Some(server) = expect_optional_object(root, "server")? {
        validate_optional_string_field(server, "server.host", "host")?;
        validate_u64_field(server, "server.port", "port", 0, 65_535)?;
        validate_string_array_field(
            server,
            "server.cors_allowed_origins",
            "cors_allowed_origins",
        )?;
    }

    let store = expect_optional_object(root, "store")?;
    let store_kind = match store.and_then(|s| s.get("kind")) {
        None => "rpc",
        Some(Value::String(kind)) if kind == "rpc" || kind == "memory" => kind.as_str(),
        Some(_) => return Err(config_type_error("store.kind", "one of \"rpc\", \"memory\"")),
    };
    let empty = Map::new();
    let store = store.unwrap_or(&empty);
    validate_optional_string_field(store, "store.api_key", "api_key")?;
    validate_optional_string_field(store, "store.rpc_function", "rpc_function")?;
    validate_u64_field(store, "store.timeout_secs", "timeout_secs", 1, 600)?;
    match store_kind {
        "memory" => validate_required_string_field(store, "store.corpus_path", "corpus_path")?,
        _ => validate_required_string_field(store, "store.url", "url")?,
    }

    if let Some(embedding) = expect_optional_object(root, "embedding")? {
        validate_optional_string_field(embedding, "embedding.base_url", "base_url")?;
        validate_optional_string_field(embedding, "embedding.api_key", "api_key")?;
        validate_optional_string_field(embedding, "embedding.model", "model")?;
        validate_u64_field(embedding, "embedding.dimensions", "dimensions", 1, 65_536)?;
        validate_u64_field(embedding, "embedding.timeout_secs", "timeout_secs", 1, 600)?;
    }

    if let Some(generation) = expect_optional_object(root, "generation")? {
        validate_optional_string_field(generation, "generation.base_url", "base_url")?;
        validate_optional_string_field(generation, "generation.api_key", "api_key")?;
        validate_optional_string_field(generation, "generation.model", "model")?;
        validate_u64_field(
            generation,
            "generation.max_tokens",
            "max_tokens",
            1,
            1_000_000,
        )?;
        validate_f64_field(generation, "generation.temperature", "temperature", 0.0, 2.0)?;
        validate_u64_field(generation, "generation.timeout_secs", "timeout_secs", 1, 600)?;
    }

    if let Some(retrieval) = expect_optional_object(root, "retrieval")? {
        validate_f64_field(
            retrieval,
            "retrieval.match_threshold",
            "match_threshold",
            0.0,
            1.0,
        )?;
        validate_u64_field(retrieval, "retrieval.match_count", "match_count", 1, 100)?;
        validate_u64_field(
            retrieval,
            "retrieval.fetch_concurrency",
            "fetch_concurrency",
            1,
            256,
        )?;
    }

    let documents = expect_optional_object(root, "documents")?.unwrap_or(&empty);
    validate_required_string_field(documents, "documents.raw_base_url", "raw_base_url")?;
    validate_optional_string_field(documents, "documents.extension", "extension")?;
    validate_optional_string_field(documents, "documents.public_base_url", "public_base_url")?;
    validate_u64_field(documents, "documents.timeout_secs", "timeout_secs", 1, 600)?;

    if let Some(logging) = expect_optional_object(root, "logging")? {
        validate_optional_string_field(logging, "logging.level", "level")?;
        validate_optional_string_field(logging, "logging.dir", "dir")?;
    }

    Ok(())
}

fn expect_optional_object<'a>(
    root: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, ConfigError> {
    match root.get(key) {
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(config_type_error(key, "object")),
    }
}

fn validate_u64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: u64,
    max: u64,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    if value.is_null() {
        return Ok(());
    }
    let Some(number) = value.as_u64() else {
        return Err(config_type_error(path, "integer"));
    };
    if number < min || number > max {
        return Err(ConfigError::invalid(
            path,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

fn validate_f64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: f64,
    max: f64,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(number) = value.as_f64() else {
        return Err(config_type_error(path, "number"));
    };
    if !(min..=max).contains(&number) {
        return Err(ConfigError::invalid(
            path,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

fn validate_required_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let value = section
        .get(key)
        .ok_or_else(|| ConfigError::invalid(path, "value is required"))?;
    let Some(text) = value.as_str() else {
        return Err(config_type_error(path, "string"));
    };
    if text.trim().is_empty() {
        return Err(ConfigError::invalid(path, "value cannot be empty"));
    }
    Ok(())
}

fn validate_optional_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    if value.is_null() || value.as_str().is_some() {
        return Ok(());
    }
    Err(config_type_error(path, "string"))
}

fn validate_string_array_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(items) = value.as_array() else {
        return Err(config_type_error(path, "array of strings"));
    };
    for (index, item) in items.iter().enumerate() {
        let Some(text) = item.as_str() else {
            return Err(config_type_error(&format!("{}[{}]", path, index), "string"));
        };
        if text.trim().is_empty() {
            return Err(ConfigError::invalid(
                &format!("{}[{}]", path, index),
                "value cannot be empty",
            ));
        }
    }
    Ok(())
}

fn config_type_error(path: &str, expected: &str) -> ConfigError {
    ConfigError::invalid(path, format!("expected {}", expected))
}
