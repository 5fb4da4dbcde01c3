//! Clients for OpenAI-compatible `/embeddings` and `/chat/completions`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::{EmbeddingError, GenerationError};
use super::provider::{ChatProvider, EmbeddingProvider};
use super::types::{ChatRequest, EmbeddingVector};
use crate::core::config::{EmbeddingConfig, GenerationConfig};
use crate::core::errors::ClientBuildError;

fn build_client(
    service: &'static str,
    api_key: &str,
    timeout: Duration,
) -> Result<Client, ClientBuildError> {
    let mut headers = HeaderMap::new();
    let api_key = api_key.trim();
    if !api_key.is_empty() {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| ClientBuildError::InvalidApiKey(service))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()?)
}

#[derive(Clone)]
pub struct OpenAiEmbeddingProvider {
    endpoint: String,
    model: String,
    dimensions: Option<usize>,
    client: Client,
}

impl OpenAiEmbeddingProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self, ClientBuildError> {
        Ok(Self {
            endpoint: format!("{}/embeddings", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            dimensions: config.dimensions,
            client: build_client("embedding", &config.api_key, config.timeout())?,
        })
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    encoding_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
            encoding_format: "float",
        };

        let res = self.client.post(&self.endpoint).json(&request).send().await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(EmbeddingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: EmbeddingResponse = res.json().await?;
        let embedding = payload
            .data
            .into_iter()
            .next()
            .map(|entry| entry.embedding)
            .filter(|values| !values.is_empty())
            .ok_or(EmbeddingError::EmptyResponse)?;

        if let Some(expected) = self.dimensions {
            if embedding.len() != expected {
                return Err(EmbeddingError::Dimensions {
                    expected,
                    actual: embedding.len(),
                });
            }
        }

        Ok(EmbeddingVector::new(embedding))
    }
}

#[derive(Clone)]
pub struct OpenAiChatProvider {
    base_url: String,
    client: Client,
}

impl OpenAiChatProvider {
    pub fn new(config: &GenerationConfig) -> Result<Self, ClientBuildError> {
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: build_client("generation", &config.api_key, config.timeout())?,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiChatProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn chat(&self, request: ChatRequest, model_id: &str) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = json!({
            "model": model_id,
            "messages": request.messages,
            "stream": false,
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(t) = request.temperature {
                obj.insert("temperature".to_string(), json!(t));
            }
            if let Some(t) = request.max_tokens {
                obj.insert("max_tokens".to_string(), json!(t));
            }
        }

        let res = self.client.post(&url).json(&body).send().await?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let payload: Value = res.json().await?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .trim()
            .to_string();

        if content.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        Ok(content)
    }
}
