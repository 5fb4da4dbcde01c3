//! Vector store reached through a PostgREST-style remote procedure call.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::MatchError;
use super::store::{rank_matches, VectorMatcher};
use super::types::DocumentMatch;
use crate::core::config::{DocumentsConfig, StoreConfig};
use crate::core::errors::ClientBuildError;
use crate::llm::EmbeddingVector;

pub struct RpcVectorMatcher {
    endpoint: String,
    expected_dimensions: Option<usize>,
    public_base_url: Option<String>,
    client: Client,
}

#[derive(Serialize)]
struct MatchRequest<'a> {
    query_embedding: &'a [f32],
    match_threshold: f64,
    match_count: usize,
}

/// One row of the match function's result set. Stores differ in whether
/// they hand back a url or only the body, and in the id column's type.
#[derive(Debug, Deserialize)]
struct MatchRow {
    id: Value,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    similarity: f64,
}

impl RpcVectorMatcher {
    pub fn new(
        store: &StoreConfig,
        documents: &DocumentsConfig,
        expected_dimensions: Option<usize>,
    ) -> Result<Self, ClientBuildError> {
        let mut headers = HeaderMap::new();
        let api_key = store.api_key.trim();
        if !api_key.is_empty() {
            let invalid = |_| ClientBuildError::InvalidApiKey("store");
            let mut key = HeaderValue::from_str(api_key).map_err(invalid)?;
            let mut bearer =
                HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(invalid)?;
            key.set_sensitive(true);
            bearer.set_sensitive(true);
            headers.insert("apikey", key);
            headers.insert(AUTHORIZATION, bearer);
        }

        let client = Client::builder()
            .timeout(store.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            endpoint: format!(
                "{}/rest/v1/rpc/{}",
                store.url.trim_end_matches('/'),
                store.rpc_function
            ),
            expected_dimensions,
            public_base_url: documents
                .public_base_url
                .as_ref()
                .map(|base| base.trim_end_matches('/').to_string()),
            client,
        })
    }

    fn row_to_match(&self, row: MatchRow) -> Result<DocumentMatch, MatchError> {
        let id = match row.id {
            Value::String(id) => id,
            Value::Number(id) => id.to_string(),
            other => {
                return Err(MatchError::Decode(format!(
                    "unsupported id value {}",
                    other
                )))
            }
        };

        let url = match row.url.filter(|url| !url.trim().is_empty()) {
            Some(url) => url,
            None => self
                .public_base_url
                .as_ref()
                .map(|base| format!("{}/{}", base, id.trim_start_matches('/')))
                .unwrap_or_default(),
        };
        let title = row
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| id.clone());

        Ok(DocumentMatch {
            id,
            title,
            url,
            similarity: row.similarity,
        })
    }
}

#[async_trait]
impl VectorMatcher for RpcVectorMatcher {
    fn name(&self) -> &str {
        "rpc"
    }

    async fn find_matches(
        &self,
        vector: &EmbeddingVector,
        threshold: f64,
        limit: usize,
    ) -> Result<Vec<DocumentMatch>, MatchError> {
        if vector.is_degenerate() {
            return Err(MatchError::EmptyVector);
        }
        if let Some(expected) = self.expected_dimensions {
            if vector.dimensions() != expected {
                return Err(MatchError::DimensionMismatch {
                    expected,
                    actual: vector.dimensions(),
                });
            }
        }

        let request = MatchRequest {
            query_embedding: vector.as_slice(),
            match_threshold: threshold,
            match_count: limit,
        };

        let res = self.client.post(&self.endpoint).json(&request).send().await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(MatchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<MatchRow> = res
            .json()
            .await
            .map_err(|err| MatchError::Decode(err.to_string()))?;

        let candidates = rows
            .into_iter()
            .map(|row| self.row_to_match(row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rank_matches(candidates, threshold, limit))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;
    use crate::test_support::spawn_stub;

    fn matcher_for(base: String, public_base_url: Option<&str>) -> RpcVectorMatcher {
        let store = StoreConfig {
            url: base,
            api_key: "service-key".to_string(),
            ..Default::default()
        };
        let documents = DocumentsConfig {
            public_base_url: public_base_url.map(str::to_string),
            ..Default::default()
        };
        RpcVectorMatcher::new(&store, &documents, None).expect("client")
    }

    #[tokio::test]
    async fn sends_rpc_arguments_and_ranks_rows() {
        let seen = Arc::new(Mutex::new(None::<Value>));
        let captured = seen.clone();
        let app = Router::new().route(
            "/rest/v1/rpc/match_documents",
            post(move |Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = Some(body);
                    Json(json!([
                        { "id": "guide/b", "title": "B", "url": "https://x/b", "similarity": 0.5 },
                        { "id": "guide/a", "title": "A", "url": "https://x/a", "similarity": 0.9 },
                        { "id": "guide/c", "title": "C", "url": "https://x/c", "similarity": 0.2 }
                    ]))
                }
            }),
        );
        let base = spawn_stub(app).await;

        let matches = matcher_for(base, None)
            .find_matches(&EmbeddingVector::new(vec![0.1, 0.2]), 0.3, 3)
            .await
            .expect("matches");

        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["guide/a", "guide/b"]);

        let body = seen.lock().unwrap().clone().expect("request captured");
        assert_eq!(body["match_threshold"], 0.3);
        assert_eq!(body["match_count"], 3);
        assert_eq!(body["query_embedding"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn numeric_ids_and_missing_urls_are_filled_in() {
        let app = Router::new().route(
            "/rest/v1/rpc/match_documents",
            post(|| async {
                Json(json!([{ "id": 42, "body": "text", "similarity": 0.7 }]))
            }),
        );
        let base = spawn_stub(app).await;

        let matches = matcher_for(base, Some("https://docs.example.com/"))
            .find_matches(&EmbeddingVector::new(vec![1.0]), 0.3, 3)
            .await
            .expect("matches");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "42");
        assert_eq!(matches[0].title, "42");
        assert_eq!(matches[0].url, "https://docs.example.com/42");
    }

    #[tokio::test]
    async fn empty_result_set_is_not_an_error() {
        let app = Router::new().route(
            "/rest/v1/rpc/match_documents",
            post(|| async { Json(json!([])) }),
        );
        let base = spawn_stub(app).await;

        let matches = matcher_for(base, None)
            .find_matches(&EmbeddingVector::new(vec![1.0]), 0.3, 3)
            .await
            .expect("matches");
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn server_error_is_a_store_failure() {
        let app = Router::new().route(
            "/rest/v1/rpc/match_documents",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "relation does not exist") }),
        );
        let base = spawn_stub(app).await;

        let err = matcher_for(base, None)
            .find_matches(&EmbeddingVector::new(vec![1.0]), 0.3, 3)
            .await
            .unwrap_err();
        assert!(matches!(err, MatchError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn slow_store_times_out_as_transport_failure() {
        let app = Router::new().route(
            "/rest/v1/rpc/match_documents",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!([]))
            }),
        );
        let base = spawn_stub(app).await;
        let store = StoreConfig {
            url: base,
            timeout_secs: 1,
            ..Default::default()
        };
        let matcher =
            RpcVectorMatcher::new(&store, &DocumentsConfig::default(), None).expect("client");

        let started = Instant::now();
        let err = matcher
            .find_matches(&EmbeddingVector::new(vec![1.0]), 0.3, 3)
            .await
            .unwrap_err();

        assert!(matches!(err, MatchError::Http(ref e) if e.is_timeout()));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn unusable_api_key_fails_construction() {
        let store = StoreConfig {
            url: "http://127.0.0.1:9".to_string(),
            api_key: "service\rkey".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            RpcVectorMatcher::new(&store, &DocumentsConfig::default(), None),
            Err(ClientBuildError::InvalidApiKey("store"))
        ));
    }

    #[tokio::test]
    async fn degenerate_vector_is_rejected_without_a_call() {
        // Nothing listens here; reaching the network would be an Http error.
        let matcher = matcher_for("http://127.0.0.1:9".to_string(), None);
        let err = matcher
            .find_matches(&EmbeddingVector::degenerate(), 0.3, 3)
            .await
            .unwrap_err();
        assert!(matches!(err, MatchError::EmptyVector));
    }

    #[tokio::test]
    async fn configured_dimensions_are_enforced() {
        let store = StoreConfig {
            url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let matcher =
            RpcVectorMatcher::new(&store, &DocumentsConfig::default(), Some(3)).expect("client");
        let err = matcher
            .find_matches(&EmbeddingVector::new(vec![1.0, 0.0]), 0.3, 3)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MatchError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }
}
