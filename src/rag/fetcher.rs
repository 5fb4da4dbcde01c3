//! DocumentFetcher: retrieve and parse the raw source behind a match.
//!
//! Fetching never fails from the caller's point of view. Any transport,
//! status or parse problem is logged and the document is replaced by an
//! empty one so the remaining documents still reach the prompt.

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use reqwest::Client;

use super::error::FetchError;
use super::front_matter::parse_document;
use super::types::{DocumentMatch, ParsedDocument};
use crate::core::config::DocumentsConfig;

#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, id: &str) -> ParsedDocument;
}

/// Fetches every match concurrently and returns the parsed documents in
/// match order, regardless of completion order.
///
/// `concurrency` caps in-flight fetches; `None` starts them all at once.
pub async fn fetch_all(
    fetcher: &dyn DocumentFetcher,
    matches: &[DocumentMatch],
    concurrency: Option<usize>,
) -> Vec<ParsedDocument> {
    if matches.is_empty() {
        return Vec::new();
    }
    let limit = concurrency.unwrap_or(matches.len()).clamp(1, matches.len());

    // Owned ids: futures borrowing the closure argument are not `Send` for
    // every lifetime, which spawned request tasks require.
    let ids: Vec<String> = matches.iter().map(|m| m.id.clone()).collect();

    stream::iter(ids)
        .map(|id| async move { fetcher.fetch(&id).await })
        .buffered(limit)
        .collect()
        .await
}

pub struct HttpDocumentFetcher {
    raw_base_url: String,
    extension: String,
    client: Client,
}

impl HttpDocumentFetcher {
    pub fn new(config: &DocumentsConfig) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            raw_base_url: config.raw_base_url.trim_end_matches('/').to_string(),
            extension: config.extension.clone(),
            client,
        })
    }

    /// Maps a corpus id such as `submit/overview` to its raw source url.
    pub fn source_url(&self, id: &str) -> Result<String, FetchError> {
        let segments: Vec<&str> = id.trim_matches('/').split('/').collect();
        let invalid = segments
            .iter()
            .any(|s| s.is_empty() || *s == "." || *s == "..");
        if invalid {
            return Err(FetchError::InvalidId(id.to_string()));
        }

        let path = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let extension = if path.ends_with(&self.extension) {
            ""
        } else {
            self.extension.as_str()
        };

        Ok(format!("{}/{}{}", self.raw_base_url, path, extension))
    }

    async fn try_fetch(&self, id: &str) -> Result<ParsedDocument, FetchError> {
        let url = self.source_url(id)?;
        let res = self.client.get(&url).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let raw = res.text().await?;
        parse_document(&raw)
    }
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch(&self, id: &str) -> ParsedDocument {
        match self.try_fetch(id).await {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!("Failed to load document '{}': {}", id, err);
                ParsedDocument::empty()
            }
        }
    }
}
