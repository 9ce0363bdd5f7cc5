//! HTTP client for the external search service.
//!
//! The service exposes three JSON endpoints:
//! - `POST /search` with `{"query", "top_k"}`, answering `{"results": [...]}`
//! - `POST /documents` with `{"documents": [...]}`
//! - `POST /reindex`

use crate::corpus::CorpusSink;
use crate::retriever::{check_search_args, Retriever};
use crate::types::{CorpusRecord, RetrievedItem};
use grounded_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    top_k: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<RetrievedItem>,
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    documents: &'a [CorpusRecord],
}

/// Search service client.
pub struct HttpSearchClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpSearchClient {
    /// Create a client for a base URL and optional bearer token.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.client.post(format!("{}{}", self.base_url, path));
        match self.api_key {
            Some(ref key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait::async_trait]
impl Retriever for HttpSearchClient {
    async fn search(&self, query: &str, max_results: usize) -> AppResult<Vec<RetrievedItem>> {
        check_search_args(query, max_results)?;

        tracing::debug!(top_k = max_results, "Sending search request");

        let response = self
            .post("/search")
            .json(&SearchRequest {
                query,
                top_k: max_results,
            })
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to reach search service: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Retrieval(format!(
                "Search service error (HTTP {}): {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to read search response: {}", e)))?;

        parse_search_response(&body, max_results)
    }
}

#[async_trait::async_trait]
impl CorpusSink for HttpSearchClient {
    async fn upload_batch(&self, records: &[CorpusRecord]) -> AppResult<()> {
        let response = self
            .post("/documents")
            .json(&UploadRequest { documents: records })
            .send()
            .await
            .map_err(|e| AppError::Corpus(format!("Failed to reach search service: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Corpus(format!(
                "Document upload rejected (HTTP {}): {}",
                status, error_text
            )));
        }

        Ok(())
    }

    async fn reindex(&self) -> AppResult<()> {
        let response = self
            .post("/reindex")
            .send()
            .await
            .map_err(|e| AppError::Corpus(format!("Failed to reach search service: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Corpus(format!(
                "Reindex rejected (HTTP {}): {}",
                status, error_text
            )));
        }

        Ok(())
    }
}

/// Parse a `/search` response body, keeping at most `max_results` items.
pub fn parse_search_response(body: &str, max_results: usize) -> AppResult<Vec<RetrievedItem>> {
    let parsed: SearchResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Retrieval(format!("Malformed search response: {}", e)))?;

    let mut results = parsed.results;
    if results.len() > max_results {
        tracing::debug!(
            "Search service returned {} results, keeping {}",
            results.len(),
            max_results
        );
        results.truncate(max_results);
    }

    Ok(results)
}
