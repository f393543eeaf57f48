//! Pinecone-style vector search client.
//!
//! Speaks the `query` wire shape of a Pinecone index host: the query
//! text plus a fixed top-K go up, ranked matches with text metadata come
//! back. The index and its embedding pipeline are external; this client
//! never builds or updates the index.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::traits::RetrievalGateway;
use crate::types::RetrievedSnippet;
use crate::{MuninnError, Result};

/// Default number of matches requested per query.
const DEFAULT_TOP_K: usize = 5;

/// Client for a Pinecone-style vector search service.
#[derive(Clone)]
pub struct PineconeClient {
    api_key: String,
    http: Client,
    base_url: String,
    top_k: usize,
}

impl PineconeClient {
    /// Create a new client against the given index host.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.into(),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set the number of matches requested per query.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Query the index for the given text.
    ///
    /// Matches arrive ordered by descending score; entries without text
    /// metadata are skipped. Zero matches is a valid, empty result.
    pub async fn search(&self, query: &str) -> Result<Vec<RetrievedSnippet>> {
        let url = format!("{}/query", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&QueryRequest {
                query,
                top_k: self.top_k,
                include_metadata: true,
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        handle_response_errors(&response)?;

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| MuninnError::InvalidResponse(e.to_string()))?;

        Ok(body
            .matches
            .into_iter()
            .filter_map(|entry| {
                entry
                    .metadata
                    .and_then(|metadata| metadata.text)
                    .map(|text| RetrievedSnippet::new(text, entry.score))
            })
            .collect())
    }
}

fn map_transport_error(err: reqwest::Error) -> MuninnError {
    if err.is_timeout() {
        MuninnError::Timeout
    } else if err.is_connect() {
        MuninnError::Unavailable(err.to_string())
    } else {
        MuninnError::Http(err.to_string())
    }
}

fn handle_response_errors(response: &reqwest::Response) -> Result<()> {
    let status = response.status();

    if status.is_success() {
        return Ok(());
    }

    match status.as_u16() {
        401 | 403 => Err(MuninnError::AuthenticationFailed),
        408 => Err(MuninnError::Timeout),
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(MuninnError::RateLimited { retry_after })
        }
        500..=599 => Err(MuninnError::Unavailable(format!("upstream returned {status}"))),
        code => Err(MuninnError::Api {
            status: code,
            message: format!("API error: {status}"),
        }),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    query: &'a str,
    top_k: usize,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    score: f32,
    metadata: Option<MatchMetadata>,
}

#[derive(Deserialize)]
struct MatchMetadata {
    text: Option<String>,
}

// ============================================================================
// Gateway Trait Implementation
// ============================================================================

#[async_trait]
impl RetrievalGateway for PineconeClient {
    fn name(&self) -> &str {
        "pinecone"
    }

    async fn search(&self, query: &str) -> Result<Vec<RetrievedSnippet>> {
        // Delegate to the existing method
        PineconeClient::search(self, query).await
    }
}
