//! Core gateway traits
//!
//! The orchestrator is polymorphic over the three external collaborators
//! (text completion, vector retrieval, speech-to-text) plus the report
//! store. Each boundary is a small `Send + Sync` async trait so a host —
//! or a test — can substitute its own implementation.

use async_trait::async_trait;

use crate::Result;
use crate::types::RetrievedSnippet;

/// Boundary abstraction over a text-generation service.
///
/// Implementations are thin call wrappers: they send one completion
/// request and surface transport/quota failures as gateway errors.
/// Retry policy, if any, is layered on top (see `providers::retry`).
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Gateway name for logging/debugging.
    fn name(&self) -> &str;

    /// Single-turn completion.
    ///
    /// `context` is optional retrieval context (empty string when none);
    /// `system_directive` is the fixed per-task instruction. Returns the
    /// raw model text, untyped until parsed.
    async fn complete(
        &self,
        user_content: &str,
        context: &str,
        system_directive: &str,
    ) -> Result<String>;
}

/// Boundary abstraction over a vector-similarity search service.
#[async_trait]
pub trait RetrievalGateway: Send + Sync {
    /// Gateway name for logging/debugging.
    fn name(&self) -> &str;

    /// Search the index for the query text.
    ///
    /// Returns matches ordered by descending relevance score, bounded to
    /// the gateway's configured top-K. An empty result is valid (no index
    /// entries matched) and must not be reported as an error.
    async fn search(&self, query: &str) -> Result<Vec<RetrievedSnippet>>;
}

/// Boundary abstraction over a speech-to-text service.
#[async_trait]
pub trait TranscriptionGateway: Send + Sync {
    /// Gateway name for logging/debugging.
    fn name(&self) -> &str;

    /// Transcribe the audio payload to text.
    ///
    /// Payload size validation happens before this gateway is invoked;
    /// implementations only surface upstream failures (unsupported
    /// format, empty transcript, transport errors).
    async fn transcribe(&self, audio: &[u8], file_name: &str) -> Result<String>;
}

/// Durable storage for the single named analysis-report artifact.
///
/// The report is one named artifact; concurrent writers race with
/// last-writer-wins semantics and no locking.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Overwrite the artifact with the serialized report.
    async fn write(&self, report_json: &[u8]) -> Result<()>;

    /// Read the current artifact contents.
    async fn read(&self) -> Result<Vec<u8>>;
}
