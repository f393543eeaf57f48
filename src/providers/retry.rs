//! Retry configuration, delay calculation, and gateway decorators.
//!
//! The orchestration core never retries on its own: a gateway failure is
//! one failed response. Hosts that want a retry policy opt in by wrapping
//! a gateway in a `Retrying*Gateway` decorator with a config allowing
//! more than one attempt.
//!
//! All decorators delegate to the shared `with_retry()` helper,
//! keeping retry logic in a single place.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::telemetry;
use crate::traits::{ModelGateway, RetrievalGateway, TranscriptionGateway};
use crate::types::RetrievedSnippet;
use crate::{MuninnError, Result};

/// Configuration for retry behaviour on transient errors.
///
/// Uses exponential backoff. The default is a single attempt, i.e. no
/// retry at all; enable retries explicitly:
///
/// ```rust
/// # use muninn::providers::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(3)
///     .initial_delay(Duration::from_millis(200));
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 1.
    pub max_attempts: u32,
    /// Base delay before the first retry. Default: 500ms.
    pub initial_delay: Duration,
    /// Maximum delay between retries (caps exponential growth). Default: 30s.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// Create a new config with the no-retry default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this config performs any retries at all.
    pub fn is_enabled(&self) -> bool {
        self.max_attempts > 1
    }

    /// Set maximum attempts (including the initial request).
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n.max(1);
        self
    }

    /// Set the base delay before the first retry.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Calculate the delay for a given attempt number (0-indexed).
    ///
    /// Uses exponential backoff: `initial_delay * 2^attempt`, capped at
    /// `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.max_delay)
    }

    /// Calculate the effective delay, respecting provider `retry_after` hints.
    ///
    /// If a `retry_after` duration is provided (from a `RateLimited` error),
    /// it takes precedence over the calculated backoff.
    pub fn effective_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| self.delay_for_attempt(attempt))
    }
}

// ============================================================================
// Shared retry helper
// ============================================================================

/// Execute an async operation with retry logic.
///
/// Retries on transient errors (as classified by [`MuninnError::is_transient()`])
/// up to `config.max_attempts`, using exponential backoff and respecting
/// `retry_after` hints from `RateLimited` errors.
///
/// Permanent errors are returned immediately without retry.
async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    gateway_name: &str,
    operation: &'static str,
    f: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..config.max_attempts {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() => {
                metrics::counter!(telemetry::RETRIES_TOTAL,
                    "gateway" => gateway_name.to_owned(),
                    "operation" => operation,
                )
                .increment(1);
                if attempt + 1 < config.max_attempts {
                    let delay = config.effective_delay(attempt, e.retry_after());
                    warn!(
                        gateway = gateway_name,
                        operation,
                        attempt = attempt + 1,
                        max_attempts = config.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying after transient error"
                    );
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
            Err(e) => return Err(e), // permanent error, no retry
        }
    }
    Err(last_err.unwrap_or(MuninnError::NoGateway))
}

// ============================================================================
// RetryingModelGateway
// ============================================================================

/// Decorator that wraps a [`ModelGateway`] with retry logic.
pub struct RetryingModelGateway {
    inner: Arc<dyn ModelGateway>,
    config: RetryConfig,
}

impl RetryingModelGateway {
    /// Wrap a model gateway with retry logic.
    pub fn new(inner: Arc<dyn ModelGateway>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl ModelGateway for RetryingModelGateway {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn complete(
        &self,
        user_content: &str,
        context: &str,
        system_directive: &str,
    ) -> Result<String> {
        with_retry(&self.config, self.inner.name(), "complete", || {
            self.inner.complete(user_content, context, system_directive)
        })
        .await
    }
}

// ============================================================================
// RetryingRetrievalGateway
// ============================================================================

/// Decorator that wraps a [`RetrievalGateway`] with retry logic.
///
/// Same semantics as [`RetryingModelGateway`] — retries transient errors,
/// returns permanent errors immediately.
pub struct RetryingRetrievalGateway {
    inner: Arc<dyn RetrievalGateway>,
    config: RetryConfig,
}

impl RetryingRetrievalGateway {
    /// Wrap a retrieval gateway with retry logic.
    pub fn new(inner: Arc<dyn RetrievalGateway>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl RetrievalGateway for RetryingRetrievalGateway {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn search(&self, query: &str) -> Result<Vec<RetrievedSnippet>> {
        with_retry(&self.config, self.inner.name(), "search", || {
            self.inner.search(query)
        })
        .await
    }
}

// ============================================================================
// RetryingTranscriptionGateway
// ============================================================================

/// Decorator that wraps a [`TranscriptionGateway`] with retry logic.
///
/// Same semantics as [`RetryingModelGateway`] — retries transient errors,
/// returns permanent errors immediately.
pub struct RetryingTranscriptionGateway {
    inner: Arc<dyn TranscriptionGateway>,
    config: RetryConfig,
}

impl RetryingTranscriptionGateway {
    /// Wrap a transcription gateway with retry logic.
    pub fn new(inner: Arc<dyn TranscriptionGateway>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl TranscriptionGateway for RetryingTranscriptionGateway {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn transcribe(&self, audio: &[u8], file_name: &str) -> Result<String> {
        with_retry(&self.config, self.inner.name(), "transcribe", || {
            self.inner.transcribe(audio, file_name)
        })
        .await
    }
}
