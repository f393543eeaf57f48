//! Builder for configuring orchestrator instances

use std::path::PathBuf;
use std::sync::Arc;

use crate::providers::{
    OpenAiClient, PineconeClient, RetryConfig, RetryingModelGateway, RetryingRetrievalGateway,
    RetryingTranscriptionGateway,
};
use crate::store::FsReportStore;
use crate::traits::{ModelGateway, ReportStore, RetrievalGateway, TranscriptionGateway};
use crate::{MuninnError, Result};

use super::Orchestrator;

/// Default audio payload ceiling: 10 MiB.
const DEFAULT_MAX_AUDIO_BYTES: usize = 10 * 1024 * 1024;

/// Main entry point for creating orchestrator instances.
pub struct Muninn;

impl Muninn {
    /// Create a new builder for configuring the orchestrator.
    pub fn builder() -> MuninnBuilder {
        MuninnBuilder::new()
    }
}

/// Builder for configuring orchestrator instances.
///
/// Gateways are wired either from API keys (the built-in OpenAI and
/// Pinecone clients) or injected directly as trait objects, which is how
/// tests substitute doubles.
pub struct MuninnBuilder {
    openai_key: Option<String>,
    openai_base_url: Option<String>,
    chat_model: Option<String>,
    transcription_model: Option<String>,
    pinecone_key: Option<String>,
    pinecone_base_url: Option<String>,
    top_k: Option<usize>,
    data_path: Option<PathBuf>,
    max_audio_bytes: usize,
    retry: RetryConfig,
    model: Option<Arc<dyn ModelGateway>>,
    retrieval: Option<Arc<dyn RetrievalGateway>>,
    transcription: Option<Arc<dyn TranscriptionGateway>>,
    store: Option<Arc<dyn ReportStore>>,
}

impl MuninnBuilder {
    pub fn new() -> Self {
        Self {
            openai_key: None,
            openai_base_url: None,
            chat_model: None,
            transcription_model: None,
            pinecone_key: None,
            pinecone_base_url: None,
            top_k: None,
            data_path: None,
            max_audio_bytes: DEFAULT_MAX_AUDIO_BYTES,
            retry: RetryConfig::default(),
            model: None,
            retrieval: None,
            transcription: None,
            store: None,
        }
    }

    /// Configure the OpenAI-compatible provider (chat and transcription).
    pub fn openai(mut self, api_key: impl Into<String>) -> Self {
        self.openai_key = Some(api_key.into());
        self
    }

    /// Override the OpenAI-compatible base URL.
    pub fn openai_base_url(mut self, url: impl Into<String>) -> Self {
        self.openai_base_url = Some(url.into());
        self
    }

    /// Set the chat model.
    pub fn chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = Some(model.into());
        self
    }

    /// Set the transcription model.
    pub fn transcription_model(mut self, model: impl Into<String>) -> Self {
        self.transcription_model = Some(model.into());
        self
    }

    /// Configure the Pinecone-style retrieval provider against an index host.
    pub fn pinecone(mut self, api_key: impl Into<String>, index_url: impl Into<String>) -> Self {
        self.pinecone_key = Some(api_key.into());
        self.pinecone_base_url = Some(index_url.into());
        self
    }

    /// Set the number of matches requested per retrieval query.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Set the analysis-report artifact path.
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Set the audio payload ceiling in bytes (default: 10 MiB).
    pub fn max_audio_bytes(mut self, bytes: usize) -> Self {
        self.max_audio_bytes = bytes;
        self
    }

    /// Set the retry policy applied to all gateways.
    ///
    /// The default performs a single attempt (no retry); this is the
    /// host's opt-in knob, the core never retries on its own.
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Inject a model gateway, replacing the built-in client.
    pub fn model_gateway(mut self, gateway: Arc<dyn ModelGateway>) -> Self {
        self.model = Some(gateway);
        self
    }

    /// Inject a retrieval gateway, replacing the built-in client.
    pub fn retrieval_gateway(mut self, gateway: Arc<dyn RetrievalGateway>) -> Self {
        self.retrieval = Some(gateway);
        self
    }

    /// Inject a transcription gateway, replacing the built-in client.
    pub fn transcription_gateway(mut self, gateway: Arc<dyn TranscriptionGateway>) -> Self {
        self.transcription = Some(gateway);
        self
    }

    /// Inject a report store, replacing the filesystem default.
    pub fn report_store(mut self, store: Arc<dyn ReportStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the orchestrator.
    pub fn build(self) -> Result<Orchestrator> {
        // The built-in OpenAI client serves both chat and transcription.
        let openai = match &self.openai_key {
            Some(key) => {
                let mut client = match &self.openai_base_url {
                    Some(url) => OpenAiClient::with_base_url(key, url),
                    None => OpenAiClient::new(key),
                };
                if let Some(model) = &self.chat_model {
                    client = client.chat_model(model);
                }
                if let Some(model) = &self.transcription_model {
                    client = client.transcription_model(model);
                }
                Some(Arc::new(client))
            }
            None => None,
        };

        let model: Arc<dyn ModelGateway> = match (self.model, &openai) {
            (Some(injected), _) => injected,
            (None, Some(client)) => client.clone(),
            (None, None) => return Err(MuninnError::NoGateway),
        };

        let transcription: Arc<dyn TranscriptionGateway> = match (self.transcription, &openai) {
            (Some(injected), _) => injected,
            (None, Some(client)) => client.clone(),
            (None, None) => return Err(MuninnError::NoGateway),
        };

        let retrieval: Arc<dyn RetrievalGateway> = match self.retrieval {
            Some(injected) => injected,
            None => match (self.pinecone_key, self.pinecone_base_url) {
                (Some(key), Some(url)) => {
                    let mut client = PineconeClient::new(key, url);
                    if let Some(top_k) = self.top_k {
                        client = client.top_k(top_k);
                    }
                    Arc::new(client)
                }
                _ => {
                    return Err(MuninnError::Configuration(
                        "no retrieval gateway configured".to_string(),
                    ));
                }
            },
        };

        let (model, retrieval, transcription): (
            Arc<dyn ModelGateway>,
            Arc<dyn RetrievalGateway>,
            Arc<dyn TranscriptionGateway>,
        ) = if self.retry.is_enabled() {
            (
                Arc::new(RetryingModelGateway::new(model, self.retry.clone())),
                Arc::new(RetryingRetrievalGateway::new(retrieval, self.retry.clone())),
                Arc::new(RetryingTranscriptionGateway::new(transcription, self.retry)),
            )
        } else {
            (model, retrieval, transcription)
        };

        let store: Arc<dyn ReportStore> = match self.store {
            Some(injected) => injected,
            None => Arc::new(FsReportStore::new(
                self.data_path.unwrap_or_else(FsReportStore::default_path),
            )),
        };

        Ok(Orchestrator::new(
            model,
            retrieval,
            transcription,
            store,
            self.max_audio_bytes,
        ))
    }
}

impl Default for MuninnBuilder {
    fn default() -> Self {
        Self::new()
    }
}
