//! The task orchestrator.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error};

use crate::parse::parse_response;
use crate::prompt::{PromptRequest, build_prompt};
use crate::telemetry;
use crate::traits::{ModelGateway, ReportStore, RetrievalGateway, TranscriptionGateway};
use crate::types::{
    AnalysisReport, ParsedResult, SentimentBand, TaskKind, TaskOutcome, TaskRequest,
};
use crate::{MuninnError, Result};

/// Stateless per-process orchestrator with injected gateway dependencies.
///
/// Holds only `Arc`'d immutable collaborators, so one instance serves any
/// number of concurrent requests without locking. Construct via
/// [`crate::Muninn::builder()`].
pub struct Orchestrator {
    model: Arc<dyn ModelGateway>,
    retrieval: Arc<dyn RetrievalGateway>,
    transcription: Arc<dyn TranscriptionGateway>,
    store: Arc<dyn ReportStore>,
    max_audio_bytes: usize,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("max_audio_bytes", &self.max_audio_bytes)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub(crate) fn new(
        model: Arc<dyn ModelGateway>,
        retrieval: Arc<dyn RetrievalGateway>,
        transcription: Arc<dyn TranscriptionGateway>,
        store: Arc<dyn ReportStore>,
        max_audio_bytes: usize,
    ) -> Self {
        Self {
            model,
            retrieval,
            transcription,
            store,
            max_audio_bytes,
        }
    }

    /// Audio payload ceiling enforced before the transcription gateway
    /// is invoked.
    pub fn max_audio_bytes(&self) -> usize {
        self.max_audio_bytes
    }

    /// Execute one task request to completion or first unrecovered error.
    pub async fn execute(&self, request: TaskRequest) -> Result<TaskOutcome> {
        let task = request.kind();
        let start = Instant::now();
        let result = self.dispatch(request).await;
        record_request(task, start, result.is_ok());
        result
    }

    /// Read the persisted analysis-report artifact.
    pub async fn analysis_report(&self) -> Result<Vec<u8>> {
        self.store.read().await
    }

    async fn dispatch(&self, request: TaskRequest) -> Result<TaskOutcome> {
        validate(&request, self.max_audio_bytes)?;

        match request {
            TaskRequest::AdminSentiment { message } => self.admin_sentiment(&message).await,
            TaskRequest::CustomerSentiment { message } => self.customer_sentiment(&message).await,
            TaskRequest::TopicCheck { message, topics } => {
                self.topic_check(&message, &topics).await
            }
            TaskRequest::RagQuery { query } => self.rag_query(&query).await,
            TaskRequest::AnalyseConversation { chat } => self.analyse_conversation(&chat).await,
            TaskRequest::CategorizeIssue { text } => self.categorize_issue(&text).await,
            TaskRequest::TranscribeAndClassify { audio, file_name } => {
                self.transcribe_and_classify(&audio, &file_name).await
            }
        }
    }

    /// Build the prompt, invoke the model, parse the reply.
    async fn run_model(&self, request: &PromptRequest<'_>) -> Result<ParsedResult> {
        let kind = request.kind();
        let prompt = build_prompt(request);
        debug!(kind = ?kind, gateway = self.model.name(), "invoking model");
        let raw = self
            .model
            .complete(&prompt.user, &prompt.context, &prompt.system)
            .await?;
        parse_response(kind, &raw)
    }

    async fn admin_sentiment(&self, message: &str) -> Result<TaskOutcome> {
        let score = self
            .run_model(&PromptRequest::AdminSentimentScore { message })
            .await?
            .into_score()?;
        Ok(TaskOutcome::AdminSentiment {
            sentiment: SentimentBand::from_score(score),
            score,
        })
    }

    /// Two sequential model calls: a single-word label, then a score.
    async fn customer_sentiment(&self, message: &str) -> Result<TaskOutcome> {
        let sentiment = self
            .run_model(&PromptRequest::CustomerSentimentLabel { message })
            .await?
            .into_label()?;
        let score = self
            .run_model(&PromptRequest::CustomerSentimentScore { message })
            .await?
            .into_score()?;
        Ok(TaskOutcome::CustomerSentiment { sentiment, score })
    }

    async fn topic_check(&self, message: &str, topics: &[String]) -> Result<TaskOutcome> {
        let answer = self
            .run_model(&PromptRequest::TopicCheck { message, topics })
            .await?
            .into_label()?;
        Ok(TaskOutcome::TopicCheck { answer })
    }

    /// Retrieval context is assembled before any model call; an empty
    /// match set is valid and the answer falls back to general knowledge.
    async fn rag_query(&self, query: &str) -> Result<TaskOutcome> {
        let snippets = self.retrieval.search(query).await?;
        debug!(
            gateway = self.retrieval.name(),
            matches = snippets.len(),
            "retrieval complete"
        );
        let answer = self
            .run_model(&PromptRequest::RagAnswer {
                query,
                snippets: &snippets,
            })
            .await?
            .into_label()?;
        Ok(TaskOutcome::RagAnswer { answer })
    }

    /// Generate the report, then hand persistence to a background job.
    ///
    /// The outcome reflects report generation only: a persistence failure
    /// is logged and does not change the response already produced.
    async fn analyse_conversation(&self, chat: &str) -> Result<TaskOutcome> {
        let report = self
            .run_model(&PromptRequest::ConversationReport { chat })
            .await?
            .into_report()?;
        self.spawn_persist(report);
        Ok(TaskOutcome::ReportQueued)
    }

    async fn categorize_issue(&self, text: &str) -> Result<TaskOutcome> {
        let classification = self
            .run_model(&PromptRequest::IssueClassification { text })
            .await?
            .into_category()?;
        Ok(TaskOutcome::IssueClassification(classification))
    }

    async fn transcribe_and_classify(&self, audio: &[u8], file_name: &str) -> Result<TaskOutcome> {
        let transcript = self.transcription.transcribe(audio, file_name).await?;
        debug!(
            gateway = self.transcription.name(),
            chars = transcript.len(),
            "transcription complete"
        );
        let classification = self
            .run_model(&PromptRequest::IssueClassification { text: &transcript })
            .await?
            .into_category()?;
        Ok(TaskOutcome::Transcription {
            transcript,
            classification,
        })
    }

    /// Fire-and-forget persistence of the report artifact.
    fn spawn_persist(&self, report: AnalysisReport) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            let outcome = async {
                let bytes = serde_json::to_vec_pretty(&report)?;
                store.write(&bytes).await
            }
            .await;
            match outcome {
                Ok(()) => {
                    debug!("analysis report persisted");
                    metrics::counter!(telemetry::REPORTS_PERSISTED_TOTAL, "status" => "ok")
                        .increment(1);
                }
                Err(e) => {
                    error!(error = %e, "failed to persist analysis report");
                    metrics::counter!(telemetry::REPORTS_PERSISTED_TOTAL, "status" => "error")
                        .increment(1);
                }
            }
        });
    }
}

/// Fail-fast request validation, before any external call is made.
fn validate(request: &TaskRequest, max_audio_bytes: usize) -> Result<()> {
    match request {
        TaskRequest::TopicCheck { topics, .. } if topics.is_empty() => Err(
            MuninnError::Validation("topic list must not be empty".to_string()),
        ),
        TaskRequest::TranscribeAndClassify { audio, .. } if audio.is_empty() => Err(
            MuninnError::Validation("audio payload is empty".to_string()),
        ),
        TaskRequest::TranscribeAndClassify { audio, .. } if audio.len() > max_audio_bytes => {
            Err(MuninnError::Validation(format!(
                "audio payload exceeds the {max_audio_bytes}-byte ceiling"
            )))
        }
        _ => Ok(()),
    }
}

fn record_request(task: TaskKind, start: Instant, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    let elapsed = start.elapsed().as_secs_f64();
    metrics::counter!(telemetry::REQUESTS_TOTAL,
        "task" => task.as_str(),
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
        "task" => task.as_str(),
    )
    .record(elapsed);
}
