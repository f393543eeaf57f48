//! Task request and outcome types.

use super::result::{Classification, SentimentBand};

/// Identifier for the supported task kinds.
///
/// Used for dispatch, logging and metric labels; the request payload
/// itself travels in [`TaskRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    AdminSentiment,
    CustomerSentiment,
    TopicCheck,
    RagQuery,
    AnalyseConversation,
    CategorizeIssue,
    TranscribeAndClassify,
}

impl TaskKind {
    /// Stable snake_case name used as a metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::AdminSentiment => "admin_sentiment",
            TaskKind::CustomerSentiment => "customer_sentiment",
            TaskKind::TopicCheck => "topic_check",
            TaskKind::RagQuery => "rag_query",
            TaskKind::AnalyseConversation => "analyse_conversation",
            TaskKind::CategorizeIssue => "categorize_issue",
            TaskKind::TranscribeAndClassify => "transcribe_and_classify",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One task request.
///
/// Exactly one task kind per request, enforced by the enum shape; the
/// auxiliary fields each kind requires live in its variant.
#[derive(Debug, Clone)]
pub enum TaskRequest {
    /// Score the professionalism of an admin/agent message.
    AdminSentiment { message: String },
    /// Label and score the sentiment of a customer message.
    CustomerSentiment { message: String },
    /// Match a message against a caller-supplied topic list.
    TopicCheck { message: String, topics: Vec<String> },
    /// Answer a question grounded in retrieved context.
    RagQuery { query: String },
    /// Produce and persist a conversation-quality report.
    AnalyseConversation { chat: String },
    /// Classify a customer issue into category/subcategory.
    CategorizeIssue { text: String },
    /// Transcribe recorded audio, then classify the transcript.
    TranscribeAndClassify { audio: Vec<u8>, file_name: String },
}

impl TaskRequest {
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskRequest::AdminSentiment { .. } => TaskKind::AdminSentiment,
            TaskRequest::CustomerSentiment { .. } => TaskKind::CustomerSentiment,
            TaskRequest::TopicCheck { .. } => TaskKind::TopicCheck,
            TaskRequest::RagQuery { .. } => TaskKind::RagQuery,
            TaskRequest::AnalyseConversation { .. } => TaskKind::AnalyseConversation,
            TaskRequest::CategorizeIssue { .. } => TaskKind::CategorizeIssue,
            TaskRequest::TranscribeAndClassify { .. } => TaskKind::TranscribeAndClassify,
        }
    }
}

/// Typed result of a completed task.
///
/// One variant per task kind, mirroring the response bodies of the HTTP
/// surface. No partial results: a task either produces its full outcome
/// or fails with an error.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    AdminSentiment {
        sentiment: SentimentBand,
        score: f64,
    },
    CustomerSentiment {
        sentiment: String,
        score: f64,
    },
    TopicCheck {
        answer: String,
    },
    RagAnswer {
        answer: String,
    },
    /// Report generated; persistence continues in the background.
    ReportQueued,
    IssueClassification(Classification),
    Transcription {
        transcript: String,
        classification: Classification,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_kind_matches_variant() {
        let request = TaskRequest::TopicCheck {
            message: "my bill is wrong".into(),
            topics: vec!["1) Billing".into()],
        };
        assert_eq!(request.kind(), TaskKind::TopicCheck);
        assert_eq!(request.kind().as_str(), "topic_check");
    }
}
