//! HTTP service exposing the orchestrator.
//!
//! Thin translation between the JSON/multipart endpoint surface and task
//! requests: handlers deserialize the body, hand a [`TaskRequest`] to
//! [`Orchestrator::execute`], and serialize the outcome. All sequencing
//! and validation semantics live in the orchestrator.
//!
//! Every failure maps to a generic HTTP 500 body; the one exception is a
//! missing audio file on /transcribeAndClassify, which is HTTP 400 and
//! never reaches any gateway. Internal error detail is logged, not echoed.

pub mod config;

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::orchestrator::Orchestrator;
use crate::types::{TaskOutcome, TaskRequest};

/// Generic failure message returned to callers.
const GENERIC_ERROR: &str = "An error occurred while processing your request.";

/// Multipart field carrying the uploaded audio.
const AUDIO_FIELD: &str = "audioFile";

/// Build the HTTP router over a shared orchestrator.
pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    // Leave headroom above the audio ceiling for multipart framing; the
    // orchestrator enforces the exact payload limit.
    let body_limit = orchestrator.max_audio_bytes() + 64 * 1024;

    Router::new()
        .route("/adminSentiment", post(admin_sentiment))
        .route("/customerSentiment", post(customer_sentiment))
        .route("/checkTopics", post(check_topics))
        .route("/queryGPT", post(query_gpt))
        .route("/analyseData", post(analyse_data))
        .route("/categorizeIssue", post(categorize_issue))
        .route("/transcribeAndClassify", post(transcribe_and_classify))
        .route("/data", get(data))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(orchestrator)
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Deserialize)]
struct CheckTopicsBody {
    message: String,
    topics: Vec<String>,
}

#[derive(Deserialize)]
struct QueryBody {
    #[serde(rename = "queryText")]
    query_text: String,
}

#[derive(Deserialize)]
struct AnalyseBody {
    #[serde(rename = "chatData")]
    chat_data: String,
}

#[derive(Deserialize)]
struct CategorizeBody {
    text: String,
}

async fn admin_sentiment(
    State(orchestrator): State<Arc<Orchestrator>>,
    Json(body): Json<MessageBody>,
) -> Response {
    run(
        &orchestrator,
        TaskRequest::AdminSentiment {
            message: body.message,
        },
    )
    .await
}

async fn customer_sentiment(
    State(orchestrator): State<Arc<Orchestrator>>,
    Json(body): Json<MessageBody>,
) -> Response {
    run(
        &orchestrator,
        TaskRequest::CustomerSentiment {
            message: body.message,
        },
    )
    .await
}

async fn check_topics(
    State(orchestrator): State<Arc<Orchestrator>>,
    Json(body): Json<CheckTopicsBody>,
) -> Response {
    run(
        &orchestrator,
        TaskRequest::TopicCheck {
            message: body.message,
            topics: body.topics,
        },
    )
    .await
}

async fn query_gpt(
    State(orchestrator): State<Arc<Orchestrator>>,
    Json(body): Json<QueryBody>,
) -> Response {
    run(
        &orchestrator,
        TaskRequest::RagQuery {
            query: body.query_text,
        },
    )
    .await
}

async fn analyse_data(
    State(orchestrator): State<Arc<Orchestrator>>,
    Json(body): Json<AnalyseBody>,
) -> Response {
    run(
        &orchestrator,
        TaskRequest::AnalyseConversation {
            chat: body.chat_data,
        },
    )
    .await
}

async fn categorize_issue(
    State(orchestrator): State<Arc<Orchestrator>>,
    Json(body): Json<CategorizeBody>,
) -> Response {
    run(&orchestrator, TaskRequest::CategorizeIssue { text: body.text }).await
}

async fn transcribe_and_classify(
    State(orchestrator): State<Arc<Orchestrator>>,
    mut multipart: Multipart,
) -> Response {
    let mut audio = None;
    let mut file_name = "audio.mp3".to_string();

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(AUDIO_FIELD) => {
                if let Some(name) = field.file_name() {
                    file_name = name.to_string();
                }
                match field.bytes().await {
                    Ok(bytes) => audio = Some(bytes.to_vec()),
                    Err(e) => {
                        error!(error = %e, "failed to read uploaded audio");
                        return failure_response();
                    }
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "malformed multipart request");
                return failure_response();
            }
        }
    }

    // 400 before any gateway is touched: a request without a file is a
    // caller mistake, not a pipeline failure.
    let Some(audio) = audio else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No audio file uploaded" })),
        )
            .into_response();
    };

    run(
        &orchestrator,
        TaskRequest::TranscribeAndClassify { audio, file_name },
    )
    .await
}

async fn data(State(orchestrator): State<Arc<Orchestrator>>) -> Response {
    match orchestrator.analysis_report().await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            bytes,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "failed to read analysis report");
            failure_response()
        }
    }
}

/// Execute a task and translate the result to an HTTP response.
async fn run(orchestrator: &Orchestrator, request: TaskRequest) -> Response {
    let task = request.kind();
    match orchestrator.execute(request).await {
        Ok(outcome) => outcome_response(outcome),
        Err(err) => {
            error!(task = task.as_str(), error = %err, "request failed");
            failure_response()
        }
    }
}

/// Map a task outcome to its endpoint response body.
fn outcome_response(outcome: TaskOutcome) -> Response {
    match outcome {
        TaskOutcome::AdminSentiment { sentiment, score } => Json(json!({
            "admin_sentiment": sentiment.as_str(),
            "admin_sentiment_score": score,
        }))
        .into_response(),
        TaskOutcome::CustomerSentiment { sentiment, score } => Json(json!({
            "customer_sentiment": sentiment,
            "customer_sentiment_score": score,
        }))
        .into_response(),
        TaskOutcome::TopicCheck { answer } | TaskOutcome::RagAnswer { answer } => {
            Json(json!({ "aiResponse": answer })).into_response()
        }
        TaskOutcome::ReportQueued => StatusCode::OK.into_response(),
        TaskOutcome::IssueClassification(classification) => {
            Json(json!({
                "category": classification.category,
                "subcategory": classification.subcategory,
            }))
            .into_response()
        }
        TaskOutcome::Transcription {
            transcript,
            classification,
        } => Json(json!({
            "transcript": transcript,
            "classification": classification,
        }))
        .into_response(),
    }
}

/// Generic HTTP 500 failure body.
fn failure_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": GENERIC_ERROR })),
    )
        .into_response()
}
