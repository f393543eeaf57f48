//! HTTP surface tests.
//!
//! Drives the axum router directly with `tower::ServiceExt::oneshot`,
//! with mock gateways behind the orchestrator.

#![cfg(feature = "server")]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use muninn::{
    ModelGateway, Muninn, MuninnError, ReportStore, Result, RetrievalGateway, RetrievedSnippet,
    TranscriptionGateway,
};

// ============================================================================
// Mock gateways
// ============================================================================

struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
}

impl ScriptedModel {
    fn new(replies: Vec<&str>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(String::from).collect()),
        })
    }
}

#[async_trait]
impl ModelGateway for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _user: &str, _context: &str, _system: &str) -> Result<String> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(MuninnError::EmptyResponse)
    }
}

struct EmptyRetrieval;

#[async_trait]
impl RetrievalGateway for EmptyRetrieval {
    fn name(&self) -> &str {
        "empty"
    }

    async fn search(&self, _query: &str) -> Result<Vec<RetrievedSnippet>> {
        Ok(Vec::new())
    }
}

struct CountingTranscription {
    transcript: &'static str,
    calls: AtomicUsize,
}

impl CountingTranscription {
    fn new(transcript: &'static str) -> Arc<Self> {
        Arc::new(Self {
            transcript,
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptionGateway for CountingTranscription {
    fn name(&self) -> &str {
        "counting"
    }

    async fn transcribe(&self, _audio: &[u8], _file_name: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.transcript.to_string())
    }
}

struct MemoryStore {
    contents: Mutex<Option<Vec<u8>>>,
}

impl MemoryStore {
    fn with_contents(bytes: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            contents: Mutex::new(Some(bytes.to_vec())),
        })
    }

    fn empty() -> Arc<Self> {
        Arc::new(Self {
            contents: Mutex::new(None),
        })
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn write(&self, report_json: &[u8]) -> Result<()> {
        *self.contents.lock().unwrap() = Some(report_json.to_vec());
        Ok(())
    }

    async fn read(&self) -> Result<Vec<u8>> {
        self.contents
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| MuninnError::Storage("no report".to_string()))
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn app(
    model: Arc<ScriptedModel>,
    transcription: Arc<CountingTranscription>,
    store: Arc<MemoryStore>,
) -> Router {
    let orchestrator = Muninn::builder()
        .model_gateway(model)
        .retrieval_gateway(Arc::new(EmptyRetrieval))
        .transcription_gateway(transcription)
        .report_store(store)
        .build()
        .unwrap();
    muninn::server::router(Arc::new(orchestrator))
}

fn simple_app(replies: Vec<&str>) -> Router {
    app(
        ScriptedModel::new(replies),
        CountingTranscription::new(""),
        MemoryStore::empty(),
    )
}

fn json_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

fn multipart_post(uri: &str, field_name: &str, file_name: &str, payload: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: audio/mpeg\r\n\r\n");
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

// ============================================================================
// JSON endpoints
// ============================================================================

#[tokio::test]
async fn admin_sentiment_returns_band_and_score() {
    let app = simple_app(vec!["0.9"]);

    let response = app
        .oneshot(json_post("/adminSentiment", r#"{"message":"Thanks for waiting."}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["admin_sentiment"], "Professional");
    assert_eq!(body["admin_sentiment_score"], 0.9);
}

#[tokio::test]
async fn customer_sentiment_returns_label_and_score() {
    let app = simple_app(vec!["frustrated", "0.2"]);

    let response = app
        .oneshot(json_post("/customerSentiment", r#"{"message":"Still broken!"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["customer_sentiment"], "frustrated");
    assert_eq!(body["customer_sentiment_score"], 0.2);
}

#[tokio::test]
async fn check_topics_returns_the_ai_response() {
    let app = simple_app(vec!["1,3"]);

    let response = app
        .oneshot(json_post(
            "/checkTopics",
            r#"{"message":"bill and roaming","topics":["1) Billing","2) Fibre","3) Roaming"]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["aiResponse"], "1,3");
}

#[tokio::test]
async fn query_gpt_returns_the_ai_response() {
    let app = simple_app(vec!["Plans start at RM40."]);

    let response = app
        .oneshot(json_post("/queryGPT", r#"{"queryText":"what plans exist?"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["aiResponse"], "Plans start at RM40.");
}

#[tokio::test]
async fn analyse_data_returns_200_with_no_body() {
    let report = r#"{
        "overallSummary": "s", "agentSummary": "a", "customerSummary": "c",
        "conversationalInsight": {
            "csatScore": 80, "conversationResult": "Resolved",
            "customerSentiment": "Positive", "overallCallDuration": "03:00"
        },
        "overallPerformance": 85,
        "aiInsight": {
            "introduction": 90, "recommendation": 80, "thankYouMessage": 70,
            "attitude": 95, "communicationSkills": 85
        },
        "timeConsumption": { "agent": 50, "customer": 40, "notTalking": 10 },
        "topicsDiscussed": { "Billing": 50, "Roaming": 30, "Plans": 15, "Coverage": 5 }
    }"#;
    let app = simple_app(vec![report]);

    let response = app
        .oneshot(json_post("/analyseData", r#"{"chatData":"agent: hi\ncustomer: hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn categorize_issue_returns_category_and_subcategory() {
    let app = simple_app(vec!["Category: Billing\nSubcategory: Others"]);

    let response = app
        .oneshot(json_post("/categorizeIssue", r#"{"text":"my bill is wrong"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["category"], "Billing");
    assert_eq!(body["subcategory"], "Others");
}

#[tokio::test]
async fn parse_failure_maps_to_generic_500() {
    // Model omits the subcategory line
    let app = simple_app(vec!["Category: Billing"]);

    let response = app
        .oneshot(json_post("/categorizeIssue", r#"{"text":"my bill is wrong"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "An error occurred while processing your request.");
}

// ============================================================================
// Audio endpoint
// ============================================================================

#[tokio::test]
async fn transcribe_and_classify_happy_path() {
    let model = ScriptedModel::new(vec!["Category: Roaming\nSubcategory: Others"]);
    let transcription = CountingTranscription::new("roaming is broken");
    let app = app(model, transcription.clone(), MemoryStore::empty());

    let response = app
        .oneshot(multipart_post(
            "/transcribeAndClassify",
            "audioFile",
            "clip.mp3",
            b"fake-mpeg-bytes",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["transcript"], "roaming is broken");
    assert_eq!(body["classification"]["category"], "Roaming");
    assert_eq!(body["classification"]["subcategory"], "Others");
    assert_eq!(transcription.call_count(), 1);
}

#[tokio::test]
async fn missing_audio_file_is_400_and_reaches_no_gateway() {
    let transcription = CountingTranscription::new("never");
    let app = app(
        ScriptedModel::new(vec![]),
        transcription.clone(),
        MemoryStore::empty(),
    );

    // Multipart body with a different field name: no audio file attached.
    let response = app
        .oneshot(multipart_post(
            "/transcribeAndClassify",
            "note",
            "note.txt",
            b"not audio",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "No audio file uploaded");
    assert_eq!(transcription.call_count(), 0);
}

#[tokio::test]
async fn oversize_audio_maps_to_500() {
    let transcription = CountingTranscription::new("never");
    let orchestrator = Muninn::builder()
        .model_gateway(ScriptedModel::new(vec![]))
        .retrieval_gateway(Arc::new(EmptyRetrieval))
        .transcription_gateway(transcription.clone())
        .report_store(MemoryStore::empty())
        .max_audio_bytes(8)
        .build()
        .unwrap();
    let app = muninn::server::router(Arc::new(orchestrator));

    let response = app
        .oneshot(multipart_post(
            "/transcribeAndClassify",
            "audioFile",
            "big.mp3",
            b"way more than eight bytes of audio",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(transcription.call_count(), 0);
}

// ============================================================================
// Report artifact
// ============================================================================

#[tokio::test]
async fn data_serves_the_persisted_artifact() {
    let artifact = br#"{"overallSummary":"cached"}"#;
    let app = app(
        ScriptedModel::new(vec![]),
        CountingTranscription::new(""),
        MemoryStore::with_contents(artifact),
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/data")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], artifact);
}

#[tokio::test]
async fn data_without_artifact_is_500() {
    let app = simple_app(vec![]);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/data")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
