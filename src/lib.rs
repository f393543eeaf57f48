//! Muninn - conversation insight gateway
//!
//! This crate turns raw customer-interaction data (messages, chat
//! transcripts, recorded audio) into structured business insight by
//! orchestrating three external collaborators: a text-completion
//! service, a vector-similarity retrieval service, and a speech-to-text
//! service. The orchestrator is polymorphic over gateway traits, so
//! consumers (and tests) can substitute their own implementations.
//!
//! # Example
//!
//! ```rust,no_run
//! use muninn::{Muninn, TaskRequest, TaskOutcome};
//!
//! #[tokio::main]
//! async fn main() -> muninn::Result<()> {
//!     let orchestrator = Muninn::builder()
//!         .openai("sk-your-key")
//!         .pinecone("pc-your-key", "https://your-index.example")
//!         .build()?;
//!
//!     let outcome = orchestrator
//!         .execute(TaskRequest::AdminSentiment {
//!             message: "Dear customer, thank you for your patience.".into(),
//!         })
//!         .await?;
//!
//!     if let TaskOutcome::AdminSentiment { sentiment, score } = outcome {
//!         println!("{sentiment} ({score})");
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod orchestrator;
pub mod parse;
pub mod prompt;
pub mod providers;
#[cfg(feature = "server")]
pub mod server;
pub mod store;
pub mod telemetry;
pub mod traits;
pub mod types;

// Re-export main types at crate root
pub use error::{MuninnError, Result};
pub use orchestrator::{Muninn, MuninnBuilder, Orchestrator};
pub use traits::{ModelGateway, ReportStore, RetrievalGateway, TranscriptionGateway};

// Re-export all types
pub use prompt::{Prompt, PromptKind, PromptRequest, build_prompt};
pub use types::{
    AiInsight, AnalysisReport, Classification, ConversationalInsight, ParsedResult,
    RetrievedSnippet, SentimentBand, TaskKind, TaskOutcome, TaskRequest, TimeConsumption,
};
