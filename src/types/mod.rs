//! Public types for the Muninn API.

mod report;
mod result;
mod retrieval;
mod task;

pub use report::{AiInsight, AnalysisReport, ConversationalInsight, TimeConsumption};
pub use result::{Classification, ParsedResult, SentimentBand};
pub use retrieval::RetrievedSnippet;
pub use task::{TaskKind, TaskOutcome, TaskRequest};
