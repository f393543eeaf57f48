//! Concrete gateway implementations.
//!
//! Each provider is a thin reqwest client speaking one external wire
//! format. Retry decorators live here too; the orchestration core itself
//! never retries.

pub mod openai;
pub mod pinecone;
pub mod retry;

pub use openai::OpenAiClient;
pub use pinecone::PineconeClient;
pub use retry::{
    RetryConfig, RetryingModelGateway, RetryingRetrievalGateway, RetryingTranscriptionGateway,
};
