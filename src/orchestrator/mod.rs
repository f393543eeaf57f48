//! Task orchestration.
//!
//! The orchestrator sequences gateway calls per request:
//! (retrieve context?) → build prompt → invoke model → parse response,
//! with the audio pipeline adding validate → transcribe up front. Any
//! stage failure terminates the request with the originating error kind
//! preserved; there are no partial results.

mod builder;
mod tasks;

pub use builder::{Muninn, MuninnBuilder};
pub use tasks::Orchestrator;
