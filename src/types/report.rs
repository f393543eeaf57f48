//! Conversation-quality report types.
//!
//! The report is a fixed-shape record the model fills in from a chat
//! transcript. Wire names are camelCase to match the template embedded
//! in the report prompt; the persisted artifact uses the same shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Multi-field conversation-quality report produced by the analyse task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Insightful overview of the conversation and its outcome.
    pub overall_summary: String,
    /// Summary of the agent's actions.
    pub agent_summary: String,
    /// Summary of the customer's concerns and requests.
    pub customer_summary: String,
    pub conversational_insight: ConversationalInsight,
    /// Overall agent performance as a percentage (0–100).
    pub overall_performance: f64,
    pub ai_insight: AiInsight,
    pub time_consumption: TimeConsumption,
    /// Topic name → share of the conversation, in percent.
    pub topics_discussed: BTreeMap<String, f64>,
}

/// Headline conversation metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationalInsight {
    /// Customer satisfaction score as a percentage (0–100).
    pub csat_score: f64,
    /// Outcome of the conversation, condensed into a few short words.
    pub conversation_result: String,
    /// Positive/Neutral/Negative.
    pub customer_sentiment: String,
    /// Call duration as "MM:SS".
    pub overall_call_duration: String,
}

/// Per-dimension agent ratings on a scale of 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsight {
    pub introduction: f64,
    pub recommendation: f64,
    pub thank_you_message: f64,
    pub attitude: f64,
    pub communication_skills: f64,
}

/// Speaking-time split, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeConsumption {
    pub agent: f64,
    pub customer: f64,
    pub not_talking: f64,
}
