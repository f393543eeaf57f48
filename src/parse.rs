//! Model-output parsing.
//!
//! Maps raw model text into a typed [`ParsedResult`] for a given prompt
//! kind. The result variant is a function of the kind alone; content
//! that does not match the expected shape is a [`MuninnError::Parse`]
//! failure, surfaced loudly rather than guessed around.

use crate::prompt::PromptKind;
use crate::types::{AnalysisReport, Classification, ParsedResult};
use crate::{MuninnError, Result};

const CATEGORY_MARKER: &str = "Category:";
const SUBCATEGORY_MARKER: &str = "Subcategory:";

/// Parse raw model output for the given prompt kind.
pub fn parse_response(kind: PromptKind, raw: &str) -> Result<ParsedResult> {
    match kind {
        PromptKind::AdminSentimentScore | PromptKind::CustomerSentimentScore => {
            parse_score(raw).map(ParsedResult::Score)
        }
        PromptKind::CustomerSentimentLabel | PromptKind::TopicCheck | PromptKind::RagAnswer => {
            parse_label(raw).map(ParsedResult::Label)
        }
        PromptKind::IssueClassification => parse_classification(raw).map(ParsedResult::Category),
        PromptKind::ConversationReport => parse_report(raw).map(ParsedResult::Report),
    }
}

/// Parse a bare floating-point score.
fn parse_score(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| MuninnError::Parse(format!("expected a numeric score, got {:?}", raw.trim())))
}

/// Accept any non-empty trimmed text as a label.
///
/// No validation against an enumeration: the label tasks return a
/// single-word sentiment, a comma-separated topic-number list, or a
/// free-text answer, and all of those pass through as-is.
fn parse_label(raw: &str) -> Result<String> {
    let label = raw.trim();
    if label.is_empty() {
        return Err(MuninnError::EmptyResponse);
    }
    Ok(label.to_string())
}

/// Parse the two-line `Category:` / `Subcategory:` reply.
///
/// The model omitting the subcategory line is a recognized failure mode
/// and reported as such, never silently tolerated.
fn parse_classification(raw: &str) -> Result<Classification> {
    let mut lines = raw.trim().lines();

    let category_line = lines
        .next()
        .ok_or_else(|| MuninnError::Parse("classification reply is empty".to_string()))?;
    let subcategory_line = lines.next().ok_or_else(|| {
        MuninnError::Parse("classification reply is missing the subcategory line".to_string())
    })?;

    let category = strip_marker(category_line, CATEGORY_MARKER)?;
    let subcategory = strip_marker(subcategory_line, SUBCATEGORY_MARKER)?;

    Ok(Classification::new(category, subcategory))
}

fn strip_marker<'a>(line: &'a str, marker: &str) -> Result<&'a str> {
    line.trim()
        .strip_prefix(marker)
        .map(str::trim)
        .ok_or_else(|| {
            MuninnError::Parse(format!("classification line does not start with {marker:?}"))
        })
}

/// Strict JSON parse of the conversation report.
///
/// No Markdown-stripping fallback: if the model wrapped the output in
/// code fences or appended commentary, the parse fails.
fn parse_report(raw: &str) -> Result<AnalysisReport> {
    serde_json::from_str(raw.trim())
        .map_err(|e| MuninnError::Parse(format!("report is not valid JSON: {e}")))
}
