//! Typed outcomes of interpreting raw model text.

use serde::{Deserialize, Serialize};

use super::report::AnalysisReport;
use crate::{MuninnError, Result};

/// Typed outcome of parsing raw model output for a specific prompt kind.
///
/// The variant is determined solely by the prompt kind the text was
/// produced for — never inferred from the content itself.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResult {
    /// Numeric score in the 0–1 range (sentiment/professionalism scoring).
    Score(f64),
    /// Free-text label: a single-word sentiment, a comma-separated topic
    /// number list, or a retrieval-grounded answer.
    Label(String),
    /// Two-line category/subcategory classification.
    Category(Classification),
    /// Structured conversation-quality report.
    Report(AnalysisReport),
}

impl ParsedResult {
    /// Unwrap a score result.
    ///
    /// Only fails if the caller paired the wrong prompt kind with the
    /// result, which `parse_response` rules out by construction.
    pub fn into_score(self) -> Result<f64> {
        match self {
            ParsedResult::Score(score) => Ok(score),
            other => Err(variant_mismatch("score", &other)),
        }
    }

    /// Unwrap a label result.
    pub fn into_label(self) -> Result<String> {
        match self {
            ParsedResult::Label(label) => Ok(label),
            other => Err(variant_mismatch("label", &other)),
        }
    }

    /// Unwrap a classification result.
    pub fn into_category(self) -> Result<Classification> {
        match self {
            ParsedResult::Category(classification) => Ok(classification),
            other => Err(variant_mismatch("category", &other)),
        }
    }

    /// Unwrap a report result.
    pub fn into_report(self) -> Result<AnalysisReport> {
        match self {
            ParsedResult::Report(report) => Ok(report),
            other => Err(variant_mismatch("report", &other)),
        }
    }
}

fn variant_mismatch(expected: &str, got: &ParsedResult) -> MuninnError {
    let got = match got {
        ParsedResult::Score(_) => "score",
        ParsedResult::Label(_) => "label",
        ParsedResult::Category(_) => "category",
        ParsedResult::Report(_) => "report",
    };
    MuninnError::Parse(format!("expected a {expected} result, got {got}"))
}

/// Category/subcategory pair derived from a two-line model reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    pub subcategory: String,
}

impl Classification {
    pub fn new(category: impl Into<String>, subcategory: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
        }
    }
}

/// Professionalism band derived from an admin sentiment score.
///
/// Thresholds are closed and ordered with no overlap:
/// score ≤ 0.4 is not professional, 0.4 < score < 0.6 is neutral,
/// score ≥ 0.6 is professional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentBand {
    NotProfessional,
    Neutral,
    Professional,
}

impl SentimentBand {
    /// Apply the banding policy to a raw score.
    pub fn from_score(score: f64) -> Self {
        if score <= 0.4 {
            SentimentBand::NotProfessional
        } else if score < 0.6 {
            SentimentBand::Neutral
        } else {
            SentimentBand::Professional
        }
    }

    /// Human-readable band name as it appears in response bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentBand::NotProfessional => "Not Professional",
            SentimentBand::Neutral => "Neutral",
            SentimentBand::Professional => "Professional",
        }
    }
}

impl std::fmt::Display for SentimentBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
