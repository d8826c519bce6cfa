//! Lenient, tiered extraction of a score and explanation from a completion.
//!
//! Tiers run in order and the first one that yields something wins:
//! a JSON fragment with a usable `score`, then `Score:`/`Reasoning:` labels, then a
//! fixed placeholder result. Extraction is total: it never fails and never panics.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::{MAX_EXTRACTED_CHARS, NO_REASONING_PROVIDED};
use crate::prompt::ScoringScheme;

use super::decision_tree::DecisionPath;
use super::types::{EvaluationResult, Extraction, ExtractionMethod};

static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:[A-Za-z0-9_+-]+[ \t]*\r?\n)?\s*").expect("invalid code fence regex")
});

static SCORE_FRAGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{[^{}]*"score"[^{}]*\}"#).expect("invalid score fragment regex")
});

static SCORE_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)score[:\s]+([0-9.]+)").expect("invalid score label regex"));

static REASON_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)(?:reason|reasoning)[:\s]+(.+?)(?:\n\n|research summary:|research_summary:|score:|$)",
    )
    .expect("invalid reasoning label regex")
});

static SUMMARY_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(?:research summary|research_summary)[:\s]+(.+?)(?:\n\n|reasoning:|score:|$)")
        .expect("invalid summary label regex")
});

/// Extracts a result using the flat scoring scheme.
pub fn parse(raw: &str) -> Extraction {
    parse_with_scheme(raw, ScoringScheme::Original)
}

/// Extracts a result; under [`ScoringScheme::DecisionTree`] a structured answer path
/// also pulls the score into the path's range.
pub fn parse_with_scheme(raw: &str, scheme: ScoringScheme) -> Extraction {
    let cleaned = strip_code_fences(raw);

    if let Some((mut result, object)) = structured(&cleaned) {
        let decision_path = match scheme {
            ScoringScheme::DecisionTree => DecisionPath::from_object(&object),
            ScoringScheme::Original => None,
        };

        if let Some(path) = decision_path {
            let reconciled = path.reconcile(result.score);
            if reconciled != result.score {
                debug!(
                    score = result.score,
                    reconciled,
                    path = path.as_str(),
                    "Score outside decision path range, using midpoint"
                );
                result.score = reconciled;
            }
        }

        return Extraction {
            method: ExtractionMethod::Structured,
            result,
            decision_path,
        };
    }

    if let Some(result) = label_based(&cleaned) {
        return Extraction {
            method: ExtractionMethod::LabelBased,
            result,
            decision_path: None,
        };
    }

    debug!(
        raw_len = raw.len(),
        "No score or reasoning found, using placeholder result"
    );
    Extraction {
        method: ExtractionMethod::Default,
        result: EvaluationResult::parse_failure(),
        decision_path: None,
    }
}

/// Removes fenced code-block delimiters (and their language tag).
pub fn strip_code_fences(raw: &str) -> String {
    CODE_FENCE_RE.replace_all(raw, "").trim().to_string()
}

/// Maps a raw score into [0, 1]. Values above 1 are read as a 0-10 scale.
pub fn normalize_score(score: f64) -> f64 {
    let scaled = if score > 1.0 { score / 10.0 } else { score };
    scaled.clamp(0.0, 1.0)
}

/// Drops JSON punctuation, trims and caps the length.
pub fn clean_text(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, '"' | '{' | '}' | '[' | ']'))
        .collect();
    stripped
        .trim()
        .chars()
        .take(MAX_EXTRACTED_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn structured(cleaned: &str) -> Option<(EvaluationResult, Map<String, Value>)> {
    SCORE_FRAGMENT_RE.find_iter(cleaned).find_map(|fragment| {
        let Ok(Value::Object(object)) = serde_json::from_str::<Value>(fragment.as_str()) else {
            return None;
        };
        let score = object.get("score").and_then(coerce_score)?;

        let reasoning = object.get("reasoning").and_then(text_field);
        let summary = object
            .get("research_summary")
            .and_then(text_field)
            .or_else(|| object.get("researchSummary").and_then(text_field))
            .or_else(|| reasoning.clone());

        let result = finish(
            normalize_score(score),
            reasoning.as_deref().unwrap_or_default(),
            summary.as_deref().unwrap_or_default(),
        );
        Some((result, object))
    })
}

fn label_based(cleaned: &str) -> Option<EvaluationResult> {
    let score = SCORE_LABEL_RE
        .captures(cleaned)
        .and_then(|c| c[1].trim_end_matches('.').parse::<f64>().ok())
        .filter(|s| s.is_finite());

    let reasoning = REASON_LABEL_RE
        .captures(cleaned)
        .map(|c| c[1].trim().to_string())
        .filter(|r| !r.is_empty());

    if score.is_none() && reasoning.is_none() {
        return None;
    }

    let reasoning = reasoning.unwrap_or_default();
    let summary = SUMMARY_LABEL_RE
        .captures(cleaned)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_else(|| reasoning.clone());

    Some(finish(
        score.map(normalize_score).unwrap_or(0.0),
        &reasoning,
        &summary,
    ))
}

fn finish(score: f64, reasoning: &str, summary: &str) -> EvaluationResult {
    let mut reasoning = clean_text(reasoning);
    if reasoning.is_empty() {
        reasoning = NO_REASONING_PROVIDED.to_string();
    }

    let mut research_summary = clean_text(summary);
    if research_summary.is_empty() {
        research_summary = reasoning.clone();
    }

    EvaluationResult {
        score,
        reasoning,
        research_summary,
    }
}

fn coerce_score(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => return None,
    };
    score.is_finite().then_some(score)
}

/// Strings as-is, `null` as absent, anything else as its JSON text.
fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
