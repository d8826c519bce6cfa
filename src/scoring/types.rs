use serde::{Deserialize, Serialize};

use crate::constants::{PARSE_FAILURE_REASONING, PARSE_FAILURE_SUMMARY};

use super::decision_tree::DecisionPath;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Score and explanation for one professor. `score` is always within [0, 1].
pub struct EvaluationResult {
    pub score: f64,
    pub reasoning: String,
    #[serde(rename = "researchSummary")]
    pub research_summary: String,
}

impl EvaluationResult {
    /// Fixed result for completions nothing could be extracted from.
    pub fn parse_failure() -> Self {
        Self {
            score: 0.0,
            reasoning: PARSE_FAILURE_REASONING.to_string(),
            research_summary: PARSE_FAILURE_SUMMARY.to_string(),
        }
    }

    pub fn is_match(&self, threshold: f64) -> bool {
        self.score >= threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Which tier of the parser produced a result.
pub enum ExtractionMethod {
    /// A JSON fragment carrying a usable `score`.
    Structured,
    /// `Score:` / `Reasoning:` style labels.
    LabelBased,
    /// Nothing usable; fixed placeholder result.
    Default,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::LabelBased => "label_based",
            Self::Default => "default",
        }
    }
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub method: ExtractionMethod,
    pub result: EvaluationResult,
    /// Set only when decision-tree answers were found and reconciled.
    pub decision_path: Option<DecisionPath>,
}

impl Extraction {
    pub fn is_degraded(&self) -> bool {
        self.method == ExtractionMethod::Default
    }

    pub fn into_result(self) -> EvaluationResult {
        self.result
    }
}
