use serde::Serialize;

use crate::constants::DEFAULT_MATCH_THRESHOLD;
use crate::profile::ResearcherProfile;
use crate::prompt::{ScoringScheme, StrictnessTier};
use crate::scoring::EvaluationResult;

use super::error::{BatchError, BatchResult};

#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub professors: Vec<ResearcherProfile>,
    pub research_direction: String,
    pub threshold: f64,
    pub scheme: ScoringScheme,
    pub strictness: StrictnessTier,
    /// Caller's expected batch size. Advisory only.
    pub batch_size: Option<usize>,
}

impl BatchRequest {
    pub fn new(professors: Vec<ResearcherProfile>, research_direction: impl Into<String>) -> Self {
        Self {
            professors,
            research_direction: research_direction.into(),
            threshold: DEFAULT_MATCH_THRESHOLD,
            scheme: ScoringScheme::default(),
            strictness: StrictnessTier::default(),
            batch_size: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_scheme(mut self, scheme: ScoringScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_strictness(mut self, strictness: StrictnessTier) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    pub fn len(&self) -> usize {
        self.professors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.professors.is_empty()
    }

    pub fn validate(&self) -> BatchResult<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(BatchError::InvalidRequest {
                reason: format!("threshold must be within [0, 1], got {}", self.threshold),
            });
        }
        if self.batch_size == Some(0) {
            return Err(BatchError::InvalidRequest {
                reason: "batch_size must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
/// Results in input order plus batch-level aggregates.
pub struct BatchReport {
    pub results: Vec<EvaluationResult>,
    /// Wall-clock seconds for the whole batch.
    pub processing_time: f64,
    pub model_name: String,
    pub matched_count: usize,
    pub average_score: f64,
    pub threshold: f64,
    /// Results that fell back to the placeholder extraction.
    pub degraded_count: usize,
}

impl BatchReport {
    pub fn new(
        results: Vec<EvaluationResult>,
        model_name: impl Into<String>,
        threshold: f64,
        degraded_count: usize,
        processing_time: f64,
    ) -> Self {
        let matched_count = results.iter().filter(|r| r.is_match(threshold)).count();
        let average_score = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64
        };

        Self {
            results,
            processing_time,
            model_name: model_name.into(),
            matched_count,
            average_score,
            threshold,
            degraded_count,
        }
    }
}
