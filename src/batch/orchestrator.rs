use std::sync::Arc;
use std::time::Instant;

use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::engine::EngineError;
use crate::lifecycle::ModelManager;
use crate::prompt::PromptBuilder;
use crate::scoring::{parse_with_scheme, validate};

use super::error::{BatchError, BatchResult};
use super::types::{BatchReport, BatchRequest};

/// Evaluates a list of professors in one generation call against the loaded model.
#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    manager: ModelManager,
    prompts: Arc<PromptBuilder>,
}

impl BatchOrchestrator {
    pub fn new(manager: ModelManager, prompts: Arc<PromptBuilder>) -> Self {
        Self { manager, prompts }
    }

    pub fn manager(&self) -> &ModelManager {
        &self.manager
    }

    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    pub async fn evaluate_batch(&self, request: BatchRequest) -> BatchResult<BatchReport> {
        let batch_id = Uuid::new_v4();
        let span = info_span!(
            "evaluate_batch",
            %batch_id,
            batch_len = request.len(),
            scheme = %request.scheme,
        );
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: BatchRequest) -> BatchResult<BatchReport> {
        request.validate()?;
        let started = Instant::now();

        if let Some(limit) = request.batch_size
            && request.len() > limit
        {
            warn!(
                batch_len = request.len(),
                batch_size = limit,
                "Batch exceeds requested batch_size, evaluating in one call"
            );
        }

        let session = self.manager.session().await;
        let model_id = session
            .loaded()
            .map(|m| m.descriptor.id)
            .ok_or(BatchError::NoModelLoaded)?;

        if request.is_empty() {
            return Ok(BatchReport::new(
                Vec::new(),
                model_id,
                request.threshold,
                0,
                started.elapsed().as_secs_f64(),
            ));
        }

        let prompts: Vec<String> = request
            .professors
            .iter()
            .map(|p| {
                self.prompts.build(
                    p,
                    &request.research_direction,
                    request.strictness,
                    request.scheme,
                )
            })
            .collect();

        info!(model_id, prompts = prompts.len(), "Generating batch");

        // The task owns the session: generation finishes and the lock is held even if
        // this future is dropped.
        let outputs = tokio::spawn(async move { session.generate(&prompts).await })
            .await
            .map_err(|e| BatchError::GenerationFailure {
                source: EngineError::Other(format!("generation task did not complete: {e}")),
            })?
            .inspect_err(|e| warn!(error = %e, "Batch generation failed"))?;

        let mut degraded_count = 0;
        let results = outputs
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                if let Err(reason) = validate(raw) {
                    debug!(index, %reason, "Completion failed validation");
                }
                let extraction = parse_with_scheme(raw, request.scheme);
                if extraction.is_degraded() {
                    degraded_count += 1;
                }
                extraction.into_result()
            })
            .collect::<Vec<_>>();

        let report = BatchReport::new(
            results,
            model_id,
            request.threshold,
            degraded_count,
            started.elapsed().as_secs_f64(),
        );

        info!(
            model_id,
            matched_count = report.matched_count,
            average_score = report.average_score,
            degraded_count,
            elapsed_s = format_args!("{:.2}", report.processing_time),
            "Batch complete"
        );
        Ok(report)
    }
}
