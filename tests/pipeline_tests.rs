//! End-to-end pipeline tests against the shipped prompt assets.

use std::path::PathBuf;
use std::sync::Arc;

use profalign::{
    BatchError, BatchOrchestrator, BatchRequest, FixedAccelerator, LifecycleConfig, MockEngine,
    ModelManager, PromptBuilder, ResearcherProfile, ScoringScheme, StrictnessTier,
};

fn prompts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("prompts")
}

fn orchestrator(engine: Arc<MockEngine>) -> BatchOrchestrator {
    let manager = ModelManager::new(
        LifecycleConfig::for_testing(),
        engine,
        Arc::new(FixedAccelerator::gib(16.0)),
    );
    BatchOrchestrator::new(manager, Arc::new(PromptBuilder::from_dir(prompts_dir())))
}

fn professors() -> Vec<ResearcherProfile> {
    vec![
        ResearcherProfile::new("Ada Lovelace", "Analytical University")
            .with_areas(["machine learning", "compilers"])
            .with_publication("Learned Query Optimizers", "VLDB", 2023)
            .with_publication("Difference Engines", "Babbage Workshop", 2015),
        ResearcherProfile::new("Alan Turing", "Bletchley College"),
    ]
}

#[tokio::test]
async fn test_strict_original_pipeline() {
    let engine = Arc::new(MockEngine::with_completions([
        r#"{"score": 0.72, "reasoning": "Learned optimizers overlap the direction", "research_summary": "ML for databases"}"#,
        r#"{"score": "0.1", "reasoning": "No publication data", "research_summary": ""}"#,
    ]));
    let orch = orchestrator(Arc::clone(&engine));
    orch.manager().load("qwen-7b").await.unwrap();

    let report = orch
        .evaluate_batch(BatchRequest::new(professors(), "learned query optimization"))
        .await
        .unwrap();

    assert_eq!(report.model_name, "qwen-7b");
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].score, 0.72);
    assert_eq!(report.results[1].score, 0.1);
    // an empty summary falls back to the reasoning text
    assert_eq!(report.results[1].research_summary, "No publication data");
    assert_eq!(report.matched_count, 1);
    assert_eq!(report.degraded_count, 0);

    let prompts = engine.last_prompts();
    assert!(prompts[0].contains("Ada Lovelace"));
    assert!(prompts[0].contains("machine learning, compilers"));
    assert!(prompts[0].contains("Learned Query Optimizers (VLDB, 2023)"));
    assert!(!prompts[0].contains("Difference Engines"));
    assert!(prompts[0].contains("learned query optimization"));
    assert!(!prompts[0].contains("{{"));
    assert!(!prompts[1].contains("{{"));
}

#[tokio::test]
async fn test_decision_tree_pipeline_reconciles_band() {
    let engine = Arc::new(MockEngine::with_completions([
        r#"{"q1": "yes", "q2": "no", "q3": "yes", "q4": "no", "q5": "no", "score": 0.99, "reasoning": "Close but not core", "research_summary": "Compilers"}"#,
    ]));
    let orch = orchestrator(Arc::clone(&engine));
    orch.manager().load("qwen-0.5b").await.unwrap();

    let request = BatchRequest::new(professors()[..1].to_vec(), "program synthesis")
        .with_scheme(ScoringScheme::DecisionTree)
        .with_strictness(StrictnessTier::Basic);
    let report = orch.evaluate_batch(request).await.unwrap();

    let score = report.results[0].score;
    assert!((0.0..=1.0).contains(&score));
    assert!(score < 0.99);
    assert!(engine.last_prompts()[0].contains("program synthesis"));
}

#[tokio::test]
async fn test_garbage_output_degrades_to_default() {
    let engine = Arc::new(MockEngine::with_completions(["!!!!!!!!", "*****"]));
    let orch = orchestrator(engine);
    orch.manager().load("qwen-0.5b").await.unwrap();

    let report = orch
        .evaluate_batch(BatchRequest::new(professors(), "anything"))
        .await
        .unwrap();

    assert_eq!(report.degraded_count, 2);
    assert!(report.results.iter().all(|r| r.score == 0.0));
    assert_eq!(report.average_score, 0.0);
}

#[tokio::test]
async fn test_unload_blocks_further_batches() {
    let engine = Arc::new(MockEngine::new());
    let orch = orchestrator(Arc::clone(&engine));
    orch.manager().load("qwen-1.5b").await.unwrap();
    orch.manager().unload().await;

    let err = orch
        .evaluate_batch(BatchRequest::new(professors(), "anything"))
        .await
        .unwrap_err();
    assert!(matches!(err, BatchError::NoModelLoaded));
    assert_eq!(engine.generate_calls(), 0);
}
