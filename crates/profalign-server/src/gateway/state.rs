use std::sync::Arc;

use profalign::{BatchOrchestrator, ModelManager, PromptBuilder};

#[derive(Clone)]
pub struct HandlerState {
    pub manager: ModelManager,

    pub orchestrator: BatchOrchestrator,
}

impl HandlerState {
    pub fn new(manager: ModelManager, prompts: Arc<PromptBuilder>) -> Self {
        let orchestrator = BatchOrchestrator::new(manager.clone(), prompts);
        Self {
            manager,
            orchestrator,
        }
    }
}
