//! Research node: broad retrieval for the workflow path.

use crate::node::WorkflowNode;
use crate::state::WorkflowState;
use crate::timeout::bounded;
use grounded_core::{AppError, AppResult};
use grounded_retrieval::Retriever;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Searches the corpus with the user request and stores what it finds.
pub struct ResearchNode {
    retriever: Arc<dyn Retriever>,
    max_results: usize,
    timeout: Duration,
}

impl ResearchNode {
    pub fn new(retriever: Arc<dyn Retriever>, max_results: usize, timeout: Duration) -> Self {
        Self {
            retriever,
            max_results,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl WorkflowNode for ResearchNode {
    fn name(&self) -> &'static str {
        "research"
    }

    async fn run(&self, state: &mut WorkflowState) -> AppResult<()> {
        if state.research_results().is_some() {
            return Err(AppError::WorkflowState(
                "research node ran twice for one request".to_string(),
            ));
        }

        let started = Instant::now();
        let results = bounded(
            self.timeout,
            "search",
            AppError::Retrieval,
            self.retriever.search(state.user_request(), self.max_results),
        )
        .await?;

        tracing::info!(
            items = results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Research complete"
        );

        state.set_research_results(results)
    }
}
