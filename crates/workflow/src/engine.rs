//! Workflow engine: Research then Synthesis, one fresh state per request.

use crate::node::WorkflowNode;
use crate::research::ResearchNode;
use crate::state::WorkflowState;
use crate::synthesis::SynthesisNode;
use grounded_core::config::WorkflowConfig;
use grounded_core::{AppError, AppResult};
use grounded_llm::Generator;
use grounded_prompt::PromptDefinition;
use grounded_retrieval::Retriever;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

/// Result counts and time limits for retrieval and generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowSettings {
    pub direct_max_results: usize,
    pub research_max_results: usize,
    pub retrieval_timeout: Duration,
    pub generation_timeout: Duration,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self::from_config(&WorkflowConfig::default())
    }
}

impl WorkflowSettings {
    pub fn from_config(config: &WorkflowConfig) -> Self {
        Self {
            direct_max_results: config.direct_max_results,
            research_max_results: config.research_max_results,
            retrieval_timeout: Duration::from_secs(config.retrieval_timeout_secs),
            generation_timeout: Duration::from_secs(config.generation_timeout_secs),
        }
    }
}

/// Runs the two-stage pipeline for a request.
///
/// The engine only holds shared, immutable collaborators, so one instance
/// can serve any number of concurrent invocations.
pub struct WorkflowEngine {
    research: ResearchNode,
    synthesis: SynthesisNode,
}

impl WorkflowEngine {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn Generator>,
        prompt: PromptDefinition,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            research: ResearchNode::new(
                retriever,
                settings.research_max_results,
                settings.retrieval_timeout,
            ),
            synthesis: SynthesisNode::new(generator, prompt, settings.generation_timeout),
        }
    }

    /// Run research and synthesis for `request` and return the proposal.
    pub async fn execute(&self, request: &str) -> AppResult<String> {
        self.execute_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Like [`execute`](Self::execute), checking `cancel` before each node.
    pub async fn execute_with_cancel(
        &self,
        request: &str,
        cancel: &CancellationToken,
    ) -> AppResult<String> {
        let invocation = Uuid::new_v4();
        let span = tracing::info_span!("workflow", invocation = %invocation);

        self.run_pipeline(request, cancel).instrument(span).await
    }

    async fn run_pipeline(&self, request: &str, cancel: &CancellationToken) -> AppResult<String> {
        let started = Instant::now();
        let mut state = WorkflowState::new(request);

        tracing::info!("Workflow started");

        let nodes: [&dyn WorkflowNode; 2] = [&self.research, &self.synthesis];
        for node in nodes {
            if cancel.is_cancelled() {
                tracing::warn!(node = node.name(), "Workflow cancelled");
                return Err(AppError::Cancelled(format!(
                    "request cancelled before the {} node",
                    node.name()
                )));
            }

            tracing::debug!(node = node.name(), "Node started");
            if let Err(e) = node.run(&mut state).await {
                tracing::warn!(node = node.name(), error = %e, "Node failed");
                return Err(e);
            }
        }

        let proposal = state.into_final_proposal()?;
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Workflow finished"
        );
        Ok(proposal)
    }
}
