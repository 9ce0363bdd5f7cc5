//! Synthesis node: turns research into the final proposal.

use crate::node::WorkflowNode;
use crate::state::WorkflowState;
use crate::timeout::bounded;
use grounded_core::{AppError, AppResult};
use grounded_llm::Generator;
use grounded_prompt::{build_prompt, PromptDefinition};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Builds the synthesis prompt, calls the generator and records the answer.
pub struct SynthesisNode {
    generator: Arc<dyn Generator>,
    prompt: PromptDefinition,
    timeout: Duration,
}

impl SynthesisNode {
    pub fn new(generator: Arc<dyn Generator>, prompt: PromptDefinition, timeout: Duration) -> Self {
        Self {
            generator,
            prompt,
            timeout,
        }
    }

    /// Render the prompt for the current state.
    pub fn render_prompt(&self, state: &WorkflowState) -> AppResult<String> {
        let research = state.research_results().ok_or_else(|| {
            AppError::WorkflowState("synthesis cannot run before research".to_string())
        })?;

        let built = build_prompt(
            &self.prompt,
            state.user_request(),
            research
                .iter()
                .map(|item| (item.content.as_str(), item.source.as_str())),
        )?;

        if !built.metadata.grounded {
            tracing::warn!("No research to ground the proposal, asking for a caveated answer");
        }

        Ok(built.text)
    }
}

#[async_trait::async_trait]
impl WorkflowNode for SynthesisNode {
    fn name(&self) -> &'static str {
        "synthesis"
    }

    async fn run(&self, state: &mut WorkflowState) -> AppResult<()> {
        if state.final_proposal().is_some() {
            return Err(AppError::WorkflowState(
                "synthesis node ran twice for one request".to_string(),
            ));
        }

        let prompt = self.render_prompt(state)?;
        tracing::debug!(prompt_chars = prompt.len(), "Synthesis prompt assembled");

        let started = Instant::now();
        let proposal = bounded(
            self.timeout,
            "generation",
            AppError::Generation,
            self.generator.generate(&prompt),
        )
        .await?;

        if proposal.trim().is_empty() {
            return Err(AppError::Generation(
                "generator returned an empty proposal".to_string(),
            ));
        }

        tracing::info!(
            proposal_chars = proposal.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Synthesis complete"
        );

        state.set_final_proposal(proposal)
    }
}
