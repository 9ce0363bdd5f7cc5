//! Per-invocation workflow state.

use grounded_core::{AppError, AppResult};
use grounded_retrieval::RetrievedItem;

/// Record threaded through one workflow run.
///
/// `research_results` and `final_proposal` are write-once. A second write
/// returns `AppError::WorkflowState` and keeps the stored value.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    user_request: String,
    research_results: Option<Vec<RetrievedItem>>,
    final_proposal: Option<String>,
}

impl WorkflowState {
    pub fn new(user_request: impl Into<String>) -> Self {
        Self {
            user_request: user_request.into(),
            research_results: None,
            final_proposal: None,
        }
    }

    pub fn user_request(&self) -> &str {
        &self.user_request
    }

    /// Research results, or `None` if research has not run yet.
    pub fn research_results(&self) -> Option<&[RetrievedItem]> {
        self.research_results.as_deref()
    }

    pub fn final_proposal(&self) -> Option<&str> {
        self.final_proposal.as_deref()
    }

    /// A proposal has been recorded.
    pub fn is_complete(&self) -> bool {
        self.final_proposal.is_some()
    }

    pub fn set_research_results(&mut self, results: Vec<RetrievedItem>) -> AppResult<()> {
        if self.research_results.is_some() {
            return Err(AppError::WorkflowState(
                "research results are already set".to_string(),
            ));
        }
        self.research_results = Some(results);
        Ok(())
    }

    pub fn set_final_proposal(&mut self, proposal: String) -> AppResult<()> {
        if self.research_results.is_none() {
            return Err(AppError::WorkflowState(
                "cannot record a proposal before research".to_string(),
            ));
        }
        if self.final_proposal.is_some() {
            return Err(AppError::WorkflowState(
                "final proposal is already set".to_string(),
            ));
        }
        self.final_proposal = Some(proposal);
        Ok(())
    }

    /// Consume the state, returning the proposal.
    pub fn into_final_proposal(self) -> AppResult<String> {
        self.final_proposal.ok_or_else(|| {
            AppError::WorkflowState("workflow finished without a proposal".to_string())
        })
    }
}
