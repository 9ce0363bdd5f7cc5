//! Node abstraction for the workflow pipeline.

use crate::state::WorkflowState;
use grounded_core::AppResult;

/// One stage of the research-synthesis pipeline.
///
/// A node checks its own preconditions against the state and fails with
/// `AppError::WorkflowState` instead of overwriting anything.
#[async_trait::async_trait]
pub trait WorkflowNode: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, state: &mut WorkflowState) -> AppResult<()>;
}
