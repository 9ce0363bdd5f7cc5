//! Query routing and the research-synthesis workflow.
//!
//! A [`Router`] sends factual lookups straight to the search service and
//! hands planning requests to the [`WorkflowEngine`], which runs the
//! research node and then the synthesis node over a write-once
//! [`WorkflowState`].

pub mod engine;
pub mod node;
pub mod research;
pub mod router;
pub mod state;
pub mod synthesis;
mod timeout;

#[cfg(test)]
mod tests;

pub use engine::{WorkflowEngine, WorkflowSettings};
pub use node::WorkflowNode;
pub use research::ResearchNode;
pub use router::{analyze, RouteAnalysis, Router, RoutingDecision};
pub use state::WorkflowState;
pub use synthesis::SynthesisNode;
pub use tokio_util::sync::CancellationToken;
