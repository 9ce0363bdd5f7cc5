//! Request routing between the direct lookup and the research workflow.
//!
//! Classification is a keyword heuristic. It never fails: anything it
//! cannot place with confidence goes to the cheaper direct path.

use crate::engine::{WorkflowEngine, WorkflowSettings};
use crate::timeout::bounded;
use grounded_core::{AppError, AppResult};
use grounded_retrieval::{format_citations, Retriever};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Which response strategy handles a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingDecision {
    /// Single retrieval, answered with citations
    Direct,
    /// Research followed by synthesis
    Workflow,
}

impl RoutingDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingDecision::Direct => "direct",
            RoutingDecision::Workflow => "workflow",
        }
    }
}

/// A routing decision and what led to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteAnalysis {
    pub decision: RoutingDecision,
    /// Planning indicators found in the request
    pub matched: Vec<String>,
    pub reasoning: String,
}

const WORKFLOW_WORDS: &[&str] = &[
    "plan",
    "plans",
    "planning",
    "propose",
    "proposal",
    "architecture",
    "architectural",
    "architect",
    "design",
    "designing",
    "strategy",
    "strategies",
    "roadmap",
    "blueprint",
    "compare",
    "comparison",
    "tradeoffs",
    "trade-offs",
    "evaluate",
    "recommend",
    "recommendation",
    "migration",
    "outline",
];

const WORKFLOW_PHRASES: &[&str] = &[
    "step by step",
    "pros and cons",
    "how should we",
    "what would it take",
    "put together",
];

const FACTUAL_OPENERS: &[&str] = &[
    "who is",
    "who was",
    "who are",
    "what is",
    "what was",
    "what are",
    "when did",
    "when was",
    "where is",
    "where was",
    "define",
    "tell me about",
    "how many",
    "which year",
];

/// Classify a request.
///
/// `extra_indicators` are additional planning words or phrases, matched
/// case-insensitively.
pub fn analyze(request: &str, extra_indicators: &[String]) -> RouteAnalysis {
    let text = request.trim().to_lowercase();
    let words: Vec<&str> = text
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|w| !w.is_empty())
        .collect();

    let mut matched: Vec<String> = Vec::new();
    let mut note = |indicator: &str| {
        if !matched.iter().any(|m| m == indicator) {
            matched.push(indicator.to_string());
        }
    };

    for word in WORKFLOW_WORDS {
        if words.contains(word) {
            note(word);
        }
    }
    for phrase in WORKFLOW_PHRASES {
        if text.contains(phrase) {
            note(phrase);
        }
    }
    for extra in extra_indicators {
        let extra = extra.trim().to_lowercase();
        if extra.is_empty() {
            continue;
        }
        let hit = if extra.contains(' ') {
            text.contains(&extra)
        } else {
            words.contains(&extra.as_str())
        };
        if hit {
            note(&extra);
        }
    }

    let questions = text.matches('?').count();
    let factual = FACTUAL_OPENERS.iter().any(|o| text.starts_with(o));

    let (decision, reasoning) = if matched.is_empty() && questions < 2 {
        (RoutingDecision::Direct, "No planning indicators".to_string())
    } else if matched.is_empty() {
        (
            RoutingDecision::Workflow,
            format!("Multi-part request ({} questions)", questions),
        )
    } else if factual && matched.len() < 2 {
        (
            RoutingDecision::Direct,
            "Factual question mentioning a planning term".to_string(),
        )
    } else {
        (
            RoutingDecision::Workflow,
            format!("Planning indicators: {}", matched.join(", ")),
        )
    };

    RouteAnalysis {
        decision,
        matched,
        reasoning,
    }
}

/// Picks a strategy for each request and produces the final answer.
pub struct Router {
    retriever: Arc<dyn Retriever>,
    engine: Arc<WorkflowEngine>,
    settings: WorkflowSettings,
    extra_indicators: Vec<String>,
}

impl Router {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        engine: Arc<WorkflowEngine>,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            retriever,
            engine,
            settings,
            extra_indicators: Vec::new(),
        }
    }

    /// Add planning indicators on top of the built-in list.
    pub fn with_extra_indicators(mut self, indicators: Vec<String>) -> Self {
        self.extra_indicators = indicators;
        self
    }

    pub fn analyze(&self, request: &str) -> RouteAnalysis {
        analyze(request, &self.extra_indicators)
    }

    pub fn route(&self, request: &str) -> RoutingDecision {
        self.analyze(request).decision
    }

    /// Route `request` and return the answer text.
    pub async fn dispatch(&self, request: &str) -> AppResult<String> {
        self.dispatch_with_cancel(request, &CancellationToken::new())
            .await
    }

    pub async fn dispatch_with_cancel(
        &self,
        request: &str,
        cancel: &CancellationToken,
    ) -> AppResult<String> {
        let analysis = self.analyze(request);
        tracing::info!(
            decision = analysis.decision.as_str(),
            reasoning = %analysis.reasoning,
            "Request routed"
        );

        match analysis.decision {
            RoutingDecision::Direct => self.answer_direct(request, cancel).await,
            RoutingDecision::Workflow => self.engine.execute_with_cancel(request, cancel).await,
        }
    }

    async fn answer_direct(&self, request: &str, cancel: &CancellationToken) -> AppResult<String> {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled(
                "request cancelled before the direct lookup".to_string(),
            ));
        }

        let items = bounded(
            self.settings.retrieval_timeout,
            "search",
            AppError::Retrieval,
            self.retriever.search(request, self.settings.direct_max_results),
        )
        .await?;

        tracing::info!(items = items.len(), "Direct lookup complete");
        Ok(format_citations(&items))
    }
}
